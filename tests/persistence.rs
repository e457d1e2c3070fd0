use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

use ferrite_dense::tasks::{save_model, sidecar_path};
use ferrite_dense::{ActivationKind, Error, LayerSpec, LossType, Matrix, ModelSpec, RegularizerKind};

fn spec() -> ModelSpec {
    let mut hidden = LayerSpec::new(3, 4, ActivationKind::ReLU);
    hidden.regularizer = Some(RegularizerKind::L2 { lambda: 0.01 });
    ModelSpec {
        name: "roundtrip".into(),
        layers: vec![hidden, LayerSpec::new(4, 2, ActivationKind::Softmax)],
        loss: LossType::CrossEntropy,
    }
}

#[test]
fn saved_weights_reload_bit_exact() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.txt");

    let mut trained = spec().build_with_rng(&mut StdRng::seed_from_u64(7)).unwrap();
    trained.save(&path).unwrap();

    let mut restored = spec().build_with_rng(&mut StdRng::seed_from_u64(99)).unwrap();
    assert_ne!(restored.layers()[0].weights(), trained.layers()[0].weights());
    restored.load(&path).unwrap();

    for (a, b) in trained.layers().iter().zip(restored.layers()) {
        assert_eq!(a.weights(), b.weights());
        assert_eq!(a.biases(), b.biases());
    }

    let x = Matrix::from_rows(vec![vec![0.1, -0.4, 2.0], vec![1.0, 0.0, -1.0]]).unwrap();
    assert_eq!(trained.predict(&x).unwrap(), restored.predict(&x).unwrap());
}

#[test]
fn save_model_writes_architecture_sidecar() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("net.txt");
    let model = spec().build().unwrap();

    save_model(&model, "roundtrip", LossType::CrossEntropy, &path).unwrap();

    let described = ModelSpec::load_json(sidecar_path(&path)).unwrap();
    assert_eq!(described, spec());

    let mut rebuilt = described.build().unwrap();
    rebuilt.load(&path).unwrap();
    assert_eq!(rebuilt.layers()[1].weights(), model.layers()[1].weights());
}

#[test]
fn loading_a_missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let mut model = spec().build().unwrap();
    let err = model.load(dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn loading_into_a_different_architecture_fails_cleanly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.txt");
    spec().build().unwrap().save(&path).unwrap();

    let mut other_spec = spec();
    other_spec.layers[0].size = 5;
    other_spec.layers[1].input_size = 5;
    let mut other = other_spec.build().unwrap();
    let before = other.layers()[0].weights().clone();

    let err = other.load(&path).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
    assert_eq!(other.layers()[0].weights(), &before);
}
