//! Plain-text weight files.
//!
//! For every layer, in order:
//!
//! ```text
//! WEIGHTS
//! rows,cols
//! w00,w01,...      (one line per row)
//! BIASES
//! 1,cols
//! b0,b1,...
//! ```
//!
//! The format only carries weights. The caller must rebuild a model with the
//! same layer count and shapes before loading (see `ModelSpec`). Values use
//! Rust's shortest round-trip `f64` formatting, so save → load is exact.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::model::Model;

const WEIGHTS_MARKER: &str = "WEIGHTS";
const BIASES_MARKER: &str = "BIASES";

impl Model {
    /// Writes every layer's weights and biases to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.save_to(&mut writer)?;
        writer.flush()?;
        info!(path = %path.display(), layers = self.len(), "model saved");
        Ok(())
    }

    pub fn save_to<W: Write>(&self, mut writer: W) -> Result<()> {
        for layer in self.layers() {
            write_block(&mut writer, WEIGHTS_MARKER, layer.weights())?;
            write_block(&mut writer, BIASES_MARKER, layer.biases())?;
        }
        Ok(())
    }

    /// Loads weights from `path` into this already-built model.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path)?;
        self.load_from(BufReader::new(file))?;
        info!(path = %path.display(), layers = self.len(), "model loaded");
        Ok(())
    }

    /// Parses the whole stream before touching any layer; on error the
    /// model keeps its previous weights.
    pub fn load_from<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let mut lines = LineReader::new(reader);
        let mut params = Vec::with_capacity(self.len());

        for (idx, layer) in self.layers().iter().enumerate() {
            let weights = read_block(&mut lines, WEIGHTS_MARKER, "load weights", layer.weights().shape())?;
            let biases = read_block(&mut lines, BIASES_MARKER, "load biases", layer.biases().shape())?;
            debug!(layer = idx, shape = ?weights.shape(), "parsed layer parameters");
            params.push((weights, biases));
        }

        if let Some(line) = lines.next_non_empty()? {
            return Err(Error::Parse {
                line: lines.number,
                message: format!("unexpected content after the last layer: '{}'", line),
            });
        }

        for (layer, (weights, biases)) in self.layers_mut().iter_mut().zip(params) {
            layer.set_weights(weights)?;
            layer.set_biases(biases)?;
        }
        Ok(())
    }
}

fn write_block<W: Write>(writer: &mut W, marker: &str, matrix: &Matrix) -> Result<()> {
    writeln!(writer, "{}", marker)?;
    writeln!(writer, "{},{}", matrix.rows(), matrix.cols())?;
    for row in matrix.iter_rows() {
        let line = row
            .iter()
            .map(|x| x.to_string())
            .collect::<Vec<_>>()
            .join(",");
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

struct LineReader<R> {
    lines: Lines<R>,
    /// 1-based number of the last line returned.
    number: usize,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R) -> Self {
        LineReader {
            lines: reader.lines(),
            number: 0,
        }
    }

    /// Next line with surrounding whitespace removed, `None` at EOF.
    fn next_line(&mut self) -> Result<Option<String>> {
        match self.lines.next() {
            Some(line) => {
                self.number += 1;
                Ok(Some(line?.trim().to_string()))
            }
            None => Ok(None),
        }
    }

    fn next_non_empty(&mut self) -> Result<Option<String>> {
        while let Some(line) = self.next_line()? {
            if !line.is_empty() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    fn expect_line(&mut self, what: &str) -> Result<String> {
        self.next_line()?.ok_or_else(|| Error::Parse {
            line: self.number + 1,
            message: format!("unexpected end of file, expected {}", what),
        })
    }
}

/// Reads one `marker / rows,cols / values...` block. The shape line is
/// checked against `expected` before any value is read.
fn read_block<R: BufRead>(
    lines: &mut LineReader<R>,
    marker: &str,
    op: &'static str,
    expected: (usize, usize),
) -> Result<Matrix> {
    let header = lines.next_non_empty()?.ok_or_else(|| Error::Parse {
        line: lines.number + 1,
        message: format!("unexpected end of file, expected '{}'", marker),
    })?;
    if header != marker {
        return Err(Error::Parse {
            line: lines.number,
            message: format!("expected '{}', found '{}'", marker, header),
        });
    }

    let dims = lines.expect_line("a 'rows,cols' shape line")?;
    let (rows, cols) = parse_dims(&dims, lines.number)?;
    if (rows, cols) != expected {
        return Err(Error::ShapeMismatch {
            op,
            left: expected,
            right: (rows, cols),
        });
    }
    let len = rows.checked_mul(cols).ok_or_else(|| Error::Parse {
        line: lines.number,
        message: format!("shape {}x{} is too large", rows, cols),
    })?;

    let mut data = Vec::with_capacity(len);
    for _ in 0..rows {
        let line = lines.expect_line("a row of values")?;
        let values = parse_row(&line, lines.number)?;
        if values.len() != cols {
            return Err(Error::Parse {
                line: lines.number,
                message: format!("expected {} values, found {}", cols, values.len()),
            });
        }
        data.extend(values);
    }

    Matrix::from_vec(rows, cols, data)
}

fn parse_dims(line: &str, number: usize) -> Result<(usize, usize)> {
    let bad = || Error::Parse {
        line: number,
        message: format!("invalid shape line '{}'", line),
    };
    let (rows, cols) = line.split_once(',').ok_or_else(bad)?;
    let rows = rows.trim().parse::<usize>().map_err(|_| bad())?;
    let cols = cols.trim().parse::<usize>().map_err(|_| bad())?;
    Ok((rows, cols))
}

fn parse_row(line: &str, number: usize) -> Result<Vec<f64>> {
    if line.is_empty() {
        return Ok(Vec::new());
    }
    line.split(',')
        .map(|cell| {
            cell.trim().parse::<f64>().map_err(|_| Error::Parse {
                line: number,
                message: format!("invalid number '{}'", cell),
            })
        })
        .collect()
}
