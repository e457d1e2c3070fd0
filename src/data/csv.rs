//! CSV readers for the two dataset layouts the task drivers consume.
//!
//! Both readers skip the first line as a header and stop after `limit` data
//! rows when a limit is given.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Reads a labelled dataset: first column is the class label, the remaining
/// columns are features.
///
/// Returns `(features, labels)` where `labels` is an `N x 1` column of raw
/// label values. Any non-numeric cell is a `Parse` error.
pub fn read_labeled_csv<P: AsRef<Path>>(path: P, limit: Option<usize>) -> Result<(Matrix, Matrix)> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let (features, labels) = read_labeled_csv_from_reader(file, limit)?;
    debug!(path = %path.display(), rows = features.rows(), cols = features.cols(), "read labelled csv");
    Ok((features, labels))
}

pub fn read_labeled_csv_from_reader<R: Read>(reader: R, limit: Option<usize>) -> Result<(Matrix, Matrix)> {
    let mut rdr = ReaderBuilder::new().has_headers(true).trim(Trim::All).from_reader(reader);

    let mut features = Vec::new();
    let mut labels = Vec::new();
    for result in rdr.records().take(limit.unwrap_or(usize::MAX)) {
        let record = result?;
        let line = line_of(&record);
        let mut cells = record.iter();
        let label = match cells.next() {
            Some(cell) => parse_cell(cell, line)?,
            None => continue,
        };
        let row = cells.map(|cell| parse_cell(cell, line)).collect::<Result<Vec<f64>>>()?;
        labels.push(vec![label]);
        features.push(row);
    }

    Ok((Matrix::from_rows(features)?, Matrix::from_rows(labels)?))
}

/// Reads an all-numeric table. Cells that do not parse as numbers (`NA`,
/// blanks) become `0.0`.
pub fn read_numeric_csv<P: AsRef<Path>>(path: P, limit: Option<usize>) -> Result<Matrix> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let data = read_numeric_csv_from_reader(file, limit)?;
    debug!(path = %path.display(), rows = data.rows(), cols = data.cols(), "read numeric csv");
    Ok(data)
}

pub fn read_numeric_csv_from_reader<R: Read>(reader: R, limit: Option<usize>) -> Result<Matrix> {
    let mut rdr = ReaderBuilder::new().has_headers(true).trim(Trim::All).from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.records().take(limit.unwrap_or(usize::MAX)) {
        let record = result?;
        rows.push(record.iter().map(|cell| cell.parse().unwrap_or(0.0)).collect());
    }
    Matrix::from_rows(rows)
}

fn line_of(record: &StringRecord) -> usize {
    record.position().map_or(0, |p| p.line() as usize)
}

fn parse_cell(cell: &str, line: usize) -> Result<f64> {
    cell.parse().map_err(|_| Error::Parse {
        line,
        message: format!("expected a number, found {:?}", cell),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_csv_splits_label_from_pixels() {
        let text = "label,p0,p1,p2\n7,0,128,255\n2,1,2,3\n";
        let (x, y) = read_labeled_csv_from_reader(text.as_bytes(), None).unwrap();
        assert_eq!(x.shape(), (2, 3));
        assert_eq!(y.shape(), (2, 1));
        assert_eq!(y[(0, 0)], 7.0);
        assert_eq!(x[(0, 2)], 255.0);
        assert_eq!(x[(1, 0)], 1.0);
    }

    #[test]
    fn labeled_csv_honours_limit() {
        let text = "label,a\n1,1\n2,2\n3,3\n";
        let (x, y) = read_labeled_csv_from_reader(text.as_bytes(), Some(2)).unwrap();
        assert_eq!(x.rows(), 2);
        assert_eq!(y[(1, 0)], 2.0);
    }

    #[test]
    fn labeled_csv_reports_bad_cell_line() {
        let text = "label,a\n1,1\nx,2\n";
        match read_labeled_csv_from_reader(text.as_bytes(), None) {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn header_only_gives_empty_matrices() {
        let (x, y) = read_labeled_csv_from_reader("label,a\n".as_bytes(), None).unwrap();
        assert!(x.is_empty());
        assert!(y.is_empty());
    }

    #[test]
    fn numeric_csv_maps_na_to_zero() {
        let text = "crim,zn,medv\n0.5,NA,24\n1.5, 2 ,21.6\n";
        let m = read_numeric_csv_from_reader(text.as_bytes(), None).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m[(0, 1)], 0.0);
        assert_eq!(m[(1, 1)], 2.0);
        assert_eq!(m[(1, 2)], 21.6);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_numeric_csv("/definitely/not/here.csv", None).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
