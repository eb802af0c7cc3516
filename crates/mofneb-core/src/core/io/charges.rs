use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChargeFileError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid charge value '{value}' on line {line}")]
    InvalidValue { line: u64, value: String },
    #[error("Charge file contains no values")]
    Empty,
}

/// Reads a per-atom partial charge list.
///
/// One charge per record; records may be comma or whitespace separated and the
/// last field is taken as the charge, so both a bare column of numbers and an
/// `index,charge` table are accepted. Lines starting with `#` are ignored, and a
/// leading header record whose last field is not numeric is skipped. `NaN` and
/// infinite values are rejected.
pub fn read_charges(mut reader: impl Read) -> Result<Vec<f64>, ChargeFileError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| ChargeFileError::Csv(e.into()))?;
    let normalized = text
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("\n");

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(normalized.as_bytes());

    let mut charges = Vec::new();
    for (i, result) in csv_reader.records().enumerate() {
        let record = result?;
        let Some(value) = record.iter().rev().find(|field| !field.is_empty()) else {
            continue;
        };
        match value.parse::<f64>() {
            Ok(charge) if charge.is_finite() => charges.push(charge),
            Err(_) if i == 0 => continue,
            _ => {
                return Err(ChargeFileError::InvalidValue {
                    line: record.position().map_or(0, |p| p.line()),
                    value: value.to_string(),
                });
            }
        }
    }

    if charges.is_empty() {
        return Err(ChargeFileError::Empty);
    }
    Ok(charges)
}

pub fn read_charges_from_path(path: &Path) -> Result<Vec<f64>, ChargeFileError> {
    let file = std::fs::File::open(path).map_err(|e| ChargeFileError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    read_charges(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_single_column() {
        let charges = read_charges("0.5\n-0.25\n\n1e-2\n".as_bytes()).unwrap();
        assert_eq!(charges, vec![0.5, -0.25, 0.01]);
    }

    #[test]
    fn reads_index_charge_table_with_header_and_comments() {
        let content = "index,charge\n# metal node\n0, 1.20\n1,-0.80\n2 -0.40\n";
        let charges = read_charges(content.as_bytes()).unwrap();
        assert_eq!(charges, vec![1.2, -0.8, -0.4]);
    }

    #[test]
    fn rejects_non_numeric_value_after_first_record() {
        let result = read_charges("0.1\noops\n".as_bytes());
        assert!(matches!(result, Err(ChargeFileError::InvalidValue { .. })));
    }

    #[test]
    fn rejects_non_finite_charges() {
        for content in ["0.1\nNaN\n", "nan\n0.1\n", "0,0.1\n1,inf\n"] {
            let result = read_charges(content.as_bytes());
            assert!(
                matches!(result, Err(ChargeFileError::InvalidValue { .. })),
                "accepted {:?}",
                content
            );
        }
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            read_charges("# nothing\n".as_bytes()),
            Err(ChargeFileError::Empty)
        ));
    }

    #[test]
    fn reads_from_path_and_reports_missing_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "0.3\n-0.3\n").unwrap();
        assert_eq!(read_charges_from_path(file.path()).unwrap(), vec![0.3, -0.3]);

        let missing = read_charges_from_path(Path::new("no_such_charges.csv"));
        assert!(matches!(missing, Err(ChargeFileError::Io { .. })));
    }
}
