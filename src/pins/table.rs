//! CSV pin table reader.

use std::io;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{InputError, InputResult};
use crate::pins::{classify_row, PinRecord, RowOutcome};

/// Header names of the pin table columns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PinColumns {
    /// Pin number column.
    #[serde(default = "default_pin_no")]
    pub pin_no: String,
    /// Pin name column.
    #[serde(default = "default_pin_name")]
    pub pin_name: String,
    /// X coordinate column (um).
    #[serde(default = "default_x")]
    pub x: String,
    /// Y coordinate column (um).
    #[serde(default = "default_y")]
    pub y: String,
}

impl Default for PinColumns {
    fn default() -> Self {
        Self {
            pin_no: default_pin_no(),
            pin_name: default_pin_name(),
            x: default_x(),
            y: default_y(),
        }
    }
}

fn default_pin_no() -> String {
    "pin_no".to_string()
}

fn default_pin_name() -> String {
    "pin_name".to_string()
}

fn default_x() -> String {
    "x".to_string()
}

fn default_y() -> String {
    "y".to_string()
}

/// Pins read from a table, split into usable and unusable entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinTable {
    /// Usable pins, in table order.
    pub valid: Vec<PinRecord>,
    /// Unusable rows as `"{pin_no}, {pin_name}"`.
    pub invalid: Vec<String>,
}

impl PinTable {
    /// Reads a pin table from CSV data with a header row.
    ///
    /// Header names are matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV is malformed or a configured column is missing.
    pub fn from_csv_reader<R: io::Read>(reader: R, columns: &PinColumns) -> InputResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name.trim()))
                .ok_or_else(|| InputError::MissingColumn {
                    column: name.to_string(),
                })
        };
        let pin_no_idx = find(&columns.pin_no)?;
        let pin_name_idx = find(&columns.pin_name)?;
        let x_idx = find(&columns.x)?;
        let y_idx = find(&columns.y)?;

        let mut table = Self::default();
        for record in csv_reader.records() {
            let record = record?;
            let cell = |idx: usize| record.get(idx).unwrap_or_default();

            match classify_row(cell(pin_no_idx), cell(pin_name_idx), cell(x_idx), cell(y_idx)) {
                RowOutcome::Skip => {}
                RowOutcome::Valid(pin) => table.valid.push(pin),
                RowOutcome::Invalid(entry) => {
                    warn!(entry = %entry, "Skipping unusable pin row");
                    table.invalid.push(entry);
                }
            }
        }

        debug!(
            valid = table.valid.len(),
            invalid = table.invalid.len(),
            "Pin table read"
        );
        Ok(table)
    }

    /// Reads a CSV pin table from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn read_csv(path: &Path, columns: &PinColumns) -> InputResult<Self> {
        let file = std::fs::File::open(path).map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_reader(io::BufReader::new(file), columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_valid_and_invalid_rows() {
        let csv = "\
PIN_NO,Pin_Name,X,Y
A,VSS,10,20
B, NC ,10,30
,,,
C,CLK,abc,40
D, VDD 1 ,15 ,45
";
        let table = PinTable::from_csv_reader(csv.as_bytes(), &PinColumns::default()).unwrap();
        assert_eq!(table.valid.len(), 2);
        assert_eq!(table.valid[0], PinRecord::new("A", "VSS", 10.0, 20.0));
        assert_eq!(table.valid[1], PinRecord::new("D", "VDD1", 15.0, 45.0));
        assert_eq!(table.invalid, vec!["B, NC", "C, CLK"]);
    }

    #[test]
    fn custom_column_names() {
        let csv = "No,Name,PosX,PosY\n7,IO7,1.5,2.5\n";
        let columns = PinColumns {
            pin_no: "No".to_string(),
            pin_name: "Name".to_string(),
            x: "PosX".to_string(),
            y: "PosY".to_string(),
        };
        let table = PinTable::from_csv_reader(csv.as_bytes(), &columns).unwrap();
        assert_eq!(table.valid, vec![PinRecord::new("7", "IO7", 1.5, 2.5)]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "pin_no,pin_name,x\n1,A,2\n";
        let err = PinTable::from_csv_reader(csv.as_bytes(), &PinColumns::default()).unwrap_err();
        assert!(matches!(err, InputError::MissingColumn { column } if column == "y"));
    }

    #[test]
    fn short_rows_are_invalid_not_fatal() {
        let csv = "pin_no,pin_name,x,y\n5,IO5,1\n";
        let table = PinTable::from_csv_reader(csv.as_bytes(), &PinColumns::default()).unwrap();
        assert!(table.valid.is_empty());
        assert_eq!(table.invalid, vec!["5, IO5"]);
    }
}
