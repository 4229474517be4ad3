//! Pin records and pin table ingestion.
//!
//! A pin table lists one bond pad per row: its package pin number, its net
//! name, and its die coordinates in micrometres. Rows are sorted into valid
//! pins and an "invalid" list that is reported back to the user verbatim as
//! `"{pin_no}, {pin_name}"`.
//!
//! # Row Rules
//!
//! | Row                                      | Outcome  |
//! |------------------------------------------|----------|
//! | empty pin number and empty name          | skipped  |
//! | empty pin number                         | invalid  |
//! | name `NC` (any case)                     | invalid  |
//! | non-numeric X or Y (spaces are ignored)  | invalid  |
//! | otherwise                                | valid    |
//!
//! Valid pin names have all spaces removed.

pub mod table;

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{InputError, InputResult};
use crate::geometry::ChipSize;

pub use table::{PinColumns, PinTable};

/// A single bond pad read from the pin table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinRecord {
    /// Package pin number; matched against lead labels.
    pub pin_no: String,
    /// Net name.
    pub pin_name: String,
    /// Die X (um, from the lower-left corner).
    pub x: f64,
    /// Die Y (um, from the lower-left corner).
    pub y: f64,
}

impl PinRecord {
    /// Creates a new pin record.
    #[must_use]
    pub fn new(pin_no: impl Into<String>, pin_name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            pin_no: pin_no.into(),
            pin_name: pin_name.into(),
            x,
            y,
        }
    }

    /// The entry used for this pin in the invalid-pin list.
    #[must_use]
    pub fn invalid_entry(&self) -> String {
        invalid_entry(&self.pin_no, &self.pin_name)
    }
}

/// Formats an invalid-pin list entry.
#[must_use]
pub fn invalid_entry(pin_no: &str, pin_name: &str) -> String {
    format!("{pin_no}, {pin_name}")
}

/// Outcome of reading one pin table row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Blank row.
    Skip,
    /// Usable pin.
    Valid(PinRecord),
    /// Unusable pin, with its invalid-list entry.
    Invalid(String),
}

/// Applies the row rules to raw cell text.
#[must_use]
pub fn classify_row(pin_no: &str, pin_name: &str, x_text: &str, y_text: &str) -> RowOutcome {
    let pin_no = pin_no.trim();
    let pin_name = pin_name.trim();

    if pin_no.is_empty() && pin_name.is_empty() {
        return RowOutcome::Skip;
    }

    let coords = parse_coordinate(x_text).zip(parse_coordinate(y_text));
    match coords {
        Some((x, y)) if !pin_no.is_empty() && !pin_name.eq_ignore_ascii_case("NC") => {
            let cleaned_name: String = pin_name.chars().filter(|c| *c != ' ').collect();
            RowOutcome::Valid(PinRecord::new(pin_no, cleaned_name, x, y))
        }
        _ => RowOutcome::Invalid(invalid_entry(pin_no, pin_name)),
    }
}

fn parse_coordinate(text: &str) -> Option<f64> {
    let compact: String = text.chars().filter(|c| *c != ' ').collect();
    compact.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn chip_size_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+\.?\d*)\s*um\s*[Xx×]\s*(\d+\.?\d*)\s*um")
            .expect("chip size pattern is a valid regex")
    })
}

/// Parses chip size text such as `"1200 um x 900 um"`.
///
/// # Errors
///
/// Returns [`InputError::InvalidChipSize`] if the text does not contain a
/// `W um x H um` expression with positive dimensions.
pub fn parse_chip_size(text: &str) -> InputResult<ChipSize> {
    let invalid = || InputError::InvalidChipSize {
        text: text.to_string(),
    };

    let caps = chip_size_pattern().captures(text).ok_or_else(invalid)?;
    let width: f64 = caps[1].parse().map_err(|_| invalid())?;
    let height: f64 = caps[2].parse().map_err(|_| invalid())?;

    let size = ChipSize::new(width, height);
    if size.is_valid() {
        Ok(size)
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_rows_are_skipped() {
        assert_eq!(classify_row("", "", "", ""), RowOutcome::Skip);
        assert_eq!(classify_row("  ", " ", "1", "2"), RowOutcome::Skip);
    }

    #[test]
    fn valid_row_cleans_name() {
        let outcome = classify_row("79", "VDD IO", " 1 200.5", "30");
        assert_eq!(
            outcome,
            RowOutcome::Valid(PinRecord::new("79", "VDDIO", 1200.5, 30.0))
        );
    }

    #[test]
    fn nc_and_missing_fields_are_invalid() {
        assert_eq!(
            classify_row("12", "nc", "1", "2"),
            RowOutcome::Invalid("12, nc".to_string())
        );
        assert_eq!(
            classify_row("", "VSS", "1", "2"),
            RowOutcome::Invalid(", VSS".to_string())
        );
        assert_eq!(
            classify_row("3", "CLK", "abc", "2"),
            RowOutcome::Invalid("3, CLK".to_string())
        );
        assert_eq!(
            classify_row("3", "CLK", "1", ""),
            RowOutcome::Invalid("3, CLK".to_string())
        );
        assert_eq!(
            classify_row("3", "CLK", "inf", "1"),
            RowOutcome::Invalid("3, CLK".to_string())
        );
    }

    #[test]
    fn chip_size_text() {
        let size = parse_chip_size("Chip size: 1200 um x 900.5um").unwrap();
        assert!((size.width_um - 1200.0).abs() < f64::EPSILON);
        assert!((size.height_um - 900.5).abs() < f64::EPSILON);

        let size = parse_chip_size("800um×600um").unwrap();
        assert!((size.width_um - 800.0).abs() < f64::EPSILON);

        let size = parse_chip_size("10 um X 20 um").unwrap();
        assert!((size.height_um - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bad_chip_size_text() {
        assert!(parse_chip_size("1200 x 900").is_err());
        assert!(parse_chip_size("0 um x 900 um").is_err());
        assert!(parse_chip_size("").is_err());
    }
}
