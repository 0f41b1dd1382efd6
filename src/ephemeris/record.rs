//! Parsed ephemeris records
//!
//! Every field named by the layout is parsed once, when the record is built.
//! Accessors hand back the stored outcome instead of re-parsing, so a field
//! that is absent and a field that is present but not numeric stay
//! distinguishable all the way to the caller.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use super::layout::{Column, ColumnLayout};
use crate::{Result, SelenofieldError};

/// Date/time format of the first two tokens of a Horizons line
pub const HORIZONS_DATETIME_FORMAT: &str = "%Y-%b-%d %H:%M";

/// Why a field has no usable value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// The line has no token at the column's index, or the layout lacks the column
    Missing,
    /// The token exists but is not of the expected type
    Unparseable(String),
}

/// A successfully parsed field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

/// One line of an observer table, split and parsed
#[derive(Debug, Clone)]
pub struct EphemerisRecord {
    line: usize,
    raw: Vec<String>,
    indices: HashMap<Column, usize>,
    fields: HashMap<Column, std::result::Result<FieldValue, FieldError>>,
    epoch: std::result::Result<NaiveDateTime, FieldError>,
}

impl EphemerisRecord {
    /// Parse a data line according to `layout`; `line` is its 1-based line number
    pub fn parse(text: &str, layout: &ColumnLayout, line: usize) -> Self {
        let raw: Vec<String> = text.split_whitespace().map(str::to_string).collect();

        let indices = layout.columns().collect();
        let fields = layout
            .columns()
            .map(|(column, index)| {
                let value = match raw.get(index) {
                    None => Err(FieldError::Missing),
                    Some(token) if column.is_numeric() => token
                        .parse::<f64>()
                        .map(FieldValue::Number)
                        .map_err(|_| FieldError::Unparseable(token.clone())),
                    Some(token) => Ok(FieldValue::Text(token.clone())),
                };
                (column, value)
            })
            .collect();

        let epoch = match (
            layout.index_of(Column::Date).and_then(|i| raw.get(i)),
            layout.index_of(Column::Time).and_then(|i| raw.get(i)),
        ) {
            (Some(date), Some(time)) => {
                let stamp = format!("{} {}", date, time);
                NaiveDateTime::parse_from_str(&stamp, HORIZONS_DATETIME_FORMAT)
                    .map_err(|_| FieldError::Unparseable(stamp))
            }
            _ => Err(FieldError::Missing),
        };

        Self {
            line,
            raw,
            indices,
            fields,
            epoch,
        }
    }

    /// Line number the record came from
    pub fn line(&self) -> usize {
        self.line
    }

    /// Raw whitespace tokens of the line
    pub fn tokens(&self) -> &[String] {
        &self.raw
    }

    /// Stored parse outcome of a column
    pub fn field(&self, column: Column) -> std::result::Result<&FieldValue, FieldError> {
        match self.fields.get(&column) {
            Some(Ok(value)) => Ok(value),
            Some(Err(err)) => Err(err.clone()),
            None => Err(FieldError::Missing),
        }
    }

    /// Numeric value of a column
    pub fn number(&self, column: Column) -> Result<f64> {
        match self.field(column) {
            Ok(FieldValue::Number(value)) => Ok(*value),
            Ok(FieldValue::Text(text)) => {
                Err(self.error(column, FieldError::Unparseable(text.clone())))
            }
            Err(err) => Err(self.error(column, err)),
        }
    }

    /// Numeric value of a column that may legitimately be absent
    ///
    /// A missing column yields `None`; a present but unparseable value is
    /// still an error.
    pub fn optional_number(&self, column: Column) -> Result<Option<f64>> {
        match self.field(column) {
            Err(FieldError::Missing) => Ok(None),
            _ => self.number(column).map(Some),
        }
    }

    /// Raw text of a column, numeric or not
    pub fn text(&self, column: Column) -> Result<&str> {
        self.indices
            .get(&column)
            .and_then(|&index| self.raw.get(index))
            .map(String::as_str)
            .ok_or_else(|| self.error(column, FieldError::Missing))
    }

    /// Timestamp of the record (UTC)
    pub fn epoch(&self) -> Result<NaiveDateTime> {
        self.epoch.clone().map_err(|err| match err {
            FieldError::Missing => SelenofieldError::DataMissing {
                column: "Date/Time".to_string(),
                line: self.line,
            },
            FieldError::Unparseable(value) => SelenofieldError::DataParse {
                column: "Date/Time".to_string(),
                value,
                line: self.line,
            },
        })
    }

    fn error(&self, column: Column, err: FieldError) -> SelenofieldError {
        match err {
            FieldError::Missing => SelenofieldError::DataMissing {
                column: column.to_string(),
                line: self.line,
            },
            FieldError::Unparseable(value) => SelenofieldError::DataParse {
                column: column.to_string(),
                value,
                line: self.line,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const AXIS_LINE: &str = " 2015-Mar-20 04:15 *m  10.50000  5.00000  384000.123  -0.0456";

    #[test]
    fn test_parse_axis_line() {
        let record = EphemerisRecord::parse(AXIS_LINE, &ColumnLayout::axis_table(), 42);
        assert_eq!(record.line(), 42);
        assert_eq!(record.number(Column::RightAscension).unwrap(), 10.5);
        assert_eq!(record.number(Column::Declination).unwrap(), 5.0);
        assert_eq!(record.number(Column::TargetRange).unwrap(), 384000.123);
        assert_eq!(record.number(Column::TargetRangeRate).unwrap(), -0.0456);
    }

    #[test]
    fn test_epoch() {
        let record = EphemerisRecord::parse(AXIS_LINE, &ColumnLayout::axis_table(), 1);
        let epoch = record.epoch().unwrap();
        assert_eq!(epoch.year(), 2015);
        assert_eq!(epoch.month(), 3);
        assert_eq!(epoch.day(), 20);
        assert_eq!(epoch.hour(), 4);
        assert_eq!(epoch.minute(), 15);
    }

    #[test]
    fn test_missing_and_unparseable_are_distinct() {
        let line = "2015-Mar-20 04:15 *m 10.5 n.a.";
        let record = EphemerisRecord::parse(line, &ColumnLayout::axis_table(), 7);

        match record.number(Column::Declination) {
            Err(SelenofieldError::DataParse { column, value, line }) => {
                assert_eq!(column, "DEC");
                assert_eq!(value, "n.a.");
                assert_eq!(line, 7);
            }
            other => panic!("expected DataParse, got {:?}", other),
        }

        assert!(matches!(
            record.number(Column::TargetRange),
            Err(SelenofieldError::DataMissing { line: 7, .. })
        ));
    }

    #[test]
    fn test_column_absent_from_layout_is_missing() {
        let record = EphemerisRecord::parse(AXIS_LINE, &ColumnLayout::axis_table(), 1);
        assert!(matches!(
            record.number(Column::AngularWidth),
            Err(SelenofieldError::DataMissing { .. })
        ));
        assert_eq!(record.optional_number(Column::AngularWidth).unwrap(), None);
    }

    #[test]
    fn test_optional_number_keeps_parse_errors() {
        let line = "2015-Mar-20 04:15 *m 10.5 5.0 384000.0 bogus";
        let record = EphemerisRecord::parse(line, &ColumnLayout::axis_table(), 1);
        assert!(matches!(
            record.optional_number(Column::TargetRangeRate),
            Err(SelenofieldError::DataParse { .. })
        ));
    }

    #[test]
    fn test_text_access() {
        let record = EphemerisRecord::parse(AXIS_LINE, &ColumnLayout::axis_table(), 1);
        assert_eq!(record.text(Column::Date).unwrap(), "2015-Mar-20");
        assert_eq!(record.text(Column::RightAscension).unwrap(), "10.50000");
    }

    #[test]
    fn test_bad_date_is_parse_error() {
        let line = "2015-Foo-20 04:15 *m 10.5 5.0 384000.0";
        let record = EphemerisRecord::parse(line, &ColumnLayout::axis_table(), 3);
        assert!(matches!(
            record.epoch(),
            Err(SelenofieldError::DataParse { line: 3, .. })
        ));
    }
}
