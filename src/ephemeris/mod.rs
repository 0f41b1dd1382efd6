//! Horizons ephemeris tables
//!
//! A table is consumed as a stream of [`EphemerisRecord`]s through the
//! [`RecordSource`] trait. Four synchronized sources (target, Moon center and
//! the two body-fixed axis points) are stepped together by [`EphemerisSet`].

pub mod layout;
pub mod reader;
pub mod record;
pub mod stepper;

pub use layout::{Column, ColumnLayout};
pub use reader::HorizonsReader;
pub use record::{EphemerisRecord, FieldError, FieldValue};
pub use stepper::{EphemerisSet, StepSamples};

use crate::SelenofieldError;

/// A forward-only sequence of ephemeris records
///
/// A source starts positioned on its first record. `advance` moves to the
/// next one and returns `false` once the data is exhausted, after which the
/// source is closed and has no current record. A source that closes because
/// reading failed keeps the failure for [`RecordSource::take_error`].
pub trait RecordSource {
    /// The record at the current position
    fn current(&self) -> Option<&EphemerisRecord>;

    /// Move to the next record
    fn advance(&mut self) -> bool;

    /// Whether the source has run out of records
    fn is_closed(&self) -> bool;

    /// Input line of the last line read
    fn line_number(&self) -> usize;

    /// The read error that closed the source, if any
    fn take_error(&mut self) -> Option<SelenofieldError> {
        None
    }
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn current(&self) -> Option<&EphemerisRecord> {
        (**self).current()
    }

    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn line_number(&self) -> usize {
        (**self).line_number()
    }

    fn take_error(&mut self) -> Option<SelenofieldError> {
        (**self).take_error()
    }
}
