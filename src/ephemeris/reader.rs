//! Line-oriented reader for Horizons observer-table text
//!
//! Everything before the `$$SOE` marker is header and is skipped. Records are
//! read one line at a time until `$$EOE` or end of input, at which point the
//! reader closes itself.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Lines};
use std::path::Path;

use log::{debug, warn};

use super::layout::ColumnLayout;
use super::record::EphemerisRecord;
use super::RecordSource;
use crate::{Result, SelenofieldError};

/// Start-of-ephemeris marker
pub const START_MARKER: &str = "$$SOE";
/// End-of-ephemeris marker
pub const END_MARKER: &str = "$$EOE";

/// Streaming reader over one Horizons table
pub struct HorizonsReader<R: BufRead> {
    lines: Lines<R>,
    layout: ColumnLayout,
    line_number: usize,
    current: Option<EphemerisRecord>,
    closed: bool,
    error: Option<SelenofieldError>,
}

impl HorizonsReader<BufReader<File>> {
    /// Open a table file
    pub fn from_path<P: AsRef<Path>>(path: P, layout: ColumnLayout) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening {} table {}", layout.name(), path.display());
        let file = File::open(path)?;
        Self::new(BufReader::new(file), layout)
    }
}

impl HorizonsReader<Cursor<String>> {
    /// Read a table already held in memory
    pub fn from_text(text: String, layout: ColumnLayout) -> Result<Self> {
        Self::new(Cursor::new(text), layout)
    }
}

impl<R: BufRead> HorizonsReader<R> {
    /// Skip the header and load the first record
    ///
    /// Fails with `InvalidFormat` when there is no `$$SOE` marker or no data
    /// line follows it.
    pub fn new(reader: R, layout: ColumnLayout) -> Result<Self> {
        let mut lines = reader.lines();
        let mut line_number = 0;

        loop {
            match lines.next() {
                Some(line) => {
                    line_number += 1;
                    if line?.trim() == START_MARKER {
                        break;
                    }
                }
                None => {
                    return Err(SelenofieldError::InvalidFormat(format!(
                        "no {} marker in {} table",
                        START_MARKER,
                        layout.name()
                    )))
                }
            }
        }

        let mut reader = Self {
            lines,
            layout,
            line_number,
            current: None,
            closed: false,
            error: None,
        };

        match reader.next_data_line()? {
            Some(text) => {
                reader.current = Some(reader.parse(&text));
                Ok(reader)
            }
            None => Err(SelenofieldError::InvalidFormat(format!(
                "{} table contains no lines of ephemeris data",
                reader.layout.name()
            ))),
        }
    }

    /// Layout used to parse records
    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    fn parse(&self, text: &str) -> EphemerisRecord {
        EphemerisRecord::parse(text, &self.layout, self.line_number)
    }

    /// Next line between the markers, or `None` once the data ends
    fn next_data_line(&mut self) -> Result<Option<String>> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with(END_MARKER) {
                return Ok(None);
            }
            if trimmed.contains("Daylight Cut-off") {
                debug!("Skipping daylight cut-off line {}", self.line_number);
                continue;
            }
            return Ok(Some(line));
        }
        Ok(None)
    }

    fn close(&mut self) {
        if !self.closed {
            debug!(
                "Closing {} table after line {}",
                self.layout.name(),
                self.line_number
            );
        }
        self.closed = true;
        self.current = None;
    }
}

impl<R: BufRead> RecordSource for HorizonsReader<R> {
    fn current(&self) -> Option<&EphemerisRecord> {
        self.current.as_ref()
    }

    fn advance(&mut self) -> bool {
        if self.closed {
            return false;
        }

        match self.next_data_line() {
            Ok(Some(text)) => {
                self.current = Some(self.parse(&text));
                true
            }
            Ok(None) => {
                self.close();
                false
            }
            Err(err) => {
                warn!(
                    "Read error in {} table after line {}: {}",
                    self.layout.name(),
                    self.line_number,
                    err
                );
                self.error = Some(err);
                self.close();
                false
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn line_number(&self) -> usize {
        self.line_number
    }

    fn take_error(&mut self) -> Option<SelenofieldError> {
        self.error.take()
    }
}
