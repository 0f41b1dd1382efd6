//! Lock-step iteration over the four ephemerides of a run

use log::warn;

use super::{EphemerisRecord, RecordSource};
use crate::catalogs::SurfaceFeatureCatalog;
use crate::config::GeometryConfig;
use crate::libration::{AxisSample, LibrationFrame};
use crate::observation::{ObservationFrame, ObservationSample};
use crate::{Result, SelenofieldError};

/// Target, center, equator-point and pole-point sources stepped together
pub struct EphemerisSet<S: RecordSource> {
    pub target: S,
    pub center: S,
    pub equator: S,
    pub pole: S,
}

/// Value snapshot of one step of an [`EphemerisSet`]
#[derive(Debug, Clone, PartialEq)]
pub struct StepSamples {
    pub observation: ObservationSample,
    pub center: AxisSample,
    pub equator: AxisSample,
    pub pole: AxisSample,
}

impl<S: RecordSource> EphemerisSet<S> {
    pub fn new(target: S, center: S, equator: S, pole: S) -> Self {
        Self {
            target,
            center,
            equator,
            pole,
        }
    }

    /// Advance every source by one record
    ///
    /// Returns `Ok(false)` once all sources are exhausted together. A source
    /// that ends before the others means the tables do not cover the same
    /// steps, which is reported as `DataMissing`. A source that stopped on a
    /// read error reports that error instead.
    pub fn advance(&mut self) -> Result<bool> {
        let moved = [
            self.target.advance(),
            self.center.advance(),
            self.equator.advance(),
            self.pole.advance(),
        ];

        for source in [
            &mut self.target,
            &mut self.center,
            &mut self.equator,
            &mut self.pole,
        ] {
            if let Some(err) = source.take_error() {
                return Err(err);
            }
        }

        if moved.iter().all(|&m| m) {
            Ok(true)
        } else if moved.iter().all(|&m| !m) {
            Ok(false)
        } else {
            let line = [&self.target, &self.center, &self.equator, &self.pole]
                .iter()
                .map(|source| source.line_number())
                .max()
                .unwrap_or(0);
            warn!(
                "Ephemerides out of step near line {} (target/center/equator/pole advanced: {:?})",
                line, moved
            );
            Err(SelenofieldError::DataMissing {
                column: "ephemerides out of step".to_string(),
                line,
            })
        }
    }

    /// Snapshot the current records of all four sources
    pub fn samples(&self) -> Result<StepSamples> {
        Ok(StepSamples {
            observation: ObservationSample::from_record(current(&self.target, "target")?)?,
            center: AxisSample::from_record(current(&self.center, "center")?)?,
            equator: AxisSample::from_record(current(&self.equator, "equator")?)?,
            pole: AxisSample::from_record(current(&self.pole, "pole")?)?,
        })
    }
}

fn current<'s, S: RecordSource>(source: &'s S, name: &str) -> Result<&'s EphemerisRecord> {
    source
        .current()
        .ok_or_else(|| SelenofieldError::DataMissing {
            column: format!("{} record", name),
            line: source.line_number(),
        })
}

impl StepSamples {
    /// Libration frame of this step
    pub fn libration(&self) -> Result<LibrationFrame> {
        LibrationFrame::from_samples(&self.center, &self.equator, &self.pole)
    }

    /// Observation frame of this step
    pub fn frame<'a>(
        &self,
        catalog: &'a SurfaceFeatureCatalog,
        config: &'a GeometryConfig,
    ) -> Result<ObservationFrame<'a>> {
        Ok(ObservationFrame::new(
            self.observation.clone(),
            self.libration()?,
            catalog,
            config,
        ))
    }
}
