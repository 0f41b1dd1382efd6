//! Limb finding
//!
//! Starting at a feature, slide along one sky axis until the slit (of the
//! given field of view) just touches the lunar disk edge. The edge is where
//! the angular distance from the disk center equals half the disk width plus
//! half the field of view.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{LimbDirection, ObservationFrame};
use crate::constants::ASEC_PER_DEG;
use crate::coordinates::SkyPosition;
use crate::{Result, SelenofieldError};

/// Result of a limb search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimbSolution {
    /// Sky position of the slit center on the limb
    pub position: SkyPosition,
    /// Final residual, `cos(separation) - cos(threshold)`
    pub residual: f64,
    /// Coarse steps taken before the sign change
    pub bracket_steps: usize,
    /// Bisection iterations used
    pub bisections: usize,
}

impl<'a> ObservationFrame<'a> {
    /// Cosine of the center-to-slit separation at which the slit touches the limb
    pub fn limb_threshold(&self, fov_arcsec: f64) -> f64 {
        let half_angle = (fov_arcsec + self.sample.angular_width_arcsec) / 2.0 / ASEC_PER_DEG;
        half_angle.to_radians().cos()
    }

    /// Limb position reached from a named feature
    pub fn limb_of(
        &self,
        name: &str,
        direction: LimbDirection,
        fov_arcsec: f64,
    ) -> Result<LimbSolution> {
        let start = self.geocentric_of(name)?;
        self.limb_from(start, direction, fov_arcsec)
    }

    /// Limb position reached from an arbitrary sky position
    ///
    /// Steps outward in fixed increments until the residual changes sign,
    /// then bisects the bracket. Fails with `RootNotBracketed` when no sign
    /// change occurs within the step budget (the start is already off the
    /// disk) and with `LimbNotConverged` when bisection runs out.
    pub fn limb_from(
        &self,
        start: SkyPosition,
        direction: LimbDirection,
        fov_arcsec: f64,
    ) -> Result<LimbSolution> {
        let config = self.config;
        let center_hat = self.sample.position().normalize().ok_or_else(|| {
            SelenofieldError::DegenerateFrame("target range is zero".to_string())
        })?;
        let cos_threshold = self.limb_threshold(fov_arcsec);

        let varies_dec = direction.varies_declination();
        let place = |coord: f64| {
            if varies_dec {
                SkyPosition::new(start.ra_deg, coord)
            } else {
                SkyPosition::new(coord, start.dec_deg)
            }
        };
        let residual = |coord: f64| place(coord).unit_vector().dot(&center_hat) - cos_threshold;
        let solution = |coord: f64, residual: f64, bracket_steps: usize, bisections: usize| {
            debug!(
                "{} limb found after {} steps and {} bisections (residual {:.2e})",
                direction, bracket_steps, bisections, residual
            );
            LimbSolution {
                position: place(coord),
                residual,
                bracket_steps,
                bisections,
            }
        };

        let origin = if varies_dec { start.dec_deg } else { start.ra_deg };
        let step = config.limb_step_deg * direction.sign();

        let mut inner = origin;
        let mut inner_residual = residual(inner);
        if inner_residual.abs() < config.limb_tolerance {
            return Ok(solution(inner, inner_residual, 0, 0));
        }

        let mut outer = None;
        for steps in 1..=config.max_bracket_steps {
            let candidate = origin + step * steps as f64;
            let candidate_residual = residual(candidate);

            if candidate_residual.abs() < config.limb_tolerance {
                return Ok(solution(candidate, candidate_residual, steps, 0));
            }
            if candidate_residual.signum() != inner_residual.signum() {
                outer = Some((candidate, steps));
                break;
            }

            inner = candidate;
            inner_residual = candidate_residual;
        }

        let (mut outer, bracket_steps) = outer.ok_or_else(|| {
            debug!(
                "{} limb not bracketed within {} steps",
                direction, config.max_bracket_steps
            );
            SelenofieldError::RootNotBracketed {
                direction: direction.to_string(),
                steps: config.max_bracket_steps,
            }
        })?;

        for iteration in 1..=config.max_bisections {
            let mid = 0.5 * (inner + outer);
            let mid_residual = residual(mid);

            if mid_residual.abs() < config.limb_tolerance {
                return Ok(solution(mid, mid_residual, bracket_steps, iteration));
            }
            if mid_residual.signum() == inner_residual.signum() {
                inner = mid;
                inner_residual = mid_residual;
            } else {
                outer = mid;
            }
        }

        Err(SelenofieldError::LimbNotConverged {
            iterations: config.max_bisections,
            residual: inner_residual,
        })
    }
}
