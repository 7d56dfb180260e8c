//! Segmented propagation of a solar-sail trajectory under piecewise-constant attitude.
//!
//! Each control segment holds the sun-incidence angle fixed for its duration. The
//! propagator integrates the segments in order, seeding every segment with the
//! previous segment's final time and state, so position and velocity stay
//! continuous across attitude switches.

mod trajectory;

use solar_dynamics::{DynamicsError, PolarState, R, SailParameters, sail_derivative};
use solar_integrator::{IntegratorError, rk4};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use solar_dynamics as dynamics;
pub use trajectory::{Segment, Trajectory};

/// Samples recorded per segment unless configured otherwise.
pub const DEFAULT_SAMPLES_PER_SEGMENT: usize = 100;

/// Upper bound on samples per segment.
pub const MAX_SAMPLES_PER_SEGMENT: usize = 1_000_000;

/// Errors surfaced while propagating a control schedule.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PropagationError {
    #[error("control schedule has {angles} attitude angles but {durations} durations")]
    MismatchedControls { angles: usize, durations: usize },
    #[error("invalid propagation input: {0}")]
    InvalidInput(String),
    #[error("sail parameters rejected: {0}")]
    Dynamics(#[from] DynamicsError),
    #[error("integration failed: {0}")]
    Integrator(#[from] IntegratorError),
    #[error(
        "segment {segment} reached a singular radius at sample {sample} (t = {time}, r = {radius})"
    )]
    Singular {
        segment: usize,
        sample: usize,
        time: f64,
        radius: f64,
    },
}

/// One constant-attitude arc of the control schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSegment {
    /// Sun-incidence angle held over the segment (radians).
    pub angle_rad: f64,
    /// Segment length in time units.
    pub duration: f64,
}

impl ControlSegment {
    pub const fn new(angle_rad: f64, duration: f64) -> Self {
        Self {
            angle_rad,
            duration,
        }
    }
}

/// Tuning knobs for [`SailPropagator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagatorConfig {
    /// Samples per segment, endpoints included. Applied uniformly regardless of
    /// segment duration.
    pub samples_per_segment: usize,
    /// Fail with [`PropagationError::Singular`] once a sample leaves `r > 0`.
    pub check_radius: bool,
}

impl Default for PropagatorConfig {
    fn default() -> Self {
        Self {
            samples_per_segment: DEFAULT_SAMPLES_PER_SEGMENT,
            check_radius: true,
        }
    }
}

/// Propagates a sail of fixed lightness number around a central body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SailPropagator {
    pub beta: f64,
    pub mu: f64,
    pub config: PropagatorConfig,
}

impl SailPropagator {
    pub fn new(beta: f64, mu: f64) -> Self {
        Self {
            beta,
            mu,
            config: PropagatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PropagatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Integrate `controls` in order starting from `(t0, y0)`.
    ///
    /// An empty schedule yields an empty trajectory.
    pub fn run(
        &self,
        y0: PolarState,
        t0: f64,
        controls: &[ControlSegment],
    ) -> Result<Trajectory, PropagationError> {
        self.validate(&y0, t0, controls)?;

        let base = SailParameters::new(self.beta, self.mu, 0.0);
        let nt = self.config.samples_per_segment;
        let mut segments = Vec::with_capacity(controls.len());
        let mut t_start = t0;
        let mut y_start = y0;

        for (index, control) in controls.iter().enumerate() {
            let t_end = t_start + control.duration;
            debug!(
                segment = index,
                angle_rad = control.angle_rad,
                duration = control.duration,
                samples = nt,
                "propagating control segment"
            );

            let params = base.with_attitude(control.angle_rad);
            let history = rk4(sail_derivative, y_start, t_start, t_end, nt, &params)?;

            if self.config.check_radius {
                check_segment(index, &history)?;
            }

            if let Some(last) = history.states.last() {
                y_start = *last;
            }
            t_start = t_end;
            segments.push(history);
        }

        let trajectory = Trajectory::new(segments);
        info!(
            segments = trajectory.len(),
            end_time = trajectory.end_time().unwrap_or(t0),
            final_radius = trajectory.final_state().map(|y| y[R]).unwrap_or(y0[R]),
            "sail propagation complete"
        );
        Ok(trajectory)
    }

    fn validate(
        &self,
        y0: &PolarState,
        t0: f64,
        controls: &[ControlSegment],
    ) -> Result<(), PropagationError> {
        SailParameters::new(self.beta, self.mu, 0.0).validate()?;

        if self.config.samples_per_segment < 2 {
            return Err(IntegratorError::TooFewSamples(self.config.samples_per_segment).into());
        }
        if self.config.samples_per_segment > MAX_SAMPLES_PER_SEGMENT {
            return Err(PropagationError::InvalidInput(format!(
                "at most {MAX_SAMPLES_PER_SEGMENT} samples per segment are supported (got {})",
                self.config.samples_per_segment
            )));
        }
        if !t0.is_finite() {
            return Err(PropagationError::InvalidInput(format!(
                "start time must be finite (got {t0})"
            )));
        }
        if let Some(value) = y0.iter().find(|v| !v.is_finite()) {
            return Err(PropagationError::InvalidInput(format!(
                "initial state components must be finite (got {value} in {y0:?})"
            )));
        }
        for (index, control) in controls.iter().enumerate() {
            if !control.angle_rad.is_finite() {
                return Err(PropagationError::InvalidInput(format!(
                    "segment {index}: attitude angle must be finite (got {})",
                    control.angle_rad
                )));
            }
            if !(control.duration.is_finite() && control.duration > 0.0) {
                return Err(PropagationError::InvalidInput(format!(
                    "segment {index}: duration must be finite and positive (got {})",
                    control.duration
                )));
            }
        }
        Ok(())
    }
}

fn check_segment(index: usize, history: &Segment) -> Result<(), PropagationError> {
    for (sample, (time, state)) in history.iter().enumerate() {
        if solar_dynamics::check_radius(state).is_err() {
            warn!(
                segment = index,
                sample,
                time,
                radius = state[R],
                "trajectory left the valid radius domain"
            );
            return Err(PropagationError::Singular {
                segment: index,
                sample,
                time,
                radius: state[R],
            });
        }
    }
    Ok(())
}

/// Propagate a sail trajectory from parallel attitude and duration schedules.
///
/// `angles[i]` (radians) is held for `durations[i]`. The two slices must have the
/// same length; each segment is sampled [`DEFAULT_SAMPLES_PER_SEGMENT`] times.
pub fn propagate(
    beta: f64,
    mu: f64,
    y0: PolarState,
    t0: f64,
    angles: &[f64],
    durations: &[f64],
) -> Result<Trajectory, PropagationError> {
    let controls = zip_controls(angles, durations)?;
    SailPropagator::new(beta, mu).run(y0, t0, &controls)
}

/// Pair attitude angles with durations, rejecting schedules of unequal length.
pub fn zip_controls(
    angles: &[f64],
    durations: &[f64],
) -> Result<Vec<ControlSegment>, PropagationError> {
    if angles.len() != durations.len() {
        return Err(PropagationError::MismatchedControls {
            angles: angles.len(),
            durations: durations.len(),
        });
    }
    Ok(angles
        .iter()
        .zip(durations)
        .map(|(&angle_rad, &duration)| ControlSegment::new(angle_rad, duration))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_schedules_fail_fast() {
        let err = zip_controls(&[0.1, 0.2], &[1.0]).unwrap_err();
        assert_eq!(
            err,
            PropagationError::MismatchedControls {
                angles: 2,
                durations: 1
            }
        );
    }

    #[test]
    fn invalid_durations_are_rejected() {
        let propagator = SailPropagator::new(0.1, 1.0);
        for duration in [0.0, -1.0, f64::NAN] {
            let err = propagator
                .run([1.0, 0.0, 0.0, 1.0], 0.0, &[ControlSegment::new(0.0, duration)])
                .unwrap_err();
            assert!(matches!(err, PropagationError::InvalidInput(_)), "{err}");
        }
    }

    #[test]
    fn too_few_samples_surface_integrator_error() {
        let config = PropagatorConfig {
            samples_per_segment: 1,
            ..Default::default()
        };
        let err = SailPropagator::new(0.1, 1.0)
            .with_config(config)
            .run([1.0, 0.0, 0.0, 1.0], 0.0, &[])
            .unwrap_err();
        assert_eq!(err, PropagationError::Integrator(IntegratorError::TooFewSamples(1)));
    }

    #[test]
    fn non_finite_sail_parameters_are_rejected() {
        let err = propagate(f64::NAN, 1.0, [1.0, 0.0, 0.0, 1.0], 0.0, &[], &[]).unwrap_err();
        assert!(matches!(
            err,
            PropagationError::Dynamics(DynamicsError::NonFinite { name: "beta", .. })
        ));
        let err = propagate(0.1, 1.0, [1.0, f64::INFINITY, 0.0, 1.0], 0.0, &[], &[]).unwrap_err();
        assert!(matches!(err, PropagationError::InvalidInput(_)));
    }
}
