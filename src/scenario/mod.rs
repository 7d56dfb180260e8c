//! Run configured scenarios through the propagator.

use std::path::Path;

use solar_config::{ConfigError, ScenarioConfig};
use solar_export::summary::TrajectorySummary;
use solar_export::trajectory::{write_csv, writer_for_path};
use solar_propagator::{
    ControlSegment, PropagationError, PropagatorConfig, SailPropagator, Trajectory,
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario configuration rejected: {0}")]
    Config(#[from] ConfigError),
    #[error("propagation failed: {0}")]
    Propagation(#[from] PropagationError),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// A propagated scenario together with the schedule that produced it.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub scenario: ScenarioConfig,
    pub controls: Vec<ControlSegment>,
    pub trajectory: Trajectory,
}

/// Validate and propagate a scenario with its own propagator settings.
pub fn run(scenario: &ScenarioConfig) -> Result<ScenarioRun, ScenarioError> {
    run_with(scenario, scenario.propagator_config())
}

/// Validate and propagate a scenario with explicit propagator settings.
pub fn run_with(
    scenario: &ScenarioConfig,
    config: PropagatorConfig,
) -> Result<ScenarioRun, ScenarioError> {
    scenario.validate()?;
    let controls = scenario.controls();
    info!(
        scenario = %scenario.name,
        beta = scenario.sail.beta,
        segments = controls.len(),
        "running scenario"
    );
    let trajectory = SailPropagator::new(scenario.sail.beta, scenario.sail.mu)
        .with_config(config)
        .run(scenario.initial_state(), scenario.t0, &controls)?;

    Ok(ScenarioRun {
        scenario: scenario.clone(),
        controls,
        trajectory,
    })
}

impl ScenarioRun {
    pub fn summary(&self) -> TrajectorySummary {
        TrajectorySummary::new(
            &self.scenario.name,
            self.scenario.sail.beta,
            self.scenario.sail.mu,
            &self.trajectory,
            &self.controls,
        )
    }

    /// Write every sample as CSV to `path` (`-` for stdout).
    pub fn write_csv(&self, path: &Path) -> Result<(), ScenarioError> {
        let mut writer = writer_for_path(path)?;
        write_csv(writer.as_mut(), &self.trajectory, &self.controls)?;
        Ok(())
    }
}
