//! Scenario models and loaders for the Solar Sail Calculator.
//!
//! Scenarios are authored in degrees and canonical heliocentric units (AU, mu = 1).
//! YAML files hold a list of scenarios; a `.toml` file holds exactly one; a
//! directory is scanned for `.toml` files in name order.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use solar_core::constants::MU_CANONICAL;
use solar_core::units::{deg_to_rad, rad_to_deg};
use solar_propagator::{
    ControlSegment, DEFAULT_SAMPLES_PER_SEGMENT, MAX_SAMPLES_PER_SEGMENT, PropagatorConfig,
};
use thiserror::Error;
use tracing::debug;

/// Sail properties shared by every control segment.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SailConfig {
    pub beta: f64,
    #[serde(default = "default_mu")]
    pub mu: f64,
}

/// Initial polar state; angles in degrees.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct InitialStateConfig {
    #[serde(default = "default_radius")]
    pub r: f64,
    #[serde(default)]
    pub theta_deg: f64,
    #[serde(default)]
    pub v_r: f64,
    #[serde(default = "default_tangential_speed")]
    pub v_t: f64,
}

impl Default for InitialStateConfig {
    fn default() -> Self {
        Self {
            r: default_radius(),
            theta_deg: 0.0,
            v_r: 0.0,
            v_t: default_tangential_speed(),
        }
    }
}

/// One constant-attitude control arc.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ControlConfig {
    pub angle_deg: f64,
    pub duration: f64,
}

/// A complete propagation scenario.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub name: String,
    pub sail: SailConfig,
    #[serde(default)]
    pub initial_state: InitialStateConfig,
    #[serde(default)]
    pub t0: f64,
    #[serde(default = "default_samples")]
    pub samples_per_segment: usize,
    #[serde(default)]
    pub controls: Vec<ControlConfig>,
}

fn default_mu() -> f64 {
    MU_CANONICAL
}

fn default_radius() -> f64 {
    1.0
}

fn default_tangential_speed() -> f64 {
    1.0
}

fn default_samples() -> usize {
    DEFAULT_SAMPLES_PER_SEGMENT
}

/// Errors that can occur while loading or validating scenarios.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("scenario '{scenario}' is invalid: {reason}")]
    Invalid { scenario: String, reason: String },
    #[error("scenario '{0}' not found")]
    NotFound(String),
    #[error("no scenarios found")]
    Empty,
}

impl ScenarioConfig {
    /// The interactive demo sail: three arcs raising, trimming, then coasting edge-on.
    pub fn default_demo() -> Self {
        let controls = [(0.6155, 5.0), (-0.6155, 2.0), (1.5707963, 1.0)]
            .into_iter()
            .map(|(angle_rad, duration)| ControlConfig {
                angle_deg: rad_to_deg(angle_rad),
                duration,
            })
            .collect();
        Self {
            name: "demo".to_string(),
            sail: SailConfig {
                beta: 0.1,
                mu: MU_CANONICAL,
            },
            initial_state: InitialStateConfig::default(),
            t0: 0.0,
            samples_per_segment: DEFAULT_SAMPLES_PER_SEGMENT,
            controls,
        }
    }

    /// Initial state `[r, theta, v_r, v_t]` with theta in radians.
    pub fn initial_state(&self) -> [f64; 4] {
        let s = &self.initial_state;
        [s.r, deg_to_rad(s.theta_deg), s.v_r, s.v_t]
    }

    /// Control schedule with attitudes converted to radians.
    pub fn controls(&self) -> Vec<ControlSegment> {
        self.controls
            .iter()
            .map(|c| ControlSegment::new(deg_to_rad(c.angle_deg), c.duration))
            .collect()
    }

    pub fn propagator_config(&self) -> PropagatorConfig {
        PropagatorConfig {
            samples_per_segment: self.samples_per_segment,
            ..PropagatorConfig::default()
        }
    }

    /// Check ranges the propagator cannot recover from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            scenario: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty".into()));
        }
        if !(self.sail.beta.is_finite() && self.sail.beta >= 0.0) {
            return Err(invalid(format!(
                "beta must be finite and non-negative (got {})",
                self.sail.beta
            )));
        }
        if !(self.sail.mu.is_finite() && self.sail.mu > 0.0) {
            return Err(invalid(format!(
                "mu must be finite and positive (got {})",
                self.sail.mu
            )));
        }
        let s = &self.initial_state;
        if !(s.r.is_finite() && s.r > 0.0) {
            return Err(invalid(format!(
                "initial radius must be finite and positive (got {})",
                s.r
            )));
        }
        if ![s.theta_deg, s.v_r, s.v_t, self.t0]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(invalid("initial state and t0 must be finite".into()));
        }
        if !(2..=MAX_SAMPLES_PER_SEGMENT).contains(&self.samples_per_segment) {
            return Err(invalid(format!(
                "samples_per_segment must be between 2 and {MAX_SAMPLES_PER_SEGMENT} (got {})",
                self.samples_per_segment
            )));
        }
        for (index, control) in self.controls.iter().enumerate() {
            if !control.angle_deg.is_finite() {
                return Err(invalid(format!("control {index}: angle must be finite")));
            }
            if !(control.duration.is_finite() && control.duration > 0.0) {
                return Err(invalid(format!(
                    "control {index}: duration must be finite and positive (got {})",
                    control.duration
                )));
            }
        }
        Ok(())
    }
}

/// Load every scenario from a YAML list, a single TOML file, or a directory of TOML files.
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<ScenarioConfig>, ConfigError> {
    let scenarios: Vec<ScenarioConfig> = load_records(path.as_ref())?;
    for scenario in &scenarios {
        scenario.validate()?;
    }
    Ok(scenarios)
}

/// Load scenarios from `path` and pick one by name (case-insensitive), defaulting to the first.
pub fn load_scenario<P: AsRef<Path>>(
    path: P,
    requested: Option<&str>,
) -> Result<ScenarioConfig, ConfigError> {
    let scenarios = load_scenarios(path)?;
    select(&scenarios, requested)
}

/// Select a scenario by optional name, defaulting to the first entry.
pub fn select(
    scenarios: &[ScenarioConfig],
    requested: Option<&str>,
) -> Result<ScenarioConfig, ConfigError> {
    let chosen = match requested {
        Some(name) => {
            let upper = name.to_uppercase();
            scenarios
                .iter()
                .find(|s| s.name.to_uppercase() == upper)
                .ok_or_else(|| ConfigError::NotFound(name.to_string()))?
        }
        None => scenarios.first().ok_or(ConfigError::Empty)?,
    };
    Ok(chosen.clone())
}

fn load_records<T>(path: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    debug!(path = %path.display(), "loading scenario records");
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        debug!(path = %path.display(), "loading scenario file");
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_matches_interactive_defaults() {
        let demo = ScenarioConfig::default_demo();
        demo.validate().expect("demo is valid");
        assert_eq!(demo.initial_state(), [1.0, 0.0, 0.0, 1.0]);
        let controls = demo.controls();
        assert_eq!(controls.len(), 3);
        assert!((controls[0].angle_rad - 0.6155).abs() < 1e-12);
        assert!((controls[1].angle_rad + 0.6155).abs() < 1e-12);
        assert!((controls[2].angle_rad - 1.5707963).abs() < 1e-12);
        let durations: Vec<f64> = controls.iter().map(|c| c.duration).collect();
        assert_eq!(durations, vec![5.0, 2.0, 1.0]);
        assert_eq!(demo.propagator_config().samples_per_segment, 100);
    }

    #[test]
    fn validation_rejects_bad_ranges() {
        let mut cfg = ScenarioConfig::default_demo();
        cfg.sail.mu = 0.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { .. })));

        let mut cfg = ScenarioConfig::default_demo();
        cfg.controls[1].duration = -2.0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("control 1"), "{err}");

        let mut cfg = ScenarioConfig::default_demo();
        cfg.samples_per_segment = 1;
        assert!(cfg.validate().is_err());

        let mut cfg = ScenarioConfig::default_demo();
        cfg.samples_per_segment = usize::MAX;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("samples_per_segment"), "{err}");

        let mut cfg = ScenarioConfig::default_demo();
        cfg.initial_state.r = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn select_is_case_insensitive() {
        let mut other = ScenarioConfig::default_demo();
        other.name = "Venus spiral".to_string();
        let scenarios = vec![ScenarioConfig::default_demo(), other];
        assert_eq!(select(&scenarios, None).unwrap().name, "demo");
        assert_eq!(
            select(&scenarios, Some("VENUS SPIRAL")).unwrap().name,
            "Venus spiral"
        );
        assert!(matches!(
            select(&scenarios, Some("mars")),
            Err(ConfigError::NotFound(_))
        ));
        assert!(matches!(select(&[], None), Err(ConfigError::Empty)));
    }
}
