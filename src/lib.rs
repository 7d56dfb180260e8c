//! Solar sail trajectory propagation.
//!
//! The numerical core lives in the workspace crates re-exported here: the planar
//! sail equations of motion, a fixed-step RK4 integrator and the segmented
//! propagator that chains constant-attitude arcs. This crate adds scenario
//! running and the command-line front-ends.

pub mod scenario;

pub use solar_config as config;
pub use solar_dynamics as dynamics;
pub use solar_export as export;
pub use solar_integrator as integrator;
pub use solar_propagator as propagator;

use tracing_subscriber::EnvFilter;

/// Install a stderr `tracing` subscriber honouring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
