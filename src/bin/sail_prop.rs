use std::path::{Path, PathBuf};

use anyhow::bail;
use clap::Parser;
use solar_core::acceleration::canonical_to_mm_s2;
use solar_core::time::canonical_to_days;
use solar_core::units::rad_to_deg;
use solar_core::velocity::canonical_to_km_s;
use solar_sail_calculator::config::{ScenarioConfig, load_scenario};
use solar_sail_calculator::dynamics::{
    R, SailParameters, THETA, V_R, V_T, characteristic_acceleration,
};
use solar_sail_calculator::export::summary::write_summary;
use solar_sail_calculator::scenario;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Propagate a solar sail through constant-attitude control segments"
)]
struct Cli {
    /// Scenario file (YAML list, TOML file, or directory of TOML files); built-in demo if omitted
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Scenario name to pick from the file (case-insensitive, defaults to the first)
    #[arg(long)]
    name: Option<String>,

    /// Override samples recorded per segment
    #[arg(long)]
    samples: Option<usize>,

    /// Keep integrating even if the radius leaves the valid domain
    #[arg(long, default_value_t = false)]
    no_radius_check: bool,

    /// Write every sample as CSV (`-` for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write a JSON summary sidecar (`-` for stdout)
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    solar_sail_calculator::init_tracing();
    let cli = Cli::parse();

    let mut scenario = match &cli.scenario {
        Some(path) => load_scenario(path, cli.name.as_deref())?,
        None => ScenarioConfig::default_demo(),
    };
    if let Some(samples) = cli.samples {
        scenario.samples_per_segment = samples;
    }
    let mut config = scenario.propagator_config();
    config.check_radius = !cli.no_radius_check;

    let stdout = Some(Path::new("-"));
    let csv_to_stdout = cli.csv.as_deref() == stdout;
    let summary_to_stdout = cli.summary.as_deref() == stdout;
    if csv_to_stdout && summary_to_stdout {
        bail!("--csv and --summary cannot both write to stdout");
    }

    let run = scenario::run_with(&scenario, config)?;

    if let Some(path) = &cli.csv {
        run.write_csv(path)?;
    }
    if let Some(path) = &cli.summary {
        write_summary(path, &run.summary())?;
    }
    if csv_to_stdout || summary_to_stdout {
        return Ok(());
    }

    println!("=== Sail Trajectory: {} ===", scenario.name);
    println!(
        "Sail           : beta = {:.4}, mu = {:.4}, {} segments x {} samples",
        scenario.sail.beta,
        scenario.sail.mu,
        run.trajectory.len(),
        scenario.samples_per_segment
    );
    let sail = SailParameters::new(scenario.sail.beta, scenario.sail.mu, 0.0);
    println!(
        "Char. accel.   : {:.4} mm/s^2 at 1 AU",
        canonical_to_mm_s2(characteristic_acceleration(&sail, 1.0))
    );
    for (seg, control) in run.trajectory.segments().iter().zip(&run.controls) {
        let (Some((t_start, y_start)), Some((t_end, y_end))) = (seg.first(), seg.last()) else {
            continue;
        };
        println!(
            "Segment        : angle = {:>8.3} deg, t = {:.3} -> {:.3}, r = {:.4} -> {:.4} AU",
            rad_to_deg(control.angle_rad),
            t_start,
            t_end,
            y_start[R],
            y_end[R]
        );
    }

    match (run.trajectory.final_state(), run.trajectory.end_time()) {
        (Some(y), Some(t)) => {
            println!(
                "Final state    : r = {:.6} AU, theta = {:.3} deg, v_r = {:.6}, v_t = {:.6}",
                y[R],
                rad_to_deg(y[THETA]),
                y[V_R],
                y[V_T]
            );
            println!(
                "Elapsed        : {:.3} TU ({:.1} days), speed = {:.3} km/s",
                t - scenario.t0,
                canonical_to_days(t - scenario.t0),
                canonical_to_km_s(y[V_R].hypot(y[V_T]))
            );
            if let Some(rmax) = run.trajectory.max_radius() {
                println!("Max radius     : {:.6} AU", rmax);
            }
        }
        _ => println!("No control segments: nothing to propagate"),
    }

    Ok(())
}
