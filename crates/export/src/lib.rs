//! Export helpers for CSV and JSON artifacts.

/// Project a polar position onto the ecliptic plane.
#[inline]
pub fn project_to_cartesian(r: f64, theta: f64) -> (f64, f64) {
    let (s, c) = theta.sin_cos();
    (r * c, r * s)
}

pub mod trajectory {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    use solar_core::units::rad_to_deg;
    use solar_propagator::{ControlSegment, Trajectory};

    use super::project_to_cartesian;

    pub const HEADER: &str = "segment,time,r,theta,v_r,v_t,x,y,angle_deg";

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// Write the trajectory CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// CSV row emitted for each trajectory sample.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Record {
        pub segment: usize,
        pub time: f64,
        pub state: [f64; 4],
        pub angle_deg: f64,
    }

    impl Record {
        /// Serialize the record to CSV, matching the header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            let [r, theta, v_r, v_t] = self.state;
            let (x, y) = project_to_cartesian(r, theta);
            writeln!(
                writer,
                "{},{:.9},{:.12},{:.12},{:.12},{:.12},{:.12},{:.12},{:.6}",
                self.segment, self.time, r, theta, v_r, v_t, x, y, self.angle_deg,
            )
        }
    }

    /// Flatten a trajectory into CSV records, tagging each with its segment attitude.
    pub fn records<'a>(
        trajectory: &'a Trajectory,
        controls: &'a [ControlSegment],
    ) -> impl Iterator<Item = Record> + 'a {
        trajectory.samples().map(move |(segment, time, state)| Record {
            segment,
            time,
            state: *state,
            angle_deg: controls
                .get(segment)
                .map(|c| rad_to_deg(c.angle_rad))
                .unwrap_or(f64::NAN),
        })
    }

    /// Write the header and every sample of `trajectory`.
    pub fn write_csv(
        writer: &mut dyn Write,
        trajectory: &Trajectory,
        controls: &[ControlSegment],
    ) -> io::Result<()> {
        write_header(writer)?;
        for record in records(trajectory, controls) {
            record.write_to(writer)?;
        }
        writer.flush()
    }
}

pub mod summary {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::io::{self, Write};
    use std::path::Path;

    use solar_core::units::rad_to_deg;
    use solar_propagator::{ControlSegment, Trajectory};

    use super::trajectory::writer_for_path;

    /// Start and end of one propagated control segment.
    #[derive(Debug, Clone, Serialize, PartialEq)]
    pub struct SegmentSummary {
        pub index: usize,
        pub angle_deg: f64,
        pub duration: f64,
        pub start_time: f64,
        pub end_time: f64,
        pub start_radius: f64,
        pub end_radius: f64,
        pub samples: usize,
    }

    /// Envelope written to the JSON sidecar.
    #[derive(Debug, Clone, Serialize, PartialEq)]
    pub struct TrajectorySummary {
        pub scenario: String,
        pub beta: f64,
        pub mu: f64,
        pub segments: Vec<SegmentSummary>,
        pub final_state: Option<[f64; 4]>,
        pub end_time: Option<f64>,
        pub max_radius: Option<f64>,
    }

    impl TrajectorySummary {
        pub fn new(
            scenario: &str,
            beta: f64,
            mu: f64,
            trajectory: &Trajectory,
            controls: &[ControlSegment],
        ) -> Self {
            let segments = trajectory
                .segments()
                .iter()
                .zip(controls)
                .enumerate()
                .filter_map(|(index, (seg, control))| {
                    let (start_time, start) = seg.first()?;
                    let (end_time, end) = seg.last()?;
                    Some(SegmentSummary {
                        index,
                        angle_deg: rad_to_deg(control.angle_rad),
                        duration: control.duration,
                        start_time,
                        end_time,
                        start_radius: start[0],
                        end_radius: end[0],
                        samples: seg.len(),
                    })
                })
                .collect();

            Self {
                scenario: scenario.to_string(),
                beta,
                mu,
                segments,
                final_state: trajectory.final_state(),
                end_time: trajectory.end_time(),
                max_radius: trajectory.max_radius(),
            }
        }
    }

    /// Write the summary as pretty-printed JSON to `path` (`-` for stdout).
    pub fn write_summary(path: &Path, summary: &TrajectorySummary) -> io::Result<()> {
        let mut writer = writer_for_path(path)?;
        to_writer_pretty(&mut writer, summary)?;
        writeln!(writer)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_propagator::{ControlSegment, SailPropagator};

    fn sample_run() -> (solar_propagator::Trajectory, Vec<ControlSegment>) {
        let controls = vec![ControlSegment::new(0.5, 1.0), ControlSegment::new(-0.5, 0.5)];
        let traj = SailPropagator::new(0.1, 1.0)
            .run([1.0, 0.0, 0.0, 1.0], 0.0, &controls)
            .expect("propagation");
        (traj, controls)
    }

    #[test]
    fn projection_follows_polar_angle() {
        let (x, y) = project_to_cartesian(2.0, std::f64::consts::FRAC_PI_2);
        assert!(x.abs() < 1e-15);
        assert!((y - 2.0).abs() < 1e-15);
    }

    #[test]
    fn csv_has_one_row_per_sample() {
        let (traj, controls) = sample_run();
        let mut buf = Vec::new();
        trajectory::write_csv(&mut buf, &traj, &controls).expect("csv");
        let text = String::from_utf8(buf).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(trajectory::HEADER));
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), 200);
        assert!(rows[0].starts_with("0,0.000000000,1.000000000000,0.000000000000"));
        assert!(rows[199].starts_with("1,1.500000000,"));
        assert!(rows[199].ends_with(",-28.647890"));
    }

    #[test]
    fn summary_serializes_segment_boundaries() {
        let (traj, controls) = sample_run();
        let summary = summary::TrajectorySummary::new("unit", 0.1, 1.0, &traj, &controls);
        assert_eq!(summary.segments.len(), 2);
        assert_eq!(summary.segments[0].end_time, summary.segments[1].start_time);
        assert_eq!(summary.segments[0].end_radius, summary.segments[1].start_radius);
        assert_eq!(summary.end_time, Some(1.5));

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("summary.json");
        summary::write_summary(&path, &summary).expect("write json");
        let value: serde_json::Value =
            serde_json::from_reader(std::fs::File::open(&path).expect("open")).expect("parse");
        assert_eq!(value["scenario"], "unit");
        assert_eq!(value["segments"].as_array().map(|a| a.len()), Some(2));
        assert_eq!(value["final_state"].as_array().map(|a| a.len()), Some(4));
    }
}
