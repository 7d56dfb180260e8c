use solar_dynamics::{PolarState, R};
use solar_integrator::TimeHistory;

/// Time history of a single control segment.
pub type Segment = TimeHistory<4>;

/// Ordered per-segment time histories produced by one propagation run.
///
/// Segment `i + 1` starts at exactly the time and state segment `i` ends with, so
/// boundary samples appear twice when iterating over [`Trajectory::samples`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    segments: Vec<Segment>,
}

impl Trajectory {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// Number of control segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// State at the end of the last segment.
    pub fn final_state(&self) -> Option<PolarState> {
        self.segments
            .last()
            .and_then(|seg| seg.states.last())
            .copied()
    }

    /// Time at the end of the last segment.
    pub fn end_time(&self) -> Option<f64> {
        self.segments
            .last()
            .and_then(|seg| seg.times.last())
            .copied()
    }

    /// Largest radius reached anywhere along the trajectory.
    pub fn max_radius(&self) -> Option<f64> {
        self.samples()
            .map(|(_, _, y)| y[R])
            .fold(None, |acc, r| Some(acc.map_or(r, |m: f64| m.max(r))))
    }

    /// Every sample as `(segment_index, t, state)` in propagation order.
    pub fn samples(&self) -> impl Iterator<Item = (usize, f64, &PolarState)> + '_ {
        self.segments
            .iter()
            .enumerate()
            .flat_map(|(index, seg)| seg.iter().map(move |(t, y)| (index, t, y)))
    }
}
