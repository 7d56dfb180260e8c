//! Fixed-step classical fourth-order Runge-Kutta integration.
//!
//! The solver is dimension-agnostic: states are `[f64; N]` arrays and the
//! derivative is any function `f(t, y, params) -> dy/dt`. An opaque parameter
//! value is threaded through every evaluation unchanged, so one derivative
//! function can serve many control settings.

use thiserror::Error;

/// Errors raised when the requested sampling cannot be integrated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntegratorError {
    #[error("at least 2 samples are required to span an interval, got {0}")]
    TooFewSamples(usize),
    #[error("integration interval must be finite (t0 = {t0}, tf = {tf})")]
    NonFiniteInterval { t0: f64, tf: f64 },
    #[error("cannot allocate storage for {0} samples")]
    SampleAllocation(usize),
}

/// Uniformly sampled solution of an initial value problem.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeHistory<const N: usize> {
    pub times: Vec<f64>,
    pub states: Vec<[f64; N]>,
}

impl<const N: usize> TimeHistory<N> {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// First `(t, y)` sample.
    pub fn first(&self) -> Option<(f64, &[f64; N])> {
        Some((*self.times.first()?, self.states.first()?))
    }

    /// Last `(t, y)` sample.
    pub fn last(&self) -> Option<(f64, &[f64; N])> {
        Some((*self.times.last()?, self.states.last()?))
    }

    /// Spacing between consecutive samples, if there are at least two.
    pub fn step_size(&self) -> Option<f64> {
        match self.times.as_slice() {
            [t0, t1, ..] => Some(t1 - t0),
            _ => None,
        }
    }

    /// Iterate over index-aligned `(t, y)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &[f64; N])> + '_ {
        self.times.iter().copied().zip(self.states.iter())
    }
}

#[inline]
fn offset<const N: usize>(y: &[f64; N], k: &[f64; N], scale: f64) -> [f64; N] {
    let mut out = *y;
    for (o, ki) in out.iter_mut().zip(k) {
        *o += scale * ki;
    }
    out
}

/// Advance `y` from `t` by one classical RK4 step of size `h`.
pub fn rk4_step<const N: usize, P, F>(f: &F, t: f64, y: &[f64; N], h: f64, params: &P) -> [f64; N]
where
    F: Fn(f64, &[f64; N], &P) -> [f64; N],
{
    let half = h / 2.0;
    let k1 = f(t, y, params);
    let k2 = f(t + half, &offset(y, &k1, half), params);
    let k3 = f(t + half, &offset(y, &k2, half), params);
    let k4 = f(t + h, &offset(y, &k3, h), params);

    let mut next = *y;
    for i in 0..N {
        next[i] = y[i] + 1.0 / 6.0 * h * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    next
}

/// Integrate `dy/dt = f(t, y, params)` from `t0` to `tf` and return `nt` uniform samples.
///
/// Sample 0 is exactly `(t0, y0)`; every later sample is produced by one RK4 step
/// of size `h = (tf - t0) / (nt - 1)` from its predecessor, and the last recorded
/// time is exactly `tf`. `tf < t0` integrates backwards.
///
/// Because the last time is pinned to `tf`, the final spacing may differ from `h`
/// by an ulp; [`TimeHistory::step_size`] reports the first spacing.
///
/// # Errors
/// [`IntegratorError::TooFewSamples`] when `nt < 2`,
/// [`IntegratorError::NonFiniteInterval`] when either endpoint is NaN or infinite and
/// [`IntegratorError::SampleAllocation`] when `nt` samples cannot be stored.
pub fn rk4<const N: usize, P, F>(
    f: F,
    y0: [f64; N],
    t0: f64,
    tf: f64,
    nt: usize,
    params: &P,
) -> Result<TimeHistory<N>, IntegratorError>
where
    F: Fn(f64, &[f64; N], &P) -> [f64; N],
{
    if nt < 2 {
        return Err(IntegratorError::TooFewSamples(nt));
    }
    if !t0.is_finite() || !tf.is_finite() {
        return Err(IntegratorError::NonFiniteInterval { t0, tf });
    }

    let h = (tf - t0) / (nt - 1) as f64;
    let mut times = Vec::new();
    let mut states = Vec::new();
    times
        .try_reserve_exact(nt)
        .and_then(|()| states.try_reserve_exact(nt))
        .map_err(|_| IntegratorError::SampleAllocation(nt))?;
    times.push(t0);
    states.push(y0);

    let mut t = t0;
    let mut y = y0;
    for _ in 1..nt {
        y = rk4_step(&f, t, &y, h, params);
        t += h;
        times.push(t);
        states.push(y);
    }
    // Accumulated steps can miss tf by an ulp; chained intervals need the exact endpoint.
    if let Some(end) = times.last_mut() {
        *end = tf;
    }

    Ok(TimeHistory { times, states })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_step_matches_exponential_to_fifth_order() {
        let f = |_t: f64, y: &[f64; 1], _: &()| [y[0]];
        let h = 0.1;
        let y = rk4_step(&f, 0.0, &[1.0], h, &());
        // RK4 reproduces the Taylor series of exp(h) through h^4.
        let taylor = 1.0 + h + h * h / 2.0 + h.powi(3) / 6.0 + h.powi(4) / 24.0;
        assert!((y[0] - taylor).abs() < 1e-14);
    }

    #[test]
    fn accessors_report_endpoints() {
        let hist = rk4(|_, _: &[f64; 2], _: &()| [0.0, 0.0], [3.0, 4.0], 1.0, 2.0, 5, &()).unwrap();
        assert_eq!(hist.len(), 5);
        assert!(!hist.is_empty());
        assert_eq!(hist.first(), Some((1.0, &[3.0, 4.0])));
        assert_eq!(hist.last().map(|(t, _)| t), Some(2.0));
        assert_eq!(hist.step_size(), Some(0.25));
        assert_eq!(hist.iter().count(), 5);
    }

    #[test]
    fn rejects_non_finite_interval() {
        let err = rk4(|_, _: &[f64; 1], _: &()| [0.0], [0.0], 0.0, f64::NAN, 10, &()).unwrap_err();
        assert!(matches!(err, IntegratorError::NonFiniteInterval { .. }));
    }

    #[test]
    fn unallocatable_sample_count_is_an_error() {
        let err =
            rk4(|_, _: &[f64; 1], _: &()| [0.0], [0.0], 0.0, 1.0, usize::MAX, &()).unwrap_err();
        assert_eq!(err, IntegratorError::SampleAllocation(usize::MAX));
    }
}
