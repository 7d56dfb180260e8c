//! Planar solar-sail dynamics in heliocentric polar coordinates.
//!
//! The state is `(r, theta, v_r, v_t)`: radius, polar angle, radial velocity and
//! tangential velocity. The sail is a flat ideal reflector whose normal makes the
//! sun-incidence angle `sia` with the sun-line, so the radiation-pressure
//! acceleration scales with `beta * mu / r^2 * cos(sia)^2` and points along the
//! sail normal.

use thiserror::Error;

/// Polar state vector `[r, theta, v_r, v_t]`.
pub type PolarState = [f64; 4];

/// Index of the radial distance in a [`PolarState`].
pub const R: usize = 0;
/// Index of the polar angle in a [`PolarState`].
pub const THETA: usize = 1;
/// Index of the radial velocity in a [`PolarState`].
pub const V_R: usize = 2;
/// Index of the tangential velocity in a [`PolarState`].
pub const V_T: usize = 3;

/// Errors reported by the optional dynamics checks.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DynamicsError {
    #[error("sail parameter '{name}' must be finite (got {value})")]
    NonFinite { name: &'static str, value: f64 },
    #[error("radial distance must be finite and positive (got {0})")]
    SingularRadius(f64),
}

/// Sail and central-body parameters for one constant-attitude segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SailParameters {
    /// Lightness number: radiation-pressure over gravitational acceleration.
    pub beta: f64,
    /// Gravitational parameter of the central body.
    pub mu: f64,
    /// Sun-incidence angle of the sail normal (radians).
    pub sia: f64,
}

impl SailParameters {
    /// Reference values: a light sail face-on to the Sun in canonical units.
    pub const DEFAULT: SailParameters = SailParameters {
        beta: 0.01,
        mu: 1.0,
        sia: 0.0,
    };

    pub const fn new(beta: f64, mu: f64, sia: f64) -> Self {
        Self { beta, mu, sia }
    }

    /// Same sail and central body, different attitude.
    pub const fn with_attitude(self, sia: f64) -> Self {
        Self { sia, ..self }
    }

    /// Reject NaN or infinite parameters.
    pub fn validate(&self) -> Result<(), DynamicsError> {
        for (name, value) in [("beta", self.beta), ("mu", self.mu), ("sia", self.sia)] {
            if !value.is_finite() {
                return Err(DynamicsError::NonFinite { name, value });
            }
        }
        Ok(())
    }
}

impl Default for SailParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Time derivative of the polar sail state.
///
/// `t` is ignored (the dynamics are autonomous) but kept so the function plugs
/// straight into `solar_integrator::rk4`.
///
/// The radius must be non-zero. This is not checked: a zero radius yields
/// non-finite components that propagate through the integration. Use
/// [`check_radius`] where a hard failure is preferred.
pub fn sail_derivative(_t: f64, y: &PolarState, params: &SailParameters) -> PolarState {
    let r = y[R];
    let v_r = y[V_R];
    let v_t = y[V_T];
    let SailParameters { beta, mu, sia } = *params;
    let (si, co) = sia.sin_cos();
    let r2 = r * r;

    [
        v_r,
        v_t / r,
        v_t * v_t / r + mu * (beta * co * co * co.abs() - 1.0) / r2,
        mu * beta * co * co * si / r2 - v_r * v_t / r,
    ]
}

/// Fail with [`DynamicsError::SingularRadius`] unless `r` is finite and positive.
pub fn check_radius(y: &PolarState) -> Result<(), DynamicsError> {
    let r = y[R];
    if r.is_finite() && r > 0.0 {
        Ok(())
    } else {
        Err(DynamicsError::SingularRadius(r))
    }
}

/// Magnitude of the radiation-pressure acceleration at radius `r`.
pub fn characteristic_acceleration(params: &SailParameters, r: f64) -> f64 {
    let co = params.sia.cos();
    params.beta * params.mu / (r * r) * co * co
}

/// Specific orbital energy `v^2 / 2 - mu / r` of a polar state.
pub fn specific_energy(y: &PolarState, mu: f64) -> f64 {
    0.5 * (y[V_R] * y[V_R] + y[V_T] * y[V_T]) - mu / y[R]
}

/// Specific angular momentum `r * v_t` of a polar state.
pub fn angular_momentum(y: &PolarState) -> f64 {
    y[R] * y[V_T]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn zero_incidence_reduces_to_effective_gravity() {
        let params = SailParameters::new(0.2, 1.5, 0.0);
        let y = [2.0, 0.3, 0.1, 0.8];
        let d = sail_derivative(0.0, &y, &params);

        assert_eq!(d[0], 0.1);
        assert_eq!(d[1], 0.8 / 2.0);
        let expected_vr = 0.8 * 0.8 / 2.0 + 1.5 * (0.2 - 1.0) / 4.0;
        assert!((d[2] - expected_vr).abs() < 1e-15, "dv_r = {}", d[2]);
        let expected_vt = -0.1 * 0.8 / 2.0;
        assert!((d[3] - expected_vt).abs() < 1e-15, "dv_t = {}", d[3]);
    }

    #[test]
    fn edge_on_sail_feels_only_gravity() {
        let params = SailParameters::new(0.5, 1.0, FRAC_PI_2);
        let y = [1.0, 0.0, 0.0, 1.0];
        let d = sail_derivative(0.0, &y, &params);
        // Circular-orbit balance: centripetal term cancels gravity.
        assert!(d[2].abs() < 1e-15, "dv_r = {}", d[2]);
        assert!(d[3].abs() < 1e-15, "dv_t = {}", d[3]);
    }

    #[test]
    fn negative_incidence_mirrors_tangential_thrust() {
        let y = [1.2, 0.0, 0.0, 0.9];
        let plus = sail_derivative(0.0, &y, &SailParameters::new(0.1, 1.0, 0.6155));
        let minus = sail_derivative(0.0, &y, &SailParameters::new(0.1, 1.0, -0.6155));
        assert_eq!(plus[2], minus[2]);
        assert!(plus[3] > 0.0);
        assert_eq!(plus[3], -minus[3]);
    }

    #[test]
    fn time_argument_is_ignored() {
        let y = [0.9, 1.0, 0.05, 1.1];
        let params = SailParameters::new(0.05, 1.0, 0.3);
        assert_eq!(
            sail_derivative(0.0, &y, &params),
            sail_derivative(1.0e6, &y, &params)
        );
    }

    #[test]
    fn zero_radius_propagates_non_finite_values() {
        let d = sail_derivative(0.0, &[0.0, 0.0, 0.0, 1.0], &SailParameters::DEFAULT);
        assert!(d[1].is_infinite());
        assert!(!d[2].is_finite());
        assert_eq!(
            check_radius(&[0.0, 0.0, 0.0, 1.0]),
            Err(DynamicsError::SingularRadius(0.0))
        );
        assert!(check_radius(&[f64::NAN, 0.0, 0.0, 1.0]).is_err());
        assert!(check_radius(&[1.0, 0.0, 0.0, 1.0]).is_ok());
    }

    #[test]
    fn validate_names_the_offending_parameter() {
        let err = SailParameters::new(0.1, f64::INFINITY, 0.0).validate().unwrap_err();
        assert_eq!(
            err,
            DynamicsError::NonFinite {
                name: "mu",
                value: f64::INFINITY
            }
        );
        assert!(SailParameters::DEFAULT.validate().is_ok());
        assert_eq!(SailParameters::default(), SailParameters::DEFAULT);
    }

    #[test]
    fn invariants_of_circular_orbit() {
        let y = [1.0, 0.0, 0.0, 1.0];
        assert_eq!(specific_energy(&y, 1.0), -0.5);
        assert_eq!(angular_momentum(&y), 1.0);
        let accel = characteristic_acceleration(&SailParameters::new(0.1, 1.0, 0.0), 2.0);
        assert!((accel - 0.025).abs() < 1e-15);
    }
}
