//! Core units, constants, and shared primitives for the Solar Sail Calculator workspace.
//!
//! Propagation runs in canonical heliocentric units: lengths in AU, the Sun's
//! gravitational parameter equal to one, and time scaled so that a circular orbit
//! at 1 AU has period `2 * pi`.

/// Physical constants expressed in SI-derived units (unless stated otherwise).
pub mod constants {
    /// Kilometres per astronomical unit.
    pub const AU_KM: f64 = 149_597_870.7;
    /// Heliocentric gravitational parameter (km^3/s^2).
    pub const MU_SUN_KM3_S2: f64 = 1.327_124_400_18e11;
    /// Seconds per Julian day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Gravitational parameter in canonical units.
    pub const MU_CANONICAL: f64 = 1.0;
}

/// Angle and length conversions.
pub mod units {
    use super::constants::AU_KM;

    /// Convert degrees to radians.
    #[inline]
    pub fn deg_to_rad(v: f64) -> f64 {
        v.to_radians()
    }

    /// Convert radians to degrees.
    #[inline]
    pub fn rad_to_deg(v: f64) -> f64 {
        v.to_degrees()
    }

    /// Convert astronomical units to kilometres.
    #[inline]
    pub fn au_to_km(v: f64) -> f64 {
        v * AU_KM
    }
}

/// Canonical time utilities shared across crates.
pub mod time {
    use super::constants::{AU_KM, MU_SUN_KM3_S2, SECONDS_PER_DAY};

    /// Length of one canonical time unit in seconds, `sqrt(AU^3 / mu_sun)`.
    #[inline]
    pub fn canonical_time_unit_seconds() -> f64 {
        (AU_KM.powi(3) / MU_SUN_KM3_S2).sqrt()
    }

    /// Convert canonical time units to days.
    #[inline]
    pub fn canonical_to_days(t: f64) -> f64 {
        t * canonical_time_unit_seconds() / SECONDS_PER_DAY
    }
}

/// Canonical speed conversions (AU per canonical time unit).
pub mod velocity {
    use super::constants::{AU_KM, MU_SUN_KM3_S2};

    /// Convert a canonical speed to km/s.
    #[inline]
    pub fn canonical_to_km_s(v: f64) -> f64 {
        v * (MU_SUN_KM3_S2 / AU_KM).sqrt()
    }
}

/// Canonical accelerations (AU per canonical time unit squared).
pub mod acceleration {
    use super::time::canonical_time_unit_seconds;
    use super::units::au_to_km;

    /// Convert a canonical acceleration to mm/s^2.
    #[inline]
    pub fn canonical_to_mm_s2(a: f64) -> f64 {
        let tu = canonical_time_unit_seconds();
        au_to_km(a) * 1.0e6 / (tu * tu)
    }
}
