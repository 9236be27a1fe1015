use nalgebra::Vector3;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Layered atmospheric profile with altitude-keyed lookups
// ---------------------------------------------------------------------------

pub const R_AIR: f64 = 287.05; // specific gas constant for dry air, J/(kg·K)
pub const GAMMA: f64 = 1.4;    // ratio of specific heats

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("atmospheric profile requires at least one level")]
    Empty,
}

/// One altitude sample of the sounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphericLevel {
    pub altitude_m: f64,
    pub density_kg_m3: f64,
    pub temperature_k: f64,
    pub wind_u_mps: f64,
    pub wind_v_mps: f64,
}

/// Altitude-ordered table of atmospheric levels.
///
/// Lookups are total over the real line: queries outside the table range
/// clamp to the boundary level. Density interpolates log-linearly to track
/// the exponential falloff of the real atmosphere; wind and temperature
/// interpolate linearly.
#[derive(Debug, Clone)]
pub struct AtmosphericProfile {
    levels: Vec<AtmosphericLevel>,
}

impl AtmosphericProfile {
    /// Build a profile from pre-computed levels, sorting by altitude.
    pub fn new(mut levels: Vec<AtmosphericLevel>) -> Result<Self, ProfileError> {
        if levels.is_empty() {
            return Err(ProfileError::Empty);
        }
        levels.sort_by(|a, b| a.altitude_m.total_cmp(&b.altitude_m));
        Ok(Self { levels })
    }

    /// Build from raw `(altitude_m, pressure_pa, temperature_k, wind_u, wind_v)`
    /// tuples, deriving density via the ideal-gas relation rho = P / (R * T).
    pub fn from_raw_levels(
        raw: impl IntoIterator<Item = (f64, f64, f64, f64, f64)>,
    ) -> Result<Self, ProfileError> {
        let levels = raw
            .into_iter()
            .map(|(altitude_m, pressure_pa, temperature_k, wind_u, wind_v)| AtmosphericLevel {
                altitude_m,
                density_kg_m3: pressure_pa / (R_AIR * temperature_k),
                temperature_k,
                wind_u_mps: wind_u,
                wind_v_mps: wind_v,
            })
            .collect();
        Self::new(levels)
    }

    pub fn levels(&self) -> &[AtmosphericLevel] {
        &self.levels
    }

    /// Bracket the query altitude between the two nearest levels, clamping
    /// to the boundary level outside the table range.
    fn bracket(&self, altitude_m: f64) -> (&AtmosphericLevel, &AtmosphericLevel) {
        let first = &self.levels[0];
        let last = &self.levels[self.levels.len() - 1];
        if altitude_m <= first.altitude_m {
            return (first, first);
        }
        if altitude_m >= last.altitude_m {
            return (last, last);
        }
        for pair in self.levels.windows(2) {
            if pair[0].altitude_m <= altitude_m && altitude_m <= pair[1].altitude_m {
                return (&pair[0], &pair[1]);
            }
        }
        (last, last)
    }

    fn fraction(lower: &AtmosphericLevel, upper: &AtmosphericLevel, altitude_m: f64) -> f64 {
        (altitude_m - lower.altitude_m) / (upper.altitude_m - lower.altitude_m)
    }

    /// Air density (kg/m^3) at altitude, log-linear between levels.
    /// Falls back to a linear blend if either bracketing density is
    /// non-positive (no logarithm of a non-positive number).
    pub fn density(&self, altitude_m: f64) -> f64 {
        let (lower, upper) = self.bracket(altitude_m);
        if lower.altitude_m == upper.altitude_m {
            return lower.density_kg_m3;
        }
        let frac = Self::fraction(lower, upper, altitude_m);
        if lower.density_kg_m3 <= 0.0 || upper.density_kg_m3 <= 0.0 {
            return lower.density_kg_m3 + frac * (upper.density_kg_m3 - lower.density_kg_m3);
        }
        ((1.0 - frac) * lower.density_kg_m3.ln() + frac * upper.density_kg_m3.ln()).exp()
    }

    /// Horizontal wind vector (m/s, ENU; vertical component always 0).
    pub fn wind(&self, altitude_m: f64) -> Vector3<f64> {
        let (lower, upper) = self.bracket(altitude_m);
        if lower.altitude_m == upper.altitude_m {
            return Vector3::new(lower.wind_u_mps, lower.wind_v_mps, 0.0);
        }
        let frac = Self::fraction(lower, upper, altitude_m);
        let u = lower.wind_u_mps + frac * (upper.wind_u_mps - lower.wind_u_mps);
        let v = lower.wind_v_mps + frac * (upper.wind_v_mps - lower.wind_v_mps);
        Vector3::new(u, v, 0.0)
    }

    /// Air temperature (K) at altitude, linear between levels.
    pub fn temperature(&self, altitude_m: f64) -> f64 {
        let (lower, upper) = self.bracket(altitude_m);
        if lower.altitude_m == upper.altitude_m {
            return lower.temperature_k;
        }
        let frac = Self::fraction(lower, upper, altitude_m);
        lower.temperature_k + frac * (upper.temperature_k - lower.temperature_k)
    }

    /// Local speed of sound (m/s): a = sqrt(gamma * R * T).
    pub fn speed_of_sound(&self, altitude_m: f64) -> f64 {
        (GAMMA * R_AIR * self.temperature(altitude_m)).sqrt()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
