use log::debug;
use thiserror::Error;

use crate::dynamics::state::State;
use crate::environment::AccelerationModel;
use crate::physics::PhysicsError;

use super::integrator::{ExplicitEuler, Integrator};

// ---------------------------------------------------------------------------
// Mass estimation from an observed flight duration
// ---------------------------------------------------------------------------

const FLIGHT_SIM_DT: f64 = 0.1;
const FLIGHT_SIM_MAX_STEPS: usize = 100_000;
// Time error reported when the trial mass never reaches the target altitude
const UNREACHABLE_ERROR_S: f64 = 1e6;
// Bracket-collapse tolerance on the mass axis
const MASS_TOLERANCE_KG: f64 = 1e-3;

#[derive(Debug, Error)]
pub enum MassFinderError {
    #[error(
        "no sign change in mass bracket [{mass_min_kg} kg, {mass_max_kg} kg]: \
         time errors {err_min_s:.2} s and {err_max_s:.2} s"
    )]
    InvalidBracket {
        mass_min_kg: f64,
        mass_max_kg: f64,
        err_min_s: f64,
        err_max_s: f64,
    },

    #[error("optimization failed: root search did not converge within {iterations} iterations")]
    NoConvergence { iterations: usize },

    #[error("optimization failed: {0}")]
    Physics(#[from] PhysicsError),
}

/// Search bracket and convergence parameters for the mass search.
#[derive(Debug, Clone)]
pub struct MassSearchConfig {
    pub mass_min_kg: f64,
    pub mass_max_kg: f64,
    pub tolerance_s: f64,
    pub max_iterations: usize,
}

impl Default for MassSearchConfig {
    fn default() -> Self {
        Self {
            mass_min_kg: 0.001,
            mass_max_kg: 10_000.0,
            tolerance_s: 0.1,
            max_iterations: 50,
        }
    }
}

/// Find the fragment mass whose descent from `terminus_state` (its mass
/// field is overwritten by the trial value) down to `radar_altitude_m`
/// takes `observed_duration_s`.
///
/// Rests on flight time decreasing monotonically with mass inside the
/// bracket: a heavier fragment is decelerated proportionally less by drag
/// and reaches the target altitude sooner. Both bracket ends must produce
/// opposite-signed time errors or the search fails fast.
pub fn find_mass_for_flight_time(
    terminus_state: &State,
    radar_altitude_m: f64,
    observed_duration_s: f64,
    model: &dyn AccelerationModel,
    config: &MassSearchConfig,
) -> Result<f64, MassFinderError> {
    let time_error = |mass_kg: f64| -> Result<f64, PhysicsError> {
        let error = match simulate_flight_time(terminus_state, mass_kg, radar_altitude_m, model)? {
            Some(flight_time) => flight_time - observed_duration_s,
            None => UNREACHABLE_ERROR_S,
        };
        debug!("mass search: trial {mass_kg:.4} kg, time error {error:.3} s");
        Ok(error)
    };

    let err_min = time_error(config.mass_min_kg)?;
    let err_max = time_error(config.mass_max_kg)?;
    if err_min * err_max > 0.0 {
        return Err(MassFinderError::InvalidBracket {
            mass_min_kg: config.mass_min_kg,
            mass_max_kg: config.mass_max_kg,
            err_min_s: err_min,
            err_max_s: err_max,
        });
    }

    brent(
        &time_error,
        (config.mass_min_kg, err_min),
        (config.mass_max_kg, err_max),
        config.tolerance_s,
        config.max_iterations,
    )
}

/// Forward-simulate the descent with the trial mass and return the
/// interpolated time at which the target altitude is crossed, or `None`
/// if the fragment never gets there within the step ceiling.
fn simulate_flight_time(
    terminus: &State,
    mass_kg: f64,
    radar_altitude_m: f64,
    model: &dyn AccelerationModel,
) -> Result<Option<f64>, PhysicsError> {
    let integrator = ExplicitEuler;
    let mut state = terminus.with_mass(mass_kg);

    for _ in 0..FLIGHT_SIM_MAX_STEPS {
        let prev = state;
        state = integrator.step(&prev, FLIGHT_SIM_DT, model)?;

        if state.pos.z <= radar_altitude_m {
            if prev.pos.z == state.pos.z {
                return Ok(Some(state.time - terminus.time));
            }
            let fraction = (prev.pos.z - radar_altitude_m) / (prev.pos.z - state.pos.z);
            let crossing_time = prev.time + fraction * FLIGHT_SIM_DT;
            return Ok(Some(crossing_time - terminus.time));
        }
    }

    Ok(None)
}

/// Brent's method on a bracketing interval with known endpoint values.
/// Converges when the bracket collapses below the mass tolerance or the
/// residual falls within `f_tolerance`.
fn brent(
    f: &dyn Fn(f64) -> Result<f64, PhysicsError>,
    (a0, fa0): (f64, f64),
    (b0, fb0): (f64, f64),
    f_tolerance: f64,
    max_iterations: usize,
) -> Result<f64, MassFinderError> {
    let (mut a, mut fa) = (a0, fa0);
    let (mut b, mut fb) = (b0, fb0);
    let (mut c, mut fc) = (b, fb);
    let mut d = 0.0;
    let mut e = 0.0;

    for _ in 0..max_iterations {
        if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * MASS_TOLERANCE_KG;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol1 || fb == 0.0 || fb.abs() <= f_tolerance {
            return Ok(b);
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // Inverse quadratic interpolation, secant when a == c
            let s = fb / fa;
            let (mut p, mut q);
            if a == c {
                p = 2.0 * xm * s;
                q = 1.0 - s;
            } else {
                let r0 = fa / fc;
                let r1 = fb / fc;
                p = s * (2.0 * xm * r0 * (r0 - r1) - (b - a) * (r1 - 1.0));
                q = (r0 - 1.0) * (r1 - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        if d.abs() > tol1 {
            b += d;
        } else {
            b += tol1.copysign(xm);
        }
        fb = f(b)?;
    }

    Err(MassFinderError::NoConvergence { iterations: max_iterations })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
