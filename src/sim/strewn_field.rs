use log::debug;
use nalgebra::Vector3;

use crate::dynamics::state::State;
use crate::environment::AccelerationModel;
use crate::physics::PhysicsError;

use super::integrator::ExplicitEuler;
use super::reverse::run_reverse_trajectory;
use super::runner::{run_trajectory, RunConfig};

// ---------------------------------------------------------------------------
// Strewn field generation
// ---------------------------------------------------------------------------

const FIELD_DT: f64 = 0.1;
const FIELD_MAX_STEPS: usize = 100_000;

/// One predicted landing point of the mass suite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrewnFieldPoint {
    pub mass_kg: f64,
    pub impact_x_m: f64,
    pub impact_y_m: f64,
}

/// Back-calculate a common fireball terminus from radar-observed states.
///
/// Each state is reverse-integrated up to `terminus_altitude_m`; the
/// returned point is the centroid of the terminus positions. An empty
/// input yields the frame origin.
pub fn calculate_simulated_terminus(
    radar_states: &[State],
    terminus_altitude_m: f64,
    model: &dyn AccelerationModel,
) -> Result<(f64, f64), PhysicsError> {
    if radar_states.is_empty() {
        return Ok((0.0, 0.0));
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for state in radar_states {
        let terminus =
            run_reverse_trajectory(state, terminus_altitude_m, model, FIELD_DT, FIELD_MAX_STEPS)?;
        sum_x += terminus.pos.x;
        sum_y += terminus.pos.y;
    }

    let count = radar_states.len() as f64;
    Ok((sum_x / count, sum_y / count))
}

/// Sweep a suite of candidate masses from the terminus to the ground.
///
/// Each mass is dropped from the terminus centroid with the given velocity
/// and forward-integrated; runs that reach the ground contribute a landing
/// point. Runs that stall or exhaust the step ceiling are skipped.
pub fn generate_strewn_field(
    terminus_centroid: (f64, f64),
    terminus_altitude_m: f64,
    terminus_velocity: Vector3<f64>,
    masses_kg: &[f64],
    model: &dyn AccelerationModel,
) -> Result<Vec<StrewnFieldPoint>, PhysicsError> {
    let integrator = ExplicitEuler;
    let config = RunConfig { dt: FIELD_DT, max_steps: FIELD_MAX_STEPS, ..Default::default() };
    let mut points = Vec::with_capacity(masses_kg.len());

    for &mass_kg in masses_kg {
        let initial = State {
            time: 0.0,
            pos: Vector3::new(terminus_centroid.0, terminus_centroid.1, terminus_altitude_m),
            vel: terminus_velocity,
            mass: mass_kg,
        };

        let result = run_trajectory(&initial, &integrator, model, &config)?;
        match result.impact_state {
            Some(impact) => points.push(StrewnFieldPoint {
                mass_kg,
                impact_x_m: impact.pos.x,
                impact_y_m: impact.pos.y,
            }),
            None => debug!(
                "strewn field: {mass_kg} kg run ended {:?} before reaching ground, skipped",
                result.termination
            ),
        }
    }

    Ok(points)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
