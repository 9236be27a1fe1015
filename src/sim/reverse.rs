use crate::dynamics::state::State;
use crate::environment::AccelerationModel;
use crate::physics::PhysicsError;

// ---------------------------------------------------------------------------
// Reverse integration: trace a detected state back up to the terminus
// ---------------------------------------------------------------------------

/// Integrate backward in time from `radar_state` until the altitude reaches
/// `target_altitude_m` (which must lie above the starting altitude).
///
/// The forward acceleration is re-used with a negated time step: over short
/// segments of smooth dynamics a first-order step is locally reversible,
/// approximating a(prev) by a(current). The error of that approximation
/// grows with step size and segment length. Mass is held constant (no
/// ablation reconstruction).
///
/// If the step ceiling is exhausted the last computed state is returned
/// without error; callers check convergence by altitude.
pub fn run_reverse_trajectory(
    radar_state: &State,
    target_altitude_m: f64,
    model: &dyn AccelerationModel,
    dt: f64,
    max_steps: usize,
) -> Result<State, PhysicsError> {
    let dt = if dt > 0.0 { -dt } else { dt };

    let mut state = *radar_state;
    for _ in 0..max_steps {
        if state.pos.z >= target_altitude_m {
            return Ok(state);
        }

        let accel = model.acceleration(&state)?;
        state = State {
            time: state.time + dt,
            pos: state.pos + state.vel * dt,
            vel: state.vel + accel * dt,
            mass: state.mass,
        };
    }

    Ok(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::{AtmosphericLevel, AtmosphericProfile};
    use crate::environment::Environment;
    use crate::sim::integrator::{ExplicitEuler, Integrator};
    use nalgebra::Vector3;

    fn test_env() -> Environment {
        let profile = AtmosphericProfile::new(vec![
            AtmosphericLevel {
                altitude_m: 0.0,
                density_kg_m3: 1.2,
                temperature_k: 288.15,
                wind_u_mps: 0.0,
                wind_v_mps: 0.0,
            },
            AtmosphericLevel {
                altitude_m: 10_000.0,
                density_kg_m3: 0.4,
                temperature_k: 223.15,
                wind_u_mps: 0.0,
                wind_v_mps: 0.0,
            },
        ])
        .unwrap();
        let mut env = Environment::new(profile);
        env.fragment_density_kg_m3 = 3500.0;
        env
    }

    #[test]
    fn reverse_climbs_to_target_altitude() {
        let env = test_env();
        let radar = State {
            time: 20.0,
            pos: Vector3::new(1_000.0, 500.0, 3_000.0),
            vel: Vector3::new(50.0, 0.0, -150.0),
            mass: 10.0,
        };

        let terminus = run_reverse_trajectory(&radar, 5_000.0, &env, 0.1, 100_000).unwrap();

        assert!(terminus.pos.z >= 5_000.0);
        // Backward in time, and mass untouched
        assert!(terminus.time < radar.time);
        assert_eq!(terminus.mass, radar.mass);
        // Falling fragment came from behind its drift direction
        assert!(terminus.pos.x < radar.pos.x);
    }

    #[test]
    fn step_ceiling_returns_best_effort_state() {
        let env = test_env();
        let radar = State {
            time: 0.0,
            pos: Vector3::new(0.0, 0.0, 3_000.0),
            vel: Vector3::new(0.0, 0.0, -100.0),
            mass: 5.0,
        };

        let state = run_reverse_trajectory(&radar, 50_000.0, &env, 0.1, 10).unwrap();
        // Only 10 steps: nowhere near the target, but no error either
        assert!(state.pos.z < 50_000.0);
        assert!((state.time - -1.0).abs() < 1e-9);
    }

    #[test]
    fn positive_dt_is_negated() {
        let env = test_env();
        let radar = State {
            time: 0.0,
            pos: Vector3::new(0.0, 0.0, 2_000.0),
            vel: Vector3::new(0.0, 0.0, -120.0),
            mass: 5.0,
        };

        let a = run_reverse_trajectory(&radar, 2_500.0, &env, 0.1, 100_000).unwrap();
        let b = run_reverse_trajectory(&radar, 2_500.0, &env, -0.1, 100_000).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn forward_then_reverse_recovers_origin() {
        let env = test_env();
        let terminus = State {
            time: 0.0,
            pos: Vector3::new(0.0, 0.0, 5_000.0),
            vel: Vector3::new(100.0, 20.0, -200.0),
            mass: 20.0,
        };

        // Forward-integrate down to 4 km
        let integrator = ExplicitEuler;
        let mut state = terminus;
        while state.pos.z > 4_000.0 {
            state = integrator.step(&state, 0.1, &env).unwrap();
        }

        // Reverse back up to the original altitude
        let recovered = run_reverse_trajectory(&state, 5_000.0, &env, 0.1, 100_000).unwrap();

        let horizontal_error =
            (recovered.pos.x - terminus.pos.x).hypot(recovered.pos.y - terminus.pos.y);
        assert!(
            horizontal_error < 500.0,
            "round-trip drifted {horizontal_error:.1} m horizontally"
        );
        // Altitude overshoots by at most one reverse step
        assert!(recovered.pos.z >= 5_000.0);
        assert!(recovered.pos.z < 5_100.0);
    }
}
