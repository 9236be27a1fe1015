use nalgebra::Vector3;

use crate::dynamics::state::State;
use crate::environment::AccelerationModel;
use crate::physics::PhysicsError;

use super::integrator::Integrator;

// ---------------------------------------------------------------------------
// Trajectory runner: step until ground, stall, or the step ceiling
// ---------------------------------------------------------------------------

/// Why a trajectory run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Altitude crossed zero; the impact state is interpolated.
    Ground,
    /// Step ceiling reached without ground contact.
    MaxSteps,
    /// Speed dropped to or below the stall threshold.
    Stalled,
}

/// Stepping parameters for a forward run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub dt: f64,
    pub max_steps: usize,
    pub stall_speed_mps: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dt: 0.5,
            max_steps: 100_000,
            stall_speed_mps: 1e-3,
        }
    }
}

/// Output of a forward trajectory run.
#[derive(Debug, Clone)]
pub struct TrajectoryResult {
    pub states: Vec<State>,
    pub termination: TerminationReason,
    /// Ground-crossing state, interpolated in time. Only for `Ground`.
    pub impact_state: Option<State>,
    pub flight_time_s: f64,
    pub max_speed_mps: f64,
    pub horizontal_drift_m: f64,
    pub terminal_speed_mps: f64,
    /// 1/2 m v^2 at impact. Only for `Ground`.
    pub terminal_kinetic_energy_j: Option<f64>,
}

/// Locate the ground-touch state by linear interpolation in time between
/// the last state above ground and the first at or below it.
fn interpolate_impact(prev: &State, next: &State) -> State {
    let (mut prev, mut next) = (*prev, *next);
    if prev.pos.z <= 0.0 && next.pos.z >= 0.0 {
        // Straddled, but the earlier state is the underground one; swap.
        std::mem::swap(&mut prev, &mut next);
    }

    if prev.pos.z <= 0.0 && next.pos.z <= 0.0 {
        next.pos.z = 0.0;
        return next;
    }

    let denominator = prev.pos.z - next.pos.z;
    if denominator == 0.0 {
        next.pos.z = 0.0;
        return next;
    }

    let alpha = (prev.pos.z / denominator).clamp(0.0, 1.0);
    let lerp = |a: f64, b: f64| a + (b - a) * alpha;

    State {
        time: lerp(prev.time, next.time),
        pos: Vector3::new(lerp(prev.pos.x, next.pos.x), lerp(prev.pos.y, next.pos.y), 0.0),
        vel: prev.vel + (next.vel - prev.vel) * alpha,
        mass: lerp(prev.mass, next.mass),
    }
}

/// Integrate a trajectory from `initial` until it reaches the ground,
/// stalls, or exhausts the step ceiling.
pub fn run_trajectory(
    initial: &State,
    integrator: &dyn Integrator,
    model: &dyn AccelerationModel,
    config: &RunConfig,
) -> Result<TrajectoryResult, PhysicsError> {
    let mut states = Vec::with_capacity((config.max_steps + 1).min(100_000));
    let mut current = *initial;
    states.push(current);
    let mut max_speed = current.speed();

    for _ in 0..config.max_steps {
        let next = integrator.step(&current, config.dt, model)?;
        max_speed = max_speed.max(next.speed());

        if next.pos.z <= 0.0 {
            let impact = interpolate_impact(&current, &next);
            states.push(impact);
            return Ok(TrajectoryResult {
                termination: TerminationReason::Ground,
                flight_time_s: impact.time - initial.time,
                max_speed_mps: max_speed,
                horizontal_drift_m: impact.horizontal_drift(),
                terminal_speed_mps: impact.speed(),
                terminal_kinetic_energy_j: Some(0.5 * impact.mass * impact.speed().powi(2)),
                impact_state: Some(impact),
                states,
            });
        }

        states.push(next);
        current = next;

        if current.speed() <= config.stall_speed_mps {
            return Ok(TrajectoryResult {
                states,
                termination: TerminationReason::Stalled,
                impact_state: None,
                flight_time_s: current.time - initial.time,
                max_speed_mps: max_speed,
                horizontal_drift_m: current.horizontal_drift(),
                terminal_speed_mps: current.speed(),
                terminal_kinetic_energy_j: None,
            });
        }
    }

    Ok(TrajectoryResult {
        termination: TerminationReason::MaxSteps,
        impact_state: None,
        flight_time_s: current.time - initial.time,
        max_speed_mps: max_speed,
        horizontal_drift_m: current.horizontal_drift(),
        terminal_speed_mps: current.speed(),
        terminal_kinetic_energy_j: None,
        states,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::{AtmosphericLevel, AtmosphericProfile};
    use crate::environment::Environment;
    use crate::sim::integrator::{ExplicitEuler, RungeKutta4};
    use approx::assert_relative_eq;

    fn still_air_profile() -> AtmosphericProfile {
        AtmosphericProfile::new(vec![
            AtmosphericLevel {
                altitude_m: 0.0,
                density_kg_m3: 1.2,
                temperature_k: 288.15,
                wind_u_mps: 0.0,
                wind_v_mps: 0.0,
            },
            AtmosphericLevel {
                altitude_m: 1_000.0,
                density_kg_m3: 1.2,
                temperature_k: 288.15,
                wind_u_mps: 0.0,
                wind_v_mps: 0.0,
            },
        ])
        .unwrap()
    }

    fn dragless_env(gravity: f64) -> Environment {
        let mut env = Environment::new(still_air_profile());
        env.gravity_mps2 = gravity;
        env.drag_coefficient = 0.0;
        env
    }

    #[test]
    fn ballistic_drop_terminates_on_ground() {
        let env = dragless_env(9.81);
        let initial = State {
            time: 0.0,
            pos: Vector3::new(0.0, 0.0, 100.0),
            vel: Vector3::new(30.0, 0.0, -20.0),
            mass: 1.0,
        };
        let config = RunConfig { dt: 0.05, max_steps: 10_000, ..Default::default() };

        let result = run_trajectory(&initial, &RungeKutta4, &env, &config).unwrap();

        assert_eq!(result.termination, TerminationReason::Ground);
        let impact = result.impact_state.unwrap();
        assert!(impact.pos.z.abs() < 1e-6);
        assert_relative_eq!(result.flight_time_s, 2.915434405799334, max_relative = 1e-3);
        assert_relative_eq!(result.terminal_speed_mps, 57.11347264276914, max_relative = 1e-3);
        assert_relative_eq!(
            result.terminal_kinetic_energy_j.unwrap(),
            1631.4285714285716,
            max_relative = 1e-3
        );
        assert_relative_eq!(
            result.horizontal_drift_m,
            impact.horizontal_drift(),
            max_relative = 1e-7
        );
    }

    #[test]
    fn motionless_fragment_stalls() {
        let env = dragless_env(0.0);
        let initial = State {
            time: 0.0,
            pos: Vector3::new(0.0, 0.0, 10.0),
            vel: Vector3::zeros(),
            mass: 1.0,
        };
        let config = RunConfig { dt: 1.0, max_steps: 5, stall_speed_mps: 0.1 };

        let result = run_trajectory(&initial, &ExplicitEuler, &env, &config).unwrap();

        assert_eq!(result.termination, TerminationReason::Stalled);
        assert!(result.impact_state.is_none());
        assert!(result.terminal_kinetic_energy_j.is_none());
        assert_relative_eq!(result.flight_time_s, 1.0);
    }

    #[test]
    fn step_ceiling_reports_max_steps() {
        let env = dragless_env(0.0);
        let initial = State {
            time: 0.0,
            pos: Vector3::new(0.0, 0.0, 1_000.0),
            vel: Vector3::new(50.0, 0.0, 0.0),
            mass: 1.0,
        };
        // Level flight, no gravity: never reaches ground or stalls
        let config = RunConfig { dt: 0.1, max_steps: 20, ..Default::default() };

        let result = run_trajectory(&initial, &ExplicitEuler, &env, &config).unwrap();

        assert_eq!(result.termination, TerminationReason::MaxSteps);
        assert!(result.impact_state.is_none());
        assert_eq!(result.states.len(), 21);
        assert_relative_eq!(result.flight_time_s, 2.0, max_relative = 1e-9);
    }

    #[test]
    fn max_speed_tracks_the_whole_trace() {
        let env = dragless_env(9.81);
        let initial = State {
            time: 0.0,
            pos: Vector3::new(0.0, 0.0, 500.0),
            vel: Vector3::zeros(),
            mass: 1.0,
        };
        let config = RunConfig { dt: 0.05, max_steps: 10_000, ..Default::default() };

        let result = run_trajectory(&initial, &RungeKutta4, &env, &config).unwrap();
        assert_eq!(result.termination, TerminationReason::Ground);
        // Speed grows monotonically in free fall: the max is seen at the
        // final raw step, just past the interpolated impact
        assert!(result.max_speed_mps >= result.terminal_speed_mps);
        assert_relative_eq!(result.max_speed_mps, result.terminal_speed_mps, max_relative = 1e-2);
    }

    #[test]
    fn degenerate_straddle_resolves_to_later_state() {
        let prev = State {
            time: 0.0,
            pos: Vector3::new(0.0, 0.0, -1.0),
            vel: Vector3::new(0.0, 0.0, -5.0),
            mass: 1.0,
        };
        let next = State {
            time: 1.0,
            pos: Vector3::new(3.0, 0.0, -6.0),
            vel: Vector3::new(0.0, 0.0, -5.0),
            mass: 1.0,
        };
        let impact = interpolate_impact(&prev, &next);
        assert_eq!(impact.pos.z, 0.0);
        assert_eq!(impact.time, 1.0);
        assert_eq!(impact.pos.x, 3.0);
    }

    #[test]
    fn impact_interpolation_is_linear_in_time() {
        let prev = State {
            time: 2.0,
            pos: Vector3::new(10.0, 0.0, 30.0),
            vel: Vector3::new(20.0, 0.0, -60.0),
            mass: 2.0,
        };
        let next = State {
            time: 2.5,
            pos: Vector3::new(20.0, 0.0, -10.0),
            vel: Vector3::new(20.0, 0.0, -65.0),
            mass: 2.0,
        };
        // Crossing fraction: 30 / (30 - (-10)) = 0.75
        let impact = interpolate_impact(&prev, &next);
        assert_relative_eq!(impact.time, 2.375);
        assert_relative_eq!(impact.pos.x, 17.5);
        assert_eq!(impact.pos.z, 0.0);
        assert_relative_eq!(impact.vel.z, -63.75);
    }
}
