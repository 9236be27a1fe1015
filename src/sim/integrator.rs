use crate::dynamics::state::{Deriv, State};
use crate::environment::AccelerationModel;
use crate::physics::PhysicsError;

// ---------------------------------------------------------------------------
// Time-stepping strategies
// ---------------------------------------------------------------------------

/// A single-step integration strategy. Implementations are deterministic
/// and stateless; every step returns a new state.
pub trait Integrator {
    fn step(
        &self,
        state: &State,
        dt: f64,
        model: &dyn AccelerationModel,
    ) -> Result<State, PhysicsError>;
}

/// Explicit first-order integrator. Velocity is advanced first and the
/// position update uses the advanced velocity (semi-implicit ordering).
pub struct ExplicitEuler;

impl Integrator for ExplicitEuler {
    fn step(
        &self,
        state: &State,
        dt: f64,
        model: &dyn AccelerationModel,
    ) -> Result<State, PhysicsError> {
        let accel = model.acceleration(state)?;
        let dmass = model.mass_derivative(state)?;

        let vel = state.vel + accel * dt;
        let pos = state.pos + vel * dt;

        Ok(State {
            time: state.time + dt,
            pos,
            vel,
            mass: (state.mass + dmass * dt).max(0.0),
        })
    }
}

/// Classical 4th-order Runge-Kutta integrator.
pub struct RungeKutta4;

impl Integrator for RungeKutta4 {
    fn step(
        &self,
        state: &State,
        dt: f64,
        model: &dyn AccelerationModel,
    ) -> Result<State, PhysicsError> {
        let deriv = |s: &State| -> Result<Deriv, PhysicsError> {
            Ok(Deriv {
                dpos: s.vel,
                dvel: model.acceleration(s)?,
                dmass: model.mass_derivative(s)?,
            })
        };

        let k1 = deriv(state)?;
        let k2 = deriv(&state.apply(&k1, dt * 0.5))?;
        let k3 = deriv(&state.apply(&k2, dt * 0.5))?;
        let k4 = deriv(&state.apply(&k3, dt))?;

        Ok(State {
            time: state.time + dt,
            pos: state.pos + (k1.dpos + 2.0 * k2.dpos + 2.0 * k3.dpos + k4.dpos) * (dt / 6.0),
            vel: state.vel + (k1.dvel + 2.0 * k2.dvel + 2.0 * k3.dvel + k4.dvel) * (dt / 6.0),
            mass: (state.mass
                + (k1.dmass + 2.0 * k2.dmass + 2.0 * k3.dmass + k4.dmass) * (dt / 6.0))
                .max(0.0),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
