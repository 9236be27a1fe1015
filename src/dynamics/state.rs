use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G0: f64 = 9.80665; // standard gravity, m/s^2

// ---------------------------------------------------------------------------
// Fragment state
// ---------------------------------------------------------------------------

/// Kinematic snapshot of a fragment at a single point in time.
/// Frame: planar East-North-Up (UTM-like), `pos.z` = altitude above the
/// reference surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub time: f64,            // s
    pub pos: Vector3<f64>,    // m   [East, North, Up]
    pub vel: Vector3<f64>,    // m/s
    pub mass: f64,            // kg
}

impl State {
    /// Advance state by a derivative scaled by dt (used inside RK4).
    pub fn apply(&self, d: &Deriv, dt: f64) -> State {
        State {
            time: self.time + dt,
            pos: self.pos + d.dpos * dt,
            vel: self.vel + d.dvel * dt,
            mass: (self.mass + d.dmass * dt).max(0.0),
        }
    }

    /// Derive a copy of this state carrying a different mass.
    pub fn with_mass(&self, mass: f64) -> State {
        State { mass, ..*self }
    }

    /// Total speed magnitude (m/s).
    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    /// Horizontal drift magnitude from the frame origin (m).
    pub fn horizontal_drift(&self) -> f64 {
        self.pos.x.hypot(self.pos.y)
    }
}

// ---------------------------------------------------------------------------
// State derivative (dp/dt, dv/dt, dm/dt)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct Deriv {
    pub dpos: Vector3<f64>,   // velocity
    pub dvel: Vector3<f64>,   // acceleration
    pub dmass: f64,           // mass-loss rate (negative while ablating)
}
