use nalgebra::Vector3;

use crate::atmosphere::AtmosphericProfile;
use crate::dynamics::state::{State, G0};
use crate::physics::ablation::{simple_ablation_rate, SimpleAblationParams};
use crate::physics::drag::{
    calculate_cube_cd, calculate_sphere_cd, drag_acceleration_vector, relative_velocity,
    DragParams,
};
use crate::physics::geometry::cross_section_from_mass_density;
use crate::physics::PhysicsError;

// ---------------------------------------------------------------------------
// Acceleration model: drag + gravity + Coriolis + optional ablation
// ---------------------------------------------------------------------------

pub const OMEGA_EARTH: f64 = 7.292_115_9e-5; // Earth rotation rate, rad/s

/// Altitude-indexed wind override: altitude (m) to wind vector (m/s, ENU).
pub type WindModel = Box<dyn Fn(f64) -> Vector3<f64> + Send + Sync>;

/// The hooks an integrator needs from the simulation context.
pub trait AccelerationModel {
    /// Acceleration vector (m/s^2) acting on the fragment.
    fn acceleration(&self, state: &State) -> Result<Vector3<f64>, PhysicsError>;

    /// dm/dt (kg/s) from mass-loss processes.
    fn mass_derivative(&self, state: &State) -> Result<f64, PhysicsError>;
}

/// Drag coefficient policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragModel {
    /// Fixed coefficient from `Environment::drag_coefficient`.
    #[default]
    Constant,
    /// Mach-dependent sphere formula.
    Sphere,
    /// Mach-dependent cube formula.
    Cube,
}

/// Dark-flight environment: an atmospheric profile plus the fragment and
/// site parameters needed to evaluate the acceleration on any state.
///
/// Pure function object. Holds no mutable simulation state, so one
/// instance is safe to share read-only across concurrent runs.
pub struct Environment {
    pub profile: AtmosphericProfile,
    pub latitude_deg: f64,
    pub gravity_mps2: f64,
    pub fragment_density_kg_m3: f64,
    pub drag_coefficient: f64,
    pub shape_factor: f64,
    pub drag_model: DragModel,
    pub ablation: Option<SimpleAblationParams>,
    pub wind_model: Option<WindModel>,
}

impl Environment {
    pub fn new(profile: AtmosphericProfile) -> Self {
        Self {
            profile,
            latitude_deg: 0.0,
            gravity_mps2: G0,
            fragment_density_kg_m3: 3400.0,
            drag_coefficient: 1.0,
            shape_factor: 1.0,
            drag_model: DragModel::Constant,
            ablation: None,
            wind_model: None,
        }
    }

    fn wind_at(&self, state: &State) -> Vector3<f64> {
        match &self.wind_model {
            Some(model) => model(state.pos.z),
            None => self.profile.wind(state.pos.z.max(0.0)),
        }
    }

    fn resolve_cd(&self, mach: f64) -> f64 {
        match self.drag_model {
            DragModel::Sphere => calculate_sphere_cd(mach),
            DragModel::Cube => calculate_cube_cd(mach),
            DragModel::Constant => self.drag_coefficient,
        }
    }
}

impl AccelerationModel for Environment {
    fn acceleration(&self, state: &State) -> Result<Vector3<f64>, PhysicsError> {
        let altitude = state.pos.z.max(0.0);
        let density = self.profile.density(altitude);
        let wind = self.wind_at(state);

        let rel = relative_velocity(&state.vel, &wind);
        let speed = rel.norm();
        let speed_of_sound = self.profile.speed_of_sound(altitude);
        let mach = if speed_of_sound > 0.0 { speed / speed_of_sound } else { 0.0 };

        let cd = self.resolve_cd(mach);
        // A fully ablated fragment must not fault mid-run: zero mass gives
        // zero area, and the force-to-acceleration division sees a floor.
        let area =
            cross_section_from_mass_density(state.mass.max(0.0), self.fragment_density_kg_m3)?;
        let params = DragParams { cd: cd * self.shape_factor, area_m2: area };
        let drag =
            drag_acceleration_vector(&state.vel, &wind, density, state.mass.max(1e-9), params)?;

        let mut accel = drag + Vector3::new(0.0, 0.0, -self.gravity_mps2);

        if self.latitude_deg != 0.0 {
            let lat = self.latitude_deg.to_radians();
            // Earth rotation vector resolved into ENU at this latitude
            let omega = Vector3::new(0.0, OMEGA_EARTH * lat.cos(), OMEGA_EARTH * lat.sin());
            accel -= 2.0 * omega.cross(&state.vel);
        }

        Ok(accel)
    }

    fn mass_derivative(&self, state: &State) -> Result<f64, PhysicsError> {
        let Some(ablation) = self.ablation else {
            return Ok(0.0);
        };
        let altitude = state.pos.z.max(0.0);
        let density = self.profile.density(altitude);
        let wind = self.wind_at(state);
        let speed = relative_velocity(&state.vel, &wind).norm();
        if speed == 0.0 {
            return Ok(0.0);
        }
        Ok(simple_ablation_rate(density, speed, ablation))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
