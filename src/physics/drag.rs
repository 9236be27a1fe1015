use nalgebra::Vector3;

use crate::physics::PhysicsError;

// ---------------------------------------------------------------------------
// Drag coefficients and drag acceleration
// ---------------------------------------------------------------------------

/// Drag coefficient and reference area for one fragment.
#[derive(Debug, Clone, Copy)]
pub struct DragParams {
    pub cd: f64,
    pub area_m2: f64,
}

/// Drag coefficient for a sphere at the given Mach number.
///
/// Carter et al. (2009):
///   Cd = 0.45 M^2 + 0.424                                    for M <= 0.722
///   Cd = 2.1 e^(-1.2 (M+0.35)) - 8.9 e^(-2.2 (M+0.35)) + 0.92 for M >  0.722
pub fn calculate_sphere_cd(mach: f64) -> f64 {
    if mach <= 0.722 {
        0.45 * mach * mach + 0.424
    } else {
        2.1 * (-1.2 * (mach + 0.35)).exp() - 8.9 * (-2.2 * (mach + 0.35)).exp() + 0.92
    }
}

/// Drag coefficient for a cube at the given Mach number.
///
/// Carter et al. (2009):
///   Cd = 0.60 M^2 + 1.04                                       for M <= 1.150
///   Cd = 2.1 e^(-1.16 (M+0.35)) - 6.5 e^(-2.23 (M+0.35)) + 1.67 for M >  1.150
pub fn calculate_cube_cd(mach: f64) -> f64 {
    if mach <= 1.150 {
        0.60 * mach * mach + 1.04
    } else {
        2.1 * (-1.16 * (mach + 0.35)).exp() - 6.5 * (-2.23 * (mach + 0.35)).exp() + 1.67
    }
}

/// Air-relative velocity: fragment velocity minus the local wind.
pub fn relative_velocity(velocity_mps: &Vector3<f64>, wind_mps: &Vector3<f64>) -> Vector3<f64> {
    velocity_mps - wind_mps
}

/// Dynamic pressure (Pa): q = 1/2 rho v^2.
pub fn dynamic_pressure(density_kg_m3: f64, speed_mps: f64) -> f64 {
    0.5 * density_kg_m3 * speed_mps * speed_mps
}

/// Drag force magnitude (N): F = q Cd A.
pub fn drag_force(speed_mps: f64, density_kg_m3: f64, params: DragParams) -> f64 {
    dynamic_pressure(density_kg_m3, speed_mps) * params.cd * params.area_m2
}

/// Convert a drag force to an acceleration magnitude (m/s^2).
pub fn drag_acceleration(force_n: f64, mass_kg: f64) -> Result<f64, PhysicsError> {
    if mass_kg <= 0.0 {
        return Err(PhysicsError::NonPositiveMass(mass_kg));
    }
    Ok(force_n / mass_kg)
}

/// Drag acceleration vector (m/s^2), opposing the air-relative velocity.
/// A fragment exactly at rest relative to the air column sees zero drag.
pub fn drag_acceleration_vector(
    velocity_mps: &Vector3<f64>,
    wind_mps: &Vector3<f64>,
    density_kg_m3: f64,
    mass_kg: f64,
    params: DragParams,
) -> Result<Vector3<f64>, PhysicsError> {
    let rel = relative_velocity(velocity_mps, wind_mps);
    let speed = rel.norm();
    if speed == 0.0 {
        return Ok(Vector3::zeros());
    }
    let force = drag_force(speed, density_kg_m3, params);
    let accel = drag_acceleration(force, mass_kg)?;
    Ok(rel * (-accel / speed))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_cd_subsonic_polynomial() {
        assert_relative_eq!(calculate_sphere_cd(0.0), 0.424);
        assert_relative_eq!(calculate_sphere_cd(0.5), 0.45 * 0.25 + 0.424);
    }

    #[test]
    fn sphere_cd_settles_near_supersonic_asymptote() {
        // Exponential terms die out at high Mach
        assert!((calculate_sphere_cd(10.0) - 0.92).abs() < 1e-3);
        // Supersonic bump sits above both branch endpoints
        assert!(calculate_sphere_cd(1.2) > calculate_sphere_cd(0.722));
        assert!(calculate_sphere_cd(1.2) > calculate_sphere_cd(10.0));
    }

    #[test]
    fn cube_cd_branches() {
        assert_relative_eq!(calculate_cube_cd(0.0), 1.04);
        assert_relative_eq!(calculate_cube_cd(1.0), 0.60 + 1.04);
        assert!((calculate_cube_cd(10.0) - 1.67).abs() < 1e-3);
    }

    #[test]
    fn cube_drags_more_than_sphere() {
        for mach in [0.0, 0.5, 1.0, 2.0, 5.0] {
            assert!(calculate_cube_cd(mach) > calculate_sphere_cd(mach));
        }
    }

    #[test]
    fn dynamic_pressure_matches_half_rho_v2() {
        assert_relative_eq!(dynamic_pressure(1.2, 10.0), 60.0);
    }

    #[test]
    fn drag_force_scales_with_area_and_cd() {
        let params = DragParams { cd: 1.3, area_m2: 0.05 };
        let expected = 0.5 * 1.0 * 1.3 * 0.05 * 400.0;
        assert_relative_eq!(drag_force(20.0, 1.0, params), expected);
    }

    #[test]
    fn drag_acceleration_requires_positive_mass() {
        assert_eq!(
            drag_acceleration(1.0, 0.0).unwrap_err(),
            PhysicsError::NonPositiveMass(0.0)
        );
        assert!(drag_acceleration(1.0, -2.0).is_err());
        assert_relative_eq!(drag_acceleration(10.0, 2.0).unwrap(), 5.0);
    }

    #[test]
    fn drag_vector_opposes_relative_velocity() {
        let params = DragParams { cd: 1.0, area_m2: 0.01 };
        let velocity = Vector3::new(50.0, -10.0, -5.0);
        let wind = Vector3::new(12.0, -8.0, 0.0);
        let rel = relative_velocity(&velocity, &wind);
        let accel = drag_acceleration_vector(&velocity, &wind, 1.2, 2.0, params).unwrap();

        assert!(accel.dot(&rel) < 0.0);
        let expected_mag = drag_force(rel.norm(), 1.2, params) / 2.0;
        assert_relative_eq!(accel.norm(), expected_mag, max_relative = 1e-9);
    }

    #[test]
    fn no_drag_at_zero_relative_speed() {
        let params = DragParams { cd: 1.0, area_m2: 0.01 };
        let velocity = Vector3::new(7.0, 3.0, 0.0);
        let wind = velocity;
        let accel = drag_acceleration_vector(&velocity, &wind, 1.2, 2.0, params).unwrap();
        assert_eq!(accel, Vector3::zeros());
    }
}
