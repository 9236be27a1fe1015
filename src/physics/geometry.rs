use std::f64::consts::PI;

use crate::physics::PhysicsError;

// ---------------------------------------------------------------------------
// Spherical fragment geometry
// ---------------------------------------------------------------------------

/// Fragment radius (m) for a sphere of the given mass and bulk density.
pub fn radius_from_mass_density(mass_kg: f64, density_kg_m3: f64) -> Result<f64, PhysicsError> {
    if density_kg_m3 <= 0.0 {
        return Err(PhysicsError::NonPositiveDensity(density_kg_m3));
    }
    if mass_kg < 0.0 {
        return Err(PhysicsError::NegativeMass(mass_kg));
    }
    let volume_m3 = mass_kg / density_kg_m3;
    Ok(((3.0 * volume_m3) / (4.0 * PI)).cbrt())
}

/// Cross-sectional area (m^2) presented by a spherical fragment.
pub fn cross_section_from_mass_density(
    mass_kg: f64,
    density_kg_m3: f64,
) -> Result<f64, PhysicsError> {
    let radius_m = radius_from_mass_density(mass_kg, density_kg_m3)?;
    Ok(PI * radius_m * radius_m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn radius_matches_known_value() {
        // 1 g chondrite at 3.32 g/cm^3
        let radius = radius_from_mass_density(0.001, 3320.0).unwrap();
        assert_relative_eq!(radius, 0.004158382511244203, max_relative = 1e-9);
    }

    #[test]
    fn cross_section_is_pi_r_squared() {
        let radius = radius_from_mass_density(0.001, 3320.0).unwrap();
        let area = cross_section_from_mass_density(0.001, 3320.0).unwrap();
        assert_relative_eq!(area, PI * radius * radius, max_relative = 1e-12);
    }

    #[test]
    fn zero_mass_gives_zero_area() {
        assert_eq!(cross_section_from_mass_density(0.0, 3320.0).unwrap(), 0.0);
    }

    #[test]
    fn non_positive_density_is_rejected() {
        assert_eq!(
            radius_from_mass_density(1.0, 0.0).unwrap_err(),
            PhysicsError::NonPositiveDensity(0.0)
        );
        assert!(radius_from_mass_density(1.0, -100.0).is_err());
    }

    #[test]
    fn negative_mass_is_rejected() {
        assert_eq!(
            radius_from_mass_density(-1.0, 3320.0).unwrap_err(),
            PhysicsError::NegativeMass(-1.0)
        );
    }
}
