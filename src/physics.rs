pub mod ablation;
pub mod drag;
pub mod geometry;

use thiserror::Error;

/// Precondition violations in the physical helpers. These reject bad
/// arguments outright rather than clamping them.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PhysicsError {
    #[error("fragment bulk density must be positive, got {0} kg/m^3")]
    NonPositiveDensity(f64),

    #[error("fragment mass cannot be negative, got {0} kg")]
    NegativeMass(f64),

    #[error("mass must be positive to convert force into acceleration, got {0} kg")]
    NonPositiveMass(f64),
}
