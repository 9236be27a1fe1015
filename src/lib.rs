pub mod atmosphere;
pub mod dynamics;
pub mod ensemble;
pub mod environment;
pub mod physics;
pub mod sim;

// Convenience re-exports for the common simulation surface
pub use atmosphere::{AtmosphericLevel, AtmosphericProfile, ProfileError};
pub use dynamics::state::{Deriv, State, G0};
pub use environment::{AccelerationModel, DragModel, Environment, WindModel};
pub use physics::PhysicsError;
pub use sim::integrator::{ExplicitEuler, Integrator, RungeKutta4};
pub use sim::mass_finder::{find_mass_for_flight_time, MassFinderError, MassSearchConfig};
pub use sim::reverse::run_reverse_trajectory;
pub use sim::runner::{run_trajectory, RunConfig, TerminationReason, TrajectoryResult};
pub use sim::strewn_field::{calculate_simulated_terminus, generate_strewn_field, StrewnFieldPoint};
