pub mod line_config;
pub mod simulation_builder;

// Re-export commonly used types
pub use line_config::{LineConfig, StationConfig, TransitionConfig, SINK};
pub use simulation_builder::SimulationBuilder;
