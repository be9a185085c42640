pub mod core;

// Re-export commonly used types
pub use crate::core::builder::{LineConfig, SimulationBuilder, StationConfig};
pub use crate::core::errors::{ConfigError, Error, SimulationError};
pub use crate::core::execution::{replicate, replicate_line, ConcurrencyMode, ReplicationConfig};
pub use crate::core::simulation_engine::{EventKind, RunState, Simulation, StepOutcome, Summary};
pub use crate::core::types::{QueueCapacity, Receiver, SimTime, StationId, StationKind};
