use super::types::StationId;

/// Problems detected while assembling a line, before any simulated time passes
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Outgoing probabilities of a sender do not add up to one
    ProbabilitySum { sender: String, total: f64 },
    /// A single transition probability is negative or not finite
    InvalidProbability { sender: String, probability: f64 },
    UnknownStation(StationId),
    UnknownStationName(String),
    DuplicateStationName(String),
    /// Only two distinct secondary stations can be bound together
    InvalidBinding { first: String, second: String },
    /// Exponential means must be positive and finite
    InvalidMean { what: String, value: f64 },
    NoMachines(String),
    NoEntryStation,
    MissingRoutes(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ProbabilitySum { sender, total } => write!(
                f,
                "Transition probabilities from '{}' sum to {}, expected 1",
                sender, total
            ),
            ConfigError::InvalidProbability {
                sender,
                probability,
            } => write!(
                f,
                "Invalid transition probability {} from '{}'",
                probability, sender
            ),
            ConfigError::UnknownStation(id) => write!(f, "Station {} not found", id),
            ConfigError::UnknownStationName(name) => write!(f, "Station '{}' not found", name),
            ConfigError::DuplicateStationName(name) => {
                write!(f, "Station '{}' is defined more than once", name)
            }
            ConfigError::InvalidBinding { first, second } => write!(
                f,
                "Cannot bind '{}' and '{}': only two distinct secondary stations can be bound",
                first, second
            ),
            ConfigError::InvalidMean { what, value } => {
                write!(f, "Mean time for {} must be positive and finite, got {}", what, value)
            }
            ConfigError::NoMachines(name) => write!(f, "Station '{}' has no machines", name),
            ConfigError::NoEntryStation => write!(f, "No station accepts new arrivals"),
            ConfigError::MissingRoutes(name) => {
                write!(f, "Station '{}' has no outgoing transitions", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Broken preconditions inside the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A unit was assigned to a machine that is still working
    MachineBusy { unit_id: u64 },
    /// A machine was completed before its service time elapsed
    NotDue { remaining: f64 },
    /// A station was fired with no busy machine selected
    NothingToFire(String),
    /// No receiver with positive weight was left to route to
    EmptyDistribution(String),
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::MachineBusy { unit_id } => {
                write!(f, "Cannot assign unit {}: machine is busy", unit_id)
            }
            SimulationError::NotDue { remaining } => write!(
                f,
                "Cannot complete machine: {} time units of service remain",
                remaining
            ),
            SimulationError::NothingToFire(station) => {
                write!(f, "Station '{}' has no machine due to fire", station)
            }
            SimulationError::EmptyDistribution(station) => {
                write!(f, "No eligible receiver for units leaving '{}'", station)
            }
        }
    }
}

impl std::error::Error for SimulationError {}

/// Any failure of building or running a line
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Config(ConfigError),
    Simulation(SimulationError),
    /// The replication thread pool could not be created
    ThreadPool(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Config(err) => write!(f, "Configuration error: {}", err),
            Error::Simulation(err) => write!(f, "Simulation error: {}", err),
            Error::ThreadPool(msg) => write!(f, "Thread pool error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(err) => Some(err),
            Error::Simulation(err) => Some(err),
            Error::ThreadPool(_) => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<SimulationError> for Error {
    fn from(err: SimulationError) -> Self {
        Error::Simulation(err)
    }
}
