use serde::{Deserialize, Serialize};

/// Simulated time, in abstract model time units
pub type SimTime = f64;

/// Index of a station inside a simulation, in definition order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StationId(pub(crate) usize);

impl StationId {
    /// Create a station ID from its definition index
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the definition index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for StationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "station#{}", self.0)
    }
}

/// Role a station plays on the line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationKind {
    /// First-stage machining
    Primary,
    /// First-stage machine that performs the rework pass
    Rework,
    /// Second-stage machining, may be bound into an activation pair
    Secondary,
}

impl std::fmt::Display for StationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StationKind::Primary => write!(f, "primary"),
            StationKind::Rework => write!(f, "rework"),
            StationKind::Secondary => write!(f, "secondary"),
        }
    }
}

/// Destination of a routing transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Receiver {
    Station(StationId),
    Sink,
}

impl std::fmt::Display for Receiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Receiver::Station(id) => write!(f, "{}", id),
            Receiver::Sink => write!(f, "sink"),
        }
    }
}

/// Queue ceiling for a station. `Unbounded` is the sentinel for "no ceiling".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueCapacity {
    Bounded(usize),
    Unbounded,
}

impl QueueCapacity {
    /// Whether a queue currently holding `len` units can take one more
    pub fn admits(&self, len: usize) -> bool {
        match self {
            QueueCapacity::Bounded(max) => len < *max,
            QueueCapacity::Unbounded => true,
        }
    }
}

impl Default for QueueCapacity {
    fn default() -> Self {
        QueueCapacity::Unbounded
    }
}
