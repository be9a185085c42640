//! Declarative description of a production line.
//!
//! `LineConfig` is plain serde data so a line can be kept in a JSON file and
//! turned into a runnable simulation with `SimulationBuilder::from_config`.

use crate::core::types::{QueueCapacity, StationKind};
use serde::{Deserialize, Serialize};

/// Name used for the sink in transition tables
pub const SINK: &str = "sink";

fn default_machines() -> usize {
    1
}

fn default_active() -> bool {
    true
}

fn default_threshold() -> usize {
    3
}

/// Static configuration of one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    pub name: String,
    pub kind: StationKind,
    /// Mean of the exponential service time of each machine
    pub service_mean: f64,
    #[serde(default = "default_machines")]
    pub machines: usize,
    #[serde(default)]
    pub capacity: QueueCapacity,
    /// Whether routing may pick this station at start
    #[serde(default = "default_active")]
    pub active: bool,
}

impl StationConfig {
    /// Single machine, unbounded queue, active
    pub fn new(name: &str, kind: StationKind, service_mean: f64) -> Self {
        Self {
            name: name.to_string(),
            kind,
            service_mean,
            machines: default_machines(),
            capacity: QueueCapacity::Unbounded,
            active: true,
        }
    }

    pub fn with_machines(mut self, machines: usize) -> Self {
        self.machines = machines;
        self
    }

    pub fn with_capacity(mut self, capacity: QueueCapacity) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// One edge of the routing table. `to` is a station name or `"sink"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    pub from: String,
    pub to: String,
    pub probability: f64,
}

/// Complete line description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineConfig {
    /// Mean time between arrivals
    pub arrival_mean: f64,
    pub stations: Vec<StationConfig>,
    pub transitions: Vec<TransitionConfig>,
    /// Pairs of secondary stations coupled by the activation controller
    #[serde(default)]
    pub bindings: Vec<(String, String)>,
    #[serde(default = "default_threshold")]
    pub activation_threshold: usize,
    /// Stations receiving new arrivals. Empty means every non-secondary station.
    #[serde(default)]
    pub entry_stations: Vec<String>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl LineConfig {
    /// The reference two-stage line: a primary machine and a rework machine
    /// feeding two bound secondary machines.
    pub fn two_stage_line(activation_threshold: usize) -> Self {
        let transition = |from: &str, to: &str, probability: f64| TransitionConfig {
            from: from.to_string(),
            to: to.to_string(),
            probability,
        };

        Self {
            arrival_mean: 50.0,
            stations: vec![
                StationConfig::new("primary", StationKind::Primary, 40.0),
                StationConfig::new("rework", StationKind::Rework, 60.0),
                StationConfig::new("secondary-1", StationKind::Secondary, 100.0),
                StationConfig::new("secondary-2", StationKind::Secondary, 100.0).with_active(false),
            ],
            transitions: vec![
                transition("primary", "rework", 0.04),
                transition("primary", "secondary-1", 0.48),
                transition("primary", "secondary-2", 0.48),
                transition("rework", "rework", 0.08),
                transition("rework", "secondary-1", 0.46),
                transition("rework", "secondary-2", 0.46),
                transition("secondary-1", SINK, 1.0),
                transition("secondary-2", SINK, 1.0),
            ],
            bindings: vec![("secondary-1".to_string(), "secondary-2".to_string())],
            activation_threshold,
            entry_stations: Vec::new(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
