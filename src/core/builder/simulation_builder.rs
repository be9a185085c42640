use super::line_config::{LineConfig, StationConfig, SINK};
use crate::core::activation::Binding;
use crate::core::errors::ConfigError;
use crate::core::routing::RoutingTable;
use crate::core::simulation_engine::Simulation;
use crate::core::source::Source;
use crate::core::station::Station;
use crate::core::types::{Receiver, StationId, StationKind};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Imperative API for assembling a production line.
///
/// Stations are added in definition order, which is also the order used to
/// break ties between simultaneous events and to route outbound units.
pub struct SimulationBuilder {
    arrival_mean: f64,
    stations: Vec<StationConfig>,
    transitions: Vec<(StationId, Receiver, f64)>,
    bindings: Vec<Binding>,
    activation_threshold: usize,
    entry_stations: Vec<StationId>,
    seed: Option<u64>,
}

impl SimulationBuilder {
    /// Create a builder for a line fed with the given mean inter-arrival time
    pub fn new(arrival_mean: f64) -> Self {
        Self {
            arrival_mean,
            stations: Vec::new(),
            transitions: Vec::new(),
            bindings: Vec::new(),
            activation_threshold: 3,
            entry_stations: Vec::new(),
            seed: None,
        }
    }

    /// Build from a declarative line description
    pub fn from_config(config: &LineConfig) -> Result<Self, ConfigError> {
        let mut builder = Self::new(config.arrival_mean)
            .with_activation_threshold(config.activation_threshold);
        if let Some(seed) = config.seed {
            builder = builder.with_seed(seed);
        }

        for station in &config.stations {
            builder.add_station(station.clone())?;
        }
        for transition in &config.transitions {
            let from = builder.lookup(&transition.from)?;
            let to = if transition.to == SINK {
                Receiver::Sink
            } else {
                Receiver::Station(builder.lookup(&transition.to)?)
            };
            builder.connect(from, to, transition.probability)?;
        }
        for (first, second) in &config.bindings {
            let (first, second) = (builder.lookup(first)?, builder.lookup(second)?);
            builder.bind(first, second)?;
        }
        for name in &config.entry_stations {
            let entry = builder.lookup(name)?;
            builder.add_entry(entry)?;
        }
        Ok(builder)
    }

    fn lookup(&self, name: &str) -> Result<StationId, ConfigError> {
        self.stations
            .iter()
            .position(|s| s.name == name)
            .map(StationId::new)
            .ok_or_else(|| ConfigError::UnknownStationName(name.to_string()))
    }

    fn config(&self, id: StationId) -> Result<&StationConfig, ConfigError> {
        self.stations
            .get(id.index())
            .ok_or(ConfigError::UnknownStation(id))
    }

    pub fn with_activation_threshold(mut self, threshold: usize) -> Self {
        self.activation_threshold = threshold;
        self
    }

    /// Fix the random seed for a reproducible run
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Add a station, returning its handle
    pub fn add_station(&mut self, config: StationConfig) -> Result<StationId, ConfigError> {
        if config.name == SINK || self.stations.iter().any(|s| s.name == config.name) {
            return Err(ConfigError::DuplicateStationName(config.name));
        }
        let id = StationId::new(self.stations.len());
        self.stations.push(config);
        Ok(id)
    }

    /// Add a routing transition from `from` to `to` with the given probability
    pub fn connect(
        &mut self,
        from: StationId,
        to: Receiver,
        probability: f64,
    ) -> Result<(), ConfigError> {
        let sender = self.config(from)?.name.clone();
        if let Receiver::Station(id) = to {
            self.config(id)?;
        }
        if !probability.is_finite() || probability < 0.0 {
            return Err(ConfigError::InvalidProbability {
                sender,
                probability,
            });
        }
        self.transitions.push((from, to, probability));
        Ok(())
    }

    /// Couple two secondary stations under the activation controller
    pub fn bind(&mut self, first: StationId, second: StationId) -> Result<(), ConfigError> {
        let invalid = ConfigError::InvalidBinding {
            first: self.config(first)?.name.clone(),
            second: self.config(second)?.name.clone(),
        };
        let binding = Binding::new(first, second, |id| {
            self.stations.get(id.index()).map(|s| s.kind)
        })
        .ok_or(invalid)?;
        self.bindings.push(binding);
        Ok(())
    }

    /// Let new arrivals enter at `station`. Without any explicit entry every
    /// non-secondary station is an entry.
    pub fn add_entry(&mut self, station: StationId) -> Result<(), ConfigError> {
        self.config(station)?;
        if !self.entry_stations.contains(&station) {
            self.entry_stations.push(station);
        }
        Ok(())
    }

    /// Validate the line and create the simulation
    pub fn build(self) -> Result<Simulation, ConfigError> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let stations = self
            .stations
            .iter()
            .map(Station::new)
            .collect::<Result<Vec<_>, _>>()?;

        let mut routing = RoutingTable::new(stations.len());
        for &(from, to, probability) in &self.transitions {
            routing.add(from, to, probability)?;
        }
        routing.validate(&stations)?;

        let entry_stations = if self.entry_stations.is_empty() {
            self.stations
                .iter()
                .enumerate()
                .filter(|(_, s)| s.kind != StationKind::Secondary)
                .map(|(index, _)| StationId::new(index))
                .collect()
        } else {
            self.entry_stations
        };
        if entry_stations.is_empty() {
            return Err(ConfigError::NoEntryStation);
        }

        let source = Source::new(self.arrival_mean, &mut rng)?;
        debug!(
            "Built line with {} stations, {} transitions, {} bindings",
            stations.len(),
            self.transitions.len(),
            self.bindings.len()
        );

        Ok(Simulation::from_parts(
            stations,
            source,
            routing,
            self.bindings,
            self.activation_threshold,
            entry_stations,
            rng,
        ))
    }
}

impl LineConfig {
    /// Validate the description and create a runnable simulation
    pub fn build(&self) -> Result<Simulation, ConfigError> {
        SimulationBuilder::from_config(self)?.build()
    }
}
