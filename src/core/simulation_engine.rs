use super::activation::{apply_bindings, Binding};
use super::errors::SimulationError;
use super::routing::{route_outbound, RoutingTable};
use super::sink::Sink;
use super::source::Source;
use super::station::{Station, StationReport};
use super::timed::Timed;
use super::types::{SimTime, StationId};
use super::unit::Unit;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened in one step of the event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The source produced a new unit
    Arrival,
    /// A machine of this station finished its unit
    Completion(StationId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub event: EventKind,
    pub elapsed: SimTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Done,
}

/// Observer trait for simulation events
pub trait SimulationObserver: Send {
    /// Called when simulated time moves forward
    fn on_time_advance(&mut self, old_time: SimTime, new_time: SimTime);

    /// Called when a simulation step completes
    fn on_step_complete(&mut self, time: SimTime, outcome: &StepOutcome);
}

/// Result record of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub run_id: Uuid,
    pub simulated_time: SimTime,
    pub finished_count: usize,
    pub scrap_count: usize,
    /// Utilization of every station, in definition order
    pub per_station_utilization: Vec<f64>,
    pub produced_count: u64,
    /// Units lost to full queues
    pub dropped_count: u64,
    /// Units still queued or in service when the run stopped
    pub in_system: usize,
    pub stations: Vec<StationReport>,
}

/// The production line controller and its next-event loop
pub struct Simulation {
    run_id: Uuid,
    current_time: SimTime,
    stations: Vec<Station>,
    source: Source,
    sink: Sink,
    routing: RoutingTable,
    bindings: Vec<Binding>,
    activation_threshold: usize,
    entry_stations: Vec<StationId>,
    rng: StdRng,
    observers: Vec<Box<dyn SimulationObserver>>,
}

impl Simulation {
    /// Assemble a validated line. Use `SimulationBuilder` to get here.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        stations: Vec<Station>,
        source: Source,
        routing: RoutingTable,
        bindings: Vec<Binding>,
        activation_threshold: usize,
        entry_stations: Vec<StationId>,
        rng: StdRng,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            current_time: 0.0,
            stations,
            source,
            sink: Sink::new(),
            routing,
            bindings,
            activation_threshold,
            entry_stations,
            rng,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    /// Notify all observers of a time advance
    fn notify_time_advance(&mut self, old_time: SimTime, new_time: SimTime) {
        for observer in &mut self.observers {
            observer.on_time_advance(old_time, new_time);
        }
    }

    /// Notify all observers of step completion
    fn notify_step_complete(&mut self, outcome: &StepOutcome) {
        let time = self.current_time;
        for observer in &mut self.observers {
            observer.on_step_complete(time, outcome);
        }
    }

    /// Run until `horizon` and summarise
    pub fn simulate(&mut self, horizon: SimTime) -> Result<Summary, SimulationError> {
        info!(
            "[Run:{}] Simulating {} stations up to t={}",
            self.run_id,
            self.stations.len(),
            horizon
        );
        let mut steps: u64 = 0;
        while self.state(horizon) == RunState::Running {
            self.step()?;
            steps += 1;
        }

        let summary = self.summary();
        info!(
            "[Run:{}] Done after {} steps at t={:.3}: {} finished, {} scrapped, {} dropped",
            self.run_id,
            steps,
            self.current_time,
            summary.finished_count,
            summary.scrap_count,
            summary.dropped_count
        );
        Ok(summary)
    }

    pub fn state(&self, horizon: SimTime) -> RunState {
        if self.current_time >= horizon {
            RunState::Done
        } else {
            RunState::Running
        }
    }

    /// Process the next event, route what it released and advance the clocks
    pub fn step(&mut self) -> Result<StepOutcome, SimulationError> {
        let arrival_in = self.source.time_to_next_event();
        let mut next_station: Option<(usize, SimTime)> = None;
        for (index, station) in self.stations.iter_mut().enumerate() {
            let time = station.time_to_next_event();
            if next_station.map_or(true, |(_, best)| time < best) {
                next_station = Some((index, time));
            }
        }
        let station_min = next_station.map_or(f64::INFINITY, |(_, time)| time);

        let outcome = if arrival_in < station_min {
            let unit = self.source.produce(&mut self.rng);
            self.admit(unit);
            StepOutcome {
                event: EventKind::Arrival,
                elapsed: arrival_in,
            }
        } else {
            let index = next_station
                .map(|(index, _)| index)
                .ok_or_else(|| SimulationError::NothingToFire("line".to_string()))?;
            let elapsed = self.stations[index].fire()?;
            StepOutcome {
                event: EventKind::Completion(StationId::new(index)),
                elapsed,
            }
        };

        route_outbound(&mut self.stations, &self.routing, &mut self.sink, &mut self.rng)?;
        apply_bindings(&self.bindings, &mut self.stations, self.activation_threshold);

        // the arrival clock only restarts in `produce`
        for station in &mut self.stations {
            station.advance(outcome.elapsed, &mut self.rng)?;
        }

        let old_time = self.current_time;
        self.current_time += outcome.elapsed;
        debug!(
            "t={:.4} {:?} (+{:.4})",
            self.current_time, outcome.event, outcome.elapsed
        );
        if old_time != self.current_time {
            self.notify_time_advance(old_time, self.current_time);
        }
        self.notify_step_complete(&outcome);

        Ok(outcome)
    }

    /// Hand a fresh unit to one of the entry stations, picked uniformly
    fn admit(&mut self, unit: Unit) {
        let pick = self.rng.gen_range(0..self.entry_stations.len());
        let entry = self.entry_stations[pick];
        debug!("Unit {} arrives at {}", unit.id(), entry);
        self.stations[entry.index()].receive(unit);
    }

    /// Statistics over the simulated time so far
    pub fn summary(&self) -> Summary {
        let stations: Vec<StationReport> = self
            .stations
            .iter()
            .map(|station| station.report(self.current_time))
            .collect();

        Summary {
            run_id: self.run_id,
            simulated_time: self.current_time,
            finished_count: self.sink.finished_count(),
            scrap_count: self.sink.scrap_count(),
            per_station_utilization: stations.iter().map(|r| r.utilization).collect(),
            produced_count: self.source.produced_count(),
            dropped_count: self.dropped_count(),
            in_system: self.units_in_system(),
            stations,
        }
    }

    /// Get current simulation time
    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(id.index())
    }

    /// Look up a station by name
    pub fn station_id(&self, name: &str) -> Option<StationId> {
        self.stations
            .iter()
            .position(|s| s.name() == name)
            .map(StationId::new)
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn activation_threshold(&self) -> usize {
        self.activation_threshold
    }

    pub fn entry_stations(&self) -> &[StationId] {
        &self.entry_stations
    }

    pub fn dropped_count(&self) -> u64 {
        self.stations.iter().map(Station::drops).sum()
    }

    /// Units currently held by any station
    pub fn units_in_system(&self) -> usize {
        self.stations.iter().map(Station::units_held).sum()
    }
}
