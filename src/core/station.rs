use super::builder::line_config::StationConfig;
use super::errors::{ConfigError, SimulationError};
use super::machine::Machine;
use super::timed::Timed;
use super::types::{QueueCapacity, SimTime, StationKind};
use super::unit::Unit;
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// End-of-run statistics for one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReport {
    pub name: String,
    pub kind: StationKind,
    /// Share of machine time spent serving, averaged over the station's machines
    pub utilization: f64,
    /// Time-averaged queue length
    pub mean_queue_size: f64,
    pub completions: u64,
    pub drops: u64,
    pub active: bool,
}

/// A FIFO queue in front of a pool of identical machines
#[derive(Debug, Clone)]
pub struct Station {
    name: String,
    kind: StationKind,
    machines: Vec<Machine>,
    queue: VecDeque<Unit>,
    capacity: QueueCapacity,
    active: bool,
    /// Machine chosen by the last `time_to_next_event` query
    next_machine: Option<usize>,
    outbound: Option<Unit>,
    drops: u64,
    completions: u64,
    /// Integral of queue length over simulated time
    queue_area: f64,
}

impl Station {
    pub fn new(config: &StationConfig) -> Result<Self, ConfigError> {
        if config.machines == 0 {
            return Err(ConfigError::NoMachines(config.name.clone()));
        }
        let machines = (0..config.machines)
            .map(|_| Machine::new(config.service_mean))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigError::InvalidMean {
                what: format!("station '{}'", config.name),
                value: config.service_mean,
            })?;

        Ok(Self {
            name: config.name.clone(),
            kind: config.kind,
            machines,
            queue: VecDeque::new(),
            capacity: config.capacity,
            active: config.active,
            next_machine: None,
            outbound: None,
            drops: 0,
            completions: 0,
            queue_area: 0.0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> StationKind {
        self.kind
    }

    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    /// Admit a unit into the queue. A full queue drops the unit and counts it.
    pub fn receive(&mut self, unit: Unit) -> bool {
        if self.capacity.admits(self.queue.len()) {
            self.queue.push_back(unit);
            true
        } else {
            self.drops += 1;
            warn!(
                "[Station:{}] Queue full ({} units), dropping unit {}",
                self.name,
                self.queue.len(),
                unit.id()
            );
            false
        }
    }

    /// Complete the machine selected by the last `time_to_next_event` call.
    ///
    /// The finished unit is parked as the outbound unit until routing takes
    /// it. Returns the service time consumed by the completion.
    pub fn fire(&mut self) -> Result<SimTime, SimulationError> {
        let index = self
            .next_machine
            .take()
            .ok_or_else(|| SimulationError::NothingToFire(self.name.clone()))?;
        let machine = self
            .machines
            .get_mut(index)
            .ok_or_else(|| SimulationError::NothingToFire(self.name.clone()))?;
        let (unit, consumed) = machine.finish()?;

        debug!(
            "[Station:{}] Machine {} finished unit {} (reworks: {})",
            self.name,
            index,
            unit.id(),
            unit.rework_count()
        );
        self.completions += 1;
        self.outbound = Some(unit);
        Ok(consumed)
    }

    /// Take the unit waiting to be routed onward, if any
    pub fn take_outbound(&mut self) -> Option<Unit> {
        self.outbound.take()
    }

    pub fn has_outbound(&self) -> bool {
        self.outbound.is_some()
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Number of machines currently serving a unit
    pub fn in_service(&self) -> usize {
        self.machines.iter().filter(|m| !m.is_idle()).count()
    }

    /// Every unit held here: queued, in service or awaiting routing
    pub fn units_held(&self) -> usize {
        self.queue_len() + self.in_service() + usize::from(self.has_outbound())
    }

    pub fn drops(&self) -> u64 {
        self.drops
    }

    pub fn completions(&self) -> u64 {
        self.completions
    }

    /// Summarise the run over `total_time` units of simulated time
    pub fn report(&self, total_time: SimTime) -> StationReport {
        let busy: f64 = self.machines.iter().map(Machine::busy_time).sum();
        let (utilization, mean_queue_size) = if total_time > 0.0 {
            (
                busy / (total_time * self.machines.len() as f64),
                self.queue_area / total_time,
            )
        } else {
            (0.0, 0.0)
        };

        StationReport {
            name: self.name.clone(),
            kind: self.kind,
            utilization,
            mean_queue_size,
            completions: self.completions,
            drops: self.drops,
            active: self.active,
        }
    }
}

impl Timed for Station {
    fn time_to_next_event(&mut self) -> SimTime {
        let mut best: Option<(usize, SimTime)> = None;
        for (index, machine) in self.machines.iter().enumerate() {
            if machine.is_idle() {
                continue;
            }
            let time = machine.time_to_completion();
            if best.map_or(true, |(_, t)| time < t) {
                best = Some((index, time));
            }
        }
        self.next_machine = best.map(|(index, _)| index);
        best.map_or(f64::INFINITY, |(_, time)| time)
    }

    fn advance<R: Rng + ?Sized>(
        &mut self,
        elapsed: SimTime,
        rng: &mut R,
    ) -> Result<(), SimulationError> {
        for machine in &mut self.machines {
            if !machine.is_idle() {
                machine.advance(elapsed);
            } else if let Some(unit) = self.queue.pop_front() {
                machine.assign(unit, rng)?;
            }
        }
        self.queue_area += self.queue.len() as f64 * elapsed;
        Ok(())
    }
}
