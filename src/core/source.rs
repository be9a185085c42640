use super::errors::{ConfigError, SimulationError};
use super::timed::{exponential, Timed};
use super::types::SimTime;
use super::unit::Unit;
use rand::Rng;
use rand_distr::{Distribution, Exp};

/// Generator of new units with exponentially distributed inter-arrival times
#[derive(Debug, Clone)]
pub struct Source {
    interarrival: Exp<f64>,
    time_to_arrival: SimTime,
    last_id: u64,
}

impl Source {
    /// Create a source and draw the first arrival time
    pub fn new<R: Rng + ?Sized>(arrival_mean: f64, rng: &mut R) -> Result<Self, ConfigError> {
        let interarrival = exponential("arrivals", arrival_mean)?;
        let time_to_arrival = interarrival.sample(rng);
        Ok(Self {
            interarrival,
            time_to_arrival,
            last_id: 0,
        })
    }

    /// Emit the next unit and restart the arrival clock
    pub fn produce<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Unit {
        self.time_to_arrival = self.interarrival.sample(rng);
        self.last_id += 1;
        Unit::new(self.last_id)
    }

    /// Time until the next arrival, as drawn by the last `produce`
    pub fn time_to_arrival(&self) -> SimTime {
        self.time_to_arrival
    }

    /// Number of units produced so far
    pub fn produced_count(&self) -> u64 {
        self.last_id
    }
}

impl Timed for Source {
    fn time_to_next_event(&mut self) -> SimTime {
        self.time_to_arrival()
    }

    /// Station events leave the arrival clock alone. The next arrival time is
    /// only redrawn by `produce`.
    fn advance<R: Rng + ?Sized>(
        &mut self,
        _elapsed: SimTime,
        _rng: &mut R,
    ) -> Result<(), SimulationError> {
        Ok(())
    }
}
