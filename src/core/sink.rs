use super::errors::SimulationError;
use super::timed::Timed;
use super::types::SimTime;
use super::unit::Unit;
use rand::Rng;

/// Terminal collector for finished goods and scrap
#[derive(Debug, Clone, Default)]
pub struct Sink {
    finished: Vec<Unit>,
    scrapped: Vec<Unit>,
}

impl Sink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept_finished(&mut self, unit: Unit) {
        self.finished.push(unit);
    }

    pub fn accept_scrap(&mut self, unit: Unit) {
        self.scrapped.push(unit);
    }

    pub fn finished_count(&self) -> usize {
        self.finished.len()
    }

    pub fn scrap_count(&self) -> usize {
        self.scrapped.len()
    }

    pub fn finished(&self) -> &[Unit] {
        &self.finished
    }

    pub fn scrapped(&self) -> &[Unit] {
        &self.scrapped
    }
}

impl Timed for Sink {
    fn time_to_next_event(&mut self) -> SimTime {
        f64::INFINITY
    }

    fn advance<R: Rng + ?Sized>(
        &mut self,
        _elapsed: SimTime,
        _rng: &mut R,
    ) -> Result<(), SimulationError> {
        Ok(())
    }
}
