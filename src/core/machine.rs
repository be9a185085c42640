use super::errors::{ConfigError, SimulationError};
use super::timed::exponential;
use super::types::SimTime;
use super::unit::Unit;
use log::trace;
use rand::Rng;
use rand_distr::{Distribution, Exp};

/// Slack allowed when checking that a service has run out
const DUE_TOLERANCE: f64 = 1e-9;

/// Single server holding at most one unit
#[derive(Debug, Clone)]
pub struct Machine {
    service: Exp<f64>,
    current_unit: Option<Unit>,
    time_to_completion: SimTime,
    busy_time: SimTime,
}

impl Machine {
    /// Create an idle machine with exponential service times of the given mean
    pub fn new(service_mean: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            service: exponential("service", service_mean)?,
            current_unit: None,
            time_to_completion: f64::INFINITY,
            busy_time: 0.0,
        })
    }

    pub fn is_idle(&self) -> bool {
        self.current_unit.is_none()
    }

    pub fn current_unit(&self) -> Option<&Unit> {
        self.current_unit.as_ref()
    }

    /// Remaining service time, `f64::INFINITY` while idle
    pub fn time_to_completion(&self) -> SimTime {
        self.time_to_completion
    }

    /// Total time spent serving units
    pub fn busy_time(&self) -> SimTime {
        self.busy_time
    }

    /// Start serving `unit`, drawing a fresh service duration
    pub fn assign<R: Rng + ?Sized>(&mut self, unit: Unit, rng: &mut R) -> Result<(), SimulationError> {
        if let Some(current) = &self.current_unit {
            return Err(SimulationError::MachineBusy {
                unit_id: current.id(),
            });
        }
        self.time_to_completion = self.service.sample(rng);
        trace!(
            "Unit {} starts service for {:.4}",
            unit.id(),
            self.time_to_completion
        );
        self.current_unit = Some(unit);
        Ok(())
    }

    /// Let simulated time pass. Idle machines do not accumulate busy time.
    pub fn advance(&mut self, elapsed: SimTime) {
        if self.is_idle() {
            return;
        }
        self.busy_time += elapsed.min(self.time_to_completion);
        self.time_to_completion = (self.time_to_completion - elapsed).max(0.0);
    }

    /// Hand back the finished unit, applying a pending rework pass
    pub fn complete(&mut self) -> Result<Unit, SimulationError> {
        if self.time_to_completion > DUE_TOLERANCE {
            return Err(SimulationError::NotDue {
                remaining: self.time_to_completion,
            });
        }
        let mut unit = self
            .current_unit
            .take()
            .ok_or(SimulationError::NotDue {
                remaining: f64::INFINITY,
            })?;
        unit.apply_rework();
        self.time_to_completion = f64::INFINITY;
        Ok(unit)
    }

    /// Run the remaining service to its end and complete it.
    ///
    /// Returns the unit and the simulated time that was consumed.
    pub fn finish(&mut self) -> Result<(Unit, SimTime), SimulationError> {
        let remaining = self.time_to_completion;
        if !remaining.is_finite() {
            return Err(SimulationError::NotDue { remaining });
        }
        self.advance(remaining);
        let unit = self.complete()?;
        Ok((unit, remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(5)
    }

    #[test]
    fn test_new_machine_is_idle() {
        let machine = Machine::new(1.0).unwrap();
        assert!(machine.is_idle());
        assert_eq!(machine.time_to_completion(), f64::INFINITY);
        assert_eq!(machine.busy_time(), 0.0);
    }

    #[test]
    fn test_assign_to_busy_machine_fails() {
        let mut rng = rng();
        let mut machine = Machine::new(1.0).unwrap();
        machine.assign(Unit::new(1), &mut rng).unwrap();
        assert!(!machine.is_idle());
        assert!(machine.time_to_completion().is_finite());

        let err = machine.assign(Unit::new(2), &mut rng).unwrap_err();
        assert_eq!(err, SimulationError::MachineBusy { unit_id: 1 });
    }

    #[test]
    fn test_complete_before_due_fails() {
        let mut rng = rng();
        let mut machine = Machine::new(1.0).unwrap();
        machine.assign(Unit::new(1), &mut rng).unwrap();
        assert!(matches!(
            machine.complete(),
            Err(SimulationError::NotDue { .. })
        ));
        // idle machines are never due either
        let mut idle = Machine::new(1.0).unwrap();
        assert!(idle.complete().is_err());
    }

    #[test]
    fn test_advance_accumulates_busy_time() {
        let mut rng = rng();
        let mut machine = Machine::new(100.0).unwrap();
        machine.advance(5.0);
        assert_eq!(machine.busy_time(), 0.0);

        machine.assign(Unit::new(1), &mut rng).unwrap();
        let total = machine.time_to_completion();
        let step = total / 4.0;
        machine.advance(step);
        assert!((machine.busy_time() - step).abs() < 1e-12);
        assert!((machine.time_to_completion() - (total - step)).abs() < 1e-9);
    }

    #[test]
    fn test_finish_returns_consumed_time_and_goes_idle() {
        let mut rng = rng();
        let mut machine = Machine::new(3.0).unwrap();
        machine.assign(Unit::new(9), &mut rng).unwrap();
        let total = machine.time_to_completion();
        machine.advance(total / 2.0);

        let (unit, consumed) = machine.finish().unwrap();
        assert_eq!(unit.id(), 9);
        assert!((consumed - total / 2.0).abs() < 1e-9);
        assert!((machine.busy_time() - total).abs() < 1e-9);
        assert!(machine.is_idle());
        assert_eq!(machine.time_to_completion(), f64::INFINITY);
    }

    #[test]
    fn test_completion_applies_single_rework_pass() {
        let mut rng = rng();
        let mut machine = Machine::new(1.0).unwrap();
        let mut unit = Unit::new(4);
        unit.mark_for_rework();
        machine.assign(unit, &mut rng).unwrap();

        let (unit, _) = machine.finish().unwrap();
        assert_eq!(unit.rework_count(), 1);
        assert!(!unit.needs_rework());
    }
}
