use super::errors::{ConfigError, SimulationError};
use super::types::SimTime;
use rand::Rng;
use rand_distr::Exp;

/// Anything on the line that owns a clock counting down to its next event.
///
/// The controller polls every element for `time_to_next_event`, jumps to the
/// smallest value, fires that element and then advances everyone else by the
/// same amount.
///
/// Firing is not part of the trait. Its result differs per element:
/// `Source::produce` returns a new unit, `Station::fire` parks a finished unit
/// and returns the consumed time, and the sink never fires. The controller
/// matches on `EventKind` and calls the inherent method directly.
pub trait Timed {
    /// Remaining simulated time until this element's next internal event,
    /// `f64::INFINITY` when nothing is scheduled
    fn time_to_next_event(&mut self) -> SimTime;

    /// Let `elapsed` units of simulated time pass
    fn advance<R: Rng + ?Sized>(
        &mut self,
        elapsed: SimTime,
        rng: &mut R,
    ) -> Result<(), SimulationError>;
}

/// Build an exponential distribution parameterised by its mean
pub(crate) fn exponential(what: &str, mean: f64) -> Result<Exp<f64>, ConfigError> {
    let invalid = || ConfigError::InvalidMean {
        what: what.to_string(),
        value: mean,
    };
    if !mean.is_finite() || mean <= 0.0 {
        return Err(invalid());
    }
    Exp::new(1.0 / mean).map_err(|_| invalid())
}
