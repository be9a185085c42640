use super::station::Station;
use super::types::{StationId, StationKind};
use log::debug;

/// Two secondary stations with mutually exclusive activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub first: StationId,
    pub second: StationId,
}

impl Binding {
    /// Pair `first` and `second`. Both must be distinct secondary stations;
    /// `kind_of` resolves a station's kind, `None` for unknown stations.
    pub fn new<F>(first: StationId, second: StationId, kind_of: F) -> Option<Self>
    where
        F: Fn(StationId) -> Option<StationKind>,
    {
        let secondary = |id: StationId| kind_of(id) == Some(StationKind::Secondary);
        (first != second && secondary(first) && secondary(second)).then_some(Self { first, second })
    }
}

fn set_active(station: &mut Station, active: bool) {
    if station.is_active() != active {
        debug!(
            "[Station:{}] {} (queue: {})",
            station.name(),
            if active { "unblocked" } else { "blocked" },
            station.queue_len()
        );
        station.set_active(active);
    }
}

/// Re-evaluate every binding against the queue threshold.
///
/// The first station hands over to the second once its queue exceeds the
/// threshold while the second is below it, and takes back over as soon as its
/// own queue falls below the threshold.
pub fn apply_bindings(bindings: &[Binding], stations: &mut [Station], threshold: usize) {
    for binding in bindings {
        let (first, second) = (binding.first.index(), binding.second.index());
        let first_queue = stations[first].queue_len();
        let second_queue = stations[second].queue_len();

        if first_queue > threshold && second_queue < threshold {
            set_active(&mut stations[first], false);
            set_active(&mut stations[second], true);
        } else if first_queue < threshold {
            set_active(&mut stations[first], true);
            set_active(&mut stations[second], false);
        }
    }
}
