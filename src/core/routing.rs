//! Probabilistic routing of units that leave a station.
//!
//! Every sender owns a list of `(receiver, probability)` transitions summing to
//! one. When some receivers are switched off by the activation controller their
//! probability mass is handed to the active secondary receivers of the same
//! sender so the scrap and rework odds stay as configured.

use super::errors::{ConfigError, SimulationError};
use super::sink::Sink;
use super::station::Station;
use super::types::{Receiver, StationId, StationKind};
use log::trace;
use rand::distributions::WeightedIndex;
use rand::Rng;
use rand_distr::Distribution;

/// Allowed deviation of a sender's probability sum from one
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Outgoing transitions of every station, indexed by sender
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    routes: Vec<Vec<(Receiver, f64)>>,
}

impl RoutingTable {
    pub fn new(station_count: usize) -> Self {
        Self {
            routes: vec![Vec::new(); station_count],
        }
    }

    /// Add a transition. Repeated receivers of one sender are merged.
    pub(crate) fn add(
        &mut self,
        sender: StationId,
        receiver: Receiver,
        probability: f64,
    ) -> Result<(), ConfigError> {
        let routes = self
            .routes
            .get_mut(sender.index())
            .ok_or(ConfigError::UnknownStation(sender))?;
        match routes.iter_mut().find(|(r, _)| *r == receiver) {
            Some((_, p)) => *p += probability,
            None => routes.push((receiver, probability)),
        }
        Ok(())
    }

    /// Configured transitions of `sender`, empty for unknown senders
    pub fn routes(&self, sender: StationId) -> &[(Receiver, f64)] {
        self.routes
            .get(sender.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check every sender has transitions adding up to one
    pub fn validate(&self, stations: &[Station]) -> Result<(), ConfigError> {
        for (index, station) in stations.iter().enumerate() {
            let routes = self.routes(StationId::new(index));
            if routes.is_empty() {
                return Err(ConfigError::MissingRoutes(station.name().to_string()));
            }
            let total: f64 = routes.iter().map(|(_, p)| p).sum();
            if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
                return Err(ConfigError::ProbabilitySum {
                    sender: station.name().to_string(),
                    total,
                });
            }
        }
        Ok(())
    }
}

fn is_active(receiver: Receiver, stations: &[Station]) -> bool {
    match receiver {
        Receiver::Sink => true,
        Receiver::Station(id) => stations.get(id.index()).map_or(false, Station::is_active),
    }
}

fn is_secondary(receiver: Receiver, stations: &[Station]) -> bool {
    match receiver {
        Receiver::Sink => false,
        Receiver::Station(id) => stations
            .get(id.index())
            .map_or(false, |s| s.kind() == StationKind::Secondary),
    }
}

/// Routing distribution of one sender given the current active set.
///
/// The mass of inactive receivers is split evenly over the active secondary
/// receivers. Inactive receivers are then removed rather than kept at their
/// configured weight, so a blocked station is never drawn while an active
/// secondary takes its share. Without any active secondary receiver the
/// configured distribution is returned untouched, inactive receivers included.
pub fn redistribute(routes: &[(Receiver, f64)], stations: &[Station]) -> Vec<(Receiver, f64)> {
    let inactive_mass: f64 = routes
        .iter()
        .filter(|(r, _)| !is_active(*r, stations))
        .map(|(_, p)| p)
        .sum();
    let active_secondaries = routes
        .iter()
        .filter(|(r, _)| is_secondary(*r, stations) && is_active(*r, stations))
        .count();

    if active_secondaries == 0 {
        return routes.to_vec();
    }

    let share = inactive_mass / active_secondaries as f64;
    routes
        .iter()
        .filter(|(r, _)| is_active(*r, stations))
        .map(|&(r, p)| {
            if is_secondary(r, stations) {
                (r, p + share)
            } else {
                (r, p)
            }
        })
        .collect()
}

/// Weighted random pick of one receiver
pub fn choose_receiver<R: Rng + ?Sized>(
    distribution: &[(Receiver, f64)],
    rng: &mut R,
) -> Option<Receiver> {
    let index = WeightedIndex::new(distribution.iter().map(|(_, p)| *p)).ok()?;
    distribution.get(index.sample(rng)).map(|(r, _)| *r)
}

/// Route the outbound unit of every station, in station order.
///
/// A unit heading to a rework station is flagged for rework; a flagged unit
/// that already used its rework pass goes to the sink as scrap.
pub fn route_outbound<R: Rng + ?Sized>(
    stations: &mut [Station],
    table: &RoutingTable,
    sink: &mut Sink,
    rng: &mut R,
) -> Result<usize, SimulationError> {
    let mut routed = 0;
    for index in 0..stations.len() {
        let Some(mut unit) = stations[index].take_outbound() else {
            continue;
        };
        let sender = StationId::new(index);
        let distribution = redistribute(table.routes(sender), stations);
        let receiver = choose_receiver(&distribution, rng).ok_or_else(|| {
            SimulationError::EmptyDistribution(stations[index].name().to_string())
        })?;

        if let Receiver::Station(id) = receiver {
            if stations[id.index()].kind() == StationKind::Rework {
                unit.mark_for_rework();
            }
        }

        routed += 1;
        if unit.is_scrap() {
            trace!("Unit {} from {} scrapped", unit.id(), sender);
            sink.accept_scrap(unit);
            continue;
        }

        trace!("Unit {} routed {} -> {}", unit.id(), sender, receiver);
        match receiver {
            Receiver::Sink => sink.accept_finished(unit),
            Receiver::Station(id) => {
                stations[id.index()].receive(unit);
            }
        }
    }
    Ok(routed)
}
