use super::config::{ConcurrencyMode, ReplicationConfig};
use crate::core::builder::line_config::LineConfig;
use crate::core::errors::{ConfigError, Error};
use crate::core::simulation_engine::{Simulation, Summary};
use log::info;
use rayon::prelude::*;

/// Run one independent simulation per seed and collect their summaries.
///
/// `factory` builds a fresh simulation for a seed. Summaries come back in seed
/// order whatever the concurrency mode.
pub fn replicate<F>(config: &ReplicationConfig, factory: F) -> Result<Vec<Summary>, Error>
where
    F: Fn(u64) -> Result<Simulation, ConfigError> + Sync,
{
    let run = |seed: u64| -> Result<Summary, Error> {
        let mut simulation = factory(seed)?;
        Ok(simulation.simulate(config.horizon)?)
    };

    info!(
        "Running {} replications ({:?}) up to t={}",
        config.seeds.len(),
        config.concurrency_mode,
        config.horizon
    );

    match config.concurrency_mode {
        ConcurrencyMode::Sequential => config.seeds.iter().map(|&seed| run(seed)).collect(),
        ConcurrencyMode::Rayon => {
            let job = || {
                config
                    .seeds
                    .par_iter()
                    .map(|&seed| run(seed))
                    .collect::<Result<Vec<_>, _>>()
            };
            match config.thread_pool_size {
                Some(size) => rayon::ThreadPoolBuilder::new()
                    .num_threads(size)
                    .build()
                    .map_err(|err| Error::ThreadPool(err.to_string()))?
                    .install(job),
                None => job(),
            }
        }
    }
}

/// Replicate a declarative line, overriding its seed for every run
pub fn replicate_line(line: &LineConfig, config: &ReplicationConfig) -> Result<Vec<Summary>, Error> {
    replicate(config, |seed| line.clone().with_seed(seed).build())
}
