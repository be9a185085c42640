pub mod activation;
pub mod builder;
pub mod errors;
pub mod execution;
pub mod machine;
pub mod routing;
pub mod simulation_engine;
pub mod sink;
pub mod source;
pub mod station;
pub mod timed;
pub mod types;
pub mod unit;

#[cfg(test)]
mod tests;
