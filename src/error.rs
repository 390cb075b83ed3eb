use thiserror::Error;

use crate::config::ConfigError;
use crate::queue::QueueError;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(#[from] ConfigError),
    #[error(transparent)]
    Queue(#[from] QueueError),
    /// The tick cap was reached with both sides still standing.
    #[error(
        "simulation did not converge after {ticks} ticks \
         ({elapsed_hours} hours, {humans} humans, {zombies} zombies, {pending} pending)"
    )]
    DidNotConverge {
        ticks: u64,
        elapsed_hours: f64,
        humans: u64,
        zombies: u64,
        pending: u64,
    },
}
