pub mod config;
pub mod encounter;
pub mod engine;
pub mod error;
pub mod queue;
pub mod rng;
pub mod scenario;

pub use config::{EngineConfig, OutbreakParams, Thresholds, TimeScale};
pub use engine::{run_simulation, Outcome, Population, RunReport, Simulation, Step, TickSummary};
pub use error::SimulationError;
pub use queue::DelayQueue;
pub use scenario::{Scenario, ScenarioLoader};
