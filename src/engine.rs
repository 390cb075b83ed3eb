//! The tick loop driving an outbreak to its end.
//!
//! Every tick resolves encounters, parks fresh infections in the
//! [`DelayQueue`], releases the ones that have finished turning and
//! advances the clock by the shorter of the two average times. The run ends
//! once no humans are left, or once no zombies are left with nobody still
//! turning.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::{EngineConfig, OutbreakParams},
    encounter::{self, EncounterMode},
    error::SimulationError,
    queue::DelayQueue,
    rng::{RngManager, ENCOUNTER_STREAM},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Population {
    pub humans: u64,
    pub zombies: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    ZombiesWin,
    HumansSurvive,
}

impl Outcome {
    pub fn message(self, elapsed_hours: f64) -> String {
        match self {
            Outcome::ZombiesWin => {
                format!("Zombies took over the world in {elapsed_hours} hours!")
            }
            Outcome::HumansSurvive => {
                format!("Humans survived the outbreak after {elapsed_hours} hours!")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Terminated(Outcome),
}

#[derive(Debug, Clone)]
pub enum Step {
    Tick(TickSummary),
    Finished(Outcome),
}

/// What happened during one tick, handed to [`Simulation::run_with_hook`].
#[derive(Debug, Clone, Serialize)]
pub struct TickSummary {
    pub tick: u64,
    pub mode: EncounterMode,
    pub humans_infected: u64,
    pub zombies_killed: u64,
    pub zombies_turned: u64,
    pub humans: u64,
    pub zombies: u64,
    pub pending: u64,
    pub elapsed_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub outcome: Outcome,
    pub message: String,
    pub elapsed_hours: f64,
    pub ticks: u64,
    pub humans: u64,
    pub zombies: u64,
    pub pending: u64,
    pub seed: Option<u64>,
}

pub struct Simulation {
    config: EngineConfig,
    population: Population,
    queue: DelayQueue,
    rng: RngManager,
    elapsed_hours: f64,
    ticks: u64,
    state: RunState,
}

impl Simulation {
    /// Validates `config` and prepares a run with an empty queue.
    pub fn new(
        population: Population,
        config: EngineConfig,
        rng: RngManager,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self {
            config,
            population,
            queue: DelayQueue::new(),
            rng,
            elapsed_hours: 0.0,
            ticks: 0,
            state: RunState::Running,
        })
    }

    pub fn seeded(
        population: Population,
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        Self::new(population, config, RngManager::new(seed))
    }

    pub fn population(&self) -> Population {
        self.population
    }

    pub fn queue(&self) -> &DelayQueue {
        &self.queue
    }

    pub fn elapsed_hours(&self) -> f64 {
        self.elapsed_hours
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn check_termination(&self) -> Option<Outcome> {
        if self.population.humans == 0 {
            Some(Outcome::ZombiesWin)
        } else if self.population.zombies == 0 && self.queue.is_empty() {
            Some(Outcome::HumansSurvive)
        } else {
            None
        }
    }

    /// Runs one tick, or reports the outcome without mutating anything
    /// once the run has terminated.
    pub fn step(&mut self) -> Result<Step, SimulationError> {
        if let RunState::Terminated(outcome) = self.state {
            return Ok(Step::Finished(outcome));
        }
        if let Some(outcome) = self.check_termination() {
            self.state = RunState::Terminated(outcome);
            info!(
                ?outcome,
                ticks = self.ticks,
                elapsed_hours = self.elapsed_hours,
                humans = self.population.humans,
                zombies = self.population.zombies,
                "outbreak finished"
            );
            return Ok(Step::Finished(outcome));
        }
        if self.ticks >= self.config.max_ticks {
            let pending = self.queue.pending_total();
            warn!(
                ticks = self.ticks,
                humans = self.population.humans,
                zombies = self.population.zombies,
                pending,
                "tick cap reached before either side was eradicated"
            );
            return Err(SimulationError::DidNotConverge {
                ticks: self.ticks,
                elapsed_hours: self.elapsed_hours,
                humans: self.population.humans,
                zombies: self.population.zombies,
                pending,
            });
        }

        let params = self.config.params;
        let tick_duration = params.tick_duration();
        let (mode, outcome) = {
            let mut rng = self.rng.stream(ENCOUNTER_STREAM);
            encounter::resolve(
                self.population.humans,
                self.population.zombies,
                &params,
                &self.config.thresholds,
                &mut rng,
            )
        };

        self.population.humans -= outcome.humans_infected;
        self.population.zombies -= outcome.zombies_killed;
        self.queue
            .schedule(params.turn_delay(), outcome.humans_infected)?;
        let turned = self
            .queue
            .advance(self.config.time_scale.queue_step(tick_duration));
        self.population.zombies += turned;
        self.elapsed_hours += tick_duration;
        self.ticks += 1;

        let summary = TickSummary {
            tick: self.ticks,
            mode,
            humans_infected: outcome.humans_infected,
            zombies_killed: outcome.zombies_killed,
            zombies_turned: turned,
            humans: self.population.humans,
            zombies: self.population.zombies,
            pending: self.queue.pending_total(),
            elapsed_hours: self.elapsed_hours,
        };
        debug!(
            tick = summary.tick,
            ?mode,
            humans = summary.humans,
            zombies = summary.zombies,
            pending = summary.pending,
            elapsed_hours = summary.elapsed_hours,
            "tick"
        );
        Ok(Step::Tick(summary))
    }

    pub fn run(&mut self) -> Result<RunReport, SimulationError> {
        self.run_with_hook(|_| {})
    }

    /// Runs to completion, calling `hook` after every tick.
    pub fn run_with_hook<F>(&mut self, mut hook: F) -> Result<RunReport, SimulationError>
    where
        F: FnMut(&TickSummary),
    {
        info!(
            humans = self.population.humans,
            zombies = self.population.zombies,
            seed = ?self.rng.seed(),
            time_scale = ?self.config.time_scale,
            "outbreak starting"
        );
        loop {
            match self.step()? {
                Step::Tick(summary) => hook(&summary),
                Step::Finished(outcome) => return Ok(self.report(outcome)),
            }
        }
    }

    fn report(&self, outcome: Outcome) -> RunReport {
        RunReport {
            outcome,
            message: outcome.message(self.elapsed_hours),
            elapsed_hours: self.elapsed_hours,
            ticks: self.ticks,
            humans: self.population.humans,
            zombies: self.population.zombies,
            pending: self.queue.pending_total(),
            seed: self.rng.seed(),
        }
    }
}

/// Runs one outbreak with default settings and fresh entropy, returning the
/// outcome message.
pub fn run_simulation(
    humans: u64,
    zombies: u64,
    avg_attack_time: f64,
    avg_turn_time: f64,
    infect_ratio: f64,
    kill_ratio: f64,
) -> Result<String, SimulationError> {
    let params = OutbreakParams::new(avg_attack_time, avg_turn_time, infect_ratio, kill_ratio);
    let mut simulation = Simulation::new(
        Population { humans, zombies },
        EngineConfig::new(params),
        RngManager::from_entropy(),
    )?;
    Ok(simulation.run()?.message)
}
