//! Run parameters and their validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scale applied to the turn time when scheduling infections.
pub const MINUTES_PER_HOUR: f64 = 60.0;

fn default_max_humans_sampled() -> u64 {
    100
}

fn default_min_zombies_expected() -> u64 {
    10
}

fn default_max_ticks() -> u64 {
    1_000_000
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a positive, finite number of hours (got {value})")]
    InvalidDuration { name: &'static str, value: f64 },
    #[error("{name} must be a probability in [0, 1] (got {value})")]
    InvalidRatio { name: &'static str, value: f64 },
    #[error("min_zombies_expected must be at least 1")]
    ZeroZombieThreshold,
    #[error("max_ticks must be at least 1")]
    ZeroTickCap,
}

/// The four per-run constants of an outbreak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutbreakParams {
    /// Average hours for a zombie to complete one attack.
    pub avg_attack_time: f64,
    /// Average hours for an infected human to turn.
    pub avg_turn_time: f64,
    /// Probability that one encounter infects a human.
    pub infect_ratio: f64,
    /// Probability that one encounter kills the zombie.
    pub kill_ratio: f64,
}

impl OutbreakParams {
    pub fn new(avg_attack_time: f64, avg_turn_time: f64, infect_ratio: f64, kill_ratio: f64) -> Self {
        Self {
            avg_attack_time,
            avg_turn_time,
            infect_ratio,
            kill_ratio,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_duration("avg_attack_time", self.avg_attack_time)?;
        check_duration("avg_turn_time", self.avg_turn_time)?;
        check_ratio("infect_ratio", self.infect_ratio)?;
        check_ratio("kill_ratio", self.kill_ratio)
    }

    /// Hours covered by one tick: the shorter of the two average times.
    pub fn tick_duration(&self) -> f64 {
        self.avg_attack_time.min(self.avg_turn_time)
    }

    /// Queue delay for a fresh infection, in minutes.
    pub fn turn_delay(&self) -> f64 {
        self.avg_turn_time * MINUTES_PER_HOUR
    }
}

/// Population sizes that switch encounters between sampling and the
/// expected-value approximation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Encounters are sampled while humans are at or below this count.
    #[serde(default = "default_max_humans_sampled")]
    pub max_humans_sampled: u64,
    /// Encounters are sampled while zombies are below this count.
    #[serde(default = "default_min_zombies_expected")]
    pub min_zombies_expected: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_humans_sampled: default_max_humans_sampled(),
            min_zombies_expected: default_min_zombies_expected(),
        }
    }
}

impl Thresholds {
    pub fn samples(&self, humans: u64, zombies: u64) -> bool {
        humans <= self.max_humans_sampled || zombies < self.min_zombies_expected
    }
}

/// How far the delay queue moves each tick.
///
/// `Mixed` advances minute-keyed entries by the hour-valued tick duration,
/// so a fresh infection takes sixty times longer to mature than its turn
/// time suggests. `Minutes` converts the tick to minutes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TimeScale {
    #[default]
    Mixed,
    Minutes,
}

impl TimeScale {
    pub fn queue_step(self, tick_duration: f64) -> f64 {
        match self {
            TimeScale::Mixed => tick_duration,
            TimeScale::Minutes => tick_duration * MINUTES_PER_HOUR,
        }
    }
}

/// Everything a [`Simulation`](crate::engine::Simulation) needs besides the
/// starting populations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub params: OutbreakParams,
    pub thresholds: Thresholds,
    pub time_scale: TimeScale,
    pub max_ticks: u64,
}

impl EngineConfig {
    pub fn new(params: OutbreakParams) -> Self {
        Self {
            params,
            thresholds: Thresholds::default(),
            time_scale: TimeScale::default(),
            max_ticks: default_max_ticks(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_time_scale(mut self, time_scale: TimeScale) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;
        if self.thresholds.min_zombies_expected == 0 {
            return Err(ConfigError::ZeroZombieThreshold);
        }
        if self.max_ticks == 0 {
            return Err(ConfigError::ZeroTickCap);
        }
        Ok(())
    }
}

fn check_duration(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDuration { name, value })
    }
}

fn check_ratio(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRatio { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> OutbreakParams {
        OutbreakParams::new(1.0, 4.0, 0.9, 0.03)
    }

    #[test]
    fn reference_params_are_valid() {
        assert_eq!(reference().validate(), Ok(()));
        assert_eq!(EngineConfig::new(reference()).validate(), Ok(()));
    }

    #[test]
    fn tick_duration_is_shortest_average_time() {
        assert_eq!(reference().tick_duration(), 1.0);
        assert_eq!(OutbreakParams::new(6.0, 2.5, 0.1, 0.1).tick_duration(), 2.5);
        assert_eq!(reference().turn_delay(), 240.0);
    }

    #[test]
    fn rejects_non_positive_times() {
        let params = OutbreakParams::new(0.0, 4.0, 0.5, 0.1);
        assert_eq!(
            params.validate(),
            Err(ConfigError::InvalidDuration {
                name: "avg_attack_time",
                value: 0.0
            })
        );
        let params = OutbreakParams::new(1.0, -2.0, 0.5, 0.1);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidDuration { name: "avg_turn_time", .. })
        ));
        assert!(OutbreakParams::new(f64::INFINITY, 1.0, 0.5, 0.1)
            .validate()
            .is_err());
    }

    #[test]
    fn rejects_out_of_range_ratios() {
        assert!(matches!(
            OutbreakParams::new(1.0, 1.0, 1.5, 0.0).validate(),
            Err(ConfigError::InvalidRatio { name: "infect_ratio", .. })
        ));
        assert!(matches!(
            OutbreakParams::new(1.0, 1.0, 0.5, -0.1).validate(),
            Err(ConfigError::InvalidRatio { name: "kill_ratio", .. })
        ));
        assert!(OutbreakParams::new(1.0, 1.0, f64::NAN, 0.0)
            .validate()
            .is_err());
        assert_eq!(OutbreakParams::new(1.0, 1.0, 0.7, 0.4).validate(), Ok(()));
    }

    #[test]
    fn engine_config_rejects_degenerate_limits() {
        let config = EngineConfig::new(reference()).with_max_ticks(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickCap));
        let config = EngineConfig::new(reference()).with_thresholds(Thresholds {
            max_humans_sampled: 100,
            min_zombies_expected: 0,
        });
        assert_eq!(config.validate(), Err(ConfigError::ZeroZombieThreshold));
    }

    #[test]
    fn thresholds_select_sampling() {
        let thresholds = Thresholds::default();
        assert!(thresholds.samples(100, 1_000));
        assert!(thresholds.samples(1_000, 9));
        assert!(!thresholds.samples(101, 10));
    }

    #[test]
    fn time_scale_converts_queue_step() {
        assert_eq!(TimeScale::Mixed.queue_step(2.0), 2.0);
        assert_eq!(TimeScale::Minutes.queue_step(2.0), 120.0);
    }
}
