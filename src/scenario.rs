use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{
    config::{EngineConfig, OutbreakParams, Thresholds, TimeScale},
    engine::Population,
};

fn default_max_ticks() -> u64 {
    1_000_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
    pub humans: u64,
    pub zombies: u64,
    pub params: OutbreakParams,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub time_scale: TimeScale,
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

impl Scenario {
    /// The built-in outbreak: seven billion humans against one zombie.
    pub fn reference() -> Self {
        Self {
            name: "reference_outbreak".into(),
            description: None,
            seed: None,
            humans: 7_000_000_000,
            zombies: 1,
            params: OutbreakParams::new(1.0, 4.0, 0.9, 0.03),
            thresholds: Thresholds::default(),
            time_scale: TimeScale::default(),
            max_ticks: default_max_ticks(),
        }
    }

    pub fn population(&self) -> Population {
        Population {
            humans: self.humans,
            zombies: self.zombies,
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.params)
            .with_thresholds(self.thresholds)
            .with_time_scale(self.time_scale)
            .with_max_ticks(self.max_ticks)
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .engine_config()
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}
