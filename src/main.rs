use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use outbreak::{
    config::TimeScale, rng::RngManager, scenario::ScenarioLoader, Scenario, Simulation,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Zombie outbreak runner")]
struct Cli {
    /// Scenario YAML file (the built-in reference outbreak when omitted)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Starting number of humans
    #[arg(long)]
    humans: Option<u64>,

    /// Starting number of zombies
    #[arg(long)]
    zombies: Option<u64>,

    /// Average hours for a zombie to complete an attack
    #[arg(long)]
    attack_time: Option<f64>,

    /// Average hours for an infected human to turn
    #[arg(long)]
    turn_time: Option<f64>,

    /// Probability that an encounter infects a human
    #[arg(long)]
    infect_ratio: Option<f64>,

    /// Probability that an encounter kills the zombie
    #[arg(long)]
    kill_ratio: Option<f64>,

    /// Seed for encounter sampling (fresh entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// How the infection queue is advanced each tick
    #[arg(long, value_enum)]
    time_scale: Option<TimeScale>,

    /// Print the full run report as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn apply(&self, scenario: &mut Scenario) {
        if let Some(humans) = self.humans {
            scenario.humans = humans;
        }
        if let Some(zombies) = self.zombies {
            scenario.zombies = zombies;
        }
        if let Some(attack_time) = self.attack_time {
            scenario.params.avg_attack_time = attack_time;
        }
        if let Some(turn_time) = self.turn_time {
            scenario.params.avg_turn_time = turn_time;
        }
        if let Some(infect_ratio) = self.infect_ratio {
            scenario.params.infect_ratio = infect_ratio;
        }
        if let Some(kill_ratio) = self.kill_ratio {
            scenario.params.kill_ratio = kill_ratio;
        }
        if self.seed.is_some() {
            scenario.seed = self.seed;
        }
        if let Some(max_ticks) = self.max_ticks {
            scenario.max_ticks = max_ticks;
        }
        if let Some(time_scale) = self.time_scale {
            scenario.time_scale = time_scale;
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut scenario = match &cli.scenario {
        Some(path) => ScenarioLoader::new(".").load(path)?,
        None => Scenario::reference(),
    };
    cli.apply(&mut scenario);

    let rng = match scenario.seed {
        Some(seed) => RngManager::new(seed),
        None => RngManager::from_entropy(),
    };
    let mut simulation = Simulation::new(scenario.population(), scenario.engine_config(), rng)?;
    let report = simulation.run()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.message);
    }
    Ok(())
}
