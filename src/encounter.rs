//! Per-tick encounter resolution between zombies and humans.

use rand::Rng;
use serde::Serialize;

use crate::config::{OutbreakParams, Thresholds};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EncounterOutcome {
    pub humans_infected: u64,
    pub zombies_killed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterMode {
    /// One random draw per zombie.
    Sampled,
    /// Deterministic expected values.
    Expected,
}

/// Resolves one tick of encounters, picking the mode from `thresholds`.
pub fn resolve<R: Rng + ?Sized>(
    humans: u64,
    zombies: u64,
    params: &OutbreakParams,
    thresholds: &Thresholds,
    rng: &mut R,
) -> (EncounterMode, EncounterOutcome) {
    if thresholds.samples(humans, zombies) {
        let outcome = sampled(humans, zombies, params.infect_ratio, params.kill_ratio, rng);
        (EncounterMode::Sampled, outcome)
    } else {
        let outcome = expected(humans, zombies, params.infect_ratio, params.kill_ratio);
        (EncounterMode::Expected, outcome)
    }
}

/// Zombie-by-zombie sampling. Each encounter draws `u` in `[0, 1)`:
/// below `infect_ratio` infects a human, below `infect_ratio + kill_ratio`
/// kills the zombie, anything else is a miss. Stops early once no humans
/// remain; the loop bound shrinks as zombies die.
pub fn sampled<R: Rng + ?Sized>(
    humans: u64,
    zombies: u64,
    infect_ratio: f64,
    kill_ratio: f64,
    rng: &mut R,
) -> EncounterOutcome {
    let mut outcome = EncounterOutcome::default();
    let mut humans = humans;
    let mut zombies = zombies;
    let mut encounter = 0;
    while encounter < zombies && humans > 0 {
        let roll: f64 = rng.gen();
        if roll < infect_ratio {
            humans -= 1;
            outcome.humans_infected += 1;
        } else if roll < infect_ratio + kill_ratio {
            zombies -= 1;
            outcome.zombies_killed += 1;
        }
        encounter += 1;
    }
    outcome
}

/// Expected-value approximation, clamped to the populations at hand.
pub fn expected(humans: u64, zombies: u64, infect_ratio: f64, kill_ratio: f64) -> EncounterOutcome {
    EncounterOutcome {
        humans_infected: scaled(zombies, infect_ratio).min(humans),
        zombies_killed: scaled(zombies, kill_ratio).min(zombies),
    }
}

fn scaled(count: u64, ratio: f64) -> u64 {
    // `as` saturates, so NaN becomes 0 and overshoot is caught by the clamp.
    (count as f64 * ratio).floor() as u64
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn expected_mode_floors_products() {
        let outcome = expected(1_000_000, 1_000, 0.9, 0.03);
        assert_eq!(
            outcome,
            EncounterOutcome {
                humans_infected: 900,
                zombies_killed: 30,
            }
        );
    }

    #[test]
    fn expected_mode_clamps_to_populations() {
        let outcome = expected(5, 1_000, 0.9, 1.0);
        assert_eq!(outcome.humans_infected, 5);
        assert_eq!(outcome.zombies_killed, 1_000);

        for humans in [0_u64, 1, 17, 101, 7_000_000_000] {
            for zombies in [0_u64, 1, 9, 10, 12_345, 7_000_000_000] {
                for (infect, kill) in [(0.0, 0.0), (0.9, 0.03), (1.0, 1.0), (0.5, 0.5)] {
                    let outcome = expected(humans, zombies, infect, kill);
                    assert!(outcome.humans_infected <= humans);
                    assert!(outcome.zombies_killed <= zombies);
                }
            }
        }
    }

    #[test]
    fn sampled_mode_stays_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for humans in [0_u64, 1, 3, 50, 100] {
            for zombies in [0_u64, 1, 5, 9, 200] {
                let outcome = sampled(humans, zombies, 0.6, 0.3, &mut rng);
                assert!(outcome.humans_infected + outcome.zombies_killed <= zombies);
                assert!(outcome.humans_infected <= humans);
            }
        }
    }

    #[test]
    fn certain_infection_converts_one_human_per_zombie() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let outcome = sampled(50, 8, 1.0, 0.0, &mut rng);
        assert_eq!(outcome.humans_infected, 8);
        assert_eq!(outcome.zombies_killed, 0);

        let outcome = sampled(3, 8, 1.0, 0.0, &mut rng);
        assert_eq!(outcome.humans_infected, 3);
    }

    #[test]
    fn certain_kill_stops_when_zombies_run_out() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let outcome = sampled(50, 8, 0.0, 1.0, &mut rng);
        assert_eq!(outcome.humans_infected, 0);
        // Each kill shrinks the loop bound as well as advancing the counter.
        assert_eq!(outcome.zombies_killed, 4);
    }

    #[test]
    fn zero_ratios_do_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(sampled(10, 10, 0.0, 0.0, &mut rng), EncounterOutcome::default());
    }

    #[test]
    fn resolve_switches_on_thresholds() {
        let params = OutbreakParams::new(1.0, 4.0, 0.9, 0.03);
        let thresholds = Thresholds::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let (mode, outcome) = resolve(1_000, 100, &params, &thresholds, &mut rng);
        assert_eq!(mode, EncounterMode::Expected);
        assert_eq!(outcome, expected(1_000, 100, 0.9, 0.03));

        let (mode, _) = resolve(100, 100, &params, &thresholds, &mut rng);
        assert_eq!(mode, EncounterMode::Sampled);
        let (mode, _) = resolve(1_000, 9, &params, &thresholds, &mut rng);
        assert_eq!(mode, EncounterMode::Sampled);
    }
}
