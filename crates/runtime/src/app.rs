//! # Episode Runner
//!
//! Builds environments from CLI arguments and config files and drives them
//! with a fixed policy.

use std::path::Path;

use anyhow::{Context, Result};
use physics::PlanarSim;
use rl::{BoxSpace, Env, HopperConfig, HopperEnv, WalkerConfig, WalkerEnv};
use serde::de::DeserializeOwned;
use terrain::TerrainConfig;

use crate::{EnvKind, Policy, RunArgs, TerrainArgs};

/// Outcome of one finished episode.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeSummary {
    pub steps: usize,
    pub total_reward: f32,
    pub truncated: bool,
}

impl Policy {
    fn act(self, space: &BoxSpace, rng: &mut fastrand::Rng) -> Vec<f32> {
        match self {
            Policy::Zero => vec![0.0; space.dim()],
            Policy::Random => space.sample(rng),
        }
    }
}

/// Read a JSON config, or fall back to defaults when no path is given.
fn load_config<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let json = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing config {}", path.display()))
}

/// Run `args.episodes` episodes and return their summaries.
///
/// # Errors
///
/// Fails on unreadable configs, invalid environments and physics errors.
pub fn run(args: &RunArgs) -> Result<Vec<EpisodeSummary>> {
    let rng = fastrand::Rng::with_seed(args.seed);
    match args.env {
        EnvKind::Walker => {
            let mut config: WalkerConfig = load_config(args.config.as_deref())?;
            if let Some(dir) = &args.assets {
                config.model = dir.join("walker2d.json");
            }
            config.max_episode_steps = Some(args.max_steps);
            let env = WalkerEnv::new(PlanarSim::connect(), config, rng).context("building walker environment")?;
            drive(env, args)
        }
        EnvKind::Hopper => {
            let mut config: HopperConfig = load_config(args.config.as_deref())?;
            if let Some(dir) = &args.assets {
                config.model = dir.join("hopper.json");
            }
            if !args.slopes.is_empty() {
                config.terrain.slopes.clone_from(&args.slopes);
            }
            config.max_episode_steps = Some(args.max_steps);
            let env = HopperEnv::new(PlanarSim::connect(), config, rng).context("building hopper environment")?;
            drive(env, args)
        }
    }
}

fn drive<E: Env>(mut env: E, args: &RunArgs) -> Result<Vec<EpisodeSummary>> {
    let mut policy_rng = fastrand::Rng::with_seed(args.seed.wrapping_add(1));
    let mut summaries = Vec::with_capacity(args.episodes);

    for episode in 0..args.episodes {
        env.reset()?;
        let mut summary = EpisodeSummary { steps: 0, total_reward: 0.0, truncated: false };
        loop {
            let action = args.policy.act(env.action_space(), &mut policy_rng);
            let step = env.step(&action)?;
            summary.steps += 1;
            summary.total_reward += step.reward;
            if step.done {
                summary.truncated = step.truncated();
                break;
            }
        }
        tracing::info!(
            episode,
            steps = summary.steps,
            total_reward = summary.total_reward,
            truncated = summary.truncated,
            "episode finished"
        );
        summaries.push(summary);
    }

    env.close()?;
    Ok(summaries)
}

/// Generate the course described by `args` and return its front row.
///
/// # Errors
///
/// Fails on unreadable or invalid terrain configs.
pub fn terrain_row(args: &TerrainArgs) -> Result<Vec<f32>> {
    let mut config: TerrainConfig = load_config(args.config.as_deref())?;
    if !args.slopes.is_empty() {
        config.slopes.clone_from(&args.slopes);
    }
    let store = config
        .build(&mut fastrand::Rng::with_seed(args.seed))
        .context("generating terrain")?;
    let row = store.row(0).context("heightfield has no rows")?;
    Ok(row.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn models() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/models")
    }

    fn run_args(env: EnvKind, policy: Policy) -> RunArgs {
        RunArgs {
            env,
            seed: 5,
            episodes: 2,
            max_steps: 10,
            policy,
            config: None,
            slopes: vec![],
            assets: Some(models()),
        }
    }

    #[test]
    fn zero_policy_commands_nothing() {
        let mut rng = fastrand::Rng::with_seed(0);
        assert_eq!(Policy::Zero.act(&BoxSpace::symmetric(3, 1.0), &mut rng), vec![0.0; 3]);
    }

    #[test]
    fn missing_config_path_uses_defaults() {
        let config: WalkerConfig = load_config(None).unwrap();
        assert_eq!(config, WalkerConfig::default());
        assert!(load_config::<WalkerConfig>(Some(Path::new("no/such/config.json"))).is_err());
    }

    #[test]
    fn walker_episodes_respect_the_step_limit() {
        let summaries = run(&run_args(EnvKind::Walker, Policy::Zero)).unwrap();
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.steps <= 10));
    }

    #[test]
    fn hopper_runs_on_custom_slopes() {
        let args = RunArgs { slopes: vec![-0.02, 0.02], ..run_args(EnvKind::Hopper, Policy::Random) };
        let summaries = run(&args).unwrap();
        assert!(summaries.iter().all(|s| s.steps >= 1 && s.steps <= 10 && s.total_reward.is_finite()));
    }

    #[test]
    fn terrain_row_is_seeded() {
        let args = TerrainArgs { seed: 3, slopes: vec![-0.05, 0.05], config: None };
        let a = terrain_row(&args).unwrap();
        let b = terrain_row(&args).unwrap();
        assert_eq!(a.len(), 1000);
        assert_eq!(a, b);
        assert!(a.iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
