//! # Environment Interface
//!
//! Inspired by classic frameworks like OpenAI Gym, [`Env`] is the surface a
//! training loop drives: [`Env::reset`] starts an episode and returns the
//! first observation, [`Env::step`] applies one action and reports the
//! outcome. Actions and observations are flat `f32` vectors described by
//! [`BoxSpace`]s.

use std::collections::BTreeMap;

use crate::error::EnvError;

/// Named scalar diagnostics attached to a step. Empty unless a variant or
/// the time limit has something to report.
pub type Info = BTreeMap<String, f32>;

/// Axis-aligned box of admissible values.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSpace {
    pub low: Vec<f32>,
    pub high: Vec<f32>,
}

impl BoxSpace {
    /// `[-bound, bound]^dim`.
    #[must_use]
    pub fn symmetric(dim: usize, bound: f32) -> Self {
        Self { low: vec![-bound; dim], high: vec![bound; dim] }
    }

    #[must_use]
    pub fn unbounded(dim: usize) -> Self {
        Self::symmetric(dim, f32::INFINITY)
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.low.len()
    }

    #[must_use]
    pub fn contains(&self, value: &[f32]) -> bool {
        value.len() == self.dim()
            && value
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(v, (lo, hi))| (lo..=hi).contains(&v))
    }

    /// Uniform sample; unbounded axes sample zero.
    #[must_use]
    pub fn sample(&self, rng: &mut fastrand::Rng) -> Vec<f32> {
        self.low
            .iter()
            .zip(&self.high)
            .map(|(&lo, &hi)| if lo.is_finite() && hi.is_finite() { lo + rng.f32() * (hi - lo) } else { 0.0 })
            .collect()
    }
}

/// Outcome of one [`Env::step`].
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub observation: Vec<f32>,
    pub reward: f32,
    pub done: bool,
    pub info: Info,
}

impl Step {
    /// Whether the episode ended on the time limit rather than a failure.
    #[must_use]
    pub fn truncated(&self) -> bool {
        self.info.get("truncated").is_some_and(|&t| t > 0.0)
    }
}

/// Reinforcement learning environment.
pub trait Env {
    /// Start a new episode and return its first observation.
    ///
    /// # Errors
    ///
    /// Propagates physics failures.
    fn reset(&mut self) -> Result<Vec<f32>, EnvError>;

    /// Apply one action.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::ActionDimension`] for a wrongly sized action,
    /// [`EnvError::EpisodeTerminated`] after the episode ended,
    /// [`EnvError::NotRunning`] when the last reset failed, and
    /// propagates physics failures.
    fn step(&mut self, action: &[f32]) -> Result<Step, EnvError>;

    fn observation_space(&self) -> &BoxSpace;

    fn action_space(&self) -> &BoxSpace;

    /// Size of the observation vector.
    fn obs_size(&self) -> usize {
        self.observation_space().dim()
    }

    /// Size of the action space.
    fn action_size(&self) -> usize {
        self.action_space().dim()
    }

    /// Release the physics context. The environment is unusable afterwards.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's disconnect error.
    fn close(&mut self) -> Result<(), EnvError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_space_contains_its_bounds() {
        let space = BoxSpace::symmetric(2, 1.0);
        assert!(space.contains(&[1.0, -1.0]));
        assert!(!space.contains(&[1.1, 0.0]));
        assert!(!space.contains(&[0.0]));
    }

    #[test]
    fn samples_stay_inside() {
        let space = BoxSpace::symmetric(6, 1.0);
        let mut rng = fastrand::Rng::with_seed(2);
        for _ in 0..100 {
            assert!(space.contains(&space.sample(&mut rng)));
        }
        assert_eq!(BoxSpace::unbounded(3).sample(&mut rng), vec![0.0; 3]);
    }

    #[test]
    fn truncation_reads_info() {
        let mut step = Step { observation: vec![], reward: 0.0, done: true, info: Info::new() };
        assert!(!step.truncated());
        step.info.insert("truncated".into(), 1.0);
        assert!(step.truncated());
    }
}
