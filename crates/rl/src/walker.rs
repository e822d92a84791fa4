use physics::PhysicsAdapter;

use crate::config::WalkerConfig;
use crate::env::{BoxSpace, Env, Info, Step};
use crate::episode::{prepare_world, Locomotor, Phase};
use crate::error::EnvError;
use crate::state::AgentState;

/// Planar biped on flat ground. Rewarded for forward progress, terminated
/// when the torso leaves its healthy height or pitch band.
pub struct WalkerEnv<A> {
    core: Locomotor<A>,
    config: WalkerConfig,
    observation_space: BoxSpace,
    action_space: BoxSpace,
}

impl<A: PhysicsAdapter> WalkerEnv<A> {
    /// Load the walker into `adapter`, configure the world and reset.
    ///
    /// # Errors
    ///
    /// Fails for invalid configs and propagates adapter failures.
    pub fn new(mut adapter: A, config: WalkerConfig, rng: fastrand::Rng) -> Result<Self, EnvError> {
        config.validate()?;
        let body = prepare_world(&mut adapter, &config.world())?;
        let core = Locomotor::new(adapter, body, &config.joints, config.control(), rng)?;
        let n = core.action_size();
        let mut env = Self {
            core,
            config,
            observation_space: BoxSpace::unbounded(5 + 2 * n),
            action_space: BoxSpace::symmetric(n, 1.0),
        };
        env.reset()?;
        Ok(env)
    }

    #[must_use]
    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.core.phase()
    }

    #[must_use]
    pub fn adapter(&self) -> &A {
        self.core.adapter()
    }

    /// Direct access to the physics context, for engine-specific calls.
    pub fn adapter_mut(&mut self) -> &mut A {
        self.core.adapter_mut()
    }

    /// Current episode statistics: steps taken and accumulated reward.
    #[must_use]
    pub fn episode_stats(&self) -> (usize, f32) {
        (self.core.steps(), self.core.episode_return())
    }

    fn is_healthy(&self, state: &AgentState) -> bool {
        let [z_lo, z_hi] = self.config.healthy_height;
        let [p_lo, p_hi] = self.config.healthy_pitch;
        let z = state.position.z;
        let pitch = state.pitch();
        state.is_finite() && z_lo < z && z < z_hi && p_lo < pitch && pitch < p_hi
    }
}

impl<A: PhysicsAdapter> Env for WalkerEnv<A> {
    fn reset(&mut self) -> Result<Vec<f32>, EnvError> {
        let state = self.core.reset()?;
        Ok(state.observation(state.position.z))
    }

    fn step(&mut self, action: &[f32]) -> Result<Step, EnvError> {
        let transition = self.core.advance(action)?;
        let state = &transition.state;
        let done = !self.is_healthy(state);
        let observation = state.observation(state.position.z);
        Ok(self.core.finish(observation, transition.reward, done, Info::new()))
    }

    fn observation_space(&self) -> &BoxSpace {
        &self.observation_space
    }

    fn action_space(&self) -> &BoxSpace {
        &self.action_space
    }

    fn close(&mut self) -> Result<(), EnvError> {
        Ok(self.core.disconnect()?)
    }
}
