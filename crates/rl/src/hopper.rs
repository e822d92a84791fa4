//! Planar hopper on a procedurally generated ramp course.
//!
//! The hopper owns its [`HeightfieldStore`]: the course is built once at
//! construction from the environment's RNG and uploaded to the adapter.
//! Heights in the observation are measured from the terrain under the
//! torso, and two lookahead terms describe how the ground changes ahead.

use physics::{GeomId, PhysicsAdapter};
use terrain::{HeightfieldStore, TerrainError};

use crate::config::HopperConfig;
use crate::env::{BoxSpace, Env, Info, Step};
use crate::episode::{prepare_world, Locomotor, Phase};
use crate::error::EnvError;
use crate::state::AgentState;

pub struct HopperEnv<A> {
    core: Locomotor<A>,
    config: HopperConfig,
    terrain: HeightfieldStore,
    allowed_contacts: Vec<GeomId>,
    observation_space: BoxSpace,
    action_space: BoxSpace,
}

impl<A: PhysicsAdapter> HopperEnv<A> {
    /// Build the course, load the hopper into `adapter` and reset.
    ///
    /// # Errors
    ///
    /// Fails for invalid configs and propagates adapter failures.
    pub fn new(mut adapter: A, config: HopperConfig, mut rng: fastrand::Rng) -> Result<Self, EnvError> {
        config.validate()?;
        let mut terrain = config.terrain.build(&mut rng)?;
        let body = prepare_world(&mut adapter, &config.world())?;
        terrain.sync(&mut adapter)?;
        let allowed_contacts = config
            .allowed_contacts
            .iter()
            .map(|name| adapter.geom_id(name))
            .collect::<Result<Vec<_>, _>>()?;

        let core = Locomotor::new(adapter, body, &config.joints, config.control(), rng)?;
        let n = core.action_size();
        let mut env = Self {
            core,
            observation_space: BoxSpace::unbounded(5 + 2 * n + config.lookahead.len()),
            action_space: BoxSpace::symmetric(n, 1.0),
            config,
            terrain,
            allowed_contacts,
        };
        env.reset()?;
        Ok(env)
    }

    #[must_use]
    pub fn config(&self) -> &HopperConfig {
        &self.config
    }

    #[must_use]
    pub fn terrain(&self) -> &HeightfieldStore {
        &self.terrain
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

    #[must_use]
    pub fn episode_stats(&self) -> (usize, f32) {
        (self.core.steps(), self.core.episode_return())
    }

    /// Keep `x` on the field; non-finite positions read the first column.
    fn clamp_to_field(&self, x: f32) -> f32 {
        let (lo, hi) = self.terrain.valid_range();
        if x.is_finite() {
            x.clamp(lo, hi)
        } else {
            lo
        }
    }

    fn height_at(&self, x: f32) -> Result<f32, TerrainError> {
        self.terrain.query_height(self.clamp_to_field(x))
    }

    fn observe(&self, state: &AgentState) -> Result<Vec<f32>, TerrainError> {
        let x = state.position.x;
        let ground = self.terrain.ground_elevation(self.clamp_to_field(x))?;
        let mut obs = state.observation(state.position.z - ground);
        let here = self.height_at(x)?;
        for offset in &self.config.lookahead {
            obs.push(here - self.height_at(x + offset)?);
        }
        Ok(obs)
    }

    fn is_healthy(&self, state: &AgentState) -> bool {
        let s = state.state_vector();
        let bound = self.config.max_state_magnitude;
        s.iter().all(|v| v.is_finite())
            && s[2..].iter().all(|v| v.abs() < bound)
            && state.pitch().abs() < self.config.pitch_limit
    }

    fn touches_forbidden_geom(&self) -> Result<bool, EnvError> {
        let allowed = |geom: GeomId| self.allowed_contacts.contains(&geom);
        Ok(self
            .core
            .adapter()
            .contacts()?
            .iter()
            .any(|pair| !allowed(pair.geom_a) || !allowed(pair.geom_b)))
    }
}

impl<A: PhysicsAdapter> Env for HopperEnv<A> {
    fn reset(&mut self) -> Result<Vec<f32>, EnvError> {
        let state = self.core.reset()?;
        Ok(self.observe(&state)?)
    }

    fn step(&mut self, action: &[f32]) -> Result<Step, EnvError> {
        let transition = self.core.advance(action)?;
        let state = &transition.state;
        let reward = transition.reward - self.config.terrain_bias;
        let done = !self.is_healthy(state) || self.touches_forbidden_geom()?;
        let observation = self.observe(state)?;
        Ok(self.core.finish(observation, reward, done, Info::new()))
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
