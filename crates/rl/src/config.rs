//! Environment configuration. Every struct deserializes with
//! `#[serde(default)]`, so a partial JSON file only overrides what it names.

use std::path::PathBuf;

use physics::{ContactParams, SolverParams, Vec3};
use serde::{Deserialize, Serialize};
use terrain::TerrainConfig;

use crate::error::ConfigError;

/// Control-loop parameters shared by every variant.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlParams {
    pub frame_skip: u32,
    /// Physics time advanced per adapter step.
    pub dt: f32,
    pub torque_limits: Vec<f32>,
    pub init_noise: f32,
    /// Base z of the nominal reset pose.
    pub base_height: f32,
    pub alive_bonus: f32,
    pub action_cost: f32,
    pub max_episode_steps: Option<usize>,
}

impl ControlParams {
    /// Simulated time covered by one environment step.
    #[must_use]
    pub fn control_period(&self) -> f32 {
        self.dt * self.frame_skip as f32
    }
}

/// World settings applied to the adapter at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldSetup {
    pub model: PathBuf,
    pub gravity: Vec3,
    pub solver: SolverParams,
    pub ground_contact: ContactParams,
}

fn check_control(joints: &[String], params: &ControlParams) -> Result<(), ConfigError> {
    if joints.is_empty() {
        return Err(ConfigError::NoJoints);
    }
    if params.frame_skip == 0 {
        return Err(ConfigError::FrameSkip);
    }
    if !(params.dt.is_finite() && params.dt > 0.0) {
        return Err(ConfigError::Timestep(params.dt));
    }
    if params.torque_limits.len() != joints.len() {
        return Err(ConfigError::TorqueLimits { limits: params.torque_limits.len(), joints: joints.len() });
    }
    if let Some(limit) = params.torque_limits.iter().find(|l| !(l.is_finite() && **l >= 0.0)) {
        return Err(ConfigError::Invalid { field: "torque_limits", reason: format!("{limit} is not a usable limit") });
    }
    if !(params.init_noise.is_finite() && params.init_noise >= 0.0) {
        return Err(ConfigError::InitNoise(params.init_noise));
    }
    for (field, value) in [
        ("base_height", params.base_height),
        ("alive_bonus", params.alive_bonus),
        ("action_cost", params.action_cost),
    ] {
        check_finite(field, value)?;
    }
    if params.max_episode_steps == Some(0) {
        return Err(ConfigError::Invalid { field: "max_episode_steps", reason: "must be at least 1".into() });
    }
    Ok(())
}

fn check_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("{value} is not finite") })
    }
}

/// Accepts finite `[lo, hi]` with `lo < hi`.
fn check_interval(field: &'static str, [lo, hi]: [f32; 2]) -> Result<(), ConfigError> {
    check_finite(field, lo)?;
    check_finite(field, hi)?;
    if lo < hi {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("lower bound {lo} is not below {hi}") })
    }
}

fn check_solver(sub_steps: u32) -> Result<(), ConfigError> {
    if sub_steps == 0 {
        return Err(ConfigError::Invalid { field: "sub_steps", reason: "must be at least 1".into() });
    }
    Ok(())
}

/// Planar biped on flat ground.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    pub model: PathBuf,
    /// Controlled joints, in action order.
    pub joints: Vec<String>,
    pub torque_limits: Vec<f32>,
    pub frame_skip: u32,
    pub dt: f32,
    pub sub_steps: u32,
    pub solver_iterations: u32,
    pub lateral_friction: f32,
    pub restitution: f32,
    pub init_noise: f32,
    pub alive_bonus: f32,
    pub action_cost: f32,
    pub gravity: [f32; 3],
    pub base_height: f32,
    /// Open interval of healthy base heights.
    pub healthy_height: [f32; 2],
    /// Open interval of healthy base pitch.
    pub healthy_pitch: [f32; 2],
    pub max_episode_steps: Option<usize>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("assets/models/walker2d.json"),
            joints: [
                "thigh_joint",
                "leg_joint",
                "foot_joint",
                "thigh_left_joint",
                "leg_left_joint",
                "foot_left_joint",
            ]
            .map(String::from)
            .to_vec(),
            torque_limits: vec![40.0, 40.0, 12.0, 40.0, 40.0, 12.0],
            frame_skip: 4,
            dt: 0.0165,
            sub_steps: 4,
            solver_iterations: 5,
            lateral_friction: 0.8,
            restitution: 0.5,
            init_noise: 0.005,
            alive_bonus: 1.0,
            action_cost: 1e-3,
            gravity: [0.0, 0.0, -9.8],
            base_height: 1.25,
            healthy_height: [0.8, 2.0],
            healthy_pitch: [-1.0, 1.0],
            max_episode_steps: None,
        }
    }
}

impl WalkerConfig {
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_control(&self.joints, &self.control())?;
        check_solver(self.sub_steps)?;
        check_interval("healthy_height", self.healthy_height)?;
        check_interval("healthy_pitch", self.healthy_pitch)
    }

    #[must_use]
    pub fn control(&self) -> ControlParams {
        ControlParams {
            frame_skip: self.frame_skip,
            dt: self.dt,
            torque_limits: self.torque_limits.clone(),
            init_noise: self.init_noise,
            base_height: self.base_height,
            alive_bonus: self.alive_bonus,
            action_cost: self.action_cost,
            max_episode_steps: self.max_episode_steps,
        }
    }

    #[must_use]
    pub fn world(&self) -> WorldSetup {
        let [x, y, z] = self.gravity;
        WorldSetup {
            model: self.model.clone(),
            gravity: Vec3::new(x, y, z),
            solver: SolverParams { timestep: self.dt, substeps: self.sub_steps, iterations: self.solver_iterations },
            ground_contact: ContactParams { friction: self.lateral_friction, restitution: self.restitution },
        }
    }
}

/// Planar hopper on a generated ramp course.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HopperConfig {
    pub model: PathBuf,
    pub joints: Vec<String>,
    pub torque_limits: Vec<f32>,
    pub frame_skip: u32,
    pub dt: f32,
    pub sub_steps: u32,
    pub solver_iterations: u32,
    pub lateral_friction: f32,
    pub restitution: f32,
    pub init_noise: f32,
    pub alive_bonus: f32,
    pub action_cost: f32,
    pub gravity: [f32; 3],
    pub base_height: f32,
    /// Subtracted from every reward.
    pub terrain_bias: f32,
    /// Forward offsets of the relative terrain height observations.
    pub lookahead: Vec<f32>,
    /// Bound on every state component except x and z.
    pub max_state_magnitude: f32,
    pub pitch_limit: f32,
    /// Geometries allowed to touch anything; any other contact ends the episode.
    pub allowed_contacts: Vec<String>,
    pub max_episode_steps: Option<usize>,
    pub terrain: TerrainConfig,
}

impl Default for HopperConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("assets/models/hopper.json"),
            joints: ["thigh_joint", "leg_joint", "foot_joint"].map(String::from).to_vec(),
            torque_limits: vec![200.0; 3],
            frame_skip: 4,
            dt: 0.002,
            sub_steps: 1,
            solver_iterations: 10,
            lateral_friction: 0.9,
            restitution: 0.0,
            init_noise: 0.005,
            alive_bonus: 1.0,
            action_cost: 1e-3,
            gravity: [0.0, 0.0, -9.81],
            base_height: 1.25,
            terrain_bias: 0.9,
            lookahead: vec![1.0, 2.0],
            max_state_magnitude: 100.0,
            pitch_limit: 0.2,
            allowed_contacts: vec!["ground".into(), "foot_geom".into()],
            max_episode_steps: None,
            terrain: TerrainConfig::default(),
        }
    }
}

impl HopperConfig {
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, terrain problems included.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_control(&self.joints, &self.control())?;
        check_solver(self.sub_steps)?;
        check_finite("terrain_bias", self.terrain_bias)?;
        if !self.lookahead.iter().all(|d| d.is_finite()) {
            return Err(ConfigError::Invalid { field: "lookahead", reason: "offsets must be finite".into() });
        }
        if !(self.max_state_magnitude > 0.0 && self.pitch_limit > 0.0) {
            return Err(ConfigError::Invalid {
                field: "termination bounds",
                reason: "max_state_magnitude and pitch_limit must be positive".into(),
            });
        }
        self.terrain.validate().map_err(ConfigError::Terrain)
    }

    #[must_use]
    pub fn control(&self) -> ControlParams {
        ControlParams {
            frame_skip: self.frame_skip,
            dt: self.dt,
            torque_limits: self.torque_limits.clone(),
            init_noise: self.init_noise,
            base_height: self.base_height,
            alive_bonus: self.alive_bonus,
            action_cost: self.action_cost,
            max_episode_steps: self.max_episode_steps,
        }
    }

    #[must_use]
    pub fn world(&self) -> WorldSetup {
        let [x, y, z] = self.gravity;
        WorldSetup {
            model: self.model.clone(),
            gravity: Vec3::new(x, y, z),
            solver: SolverParams { timestep: self.dt, substeps: self.sub_steps, iterations: self.solver_iterations },
            ground_contact: ContactParams { friction: self.lateral_friction, restitution: self.restitution },
        }
    }
}
