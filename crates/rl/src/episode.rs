//! # Episode Core
//!
//! [`Locomotor`] owns one physics context and runs the control loop shared
//! by every locomotion variant: randomized resets, action clamping and
//! scaling, repeated physics steps, the forward-progress reward and the
//! episode phase. Variants layer their observation, extra reward terms and
//! termination predicate on top.

use physics::{BodyHandle, Gains, JointControl, JointId, PhysicsAdapter, PhysicsError, Quat, Vec3};
use tracing::{debug, trace, warn};

use crate::config::{ControlParams, WorldSetup};
use crate::env::{Info, Step};
use crate::error::{ConfigError, EnvError};
use crate::state::AgentState;

/// Gains of the holding controller installed on every joint at reset.
const HOLD_GAINS: Gains = Gains { position: 0.1, velocity: 0.1 };

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Resetting,
    Running,
    Terminated,
}

/// Result of applying one action, before variant-specific terms.
#[derive(Clone, Debug)]
pub struct Transition {
    pub state: AgentState,
    /// Forward progress rate plus alive bonus minus action cost.
    pub reward: f32,
}

/// Load the body and apply world settings.
///
/// # Errors
///
/// Propagates adapter failures.
pub fn prepare_world<A: PhysicsAdapter>(adapter: &mut A, world: &WorldSetup) -> Result<BodyHandle, PhysicsError> {
    let body = adapter.load_model(&world.model)?;
    adapter.set_gravity(world.gravity)?;
    adapter.set_solver_params(world.solver)?;
    let ground = adapter.ground();
    adapter.set_contact_params(ground, world.ground_contact)?;
    Ok(body)
}

fn uniform(rng: &mut fastrand::Rng, bound: f32) -> f32 {
    (rng.f32() * 2.0 - 1.0) * bound
}

pub struct Locomotor<A> {
    adapter: A,
    body: BodyHandle,
    joints: Vec<JointId>,
    all_joints: Vec<JointId>,
    params: ControlParams,
    rng: fastrand::Rng,
    phase: Phase,
    steps: usize,
    episode_return: f32,
}

impl<A: PhysicsAdapter> Locomotor<A> {
    /// Resolve `joint_names` on `body`. The episode starts in
    /// [`Phase::Resetting`]; call [`Locomotor::reset`] before stepping.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TorqueLimits`] when the limits do not match the
    /// joints, and physics errors for unknown joints.
    pub fn new(
        adapter: A,
        body: BodyHandle,
        joint_names: &[String],
        params: ControlParams,
        rng: fastrand::Rng,
    ) -> Result<Self, EnvError> {
        if params.torque_limits.len() != joint_names.len() {
            return Err(ConfigError::TorqueLimits { limits: params.torque_limits.len(), joints: joint_names.len() }.into());
        }
        let joints = joint_names
            .iter()
            .map(|name| adapter.joint_id(body, name))
            .collect::<Result<Vec<_>, _>>()?;
        let all_joints = (0..adapter.num_joints(body)?).map(JointId).collect();
        Ok(Self {
            adapter,
            body,
            joints,
            all_joints,
            params,
            rng,
            phase: Phase::Resetting,
            steps: 0,
            episode_return: 0.0,
        })
    }

    #[must_use]
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    #[must_use]
    pub fn body(&self) -> BodyHandle {
        self.body
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Steps taken in the current episode.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    #[must_use]
    pub fn episode_return(&self) -> f32 {
        self.episode_return
    }

    #[must_use]
    pub fn action_size(&self) -> usize {
        self.joints.len()
    }

    /// # Errors
    ///
    /// Propagates adapter failures.
    pub fn read_state(&self) -> Result<AgentState, PhysicsError> {
        let pose = self.adapter.base_pose(self.body)?;
        let twist = self.adapter.base_velocity(self.body)?;
        Ok(AgentState {
            position: pose.position,
            orientation: pose.orientation,
            linear: twist.linear,
            angular: twist.angular,
            joints: self.adapter.joint_states(self.body, &self.joints)?,
        })
    }

    /// Put the body in a slightly perturbed nominal pose and start a new
    /// episode.
    ///
    /// # Errors
    ///
    /// Propagates adapter failures; the phase then stays
    /// [`Phase::Resetting`].
    pub fn reset(&mut self) -> Result<AgentState, EnvError> {
        self.phase = Phase::Resetting;
        let noise = self.params.init_noise;
        let body = self.body;

        self.adapter.reset_base(body, Vec3::new(0.0, 0.0, self.params.base_height), Quat::IDENTITY)?;
        self.adapter.reset_base_velocity(body, Vec3::ZERO, Vec3::ZERO)?;

        for &joint in &self.all_joints {
            let angle = uniform(&mut self.rng, noise);
            let velocity = uniform(&mut self.rng, noise);
            self.adapter.reset_joint(body, joint, angle, velocity)?;
        }

        let x = uniform(&mut self.rng, noise);
        let z = self.params.base_height + uniform(&mut self.rng, noise);
        let pitch = uniform(&mut self.rng, noise);
        self.adapter.reset_base(body, Vec3::new(x, 0.0, z), Quat::from_pitch(pitch))?;

        let vx = uniform(&mut self.rng, noise);
        let vz = uniform(&mut self.rng, noise);
        let pitch_rate = uniform(&mut self.rng, noise);
        self.adapter.reset_base_velocity(body, Vec3::new(vx, 0.0, vz), Vec3::new(0.0, pitch_rate, 0.0))?;

        // Zero max force leaves every joint passive until the first action.
        let n = self.all_joints.len();
        let targets = vec![0.0; n];
        let max_forces = vec![0.0; n];
        self.adapter.set_joint_targets(
            body,
            &self.all_joints,
            JointControl::Position { targets: &targets, gains: HOLD_GAINS, max_forces: &max_forces },
        )?;

        self.phase = Phase::Running;
        self.steps = 0;
        self.episode_return = 0.0;
        debug!(x, z, pitch, "episode reset");
        Ok(self.read_state()?)
    }

    /// Apply `action` for `frame_skip` physics steps and compute the base
    /// reward.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::EpisodeTerminated`] after termination,
    /// [`EnvError::NotRunning`] after a failed reset,
    /// [`EnvError::ActionDimension`] for a wrongly sized action, and
    /// propagates adapter failures.
    pub fn advance(&mut self, action: &[f32]) -> Result<Transition, EnvError> {
        match self.phase {
            Phase::Running => {}
            Phase::Terminated => return Err(EnvError::EpisodeTerminated),
            Phase::Resetting => return Err(EnvError::NotRunning),
        }
        if action.len() != self.joints.len() {
            return Err(EnvError::ActionDimension { expected: self.joints.len(), actual: action.len() });
        }

        let action: Vec<f32> = action
            .iter()
            .map(|&a| {
                if a.is_finite() {
                    a.clamp(-1.0, 1.0)
                } else {
                    warn!(value = a, "non-finite action component treated as zero");
                    0.0
                }
            })
            .collect();
        let forces: Vec<f32> = action.iter().zip(&self.params.torque_limits).map(|(a, limit)| a * limit).collect();

        let x_before = self.adapter.base_pose(self.body)?.position.x;
        self.adapter.set_joint_targets(self.body, &self.joints, JointControl::Torque { forces: &forces })?;
        for _ in 0..self.params.frame_skip {
            self.adapter.step()?;
        }
        let state = self.read_state()?;
        let x_after = state.position.x;

        let effort: f32 = action.iter().map(|a| a * a).sum();
        let reward = (x_after - x_before) / self.params.control_period() + self.params.alive_bonus
            - self.params.action_cost * effort;
        Ok(Transition { state, reward })
    }

    /// Close out a step: apply the time limit, update counters and phase.
    pub fn finish(&mut self, observation: Vec<f32>, reward: f32, done: bool, mut info: Info) -> Step {
        self.steps += 1;
        self.episode_return += reward;
        let mut done = done;
        if !done && self.params.max_episode_steps.is_some_and(|limit| self.steps >= limit) {
            done = true;
            info.insert("truncated".to_string(), 1.0);
        }
        trace!(step = self.steps, reward, done, "step");
        if done {
            self.phase = Phase::Terminated;
            debug!(steps = self.steps, episode_return = self.episode_return, "episode terminated");
        }
        Step { observation, reward, done, info }
    }

    /// # Errors
    ///
    /// Propagates the adapter's disconnect error.
    pub fn disconnect(&mut self) -> Result<(), PhysicsError> {
        self.phase = Phase::Terminated;
        self.adapter.disconnect()
    }
}
