//! # Physics Adapter
//!
//! The abstract rigid-body operations an environment performs against a
//! physics engine. Environments are written against [`PhysicsAdapter`] only;
//! [`crate::PlanarSim`] is the in-tree implementation, and any other engine can
//! be plugged in by implementing the trait for its native handle.
//!
//! An adapter value is one simulation context. It is created connected (see
//! [`crate::PlanarSim::connect`]) and stays usable until
//! [`PhysicsAdapter::disconnect`], after which every call fails with
//! [`PhysicsError::NotConnected`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;
use crate::types::{BodyHandle, ContactPair, GeomId, JointId, JointState, Pose, Quat, Twist, Vec3};

/// Surface properties applied to every contact a body takes part in.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactParams {
    pub friction: f32,
    pub restitution: f32,
}

impl Default for ContactParams {
    fn default() -> Self {
        Self { friction: 1.0, restitution: 0.0 }
    }
}

/// `timestep` is the simulated time advanced by one [`PhysicsAdapter::step`]
/// call, integrated in `substeps` equal ticks.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    pub timestep: f32,
    pub substeps: u32,
    pub iterations: u32,
}

impl SolverParams {
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidSolverParams`] for a non-positive or
    /// non-finite timestep or a zero substep count.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(PhysicsError::InvalidSolverParams("timestep must be positive and finite"));
        }
        if self.substeps == 0 {
            return Err(PhysicsError::InvalidSolverParams("substeps must be at least 1"));
        }
        Ok(())
    }
}

impl Default for SolverParams {
    fn default() -> Self {
        Self { timestep: 1.0 / 240.0, substeps: 1, iterations: 10 }
    }
}

/// Proportional/derivative gains for position control.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gains {
    pub position: f32,
    pub velocity: f32,
}

/// Actuator command for a set of joints. Every slice is indexed like the
/// joint id slice it is sent with.
#[derive(Copy, Clone, Debug)]
pub enum JointControl<'a> {
    Torque { forces: &'a [f32] },
    Position { targets: &'a [f32], gains: Gains, max_forces: &'a [f32] },
}

impl JointControl<'_> {
    /// # Errors
    ///
    /// Returns [`PhysicsError::JointCountMismatch`] when a value slice is not
    /// `joint_count` long.
    pub fn check_len(&self, joint_count: usize) -> Result<(), PhysicsError> {
        let (first, second) = match self {
            JointControl::Torque { forces } => (forces.len(), forces.len()),
            JointControl::Position { targets, max_forces, .. } => (targets.len(), max_forces.len()),
        };
        for actual in [first, second] {
            if actual != joint_count {
                return Err(PhysicsError::JointCountMismatch { expected: joint_count, actual });
            }
        }
        Ok(())
    }
}

/// Snapshot of a two-row heightfield handed to an engine for collision and
/// rendering. `data` holds `nrow * ncol` samples in `[0, 1]`, row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightfieldShape {
    pub ncol: usize,
    pub nrow: usize,
    /// World-space length covered by the `ncol` columns.
    pub world_extent: f32,
    /// World x of column 0 is `-origin_offset`.
    pub origin_offset: f32,
    /// Vertical scale applied to samples.
    pub max_height: f32,
    /// World z of a zero sample.
    pub elevation_offset: f32,
    pub data: Vec<f32>,
}

impl HeightfieldShape {
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidHeightfield`] when the buffer size does
    /// not match the grid or the scales are unusable.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if self.ncol == 0 || self.nrow == 0 {
            return Err(PhysicsError::InvalidHeightfield("empty grid"));
        }
        if self.data.len() != self.ncol * self.nrow {
            return Err(PhysicsError::InvalidHeightfield("data length does not match grid"));
        }
        if !(self.world_extent.is_finite() && self.world_extent > 0.0) {
            return Err(PhysicsError::InvalidHeightfield("world extent must be positive"));
        }
        if !self.max_height.is_finite() || !self.elevation_offset.is_finite() {
            return Err(PhysicsError::InvalidHeightfield("non-finite vertical scale"));
        }
        Ok(())
    }

    /// Surface z at world `x`, linearly interpolated along the first row.
    /// Positions beyond the field read the nearest edge column.
    #[must_use]
    pub fn elevation_at(&self, x: f32) -> f32 {
        let last = (self.ncol - 1) as f32;
        let index = (self.origin_offset + x) / self.world_extent * self.ncol as f32;
        let index = if index.is_finite() { index.clamp(0.0, last) } else { 0.0 };
        let lo = index.floor() as usize;
        let hi = index.ceil() as usize;
        let a = index - lo as f32;
        ((1.0 - a) * self.data[lo] + a * self.data[hi]) * self.max_height + self.elevation_offset
    }
}

/// Rigid-body operations the environments need from a physics engine.
pub trait PhysicsAdapter {
    /// Load an articulated body description and add it to the world.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or describes an invalid body.
    fn load_model(&mut self, path: &Path) -> Result<BodyHandle, PhysicsError>;

    /// Handle of the static ground body created with the world.
    fn ground(&self) -> BodyHandle;

    /// # Errors
    ///
    /// Fails when the context is disconnected.
    fn set_gravity(&mut self, gravity: Vec3) -> Result<(), PhysicsError>;

    /// # Errors
    ///
    /// Fails for an unknown body or a disconnected context.
    fn set_contact_params(&mut self, body: BodyHandle, params: ContactParams) -> Result<(), PhysicsError>;

    /// # Errors
    ///
    /// Fails for invalid parameters or a disconnected context.
    fn set_solver_params(&mut self, params: SolverParams) -> Result<(), PhysicsError>;

    /// Command the actuators of `joints`. Commands persist until replaced.
    ///
    /// # Errors
    ///
    /// Fails for unknown bodies or joints and for value slices whose length
    /// differs from `joints.len()`.
    fn set_joint_targets(
        &mut self,
        body: BodyHandle,
        joints: &[JointId],
        control: JointControl<'_>,
    ) -> Result<(), PhysicsError>;

    /// Advance the world by one solver timestep.
    ///
    /// # Errors
    ///
    /// Fails when the context is disconnected.
    fn step(&mut self) -> Result<(), PhysicsError>;

    /// # Errors
    ///
    /// Fails for an unknown body or a disconnected context.
    fn base_pose(&self, body: BodyHandle) -> Result<Pose, PhysicsError>;

    /// # Errors
    ///
    /// Fails for an unknown body or a disconnected context.
    fn base_velocity(&self, body: BodyHandle) -> Result<Twist, PhysicsError>;

    /// # Errors
    ///
    /// Fails for unknown bodies or joints.
    fn joint_states(&self, body: BodyHandle, joints: &[JointId]) -> Result<Vec<JointState>, PhysicsError>;

    /// # Errors
    ///
    /// Fails for an unknown body or a disconnected context.
    fn reset_base(&mut self, body: BodyHandle, position: Vec3, orientation: Quat) -> Result<(), PhysicsError>;

    /// # Errors
    ///
    /// Fails for an unknown body or a disconnected context.
    fn reset_base_velocity(&mut self, body: BodyHandle, linear: Vec3, angular: Vec3) -> Result<(), PhysicsError>;

    /// # Errors
    ///
    /// Fails for unknown bodies or joints.
    fn reset_joint(&mut self, body: BodyHandle, joint: JointId, angle: f32, velocity: f32) -> Result<(), PhysicsError>;

    /// # Errors
    ///
    /// Fails for an unknown body or a disconnected context.
    fn num_joints(&self, body: BodyHandle) -> Result<usize, PhysicsError>;

    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownJoint`] when `body` has no such joint.
    fn joint_id(&self, body: BodyHandle, name: &str) -> Result<JointId, PhysicsError>;

    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownGeom`] when no geometry has this name.
    fn geom_id(&self, name: &str) -> Result<GeomId, PhysicsError>;

    /// Contact pairs active after the last [`PhysicsAdapter::step`].
    ///
    /// # Errors
    ///
    /// Fails when the context is disconnected.
    fn contacts(&self) -> Result<Vec<ContactPair>, PhysicsError>;

    /// Replace collision/render terrain with `field`. Adapters without a
    /// terrain or render context accept and ignore the upload.
    ///
    /// # Errors
    ///
    /// Implementations may reject malformed fields.
    fn upload_heightfield(&mut self, field: &HeightfieldShape) -> Result<(), PhysicsError> {
        let _ = field;
        Ok(())
    }

    /// Release the simulation context.
    ///
    /// # Errors
    ///
    /// Fails when the context is already disconnected.
    fn disconnect(&mut self) -> Result<(), PhysicsError>;
}
