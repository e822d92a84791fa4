//! # Planar Simulation Core
//!
//! [`PlanarSim`] is the in-tree [`PhysicsAdapter`]: floating-base planar
//! bodies with revolute joint trees, colliding with a flat ground or an
//! uploaded heightfield. Each tick runs forward kinematics, actuator and
//! gravity torques, penalty ground contacts, semi-implicit integration and a
//! few rounds of positional penetration correction.

use std::path::Path;

use crate::adapter::{ContactParams, HeightfieldShape, JointControl, PhysicsAdapter, SolverParams};
use crate::body::{Actuator, Body};
use crate::contact::{
    combine, contact_force, detect_ground_contacts, max_penetration, Ground, CORRECTION_FACTOR,
    PENETRATION_SLOP,
};
use crate::error::PhysicsError;
use crate::integrator::{integrate_body, Loads};
use crate::kinematics::{
    add, base_origin, collision_spheres, forward_kinematics, moment, point_velocity, scale, sub,
};
use crate::model::BodyModel;
use crate::types::{BodyHandle, ContactPair, GeomId, JointId, JointState, Pose, Quat, Twist, Vec3};

/// Name of the ground's collision geometry.
pub const GROUND_GEOM_NAME: &str = "ground";
/// Id of the ground's collision geometry.
pub const GROUND_GEOM: GeomId = GeomId(0);

const GROUND_BODY: BodyHandle = BodyHandle(0);

/// Planar articulated-body simulation context.
pub struct PlanarSim {
    connected: bool,
    gravity: Vec3,
    solver: SolverParams,
    ground: Ground,
    ground_contact: ContactParams,
    bodies: Vec<Body>,
    geoms: Vec<String>,
    contacts: Vec<ContactPair>,
}

impl PlanarSim {
    /// Open a context holding only a flat ground at z = 0.
    #[must_use]
    pub fn connect() -> Self {
        Self {
            connected: true,
            gravity: Vec3::new(0.0, 0.0, -9.81),
            solver: SolverParams::default(),
            ground: Ground::Flat { elevation: 0.0 },
            ground_contact: ContactParams::default(),
            bodies: Vec::new(),
            geoms: vec![GROUND_GEOM_NAME.to_string()],
            contacts: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Add an already parsed model to the world.
    ///
    /// # Errors
    ///
    /// Fails for invalid models or a disconnected context.
    pub fn add_model(&mut self, model: &BodyModel) -> Result<BodyHandle, PhysicsError> {
        self.ensure_connected()?;
        model.validate()?;
        let geoms = &mut self.geoms;
        let body = Body::from_model(model, |name| {
            geoms.push(name.to_string());
            GeomId(geoms.len() - 1)
        });
        let handle = BodyHandle(self.bodies.len() + 1);
        tracing::debug!("loaded body `{}` as {:?}", body.name, handle);
        self.bodies.push(body);
        Ok(handle)
    }

    /// Surface elevation under world `x`.
    #[must_use]
    pub fn ground_elevation(&self, x: f32) -> f32 {
        self.ground.elevation_at(x)
    }

    fn ensure_connected(&self) -> Result<(), PhysicsError> {
        if self.connected {
            Ok(())
        } else {
            Err(PhysicsError::NotConnected)
        }
    }

    fn body(&self, handle: BodyHandle) -> Result<&Body, PhysicsError> {
        self.ensure_connected()?;
        handle
            .0
            .checked_sub(1)
            .and_then(|i| self.bodies.get(i))
            .ok_or(PhysicsError::InvalidHandle(handle))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body, PhysicsError> {
        self.ensure_connected()?;
        handle
            .0
            .checked_sub(1)
            .and_then(|i| self.bodies.get_mut(i))
            .ok_or(PhysicsError::InvalidHandle(handle))
    }

    fn check_joints(body: &Body, handle: BodyHandle, joints: &[JointId]) -> Result<(), PhysicsError> {
        match joints.iter().find(|j| j.0 >= body.links.len()) {
            Some(&joint) => Err(PhysicsError::InvalidJoint { body: handle, joint }),
            None => Ok(()),
        }
    }

    fn tick(&mut self, h: f32) {
        self.contacts.clear();
        let gravity = self.gravity;
        for body in &mut self.bodies {
            let frames = forward_kinematics(body);
            let mut loads = Loads::zeroed(body.links.len());

            for (i, link) in body.links.iter().enumerate() {
                let torque = link.actuator.torque(link.angle, link.velocity);
                loads.joint_torques[i] += torque;
                if link.parent.is_none() {
                    loads.base_torque -= torque;
                }
            }

            // Gravity on each link's midpoint loads every joint above it.
            for (j, link) in body.links.iter().enumerate() {
                let com = scale(add(frames[j].origin, frames[j].end(link.length)), 0.5);
                let weight = [link.mass * gravity.x, link.mass * gravity.z];
                for k in body.chain(Some(j)) {
                    loads.joint_torques[k] += moment(sub(com, frames[k].origin), weight);
                }
            }

            let params = combine(self.ground_contact, body.contact);
            let spheres = collision_spheres(body, &frames);
            let base = base_origin(body);
            for contact in detect_ground_contacts(&self.ground, &spheres) {
                let velocity = point_velocity(body, &frames, contact.link, contact.point);
                let force = contact_force(&contact, velocity, body.mass, params);
                loads.base_force = add(loads.base_force, force);
                loads.base_torque += moment(sub(contact.point, base), force);
                for k in body.chain(contact.link) {
                    loads.joint_torques[k] += moment(sub(contact.point, frames[k].origin), force);
                }
                self.contacts.push(ContactPair { geom_a: GROUND_GEOM, geom_b: contact.geom });
            }

            integrate_body(body, &loads, gravity, h);

            for _ in 0..self.solver.iterations {
                let frames = forward_kinematics(body);
                let depth = max_penetration(&self.ground, &collision_spheres(body, &frames));
                if depth <= PENETRATION_SLOP {
                    break;
                }
                body.position.z += CORRECTION_FACTOR * (depth - PENETRATION_SLOP);
            }
        }
        self.contacts.sort_unstable();
        self.contacts.dedup();
    }
}

impl PhysicsAdapter for PlanarSim {
    fn load_model(&mut self, path: &Path) -> Result<BodyHandle, PhysicsError> {
        self.ensure_connected()?;
        let model = BodyModel::from_path(path)?;
        self.add_model(&model)
    }

    fn ground(&self) -> BodyHandle {
        GROUND_BODY
    }

    fn set_gravity(&mut self, gravity: Vec3) -> Result<(), PhysicsError> {
        self.ensure_connected()?;
        self.gravity = gravity;
        Ok(())
    }

    fn set_contact_params(&mut self, body: BodyHandle, params: ContactParams) -> Result<(), PhysicsError> {
        if body == GROUND_BODY {
            self.ensure_connected()?;
            self.ground_contact = params;
        } else {
            self.body_mut(body)?.contact = params;
        }
        Ok(())
    }

    fn set_solver_params(&mut self, params: SolverParams) -> Result<(), PhysicsError> {
        self.ensure_connected()?;
        params.validate()?;
        self.solver = params;
        Ok(())
    }

    fn set_joint_targets(
        &mut self,
        handle: BodyHandle,
        joints: &[JointId],
        control: JointControl<'_>,
    ) -> Result<(), PhysicsError> {
        control.check_len(joints.len())?;
        let body = self.body_mut(handle)?;
        Self::check_joints(body, handle, joints)?;
        for (i, joint) in joints.iter().enumerate() {
            body.links[joint.0].actuator = match control {
                JointControl::Torque { forces } => Actuator::Torque(forces[i]),
                JointControl::Position { targets, gains, max_forces } => Actuator::Position {
                    target: targets[i],
                    gains,
                    max_force: max_forces[i],
                },
            };
        }
        Ok(())
    }

    fn step(&mut self) -> Result<(), PhysicsError> {
        self.ensure_connected()?;
        let h = self.solver.timestep / self.solver.substeps as f32;
        for _ in 0..self.solver.substeps {
            self.tick(h);
        }
        Ok(())
    }

    fn base_pose(&self, handle: BodyHandle) -> Result<Pose, PhysicsError> {
        let body = self.body(handle)?;
        Ok(Pose { position: body.position, orientation: Quat::from_pitch(body.pitch) })
    }

    fn base_velocity(&self, handle: BodyHandle) -> Result<Twist, PhysicsError> {
        let body = self.body(handle)?;
        Ok(Twist { linear: body.linear, angular: Vec3::new(0.0, body.pitch_rate, 0.0) })
    }

    fn joint_states(&self, handle: BodyHandle, joints: &[JointId]) -> Result<Vec<JointState>, PhysicsError> {
        let body = self.body(handle)?;
        Self::check_joints(body, handle, joints)?;
        Ok(joints
            .iter()
            .map(|j| {
                let link = &body.links[j.0];
                JointState { angle: link.angle, velocity: link.velocity }
            })
            .collect())
    }

    fn reset_base(&mut self, handle: BodyHandle, position: Vec3, orientation: Quat) -> Result<(), PhysicsError> {
        let body = self.body_mut(handle)?;
        body.position = position;
        body.pitch = orientation.pitch();
        Ok(())
    }

    fn reset_base_velocity(&mut self, handle: BodyHandle, linear: Vec3, angular: Vec3) -> Result<(), PhysicsError> {
        let body = self.body_mut(handle)?;
        body.linear = linear;
        body.pitch_rate = angular.y;
        Ok(())
    }

    fn reset_joint(&mut self, handle: BodyHandle, joint: JointId, angle: f32, velocity: f32) -> Result<(), PhysicsError> {
        let body = self.body_mut(handle)?;
        Self::check_joints(body, handle, &[joint])?;
        let link = &mut body.links[joint.0];
        link.angle = angle;
        link.velocity = velocity;
        Ok(())
    }

    fn num_joints(&self, handle: BodyHandle) -> Result<usize, PhysicsError> {
        Ok(self.body(handle)?.links.len())
    }

    fn joint_id(&self, handle: BodyHandle, name: &str) -> Result<JointId, PhysicsError> {
        self.body(handle)?
            .links
            .iter()
            .position(|l| l.name == name)
            .map(JointId)
            .ok_or_else(|| PhysicsError::UnknownJoint { body: handle, name: name.to_string() })
    }

    fn geom_id(&self, name: &str) -> Result<GeomId, PhysicsError> {
        self.ensure_connected()?;
        self.geoms
            .iter()
            .position(|g| g == name)
            .map(GeomId)
            .ok_or_else(|| PhysicsError::UnknownGeom(name.to_string()))
    }

    fn contacts(&self) -> Result<Vec<ContactPair>, PhysicsError> {
        self.ensure_connected()?;
        Ok(self.contacts.clone())
    }

    fn upload_heightfield(&mut self, field: &HeightfieldShape) -> Result<(), PhysicsError> {
        self.ensure_connected()?;
        field.validate()?;
        tracing::debug!(ncol = field.ncol, extent = field.world_extent, "heightfield uploaded");
        self.ground = Ground::Field(field.clone());
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), PhysicsError> {
        self.ensure_connected()?;
        self.connected = false;
        self.bodies.clear();
        self.geoms.truncate(1);
        self.contacts.clear();
        Ok(())
    }
}
