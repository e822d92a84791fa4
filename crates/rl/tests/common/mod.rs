#![allow(dead_code)]

use std::path::{Path, PathBuf};

use physics::{
    BodyHandle, ContactPair, ContactParams, GeomId, HeightfieldShape, JointControl, JointId, JointState,
    PhysicsAdapter, PhysicsError, Pose, Quat, SolverParams, Twist, Vec3,
};

pub const WALKER_JOINTS: [&str; 6] =
    ["thigh_joint", "leg_joint", "foot_joint", "thigh_left_joint", "leg_left_joint", "foot_left_joint"];
pub const HOPPER_JOINTS: [&str; 3] = ["thigh_joint", "leg_joint", "foot_joint"];
pub const HOPPER_GEOMS: [&str; 5] = ["ground", "torso_geom", "thigh_geom", "leg_geom", "foot_geom"];

pub fn asset(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/models").join(name)
}

/// In-memory adapter with scripted kinematics: nothing moves unless a test
/// gives it velocity, which `step` integrates without gravity or contacts.
/// Every command is recorded for inspection.
#[derive(Debug)]
pub struct ScriptedAdapter {
    pub connected: bool,
    pub joint_names: Vec<String>,
    pub geoms: Vec<String>,
    pub pose: Pose,
    pub twist: Twist,
    pub joints: Vec<JointState>,
    pub contacts: Vec<ContactPair>,
    pub solver: SolverParams,
    pub gravity: Vec3,
    pub ground_contact: Option<ContactParams>,
    pub loaded: Vec<PathBuf>,
    pub torques: Vec<Vec<f32>>,
    pub position_targets: Vec<Vec<f32>>,
    pub steps: usize,
    pub uploads: Vec<HeightfieldShape>,
}

impl ScriptedAdapter {
    pub fn new(joint_names: &[&str], geoms: &[&str]) -> Self {
        Self {
            connected: true,
            joint_names: joint_names.iter().map(|s| s.to_string()).collect(),
            geoms: geoms.iter().map(|s| s.to_string()).collect(),
            pose: Pose::default(),
            twist: Twist::default(),
            joints: vec![JointState::default(); joint_names.len()],
            contacts: Vec::new(),
            solver: SolverParams::default(),
            gravity: Vec3::ZERO,
            ground_contact: None,
            loaded: Vec::new(),
            torques: Vec::new(),
            position_targets: Vec::new(),
            steps: 0,
            uploads: Vec::new(),
        }
    }

    pub fn walker() -> Self {
        Self::new(&WALKER_JOINTS, &["ground", "torso_geom", "foot_geom", "foot_left_geom"])
    }

    pub fn hopper() -> Self {
        Self::new(&HOPPER_JOINTS, &HOPPER_GEOMS)
    }

    pub fn geom(&self, name: &str) -> GeomId {
        GeomId(self.geoms.iter().position(|g| g == name).unwrap())
    }

    fn check(&self, body: BodyHandle) -> Result<(), PhysicsError> {
        if !self.connected {
            return Err(PhysicsError::NotConnected);
        }
        if body != BodyHandle(1) {
            return Err(PhysicsError::InvalidHandle(body));
        }
        Ok(())
    }

    fn check_joint(&self, body: BodyHandle, joint: JointId) -> Result<(), PhysicsError> {
        if joint.0 >= self.joints.len() {
            return Err(PhysicsError::InvalidJoint { body, joint });
        }
        Ok(())
    }
}

impl PhysicsAdapter for ScriptedAdapter {
    fn load_model(&mut self, path: &Path) -> Result<BodyHandle, PhysicsError> {
        self.loaded.push(path.to_path_buf());
        Ok(BodyHandle(1))
    }

    fn ground(&self) -> BodyHandle {
        BodyHandle(0)
    }

    fn set_gravity(&mut self, gravity: Vec3) -> Result<(), PhysicsError> {
        self.gravity = gravity;
        Ok(())
    }

    fn set_contact_params(&mut self, body: BodyHandle, params: ContactParams) -> Result<(), PhysicsError> {
        if body == self.ground() {
            self.ground_contact = Some(params);
        }
        Ok(())
    }

    fn set_solver_params(&mut self, params: SolverParams) -> Result<(), PhysicsError> {
        params.validate()?;
        self.solver = params;
        Ok(())
    }

    fn set_joint_targets(
        &mut self,
        body: BodyHandle,
        joints: &[JointId],
        control: JointControl<'_>,
    ) -> Result<(), PhysicsError> {
        self.check(body)?;
        control.check_len(joints.len())?;
        match control {
            JointControl::Torque { forces } => self.torques.push(forces.to_vec()),
            JointControl::Position { targets, .. } => self.position_targets.push(targets.to_vec()),
        }
        Ok(())
    }

    fn step(&mut self) -> Result<(), PhysicsError> {
        if !self.connected {
            return Err(PhysicsError::NotConnected);
        }
        let h = self.solver.timestep;
        self.pose.position += self.twist.linear * h;
        for joint in &mut self.joints {
            joint.angle += joint.velocity * h;
        }
        self.steps += 1;
        Ok(())
    }

    fn base_pose(&self, body: BodyHandle) -> Result<Pose, PhysicsError> {
        self.check(body)?;
        Ok(self.pose)
    }

    fn base_velocity(&self, body: BodyHandle) -> Result<Twist, PhysicsError> {
        self.check(body)?;
        Ok(self.twist)
    }

    fn joint_states(&self, body: BodyHandle, joints: &[JointId]) -> Result<Vec<JointState>, PhysicsError> {
        self.check(body)?;
        joints
            .iter()
            .map(|&j| {
                self.check_joint(body, j)?;
                Ok(self.joints[j.0])
            })
            .collect()
    }

    fn reset_base(&mut self, body: BodyHandle, position: Vec3, orientation: Quat) -> Result<(), PhysicsError> {
        self.check(body)?;
        self.pose = Pose { position, orientation };
        Ok(())
    }

    fn reset_base_velocity(&mut self, body: BodyHandle, linear: Vec3, angular: Vec3) -> Result<(), PhysicsError> {
        self.check(body)?;
        self.twist = Twist { linear, angular };
        Ok(())
    }

    fn reset_joint(&mut self, body: BodyHandle, joint: JointId, angle: f32, velocity: f32) -> Result<(), PhysicsError> {
        self.check(body)?;
        self.check_joint(body, joint)?;
        self.joints[joint.0] = JointState { angle, velocity };
        Ok(())
    }

    fn num_joints(&self, body: BodyHandle) -> Result<usize, PhysicsError> {
        self.check(body)?;
        Ok(self.joints.len())
    }

    fn joint_id(&self, body: BodyHandle, name: &str) -> Result<JointId, PhysicsError> {
        self.check(body)?;
        self.joint_names
            .iter()
            .position(|n| n == name)
            .map(JointId)
            .ok_or_else(|| PhysicsError::UnknownJoint { body, name: name.to_string() })
    }

    fn geom_id(&self, name: &str) -> Result<GeomId, PhysicsError> {
        self.geoms
            .iter()
            .position(|g| g == name)
            .map(GeomId)
            .ok_or_else(|| PhysicsError::UnknownGeom(name.to_string()))
    }

    fn contacts(&self) -> Result<Vec<ContactPair>, PhysicsError> {
        Ok(self.contacts.clone())
    }

    fn upload_heightfield(&mut self, field: &HeightfieldShape) -> Result<(), PhysicsError> {
        self.uploads.push(field.clone());
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), PhysicsError> {
        if !self.connected {
            return Err(PhysicsError::NotConnected);
        }
        self.connected = false;
        Ok(())
    }
}
