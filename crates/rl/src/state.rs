use physics::{JointState, Quat, Vec3};

/// Observation velocities are clipped to this magnitude.
pub const OBS_VELOCITY_LIMIT: f32 = 10.0;

/// Physical state of the agent, read fresh from the adapter every step.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentState {
    pub position: Vec3,
    pub orientation: Quat,
    pub linear: Vec3,
    pub angular: Vec3,
    /// Controlled joints, in action order.
    pub joints: Vec<JointState>,
}

fn clip_velocity(v: f32) -> f32 {
    v.clamp(-OBS_VELOCITY_LIMIT, OBS_VELOCITY_LIMIT)
}

impl AgentState {
    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.orientation.pitch()
    }

    /// `[height, pitch, q..., vx, vz, pitch_rate, qd...]` with velocities
    /// clipped. `height` is supplied by the caller so terrain variants can
    /// measure it from the ground.
    #[must_use]
    pub fn observation(&self, height: f32) -> Vec<f32> {
        let mut obs = Vec::with_capacity(5 + 2 * self.joints.len());
        obs.push(height);
        obs.push(self.pitch());
        obs.extend(self.joints.iter().map(|j| j.angle));
        obs.push(clip_velocity(self.linear.x));
        obs.push(clip_velocity(self.linear.z));
        obs.push(clip_velocity(self.angular.y));
        obs.extend(self.joints.iter().map(|j| clip_velocity(j.velocity)));
        obs
    }

    /// Unclipped `[x, z, pitch, q..., vx, vz, pitch_rate, qd...]`.
    #[must_use]
    pub fn state_vector(&self) -> Vec<f32> {
        let mut s = Vec::with_capacity(6 + 2 * self.joints.len());
        s.extend([self.position.x, self.position.z, self.pitch()]);
        s.extend(self.joints.iter().map(|j| j.angle));
        s.extend([self.linear.x, self.linear.z, self.angular.y]);
        s.extend(self.joints.iter().map(|j| j.velocity));
        s
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.orientation.is_finite()
            && self.linear.is_finite()
            && self.angular.is_finite()
            && self.joints.iter().all(|j| j.angle.is_finite() && j.velocity.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AgentState {
        AgentState {
            position: Vec3::new(3.0, 0.0, 1.2),
            orientation: Quat::from_pitch(0.1),
            linear: Vec3::new(25.0, 0.0, -0.5),
            angular: Vec3::new(0.0, -12.0, 0.0),
            joints: vec![
                JointState { angle: 0.2, velocity: 11.0 },
                JointState { angle: -0.3, velocity: 0.5 },
            ],
        }
    }

    #[test]
    fn observation_order_and_clipping() {
        let obs = state().observation(1.2);
        assert_eq!(obs.len(), 9);
        assert_eq!(obs[0], 1.2);
        assert!((obs[1] - 0.1).abs() < 1e-5);
        assert_eq!(&obs[2..4], &[0.2, -0.3]);
        assert_eq!(&obs[4..7], &[10.0, -0.5, -10.0]);
        assert_eq!(&obs[7..], &[10.0, 0.5]);
    }

    #[test]
    fn state_vector_is_unclipped() {
        let s = state().state_vector();
        assert_eq!(s.len(), 10);
        assert_eq!(s[0], 3.0);
        assert_eq!(s[1], 1.2);
        assert_eq!(s[5], 25.0);
        assert_eq!(s[7], -12.0);
        assert_eq!(s[8], 11.0);
    }

    #[test]
    fn any_nan_makes_state_non_finite() {
        let mut s = state();
        assert!(s.is_finite());
        s.joints[1].velocity = f32::NAN;
        assert!(!s.is_finite());
    }
}
