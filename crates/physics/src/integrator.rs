//! # Physics Integration
//!
//! Semi-implicit Euler for the floating base and every joint coordinate. The
//! mass matrix is treated as diagonal: the base carries the lumped body mass,
//! each joint its own effective inertia.

use crate::body::Body;
use crate::kinematics::P2;
use crate::types::Vec3;

/// Generalized forces gathered for one tick.
#[derive(Clone, Debug)]
pub(crate) struct Loads {
    pub(crate) base_force: P2,
    pub(crate) base_torque: f32,
    pub(crate) joint_torques: Vec<f32>,
}

impl Loads {
    pub(crate) fn zeroed(joint_count: usize) -> Self {
        Self { base_force: [0.0, 0.0], base_torque: 0.0, joint_torques: vec![0.0; joint_count] }
    }
}

pub(crate) fn integrate_body(body: &mut Body, loads: &Loads, gravity: Vec3, h: f32) {
    body.linear.x += (loads.base_force[0] / body.mass + gravity.x) * h;
    body.linear.z += (loads.base_force[1] / body.mass + gravity.z) * h;
    body.pitch_rate += loads.base_torque / body.inertia * h;

    body.position.x += body.linear.x * h;
    body.position.z += body.linear.z * h;
    body.pitch += body.pitch_rate * h;

    for (link, torque) in body.links.iter_mut().zip(&loads.joint_torques) {
        let accel = (torque - link.damping * link.velocity) / link.inertia;
        link.velocity += accel * h;
        link.angle += link.velocity * h;

        if let Some([lo, hi]) = link.range {
            if link.angle < lo {
                link.angle = lo;
                link.velocity = link.velocity.max(0.0);
            } else if link.angle > hi {
                link.angle = hi;
                link.velocity = link.velocity.min(0.0);
            }
        }
    }
}
