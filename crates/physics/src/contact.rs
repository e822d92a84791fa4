//! Ground contact detection and penalty response.

use crate::adapter::{ContactParams, HeightfieldShape};
use crate::kinematics::{Sphere, P2};
use crate::types::GeomId;

/// Contact stiffness per kilogram of body mass (N/m/kg).
const STIFFNESS_PER_KG: f32 = 2_000.0;
/// Normal damping per kilogram of body mass at zero restitution (N·s/m/kg).
const DAMPING_PER_KG: f32 = 60.0;
/// Slip speed at which friction reaches its Coulomb bound.
const SLIP_VELOCITY: f32 = 0.05;

/// Penetration tolerated before positional correction kicks in.
pub(crate) const PENETRATION_SLOP: f32 = 0.01;
/// Share of the remaining penetration removed per correction iteration.
pub(crate) const CORRECTION_FACTOR: f32 = 0.8;

#[derive(Clone, Debug)]
pub(crate) enum Ground {
    Flat { elevation: f32 },
    Field(HeightfieldShape),
}

impl Ground {
    pub(crate) fn elevation_at(&self, x: f32) -> f32 {
        match self {
            Ground::Flat { elevation } => *elevation,
            Ground::Field(field) => field.elevation_at(x),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Contact {
    pub(crate) geom: GeomId,
    pub(crate) point: P2,
    pub(crate) depth: f32,
    pub(crate) link: Option<usize>,
}

fn penetration(ground: &Ground, sphere: &Sphere) -> f32 {
    ground.elevation_at(sphere.center[0]) + sphere.radius - sphere.center[1]
}

pub(crate) fn detect_ground_contacts(ground: &Ground, spheres: &[Sphere]) -> Vec<Contact> {
    spheres
        .iter()
        .filter_map(|sphere| {
            let depth = penetration(ground, sphere);
            (depth > 0.0).then(|| Contact {
                geom: sphere.geom,
                point: [sphere.center[0], sphere.center[1] - sphere.radius],
                depth,
                link: sphere.link,
            })
        })
        .collect()
}

pub(crate) fn max_penetration(ground: &Ground, spheres: &[Sphere]) -> f32 {
    spheres.iter().map(|s| penetration(ground, s)).fold(0.0, f32::max)
}

/// Spring-damper normal force along +z plus smoothed Coulomb friction along x.
/// The ground normal is treated as vertical on heightfields as well.
pub(crate) fn contact_force(contact: &Contact, velocity: P2, body_mass: f32, params: ContactParams) -> P2 {
    let stiffness = body_mass * STIFFNESS_PER_KG;
    let damping = body_mass * DAMPING_PER_KG * (1.0 - params.restitution.clamp(0.0, 1.0));
    let normal = (stiffness * contact.depth - damping * velocity[1]).max(0.0);
    let slip = (velocity[0] / SLIP_VELOCITY).clamp(-1.0, 1.0);
    [-params.friction * normal * slip, normal]
}

/// Surface parameters for a contact between the ground and a body.
pub(crate) fn combine(ground: ContactParams, body: ContactParams) -> ContactParams {
    ContactParams {
        friction: ground.friction * body.friction,
        restitution: ground.restitution.max(body.restitution),
    }
}
