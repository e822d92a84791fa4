//! Runtime state of an articulated body inside [`crate::PlanarSim`].

use crate::adapter::{ContactParams, Gains};
use crate::model::{BodyModel, BASE_PARENT};
use crate::types::{GeomId, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Actuator {
    Torque(f32),
    Position { target: f32, gains: Gains, max_force: f32 },
}

impl Actuator {
    /// Torque produced for a joint at `angle` moving at `velocity`.
    pub(crate) fn torque(&self, angle: f32, velocity: f32) -> f32 {
        match *self {
            Actuator::Torque(torque) => torque,
            Actuator::Position { target, gains, max_force } => {
                let limit = max_force.abs();
                (gains.position * (target - angle) - gains.velocity * velocity).clamp(-limit, limit)
            }
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Capsule {
    pub(crate) geom: GeomId,
    pub(crate) from: [f32; 2],
    pub(crate) to: [f32; 2],
    pub(crate) radius: f32,
}

#[derive(Clone, Debug)]
pub(crate) struct Link {
    pub(crate) name: String,
    pub(crate) parent: Option<usize>,
    pub(crate) anchor: [f32; 2],
    pub(crate) length: f32,
    pub(crate) rest_angle: f32,
    pub(crate) range: Option<[f32; 2]>,
    pub(crate) mass: f32,
    pub(crate) inertia: f32,
    pub(crate) damping: f32,
    pub(crate) geom: Option<(GeomId, f32)>,
    pub(crate) angle: f32,
    pub(crate) velocity: f32,
    pub(crate) actuator: Actuator,
}

#[derive(Clone, Debug)]
pub(crate) struct Body {
    pub(crate) name: String,
    /// Lumped mass of base and links.
    pub(crate) mass: f32,
    /// Lumped pitch inertia of base and links.
    pub(crate) inertia: f32,
    pub(crate) position: Vec3,
    pub(crate) pitch: f32,
    pub(crate) linear: Vec3,
    pub(crate) pitch_rate: f32,
    pub(crate) capsules: Vec<Capsule>,
    pub(crate) links: Vec<Link>,
    pub(crate) contact: ContactParams,
}

impl Body {
    /// Build the runtime body from a validated model. `register_geom` hands out
    /// world-unique geometry ids.
    pub(crate) fn from_model(model: &BodyModel, mut register_geom: impl FnMut(&str) -> GeomId) -> Self {
        let capsules = model
            .base
            .geoms
            .iter()
            .map(|g| Capsule { geom: register_geom(&g.name), from: g.from, to: g.to, radius: g.radius })
            .collect();

        let mut links: Vec<Link> = Vec::with_capacity(model.joints.len());
        for def in &model.joints {
            let parent = if def.parent == BASE_PARENT {
                None
            } else {
                links.iter().position(|l| l.name == def.parent)
            };
            links.push(Link {
                name: def.name.clone(),
                parent,
                anchor: def.anchor,
                length: def.length,
                rest_angle: def.rest_angle,
                range: def.range,
                mass: def.mass,
                inertia: def.inertia,
                damping: def.damping,
                geom: def.geom.as_ref().map(|g| (register_geom(&g.name), g.radius)),
                angle: 0.0,
                velocity: 0.0,
                actuator: Actuator::Torque(0.0),
            });
        }

        Self {
            name: model.name.clone(),
            mass: model.total_mass(),
            inertia: model.base.inertia + model.joints.iter().map(|j| j.inertia).sum::<f32>(),
            position: Vec3::ZERO,
            pitch: 0.0,
            linear: Vec3::ZERO,
            pitch_rate: 0.0,
            capsules,
            links,
            contact: ContactParams::default(),
        }
    }

    /// Indices of `link` and all of its ancestors, innermost first.
    pub(crate) fn chain(&self, link: Option<usize>) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(link, move |&k| self.links[k].parent)
    }
}
