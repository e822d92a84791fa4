//! Planar forward kinematics in the x/z plane.
//!
//! Angles are rotations about +y, so a positive pitch tips the +x axis
//! towards -z, matching a right-handed world with z up.

use crate::body::Body;
use crate::types::GeomId;

pub(crate) type P2 = [f32; 2];

pub(crate) fn add(a: P2, b: P2) -> P2 {
    [a[0] + b[0], a[1] + b[1]]
}

pub(crate) fn sub(a: P2, b: P2) -> P2 {
    [a[0] - b[0], a[1] - b[1]]
}

pub(crate) fn scale(a: P2, s: f32) -> P2 {
    [a[0] * s, a[1] * s]
}

pub(crate) fn rotate(v: P2, angle: f32) -> P2 {
    let (s, c) = angle.sin_cos();
    [v[0] * c + v[1] * s, -v[0] * s + v[1] * c]
}

/// Velocity of a point at offset `r` from an axis spinning at `rate`.
pub(crate) fn spin(r: P2, rate: f32) -> P2 {
    [rate * r[1], -rate * r[0]]
}

/// Moment about +y of force `f` applied at offset `r`.
pub(crate) fn moment(r: P2, f: P2) -> f32 {
    r[1] * f[0] - r[0] * f[1]
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct LinkFrame {
    pub(crate) origin: P2,
    pub(crate) angle: f32,
}

impl LinkFrame {
    pub(crate) fn end(&self, length: f32) -> P2 {
        add(self.origin, rotate([0.0, -length], self.angle))
    }
}

/// Sphere at one end of a capsule, tagged with the link that carries it
/// (`None` for the base).
#[derive(Clone, Copy, Debug)]
pub(crate) struct Sphere {
    pub(crate) geom: GeomId,
    pub(crate) center: P2,
    pub(crate) radius: f32,
    pub(crate) link: Option<usize>,
}

pub(crate) fn base_origin(body: &Body) -> P2 {
    [body.position.x, body.position.z]
}

/// World frame of every joint. Parents always precede children.
pub(crate) fn forward_kinematics(body: &Body) -> Vec<LinkFrame> {
    let base = base_origin(body);
    let mut frames: Vec<LinkFrame> = Vec::with_capacity(body.links.len());
    for link in &body.links {
        let (origin, parent_angle) = match link.parent {
            None => (add(base, rotate(link.anchor, body.pitch)), body.pitch),
            Some(p) => {
                let parent = frames[p];
                (add(parent.origin, rotate(link.anchor, parent.angle)), parent.angle)
            }
        };
        frames.push(LinkFrame { origin, angle: parent_angle + link.rest_angle + link.angle });
    }
    frames
}

/// End spheres of every capsule on the body.
pub(crate) fn collision_spheres(body: &Body, frames: &[LinkFrame]) -> Vec<Sphere> {
    let base = base_origin(body);
    let mut spheres = Vec::new();
    let mut push_capsule = |geom, a: P2, b: P2, radius, link| {
        spheres.push(Sphere { geom, center: a, radius, link });
        let d = sub(a, b);
        if d[0].abs() > 1e-6 || d[1].abs() > 1e-6 {
            spheres.push(Sphere { geom, center: b, radius, link });
        }
    };
    for capsule in &body.capsules {
        let a = add(base, rotate(capsule.from, body.pitch));
        let b = add(base, rotate(capsule.to, body.pitch));
        push_capsule(capsule.geom, a, b, capsule.radius, None);
    }
    for (i, (link, frame)) in body.links.iter().zip(frames).enumerate() {
        if let Some((geom, radius)) = link.geom {
            push_capsule(geom, frame.origin, frame.end(link.length), radius, Some(i));
        }
    }
    spheres
}

/// World velocity of point `p` rigidly attached to `link`.
pub(crate) fn point_velocity(body: &Body, frames: &[LinkFrame], link: Option<usize>, p: P2) -> P2 {
    let mut v = add([body.linear.x, body.linear.z], spin(sub(p, base_origin(body)), body.pitch_rate));
    for k in body.chain(link) {
        v = add(v, spin(sub(p, frames[k].origin), body.links[k].velocity));
    }
    v
}
