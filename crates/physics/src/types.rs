use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// World-space vector. The planar backend works in the x/z plane (z up) and
/// carries `y` through untouched.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[must_use]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// Unit quaternion, `[x, y, z, w]` layout.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Rotation of `pitch` radians about the world y axis.
    #[must_use]
    pub fn from_pitch(pitch: f32) -> Self {
        let half = pitch * 0.5;
        Self { x: 0.0, y: half.sin(), z: 0.0, w: half.cos() }
    }

    /// Pitch (rotation about y) of the XYZ Euler decomposition.
    #[must_use]
    pub fn pitch(self) -> f32 {
        let sin_pitch = 2.0 * (self.w * self.y - self.z * self.x);
        sin_pitch.clamp(-1.0, 1.0).asin()
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Handle to a body owned by a physics context.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub usize);

/// Index of a joint within its body.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointId(pub usize);

/// World-unique collision geometry id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeomId(pub usize);

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Twist {
    pub linear: Vec3,
    pub angular: Vec3,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct JointState {
    pub angle: f32,
    pub velocity: f32,
}

/// Two geometries touching during the last physics step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactPair {
    pub geom_a: GeomId,
    pub geom_b: GeomId,
}

impl ContactPair {
    #[must_use]
    pub fn involves(&self, geom: GeomId) -> bool {
        self.geom_a == geom || self.geom_b == geom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_round_trips_through_quaternion() {
        for pitch in [-1.2_f32, -0.3, 0.0, 0.05, 0.9] {
            let q = Quat::from_pitch(pitch);
            assert!((q.pitch() - pitch).abs() < 1e-5, "pitch {pitch} -> {}", q.pitch());
        }
    }

    #[test]
    fn identity_has_zero_pitch() {
        assert_eq!(Quat::IDENTITY.pitch(), 0.0);
    }

    #[test]
    fn vector_ops() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(0.5, -1.0, 2.0);
        assert_eq!(a + b, Vec3::new(1.5, 1.0, 5.0));
        assert_eq!(a - b, Vec3::new(0.5, 3.0, 1.0));
        assert!((a.dot(b) - 4.5).abs() < 1e-6);
        assert!((Vec3::new(3.0, 0.0, 4.0).length() - 5.0).abs() < 1e-6);
    }
}
