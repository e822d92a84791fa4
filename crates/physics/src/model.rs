//! JSON descriptions of planar articulated bodies.
//!
//! A model is a floating base plus a tree of revolute joints. Each joint owns
//! the link hanging below it: a segment of `length` pointing straight down at
//! zero angle, optionally wrapped in a capsule collision geometry. Coordinates
//! are `[x, z]` pairs in the parent's frame.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::PhysicsError;

/// Parent name that attaches a joint to the floating base.
pub const BASE_PARENT: &str = "base";

#[derive(Debug, Clone, Deserialize)]
pub struct BodyModel {
    pub name: String,
    pub base: BaseDef,
    #[serde(default)]
    pub joints: Vec<JointDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BaseDef {
    pub mass: f32,
    pub inertia: f32,
    #[serde(default)]
    pub geoms: Vec<CapsuleDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CapsuleDef {
    pub name: String,
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub radius: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JointDef {
    pub name: String,
    pub parent: String,
    pub anchor: [f32; 2],
    pub length: f32,
    #[serde(default)]
    pub rest_angle: f32,
    #[serde(default)]
    pub range: Option<[f32; 2]>,
    pub mass: f32,
    /// Effective inertia about the joint axis, armature included.
    pub inertia: f32,
    #[serde(default)]
    pub damping: f32,
    #[serde(default)]
    pub geom: Option<LinkGeomDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkGeomDef {
    pub name: String,
    pub radius: f32,
}

impl BodyModel {
    /// # Errors
    ///
    /// Returns [`PhysicsError::ModelParse`] for malformed JSON and
    /// [`PhysicsError::InvalidModel`] for inconsistent bodies.
    pub fn from_json(json: &str) -> Result<Self, PhysicsError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// # Errors
    ///
    /// Returns [`PhysicsError::ModelLoad`] when the file cannot be read, plus
    /// everything [`BodyModel::from_json`] reports.
    pub fn from_path(path: &Path) -> Result<Self, PhysicsError> {
        let json = std::fs::read_to_string(path).map_err(|source| PhysicsError::ModelLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Mass of the base plus every link.
    #[must_use]
    pub fn total_mass(&self) -> f32 {
        self.base.mass + self.joints.iter().map(|j| j.mass).sum::<f32>()
    }

    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidModel`] naming the first problem found.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let invalid = |msg: String| Err(PhysicsError::InvalidModel(msg));

        if !positive(self.base.mass) || !positive(self.base.inertia) {
            return invalid(format!("{}: base mass and inertia must be positive", self.name));
        }

        let mut geom_names = HashSet::new();
        for geom in &self.base.geoms {
            if !non_negative(geom.radius) {
                return invalid(format!("geom `{}` has a negative radius", geom.name));
            }
            if !geom_names.insert(geom.name.as_str()) {
                return invalid(format!("duplicate geom `{}`", geom.name));
            }
        }

        let mut joint_names = HashSet::new();
        for joint in &self.joints {
            if joint.name == BASE_PARENT {
                return invalid(format!("joint name `{BASE_PARENT}` is reserved"));
            }
            if joint.parent != BASE_PARENT && !joint_names.contains(joint.parent.as_str()) {
                return invalid(format!(
                    "joint `{}` references parent `{}` before it is declared",
                    joint.name, joint.parent
                ));
            }
            if !joint_names.insert(joint.name.as_str()) {
                return invalid(format!("duplicate joint `{}`", joint.name));
            }
            if !positive(joint.mass) || !positive(joint.inertia) {
                return invalid(format!("joint `{}` needs positive mass and inertia", joint.name));
            }
            if !non_negative(joint.length) || !non_negative(joint.damping) {
                return invalid(format!("joint `{}` has a negative length or damping", joint.name));
            }
            if let Some([lo, hi]) = joint.range {
                if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                    return invalid(format!("joint `{}` has an empty range", joint.name));
                }
            }
            if let Some(geom) = &joint.geom {
                if !non_negative(geom.radius) {
                    return invalid(format!("geom `{}` has a negative radius", geom.name));
                }
                if !geom_names.insert(geom.name.as_str()) {
                    return invalid(format!("duplicate geom `{}`", geom.name));
                }
            }
        }
        Ok(())
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}
