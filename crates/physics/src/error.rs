use std::path::PathBuf;

use thiserror::Error;

use crate::types::{BodyHandle, JointId};

#[derive(Error, Debug)]
pub enum PhysicsError {
    #[error("physics context is not connected")]
    NotConnected,
    #[error("invalid body handle {0:?}")]
    InvalidHandle(BodyHandle),
    #[error("body {body:?} has no joint named `{name}`")]
    UnknownJoint { body: BodyHandle, name: String },
    #[error("body {body:?} has no joint {joint:?}")]
    InvalidJoint { body: BodyHandle, joint: JointId },
    #[error("no geometry named `{0}`")]
    UnknownGeom(String),
    #[error("expected {expected} joint values, got {actual}")]
    JointCountMismatch { expected: usize, actual: usize },
    #[error("failed to read model {}", path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse model: {0}")]
    ModelParse(#[from] serde_json::Error),
    #[error("invalid model: {0}")]
    InvalidModel(String),
    #[error("invalid solver parameters: {0}")]
    InvalidSolverParams(&'static str),
    #[error("invalid heightfield: {0}")]
    InvalidHeightfield(&'static str),
}
