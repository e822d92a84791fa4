use physics::PhysicsError;
use terrain::TerrainError;
use thiserror::Error;

/// Rejected environment configuration, reported at construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("frame_skip must be at least 1")]
    FrameSkip,
    #[error("dt must be positive and finite, got {0}")]
    Timestep(f32),
    #[error("{limits} torque limits for {joints} controlled joints")]
    TorqueLimits { limits: usize, joints: usize },
    #[error("init_noise must be finite and non-negative, got {0}")]
    InitNoise(f32),
    #[error("no controlled joints")]
    NoJoints,
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("terrain: {0}")]
    Terrain(#[source] TerrainError),
}

#[derive(Error, Debug)]
pub enum EnvError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("physics: {0}")]
    Physics(#[from] PhysicsError),
    #[error("terrain: {0}")]
    Terrain(#[from] TerrainError),
    #[error("expected an action of {expected} components, got {actual}")]
    ActionDimension { expected: usize, actual: usize },
    #[error("episode has terminated; call reset before stepping")]
    EpisodeTerminated,
    #[error("no episode is running; the last reset did not complete")]
    NotRunning,
}
