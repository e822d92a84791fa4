#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]
//! # RL Environments
//!
//! Legged locomotion environments written against [`physics::PhysicsAdapter`].
//!
//! ## Key Components
//!
//! -   **Interface:** [`Env`] with `reset`/`step`, [`BoxSpace`] action and
//!     observation spaces and the [`Step`] result.
//! -   **Episode core:** [`Locomotor`] runs resets, action scaling, physics
//!     stepping and the forward-progress reward shared by every variant.
//! -   **Variants:** [`WalkerEnv`] on flat ground and [`HopperEnv`] on a
//!     generated ramp course.
//!
//! Every environment owns its adapter and a caller-supplied
//! `fastrand::Rng`; a fixed seed replays episodes exactly.

pub mod config;
pub mod env;
pub mod episode;
pub mod error;
pub mod hopper;
pub mod state;
pub mod walker;

pub use config::{ControlParams, HopperConfig, WalkerConfig, WorldSetup};
pub use env::{BoxSpace, Env, Info, Step};
pub use episode::{Locomotor, Phase, Transition};
pub use error::{ConfigError, EnvError};
pub use hopper::HopperEnv;
pub use state::{AgentState, OBS_VELOCITY_LIMIT};
pub use walker::WalkerEnv;
