#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
//! # Terrain
//!
//! Procedural ramp courses for terrain-aware locomotion environments.
//!
//! ## Key Components
//!
//! -   **Storage:** [`HeightfieldStore`] keeps a two-row heightfield whose
//!     rows are always identical, answers interpolated height queries and
//!     tracks whether the physics engine has seen the latest samples.
//! -   **Generation:** [`TerrainGenerator`] walks a [`Cursor`] left to right,
//!     turning [`RampSegment`] commands into ramps and plateaus.
//! -   **Configuration:** [`TerrainConfig`] carries the course layout and
//!     builds a finished store from a caller-owned RNG.

pub mod config;
pub mod error;
pub mod generator;
pub mod heightfield;

pub use config::TerrainConfig;
pub use error::TerrainError;
pub use generator::{generate, Cursor, RampSegment, SlopeSchedule, TerrainGenerator};
pub use heightfield::{HeightfieldGeometry, HeightfieldStore, ROWS};
