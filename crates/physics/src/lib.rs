#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
//! # Physics
//!
//! The physics layer the locomotion environments are written against.
//!
//! ## Key Components
//!
//! -   **Adapter contract:** [`PhysicsAdapter`] lists every rigid-body
//!     operation an environment performs: loading bodies, commanding joint
//!     actuators, stepping, reading base and joint state, reporting contacts
//!     and receiving terrain.
//! -   **Planar backend:** [`PlanarSim`] implements the contract for planar
//!     (x/z/pitch) floating-base bodies with revolute joint trees, described
//!     in JSON ([`BodyModel`]).
//! -   **Errors:** every fallible call returns [`PhysicsError`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use physics::{PhysicsAdapter, PlanarSim, SolverParams};
//!
//! let mut sim = PlanarSim::connect();
//! let walker = sim.load_model("assets/models/walker2d.json".as_ref())?;
//! sim.set_solver_params(SolverParams { timestep: 0.0165, substeps: 4, iterations: 5 })?;
//! sim.step()?;
//! let pose = sim.base_pose(walker)?;
//! ```

pub mod adapter;
pub mod error;
pub mod model;
pub mod simulation;
pub mod types;

mod body;
mod contact;
mod integrator;
mod kinematics;

pub use adapter::{ContactParams, Gains, HeightfieldShape, JointControl, PhysicsAdapter, SolverParams};
pub use error::PhysicsError;
pub use model::BodyModel;
pub use simulation::{PlanarSim, GROUND_GEOM, GROUND_GEOM_NAME};
pub use types::{BodyHandle, ContactPair, GeomId, JointId, JointState, Pose, Quat, Twist, Vec3};
