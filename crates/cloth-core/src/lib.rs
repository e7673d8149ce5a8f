//! Position-based cloth simulation over a regular node grid.
//!
//! A [`cloth::Cloth`] owns the node grid, its distance constraints (or
//! springs) and the render faces. A host calls [`cloth::Cloth::integrate`]
//! once per frame (or sub-step), then [`cloth::Cloth::compute_normals`]
//! before reading positions and normals.

pub mod cloth;
pub mod config;
pub mod constraints;
pub mod driver;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod method;
pub mod normals;
pub mod particle;
pub mod presets;
pub mod render;
pub mod stats;
pub mod topology;

pub use cloth::Cloth;
pub use config::ClothConfig;
pub use error::{ClothError, ClothResult};
pub use forces::impulse::Impulse;
pub use method::{BendingLevel, Method};
