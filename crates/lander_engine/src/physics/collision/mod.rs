//! Collision geometry
//!
//! Value types shared by the octree and the flight physics.
//!
//! # Module Organization
//!
//! - [`primitives`] - Rays and axis-aligned boxes with their intersection tests
//! - [`mesh`] - The static terrain mesh the octree is built over

pub mod mesh;
pub mod primitives;

pub use mesh::{MeshError, TerrainMesh};
pub use primitives::{Ray, AABB};
