//! Spatial partitioning data structures
//!
//! Provides the terrain octree used for collision detection, ground probes
//! and picking.

mod octree;

pub use octree::{NodeId, Octree, OctreeConfig, OctreeNode, RayHit, SpatialError};
