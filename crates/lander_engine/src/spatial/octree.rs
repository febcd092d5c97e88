//! Octree spatial partitioning structure
//!
//! Divides the terrain's vertex cloud into hierarchical regions for fast ray
//! and box queries. The tree is built once from a static mesh and is read-only
//! afterwards. Nodes live in a flat arena and refer to each other by
//! [`NodeId`]; leaves hold indices into the shared mesh rather than copies of
//! the vertices.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::foundation::math::Vec3;
use crate::physics::collision::{Ray, TerrainMesh, AABB};

/// Errors raised while building an octree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpatialError {
    /// The source mesh has no vertices to partition
    #[error("cannot build an octree over a mesh with no vertices")]
    EmptyMesh,

    /// Build parameters are out of range
    #[error("invalid octree configuration: {0}")]
    InvalidConfig(String),

    /// The mesh has more vertices than a `u32` point index can address
    #[error("mesh has {0} vertices, more than a u32 index can address")]
    TooManyVertices(usize),
}

/// Configuration for octree subdivision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// A node holding this many points or fewer becomes a leaf
    pub max_points_per_leaf: usize,

    /// Maximum subdivision depth (root is depth 0)
    pub max_depth: u32,
}

impl OctreeConfig {
    /// Set the leaf capacity
    pub fn with_max_points_per_leaf(mut self, max_points: usize) -> Self {
        self.max_points_per_leaf = max_points;
        self
    }

    /// Set the maximum depth
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Validate the build parameters
    pub fn validate(&self) -> Result<(), SpatialError> {
        if self.max_points_per_leaf == 0 {
            return Err(SpatialError::InvalidConfig(
                "max_points_per_leaf must be at least 1".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(SpatialError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_points_per_leaf: 1,
            max_depth: 20,
        }
    }
}

/// Index of a node in the octree arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The root node of every octree
    pub const ROOT: Self = Self(0);

    /// Position of this node in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Single node in the octree hierarchy
#[derive(Debug, Clone)]
pub struct OctreeNode {
    /// World-space bounds of this node
    pub bounds: AABB,

    /// Mesh vertex indices held by this node (empty unless leaf)
    pub points: Vec<u32>,

    /// Child octants; only octants that received points are materialized
    pub children: [Option<NodeId>; 8],

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl OctreeNode {
    fn new(bounds: AABB, depth: u32) -> Self {
        Self {
            bounds,
            points: Vec::new(),
            children: [None; 8],
            depth,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Iterate over the materialized children in octant order
    pub fn child_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().flatten().copied()
    }
}

/// Result of a ray query against the octree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Leaf whose bounds the ray hit
    pub node: NodeId,
    /// Representative mesh vertex index for the hit
    pub point_index: u32,
    /// Position of the representative vertex
    pub point: Vec3,
}

/// Octree spatial partitioning structure over a static terrain mesh
#[derive(Debug, Clone)]
pub struct Octree {
    nodes: Vec<OctreeNode>,
    mesh: Arc<TerrainMesh>,
    config: OctreeConfig,
    depth: u32,
}

impl Octree {
    /// Build the partition over every vertex of `mesh`
    ///
    /// A node stops subdividing once it holds at most
    /// `config.max_points_per_leaf` points or reaches `config.max_depth`.
    /// Points exactly on a split plane go to the lower octant.
    pub fn build(mesh: Arc<TerrainMesh>, config: OctreeConfig) -> Result<Self, SpatialError> {
        config.validate()?;
        let root_bounds = mesh.bounds().ok_or(SpatialError::EmptyMesh)?;

        let mut root = OctreeNode::new(root_bounds, 0);
        root.points = point_indices(mesh.vertex_count())?.collect();

        let mut octree = Self {
            nodes: vec![root],
            mesh,
            config,
            depth: 0,
        };

        let mut pending = vec![NodeId::ROOT];
        while let Some(id) = pending.pop() {
            octree.subdivide(id, &mut pending);
        }

        log::info!(
            "Octree built: {} vertices, {} nodes, {} leaves, depth {}",
            octree.mesh.vertex_count(),
            octree.nodes.len(),
            octree.leaves().count(),
            octree.depth
        );
        Ok(octree)
    }

    /// Split one node into its non-empty octants and queue them for processing
    fn subdivide(&mut self, id: NodeId, pending: &mut Vec<NodeId>) {
        let node = &self.nodes[id.index()];
        self.depth = self.depth.max(node.depth);

        if node.points.len() <= self.config.max_points_per_leaf
            || node.depth >= self.config.max_depth
        {
            return;
        }

        let bounds = node.bounds;
        let depth = node.depth + 1;
        let center = bounds.center();
        let points = std::mem::take(&mut self.nodes[id.index()].points);

        let mut buckets: [Vec<u32>; 8] = Default::default();
        for index in points {
            let p = self.mesh.vertices()[index as usize];
            buckets[octant_index(p, center)].push(index);
        }

        for (octant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let child_id = NodeId(self.nodes.len() as u32);
            let mut child = OctreeNode::new(bounds.octant(octant), depth);
            child.points = bucket;
            self.nodes.push(child);
            self.nodes[id.index()].children[octant] = Some(child_id);
            pending.push(child_id);
        }
    }

    /// Find the first leaf hit by `ray`, visiting children in octant order
    ///
    /// The hit is represented by the leaf's first stored point. Traversal order
    /// decides which leaf wins, so this is not necessarily the leaf nearest the
    /// ray origin; use [`Octree::intersect_ray_nearest`] for that.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<RayHit> {
        self.first_hit(NodeId::ROOT, ray)
    }

    fn first_hit(&self, id: NodeId, ray: &Ray) -> Option<RayHit> {
        let node = &self.nodes[id.index()];
        if !node.bounds.hit_by_ray(ray, 0.0, f32::MAX) {
            return None;
        }
        if node.is_leaf() {
            return self.representative(id);
        }
        node.child_ids().find_map(|child| self.first_hit(child, ray))
    }

    /// Find the hit leaf point closest to the ray origin along the ray
    ///
    /// Tests every leaf the ray passes through and keeps the stored point with
    /// the smallest non-negative projection onto the ray.
    pub fn intersect_ray_nearest(&self, ray: &Ray) -> Option<RayHit> {
        let mut best: Option<(f32, RayHit)> = None;
        let mut stack = vec![NodeId::ROOT];

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            let Some((entry, _)) = node.bounds.intersect_ray(ray, 0.0, f32::MAX) else {
                continue;
            };
            if best.is_some_and(|(t, _)| entry > t) {
                continue;
            }
            if !node.is_leaf() {
                stack.extend(node.child_ids());
                continue;
            }
            for &point_index in &node.points {
                let point = self.mesh.vertices()[point_index as usize];
                let t = ray.project(point).max(0.0);
                if best.map_or(true, |(best_t, _)| t < best_t) {
                    best = Some((t, RayHit { node: id, point_index, point }));
                }
            }
        }

        best.map(|(_, hit)| hit)
    }

    /// Collect the bounds of every leaf overlapping `query`
    ///
    /// Appends to `hits` and returns true if at least one leaf overlapped.
    pub fn intersect_box(&self, query: &AABB, hits: &mut Vec<AABB>) -> bool {
        let before = hits.len();
        self.collect_overlaps(NodeId::ROOT, query, hits);
        hits.len() > before
    }

    fn collect_overlaps(&self, id: NodeId, query: &AABB, hits: &mut Vec<AABB>) {
        let node = &self.nodes[id.index()];
        if !node.bounds.overlaps(query) {
            return;
        }
        if node.is_leaf() {
            hits.push(node.bounds);
            return;
        }
        for child in node.child_ids() {
            self.collect_overlaps(child, query, hits);
        }
    }

    fn representative(&self, id: NodeId) -> Option<RayHit> {
        let point_index = *self.nodes[id.index()].points.first()?;
        Some(RayHit {
            node: id,
            point_index,
            point: self.mesh.vertices()[point_index as usize],
        })
    }

    /// Get a node by id
    pub fn node(&self, id: NodeId) -> Option<&OctreeNode> {
        self.nodes.get(id.index())
    }

    /// Get the root node
    pub fn root(&self) -> &OctreeNode {
        &self.nodes[NodeId::ROOT.index()]
    }

    /// Bounds of the whole tree (the mesh bounding box)
    pub fn bounds(&self) -> AABB {
        self.root().bounds
    }

    /// Iterate over all leaf nodes with their ids
    pub fn leaves(&self) -> impl Iterator<Item = (NodeId, &OctreeNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_leaf())
            .map(|(index, node)| (NodeId(index as u32), node))
    }

    /// Get all nodes at a specific depth (for level-by-level display)
    pub fn nodes_at_depth(&self, depth: u32) -> Vec<&OctreeNode> {
        self.nodes.iter().filter(|node| node.depth == depth).collect()
    }

    /// Total number of nodes in the arena
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest level reached by the build
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of points stored across all leaves
    pub fn point_count(&self) -> usize {
        self.leaves().map(|(_, leaf)| leaf.points.len()).sum()
    }

    /// Position of a mesh vertex by index
    pub fn point(&self, index: u32) -> Option<Vec3> {
        self.mesh.vertex(index)
    }

    /// The mesh this tree partitions
    pub fn mesh(&self) -> &Arc<TerrainMesh> {
        &self.mesh
    }

    /// Build parameters used for this tree
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }
}

/// Every vertex index of a mesh with `count` vertices
fn point_indices(count: usize) -> Result<std::ops::Range<u32>, SpatialError> {
    let end = u32::try_from(count).map_err(|_| SpatialError::TooManyVertices(count))?;
    Ok(0..end)
}

/// Octant index (0-7) of `point` relative to a split `center`
///
/// Octant layout:
/// 0: -X, -Y, -Z    4: -X, -Y, +Z
/// 1: +X, -Y, -Z    5: +X, -Y, +Z
/// 2: -X, +Y, -Z    6: -X, +Y, +Z
/// 3: +X, +Y, -Z    7: +X, +Y, +Z
fn octant_index(point: Vec3, center: Vec3) -> usize {
    let x_bit = usize::from(point.x > center.x);
    let y_bit = usize::from(point.y > center.y);
    let z_bit = usize::from(point.z > center.z);
    (z_bit << 2) | (y_bit << 1) | x_bit
}
