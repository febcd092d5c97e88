//! Terrain mesh representation
//!
//! The terrain arrives already parsed from the model loader. It is stored once
//! in world space and never modified, so vertex indices stay valid for the
//! lifetime of every structure built on top of it.

use thiserror::Error;

use super::primitives::AABB;
use crate::foundation::math::Vec3;

/// Errors raised while assembling a terrain mesh
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// A triangle references a vertex that does not exist
    #[error("triangle index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index value
        index: u32,
        /// Number of vertices in the mesh
        vertex_count: usize,
    },

    /// Index buffer length is not a multiple of three
    #[error("index buffer length {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
}

/// Static terrain mesh in world space
#[derive(Debug, Clone, Default)]
pub struct TerrainMesh {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
}

impl TerrainMesh {
    /// Creates a mesh from world-space vertices and triangle indices
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }
        Ok(Self { vertices, indices })
    }

    /// Creates a point-only mesh with no faces
    pub fn from_points(vertices: Vec<Vec3>) -> Self {
        Self {
            vertices,
            indices: Vec::new(),
        }
    }

    /// Builds a regular grid heightfield centered on the origin
    ///
    /// `columns` x `rows` vertices spaced `spacing` apart on the XZ plane, with
    /// heights sampled from `height(x, z)`. Each grid cell becomes two triangles.
    pub fn heightfield<F>(columns: u32, rows: u32, spacing: f32, height: F) -> Self
    where
        F: Fn(f32, f32) -> f32,
    {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let half_width = (columns - 1) as f32 * spacing * 0.5;
        let half_depth = (rows - 1) as f32 * spacing * 0.5;

        let mut vertices = Vec::with_capacity((columns * rows) as usize);
        for row in 0..rows {
            for column in 0..columns {
                let x = column as f32 * spacing - half_width;
                let z = row as f32 * spacing - half_depth;
                vertices.push(Vec3::new(x, height(x, z), z));
            }
        }

        let mut indices = Vec::with_capacity(((columns - 1) * (rows - 1) * 6) as usize);
        for row in 0..rows.saturating_sub(1) {
            for column in 0..columns.saturating_sub(1) {
                let i0 = row * columns + column;
                let i1 = i0 + 1;
                let i2 = i0 + columns;
                let i3 = i2 + 1;
                indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
            }
        }

        Self { vertices, indices }
    }

    /// All vertices, index-addressable
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Triangle index buffer (three indices per face)
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertex at `index`, if it exists
    pub fn vertex(&self, index: u32) -> Option<Vec3> {
        self.vertices.get(index as usize).copied()
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corner positions of triangle `face`
    pub fn triangle(&self, face: usize) -> Option<[Vec3; 3]> {
        let tri = self.indices.get(face * 3..face * 3 + 3)?;
        Some([
            self.vertices[tri[0] as usize],
            self.vertices[tri[1] as usize],
            self.vertices[tri[2] as usize],
        ])
    }

    /// Check if the mesh has no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Bounding box of all vertices, `None` for an empty mesh
    pub fn bounds(&self) -> Option<AABB> {
        AABB::from_points(&self.vertices)
    }

    /// Lowest vertex height, used as the altitude reference
    pub fn min_height(&self) -> Option<f32> {
        self.vertices.iter().map(|v| v.y).reduce(f32::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_validates_indices() {
        let vertices = vec![Vec3::zeros(), Vec3::x(), Vec3::z()];
        assert!(TerrainMesh::new(vertices.clone(), vec![0, 1, 2]).is_ok());
        assert_eq!(
            TerrainMesh::new(vertices.clone(), vec![0, 1]).unwrap_err(),
            MeshError::IncompleteTriangle(2)
        );
        assert_eq!(
            TerrainMesh::new(vertices, vec![0, 1, 3]).unwrap_err(),
            MeshError::IndexOutOfRange { index: 3, vertex_count: 3 }
        );
    }

    #[test]
    fn test_heightfield_layout() {
        let mesh = TerrainMesh::heightfield(3, 4, 2.0, |x, z| x + z);
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 2 * 3 * 2);

        let bounds = mesh.bounds().unwrap();
        assert_relative_eq!(bounds.min.x, -2.0);
        assert_relative_eq!(bounds.max.x, 2.0);
        assert_relative_eq!(bounds.min.z, -3.0);
        assert_relative_eq!(bounds.max.z, 3.0);
        assert_relative_eq!(mesh.min_height().unwrap(), -5.0);
    }

    #[test]
    fn test_triangle_lookup() {
        let mesh = TerrainMesh::heightfield(2, 2, 1.0, |_, _| 0.0);
        let [a, b, c] = mesh.triangle(0).unwrap();
        assert_eq!(a, mesh.vertices()[0]);
        assert_eq!(b, mesh.vertices()[2]);
        assert_eq!(c, mesh.vertices()[1]);
        assert!(mesh.triangle(2).is_none());
    }

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        let mesh = TerrainMesh::from_points(Vec::new());
        assert!(mesh.is_empty());
        assert!(mesh.bounds().is_none());
        assert!(mesh.min_height().is_none());
    }
}
