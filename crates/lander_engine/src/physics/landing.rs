//! Landing zones on the terrain surface

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::physics::collision::Ray;
use crate::spatial::Octree;

/// Spherical region around a terrain point where a gentle touchdown wins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandingZone {
    /// Zone center, on the terrain surface
    pub center: Vec3,
    /// Zone radius in world units
    pub radius: f32,
}

impl LandingZone {
    /// Create a zone around `center`
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check whether `position` lies strictly inside the zone
    pub fn contains(&self, position: Vec3) -> bool {
        (position - self.center).magnitude() < self.radius
    }

    /// Scatter `count` zones over random terrain vertices
    ///
    /// Each zone probes the octree with a ray cast straight down from
    /// `probe_height` above a random vertex and centers on the point it hits,
    /// falling back to the vertex itself when the probe misses.
    pub fn place<R: Rng>(
        octree: &Octree,
        rng: &mut R,
        count: usize,
        radius: f32,
        probe_height: f32,
    ) -> Vec<Self> {
        let vertices = octree.mesh().vertices();
        if vertices.is_empty() {
            return Vec::new();
        }

        (0..count)
            .map(|_| {
                let vertex = vertices[rng.gen_range(0..vertices.len())];
                let probe = Ray::downward(vertex + Vec3::new(0.0, probe_height, 0.0));
                let center = match octree.intersect_ray(&probe) {
                    Some(hit) => hit.point,
                    None => {
                        log::debug!("Landing zone probe missed terrain at {vertex:?}");
                        vertex
                    }
                };
                Self::new(center, radius)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::TerrainMesh;
    use crate::spatial::OctreeConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn octree() -> Octree {
        let mesh = Arc::new(TerrainMesh::heightfield(21, 21, 2.0, |x, z| {
            0.1 * x + (z * 0.25).sin()
        }));
        Octree::build(mesh, OctreeConfig::default()).unwrap()
    }

    #[test]
    fn test_contains_is_strict() {
        let zone = LandingZone::new(Vec3::new(0.0, 0.0, 0.0), 5.0);
        assert!(zone.contains(Vec3::new(3.0, 0.0, 3.9)));
        assert!(!zone.contains(Vec3::new(3.0, 0.0, 4.0)));
        assert!(!zone.contains(Vec3::new(0.0, 6.0, 0.0)));
    }

    #[test]
    fn test_zones_sit_on_terrain_vertices() {
        let octree = octree();
        let mut rng = StdRng::seed_from_u64(7);
        let zones = LandingZone::place(&octree, &mut rng, 3, 5.0, 200.0);

        assert_eq!(zones.len(), 3);
        for zone in &zones {
            assert_eq!(zone.radius, 5.0);
            assert!(octree.mesh().vertices().contains(&zone.center));
        }
    }

    #[test]
    fn test_same_seed_places_same_zones() {
        let octree = octree();
        let a = LandingZone::place(&octree, &mut StdRng::seed_from_u64(42), 4, 5.0, 200.0);
        let b = LandingZone::place(&octree, &mut StdRng::seed_from_u64(42), 4, 5.0, 200.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_missed_probe_falls_back_to_vertex() {
        let octree = octree();
        let below = octree.bounds().min.y - octree.bounds().max.y - 10.0;
        let zones = LandingZone::place(&octree, &mut StdRng::seed_from_u64(3), 5, 2.0, below);

        for zone in &zones {
            assert!(octree.mesh().vertices().contains(&zone.center));
        }
    }

    #[test]
    fn test_zero_count_places_nothing() {
        let octree = octree();
        let zones = LandingZone::place(&octree, &mut StdRng::seed_from_u64(1), 0, 5.0, 200.0);
        assert!(zones.is_empty());
    }
}
