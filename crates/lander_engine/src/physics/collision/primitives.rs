//! Primitive collision shapes and intersection algorithms
//!
//! Provides the two value types every terrain query is built from: rays for
//! probes and picking, and axis-aligned boxes for octree cells and the rocket
//! hull.

use crate::foundation::math::Vec3;

/// Direction components smaller than this are treated as parallel to a slab
const PARALLEL_EPSILON: f32 = 1e-8;

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (always normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    ///
    /// Returns `None` when the direction has no usable length.
    pub fn try_new(origin: Vec3, direction: Vec3) -> Option<Self> {
        direction
            .try_normalize(f32::EPSILON)
            .map(|direction| Self { origin, direction })
    }

    /// Ray pointing straight down (-Y) from `origin`
    pub fn downward(origin: Vec3) -> Self {
        Self {
            origin,
            direction: Vec3::new(0.0, -1.0, 0.0),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Signed distance along the ray to the foot of the perpendicular from `point`
    pub fn project(&self, point: Vec3) -> f32 {
        (point - self.origin).dot(&self.direction)
    }
}

/// Axis-Aligned Bounding Box for spatial queries
///
/// Invariant: `min <= max` on every axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from two opposite corners
    ///
    /// The corners are sorted per axis, so argument order does not matter.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        let extents = extents.abs();
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Smallest box containing every point, or `None` for an empty set
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Vec3>,
    {
        let mut points = points.into_iter();
        let first = *points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.inf(p), max.sup(p)));
        Some(Self { min, max })
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Get the full edge lengths of the AABB
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Copy of this box moved by `offset`
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Copy of this box scaled about its center by `factor`
    pub fn scaled(&self, factor: f32) -> Self {
        Self::from_center_extents(self.center(), self.extents() * factor)
    }

    /// Copy of this box grown by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        Self::new(
            self.min - Vec3::repeat(margin),
            self.max + Vec3::repeat(margin),
        )
    }

    /// Check if this AABB contains a point (boundaries inclusive)
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this AABB overlaps another AABB (touching counts)
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Bounds of one of the eight octants produced by bisecting every axis
    ///
    /// Bit 0 of `octant` selects the upper X half, bit 1 upper Y, bit 2 upper Z.
    pub fn octant(&self, octant: usize) -> Self {
        let mid = self.center();
        let pick = |bit: usize, axis: usize| {
            if octant & bit != 0 {
                (mid[axis], self.max[axis])
            } else {
                (self.min[axis], mid[axis])
            }
        };
        let (x0, x1) = pick(1, 0);
        let (y0, y1) = pick(2, 1);
        let (z0, z1) = pick(4, 2);
        Self {
            min: Vec3::new(x0, y0, z0),
            max: Vec3::new(x1, y1, z1),
        }
    }

    /// Clip the parametric range `[t_min, t_max]` of a ray against this box
    ///
    /// Slab method: each axis narrows the interval to the span between its two
    /// planes. Returns the surviving `(entry, exit)` range, or `None` as soon as
    /// it becomes empty. Axes the ray runs parallel to only reject when the
    /// origin lies outside that slab.
    pub fn intersect_ray(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<(f32, f32)> {
        let mut t0 = t_min;
        let mut t1 = t_max;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if direction.abs() < PARALLEL_EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut near = (lo - origin) * inv;
            let mut far = (hi - origin) * inv;
            if near > far {
                std::mem::swap(&mut near, &mut far);
            }

            t0 = t0.max(near);
            t1 = t1.min(far);
            if t0 > t1 {
                return None;
            }
        }

        Some((t0, t1))
    }

    /// Boolean form of [`AABB::intersect_ray`]
    pub fn hit_by_ray(&self, ray: &Ray, t_min: f32, t_max: f32) -> bool {
        self.intersect_ray(ray, t_min, t_max).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> AABB {
        AABB::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_ray_rejects_zero_direction() {
        assert!(Ray::try_new(Vec3::zeros(), Vec3::zeros()).is_none());
    }

    #[test]
    fn test_ray_direction_is_normalized() {
        let ray = Ray::try_new(Vec3::zeros(), Vec3::new(0.0, -200.0, 0.0)).unwrap();
        assert_relative_eq!(ray.direction, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_new_sorts_corners() {
        let aabb = AABB::new(Vec3::new(5.0, -2.0, 3.0), Vec3::new(1.0, 4.0, -3.0));
        assert_eq!(aabb.min, Vec3::new(1.0, -2.0, -3.0));
        assert_eq!(aabb.max, Vec3::new(5.0, 4.0, 3.0));
    }

    #[test]
    fn test_from_points() {
        let points = [
            Vec3::new(1.0, 0.0, 2.0),
            Vec3::new(-3.0, 5.0, 0.0),
            Vec3::new(0.0, -1.0, 7.0),
        ];
        let aabb = AABB::from_points(&points).unwrap();
        assert_eq!(aabb.min, Vec3::new(-3.0, -1.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 5.0, 7.0));
        assert!(AABB::from_points(&[]).is_none());
    }

    #[test]
    fn test_expanded_grows_every_side() {
        let grown = unit_box().expanded(0.5);
        assert_relative_eq!(grown.min, Vec3::new(-1.5, -1.5, -1.5));
        assert_relative_eq!(grown.max, Vec3::new(1.5, 1.5, 1.5));
        assert_relative_eq!(grown.center(), unit_box().center());
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let boxes = [
            unit_box(),
            AABB::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(3.0, 3.0, 3.0)),
            AABB::new(Vec3::new(1.0, -1.0, -1.0), Vec3::new(2.0, 1.0, 1.0)),
            AABB::new(Vec3::new(4.0, 4.0, 4.0), Vec3::new(5.0, 5.0, 5.0)),
            AABB::new(Vec3::new(-0.1, -10.0, -0.1), Vec3::new(0.1, 10.0, 0.1)),
        ];
        for a in &boxes {
            for b in &boxes {
                assert_eq!(a.overlaps(b), b.overlaps(a));
            }
        }
    }

    #[test]
    fn test_overlap_touching_faces_counts() {
        let touching = AABB::new(Vec3::new(1.0, -1.0, -1.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(unit_box().overlaps(&touching));

        let apart = AABB::new(Vec3::new(1.01, -1.0, -1.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(!unit_box().overlaps(&apart));
    }

    #[test]
    fn test_octants_tile_parent() {
        let parent = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 2.0, 8.0));
        let mut volume = 0.0;
        for octant in 0..8 {
            let child = parent.octant(octant);
            let size = child.size();
            volume += size.x * size.y * size.z;
            assert!(parent.contains_point(child.min));
            assert!(parent.contains_point(child.max));
        }
        assert_relative_eq!(volume, 64.0);
        assert_eq!(parent.octant(7).max, parent.max);
        assert_eq!(parent.octant(0).min, parent.min);
    }

    #[test]
    fn test_ray_hits_box_and_entry_point_is_on_surface() {
        let ray = Ray::try_new(Vec3::new(-5.0, 0.2, 0.3), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let (entry, exit) = unit_box().intersect_ray(&ray, 0.0, 100.0).unwrap();
        assert_relative_eq!(entry, 4.0);
        assert_relative_eq!(exit, 6.0);

        let point = ray.point_at(entry);
        let grown = AABB::from_center_extents(Vec3::zeros(), Vec3::new(1.0001, 1.0001, 1.0001));
        assert!(grown.contains_point(point));
    }

    #[test]
    fn test_ray_hit_points_lie_in_box_for_diagonal_rays() {
        let aabb = AABB::new(Vec3::new(2.0, -1.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        let grown = aabb.scaled(1.0001);
        let origins = [
            Vec3::new(-10.0, -10.0, -10.0),
            Vec3::new(20.0, 7.0, 1.0),
            Vec3::new(3.0, 2.0, 4.0),
        ];
        for origin in origins {
            let ray = Ray::try_new(origin, aabb.center() - origin).unwrap();
            let (entry, exit) = aabb.intersect_ray(&ray, 0.0, f32::MAX).unwrap();
            assert!(entry <= exit);
            assert!(grown.contains_point(ray.point_at(entry)));
            assert!(grown.contains_point(ray.point_at(exit)));
        }
    }

    #[test]
    fn test_ray_pointing_away_misses() {
        let ray = Ray::try_new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)).unwrap();
        assert!(!unit_box().hit_by_ray(&ray, 0.0, f32::MAX));
    }

    #[test]
    fn test_ray_range_limits_hit() {
        let ray = Ray::try_new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert!(!unit_box().hit_by_ray(&ray, 0.0, 3.0));
        assert!(unit_box().hit_by_ray(&ray, 0.0, 4.0));
    }

    #[test]
    fn test_parallel_ray_inside_slab_passes() {
        // Straight down: x and z components are zero
        let inside = Ray::downward(Vec3::new(0.5, 10.0, -0.5));
        let (entry, exit) = unit_box().intersect_ray(&inside, 0.0, f32::MAX).unwrap();
        assert_relative_eq!(entry, 9.0);
        assert_relative_eq!(exit, 11.0);

        let outside = Ray::downward(Vec3::new(1.5, 10.0, 0.0));
        assert!(!unit_box().hit_by_ray(&outside, 0.0, f32::MAX));
    }

    #[test]
    fn test_flat_box_is_hit_from_above() {
        let flat = AABB::new(Vec3::new(-2.0, 0.0, -2.0), Vec3::new(2.0, 0.0, 2.0));
        let ray = Ray::downward(Vec3::new(0.0, 3.0, 0.0));
        let (entry, _) = flat.intersect_ray(&ray, 0.0, f32::MAX).unwrap();
        assert_relative_eq!(entry, 3.0);
    }
}
