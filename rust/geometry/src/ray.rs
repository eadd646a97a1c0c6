// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rays and ray/triangle intersection

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};

/// Tolerance for barycentric and parallel-plane tests
const RAY_EPSILON: f64 = 1e-9;

/// Half-line starting at `origin`, running along unit `direction`
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
    /// Component-wise reciprocal of `direction`, for slab tests
    pub inv_direction: Vector3<f64>,
}

impl Ray {
    /// Create a ray, normalizing `direction`
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Result<Self> {
        if !origin.coords.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidRay(format!(
                "origin ({}, {}, {}) is not finite",
                origin.x, origin.y, origin.z
            )));
        }
        let length = direction.norm();
        if !length.is_finite() || length < RAY_EPSILON {
            return Err(Error::InvalidRay(format!(
                "direction ({}, {}, {}) has no usable length",
                direction.x, direction.y, direction.z
            )));
        }
        let direction = direction / length;
        Ok(Self {
            origin,
            direction,
            inv_direction: Vector3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z),
        })
    }

    /// Point at distance `t` along the ray
    #[inline]
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

/// Triangle definition
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Calculate triangle normal
    pub fn normal(&self) -> Vector3<f64> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).normalize()
    }

    /// Calculate triangle area
    pub fn area(&self) -> f64 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).norm() * 0.5
    }

    /// Distance along `ray` to this triangle (Moller-Trumbore).
    ///
    /// Edges count as inside, so a ray through the shared diagonal of a quad
    /// hits both of its triangles. Hits behind the origin are rejected; a hit
    /// at the origin returns `Some(0.0)`.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f64> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        let p = ray.direction.cross(&edge2);
        let det = edge1.dot(&p);

        // Ray parallel to the triangle plane
        if det.abs() < RAY_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let s = ray.origin - self.v0;
        let u = s.dot(&p) * inv_det;
        if u < -RAY_EPSILON || u > 1.0 + RAY_EPSILON {
            return None;
        }

        let q = s.cross(&edge1);
        let v = ray.direction.dot(&q) * inv_det;
        if v < -RAY_EPSILON || u + v > 1.0 + RAY_EPSILON {
            return None;
        }

        let t = edge2.dot(&q) * inv_det;
        if t < -RAY_EPSILON {
            return None;
        }
        Some(t.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle_at_x(x: f64) -> Triangle {
        Triangle::new(
            Point3::new(x, 0.0, 0.0),
            Point3::new(x, 1.0, 0.0),
            Point3::new(x, 0.0, 1.0),
        )
    }

    #[test]
    fn test_ray_normalizes_direction() {
        let ray = Ray::new(Point3::origin(), Vector3::new(3.0, 0.0, 4.0)).unwrap();
        assert_relative_eq!(ray.direction.norm(), 1.0);
        assert_relative_eq!(ray.at(5.0), Point3::new(3.0, 0.0, 4.0));
    }

    #[test]
    fn test_ray_rejects_zero_direction() {
        assert!(Ray::new(Point3::origin(), Vector3::zeros()).is_err());
        assert!(Ray::new(Point3::origin(), Vector3::new(f64::NAN, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_ray_rejects_non_finite_origin() {
        let err = Ray::new(Point3::new(f64::INFINITY, 0.0, 0.0), Vector3::x()).unwrap_err();
        assert!(matches!(&err, Error::InvalidRay(msg) if msg.starts_with("origin")));
        assert!(err.to_string().starts_with("Invalid ray: origin"));
    }

    #[test]
    fn test_hit_in_front() {
        let ray = Ray::new(Point3::new(0.0, 0.25, 0.25), Vector3::x()).unwrap();
        let t = unit_triangle_at_x(5.0).intersect_ray(&ray).unwrap();
        assert_relative_eq!(t, 5.0);
    }

    #[test]
    fn test_miss_behind_and_outside() {
        let behind = Ray::new(Point3::new(10.0, 0.25, 0.25), Vector3::x()).unwrap();
        assert!(unit_triangle_at_x(5.0).intersect_ray(&behind).is_none());

        let outside = Ray::new(Point3::new(0.0, 0.9, 0.9), Vector3::x()).unwrap();
        assert!(unit_triangle_at_x(5.0).intersect_ray(&outside).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Point3::new(5.0, -1.0, 0.25), Vector3::y()).unwrap();
        assert!(unit_triangle_at_x(5.0).intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_edge_counts_as_hit() {
        // (0.5, 0.5) lies on the hypotenuse
        let ray = Ray::new(Point3::new(0.0, 0.5, 0.5), Vector3::x()).unwrap();
        assert!(unit_triangle_at_x(2.0).intersect_ray(&ray).is_some());
    }

    #[test]
    fn test_triangle_area_and_normal() {
        let tri = unit_triangle_at_x(0.0);
        assert_relative_eq!(tri.area(), 0.5);
        assert_relative_eq!(tri.normal(), Vector3::x());
    }
}
