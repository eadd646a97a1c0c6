// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding boxes

use crate::ray::{Ray, Triangle};
use nalgebra::Point3;

/// Axis-aligned bounding box in f64 precision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create an empty box (inverted bounds, contains nothing)
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::MAX, f64::MAX, f64::MAX),
            max: Point3::new(f64::MIN, f64::MIN, f64::MIN),
        }
    }

    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    pub fn from_triangle(tri: &Triangle) -> Self {
        let mut aabb = Self::empty();
        aabb.expand(&tri.v0);
        aabb.expand(&tri.v1);
        aabb.expand(&tri.v2);
        aabb
    }

    /// Check if bounds are valid (at least one point added)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Expand bounds to include a point
    #[inline]
    pub fn expand(&mut self, p: &Point3<f64>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    #[inline]
    pub fn union(&self, other: &Aabb) -> Aabb {
        if !other.is_valid() {
            return *self;
        }
        let mut out = *self;
        out.expand(&other.min);
        out.expand(&other.max);
        out
    }

    /// Grow the box by `margin` on every side
    pub fn padded(&self, margin: f64) -> Aabb {
        if !self.is_valid() {
            return *self;
        }
        let pad = nalgebra::Vector3::repeat(margin);
        Aabb::new(self.min - pad, self.max + pad)
    }

    #[inline]
    pub fn centroid(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn surface_area(&self) -> f64 {
        if !self.is_valid() {
            return 0.0;
        }
        let d = self.max - self.min;
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Slab test: parameter interval `[t_enter, t_exit]` where the ray is
    /// inside the box, clipped to `[0, max_t]`
    pub fn intersect_ray(&self, ray: &Ray, max_t: f64) -> Option<(f64, f64)> {
        let mut t_enter = 0.0_f64;
        let mut t_exit = max_t;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if ray.direction[axis] == 0.0 {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = ray.inv_direction[axis];
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }

        Some((t_enter, t_exit))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
