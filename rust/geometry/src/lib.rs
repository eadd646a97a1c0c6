// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MEP-Holes Geometry
//!
//! Wall solids, ray casting and the spatial index behind it.
//!
//! [`ReferenceIntersector`] tessellates the wall solids of a document (and,
//! optionally, of its linked documents) into triangles, indexes them in a
//! [`Bvh`] and answers "which faces does this ray cross, and how far away"
//! queries.

pub mod aabb;
pub mod bvh;
pub mod error;
pub mod intersector;
pub mod ray;
pub mod solid;

// Re-export nalgebra types for convenience
pub use nalgebra::{Isometry3, Point3, Vector3};

pub use aabb::Aabb;
pub use bvh::Bvh;
pub use error::{Error, Result};
pub use intersector::{
    ElementClass, ElementFilter, FindReferenceTarget, IntersectorBuilder, ReferenceIntersector,
    ReferenceWithContext,
};
pub use ray::{Ray, Triangle};
pub use solid::{tessellate_wall, FaceTriangle, WallFace, WALL_TRIANGLES};
