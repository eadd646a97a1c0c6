// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall solid tessellation
//!
//! A wall solid is the box swept along its location line by its thickness
//! and height. Each of the six faces becomes two triangles tagged with the
//! face they belong to, so ray hits can be traced back to a face reference.

use crate::error::Result;
use crate::ray::Triangle;
use mep_holes_core::Wall;
use nalgebra::{Isometry3, Point3, Vector3};
use smallvec::SmallVec;

/// Triangles per wall solid (2 per face, 6 faces)
pub const WALL_TRIANGLES: usize = 12;

/// Faces of a wall solid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum WallFace {
    /// Side facing the left-hand normal of the location line
    Exterior = 0,
    Interior = 1,
    StartCap = 2,
    EndCap = 3,
    Bottom = 4,
    Top = 5,
}

impl WallFace {
    #[inline]
    pub fn index(self) -> u32 {
        self as u32
    }
}

/// Triangle tagged with the face it was cut from
#[derive(Debug, Clone, Copy)]
pub struct FaceTriangle {
    pub triangle: Triangle,
    pub face: WallFace,
}

/// Tessellate a wall solid, mapping every vertex through `transform`
pub fn tessellate_wall(
    wall: &Wall,
    transform: &Isometry3<f64>,
) -> Result<SmallVec<[FaceTriangle; WALL_TRIANGLES]>> {
    wall.validate()?;

    let base_z = wall.start.z;
    let run = Vector3::new(wall.end.x - wall.start.x, wall.end.y - wall.start.y, 0.0);
    let along = run.normalize();
    let side = Vector3::new(-along.y, along.x, 0.0) * (wall.width * 0.5);
    let up = Vector3::new(0.0, 0.0, wall.height);

    let start = Point3::new(wall.start.x, wall.start.y, base_z);
    let end = start + run;

    // Base corners, counter-clockwise seen from above
    let b0 = start + side;
    let b1 = end + side;
    let b2 = end - side;
    let b3 = start - side;
    let [t0, t1, t2, t3] = [b0 + up, b1 + up, b2 + up, b3 + up];

    let quads = [
        (WallFace::Exterior, [b0, b1, t1, t0]),
        (WallFace::Interior, [b3, b2, t2, t3]),
        (WallFace::StartCap, [b0, b3, t3, t0]),
        (WallFace::EndCap, [b1, b2, t2, t1]),
        (WallFace::Bottom, [b0, b1, b2, b3]),
        (WallFace::Top, [t0, t1, t2, t3]),
    ];

    let mut triangles = SmallVec::new();
    for (face, quad) in quads {
        let [a, b, c, d] = quad.map(|p| transform.transform_point(&p));
        triangles.push(FaceTriangle {
            triangle: Triangle::new(a, b, c),
            face,
        });
        triangles.push(FaceTriangle {
            triangle: Triangle::new(a, c, d),
            face,
        });
    }
    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ray::Ray;
    use approx::assert_relative_eq;
    use mep_holes_core::ElementId;

    fn wall_along_y(x: f64) -> Wall {
        // 10 long along +Y, 0.5 thick, 3 high, centered on x
        Wall {
            id: ElementId(1),
            name: String::new(),
            level_id: None,
            start: Point3::new(x, -5.0, 0.0),
            end: Point3::new(x, 5.0, 0.0),
            width: 0.5,
            height: 3.0,
        }
    }

    fn hits(tris: &[FaceTriangle], ray: &Ray) -> Vec<(WallFace, f64)> {
        tris.iter()
            .filter_map(|ft| ft.triangle.intersect_ray(ray).map(|t| (ft.face, t)))
            .collect()
    }

    #[test]
    fn test_twelve_triangles_total_area() {
        let tris = tessellate_wall(&wall_along_y(0.0), &Isometry3::identity()).unwrap();
        assert_eq!(tris.len(), WALL_TRIANGLES);
        let area: f64 = tris.iter().map(|t| t.triangle.area()).sum();
        // 2 * (10*3 + 0.5*3 + 10*0.5)
        assert_relative_eq!(area, 73.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ray_crosses_both_side_faces() {
        let tris = tessellate_wall(&wall_along_y(3.0), &Isometry3::identity()).unwrap();
        let ray = Ray::new(Point3::new(0.0, 1.0, 1.0), Vector3::x()).unwrap();
        let mut found = hits(&tris, &ray);
        found.sort_by(|a, b| a.1.total_cmp(&b.1));
        assert_eq!(found.len(), 2);
        // Normal of a +Y run is -X, so the exterior face sits at x = 2.75
        assert_eq!(found[0].0, WallFace::Exterior);
        assert_relative_eq!(found[0].1, 2.75);
        assert_eq!(found[1].0, WallFace::Interior);
        assert_relative_eq!(found[1].1, 3.25);
    }

    #[test]
    fn test_transform_applied() {
        let shift = Isometry3::translation(10.0, 0.0, 0.0);
        let tris = tessellate_wall(&wall_along_y(0.0), &shift).unwrap();
        let ray = Ray::new(Point3::new(0.0, 1.0, 1.0), Vector3::x()).unwrap();
        let mut found = hits(&tris, &ray);
        found.sort_by(|a, b| a.1.total_cmp(&b.1));
        assert_relative_eq!(found[0].1, 9.75);
    }

    #[test]
    fn test_invalid_wall_rejected() {
        let mut wall = wall_along_y(0.0);
        wall.height = 0.0;
        assert!(tessellate_wall(&wall, &Isometry3::identity()).is_err());
    }
}
