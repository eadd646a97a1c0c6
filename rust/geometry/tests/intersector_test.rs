// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Indexed ray casting against a brute-force scan over a room grid.

use approx::assert_relative_eq;
use mep_holes_core::{Document, ElementId, View3D, Wall};
use mep_holes_geometry::{
    tessellate_wall, ElementClass, ElementFilter, FindReferenceTarget, Ray, ReferenceIntersector,
};
use nalgebra::{Isometry3, Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

/// Grid of rooms: walls along X and Y every 4 ft, 0.3 ft thick, 3 ft high
fn room_grid(n: usize) -> Document {
    let mut doc = Document::new("AR");
    let span = (n * 4) as f64;
    let mut id = 1;
    for i in 0..=n {
        let c = (i * 4) as f64;
        for (start, end) in [
            (Point3::new(c, 0.0, 0.0), Point3::new(c, span, 0.0)),
            (Point3::new(0.0, c, 0.0), Point3::new(span, c, 0.0)),
        ] {
            doc.add_wall(Wall {
                id: ElementId(id),
                name: format!("Wall {}", id),
                level_id: None,
                start,
                end,
                width: 0.3,
                height: 3.0,
            })
            .unwrap();
            id += 1;
        }
    }
    doc.add_view(View3D {
        id: ElementId(10_000),
        name: "{3D}".into(),
        is_template: false,
    })
    .unwrap();
    doc
}

fn brute_force(doc: &Document, origin: Point3<f64>, dir: Vector3<f64>) -> (BTreeSet<i64>, Option<f64>) {
    let ray = Ray::new(origin, dir).unwrap();
    let mut walls = BTreeSet::new();
    let mut nearest: Option<f64> = None;
    for wall in &doc.walls {
        for ft in tessellate_wall(wall, &Isometry3::identity()).unwrap() {
            if let Some(t) = ft.triangle.intersect_ray(&ray) {
                walls.insert(wall.id.value());
                nearest = Some(nearest.map_or(t, |n: f64| n.min(t)));
            }
        }
    }
    (walls, nearest)
}

#[test]
fn test_indexed_matches_brute_force() {
    let doc = room_grid(6);
    let view = doc.views.iter().next().unwrap().clone();
    let intersector = ReferenceIntersector::new(
        &doc,
        ElementFilter::class(ElementClass::Wall),
        FindReferenceTarget::Face,
        &view,
    )
    .unwrap();
    assert_eq!(intersector.wall_count(), doc.walls.len());

    // Seeded so the ray set is stable between runs
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let origin = Point3::new(
            rng.gen_range(0.0..24.0),
            rng.gen_range(0.0..24.0),
            rng.gen_range(0.1..2.9),
        );
        let angle = rng.gen_range(0.0..std::f64::consts::TAU);
        let dir = Vector3::new(angle.cos(), angle.sin(), rng.gen_range(-0.1..0.1));

        let hits = intersector.find(origin, dir).unwrap();
        let (expected_walls, expected_nearest) = brute_force(&doc, origin, dir);

        let got: BTreeSet<i64> = hits.iter().map(|h| h.reference.element_id.value()).collect();
        assert_eq!(got, expected_walls);
        assert!(hits.windows(2).all(|w| w[0].proximity <= w[1].proximity));

        match (hits.first(), expected_nearest) {
            (Some(first), Some(t)) => assert_relative_eq!(first.proximity, t, epsilon = 1e-9),
            (None, None) => {}
            (a, b) => panic!("nearest mismatch: {:?} vs {:?}", a.map(|h| h.proximity), b),
        }
    }
}

#[test]
fn test_hit_points_lie_on_ray() {
    let doc = room_grid(3);
    let view = doc.views.iter().next().unwrap().clone();
    let intersector = ReferenceIntersector::new(
        &doc,
        ElementFilter::class(ElementClass::Wall),
        FindReferenceTarget::Element,
        &view,
    )
    .unwrap();

    let origin = Point3::new(1.3, 2.1, 1.0);
    let dir = Vector3::new(1.0, 0.37, 0.0);
    let unit = dir.normalize();
    for hit in intersector.find(origin, dir).unwrap() {
        assert_relative_eq!(hit.global_point, origin + unit * hit.proximity, epsilon = 1e-9);
        assert!(hit.reference.face_index.is_none());
    }
}
