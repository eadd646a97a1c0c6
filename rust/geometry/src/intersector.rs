// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reference Intersector
//!
//! Casts rays through the wall solids of a document and reports every face
//! the ray crosses, tagged with its distance along the ray ("proximity") and
//! a [`Reference`] to the struck wall.
//!
//! Walls of linked documents can be included: they are placed with the link
//! instance transform and referenced as `(link instance id, linked wall id)`.
//! A ray crossing one wall usually reports it twice (entry and exit face);
//! collapsing those is left to the caller.

use crate::aabb::Aabb;
use crate::bvh::Bvh;
use crate::error::{Error, Result};
use crate::ray::{Ray, Triangle};
use crate::solid::{tessellate_wall, FaceTriangle};
use mep_holes_core::{Document, ElementId, LinkedDocuments, Reference, View3D, Wall};
use nalgebra::{Isometry3, Point3, Vector3};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Margin added around triangle boxes so edge-grazing rays reach the exact test
const BOX_PADDING: f64 = 1e-7;

/// Hits on the same face closer than this are one crossing (quad diagonal)
const COINCIDENT_PROXIMITY: f64 = 1e-9;

/// Element classes that can be indexed for ray casting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementClass {
    Wall,
}

/// Selects which elements the intersector considers
#[derive(Debug, Clone)]
pub struct ElementFilter {
    classes: SmallVec<[ElementClass; 2]>,
    excluded: FxHashSet<ElementId>,
}

impl ElementFilter {
    /// Filter passing every element of `class`
    pub fn class(class: ElementClass) -> Self {
        Self {
            classes: SmallVec::from_elem(class, 1),
            excluded: FxHashSet::default(),
        }
    }

    /// Reject the given host-document element ids
    pub fn excluding(mut self, ids: impl IntoIterator<Item = ElementId>) -> Self {
        self.excluded.extend(ids);
        self
    }

    /// Class check only; exclusions name host-document elements
    pub fn admits(&self, class: ElementClass) -> bool {
        self.classes.contains(&class)
    }

    pub fn passes(&self, class: ElementClass, id: ElementId) -> bool {
        self.admits(class) && !self.excluded.contains(&id)
    }
}

/// Granularity of the references a ray cast reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FindReferenceTarget {
    /// Element references (no face index)
    #[default]
    Element,
    /// Face references
    Face,
}

/// One ray/solid crossing
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceWithContext {
    /// Distance from the ray origin along the (unit) ray direction
    pub proximity: f64,
    pub reference: Reference,
    /// Crossing point in host coordinates
    pub global_point: Point3<f64>,
    /// Placement of the linked document (identity for host walls)
    pub instance_transform: Isometry3<f64>,
}

/// Indexed triangle and where it came from
#[derive(Debug, Clone)]
struct IndexedFace {
    triangle: Triangle,
    /// Face-level reference
    reference: Reference,
    /// Index into `link_transforms` for linked walls
    link_slot: Option<u32>,
}

/// Wall queued for tessellation
struct WallSource<'a> {
    wall: &'a Wall,
    reference: Reference,
    link_slot: Option<u32>,
    transform: Isometry3<f64>,
}

/// Configures and builds a [`ReferenceIntersector`]
#[derive(Debug, Clone)]
pub struct IntersectorBuilder {
    filter: ElementFilter,
    target: FindReferenceTarget,
    find_references_in_links: bool,
}

impl IntersectorBuilder {
    /// Also index walls of loaded linked documents
    pub fn find_references_in_links(mut self, enabled: bool) -> Self {
        self.find_references_in_links = enabled;
        self
    }

    /// Index the walls visible to `document` through `view`.
    ///
    /// `links` resolves linked documents by title; pass `&()` when there are
    /// none.
    pub fn build<L>(
        self,
        document: &Document,
        view: &View3D,
        links: &L,
    ) -> Result<ReferenceIntersector>
    where
        L: LinkedDocuments + ?Sized,
    {
        if view.is_template {
            return Err(Error::TemplateView(view.id));
        }
        if !document.views.contains(view.id) {
            return Err(Error::ViewNotInDocument(view.id, document.title.clone()));
        }

        let mut sources: Vec<WallSource<'_>> = document
            .walls
            .iter()
            .filter(|w| self.filter.passes(ElementClass::Wall, w.id))
            .map(|wall| WallSource {
                wall,
                reference: Reference::element(wall.id),
                link_slot: None,
                transform: Isometry3::identity(),
            })
            .collect();

        let mut link_transforms = Vec::new();
        if self.find_references_in_links {
            for link in &document.links {
                let Some(linked) = links.linked_document(&link.linked_document_title) else {
                    tracing::warn!(
                        link = %link.id,
                        title = %link.linked_document_title,
                        "Linked document is not open, its walls are not indexed"
                    );
                    continue;
                };

                let slot = link_transforms.len() as u32;
                link_transforms.push(link.transform);
                sources.extend(
                    linked
                        .walls
                        .iter()
                        .filter(|_| self.filter.admits(ElementClass::Wall))
                        .map(|wall| WallSource {
                            wall,
                            reference: Reference::linked(link.id, wall.id),
                            link_slot: Some(slot),
                            transform: link.transform,
                        }),
                );
            }
        }

        // Tessellation is pure, so walls are processed in parallel
        let tessellated: Vec<(usize, SmallVec<[FaceTriangle; 12]>)> = sources
            .par_iter()
            .enumerate()
            .map(|(i, src)| tessellate_wall(src.wall, &src.transform).map(|tris| (i, tris)))
            .collect::<Result<_>>()?;

        let mut faces = Vec::with_capacity(tessellated.len() * 12);
        for (i, triangles) in tessellated {
            let src = &sources[i];
            faces.extend(triangles.into_iter().map(|ft| IndexedFace {
                triangle: ft.triangle,
                reference: src.reference.with_face(ft.face.index()),
                link_slot: src.link_slot,
            }));
        }

        let bounds: Vec<Aabb> = faces
            .iter()
            .map(|f| Aabb::from_triangle(&f.triangle).padded(BOX_PADDING))
            .collect();
        let bvh = Bvh::build(&bounds);

        tracing::debug!(
            document = %document.title,
            walls = sources.len(),
            links = link_transforms.len(),
            triangles = faces.len(),
            nodes = bvh.node_count(),
            "Built wall intersection index"
        );

        Ok(ReferenceIntersector {
            target: self.target,
            wall_count: sources.len(),
            faces,
            link_transforms,
            bvh,
        })
    }
}

/// Ray caster over an indexed set of wall solids
#[derive(Debug, Clone)]
pub struct ReferenceIntersector {
    target: FindReferenceTarget,
    wall_count: usize,
    faces: Vec<IndexedFace>,
    link_transforms: Vec<Isometry3<f64>>,
    bvh: Bvh,
}

impl ReferenceIntersector {
    pub fn builder(filter: ElementFilter, target: FindReferenceTarget) -> IntersectorBuilder {
        IntersectorBuilder {
            filter,
            target,
            find_references_in_links: false,
        }
    }

    /// Intersector over the document's own walls (links ignored)
    pub fn new(
        document: &Document,
        filter: ElementFilter,
        target: FindReferenceTarget,
        view: &View3D,
    ) -> Result<Self> {
        Self::builder(filter, target).build(document, view, &())
    }

    /// Number of wall solids indexed (host and linked)
    pub fn wall_count(&self) -> usize {
        self.wall_count
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Every crossing along the ray, sorted by proximity
    pub fn find(
        &self,
        origin: Point3<f64>,
        direction: Vector3<f64>,
    ) -> Result<Vec<ReferenceWithContext>> {
        self.find_within(origin, direction, f64::INFINITY)
    }

    /// Crossings with `proximity <= max_proximity`, sorted by proximity.
    ///
    /// Pruning happens during traversal, so this is cheaper than filtering
    /// the output of [`ReferenceIntersector::find`].
    pub fn find_within(
        &self,
        origin: Point3<f64>,
        direction: Vector3<f64>,
        max_proximity: f64,
    ) -> Result<Vec<ReferenceWithContext>> {
        let ray = Ray::new(origin, direction)?;

        let mut raw: Vec<(f64, usize)> = Vec::new();
        self.bvh.traverse(&ray, max_proximity + BOX_PADDING, |prim| {
            if let Some(t) = self.faces[prim].triangle.intersect_ray(&ray) {
                if t <= max_proximity {
                    raw.push((t, prim));
                }
            }
        });
        raw.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut kept: Vec<(f64, usize)> = Vec::with_capacity(raw.len());
        for (t, prim) in raw {
            let reference = self.faces[prim].reference;
            let duplicate = kept
                .iter()
                .rev()
                .take_while(|(kt, _)| t - kt <= COINCIDENT_PROXIMITY)
                .any(|(_, kp)| self.faces[*kp].reference == reference);
            if !duplicate {
                kept.push((t, prim));
            }
        }

        Ok(kept
            .into_iter()
            .map(|(t, prim)| self.to_context(&ray, t, prim))
            .collect())
    }

    /// Closest crossing along the ray, if any
    pub fn find_nearest(
        &self,
        origin: Point3<f64>,
        direction: Vector3<f64>,
    ) -> Result<Option<ReferenceWithContext>> {
        Ok(self.find(origin, direction)?.into_iter().next())
    }

    fn to_context(&self, ray: &Ray, t: f64, prim: usize) -> ReferenceWithContext {
        let face = &self.faces[prim];
        let reference = match self.target {
            FindReferenceTarget::Face => face.reference,
            FindReferenceTarget::Element => face.reference.to_element_reference(),
        };
        let instance_transform = face
            .link_slot
            .map(|slot| self.link_transforms[slot as usize])
            .unwrap_or_else(Isometry3::identity);

        ReferenceWithContext {
            proximity: t,
            reference,
            global_point: ray.at(t),
            instance_transform,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mep_holes_core::LinkInstance;

    /// Wall running along +Y, centered on `x`, 0.2 thick, from z=0 to z=3
    fn wall(id: i64, x: f64) -> Wall {
        Wall {
            id: ElementId(id),
            name: format!("W{}", id),
            level_id: None,
            start: Point3::new(x, -5.0, 0.0),
            end: Point3::new(x, 5.0, 0.0),
            width: 0.2,
            height: 3.0,
        }
    }

    fn view(id: i64, is_template: bool) -> View3D {
        View3D {
            id: ElementId(id),
            name: "{3D}".into(),
            is_template,
        }
    }

    fn document(walls: &[Wall]) -> Document {
        let mut doc = Document::new("AR");
        for w in walls {
            doc.add_wall(w.clone()).unwrap();
        }
        doc.add_view(view(900, false)).unwrap();
        doc.add_view(view(901, true)).unwrap();
        doc
    }

    fn walls_filter() -> ElementFilter {
        ElementFilter::class(ElementClass::Wall)
    }

    #[test]
    fn test_template_view_rejected() {
        let doc = document(&[wall(1, 3.0)]);
        let err = ReferenceIntersector::new(
            &doc,
            walls_filter(),
            FindReferenceTarget::Element,
            &view(901, true),
        )
        .unwrap_err();
        assert!(matches!(err, Error::TemplateView(id) if id == ElementId(901)));
    }

    #[test]
    fn test_foreign_view_rejected() {
        let doc = document(&[wall(1, 3.0)]);
        let err = ReferenceIntersector::new(
            &doc,
            walls_filter(),
            FindReferenceTarget::Element,
            &view(5, false),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ViewNotInDocument(..)));
    }

    #[test]
    fn test_two_faces_per_wall_sorted() {
        let doc = document(&[wall(2, 7.0), wall(1, 3.0)]);
        let intersector = ReferenceIntersector::new(
            &doc,
            walls_filter(),
            FindReferenceTarget::Face,
            &view(900, false),
        )
        .unwrap();
        assert_eq!(intersector.wall_count(), 2);
        assert_eq!(intersector.triangle_count(), 24);

        let hits = intersector
            .find(Point3::new(0.0, 0.0, 1.0), Vector3::x())
            .unwrap();
        let summary: Vec<(i64, f64)> = hits
            .iter()
            .map(|h| (h.reference.element_id.value(), h.proximity))
            .collect();
        assert_eq!(summary.len(), 4);
        assert_eq!(summary[0].0, 1);
        assert_relative_eq!(summary[0].1, 2.9, epsilon = 1e-9);
        assert_relative_eq!(summary[1].1, 3.1, epsilon = 1e-9);
        assert_eq!(summary[2].0, 2);
        assert_relative_eq!(summary[3].1, 7.1, epsilon = 1e-9);
        assert!(hits.iter().all(|h| h.reference.face_index.is_some()));
        assert_relative_eq!(hits[0].global_point, Point3::new(2.9, 0.0, 1.0), epsilon = 1e-9);
    }

    #[test]
    fn test_element_target_strips_faces() {
        let doc = document(&[wall(1, 3.0)]);
        let intersector = ReferenceIntersector::new(
            &doc,
            walls_filter(),
            FindReferenceTarget::Element,
            &view(900, false),
        )
        .unwrap();
        let hits = intersector
            .find(Point3::new(0.0, 0.0, 1.0), Vector3::x())
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.reference == Reference::element(ElementId(1))));
    }

    #[test]
    fn test_diagonal_crossing_reported_once() {
        // Exterior face quad of wall(1, 3.0) spans y in [-5, 5], z in [0, 3];
        // its diagonal runs from (y=-5, z=0) to (y=5, z=3), through (0, 1.5)
        let doc = document(&[wall(1, 3.0)]);
        let intersector = ReferenceIntersector::new(
            &doc,
            walls_filter(),
            FindReferenceTarget::Face,
            &view(900, false),
        )
        .unwrap();
        let hits = intersector
            .find(Point3::new(0.0, 0.0, 1.5), Vector3::x())
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_ne!(hits[0].reference, hits[1].reference);
    }

    #[test]
    fn test_find_within_prunes() {
        let doc = document(&[wall(1, 3.0), wall(2, 7.0)]);
        let intersector = ReferenceIntersector::new(
            &doc,
            walls_filter(),
            FindReferenceTarget::Element,
            &view(900, false),
        )
        .unwrap();
        let hits = intersector
            .find_within(Point3::new(0.0, 0.0, 1.0), Vector3::x(), 5.0)
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.proximity <= 5.0));
    }

    #[test]
    fn test_miss_and_backwards() {
        let doc = document(&[wall(1, 3.0)]);
        let intersector = ReferenceIntersector::new(
            &doc,
            walls_filter(),
            FindReferenceTarget::Element,
            &view(900, false),
        )
        .unwrap();
        // Above the wall
        assert!(intersector
            .find(Point3::new(0.0, 0.0, 4.0), Vector3::x())
            .unwrap()
            .is_empty());
        // Pointing away
        assert!(intersector
            .find_nearest(Point3::new(0.0, 0.0, 1.0), -Vector3::x())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_excluded_wall_not_indexed() {
        let doc = document(&[wall(1, 3.0), wall(2, 7.0)]);
        let intersector = ReferenceIntersector::new(
            &doc,
            walls_filter().excluding([ElementId(1)]),
            FindReferenceTarget::Element,
            &view(900, false),
        )
        .unwrap();
        let nearest = intersector
            .find_nearest(Point3::new(0.0, 0.0, 1.0), Vector3::x())
            .unwrap()
            .unwrap();
        assert_eq!(nearest.reference.element_id, ElementId(2));
    }

    #[test]
    fn test_linked_walls() {
        let mut linked = Document::new("AR_link");
        linked.add_wall(wall(1, 0.0)).unwrap();

        let mut host = document(&[wall(1, 3.0)]);
        host.add_link(LinkInstance {
            id: ElementId(50),
            linked_document_title: "AR_link".into(),
            transform: Isometry3::translation(10.0, 0.0, 0.0),
        })
        .unwrap();
        host.add_link(LinkInstance {
            id: ElementId(51),
            linked_document_title: "not_open".into(),
            transform: Isometry3::identity(),
        })
        .unwrap();

        let project = mep_holes_core::Project::new(vec![linked]);
        let intersector = ReferenceIntersector::builder(walls_filter(), FindReferenceTarget::Element)
            .find_references_in_links(true)
            .build(&host, &view(900, false), &project)
            .unwrap();
        assert_eq!(intersector.wall_count(), 2);

        let hits = intersector
            .find(Point3::new(0.0, 0.0, 1.0), Vector3::x())
            .unwrap();
        assert_eq!(hits.len(), 4);
        let linked_hit = &hits[2];
        assert_eq!(linked_hit.reference, Reference::linked(ElementId(50), ElementId(1)));
        assert_relative_eq!(linked_hit.proximity, 9.9, epsilon = 1e-9);
        assert_relative_eq!(
            linked_hit.instance_transform.translation.vector,
            Vector3::new(10.0, 0.0, 0.0)
        );

        // Links are ignored unless requested
        let host_only = ReferenceIntersector::builder(walls_filter(), FindReferenceTarget::Element)
            .build(&host, &view(900, false), &project)
            .unwrap();
        assert_eq!(host_only.wall_count(), 1);
    }
}
