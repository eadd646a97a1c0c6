// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Penetration resolution
//!
//! Maps deduplicated hits of one linear element to concrete openings:
//! insertion point, host wall, level and size.
//!
//! Host walls are looked up in the destination document; walls reached
//! through a link instance are looked up in the linked document, and their
//! level is matched by name against the destination levels (an opening can
//! only sit on a level of the document it is placed in).

use crate::dedupe::UniqueHit;
use crate::error::{Error, Result};
use crate::extraction::LinearElement;
use mep_holes_core::{
    convert_from_internal_units, Document, ElementId, LengthUnit, LinkedDocuments, Reference, Wall,
};
use nalgebra::Point3;
use serde::Serialize;

/// Opening side length per meter of duct/pipe diameter
pub const OPENING_SCALE: f64 = 3.5;

/// Side of the square opening for `diameter` (internal units), in meters
#[inline]
pub fn opening_size(diameter: f64) -> f64 {
    convert_from_internal_units(diameter, LengthUnit::Meters) * OPENING_SCALE
}

/// Where and how large one opening should be
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Penetration {
    pub source_element_id: ElementId,
    pub insertion_point: Point3<f64>,
    /// Element reference to the host wall
    pub wall: Reference,
    /// Level in the destination document
    pub level_id: ElementId,
    /// Meters
    pub width: f64,
    /// Meters
    pub height: f64,
}

/// Resolves hits against the destination document and its links
pub struct PenetrationResolver<'a, L: ?Sized> {
    destination: &'a Document,
    links: &'a L,
}

impl<'a, L> PenetrationResolver<'a, L>
where
    L: LinkedDocuments + ?Sized,
{
    pub fn new(destination: &'a Document, links: &'a L) -> Self {
        Self { destination, links }
    }

    /// Penetrations of `element` for every hit within its length
    pub fn resolve(&self, element: &LinearElement, hits: &[UniqueHit]) -> Result<Vec<Penetration>> {
        let size = opening_size(element.diameter);

        hits.iter()
            .filter(|hit| hit.proximity <= element.length)
            .map(|hit| {
                let wall = hit.reference.to_element_reference();
                let level_id = self.host_level(&wall)?;
                let penetration = Penetration {
                    source_element_id: element.element_id,
                    insertion_point: element.point_at(hit.proximity),
                    wall,
                    level_id,
                    width: size,
                    height: size,
                };
                tracing::debug!(
                    element = %element.element_id,
                    wall = %wall,
                    proximity = hit.proximity,
                    size,
                    "Resolved penetration"
                );
                Ok(penetration)
            })
            .collect()
    }

    /// Wall behind `reference`, from the destination or a linked document
    pub fn wall(&self, reference: &Reference) -> Result<&'a Wall> {
        self.wall_with_document(reference).map(|(wall, _)| wall)
    }

    fn wall_with_document(&self, reference: &Reference) -> Result<(&'a Wall, &'a Document)> {
        let not_found = || Error::WallNotFound(*reference);

        if !reference.is_linked() {
            let wall = self.destination.wall(reference.element_id).ok_or_else(not_found)?;
            return Ok((wall, self.destination));
        }

        let link = self.destination.link(reference.element_id).ok_or_else(not_found)?;
        let linked: &'a Document = self
            .links
            .linked_document(&link.linked_document_title)
            .ok_or_else(not_found)?;
        let wall = linked.wall(reference.linked_element_id).ok_or_else(not_found)?;
        Ok((wall, linked))
    }

    /// Destination-document level the opening for `reference` goes on
    fn host_level(&self, reference: &Reference) -> Result<ElementId> {
        let (wall, owner) = self.wall_with_document(reference)?;
        let level = wall
            .level_id
            .and_then(|id| owner.level(id))
            .ok_or(Error::LevelNotFound(*reference))?;

        if !reference.is_linked() {
            return Ok(level.id);
        }
        self.destination
            .levels
            .iter()
            .find(|l| l.name == level.name)
            .map(|l| l.id)
            .ok_or(Error::LevelNotFound(*reference))
    }
}
