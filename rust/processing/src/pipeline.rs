// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end opening placement.
//!
//! 1. Preconditions (source document, opening family, 3D view)
//! 2. Extract straight ducts and pipes from the source document
//! 3. Index the destination walls for ray casting
//! 4. Inside one transaction, for each element: cast along its axis,
//!    deduplicate per wall, resolve penetrations and place openings
//!
//! Any error after the transaction opens rolls back every opening of the run.

use crate::config::HoleConfig;
use crate::dedupe::dedupe;
use crate::error::Result;
use crate::extraction::extract_linear_elements;
use crate::host::{OpeningPlacer, TransactionGuard, TransactionHost};
use crate::preconditions;
use crate::resolver::PenetrationResolver;
use mep_holes_core::{Document, ElementId, LinkedDocuments, ParameterValue, Reference};
use mep_holes_geometry::{ElementClass, ElementFilter, ReferenceIntersector};
use nalgebra::Point3;
use serde::Serialize;
use std::time::Instant;

/// One opening created by a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedOpening {
    pub instance_id: ElementId,
    pub source_element_id: ElementId,
    pub host: Reference,
    pub level_id: ElementId,
    pub location: Point3<f64>,
    pub width: f64,
    pub height: f64,
}

/// Outcome of a committed run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub openings: Vec<PlacedOpening>,
    /// Candidates skipped because their location is not a straight line
    pub skipped_elements: Vec<ElementId>,
    /// Straight elements that were ray-cast
    pub elements_processed: usize,
    pub walls_indexed: usize,
    pub triangles_indexed: usize,
}

/// Find every duct/pipe crossing a destination wall and place an opening there.
///
/// `source` is the already-discovered source document (`None` when it is
/// not open). `destination` is read for walls, levels, symbols and views;
/// openings are created through `host`. `links` resolves linked documents
/// when `config.find_references_in_links` is set.
pub fn run<H, L>(
    config: &HoleConfig,
    source: Option<&Document>,
    destination: &Document,
    links: &L,
    host: &mut H,
) -> Result<RunReport>
where
    H: OpeningPlacer + TransactionHost + ?Sized,
    L: LinkedDocuments + ?Sized,
{
    let started = Instant::now();
    let pre = preconditions::check(source, destination, config)?;

    tracing::info!(
        source = %pre.source.title,
        destination = %destination.title,
        family = %pre.symbol.family_name,
        view = %pre.view.id,
        links = config.find_references_in_links,
        "Starting opening placement"
    );

    let extraction = extract_linear_elements(pre.source, &config.diameter_parameter)?;

    let intersector = ReferenceIntersector::builder(
        ElementFilter::class(ElementClass::Wall),
        config.target,
    )
    .find_references_in_links(config.find_references_in_links)
    .build(destination, pre.view, links)?;
    let resolver = PenetrationResolver::new(destination, links);

    let mut report = RunReport {
        skipped_elements: extraction.skipped,
        walls_indexed: intersector.wall_count(),
        triangles_indexed: intersector.triangle_count(),
        ..Default::default()
    };

    let mut tx = TransactionGuard::start(host, &config.transaction_name)?;

    for element in &extraction.elements {
        let hits = intersector.find(element.start, element.direction)?;
        let unique = dedupe(hits);
        let penetrations = resolver.resolve(element, &unique)?;

        tracing::debug!(
            element = %element.element_id,
            length = element.length,
            penetrations = penetrations.len(),
            "Processed element"
        );

        for p in penetrations {
            let instance =
                tx.new_family_instance(p.insertion_point, pre.symbol.id, p.wall, p.level_id)?;
            tx.set_parameter(instance, &config.width_parameter, ParameterValue::Double(p.width))?;
            tx.set_parameter(instance, &config.height_parameter, ParameterValue::Double(p.height))?;

            report.openings.push(PlacedOpening {
                instance_id: instance,
                source_element_id: p.source_element_id,
                host: p.wall,
                level_id: p.level_id,
                location: p.insertion_point,
                width: p.width,
                height: p.height,
            });
        }
        report.elements_processed += 1;
    }

    tx.commit()?;

    tracing::info!(
        elements = report.elements_processed,
        skipped = report.skipped_elements.len(),
        openings = report.openings.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Opening placement complete"
    );
    Ok(report)
}
