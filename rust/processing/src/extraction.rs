// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry extraction
//!
//! Turns the ducts and pipes of the source document into straight
//! [`LinearElement`]s: an origin, a unit direction, a length and a diameter.

use crate::error::{Error, Result};
use mep_holes_core::{Document, ElementId, LocationCurve, MepCategory, MepCurve};
use nalgebra::{Point3, Vector3};

/// Straight duct or pipe segment, ready to be ray-cast
#[derive(Debug, Clone, PartialEq)]
pub struct LinearElement {
    pub element_id: ElementId,
    pub category: MepCategory,
    /// Endpoint 0 of the location line
    pub start: Point3<f64>,
    /// Unit vector from start to end
    pub direction: Vector3<f64>,
    /// Distance from start to end, internal units
    pub length: f64,
    /// Diameter, internal units
    pub diameter: f64,
}

impl LinearElement {
    /// Point at `distance` along the segment axis
    #[inline]
    pub fn point_at(&self, distance: f64) -> Point3<f64> {
        self.start + self.direction * distance
    }
}

/// Result of extracting linear elements from a document
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub elements: Vec<LinearElement>,
    /// Candidates not placed on a straight line
    pub skipped: Vec<ElementId>,
}

/// Duct and pipe instances in processing order: pipes first, then ducts
pub fn collect_candidates(document: &Document) -> Vec<&MepCurve> {
    let of = |category: MepCategory| {
        document
            .mep_curves
            .iter()
            .filter(move |c| c.category == category && !c.is_element_type)
    };
    of(MepCategory::Pipe).chain(of(MepCategory::Duct)).collect()
}

/// Extract every straight candidate of `document`.
///
/// Candidates on arcs are skipped with a warning. A missing or non-numeric
/// diameter parameter, and a zero-length line, abort the extraction.
pub fn extract_linear_elements(document: &Document, diameter_parameter: &str) -> Result<Extraction> {
    let mut extraction = Extraction::default();

    for curve in collect_candidates(document) {
        match to_linear_element(curve, diameter_parameter)? {
            Some(element) => extraction.elements.push(element),
            None => {
                tracing::warn!(
                    element = %curve.id,
                    curve = curve.location.kind(),
                    "Skipping element whose location is not a straight line"
                );
                extraction.skipped.push(curve.id);
            }
        }
    }

    tracing::debug!(
        document = %document.title,
        elements = extraction.elements.len(),
        skipped = extraction.skipped.len(),
        "Extracted linear elements"
    );
    Ok(extraction)
}

/// Convert one candidate; `Ok(None)` when its location is not a line
pub fn to_linear_element(curve: &MepCurve, diameter_parameter: &str) -> Result<Option<LinearElement>> {
    let (start, end) = match curve.location {
        LocationCurve::Line { start, end } => (start, end),
        LocationCurve::Arc { .. } => return Ok(None),
    };

    let run = end - start;
    let length = run.norm();
    if length <= f64::EPSILON || !length.is_finite() {
        return Err(Error::DegenerateCurve(curve.id));
    }

    let diameter = read_diameter(curve, diameter_parameter)?;

    Ok(Some(LinearElement {
        element_id: curve.id,
        category: curve.category,
        start,
        direction: run / length,
        length,
        diameter,
    }))
}

fn read_diameter(curve: &MepCurve, name: &str) -> Result<f64> {
    let value = curve
        .parameters
        .lookup(name)
        .ok_or_else(|| Error::MissingParameter {
            element: curve.id,
            name: name.to_string(),
        })?;
    let diameter = value.as_double().ok_or_else(|| Error::ParameterType {
        element: curve.id,
        name: name.to_string(),
        found: value.storage_type(),
    })?;
    if diameter <= 0.0 || !diameter.is_finite() {
        return Err(Error::InvalidDiameter {
            element: curve.id,
            value: diameter,
        });
    }
    Ok(diameter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mep_holes_core::{ParameterSet, ParameterValue};

    const DIAMETER: &str = "Диаметр";

    fn curve(id: i64, category: MepCategory, location: LocationCurve) -> MepCurve {
        MepCurve {
            id: ElementId(id),
            category,
            is_element_type: false,
            location,
            parameters: ParameterSet::new().with(DIAMETER, ParameterValue::Double(0.5)),
        }
    }

    fn line(x0: f64, x1: f64) -> LocationCurve {
        LocationCurve::line(Point3::new(x0, 0.0, 1.0), Point3::new(x1, 0.0, 1.0))
    }

    fn arc() -> LocationCurve {
        LocationCurve::Arc {
            center: Point3::origin(),
            radius: 2.0,
            start_angle: 0.0,
            end_angle: 1.0,
            x_axis: Vector3::x(),
            y_axis: Vector3::y(),
        }
    }

    #[test]
    fn test_pipes_before_ducts_and_types_excluded() {
        let mut doc = Document::new("OV");
        doc.add_mep_curve(curve(1, MepCategory::Duct, line(0.0, 1.0))).unwrap();
        doc.add_mep_curve(curve(2, MepCategory::Pipe, line(0.0, 1.0))).unwrap();
        let mut pipe_type = curve(3, MepCategory::Pipe, line(0.0, 1.0));
        pipe_type.is_element_type = true;
        doc.add_mep_curve(pipe_type).unwrap();
        doc.add_mep_curve(curve(4, MepCategory::Pipe, line(0.0, 1.0))).unwrap();

        let ids: Vec<i64> = collect_candidates(&doc).iter().map(|c| c.id.value()).collect();
        assert_eq!(ids, vec![2, 4, 1]);
    }

    #[test]
    fn test_line_to_linear_element() {
        let element = to_linear_element(&curve(7, MepCategory::Duct, line(2.0, -8.0)), DIAMETER)
            .unwrap()
            .unwrap();
        assert_eq!(element.start, Point3::new(2.0, 0.0, 1.0));
        assert_relative_eq!(element.direction, -Vector3::x());
        assert_relative_eq!(element.length, 10.0);
        assert_relative_eq!(element.diameter, 0.5);
        assert_relative_eq!(element.point_at(4.0), Point3::new(-2.0, 0.0, 1.0));
    }

    #[test]
    fn test_arc_skipped() {
        let mut doc = Document::new("OV");
        doc.add_mep_curve(curve(1, MepCategory::Pipe, arc())).unwrap();
        doc.add_mep_curve(curve(2, MepCategory::Pipe, line(0.0, 3.0))).unwrap();

        let extraction = extract_linear_elements(&doc, DIAMETER).unwrap();
        assert_eq!(extraction.skipped, vec![ElementId(1)]);
        assert_eq!(extraction.elements.len(), 1);
        assert_eq!(extraction.elements[0].element_id, ElementId(2));
    }

    #[test]
    fn test_zero_length_is_degenerate() {
        let err = to_linear_element(&curve(5, MepCategory::Pipe, line(1.0, 1.0)), DIAMETER).unwrap_err();
        assert!(matches!(err, Error::DegenerateCurve(id) if id == ElementId(5)));
    }

    #[test]
    fn test_missing_and_mistyped_diameter() {
        let mut c = curve(5, MepCategory::Pipe, line(0.0, 1.0));
        c.parameters = ParameterSet::new();
        assert!(matches!(
            to_linear_element(&c, DIAMETER),
            Err(Error::MissingParameter { .. })
        ));

        c.parameters = ParameterSet::new().with(DIAMETER, ParameterValue::String("DN100".into()));
        assert!(matches!(
            to_linear_element(&c, DIAMETER),
            Err(Error::ParameterType { found: "String", .. })
        ));

        c.parameters = ParameterSet::new().with(DIAMETER, ParameterValue::Double(0.0));
        assert!(matches!(
            to_linear_element(&c, DIAMETER),
            Err(Error::InvalidDiameter { .. })
        ));
    }

    #[test]
    fn test_integer_diameter_accepted() {
        let mut c = curve(5, MepCategory::Pipe, line(0.0, 1.0));
        c.parameters = ParameterSet::new().with(DIAMETER, ParameterValue::Integer(1));
        let element = to_linear_element(&c, DIAMETER).unwrap().unwrap();
        assert_relative_eq!(element.diameter, 1.0);
    }
}
