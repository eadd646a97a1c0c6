// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element kinds stored in a model document.

use crate::error::{Error, Result};
use crate::ids::{ElementId, Reference};
use crate::parameters::ParameterSet;
use nalgebra::{Isometry3, Point3, Vector3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Anything stored in a document under a unique id.
pub trait Element {
    fn id(&self) -> ElementId;
}

macro_rules! impl_element {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Element for $ty {
                #[inline]
                fn id(&self) -> ElementId {
                    self.id
                }
            }
        )*
    };
}

/// Category of a family symbol. Openings must be generic models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BuiltInCategory {
    GenericModel,
    Other,
}

/// Building storey.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Level {
    pub id: ElementId,
    pub name: String,
    /// Elevation in internal units.
    pub elevation: f64,
}

/// Straight wall.
///
/// The solid is the box swept along the location line (`start` to `end`,
/// taken at the base elevation of `start`), centered on the line with
/// thickness `width` and extruded upward by `height`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wall {
    pub id: ElementId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Base level; `None` when the wall is unconstrained.
    #[cfg_attr(feature = "serde", serde(default))]
    pub level_id: Option<ElementId>,
    pub start: Point3<f64>,
    pub end: Point3<f64>,
    pub width: f64,
    pub height: f64,
}

impl Wall {
    /// Check that the wall can produce a non-degenerate solid
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidWall {
            id: self.id,
            reason: reason.to_string(),
        };

        if !(self.width > 0.0) {
            return Err(invalid("width must be positive"));
        }
        if !(self.height > 0.0) {
            return Err(invalid("height must be positive"));
        }
        let run = Vector3::new(self.end.x - self.start.x, self.end.y - self.start.y, 0.0);
        if run.norm() <= f64::EPSILON {
            return Err(invalid("location line has no horizontal extent"));
        }
        Ok(())
    }

    /// Horizontal length of the location line
    pub fn length(&self) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Placement curve of a linear MEP element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(tag = "type"))]
pub enum LocationCurve {
    Line {
        start: Point3<f64>,
        end: Point3<f64>,
    },
    /// Circular arc in the plane spanned by `x_axis` and `y_axis`.
    Arc {
        center: Point3<f64>,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        x_axis: Vector3<f64>,
        y_axis: Vector3<f64>,
    },
}

impl LocationCurve {
    pub fn line(start: Point3<f64>, end: Point3<f64>) -> Self {
        LocationCurve::Line { start, end }
    }

    #[inline]
    pub fn is_line(&self) -> bool {
        matches!(self, LocationCurve::Line { .. })
    }

    /// Endpoint 0 (start) or 1 (end)
    pub fn end_point(&self, index: usize) -> Point3<f64> {
        match self {
            LocationCurve::Line { start, end } => {
                if index == 0 {
                    *start
                } else {
                    *end
                }
            }
            LocationCurve::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                x_axis,
                y_axis,
            } => {
                let angle = if index == 0 { *start_angle } else { *end_angle };
                center + (x_axis * angle.cos() + y_axis * angle.sin()) * *radius
            }
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            LocationCurve::Line { start, end } => (end - start).norm(),
            LocationCurve::Arc {
                radius,
                start_angle,
                end_angle,
                ..
            } => radius * (end_angle - start_angle).abs(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LocationCurve::Line { .. } => "Line",
            LocationCurve::Arc { .. } => "Arc",
        }
    }
}

/// Category of a linear MEP element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MepCategory {
    Duct,
    Pipe,
}

/// Duct or pipe (instance or type).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MepCurve {
    pub id: ElementId,
    pub category: MepCategory,
    /// Type elements carry no placement and are never processed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_element_type: bool,
    pub location: LocationCurve,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: ParameterSet,
}

/// Loadable family type used as an instantiation template.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FamilySymbol {
    pub id: ElementId,
    pub family_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub category: BuiltInCategory,
    /// Instance parameters defined by the family.
    #[cfg_attr(feature = "serde", serde(default))]
    pub instance_parameters: Vec<String>,
}

impl FamilySymbol {
    pub fn defines_parameter(&self, name: &str) -> bool {
        self.instance_parameters.iter().any(|p| p == name)
    }
}

/// 3D view; ray casting needs a non-template one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct View3D {
    pub id: ElementId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_template: bool,
}

/// Placement of another document inside this one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkInstance {
    pub id: ElementId,
    pub linked_document_title: String,
    /// Maps linked-document coordinates into host coordinates.
    #[cfg_attr(feature = "serde", serde(default = "Isometry3::identity"))]
    pub transform: Isometry3<f64>,
}

/// Placed instance of a family symbol.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FamilyInstance {
    pub id: ElementId,
    pub symbol_id: ElementId,
    pub host: Reference,
    pub level_id: ElementId,
    pub location: Point3<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: ParameterSet,
}

impl_element!(Level, Wall, MepCurve, FamilySymbol, View3D, LinkInstance, FamilyInstance);
