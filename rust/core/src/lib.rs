// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # MEP-Holes Core
//!
//! Building model types shared by the geometry and processing crates.
//!
//! ## Overview
//!
//! - **Identity**: [`ElementId`] and [`Reference`] (host or linked element,
//!   optionally down to a face), with [`ReferenceKey`] as the structural
//!   identity used for deduplication
//! - **Documents**: [`Document`] tables of walls, levels, ducts/pipes, family
//!   symbols, 3D views, link instances and placed family instances
//! - **Units**: internal units are decimal feet; [`convert_from_internal_units`]
//!   converts to physical units
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for documents and projects

pub mod document;
pub mod elements;
pub mod error;
pub mod ids;
pub mod parameters;
pub mod units;

// Re-export nalgebra types for convenience
pub use nalgebra::{Isometry3, Point3, Vector3};

pub use document::{Document, ElementTable, LinkedDocuments, Project};
pub use elements::{
    BuiltInCategory, Element, FamilyInstance, FamilySymbol, Level, LinkInstance, LocationCurve,
    MepCategory, MepCurve, View3D, Wall,
};
pub use error::{Error, Result};
pub use ids::{ElementId, Reference, ReferenceKey};
pub use parameters::{ParameterSet, ParameterValue};
pub use units::{
    convert_from_internal_units, convert_to_internal_units, LengthUnit, FEET_TO_METERS,
};
