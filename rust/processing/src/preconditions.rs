// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Checks that must pass before a run opens its transaction.

use crate::config::HoleConfig;
use crate::error::{Error, Result};
use mep_holes_core::{BuiltInCategory, Document, FamilySymbol, View3D};

/// Everything a run needs, resolved up front
#[derive(Debug, Clone, Copy)]
pub struct Preconditions<'a> {
    pub source: &'a Document,
    pub symbol: &'a FamilySymbol,
    pub view: &'a View3D,
}

/// Check, in order: source document, opening family, 3D view
pub fn check<'a>(
    source: Option<&'a Document>,
    destination: &'a Document,
    config: &HoleConfig,
) -> Result<Preconditions<'a>> {
    let source = source.ok_or(Error::SourceDocumentNotFound)?;
    let symbol = find_opening_symbol(destination, &config.family_name)?;
    let view = find_view3d(destination)?;
    Ok(Preconditions {
        source,
        symbol,
        view,
    })
}

/// First generic-model symbol of the family named exactly `family_name`
pub fn find_opening_symbol<'a>(document: &'a Document, family_name: &str) -> Result<&'a FamilySymbol> {
    document
        .family_symbols
        .iter()
        .find(|s| s.category == BuiltInCategory::GenericModel && s.family_name == family_name)
        .ok_or_else(|| Error::FamilyNotFound(family_name.to_string()))
}

/// First 3D view that is not a template
pub fn find_view3d(document: &Document) -> Result<&View3D> {
    document
        .views
        .iter()
        .find(|v| !v.is_template)
        .ok_or_else(|| Error::View3DNotFound(document.title.clone()))
}
