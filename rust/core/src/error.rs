// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model operations.

use crate::ids::ElementId;
use thiserror::Error;

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or querying a model document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// An element with this id already exists in the document.
    #[error("duplicate element id {0} in document '{1}'")]
    DuplicateElementId(ElementId, String),

    /// The element id is the invalid sentinel.
    #[error("element id {0} is not a valid id")]
    InvalidElementId(ElementId),

    /// No open document carries this title.
    #[error("document '{0}' not found")]
    DocumentNotFound(String),

    /// Wall geometry cannot produce a solid.
    #[error("wall {id} has invalid geometry: {reason}")]
    InvalidWall { id: ElementId, reason: String },

    /// Unknown length unit name.
    #[error("unknown length unit '{0}'")]
    UnknownUnit(String),
}
