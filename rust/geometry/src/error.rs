// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mep_holes_core::ElementId;
use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid ray: {0}")]
    InvalidRay(String),

    #[error("View {0} is a view template and cannot be used for ray casting")]
    TemplateView(ElementId),

    #[error("View {0} does not belong to document '{1}'")]
    ViewNotInDocument(ElementId, String),

    #[error("Model error: {0}")]
    CoreError(#[from] mep_holes_core::Error),
}
