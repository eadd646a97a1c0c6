// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mep_holes_core::{ElementId, Reference};
use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad class of a pipeline failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The run could not start; nothing was touched
    Precondition,
    /// Reading or intersecting model geometry failed
    Geometry,
    /// Creating or configuring an opening failed
    Placement,
}

/// Errors that can occur while finding and placing openings
#[derive(Error, Debug)]
pub enum Error {
    #[error("Source document is not open")]
    SourceDocumentNotFound,

    #[error("Family '{0}' not found")]
    FamilyNotFound(String),

    #[error("No non-template 3D view in document '{0}'")]
    View3DNotFound(String),

    #[error("Element {element} has no parameter '{name}'")]
    MissingParameter { element: ElementId, name: String },

    #[error("Parameter '{name}' of element {element} is stored as {found}, expected a number")]
    ParameterType {
        element: ElementId,
        name: String,
        found: &'static str,
    },

    #[error("Element {element} has a non-positive diameter {value}")]
    InvalidDiameter { element: ElementId, value: f64 },

    #[error("Element {0} has a zero-length location line")]
    DegenerateCurve(ElementId),

    #[error("No wall found for reference {0}")]
    WallNotFound(Reference),

    #[error("No level found for wall {0}")]
    LevelNotFound(Reference),

    #[error("Family symbol {0} does not exist")]
    SymbolNotFound(ElementId),

    #[error("Reference {0} is not a valid opening host")]
    InvalidHost(Reference),

    #[error("Level {0} does not exist")]
    UnknownLevel(ElementId),

    #[error("Instance {0} was not created in this transaction")]
    InstanceNotFound(ElementId),

    #[error("Parameter '{name}' is not defined for instance {instance}")]
    UndefinedParameter { instance: ElementId, name: String },

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error(transparent)]
    Geometry(#[from] mep_holes_geometry::Error),

    #[error(transparent)]
    Core(#[from] mep_holes_core::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SourceDocumentNotFound | Error::FamilyNotFound(_) | Error::View3DNotFound(_) => {
                ErrorKind::Precondition
            }
            Error::MissingParameter { .. }
            | Error::ParameterType { .. }
            | Error::InvalidDiameter { .. }
            | Error::DegenerateCurve(_)
            | Error::WallNotFound(_)
            | Error::LevelNotFound(_)
            | Error::Geometry(_) => ErrorKind::Geometry,
            Error::SymbolNotFound(_)
            | Error::InvalidHost(_)
            | Error::UnknownLevel(_)
            | Error::InstanceNotFound(_)
            | Error::UndefinedParameter { .. }
            | Error::Transaction(_)
            | Error::Core(_) => ErrorKind::Placement,
        }
    }

    /// Message shown to the user when a run is cancelled
    pub fn user_message(&self) -> String {
        match self {
            Error::SourceDocumentNotFound => "Файл не найден".to_string(),
            Error::FamilyNotFound(name) => format!("Семейство \"{}\" не найдено", name),
            Error::View3DNotFound(_) => "3D вид не найден".to_string(),
            other => other.to_string(),
        }
    }
}
