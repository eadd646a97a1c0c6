// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MEP-Holes Processing
//!
//! Finds where ducts and pipes of a mechanical model pass through walls of
//! an architectural model and places a square opening at each crossing,
//! sized from the duct/pipe diameter.
//!
//! ```no_run
//! use mep_holes_core::Project;
//! use mep_holes_processing::{run, HoleConfig, ModelSession};
//!
//! # fn demo(project: &Project) -> mep_holes_processing::Result<()> {
//! let source = project.find_by_title_substring("ОВ");
//! let destination = &project.documents[0];
//! let mut session = ModelSession::new(destination.clone());
//! let report = run(&HoleConfig::default(), source, destination, project, &mut session)?;
//! println!("{} openings", report.openings.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dedupe;
pub mod error;
pub mod extraction;
pub mod host;
pub mod pipeline;
pub mod preconditions;
pub mod resolver;
pub mod session;

pub use config::HoleConfig;
pub use dedupe::{dedupe, UniqueHit};
pub use error::{Error, ErrorKind, Result};
pub use extraction::{extract_linear_elements, Extraction, LinearElement};
pub use host::{OpeningPlacer, TransactionGuard, TransactionHost};
pub use pipeline::{run, PlacedOpening, RunReport};
pub use preconditions::Preconditions;
pub use resolver::{opening_size, Penetration, PenetrationResolver, OPENING_SCALE};
pub use session::ModelSession;
