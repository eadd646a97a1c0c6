// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MEP-Holes command-line runner.
//!
//! Loads a project (every open document as JSON), finds the source document
//! by title substring, places openings in the destination document and
//! writes the run report and, optionally, the updated destination document.

use anyhow::Result;
use clap::Parser;
use mep_holes_processing::HoleConfig;

mod app;
mod args;
mod logging;

use args::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_format);

    let config = args.hole_config(HoleConfig::from_env());
    tracing::debug!(?config, "Configuration loaded");

    let project = app::load_project(&args.project)?;
    tracing::info!(
        path = %args.project.display(),
        documents = project.documents.len(),
        "Project loaded"
    );

    let outcome = app::execute(&args, &project, &config)?;
    app::write_outputs(&args, &outcome)?;

    tracing::info!(
        openings = outcome.report.openings.len(),
        skipped = outcome.report.skipped_elements.len(),
        "Done"
    );
    Ok(())
}
