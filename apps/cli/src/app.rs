// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loading the project, running the pipeline and writing the results.

use crate::args::Args;
use anyhow::{anyhow, bail, Context, Result};
use mep_holes_core::{Document, Project};
use mep_holes_processing::{run, ErrorKind, HoleConfig, ModelSession, RunReport};
use std::fs;
use std::path::Path;

/// Result of a successful run
pub struct Outcome {
    pub report: RunReport,
    pub destination: Document,
}

pub fn load_project(path: &Path) -> Result<Project> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read project file {}", path.display()))?;
    let project: Project = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse project file {}", path.display()))?;
    for document in &project.documents {
        document
            .validate()
            .with_context(|| format!("Invalid document '{}'", document.title))?;
    }
    Ok(project)
}

fn destination_index(project: &Project, title: Option<&str>) -> Result<usize> {
    if project.documents.is_empty() {
        bail!("Project contains no documents");
    }
    match title {
        Some(title) => project
            .position_by_title(title)
            .ok_or_else(|| anyhow!("Destination document '{}' not found", title)),
        None => Ok(0),
    }
}

/// Run the whole command against `project`
pub fn execute(args: &Args, project: &Project, config: &HoleConfig) -> Result<Outcome> {
    let index = destination_index(project, args.destination.as_deref())?;
    let destination = &project.documents[index];
    let source = project.find_by_title_substring(&args.source_title);

    tracing::info!(
        destination = %destination.title,
        source = source.map(|d| d.title.as_str()).unwrap_or("<none>"),
        "Documents selected"
    );

    let mut session = ModelSession::new(destination.clone());
    let report = run(config, source, destination, project, &mut session).map_err(|e| {
        if e.kind() == ErrorKind::Precondition {
            anyhow!(e.user_message())
        } else {
            anyhow::Error::new(e).context("Opening placement failed, no changes were made")
        }
    })?;

    Ok(Outcome {
        report,
        destination: session.into_document(),
    })
}

pub fn write_outputs(args: &Args, outcome: &Outcome) -> Result<()> {
    let report = serde_json::to_string_pretty(&outcome.report)?;
    match &args.report {
        Some(path) => fs::write(path, report)
            .with_context(|| format!("Failed to write report {}", path.display()))?,
        None => println!("{}", report),
    }

    if let Some(path) = &args.output {
        let document = serde_json::to_string_pretty(&outcome.destination)?;
        fs::write(path, document)
            .with_context(|| format!("Failed to write document {}", path.display()))?;
        tracing::info!(path = %path.display(), "Updated destination document written");
    }
    Ok(())
}
