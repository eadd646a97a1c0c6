// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line arguments.

use clap::{Parser, ValueEnum};
use mep_holes_geometry::FindReferenceTarget;
use mep_holes_processing::HoleConfig;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Plain,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    Element,
    Face,
}

impl From<Target> for FindReferenceTarget {
    fn from(target: Target) -> Self {
        match target {
            Target::Element => FindReferenceTarget::Element,
            Target::Face => FindReferenceTarget::Face,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "mep-holes")]
#[command(about = "Place wall openings where ducts and pipes pass through walls")]
pub struct Args {
    /// Project JSON file holding every open document
    pub project: PathBuf,

    /// Substring identifying the source (MEP) document title
    #[arg(long, default_value = "ОВ")]
    pub source_title: String,

    /// Exact title of the destination document (default: first document)
    #[arg(long)]
    pub destination: Option<String>,

    /// Write the run report here instead of stdout
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Write the updated destination document here
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Opening family name (overrides MEP_HOLES_FAMILY_NAME)
    #[arg(long)]
    pub family_name: Option<String>,

    /// Also cast against walls of linked documents
    #[arg(long)]
    pub search_links: bool,

    /// Reference granularity reported by the intersector
    #[arg(long, value_enum)]
    pub target: Option<Target>,

    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,
}

impl Args {
    /// Environment configuration with command-line flags applied on top
    pub fn hole_config(&self, mut config: HoleConfig) -> HoleConfig {
        if let Some(name) = &self.family_name {
            config.family_name = name.clone();
        }
        if self.search_links {
            config.find_references_in_links = true;
        }
        if let Some(target) = self.target {
            config.target = target.into();
        }
        config
    }
}
