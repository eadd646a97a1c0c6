// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run configuration, with overrides from environment variables.

use mep_holes_geometry::FindReferenceTarget;

/// Settings of one opening-placement run.
#[derive(Debug, Clone, PartialEq)]
pub struct HoleConfig {
    /// Family whose symbol is placed at each penetration.
    pub family_name: String,
    /// Instance parameter receiving the opening width.
    pub width_parameter: String,
    /// Instance parameter receiving the opening height.
    pub height_parameter: String,
    /// Duct/pipe parameter holding the diameter.
    pub diameter_parameter: String,
    /// Name of the transaction wrapping the run.
    pub transaction_name: String,
    /// Also cast against walls of linked documents.
    pub find_references_in_links: bool,
    pub target: FindReferenceTarget,
}

impl Default for HoleConfig {
    fn default() -> Self {
        Self {
            family_name: "Отверстия".into(),
            width_parameter: "Ширина".into(),
            height_parameter: "Высота".into(),
            diameter_parameter: "Диаметр".into(),
            transaction_name: "create holes".into(),
            find_references_in_links: false,
            target: FindReferenceTarget::Element,
        }
    }
}

impl HoleConfig {
    /// Load configuration from `MEP_HOLES_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup, falling back to
    /// the defaults for absent or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            family_name: lookup("MEP_HOLES_FAMILY_NAME").unwrap_or(defaults.family_name),
            width_parameter: lookup("MEP_HOLES_WIDTH_PARAMETER").unwrap_or(defaults.width_parameter),
            height_parameter: lookup("MEP_HOLES_HEIGHT_PARAMETER")
                .unwrap_or(defaults.height_parameter),
            diameter_parameter: lookup("MEP_HOLES_DIAMETER_PARAMETER")
                .unwrap_or(defaults.diameter_parameter),
            transaction_name: lookup("MEP_HOLES_TRANSACTION_NAME")
                .unwrap_or(defaults.transaction_name),
            find_references_in_links: lookup("MEP_HOLES_SEARCH_LINKS")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.find_references_in_links),
            target: lookup("MEP_HOLES_TARGET")
                .and_then(|v| parse_target(&v))
                .unwrap_or(defaults.target),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse `element` or `face` (case-insensitive)
pub fn parse_target(value: &str) -> Option<FindReferenceTarget> {
    match value.trim().to_ascii_lowercase().as_str() {
        "element" => Some(FindReferenceTarget::Element),
        "face" => Some(FindReferenceTarget::Face),
        _ => None,
    }
}
