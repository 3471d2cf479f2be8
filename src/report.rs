//! Plain-text report formatting for batch diff output.
//!
//! Color and stream handling belong to the consumer; this module only builds
//! the text pieces: a per-unit header, the rendered diff, and a trailing
//! separator.

use crate::cluster::ResourceIdentity;
use crate::differ::DiffResult;

/// The separator printed after each unit of a batch.
pub const SEPARATOR: &str = "# --------------------------------------------------";

/// Formats one unit of a batch: header, rendered diff, separator.
pub fn unit_report(title: &str, result: &DiffResult) -> String {
    format!("# Diff for {}:\n{}\n{}\n", title, result, SEPARATOR)
}

/// Builds the title for a reconciled resource within a named input.
pub fn resource_report_title(input: &str, identity: &ResourceIdentity) -> String {
    format!("{} (Cluster vs Local) [{}]", input, identity)
}
