//! The diff pipeline: decode, filter, mask, canonicalize, diff, classify.

use super::filter::KindFilter;
use super::mask::{mask_documents, MaskRules};
use super::unified::unified_diff;
use crate::value::{decode_documents, encode_documents};
use std::fmt;
use thiserror::Error;

/// Number of context lines around each hunk.
const CONTEXT_LINES: usize = 3;

/// The literal rendering of [`DiffResult::NoChanges`].
pub const NO_CHANGES_SENTINEL: &str = "# No Changes";

/// Which input of a comparison an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSide {
    Left,
    Right,
}

impl fmt::Display for DiffSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffSide::Left => write!(f, "left"),
            DiffSide::Right => write!(f, "right"),
        }
    }
}

/// DiffError represents a fatal failure while computing a diff.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("failed to decode {side} input: {source}")]
    Decode {
        side: DiffSide,
        source: serde_yaml::Error,
    },

    #[error("failed to serialize {side} input: {source}")]
    Serialize {
        side: DiffSide,
        source: serde_yaml::Error,
    },
}

/// Options controlling a diff operation.
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Mask sensitive fields on both sides before diffing.
    pub secure: bool,
    /// Only include resources of these Kinds (case-insensitive). Empty
    /// means no inclusion constraint.
    pub include_kinds: Vec<String>,
    /// Exclude resources of these Kinds (case-insensitive). Exclusion wins
    /// over inclusion.
    pub exclude_kinds: Vec<String>,
    /// The mask rule table used when `secure` is set.
    pub mask_rules: MaskRules,
}

impl Default for DiffOptions {
    fn default() -> Self {
        DiffOptions {
            secure: false,
            include_kinds: Vec::new(),
            exclude_kinds: Vec::new(),
            mask_rules: MaskRules::default(),
        }
    }
}

impl DiffOptions {
    fn kind_filter(&self) -> KindFilter {
        KindFilter::new(&self.include_kinds, &self.exclude_kinds)
    }
}

/// One classified line of diff output.
///
/// Each variant stores the raw line including its prefix; classification is
/// purely lexical so downstream styling cannot change it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    FileHeader(String),
    HunkHeader(String),
    Addition(String),
    Deletion(String),
    Context(String),
}

impl DiffLine {
    /// Classifies a raw diff line by its prefix.
    pub fn classify(line: String) -> DiffLine {
        if line.starts_with("+++") || line.starts_with("---") {
            DiffLine::FileHeader(line)
        } else if line.starts_with("@@") {
            DiffLine::HunkHeader(line)
        } else if line.starts_with('+') {
            DiffLine::Addition(line)
        } else if line.starts_with('-') {
            DiffLine::Deletion(line)
        } else {
            DiffLine::Context(line)
        }
    }

    /// The raw line text, prefix included.
    pub fn text(&self) -> &str {
        match self {
            DiffLine::FileHeader(s)
            | DiffLine::HunkHeader(s)
            | DiffLine::Addition(s)
            | DiffLine::Deletion(s)
            | DiffLine::Context(s) => s,
        }
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// The result of diffing two inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffResult {
    /// The inputs are identical after filtering and masking.
    NoChanges,
    /// The classified diff lines, in output order.
    Changes(Vec<DiffLine>),
}

impl DiffResult {
    pub fn is_no_changes(&self) -> bool {
        matches!(self, DiffResult::NoChanges)
    }

    /// The classified lines; empty for [`DiffResult::NoChanges`].
    pub fn lines(&self) -> &[DiffLine] {
        match self {
            DiffResult::NoChanges => &[],
            DiffResult::Changes(lines) => lines,
        }
    }
}

impl fmt::Display for DiffResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffResult::NoChanges => f.write_str(NO_CHANGES_SENTINEL),
            DiffResult::Changes(lines) => {
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    f.write_str(line.text())?;
                }
                Ok(())
            }
        }
    }
}

/// Compares two YAML manifest byte streams semantically.
///
/// Both sides are decoded, filtered and masked with the same options, then
/// re-encoded canonically and diffed line by line with a 3-line context
/// window. The output depends only on the inputs and the options.
pub fn diff(raw_a: &[u8], raw_b: &[u8], options: &DiffOptions) -> Result<DiffResult, DiffError> {
    let mut docs_a = decode_documents(raw_a).map_err(|source| DiffError::Decode {
        side: DiffSide::Left,
        source,
    })?;
    let mut docs_b = decode_documents(raw_b).map_err(|source| DiffError::Decode {
        side: DiffSide::Right,
        source,
    })?;

    let filter = options.kind_filter();
    if !filter.is_empty() {
        docs_a = filter.apply(docs_a);
        docs_b = filter.apply(docs_b);
    }

    if options.secure {
        mask_documents(&mut docs_a, &options.mask_rules);
        mask_documents(&mut docs_b, &options.mask_rules);
    }

    let text_a = encode_documents(&docs_a).map_err(|source| DiffError::Serialize {
        side: DiffSide::Left,
        source,
    })?;
    let text_b = encode_documents(&docs_b).map_err(|source| DiffError::Serialize {
        side: DiffSide::Right,
        source,
    })?;

    let lines = unified_diff(&text_a, &text_b, "Original", "Modified", CONTEXT_LINES);
    if lines.is_empty() {
        return Ok(DiffResult::NoChanges);
    }

    Ok(DiffResult::Changes(
        lines.into_iter().map(DiffLine::classify).collect(),
    ))
}
