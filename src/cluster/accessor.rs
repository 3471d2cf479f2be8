//! The cluster accessor seam.

use super::identity::ResourceIdentity;
use crate::value::Value;
use thiserror::Error;

/// Whether a resource collection is namespaced or cluster-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceScope {
    Cluster,
    Namespaced,
}

/// AccessorError represents a failed remote operation.
///
/// [`AccessorError::NotFound`] is a distinguished non-error outcome for the
/// reconciler: an absent resource becomes an empty baseline.
#[derive(Debug, Clone, Error)]
pub enum AccessorError {
    #[error("resource not found")]
    NotFound,

    #[error("no queryable collection for {api_version} {kind}")]
    UnknownResourceType { api_version: String, kind: String },

    #[error("{message}")]
    Request { message: String },
}

impl AccessorError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AccessorError::NotFound)
    }

    /// Creates a request error.
    pub fn request(message: impl Into<String>) -> Self {
        AccessorError::Request {
            message: message.into(),
        }
    }
}

/// ClusterAccessor is the remote capability the reconciler consumes.
///
/// Implementations wrap an API client; the library never implements the
/// transport itself. All calls are synchronous and block the reconciliation
/// sequence.
pub trait ClusterAccessor {
    /// Resolves the queryable collection for an (apiVersion, Kind) pair and
    /// reports its scope.
    fn scope(&self, api_version: &str, kind: &str) -> Result<ResourceScope, AccessorError>;

    /// Fetches the current remote state of a resource by identity.
    fn get(&self, identity: &ResourceIdentity) -> Result<Value, AccessorError>;

    /// Simulates a merge-apply of the JSON-encoded document without
    /// persisting it, returning the predicted resulting state.
    ///
    /// With `force` set, this writer wins any field-ownership conflicts.
    fn apply_dry_run(
        &self,
        identity: &ResourceIdentity,
        data: &[u8],
        force: bool,
    ) -> Result<Value, AccessorError>;
}
