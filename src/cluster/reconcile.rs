//! Reconciliation of local manifests against live cluster state.

use super::accessor::{AccessorError, ClusterAccessor, ResourceScope};
use super::identity::{IdentityError, ResourceIdentity};
use crate::differ::{diff, DiffError, DiffOptions, DiffResult, DiffSide};
use crate::value::{decode_documents, encode_documents, Value};
use thiserror::Error;

/// Metadata fields every simulated apply mutates; kept out of diffs.
const VOLATILE_METADATA_FIELDS: &[&str] = &["managedFields"];

/// The stages a resource passes through during reconciliation.
///
/// Each resource runs Parse → Fetch → DryRunApply → Normalize → Diff in
/// strict sequence. Normalize is pure field removal and cannot fail; every
/// other stage can terminate the resource with a [`ReconcileError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStage {
    Parse,
    Fetch,
    DryRunApply,
    Normalize,
    Diff,
}

/// ReconcileError is the terminal failure state of one resource's pipeline.
///
/// Every variant after parsing carries the identity of the resource that
/// failed.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("failed to decode local input: {source}")]
    Parse { source: serde_yaml::Error },

    #[error("invalid resource identity: {source}")]
    Identity { source: IdentityError },

    #[error("failed to resolve {identity}: {source}")]
    Resolve {
        identity: ResourceIdentity,
        source: AccessorError,
    },

    #[error("failed to fetch {identity}: {source}")]
    Fetch {
        identity: ResourceIdentity,
        source: AccessorError,
    },

    #[error("failed to encode {identity} for apply: {source}")]
    Encode {
        identity: ResourceIdentity,
        source: serde_json::Error,
    },

    #[error("dry-run apply of {identity} failed: {source}")]
    DryRunApply {
        identity: ResourceIdentity,
        source: AccessorError,
    },

    #[error("failed to diff {identity}: {source}")]
    Diff {
        identity: ResourceIdentity,
        source: DiffError,
    },
}

impl ReconcileError {
    /// The pipeline stage that failed.
    pub fn stage(&self) -> ReconcileStage {
        match self {
            ReconcileError::Parse { .. }
            | ReconcileError::Identity { .. }
            | ReconcileError::Resolve { .. } => ReconcileStage::Parse,
            ReconcileError::Fetch { .. } => ReconcileStage::Fetch,
            ReconcileError::Encode { .. } | ReconcileError::DryRunApply { .. } => {
                ReconcileStage::DryRunApply
            }
            ReconcileError::Diff { .. } => ReconcileStage::Diff,
        }
    }

    /// The identity of the failed resource, if one was parsed.
    pub fn identity(&self) -> Option<&ResourceIdentity> {
        match self {
            ReconcileError::Parse { .. } | ReconcileError::Identity { .. } => None,
            ReconcileError::Resolve { identity, .. }
            | ReconcileError::Fetch { identity, .. }
            | ReconcileError::Encode { identity, .. }
            | ReconcileError::DryRunApply { identity, .. }
            | ReconcileError::Diff { identity, .. } => Some(identity),
        }
    }
}

/// The outcome of reconciling one resource.
#[derive(Debug)]
pub struct ResourceDiff {
    pub identity: ResourceIdentity,
    /// False when the resource was absent remotely (pending creation).
    pub live_existed: bool,
    pub result: DiffResult,
}

/// Reconciler diffs local manifests against the predicted result of
/// applying them to a cluster.
///
/// For each local document it fetches the live state (absence is an empty
/// baseline, not an error), asks the accessor to simulate a forced
/// merge-apply, strips volatile bookkeeping metadata from both sides, and
/// diffs live against predicted with the caller's options.
pub struct Reconciler<'a> {
    accessor: &'a dyn ClusterAccessor,
    default_namespace: String,
}

impl<'a> Reconciler<'a> {
    pub fn new(accessor: &'a dyn ClusterAccessor, default_namespace: impl Into<String>) -> Self {
        Reconciler {
            accessor,
            default_namespace: default_namespace.into(),
        }
    }

    /// Reconciles every document in one local input, in document order.
    ///
    /// Fail-fast: the first fatal failure stops the remaining resources of
    /// this input. Other inputs of a batch are unaffected; each call is
    /// independent.
    pub fn reconcile(
        &self,
        local: &[u8],
        options: &DiffOptions,
    ) -> Result<Vec<ResourceDiff>, ReconcileError> {
        let docs =
            decode_documents(local).map_err(|source| ReconcileError::Parse { source })?;

        let mut results = Vec::with_capacity(docs.len());
        for doc in docs {
            results.push(self.reconcile_document(doc, options)?);
        }
        Ok(results)
    }

    fn reconcile_document(
        &self,
        doc: Value,
        options: &DiffOptions,
    ) -> Result<ResourceDiff, ReconcileError> {
        // Parsed: derive the identity and settle its namespace.
        let mut identity = ResourceIdentity::from_document(&doc)
            .map_err(|source| ReconcileError::Identity { source })?;

        let scope = self
            .accessor
            .scope(&identity.api_version, &identity.kind)
            .map_err(|source| ReconcileError::Resolve {
                identity: identity.clone(),
                source,
            })?;
        match scope {
            ResourceScope::Cluster => identity.namespace = None,
            ResourceScope::Namespaced => {
                if identity.namespace.is_none() {
                    identity.namespace = Some(self.default_namespace.clone());
                }
            }
        }

        // LiveFetched | NotFound: an absent resource is a pending creation.
        let live = match self.accessor.get(&identity) {
            Ok(live) => Some(live),
            Err(source) if source.is_not_found() => None,
            Err(source) => {
                return Err(ReconcileError::Fetch { identity, source });
            }
        };
        let live_existed = live.is_some();

        // DryRunApplied: the server, not local logic, computes the merge.
        let payload =
            serde_json::to_vec(&doc).map_err(|source| ReconcileError::Encode {
                identity: identity.clone(),
                source,
            })?;
        let mut predicted = self
            .accessor
            .apply_dry_run(&identity, &payload, true)
            .map_err(|source| ReconcileError::DryRunApply {
                identity: identity.clone(),
                source,
            })?;

        // Normalized: the apply always rewrites ownership bookkeeping, so
        // it would show up as noise on every comparison.
        let live = live.map(|mut state| {
            strip_volatile_fields(&mut state);
            state
        });
        strip_volatile_fields(&mut predicted);

        // Diffed: live (empty when NotFound) against predicted.
        let live_text = match &live {
            Some(state) => encode_side(state, DiffSide::Left, &identity)?,
            None => String::new(),
        };
        let predicted_text = encode_side(&predicted, DiffSide::Right, &identity)?;

        let result = diff(live_text.as_bytes(), predicted_text.as_bytes(), options)
            .map_err(|source| ReconcileError::Diff {
                identity: identity.clone(),
                source,
            })?;

        Ok(ResourceDiff {
            identity,
            live_existed,
            result,
        })
    }
}

fn encode_side(
    state: &Value,
    side: DiffSide,
    identity: &ResourceIdentity,
) -> Result<String, ReconcileError> {
    encode_documents(std::slice::from_ref(state)).map_err(|source| ReconcileError::Diff {
        identity: identity.clone(),
        source: DiffError::Serialize { side, source },
    })
}

/// Removes the volatile bookkeeping fields from a document's metadata.
fn strip_volatile_fields(doc: &mut Value) {
    let metadata = doc
        .as_mapping_mut()
        .and_then(|m| m.get_mut("metadata"))
        .and_then(Value::as_mapping_mut);
    if let Some(metadata) = metadata {
        for field in VOLATILE_METADATA_FIELDS {
            metadata.remove(field);
        }
    }
}
