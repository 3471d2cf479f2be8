//! # kindiff
//!
//! Semantic diffing of Kubernetes-style YAML manifests.
//!
//! This library decodes multi-document manifest streams, filters resources by
//! Kind, masks sensitive fields length-preservingly, and computes classified
//! unified diffs. In cluster mode it reconciles local manifests against a
//! live cluster by simulating a server-side apply and diffing the predicted
//! state against the live state.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of YAML documents with order-preserving mappings
//! - [`differ`] - Kind filtering, sensitive-field masking, and the unified diff engine
//! - [`cluster`] - Resource identities, the cluster accessor seam, and the reconciler
//! - [`report`] - Plain-text rendering of per-unit diff reports

pub mod cluster;
pub mod differ;
pub mod report;
pub mod value;

pub use cluster::{
    AccessorError, ClusterAccessor, ReconcileError, ReconcileStage, Reconciler, ResourceDiff,
    ResourceIdentity, ResourceScope,
};
pub use differ::{
    diff, DiffError, DiffLine, DiffOptions, DiffResult, DiffSide, KindFilter, MaskRules,
    NO_CHANGES_SENTINEL,
};
pub use value::Value;
