//! Cluster module - Resource identities, the accessor seam, and reconciliation.
//!
//! The reconciler never talks to a cluster directly; everything remote goes
//! through the [`ClusterAccessor`] trait so the transport is swappable.

mod accessor;
mod identity;
mod reconcile;


pub use accessor::*;
pub use identity::*;
pub use reconcile::*;
