//! Differ module - Kind filtering, sensitive-field masking, and the diff engine.
//!
//! The pipeline runs decode, filter, mask, and canonical re-encode in strict
//! sequence; each stage owns the document sequence while it runs.

mod engine;
mod filter;
mod mask;
mod unified;


pub use engine::*;
pub use filter::*;
pub use mask::*;
