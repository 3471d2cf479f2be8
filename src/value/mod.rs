//! Value module - In-memory representation of YAML manifest documents.
//!
//! Mappings preserve encounter order so that re-encoding a decoded document
//! never reorders its fields.

mod stream;
mod value;

pub use stream::*;
pub use value::*;
