//! Shared data model for Phermuth guide content.

pub mod defs;
pub mod validate;

pub use defs::*;
pub use validate::{ValidationError, validate_step};
