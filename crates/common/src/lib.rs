//! Shared types: path, question and session identifiers plus the canonical
//! career path catalog.
//!
//! # Invariants
//! - Catalog order is the canonical tie-break order for every ranking.
//! - Path ids are open string keys; unknown ids order after catalog paths.

pub mod catalog;
pub mod types;

pub use catalog::{PathCatalog, PathProfile};
pub use types::{Category, PathId, QuestionId, SessionId};

pub fn crate_info() -> &'static str {
    "compass-common v0.1.0"
}
