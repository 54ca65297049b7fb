//! Navigation tree assembly and traversal.
//!
//! # Responsibility
//! - Build read-only `NavigationNode` forests from flat store records.
//! - Offer traversal helpers for callers that work on assembled views.

pub mod assembly;
pub mod walk;
