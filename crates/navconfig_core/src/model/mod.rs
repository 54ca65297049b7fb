//! Navigation domain model.
//!
//! # Responsibility
//! - Define the flat persisted record and the read-only assembled tree view.
//! - Define create/update inputs and their validation rules.
//!
//! # Invariants
//! - Every navigation item is identified by a store-assigned `NavigationItemId`.
//! - Tree shape lives only in `parent_id` back-references; `children` exists
//!   only on the assembled `NavigationNode` view.

pub mod navigation;
