//! Core domain logic for the navigation configuration service.
//! This crate is the single source of truth for navigation tree invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod tree;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::navigation::{
    NavigationItem, NavigationItemId, NavigationItemPatch, NavigationNode,
    NavigationValidationError, NewNavigationItem,
};
pub use repo::navigation_repo::{
    NavigationFilter, NavigationStore, RepoError, RepoResult, SqliteNavigationStore,
};
pub use service::navigation_service::{NavigationError, NavigationResult, NavigationService};
pub use tree::assembly::{assemble_forest, assemble_subtree};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
