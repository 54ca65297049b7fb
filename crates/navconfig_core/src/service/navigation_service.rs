//! Navigation configuration use-case service.
//!
//! # Responsibility
//! - Provide CRUD and tree-fetch operations over a `NavigationStore`.
//! - Validate inputs before they reach the store; the store guards the
//!   parent chain inside its write transaction.
//! - Translate store failures into caller-facing error kinds.
//!
//! # Invariants
//! - The service holds no state besides its store handle.
//! - Updates must not make an item its own ancestor.
//! - Raw store errors surface only wrapped in `NavigationError`.

use crate::model::navigation::{
    NavigationItem, NavigationItemId, NavigationItemPatch, NavigationNode,
    NavigationValidationError, NewNavigationItem,
};
use crate::repo::navigation_repo::{
    NavigationFilter, NavigationStore, RepoError, SqliteNavigationStore,
};
use crate::tree::assembly::{assemble_forest, assemble_subtree};
use log::{error, info, warn};
use rusqlite::Connection;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by navigation service operations.
pub type NavigationResult<T> = Result<T, NavigationError>;

/// Errors from navigation service operations.
#[derive(Debug)]
pub enum NavigationError {
    /// Requested item does not exist.
    NotFound(NavigationItemId),
    /// Create was rejected by validation or by the store.
    CreationFailed(String),
    /// Update input failed validation.
    InvalidInput(NavigationValidationError),
    /// Update points `parent_id` at an item that does not exist.
    ParentNotFound(NavigationItemId),
    /// Update would make the item its own ancestor.
    CycleDetected {
        item_id: NavigationItemId,
        parent_id: NavigationItemId,
    },
    /// Any other store failure.
    Internal(RepoError),
}

impl Display for NavigationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "navigation item not found: {id}"),
            Self::CreationFailed(reason) => {
                write!(f, "failed to create navigation item: {reason}")
            }
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::ParentNotFound(id) => write!(f, "parent navigation item not found: {id}"),
            Self::CycleDetected { item_id, parent_id } => write!(
                f,
                "parent {parent_id} would make navigation item {item_id} its own ancestor"
            ),
            Self::Internal(err) => write!(f, "navigation store failure: {err}"),
        }
    }
}

impl Error for NavigationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Internal(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NavigationError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ParentNotFound(parent_id) => Self::ParentNotFound(parent_id),
            RepoError::CycleDetected { item_id, parent_id } => {
                Self::CycleDetected { item_id, parent_id }
            }
            other => Self::Internal(other),
        }
    }
}

impl From<NavigationValidationError> for NavigationError {
    fn from(value: NavigationValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

/// Navigation service facade over one store handle.
pub struct NavigationService<S: NavigationStore> {
    store: S,
}

impl<'conn> NavigationService<SqliteNavigationStore<'conn>> {
    /// Builds a service over a migrated SQLite connection.
    pub fn open(conn: &'conn Connection) -> NavigationResult<Self> {
        Ok(Self::new(SqliteNavigationStore::try_new(conn)?))
    }
}

impl<S: NavigationStore> NavigationService<S> {
    /// Creates service from store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates one item. The store assigns its id.
    ///
    /// # Errors
    /// - `CreationFailed` when input is invalid or the store rejects the row
    ///   (for example an unknown `parent_id`).
    pub fn create(&self, input: NewNavigationItem) -> NavigationResult<NavigationItem> {
        input
            .validate()
            .map_err(|err| NavigationError::CreationFailed(err.to_string()))?;

        match self.store.insert(&input) {
            Ok(created) => {
                info!(
                    "event=nav_create module=service status=ok id={} parent_id={:?}",
                    created.id, created.parent_id
                );
                Ok(created)
            }
            Err(err) => {
                warn!(
                    "event=nav_create module=service status=error parent_id={:?} error={}",
                    input.parent_id, err
                );
                Err(NavigationError::CreationFailed(err.to_string()))
            }
        }
    }

    /// Loads one flat item.
    pub fn get_by_id(&self, id: NavigationItemId) -> NavigationResult<NavigationItem> {
        self.store
            .find_by_id(id)?
            .ok_or(NavigationError::NotFound(id))
    }

    /// Loads one item with all descendants assembled beneath it.
    pub fn get_subtree(&self, id: NavigationItemId) -> NavigationResult<NavigationNode> {
        let items = self.store.find_subtree(id)?;
        assemble_subtree(items, id).ok_or(NavigationError::NotFound(id))
    }

    /// Lists direct children of one item in sibling order.
    pub fn get_children(&self, id: NavigationItemId) -> NavigationResult<Vec<NavigationItem>> {
        self.get_by_id(id)?;
        self.store
            .find_by_filter(&NavigationFilter::Parent(Some(id)))
            .map_err(Into::into)
    }

    /// Lists root-level items in sibling order.
    pub fn get_roots(&self) -> NavigationResult<Vec<NavigationItem>> {
        self.store
            .find_by_filter(&NavigationFilter::Parent(None))
            .map_err(Into::into)
    }

    /// Returns the breadcrumb chain from the root down to the item's parent.
    ///
    /// Walks stored `parent_id` links; a dangling link ends the chain, and a
    /// looping chain stops at the first repeated item.
    pub fn ancestors(&self, id: NavigationItemId) -> NavigationResult<Vec<NavigationItem>> {
        let item = self.get_by_id(id)?;
        let mut visited = HashSet::from([id]);
        let mut chain = Vec::new();
        let mut cursor = item.parent_id;
        while let Some(current) = cursor {
            if !visited.insert(current) {
                break;
            }
            let Some(parent) = self.store.find_by_id(current)? else {
                break;
            };
            cursor = parent.parent_id;
            chain.push(parent);
        }
        chain.reverse();
        Ok(chain)
    }

    /// Applies only the supplied fields to one item.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent, whatever the patch holds.
    /// - `InvalidInput` when a supplied `name`/`role` is blank.
    /// - `ParentNotFound` / `CycleDetected` for an unusable new parent; the
    ///   store checks the parent chain inside its write transaction.
    pub fn update(
        &self,
        id: NavigationItemId,
        patch: NavigationItemPatch,
    ) -> NavigationResult<NavigationItem> {
        self.get_by_id(id)?;
        patch.validate()?;

        let updated = self
            .store
            .update(id, &patch)?
            .ok_or(NavigationError::NotFound(id))?;
        info!("event=nav_update module=service status=ok id={id}");
        Ok(updated)
    }

    /// Deletes one item together with its entire subtree.
    pub fn delete(&self, id: NavigationItemId) -> NavigationResult<()> {
        match self.store.delete(id) {
            Ok(true) => {
                info!("event=nav_delete module=service status=ok id={id}");
                Ok(())
            }
            Ok(false) => Err(NavigationError::NotFound(id)),
            Err(err) => {
                error!("event=nav_delete module=service status=error id={id} error={err}");
                Err(err.into())
            }
        }
    }

    /// Lists every item flat, ordered by `display_order, id`.
    pub fn get_all_flat(&self) -> NavigationResult<Vec<NavigationItem>> {
        self.store.find_all().map_err(Into::into)
    }

    /// Assembles the full navigation forest.
    pub fn get_tree(&self) -> NavigationResult<Vec<NavigationNode>> {
        let items = self.get_all_flat()?;
        Ok(assemble_forest(items))
    }

    /// Assembles the forest over items tagged with `role` only.
    ///
    /// Filtering happens before assembly, so an item whose parent has another
    /// role is returned as a root.
    pub fn get_tree_by_role(&self, role: &str) -> NavigationResult<Vec<NavigationNode>> {
        let items = self
            .store
            .find_by_filter(&NavigationFilter::Role(role.to_string()))?;
        Ok(assemble_forest(items))
    }
}
