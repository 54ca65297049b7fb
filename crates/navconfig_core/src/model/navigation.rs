//! Navigation item domain model.
//!
//! # Responsibility
//! - Define the canonical record stored once per navigation entry.
//! - Provide the create/patch inputs used by service write paths.
//! - Provide the `NavigationNode` view produced by tree assembly.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `name` and `role` must not be blank.
//! - Sibling order is `display_order ASC, id ASC`.

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier of one navigation item.
pub type NavigationItemId = i64;

/// Validation errors for navigation item write inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationValidationError {
    /// `name` is empty after trim.
    BlankName,
    /// `role` is empty after trim.
    BlankRole,
}

impl Display for NavigationValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "navigation item name must not be blank"),
            Self::BlankRole => write!(f, "navigation item role must not be blank"),
        }
    }
}

impl Error for NavigationValidationError {}

/// Persisted navigation record.
///
/// One row per entry. Children are not stored here; see [`NavigationNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    pub id: NavigationItemId,
    /// User-facing label.
    pub name: String,
    /// Route handled by the shell for this entry.
    pub path: String,
    /// Remote front-end fragment loaded for this entry, if any.
    pub microfrontend_url: Option<String>,
    /// `None` means root-level entry.
    pub parent_id: Option<NavigationItemId>,
    /// Sibling order key. Not unique, not contiguous.
    pub display_order: i64,
    /// Role tag used to filter the working set.
    pub role: String,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

impl NavigationItem {
    /// Returns the deterministic sibling sort key.
    pub fn sort_key(&self) -> (i64, NavigationItemId) {
        (self.display_order, self.id)
    }
}

/// Create input. The store assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNavigationItem {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub microfrontend_url: Option<String>,
    #[serde(default)]
    pub parent_id: Option<NavigationItemId>,
    #[serde(default)]
    pub display_order: i64,
    pub role: String,
}

impl NewNavigationItem {
    /// Creates a root-level input with `display_order = 0`.
    pub fn new(name: impl Into<String>, path: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            microfrontend_url: None,
            parent_id: None,
            display_order: 0,
            role: role.into(),
        }
    }

    /// Sets the parent reference.
    pub fn with_parent(mut self, parent_id: NavigationItemId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Sets the sibling order key.
    pub fn with_display_order(mut self, display_order: i64) -> Self {
        self.display_order = display_order;
        self
    }

    /// Sets the remote fragment location.
    pub fn with_microfrontend_url(mut self, url: impl Into<String>) -> Self {
        self.microfrontend_url = Some(url.into());
        self
    }

    pub fn validate(&self) -> Result<(), NavigationValidationError> {
        ensure_not_blank(&self.name, NavigationValidationError::BlankName)?;
        ensure_not_blank(&self.role, NavigationValidationError::BlankRole)?;
        Ok(())
    }
}

/// Partial update input.
///
/// `None` leaves a field unchanged. For the nullable columns the inner
/// `Option` distinguishes "set to value" from "clear": a JSON `null` arrives
/// as `Some(None)`, a missing key as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub microfrontend_url: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<Option<NavigationItemId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl NavigationItemPatch {
    /// Returns whether no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.path.is_none()
            && self.microfrontend_url.is_none()
            && self.parent_id.is_none()
            && self.display_order.is_none()
            && self.role.is_none()
    }

    pub fn validate(&self) -> Result<(), NavigationValidationError> {
        if let Some(name) = self.name.as_deref() {
            ensure_not_blank(name, NavigationValidationError::BlankName)?;
        }
        if let Some(role) = self.role.as_deref() {
            ensure_not_blank(role, NavigationValidationError::BlankRole)?;
        }
        Ok(())
    }
}

/// Read-only assembled view: one item plus its ordered children.
///
/// Built per call by `tree::assembly`; never written back to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationNode {
    #[serde(flatten)]
    pub item: NavigationItem,
    pub children: Vec<NavigationNode>,
}

impl NavigationNode {
    /// Wraps one item as a leaf node.
    pub fn leaf(item: NavigationItem) -> Self {
        Self {
            item,
            children: Vec::new(),
        }
    }

    /// Counts this node and every descendant.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(NavigationNode::subtree_len)
            .sum::<usize>()
    }
}

fn ensure_not_blank(
    value: &str,
    error: NavigationValidationError,
) -> Result<(), NavigationValidationError> {
    if value.trim().is_empty() {
        return Err(error);
    }
    Ok(())
}

fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
