//! Navigation store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide flat-record persistence APIs for navigation items.
//! - Keep SQL details and ordering behavior inside the store boundary.
//!
//! # Invariants
//! - Every listing is deterministic: `display_order ASC, id ASC`.
//! - Each write is one statement or one immediate transaction.
//! - `delete` removes the target and all transitive descendants, or nothing.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::navigation::{
    NavigationItem, NavigationItemId, NavigationItemPatch, NewNavigationItem,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Params, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    name,
    path,
    microfrontend_url,
    parent_id,
    display_order,
    role,
    created_at,
    updated_at
FROM navigation_items";

const ITEM_COLUMNS: [&str; 9] = [
    "id",
    "name",
    "path",
    "microfrontend_url",
    "parent_id",
    "display_order",
    "role",
    "created_at",
    "updated_at",
];

/// Result type used by navigation store operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from navigation store operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Persisted row cannot be converted to a valid record.
    InvalidData(String),
    /// Update points `parent_id` at an item that does not exist.
    ParentNotFound(NavigationItemId),
    /// Update would make the item its own ancestor.
    CycleDetected {
        item_id: NavigationItemId,
        parent_id: NavigationItemId,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid navigation data: {message}"),
            Self::ParentNotFound(id) => write!(f, "parent navigation item not found: {id}"),
            Self::CycleDetected { item_id, parent_id } => write!(
                f,
                "parent {parent_id} would make navigation item {item_id} its own ancestor"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "navigation store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "navigation store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "navigation store requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Equality filter for scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationFilter {
    /// Items tagged with exactly this role.
    Role(String),
    /// Items under this parent; `None` selects root-level items.
    Parent(Option<NavigationItemId>),
}

/// Store adapter consumed by the navigation service.
pub trait NavigationStore {
    /// Inserts one item and returns it with the assigned id.
    fn insert(&self, item: &NewNavigationItem) -> RepoResult<NavigationItem>;
    /// Loads one item by id.
    fn find_by_id(&self, id: NavigationItemId) -> RepoResult<Option<NavigationItem>>;
    /// Loads every item ordered by `display_order, id`.
    fn find_all(&self) -> RepoResult<Vec<NavigationItem>>;
    /// Loads items matching one filter ordered by `display_order, id`.
    fn find_by_filter(&self, filter: &NavigationFilter) -> RepoResult<Vec<NavigationItem>>;
    /// Loads one item and all transitive descendants.
    fn find_subtree(&self, id: NavigationItemId) -> RepoResult<Vec<NavigationItem>>;
    /// Applies supplied fields only. Returns `None` when the id is absent.
    ///
    /// A new `parent_id` is checked in the same unit of work as the write:
    /// `ParentNotFound` when it is absent, `CycleDetected` when it is the item
    /// itself or one of its descendants.
    fn update(
        &self,
        id: NavigationItemId,
        patch: &NavigationItemPatch,
    ) -> RepoResult<Option<NavigationItem>>;
    /// Deletes one item with its subtree. Returns `false` when the id is absent.
    fn delete(&self, id: NavigationItemId) -> RepoResult<bool>;
}

/// SQLite-backed navigation store over a borrowed connection handle.
pub struct SqliteNavigationStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNavigationStore<'conn> {
    /// Creates store from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_navigation_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NavigationStore for SqliteNavigationStore<'_> {
    fn insert(&self, item: &NewNavigationItem) -> RepoResult<NavigationItem> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO navigation_items (
                name,
                path,
                microfrontend_url,
                parent_id,
                display_order,
                role
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                item.name.as_str(),
                item.path.as_str(),
                item.microfrontend_url.as_deref(),
                item.parent_id,
                item.display_order,
                item.role.as_str(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        let created = load_item(&tx, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("inserted navigation item {id} could not be read back"))
        })?;
        tx.commit()?;
        Ok(created)
    }

    fn find_by_id(&self, id: NavigationItemId) -> RepoResult<Option<NavigationItem>> {
        load_item(self.conn, id)
    }

    fn find_all(&self) -> RepoResult<Vec<NavigationItem>> {
        query_items(
            self.conn,
            &format!("{ITEM_SELECT_SQL} ORDER BY display_order ASC, id ASC;"),
            [],
        )
    }

    fn find_by_filter(&self, filter: &NavigationFilter) -> RepoResult<Vec<NavigationItem>> {
        match filter {
            NavigationFilter::Role(role) => query_items(
                self.conn,
                &format!("{ITEM_SELECT_SQL} WHERE role = ?1 ORDER BY display_order ASC, id ASC;"),
                [role.as_str()],
            ),
            NavigationFilter::Parent(Some(parent_id)) => query_items(
                self.conn,
                &format!(
                    "{ITEM_SELECT_SQL} WHERE parent_id = ?1 ORDER BY display_order ASC, id ASC;"
                ),
                [parent_id],
            ),
            NavigationFilter::Parent(None) => query_items(
                self.conn,
                &format!(
                    "{ITEM_SELECT_SQL} WHERE parent_id IS NULL ORDER BY display_order ASC, id ASC;"
                ),
                [],
            ),
        }
    }

    fn find_subtree(&self, id: NavigationItemId) -> RepoResult<Vec<NavigationItem>> {
        // UNION (not UNION ALL) so a looping parent chain still terminates.
        query_items(
            self.conn,
            "WITH RECURSIVE subtree(id) AS (
                SELECT id
                FROM navigation_items
                WHERE id = ?1
                UNION
                SELECT child.id
                FROM navigation_items child
                INNER JOIN subtree parent ON child.parent_id = parent.id
            )
            SELECT
                n.id AS id,
                n.name AS name,
                n.path AS path,
                n.microfrontend_url AS microfrontend_url,
                n.parent_id AS parent_id,
                n.display_order AS display_order,
                n.role AS role,
                n.created_at AS created_at,
                n.updated_at AS updated_at
            FROM navigation_items n
            INNER JOIN subtree ON subtree.id = n.id
            ORDER BY n.display_order ASC, n.id ASC;",
            [id],
        )
    }

    fn update(
        &self,
        id: NavigationItemId,
        patch: &NavigationItemPatch,
    ) -> RepoResult<Option<NavigationItem>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if load_item(&tx, id)?.is_none() {
            return Ok(None);
        }
        if let Some(Some(parent_id)) = patch.parent_id {
            ensure_parent_allowed(&tx, id, parent_id)?;
        }

        if !patch.is_empty() {
            let (assignments, mut bind_values) = patch_assignments(patch);
            bind_values.push(Value::Integer(id));
            tx.execute(
                &format!(
                    "UPDATE navigation_items
                     SET {},
                         updated_at = (strftime('%s', 'now') * 1000)
                     WHERE id = ?;",
                    assignments.join(", ")
                ),
                params_from_iter(bind_values),
            )?;
        }

        let updated = load_item(&tx, id)?;
        tx.commit()?;
        Ok(updated)
    }

    fn delete(&self, id: NavigationItemId) -> RepoResult<bool> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let removed = tx.execute(
            "WITH RECURSIVE subtree(id) AS (
                SELECT id
                FROM navigation_items
                WHERE id = ?1
                UNION
                SELECT child.id
                FROM navigation_items child
                INNER JOIN subtree parent ON child.parent_id = parent.id
            )
            DELETE FROM navigation_items
            WHERE id IN (SELECT id FROM subtree);",
            [id],
        )?;
        tx.commit()?;
        Ok(removed > 0)
    }
}

fn ensure_parent_allowed(
    conn: &Connection,
    id: NavigationItemId,
    parent_id: NavigationItemId,
) -> RepoResult<()> {
    if parent_id == id {
        return Err(RepoError::CycleDetected {
            item_id: id,
            parent_id,
        });
    }
    if load_item(conn, parent_id)?.is_none() {
        return Err(RepoError::ParentNotFound(parent_id));
    }

    // UNION (not UNION ALL) so an already looping chain still terminates.
    let reaches_item: i64 = conn.query_row(
        "WITH RECURSIVE chain(id) AS (
            SELECT ?1
            UNION
            SELECT n.parent_id
            FROM navigation_items n
            INNER JOIN chain ON n.id = chain.id
            WHERE n.parent_id IS NOT NULL
        )
        SELECT EXISTS(SELECT 1 FROM chain WHERE id = ?2);",
        params![parent_id, id],
        |row| row.get(0),
    )?;
    if reaches_item == 1 {
        return Err(RepoError::CycleDetected {
            item_id: id,
            parent_id,
        });
    }
    Ok(())
}

fn patch_assignments(patch: &NavigationItemPatch) -> (Vec<&'static str>, Vec<Value>) {
    let mut assignments = Vec::new();
    let mut bind_values = Vec::new();

    if let Some(name) = &patch.name {
        assignments.push("name = ?");
        bind_values.push(Value::Text(name.clone()));
    }
    if let Some(path) = &patch.path {
        assignments.push("path = ?");
        bind_values.push(Value::Text(path.clone()));
    }
    if let Some(url) = &patch.microfrontend_url {
        assignments.push("microfrontend_url = ?");
        bind_values.push(url.clone().map_or(Value::Null, Value::Text));
    }
    if let Some(parent_id) = patch.parent_id {
        assignments.push("parent_id = ?");
        bind_values.push(parent_id.map_or(Value::Null, Value::Integer));
    }
    if let Some(display_order) = patch.display_order {
        assignments.push("display_order = ?");
        bind_values.push(Value::Integer(display_order));
    }
    if let Some(role) = &patch.role {
        assignments.push("role = ?");
        bind_values.push(Value::Text(role.clone()));
    }

    (assignments, bind_values)
}

fn load_item(conn: &Connection, id: NavigationItemId) -> RepoResult<Option<NavigationItem>> {
    let mut items = query_items(conn, &format!("{ITEM_SELECT_SQL} WHERE id = ?1;"), [id])?;
    Ok(items.pop())
}

fn query_items<P: Params>(conn: &Connection, sql: &str, params: P) -> RepoResult<Vec<NavigationItem>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_navigation_row(row)?);
    }
    Ok(items)
}

fn parse_navigation_row(row: &Row<'_>) -> RepoResult<NavigationItem> {
    let id: NavigationItemId = row.get("id")?;
    let name: String = row.get("name")?;
    if name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank name in navigation_items.name for id {id}"
        )));
    }
    let role: String = row.get("role")?;
    if role.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank role in navigation_items.role for id {id}"
        )));
    }

    Ok(NavigationItem {
        id,
        name,
        path: row.get("path")?,
        microfrontend_url: row.get("microfrontend_url")?,
        parent_id: row.get("parent_id")?,
        display_order: row.get("display_order")?,
        role,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn ensure_navigation_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "navigation_items")? {
        return Err(RepoError::MissingRequiredTable("navigation_items"));
    }

    for column in ITEM_COLUMNS {
        if !table_has_column(conn, "navigation_items", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "navigation_items",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
