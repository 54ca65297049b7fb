use std::sync::Arc;

use navconfig_core::db::{open_db, open_db_in_memory, DbResult};
use navconfig_core::{NavigationResult, NavigationService, SqliteNavigationStore};
use parking_lot::Mutex;
use rusqlite::Connection;

use crate::config::IN_MEMORY_DATABASE;
use crate::error::ApiError;

/// Application state shared across handlers.
///
/// One connection serialises every request; SQLite permits a single writer
/// anyway, and each store write runs in its own immediate transaction.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Opens (and migrates) the configured database.
    pub fn open(path: &str) -> DbResult<Self> {
        let conn = if path == IN_MEMORY_DATABASE {
            open_db_in_memory()?
        } else {
            open_db(path)?
        };
        Ok(Self::new(conn))
    }

    /// Runs one service call on the blocking pool while holding the connection.
    pub async fn run<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&NavigationService<SqliteNavigationStore<'_>>) -> NavigationResult<T>
            + Send
            + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let outcome = tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            let service = NavigationService::open(&guard)?;
            op(&service)
        })
        .await
        .map_err(|err| ApiError::InternalError(format!("request task failed: {err}")))?;

        outcome.map_err(ApiError::from)
    }
}
