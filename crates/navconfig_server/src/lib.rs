//! HTTP transport for the navigation configuration service.
//!
//! Handlers stay thin: every request borrows the shared SQLite connection,
//! runs one `NavigationService` call on the blocking pool and maps the
//! outcome to a status code.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::Settings;
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
