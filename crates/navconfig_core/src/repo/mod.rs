//! Store adapter abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the flat-record contract consumed by the navigation service.
//! - Isolate SQLite query details from tree assembly and service rules.
//!
//! # Invariants
//! - Store APIs return `None`/`false` for absent ids; semantic errors such as
//!   `NotFound` are raised by the service layer.

pub mod navigation_repo;
