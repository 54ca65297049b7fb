//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls and tree assembly into use-case level APIs.
//! - Keep transport layers decoupled from storage details.

pub mod navigation_service;
