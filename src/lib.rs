#![deny(missing_docs)]

//! Core library for the student records service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Lock-guarded in-memory student records.
pub mod store;
/// Summary generation through an external text-generation runtime.
pub mod summary;
