//! # Farm Database Crate
//!
//! This crate is the single persistence boundary of the farm records system.
//! Nothing else writes to the store, and nothing keeps a second copy of it.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All SQL lives here. Callers pass and receive the plain row
//!   types from `core-types` and never see a connection or a statement.
//! - **All-or-nothing writes:** Every create, update and delete runs in its own
//!   transaction. A failed validation, a missing parent or a refused delete
//!   leaves the store exactly as it was.
//! - **Explicit cascades:** What a delete does to child rows is read from
//!   `configuration::CascadePolicy`, never from implicit `ON DELETE` clauses.
//!
//! ## Public API
//!
//! - `connect` / `connect_in_memory`: build the SQLite connection pool.
//! - `init_schema`: idempotent creation of every table and index.
//! - `DbRepository`: create/get/update/delete for each entity, plus the
//!   supplemental dashboard queries.
//! - `DbError`: the error taxonomy returned by every operation.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;
pub mod schema;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_in_memory};
pub use error::DbError;
pub use repository::{ChildEffect, DbRepository, DeleteSummary, TableCount};
pub use schema::{init_schema, schema_tables, TABLES};
