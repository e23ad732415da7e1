//! # labtrack-db
//!
//! Relational store for university lab-machine usage tracking.
//!
//! The dataset links users (students and admins), courses, projects and
//! machines through two relationship tables: `usage` (which student used
//! which machine for which project, and when) and `management` (which admin
//! administers which machine). This crate owns the canonical schema and
//! everything that touches it:
//!
//! - [`schema`]: table definitions in foreign-key dependency order
//! - [`store`]: the [`Session`] connection wrapper and the destructive
//!   schema reset
//! - [`loader`]: bulk (re)population from per-table CSV files
//! - [`ops`]: atomic single-record write operations
//! - [`query`]: read-only reporting queries
//!
//! ## Quick start
//!
//! ```no_run
//! use labtrack_db::{ops, query, Session};
//!
//! let mut session = Session::open("labtrack.db").unwrap();
//! session.reset_schema().unwrap();
//!
//! ops::create_student(&mut session, "psmith", "psmith@uci.edu", "Pat", "Q", "Smith").unwrap();
//! let courses = query::list_courses_for_student(&session, "psmith").unwrap();
//! assert!(courses.is_empty());
//! ```

pub mod error;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod loader;
pub mod ops;
pub mod query;
pub mod schema;
pub mod store;

// Re-exports for convenience.
pub use error::DbError;
pub use loader::{load_all, CsvDirSource, LoadReport, RowSource};
pub use store::Session;
