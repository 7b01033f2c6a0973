//! # drc-store
//!
//! Fact storage and query execution for `drc-core` plans.
//!
//! - [`FactSet`] loads facts from whitespace or tab delimited text and infers
//!   each relation's arity.
//! - [`MemoryStore`] evaluates plans directly over in-memory relations.
//! - [`SqliteStore`] (feature `sqlite`, on by default) copies the facts into
//!   an in-memory SQLite database and runs plans as SQL.
//!
//! Both stores return the same rows: the union of all conjunctions, without
//! duplicates, sorted by the output columns compared as text.
//!
//! ## Example
//!
//! ```rust
//! use drc_store::{FactSet, MemoryStore};
//! use drc_core::Bindings;
//!
//! let facts = FactSet::from_str(
//!     "student jane \"Jane Dane\"\nstudent john \"John Doe\"\nregistered jane algebra1\n",
//! )
//! .unwrap();
//! let store = MemoryStore::new(facts);
//!
//! let rows = store
//!     .query(
//!         "student(S, SD) && !registered(S, *)",
//!         &[String::from("SD")],
//!         &Bindings::new(),
//!     )
//!     .unwrap();
//! assert_eq!(rows, vec![vec![String::from("John Doe")]]);
//! ```

#[cfg(feature = "sqlite")]
mod dialect;
mod error;
pub mod facts;
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use dialect::SqliteDialect;
pub use error::{Result, StoreError};
pub use facts::{FactSet, Relation, Row};
pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
