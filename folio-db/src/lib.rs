// SPDX-FileCopyrightText: 2026 Folio contributors
// SPDX-License-Identifier: MIT

//! SQLite database layer for the Folio library catalog.
//!
//! This crate provides read and write access to the catalog database,
//! covering author lookups and filtered listings, aggregate and per-country
//! rollup queries, and book create/update/delete operations.
//!
//! Every executed statement is recorded in an in-memory statement log so
//! callers can persist per-request SQL diagnostics (see
//! [`CatalogDb::take_queries`]).
//!
//! # Example
//!
//! ```ignore
//! use folio_db::{CatalogDb, NewAuthor};
//!
//! let mut db = CatalogDb::open_memory()?;
//! let id = db.insert_author(&NewAuthor {
//!     name: "Ursula K. Le Guin".into(),
//!     birth_date: "1929-10-21".parse()?,
//!     country: "United States".into(),
//! })?;
//! let author = db.query_author(id)?;
//! ```

mod connection;
mod error;
mod query;
mod querylog;
mod schema;
mod types;
mod write;

pub use connection::{CatalogDb, OpenMode};
pub use error::{Error, Result};
pub use query::{AggregateValue, AuthorAggregate, AuthorFilter, CountryAnnotation};
pub use querylog::LoggedQuery;
pub use schema::SCHEMA_VERSION;
pub use types::*;
pub use write::*;
