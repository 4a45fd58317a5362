// SPDX-FileCopyrightText: 2026 Folio contributors
// SPDX-License-Identifier: MIT

//! Database row types for the library catalog.

use chrono::NaiveDate;

/// An author row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Database row ID
    pub id: i64,
    /// Author name
    pub name: String,
    /// Date of birth
    pub birth_date: NaiveDate,
    /// Country of origin
    pub country: String,
}

/// A book row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Database row ID
    pub id: i64,
    /// Book title
    pub title: String,
    /// Publication date
    pub published_date: NaiveDate,
    /// ID of the author row
    pub author_id: i64,
}

/// An author as it appears in the full library listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryAuthor {
    pub name: String,
    pub country: String,
}

/// A book as it appears in the full library listing, with the author name
/// resolved through a join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryBook {
    pub title: String,
    pub author_name: String,
}

/// One row of a per-country rollup query.
///
/// Fields are `None` when the corresponding annotation was not requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRollup {
    /// Country the row groups by
    pub country: String,
    /// Number of books written by authors from this country
    pub book_count: Option<i64>,
    /// Number of distinct authors from this country
    pub author_count: Option<i64>,
}
