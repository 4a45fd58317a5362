// SPDX-FileCopyrightText: 2026 Folio contributors
// SPDX-License-Identifier: MIT

//! Read query operations for the catalog database.
//!
//! Listings, single-author lookups, and the dynamic filter, aggregate, and
//! per-country rollup composition used by the `/authors` endpoint.

use std::time::Instant;

use chrono::NaiveDate;
use rusqlite::params;
use rusqlite::types::Value;

use crate::connection::CatalogDb;
use crate::error::Result;
use crate::types::{Author, Book, CountryRollup, LibraryAuthor, LibraryBook};

/// Dynamic filter over the Authors table.
///
/// All fields are optional; an empty filter matches every author.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuthorFilter {
    /// Keep only authors from this country
    pub country: Option<String>,
    /// Drop authors from this country
    pub exclude_country: Option<String>,
    /// Drop authors with this name
    pub exclude_name: Option<String>,
}

impl AuthorFilter {
    /// Build the WHERE clause (over the aliased table `a`) and its
    /// positional parameters. Returns an empty clause for an empty filter.
    fn where_clause(&self) -> (String, Vec<Value>) {
        let mut clauses = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(country) = &self.country {
            values.push(Value::from(country.clone()));
            clauses.push(format!("a.country = ?{}", values.len()));
        }
        if let Some(country) = &self.exclude_country {
            values.push(Value::from(country.clone()));
            clauses.push(format!("a.country <> ?{}", values.len()));
        }
        if let Some(name) = &self.exclude_name {
            values.push(Value::from(name.clone()));
            clauses.push(format!("a.name <> ?{}", values.len()));
        }

        if clauses.is_empty() {
            (String::new(), values)
        } else {
            (format!(" WHERE {}", clauses.join(" AND ")), values)
        }
    }
}

/// Aggregate over a filtered set of authors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorAggregate {
    /// Number of matching authors
    Count,
    /// Average of the joined book row ids
    AverageBooks,
    /// Earliest birth date among matching authors
    MinBirthDate,
    /// Latest birth date among matching authors
    MaxBirthDate,
}

impl AuthorAggregate {
    /// Parse a request token. Unknown tokens yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "count" => Some(Self::Count),
            "average_books" => Some(Self::AverageBooks),
            "min_birth_date" => Some(Self::MinBirthDate),
            "max_birth_date" => Some(Self::MaxBirthDate),
            _ => None,
        }
    }

    /// The key this aggregate is reported under.
    pub fn key(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::AverageBooks => "average_books",
            Self::MinBirthDate => "min_birth_date",
            Self::MaxBirthDate => "max_birth_date",
        }
    }
}

/// Result of a single aggregate query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregateValue {
    Count(i64),
    Average(Option<f64>),
    Date(Option<NaiveDate>),
}

/// Per-country rollup column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryAnnotation {
    /// Number of books per country (LEFT JOIN through Books)
    BookCount,
    /// Number of distinct authors per country
    CountryCount,
}

impl CountryAnnotation {
    /// Parse a request token. Unknown tokens yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "book_count" => Some(Self::BookCount),
            "country_count" => Some(Self::CountryCount),
            _ => None,
        }
    }
}

impl CatalogDb {
    /// Query an author by row id.
    ///
    /// Returns `None` if the author is not in the database.
    pub fn query_author(&self, id: i64) -> Result<Option<Author>> {
        const SQL: &str = "SELECT id, name, birthDate, country FROM Authors WHERE id = ?1";
        let started = Instant::now();
        let mut stmt = self.conn.prepare_cached(SQL)?;
        let result = stmt.query_row(params![id], author_from_row);
        self.record(SQL, started);

        match result {
            Ok(author) => Ok(Some(author)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Query an author by exact name.
    ///
    /// Names are not unique; like the underlying `LIMIT 1`, ties resolve to
    /// the lowest row id.
    pub fn query_author_by_name(&self, name: &str) -> Result<Option<Author>> {
        const SQL: &str =
            "SELECT id, name, birthDate, country FROM Authors WHERE name = ?1 ORDER BY id LIMIT 1";
        let started = Instant::now();
        let mut stmt = self.conn.prepare_cached(SQL)?;
        let result = stmt.query_row(params![name], author_from_row);
        self.record(SQL, started);

        match result {
            Ok(author) => Ok(Some(author)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List authors matching a filter, ordered by row id.
    pub fn list_authors(&self, filter: &AuthorFilter) -> Result<Vec<Author>> {
        let (where_clause, values) = filter.where_clause();
        let sql = format!(
            "SELECT a.id, a.name, a.birthDate, a.country FROM Authors a{where_clause} ORDER BY a.id"
        );

        let started = Instant::now();
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(values))?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(author_from_row(row)?);
        }
        self.record(&sql, started);
        Ok(authors)
    }

    /// Run the requested aggregates over a filtered set of authors.
    ///
    /// One SQL statement is executed per aggregate.
    pub fn aggregate_authors(
        &self,
        filter: &AuthorFilter,
        aggregates: &[AuthorAggregate],
    ) -> Result<Vec<(AuthorAggregate, AggregateValue)>> {
        let (where_clause, values) = filter.where_clause();
        let mut results = Vec::with_capacity(aggregates.len());

        for &aggregate in aggregates {
            let sql = match aggregate {
                AuthorAggregate::Count => {
                    format!("SELECT COUNT(a.id) FROM Authors a{where_clause}")
                }
                AuthorAggregate::AverageBooks => format!(
                    "SELECT AVG(b.id) FROM Authors a LEFT JOIN Books b ON b.author = a.id{where_clause}"
                ),
                AuthorAggregate::MinBirthDate => {
                    format!("SELECT MIN(a.birthDate) FROM Authors a{where_clause}")
                }
                AuthorAggregate::MaxBirthDate => {
                    format!("SELECT MAX(a.birthDate) FROM Authors a{where_clause}")
                }
            };

            let started = Instant::now();
            let mut stmt = self.conn.prepare_cached(&sql)?;
            let value = stmt.query_row(
                rusqlite::params_from_iter(values.iter().cloned()),
                |row| {
                    Ok(match aggregate {
                        AuthorAggregate::Count => AggregateValue::Count(row.get(0)?),
                        AuthorAggregate::AverageBooks => AggregateValue::Average(row.get(0)?),
                        AuthorAggregate::MinBirthDate | AuthorAggregate::MaxBirthDate => {
                            AggregateValue::Date(row.get(0)?)
                        }
                    })
                },
            )?;
            self.record(&sql, started);
            results.push((aggregate, value));
        }

        Ok(results)
    }

    /// Group a filtered set of authors by country, computing the requested
    /// rollup columns. Rows are ordered by country.
    pub fn annotate_by_country(
        &self,
        filter: &AuthorFilter,
        annotations: &[CountryAnnotation],
    ) -> Result<Vec<CountryRollup>> {
        let want_books = annotations.contains(&CountryAnnotation::BookCount);
        let want_authors = annotations.contains(&CountryAnnotation::CountryCount);

        let mut columns = vec!["a.country".to_owned()];
        if want_books {
            columns.push("COUNT(b.id)".to_owned());
        }
        if want_authors {
            columns.push("COUNT(DISTINCT a.id)".to_owned());
        }

        let (where_clause, values) = filter.where_clause();
        let sql = format!(
            "SELECT {} FROM Authors a LEFT JOIN Books b ON b.author = a.id{where_clause} \
             GROUP BY a.country ORDER BY a.country",
            columns.join(", ")
        );

        let started = Instant::now();
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(values))?;
        let mut rollups = Vec::new();
        while let Some(row) = rows.next()? {
            let mut index = 1;
            let book_count = if want_books {
                let count = row.get(index)?;
                index += 1;
                Some(count)
            } else {
                None
            };
            let author_count = if want_authors { Some(row.get(index)?) } else { None };
            rollups.push(CountryRollup {
                country: row.get(0)?,
                book_count,
                author_count,
            });
        }
        self.record(&sql, started);
        Ok(rollups)
    }

    /// All authors as they appear in the library listing.
    pub fn query_library_authors(&self) -> Result<Vec<LibraryAuthor>> {
        const SQL: &str = "SELECT name, country FROM Authors ORDER BY id";
        let started = Instant::now();
        let mut stmt = self.conn.prepare_cached(SQL)?;
        let mut rows = stmt.query([])?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(LibraryAuthor {
                name: row.get(0)?,
                country: row.get(1)?,
            });
        }
        self.record(SQL, started);
        Ok(authors)
    }

    /// All books with their author names resolved, as they appear in the
    /// library listing.
    pub fn query_library_books(&self) -> Result<Vec<LibraryBook>> {
        const SQL: &str =
            "SELECT b.title, a.name FROM Books b JOIN Authors a ON b.author = a.id ORDER BY b.id";
        let started = Instant::now();
        let mut stmt = self.conn.prepare_cached(SQL)?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(LibraryBook {
                title: row.get(0)?,
                author_name: row.get(1)?,
            });
        }
        self.record(SQL, started);
        Ok(books)
    }

    /// Query a book by row id.
    pub fn query_book(&self, id: i64) -> Result<Option<Book>> {
        const SQL: &str = "SELECT id, title, publishedDate, author FROM Books WHERE id = ?1";
        let started = Instant::now();
        let mut stmt = self.conn.prepare_cached(SQL)?;
        let result = stmt.query_row(params![id], |row| {
            Ok(Book {
                id: row.get(0)?,
                title: row.get(1)?,
                published_date: row.get(2)?,
                author_id: row.get(3)?,
            })
        });
        self.record(SQL, started);

        match result {
            Ok(book) => Ok(Some(book)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All author row ids (used by the seeder to assign books).
    pub fn query_author_ids(&self) -> Result<Vec<i64>> {
        const SQL: &str = "SELECT id FROM Authors ORDER BY id";
        let started = Instant::now();
        let mut stmt = self.conn.prepare_cached(SQL)?;
        let mut rows = stmt.query([])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(row.get(0)?);
        }
        self.record(SQL, started);
        Ok(ids)
    }

    /// Count all authors.
    pub fn count_authors(&self) -> Result<u64> {
        const SQL: &str = "SELECT COUNT(*) FROM Authors";
        let started = Instant::now();
        let count: i64 = self.conn.query_row(SQL, [], |row| row.get(0))?;
        self.record(SQL, started);
        Ok(count as u64)
    }

    /// Count all books.
    pub fn count_books(&self) -> Result<u64> {
        const SQL: &str = "SELECT COUNT(*) FROM Books";
        let started = Instant::now();
        let count: i64 = self.conn.query_row(SQL, [], |row| row.get(0))?;
        self.record(SQL, started);
        Ok(count as u64)
    }
}

fn author_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Author> {
    Ok(Author {
        id: row.get(0)?,
        name: row.get(1)?,
        birth_date: row.get(2)?,
        country: row.get(3)?,
    })
}
