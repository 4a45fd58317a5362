// SPDX-FileCopyrightText: 2026 Folio contributors
// SPDX-License-Identifier: MIT

//! Write operations for the catalog database.

use std::time::Instant;

use chrono::NaiveDate;
use rusqlite::params;

use crate::connection::CatalogDb;
use crate::error::Result;

/// Parameters for inserting a new author.
#[derive(Debug, Clone)]
pub struct NewAuthor {
    pub name: String,
    pub birth_date: NaiveDate,
    pub country: String,
}

/// Parameters for inserting a new book.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub published_date: NaiveDate,
    /// Row id of an existing author
    pub author_id: i64,
}

/// Partial update of a book. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub published_date: Option<NaiveDate>,
    pub author_id: Option<i64>,
}

impl BookPatch {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.published_date.is_none() && self.author_id.is_none()
    }
}

impl CatalogDb {
    /// Insert a new author.
    ///
    /// Returns the database ID of the new row.
    pub fn insert_author(&self, author: &NewAuthor) -> Result<i64> {
        const SQL: &str = "INSERT INTO Authors (name, birthDate, country) VALUES (?1, ?2, ?3)";
        let started = Instant::now();
        self.conn.execute(
            SQL,
            params![author.name, author.birth_date, author.country],
        )?;
        self.record(SQL, started);
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a batch of authors inside a single transaction.
    pub fn insert_authors(&mut self, authors: &[NewAuthor]) -> Result<()> {
        const SQL: &str = "INSERT INTO Authors (name, birthDate, country) VALUES (?1, ?2, ?3)";
        let started = Instant::now();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(SQL)?;
            for author in authors {
                stmt.execute(params![author.name, author.birth_date, author.country])?;
            }
        }
        tx.commit()?;
        self.record(SQL, started);
        Ok(())
    }

    /// Insert a new book.
    ///
    /// Returns the database ID of the new row. The referenced author must
    /// exist (foreign keys are enforced).
    pub fn insert_book(&self, book: &NewBook) -> Result<i64> {
        const SQL: &str = "INSERT INTO Books (title, publishedDate, author) VALUES (?1, ?2, ?3)";
        let started = Instant::now();
        self.conn.execute(
            SQL,
            params![book.title, book.published_date, book.author_id],
        )?;
        self.record(SQL, started);
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a batch of books inside a single transaction.
    pub fn insert_books(&mut self, books: &[NewBook]) -> Result<()> {
        const SQL: &str = "INSERT INTO Books (title, publishedDate, author) VALUES (?1, ?2, ?3)";
        let started = Instant::now();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(SQL)?;
            for book in books {
                stmt.execute(params![book.title, book.published_date, book.author_id])?;
            }
        }
        tx.commit()?;
        self.record(SQL, started);
        Ok(())
    }

    /// Apply a partial update to a book.
    ///
    /// Returns `false` when the book does not exist. An empty patch only
    /// checks existence.
    pub fn update_book(&self, id: i64, patch: &BookPatch) -> Result<bool> {
        if patch.is_empty() {
            const SQL: &str = "SELECT 1 FROM Books WHERE id = ?1 LIMIT 1";
            let started = Instant::now();
            let mut stmt = self.conn.prepare_cached(SQL)?;
            let result = stmt.query_row(params![id], |_| Ok(()));
            self.record(SQL, started);
            return match result {
                Ok(()) => Ok(true),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
                Err(e) => Err(e.into()),
            };
        }

        let mut assignments = Vec::new();
        let mut values: Vec<rusqlite::types::Value> = Vec::new();

        if let Some(title) = &patch.title {
            values.push(title.clone().into());
            assignments.push(format!("title = ?{}", values.len()));
        }
        if let Some(date) = patch.published_date {
            values.push(date.to_string().into());
            assignments.push(format!("publishedDate = ?{}", values.len()));
        }
        if let Some(author_id) = patch.author_id {
            values.push(author_id.into());
            assignments.push(format!("author = ?{}", values.len()));
        }

        values.push(id.into());
        let sql = format!(
            "UPDATE Books SET {} WHERE id = ?{}",
            assignments.join(", "),
            values.len()
        );

        let started = Instant::now();
        let rows = self
            .conn
            .execute(&sql, rusqlite::params_from_iter(values))?;
        self.record(&sql, started);
        Ok(rows > 0)
    }

    /// Delete a book.
    ///
    /// Returns `false` when the book does not exist.
    pub fn delete_book(&self, id: i64) -> Result<bool> {
        const SQL: &str = "DELETE FROM Books WHERE id = ?1";
        let started = Instant::now();
        let rows = self.conn.execute(SQL, params![id])?;
        self.record(SQL, started);
        Ok(rows > 0)
    }

    /// Delete an author. Cascades to their books.
    ///
    /// Returns `false` when the author does not exist.
    pub fn delete_author(&self, id: i64) -> Result<bool> {
        const SQL: &str = "DELETE FROM Authors WHERE id = ?1";
        let started = Instant::now();
        let rows = self.conn.execute(SQL, params![id])?;
        self.record(SQL, started);
        Ok(rows > 0)
    }
}
