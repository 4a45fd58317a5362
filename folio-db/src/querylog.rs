// SPDX-FileCopyrightText: 2026 Folio contributors
// SPDX-License-Identifier: MIT

//! In-memory statement log for per-request SQL diagnostics.
//!
//! Every read and write operation on [`CatalogDb`] records the executed SQL
//! and its wall-clock duration here. HTTP handlers clear the log when a
//! request starts and drain it when the request finishes.

use std::time::Instant;

use crate::connection::CatalogDb;

/// An executed SQL statement with its duration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedQuery {
    /// The SQL text as executed
    pub sql: String,
    /// Wall-clock duration in seconds
    pub seconds: f64,
}

impl CatalogDb {
    /// Record an executed statement. Called by every query/write operation.
    pub(crate) fn record(&self, sql: &str, started: Instant) {
        self.log.borrow_mut().push(LoggedQuery {
            sql: sql.trim().to_owned(),
            seconds: started.elapsed().as_secs_f64(),
        });
    }

    /// Drop all recorded statements.
    pub fn clear_queries(&self) {
        self.log.borrow_mut().clear();
    }

    /// Drain the recorded statements, leaving the log empty.
    pub fn take_queries(&self) -> Vec<LoggedQuery> {
        std::mem::take(&mut *self.log.borrow_mut())
    }
}
