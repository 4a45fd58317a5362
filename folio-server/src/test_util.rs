//! Shared fixtures for in-process handler tests.

use std::time::Duration;

use actix_web::web;
use chrono::NaiveDate;
use folio_db::{NewAuthor, NewBook};
use tempfile::TempDir;

use crate::catalog::Catalog;
use crate::config::Config;

/// A config backed by a temp-dir database seeded with two authors
/// (Le Guin, United States; Lem, Poland) and one book each.
pub(crate) async fn seeded_config() -> (TempDir, web::Data<Config>) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::parse("").unwrap();
    config.catalog = Catalog::new(
        dir.path().join("catalog.sqlite"),
        dir.path().join("queries.csv"),
        Duration::from_secs(900),
    );

    {
        let mut db_guard = config.catalog.get_db().await.unwrap();
        let db = db_guard.as_mut().unwrap();

        let le_guin = db
            .insert_author(&NewAuthor {
                name: "Ursula K. Le Guin".into(),
                birth_date: date(1929, 10, 21),
                country: "United States".into(),
            })
            .unwrap();
        let lem = db
            .insert_author(&NewAuthor {
                name: "Stanisław Lem".into(),
                birth_date: date(1921, 9, 12),
                country: "Poland".into(),
            })
            .unwrap();

        db.insert_book(&NewBook {
            title: "The Dispossessed".into(),
            published_date: date(1974, 5, 1),
            author_id: le_guin,
        })
        .unwrap();
        db.insert_book(&NewBook {
            title: "Solaris".into(),
            published_date: date(1961, 6, 1),
            author_id: lem,
        })
        .unwrap();

        db.clear_queries();
    }

    (dir, web::Data::new(config))
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Contents of the CSV query log, or an empty string when nothing was
/// written yet.
pub(crate) fn read_csv(dir: &TempDir) -> String {
    std::fs::read_to_string(dir.path().join("queries.csv")).unwrap_or_default()
}
