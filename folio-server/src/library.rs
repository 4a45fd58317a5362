//! The full library listing, served through the TTL cache.

use actix_web::{HttpResponse, web};
use folio_db::CatalogDb;
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub(crate) struct LibraryAuthorEntry {
    pub(crate) name: String,
    pub(crate) country: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub(crate) struct LibraryBookEntry {
    pub(crate) title: String,
    pub(crate) author_name: String,
}

/// Everything `/library` serves; this is what the cache holds.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub(crate) struct LibraryPayload {
    pub(crate) authors: Vec<LibraryAuthorEntry>,
    pub(crate) books: Vec<LibraryBookEntry>,
}

fn load_library(db: &CatalogDb) -> Result<LibraryPayload> {
    let authors = db
        .query_library_authors()?
        .into_iter()
        .map(|a| LibraryAuthorEntry {
            name: a.name,
            country: a.country,
        })
        .collect();
    let books = db
        .query_library_books()?
        .into_iter()
        .map(|b| LibraryBookEntry {
            title: b.title,
            author_name: b.author_name,
        })
        .collect();
    Ok(LibraryPayload { authors, books })
}

pub(crate) async fn get(settings: web::Data<Config>) -> crate::ServerResult {
    let catalog = &settings.catalog;

    if let Some(payload) = catalog.library_cache().get().await {
        return Ok(HttpResponse::Ok().json(payload));
    }

    let mut db_guard = catalog.get_db().await?;
    let db = db_guard.as_mut().unwrap();
    db.clear_queries();

    let payload = load_library(db);
    let flushed = catalog.query_log().append(&db.take_queries());
    drop(db_guard);

    let payload = payload?;
    flushed?;

    catalog.library_cache().set(payload.clone()).await;
    Ok(HttpResponse::Ok().json(payload))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};

    use crate::test_util::{seeded_config, read_csv};

    #[actix_web::test]
    async fn test_library_listing_shape() {
        let (_dir, data) = seeded_config().await;
        let app = test::init_service(
            App::new()
                .app_data(data.clone())
                .route("/library", web::get().to(super::get)),
        )
        .await;

        let req = test::TestRequest::get().uri("/library").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let authors = body["authors"].as_array().unwrap();
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0]["name"], "Ursula K. Le Guin");
        assert_eq!(authors[0]["country"], "United States");

        let books = body["books"].as_array().unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0]["title"], "The Dispossessed");
        assert_eq!(books[0]["author_name"], "Ursula K. Le Guin");
    }

    #[actix_web::test]
    async fn test_cache_hit_skips_database() {
        let (dir, data) = seeded_config().await;
        let app = test::init_service(
            App::new()
                .app_data(data.clone())
                .route("/library", web::get().to(super::get)),
        )
        .await;

        let req = test::TestRequest::get().uri("/library").to_request();
        let first: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let csv_after_first = read_csv(&dir);
        assert!(csv_after_first.starts_with("SQL,Time\n"));

        // Second request is a cache hit: identical payload, no new CSV rows
        let req = test::TestRequest::get().uri("/library").to_request();
        let second: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(first, second);
        assert_eq!(read_csv(&dir), csv_after_first);
    }
}
