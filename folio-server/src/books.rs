//! Book create, update, and delete endpoints.
//!
//! Bodies are parsed by hand from the raw bytes so malformed JSON yields
//! the endpoint's own `{"error": "Invalid JSON"}` shape rather than the
//! framework default.

use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use folio_db::{BookPatch, CatalogDb, NewBook};
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::error::Result;

#[derive(Debug, Deserialize)]
struct BookBody {
    title: Option<String>,
    published_date: Option<String>,
    author_id: Option<i64>,
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({"error": message}))
}

fn not_found(message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(json!({"error": message}))
}

fn parse_body(bytes: &web::Bytes) -> std::result::Result<BookBody, HttpResponse> {
    serde_json::from_slice(bytes).map_err(|_| bad_request("Invalid JSON"))
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, HttpResponse> {
    raw.parse()
        .map_err(|_| bad_request("Invalid published_date"))
}

fn create(db: &CatalogDb, book: &NewBook) -> Result<HttpResponse> {
    if db.query_author(book.author_id)?.is_none() {
        return Ok(not_found("Author not found"));
    }

    let book_id = db.insert_book(book)?;
    Ok(HttpResponse::Created().json(json!({"message": "Book created", "book_id": book_id})))
}

fn update(db: &CatalogDb, book_id: i64, patch: &BookPatch) -> Result<HttpResponse> {
    if db.query_book(book_id)?.is_none() {
        return Ok(not_found("Book not found"));
    }

    if let Some(author_id) = patch.author_id {
        if db.query_author(author_id)?.is_none() {
            return Ok(not_found("Author not found"));
        }
    }

    db.update_book(book_id, patch)?;
    Ok(HttpResponse::Ok().json(json!({"message": "Book updated", "book_id": book_id})))
}

fn remove(db: &CatalogDb, book_id: i64) -> Result<HttpResponse> {
    if !db.delete_book(book_id)? {
        return Ok(not_found("Book not found"));
    }
    Ok(HttpResponse::Ok().json(json!({"message": "Book deleted", "book_id": book_id})))
}

pub(crate) async fn post(body: web::Bytes, settings: web::Data<Config>) -> crate::ServerResult {
    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(response) => return Ok(response),
    };

    let (Some(title), Some(published_date), Some(author_id)) =
        (body.title, body.published_date, body.author_id)
    else {
        return Ok(bad_request("Missing fields"));
    };

    let published_date = match parse_date(&published_date) {
        Ok(date) => date,
        Err(response) => return Ok(response),
    };

    let book = NewBook {
        title,
        published_date,
        author_id,
    };

    let catalog = &settings.catalog;
    let mut db_guard = catalog.get_db().await?;
    let db = db_guard.as_mut().unwrap();
    db.clear_queries();

    let response = create(db, &book);
    let flushed = catalog.query_log().append(&db.take_queries());
    drop(db_guard);

    let response = response?;
    flushed?;
    Ok(response)
}

pub(crate) async fn put(
    book_id: web::Path<i64>,
    body: web::Bytes,
    settings: web::Data<Config>,
) -> crate::ServerResult {
    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(response) => return Ok(response),
    };

    let published_date = match body.published_date.as_deref().map(parse_date) {
        None => None,
        Some(Ok(date)) => Some(date),
        Some(Err(response)) => return Ok(response),
    };

    let patch = BookPatch {
        title: body.title,
        published_date,
        author_id: body.author_id,
    };

    let catalog = &settings.catalog;
    let mut db_guard = catalog.get_db().await?;
    let db = db_guard.as_mut().unwrap();
    db.clear_queries();

    let response = update(db, book_id.into_inner(), &patch);
    let flushed = catalog.query_log().append(&db.take_queries());
    drop(db_guard);

    let response = response?;
    flushed?;
    Ok(response)
}

pub(crate) async fn delete(
    book_id: web::Path<i64>,
    settings: web::Data<Config>,
) -> crate::ServerResult {
    let catalog = &settings.catalog;
    let mut db_guard = catalog.get_db().await?;
    let db = db_guard.as_mut().unwrap();
    db.clear_queries();

    let response = remove(db, book_id.into_inner());
    let flushed = catalog.query_log().append(&db.take_queries());
    drop(db_guard);

    let response = response?;
    flushed?;
    Ok(response)
}
