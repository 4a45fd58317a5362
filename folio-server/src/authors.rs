//! Author lookup, filtered listings, aggregates, and per-country rollups.
//!
//! Request dispatch mirrors the parameter precedence of the `/authors`
//! endpoint: an `id` lookup wins over a `name` lookup, which wins over the
//! filtered flows; any `aggregate` tokens select the aggregate response,
//! otherwise any `annotate` tokens select the rollup response, otherwise
//! the filtered author list is returned.

use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use folio_db::{
    AggregateValue, Author, AuthorAggregate, AuthorFilter, CatalogDb, CountryAnnotation,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::Config;
use crate::error::Result;

#[derive(Debug, Default, Deserialize)]
pub struct Param {
    /// Author row id; kept as a string so `?id=` falls through like any
    /// other empty parameter instead of failing in the extractor
    id: Option<String>,
    name: Option<String>,
    country: Option<String>,
    exclude_name: Option<String>,
    exclude_country: Option<String>,
    /// Comma-separated aggregate names
    aggregate: Option<String>,
    /// Comma-separated annotation names
    annotate: Option<String>,
}

#[derive(Debug, Serialize)]
struct AuthorBody {
    id: i64,
    name: String,
    birth_date: NaiveDate,
    country: String,
}

impl From<Author> for AuthorBody {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
            birth_date: author.birth_date,
            country: author.country,
        }
    }
}

fn missing_author(field: &str) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "error": format!("Author with the specified {field} does not exist.")
    }))
}

/// Treat an empty parameter value as absent, so `?name=` selects the
/// filtered listing rather than a lookup for the empty string.
fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| !value.is_empty())
}

/// Split a comma-separated parameter into trimmed tokens.
///
/// Whitespace-only tokens are kept (they still select the response shape)
/// but never match an aggregate or annotation name.
fn split_tokens(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or("")
        .split(',')
        .filter(|token| !token.is_empty())
        .map(|token| token.trim().to_owned())
        .collect()
}

fn aggregate_json(value: AggregateValue) -> serde_json::Value {
    match value {
        AggregateValue::Count(count) => json!(count),
        AggregateValue::Average(average) => json!(average),
        AggregateValue::Date(date) => json!(date),
    }
}

fn respond(db: &CatalogDb, param: &Param) -> Result<HttpResponse> {
    if let Some(raw_id) = non_empty(param.id.as_deref()) {
        // A non-numeric id matches nothing
        let author = match raw_id.parse::<i64>() {
            Ok(id) => db.query_author(id)?,
            Err(_) => None,
        };
        return Ok(match author {
            Some(author) => HttpResponse::Ok().json(json!({"author": AuthorBody::from(author)})),
            None => missing_author("id"),
        });
    }

    if let Some(name) = non_empty(param.name.as_deref()) {
        return Ok(match db.query_author_by_name(name)? {
            Some(author) => HttpResponse::Ok().json(json!({"author": AuthorBody::from(author)})),
            None => missing_author("name"),
        });
    }

    let filter = AuthorFilter {
        country: non_empty(param.country.as_deref()).map(str::to_owned),
        exclude_country: non_empty(param.exclude_country.as_deref()).map(str::to_owned),
        exclude_name: non_empty(param.exclude_name.as_deref()).map(str::to_owned),
    };

    let aggregate_tokens = split_tokens(param.aggregate.as_deref());
    if !aggregate_tokens.is_empty() {
        let aggregates: Vec<AuthorAggregate> = aggregate_tokens
            .iter()
            .filter_map(|token| AuthorAggregate::parse(token))
            .collect();

        let mut body = serde_json::Map::new();
        for (aggregate, value) in db.aggregate_authors(&filter, &aggregates)? {
            body.insert(aggregate.key().to_owned(), aggregate_json(value));
        }
        return Ok(HttpResponse::Ok().json(json!({"aggregate": body})));
    }

    let annotate_tokens = split_tokens(param.annotate.as_deref());
    if !annotate_tokens.is_empty() {
        let annotations: Vec<CountryAnnotation> = annotate_tokens
            .iter()
            .filter_map(|token| CountryAnnotation::parse(token))
            .collect();

        let rollups = db.annotate_by_country(&filter, &annotations)?;
        let rows: Vec<serde_json::Value> = rollups
            .into_iter()
            .map(|rollup| {
                let mut row = serde_json::Map::new();
                row.insert("country".to_owned(), json!(rollup.country));
                if let Some(count) = rollup.book_count {
                    row.insert("book_count".to_owned(), json!(count));
                }
                if let Some(count) = rollup.author_count {
                    row.insert("country_count".to_owned(), json!(count));
                }
                serde_json::Value::Object(row)
            })
            .collect();
        return Ok(HttpResponse::Ok().json(json!({"annotated_authors": rows})));
    }

    let authors: Vec<AuthorBody> = db
        .list_authors(&filter)?
        .into_iter()
        .map(AuthorBody::from)
        .collect();
    Ok(HttpResponse::Ok().json(json!({"authors": authors})))
}

pub(crate) async fn get(
    param: web::Query<Param>,
    settings: web::Data<Config>,
) -> crate::ServerResult {
    let catalog = &settings.catalog;

    let mut db_guard = catalog.get_db().await?;
    let db = db_guard.as_mut().unwrap();
    db.clear_queries();

    // Flush the statement log even when the request itself failed
    let response = respond(db, &param);
    let flushed = catalog.query_log().append(&db.take_queries());
    drop(db_guard);

    let response = response?;
    flushed?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};

    use crate::test_util::seeded_config;

    async fn request(uri: &str) -> (StatusCode, serde_json::Value) {
        let (_dir, data) = seeded_config().await;
        let app = test::init_service(
            App::new()
                .app_data(data.clone())
                .route("/authors", web::get().to(super::get)),
        )
        .await;

        let req = test::TestRequest::get().uri(uri).to_request();
        let res = test::call_service(&app, req).await;
        let status = res.status();
        let body = test::read_body(res).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[actix_web::test]
    async fn test_lookup_by_id() {
        let (status, body) = request("/authors?id=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["author"]["name"], "Ursula K. Le Guin");
        assert_eq!(body["author"]["birth_date"], "1929-10-21");

        let (status, body) = request("/authors?id=999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"],
            "Author with the specified id does not exist."
        );

        // A non-numeric id matches no author
        let (status, body) = request("/authors?id=abc").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"],
            "Author with the specified id does not exist."
        );
    }

    #[actix_web::test]
    async fn test_empty_params_fall_through_to_listing() {
        // Empty id and name values select the filtered listing, not a
        // lookup for the empty string
        let (status, body) = request("/authors?id=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["authors"].as_array().unwrap().len(), 2);

        let (status, body) = request("/authors?name=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["authors"].as_array().unwrap().len(), 2);

        // Empty filter values apply no filter
        let (status, body) = request("/authors?country=&exclude_name=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["authors"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_lookup_by_name() {
        let (status, body) = request("/authors?name=Stanis%C5%82aw%20Lem").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["author"]["country"], "Poland");

        let (status, body) = request("/authors?name=Nobody").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"],
            "Author with the specified name does not exist."
        );
    }

    #[actix_web::test]
    async fn test_id_takes_precedence_over_name() {
        let (status, body) = request("/authors?id=2&name=Nobody").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["author"]["name"], "Stanisław Lem");
    }

    #[actix_web::test]
    async fn test_filtered_listing() {
        let (status, body) = request("/authors").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["authors"].as_array().unwrap().len(), 2);

        let (_, body) = request("/authors?country=Poland").await;
        let authors = body["authors"].as_array().unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0]["name"], "Stanisław Lem");

        let (_, body) = request("/authors?exclude_country=Poland").await;
        let authors = body["authors"].as_array().unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0]["country"], "United States");
    }

    #[actix_web::test]
    async fn test_aggregates() {
        let (status, body) = request("/authors?aggregate=count,min_birth_date").await;
        assert_eq!(status, StatusCode::OK);
        let aggregate = body["aggregate"].as_object().unwrap();
        assert_eq!(aggregate["count"], 2);
        assert_eq!(aggregate["min_birth_date"], "1921-09-12");
        assert!(!aggregate.contains_key("max_birth_date"));
    }

    #[actix_web::test]
    async fn test_unknown_aggregate_tokens_are_skipped() {
        let (status, body) = request("/authors?aggregate=count,no_such_thing").await;
        assert_eq!(status, StatusCode::OK);
        let aggregate = body["aggregate"].as_object().unwrap();
        assert_eq!(aggregate.len(), 1);
        assert_eq!(aggregate["count"], 2);

        // A token list with no valid names still selects the aggregate shape
        let (status, body) = request("/authors?aggregate=bogus").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["aggregate"].as_object().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_annotations() {
        let (status, body) = request("/authors?annotate=book_count,country_count").await;
        assert_eq!(status, StatusCode::OK);
        let rows = body["annotated_authors"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["country"], "Poland");
        assert_eq!(rows[0]["book_count"], 1);
        assert_eq!(rows[0]["country_count"], 1);
        assert_eq!(rows[1]["country"], "United States");
        assert_eq!(rows[1]["book_count"], 1);
    }

    #[actix_web::test]
    async fn test_aggregate_takes_precedence_over_annotate() {
        let (_, body) = request("/authors?aggregate=count&annotate=book_count").await;
        assert!(body.get("aggregate").is_some());
        assert!(body.get("annotated_authors").is_none());
    }
}
