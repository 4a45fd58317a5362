#![warn(clippy::dbg_macro)]

use std::fmt::Display;
use std::time::Duration;

use actix_web::{App, HttpResponse, HttpServer, middleware, web};

use error::{CatalogError, IoErrorContext, Result};

mod authors;
mod books;
mod cache;
mod catalog;
mod config;
mod error;
mod health;
mod library;
mod querylog;
mod version;

#[cfg(test)]
mod test_util;

const CARGO_NAME: &str = env!("CARGO_PKG_NAME");
const CARGO_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug)]
struct ServerError {
    err: CatalogError,
}

impl Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.err)
    }
}

impl actix_web::error::ResponseError for ServerError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({"error": self.err.to_string()}))
    }
}

impl From<CatalogError> for ServerError {
    fn from(err: CatalogError) -> ServerError {
        ServerError { err }
    }
}

type ServerResult = std::result::Result<HttpResponse, ServerError>;

async fn inner_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::load()?;

    let c = web::Data::new(config);
    let config_data = c.clone();

    log::info!("listening on {}", c.bind);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Condition::new(
                config_data.enable_compression,
                middleware::Compress::default(),
            ))
            .app_data(config_data.clone())
            .route("/library", web::get().to(library::get))
            .route("/authors", web::get().to(authors::get))
            .route("/books", web::post().to(books::post))
            .route("/books/{book_id}", web::put().to(books::put))
            .route("/books/{book_id}", web::delete().to(books::delete))
            .route("/health", web::get().to(health::get))
            .route("/version", web::get().to(version::get))
    })
    // default is 5 seconds, which is too small when doing mass requests on slow machines
    .client_request_timeout(Duration::from_secs(30))
    .workers(c.workers)
    .max_connection_rate(c.max_connection_rate);

    server
        .bind(c.bind.clone())
        .io_context("Failed to bind server")?
        .run()
        .await
        .io_context("Failed to start server")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    inner_main().await.map_err(std::io::Error::other)
}
