use crate::catalog::{self, CatalogEntry, NO_FILTER};
use crate::config::Config;
use crate::download;
use crate::error::CatalogError;
use crate::kind::MediaKind;
use axum::{
    extract::Query,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::get,
    Extension, Router,
};
use hyper::Server;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

const CACHE_CONTROL_VALUE: &str = "no-store, no-cache, must-revalidate";

/// Query parameters of the legacy endpoint. All optional; defaults follow
/// the PHP server the embedded client was built against.
#[derive(Debug, Deserialize)]
pub struct CatalogParams {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "char")]
    filter: Option<String>,
    download: Option<String>,
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "msx-catalog",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Root route with usage information, mirroring the legacy server's index.
async fn index() -> &'static str {
    "MSX Catalog Server - Single API Endpoint\n\
     Endpoint: /index2.php/\n\
     Parameters:\n\
     \x20 - type=ROM (default) | DSK\n\
     \x20 - char=a (shows all) | any_text (filters by name, case-insensitive)\n\
     \x20 - download=N (sends catalog entry N with a metadata header)\n\
     Examples:\n\
     \x20 - /index2.php/?type=ROM&char=a (shows all .rom files)\n\
     \x20 - /index2.php/?type=DSK&char=moon (shows .dsk files with 'moon' in name)\n\
     \x20 - /index2.php/?type=ROM&char=a&download=0 (downloads the first ROM)\n\
     Format: Tab-separated game names and sizes\n"
}

/// Catch-all for any other path, matching the legacy server's 404 text.
async fn catch_all(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    (
        StatusCode::NOT_FOUND,
        format!("404 - Path not found: /{path}\nOnly /index2.php/ is supported"),
    )
        .into_response()
}

/// Renders the plain-text listing body: one `name\tsize` line per entry,
/// or the fixed `No files found` line for an empty catalog.
pub fn render_listing(entries: &[CatalogEntry]) -> String {
    if entries.is_empty() {
        return "No files found\t0\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        out.push_str(&entry.display_name);
        out.push('\t');
        out.push_str(&entry.size_bytes.to_string());
        out.push('\n');
    }
    out
}

fn listing_response(body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::EXPIRES, "0"),
            (header::CACHE_CONTROL, CACHE_CONTROL_VALUE),
        ],
        body,
    )
        .into_response()
}

fn download_response(payload: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/octet-stream"),
            (header::EXPIRES, "0"),
            (header::CACHE_CONTROL, CACHE_CONTROL_VALUE),
        ],
        payload,
    )
        .into_response()
}

/// Maps the error taxonomy onto HTTP status categories: unsupported kind
/// and bad index are client errors, missing directory and a lost race are
/// not-found, everything else is a server error.
fn error_response(err: &CatalogError) -> Response {
    let status = match err {
        CatalogError::UnsupportedKind(_) | CatalogError::IndexOutOfRange { .. } => {
            StatusCode::BAD_REQUEST
        }
        CatalogError::DirectoryUnavailable | CatalogError::ResolutionMismatch(_) => {
            StatusCode::NOT_FOUND
        }
        CatalogError::FileRead(_) | CatalogError::Io(_) | CatalogError::Config(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error!(%err, status = %status, "request failed");
    (status, format!("Error: {err}")).into_response()
}

/// The legacy endpoint: lists the catalog, or serves one entry when a
/// numeric `download` index is present.
async fn directory_listing(
    Extension(config): Extension<Arc<Config>>,
    Query(params): Query<CatalogParams>,
) -> Response {
    let kind_token = params.kind.unwrap_or_else(|| "ROM".to_string());
    let filter = params.filter.unwrap_or_else(|| NO_FILTER.to_string());
    // Only an all-digit download value switches to download mode; anything
    // else (missing, negative, junk) falls back to listing, like the
    // original's isdigit() gate.
    let download = params
        .download
        .as_deref()
        .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|d| d.parse::<usize>().ok());

    info!(kind = %kind_token, filter = %filter, download = ?download, "api request");

    let kind: MediaKind = match kind_token.parse() {
        Ok(kind) => kind,
        Err(err) => return error_response(&err),
    };

    let dir = config.serve_dir.clone();
    let outcome = tokio::task::spawn_blocking(move || match download {
        Some(index) => {
            let record = download::resolve(&dir, kind, &filter, index)?;
            download::package(kind, &record)
        }
        None => {
            let entries = catalog::build_catalog(&dir, kind, &filter)?;
            Ok(render_listing(&entries).into_bytes())
        }
    })
    .await;

    match outcome {
        Ok(Ok(payload)) => {
            if download.is_some() {
                download_response(payload)
            } else {
                // The blocking task returns bytes either way; listing bodies
                // are valid UTF-8 by construction.
                listing_response(String::from_utf8_lossy(&payload).into_owned())
            }
        }
        Ok(Err(err)) => error_response(&err),
        Err(join_err) => {
            error!(error = %join_err, "catalog task panicked");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error: internal failure").into_response()
        }
    }
}

/// Create the HTTP server with all routes.
pub fn create_server(config: Arc<Config>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        // The embedded client requests the trailing-slash form; accept both.
        .route("/index2.php", get(directory_listing))
        .route("/index2.php/", get(directory_listing))
        .fallback(catch_all)
        .layer(Extension(config))
        .layer(ServiceBuilder::new().layer(cors))
}

/// Start the HTTP server on the configured port
pub async fn start_server(config: Arc<Config>) -> Result<(), Box<dyn std::error::Error>> {
    let port = config.port;
    let app = create_server(config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    println!("🚀 HTTP server running on http://localhost:{port}");
    println!("💚 Health check: http://localhost:{port}/health");
    println!("🕹️  Catalog API:  http://localhost:{port}/index2.php/");

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}
