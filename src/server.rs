//! HTTP surface.
//!
//! | Method | Path | Query | Response |
//! |---|---|---|---|
//! | GET | `/` | - | Home page listing roots |
//! | GET/POST | `/dir/<root>/` | `filter` | Gallery of the root's top level |
//! | GET/POST | `/dir/<root>/<subdir>/` | `filter` | Gallery of a subdirectory |
//! | GET | `/img/<root>/<file>` | `w`, `h` | JPEG thumbnail, or the original file |
//!
//! Gallery URLs without a trailing slash redirect to the slashed form so the
//! relative `..` folder link resolves one level up.
//!
//! Filesystem listing and image decoding are blocking work and run on
//! `spawn_blocking` threads; each request decodes into its own buffers.

use crate::config::GalleryConfig;
use crate::imaging::{self, BackendError, RustBackend, ThumbnailConfig};
use crate::listing::{self, ListingError};
use crate::render;
use crate::roots::{RootError, RootRegistry};
use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, Path as AxumPath, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::io::ReaderStream;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Process-wide, read-only request context.
pub struct AppState {
    pub roots: RootRegistry,
    pub config: GalleryConfig,
    pub backend: RustBackend,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(roots: RootRegistry, config: GalleryConfig) -> Self {
        Self {
            roots,
            config,
            backend: RustBackend::new(),
        }
    }

    fn thumbnail_config(&self) -> ThumbnailConfig {
        ThumbnailConfig {
            quality: imaging::Quality::new(self.config.thumbnails.quality),
        }
    }
}

#[derive(Error, Debug)]
pub enum ServeError {
    #[error(transparent)]
    Root(#[from] RootError),
    #[error(transparent)]
    Listing(#[from] ListingError),
    #[error("Image could not be produced: {0}")]
    Image(#[from] BackendError),
    #[error("Not a file")]
    NotAFile,
    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn root_status(err: &RootError) -> StatusCode {
    match err {
        RootError::UnknownRoot(_) | RootError::NotFound(_) => StatusCode::NOT_FOUND,
        RootError::OutsideRoot { .. } => StatusCode::FORBIDDEN,
        RootError::Io(e) => io_status(e),
    }
}

fn io_status(err: &std::io::Error) -> StatusCode {
    match err.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::Root(e) => root_status(e),
            ServeError::Listing(ListingError::Root(e)) => root_status(e),
            ServeError::Listing(ListingError::InvalidFilter(_)) => StatusCode::BAD_REQUEST,
            ServeError::Listing(ListingError::NotADirectory(_)) => StatusCode::NOT_FOUND,
            ServeError::Listing(ListingError::Io(e)) => io_status(e),
            ServeError::Image(_) | ServeError::NotAFile => StatusCode::NOT_FOUND,
            ServeError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServeError::Io(e) => io_status(e),
        }
    }

    /// Client-facing message. Never includes paths or internal error text,
    /// except the regex error, which only echoes the client's own pattern.
    fn public_message(&self) -> String {
        match self {
            ServeError::Listing(ListingError::InvalidFilter(e)) => {
                format!("Invalid filter pattern: {e}")
            }
            _ => match self.status() {
                StatusCode::NOT_FOUND => "Not found.".to_string(),
                StatusCode::FORBIDDEN => "Access denied.".to_string(),
                _ => "Internal server error.".to_string(),
            },
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        } else {
            debug!("Request rejected ({status}): {self}");
        }
        let page = render::render_error(status.as_u16(), &self.public_message());
        (status, Html(page.into_string())).into_response()
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct GalleryQuery {
    filter: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ImageQuery {
    w: Option<String>,
    h: Option<String>,
}

impl ImageQuery {
    /// The requested bounding box, if both dimensions are positive integers.
    fn bounding_box(&self) -> Option<(u32, u32)> {
        let parse = |v: &Option<String>| {
            v.as_deref()
                .and_then(|s| s.trim().parse::<u32>().ok())
                .filter(|&n| n > 0)
        };
        Some((parse(&self.w)?, parse(&self.h)?))
    }
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/dir/{root}", get(add_trailing_slash).post(add_trailing_slash))
        .route("/dir/{root}/", get(root_gallery_handler).post(root_gallery_handler))
        .route("/dir/{root}/{*subdir}", get(gallery_handler).post(gallery_handler))
        .route("/img/{root}/{*filepath}", get(image_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home_handler(State(state): State<SharedState>) -> Html<String> {
    let folders = listing::home_folders(&state.roots);
    Html(render::render_home(&folders).into_string())
}

async fn add_trailing_slash(OriginalUri(uri): OriginalUri) -> Redirect {
    let target = match uri.query() {
        Some(q) => format!("{}/?{}", uri.path(), q),
        None => format!("{}/", uri.path()),
    };
    Redirect::permanent(&target)
}

async fn root_gallery_handler(
    State(state): State<SharedState>,
    AxumPath(root): AxumPath<String>,
    Query(query): Query<GalleryQuery>,
) -> Result<Html<String>, ServeError> {
    render_gallery_page(state, root, None, query).await
}

async fn gallery_handler(
    State(state): State<SharedState>,
    AxumPath((root, subdir)): AxumPath<(String, String)>,
    Query(query): Query<GalleryQuery>,
    original: OriginalUri,
) -> Result<Response, ServeError> {
    if !subdir.ends_with('/') {
        return Ok(add_trailing_slash(original).await.into_response());
    }
    let page = render_gallery_page(state, root, Some(subdir), query).await?;
    Ok(page.into_response())
}

async fn render_gallery_page(
    state: SharedState,
    root: String,
    subdir: Option<String>,
    query: GalleryQuery,
) -> Result<Html<String>, ServeError> {
    let filter = listing::compile_filter(query.filter.as_deref())?;
    let title = match &subdir {
        Some(s) => format!("{}/{}", root, s.trim_end_matches('/')),
        None => root.clone(),
    };

    let gallery = tokio::task::spawn_blocking(move || {
        listing::list_directory(
            &state.roots,
            &state.backend,
            &state.config.display,
            &root,
            subdir.as_deref(),
            filter.as_ref(),
        )
    })
    .await??;

    let page = render::render_gallery(&title, &gallery, query.filter.as_deref());
    Ok(Html(page.into_string()))
}

async fn image_handler(
    State(state): State<SharedState>,
    AxumPath((root, filepath)): AxumPath<(String, String)>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, ServeError> {
    let lookup_state = Arc::clone(&state);
    let source = tokio::task::spawn_blocking(move || -> Result<PathBuf, ServeError> {
        let resolved = lookup_state.roots.resolve(&root, Some(&filepath))?;
        if !resolved.path.is_file() {
            return Err(ServeError::NotAFile);
        }
        Ok(resolved.path)
    })
    .await??;

    let Some((width, height)) = query.bounding_box() else {
        return serve_original(&source).await;
    };

    let worker_state = Arc::clone(&state);
    let worker_source = source.clone();
    let result = tokio::task::spawn_blocking(move || {
        imaging::create_thumbnail(
            &worker_state.backend,
            &worker_source,
            width,
            height,
            &worker_state.thumbnail_config(),
        )
    })
    .await?;

    match result {
        Ok(thumb) => Ok((
            [(header::CONTENT_TYPE, HeaderValue::from_static(thumb.content_type))],
            thumb.data,
        )
            .into_response()),
        Err(e) => {
            error!(
                "Failed to create {}x{} thumbnail of {}: {:?}",
                width,
                height,
                source.display(),
                e
            );
            Err(ServeError::Image(e))
        }
    }
}

/// Stream a file unchanged with a MIME type guessed from its extension.
async fn serve_original(path: &Path) -> Result<Response, ServeError> {
    let file = tokio::fs::File::open(path).await?;
    let len = file.metadata().await?.len();
    let mime_type = mime_guess::from_path(path).first_or_octet_stream();

    let stream = ReaderStream::with_capacity(file, 1 << 16);
    let headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_str(mime_type.as_ref())
                .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
        ),
        (header::CONTENT_LENGTH, HeaderValue::from(len)),
    ];
    Ok((StatusCode::OK, headers, Body::from_stream(stream)).into_response())
}
