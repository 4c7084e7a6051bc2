//! HTTP routes — build listing, build detail, node redirects, static assets.

pub mod api;

use std::sync::Arc;

use axum::extract::{OriginalUri, Path, RawQuery, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::PkgstatusConfig;
use crate::error::Error;
use crate::models::build::Build;
use crate::services::redirect::{self, NodeRequest, RedirectMode};
use crate::services::{build_service, filter};
use crate::store::RecordStore;

/// Shared state for route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub config: PkgstatusConfig,
    pub redirect_mode: RedirectMode,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, config: PkgstatusConfig) -> Self {
        let redirect_mode = RedirectMode::from_prefix(config.proxy_server.as_deref());
        Self {
            store,
            config,
            redirect_mode,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        // Listing
        .route("/", get(builds_page))
        .route("/builds", get(builds_page))
        .route("/api/1/builds", get(api_builds))
        // Detail
        .route("/builds/{buildid}", get(build_detail))
        .route("/api/1/builds/{buildid}", get(build_detail))
        // Node redirects
        .route("/{server}/", get(node_root))
        .route("/{server}/{*uri}", get(node_path))
        .nest_service("/static", static_files)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

// ── Listing ──

async fn list(
    state: &AppState,
    raw_query: Option<String>,
) -> Result<(Vec<Build>, filter::FilterEcho), Error> {
    let params = url::form_urlencoded::parse(raw_query.as_deref().unwrap_or("").as_bytes());
    let resolved = filter::resolve(params);

    let builds = build_service::list_builds(
        state.store.as_ref(),
        state.config.store_timeout,
        &resolved.query,
        &resolved.projection,
    )
    .await?;
    Ok((builds, resolved.echo))
}

async fn builds_page(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<api::BuildsPage>, Error> {
    let (builds, filter) = list(&state, raw_query).await?;
    Ok(Json(api::BuildsPage::new(builds, filter)))
}

async fn api_builds(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<api::BuildsJson>, Error> {
    let (builds, filter) = list(&state, raw_query).await?;
    Ok(Json(api::BuildsJson { builds, filter }))
}

// ── Detail ──

async fn build_detail(
    State(state): State<AppState>,
    Path(build_id): Path<String>,
) -> Result<Json<api::BuildDetailJson>, Error> {
    build_service::get_build(state.store.as_ref(), state.config.store_timeout, &build_id)
        .await
        .map(|detail| Json(detail.into()))
}

// ── Node redirects ──

async fn node_root(
    State(state): State<AppState>,
    Path(server): Path<String>,
    OriginalUri(original): OriginalUri,
) -> Result<Response, Error> {
    redirect_to_node(&state, &server, &original).await
}

async fn node_path(
    State(state): State<AppState>,
    Path((server, _uri)): Path<(String, String)>,
    OriginalUri(original): OriginalUri,
) -> Result<Response, Error> {
    redirect_to_node(&state, &server, &original).await
}

/// The sub-path is taken from the raw request path; the decoded `{*uri}`
/// capture would lose escapes such as `%3F`.
async fn redirect_to_node(
    state: &AppState,
    server: &str,
    original: &Uri,
) -> Result<Response, Error> {
    let request = NodeRequest::from_raw_path(server, original.path(), original.query());
    let target = redirect::resolve_target(
        state.store.as_ref(),
        state.config.store_timeout,
        &state.redirect_mode,
        &request,
    )
    .await?;
    Ok((StatusCode::FOUND, [(header::LOCATION, target)]).into_response())
}
