mod clients;
mod config;
mod merge;
mod net;
mod normalize;
mod places;
mod search;
mod types;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::QueryRejection, ConnectInfo, Query, State},
    http::{header, HeaderValue, Method, Request},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use clients::{get_reqwest_client, init_reqwest_client};
use config::Config;
use net::response::{ResponseError, Result};
use normalize::Normalizer;
use places::{GooglePlaces, PlacesProvider};
use search::{search_places, SearchRequest};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use types::dto::search::{SearchParams, SearchResponse};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub places: Arc<dyn PlacesProvider>,
}

impl AppState {
    pub fn new(config: Config, places: Arc<dyn PlacesProvider>) -> Self {
        Self {
            config: Arc::new(config),
            places,
        }
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    // initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!(?config, "Loaded configuration");
    init_reqwest_client(config.upstream_timeout)?;

    let places = Arc::new(GooglePlaces::new(&config, get_reqwest_client()?.clone()));
    let port = config.port;
    let app = build_router(AppState::new(config, places))?;

    info!("Running on port {port}");

    axum::Server::bind(&SocketAddr::from(([0, 0, 0, 0], port)))
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await?;

    Ok(())
}

pub fn build_router(state: AppState) -> color_eyre::Result<Router> {
    let origins = state
        .config
        .allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Router::new()
        .route("/api/search-cafes", get(search_cafes))
        .route("/health", get(health))
        .layer(middleware::from_fn(log_client))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST])
                .allow_credentials(true),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

#[instrument(skip(state))]
#[axum::debug_handler]
async fn search_cafes(
    State(state): State<AppState>,
    query: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<Response> {
    let Query(params) = query.map_err(|rejection| {
        ResponseError::bad_request("Invalid search parameters", rejection.body_text())
    })?;
    let request = SearchRequest::try_from(params)?;
    let normalizer = Normalizer::new(&state.config);
    let results = search_places(
        state.places.as_ref(),
        &request,
        state.config.merge_key,
        &normalizer,
    )
    .await?;

    // Photo urls carry the api key
    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(SearchResponse::ok(results)),
    )
        .into_response())
}

async fn health() -> &'static str {
    "ok"
}

/// Log who is searching. Behind a reverse proxy the first `X-Forwarded-For`
/// hop is the client.
async fn log_client<B>(
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request<B>,
    next: Next<B>,
) -> Response {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());
    let client = forwarded
        .or_else(|| connect_info.map(|ConnectInfo(addr)| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string());
    info!(client = %client, path = %request.uri().path(), "Request received");
    next.run(request).await
}
