use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    routing::{delete, get},
    Json, Router,
};
use shared::{
    domain::{EntityId, EntityKind},
    error::{ApiError, ErrorCode},
    protocol::{CreateEntityRequest, Entity},
};
use storage::Storage;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::{create_entity, delete_entity, list_entities, ApiContext};
use app_state::AppState;
use config::{load_settings, prepare_database_url};

const MAX_BODY_BYTES: usize = 64 * 1024;

type HttpResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            error = %format!("{error:#}"),
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;
    info!(%database_url, "database and collections are set up");

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state), &settings.allowed_origin)?;

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, allowed_origin = %settings.allowed_origin, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, allowed_origin: &str) -> anyhow::Result<Router> {
    Ok(Router::new()
        .route("/healthz", get(healthz))
        .route(
            "/api/:collection",
            get(http_list_entities).post(http_create_entity),
        )
        .route("/api/:collection/:id", delete(http_delete_entity))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors_layer(allowed_origin)?)
        .with_state(state))
}

fn cors_layer(allowed_origin: &str) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);
    let allowed_origin = allowed_origin.trim();
    if allowed_origin == "*" {
        return Ok(layer.allow_origin(Any));
    }
    let origin = HeaderValue::from_str(allowed_origin)
        .with_context(|| format!("invalid CORS origin '{allowed_origin}'"))?;
    Ok(layer.allow_origin(origin))
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, StatusCode> {
    state.api.storage.health_check().await.map_err(|err| {
        warn!(error = %format!("{err:#}"), "health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    Ok("ok")
}

async fn http_list_entities(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
) -> HttpResult<Json<Vec<Entity>>> {
    let kind = entity_kind(&collection)?;
    let entities = list_entities(&state.api, kind).await.map_err(failure)?;
    Ok(Json(entities))
}

async fn http_create_entity(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
    payload: Result<Json<CreateEntityRequest>, JsonRejection>,
) -> HttpResult<Json<Entity>> {
    let kind = entity_kind(&collection)?;
    let Json(req) = payload.map_err(|rejection| {
        warn!(kind = kind.label(), %rejection, "rejected create request");
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        (
            status,
            Json(ApiError::new(
                ErrorCode::Validation,
                format!("request body must be JSON with a 'text' string: {rejection}"),
            )),
        )
    })?;
    info!(kind = kind.label(), text = %req.text, "received entity data");
    let entity = create_entity(&state.api, kind, &req.text)
        .await
        .map_err(failure)?;
    Ok(Json(entity))
}

async fn http_delete_entity(
    State(state): State<Arc<AppState>>,
    Path((collection, id)): Path<(String, String)>,
) -> HttpResult<StatusCode> {
    let kind = entity_kind(&collection)?;
    delete_entity(&state.api, kind, &EntityId(id))
        .await
        .map_err(failure)?;
    Ok(StatusCode::NO_CONTENT)
}

fn entity_kind(collection: &str) -> HttpResult<EntityKind> {
    EntityKind::from_collection(collection).ok_or_else(|| {
        failure(ApiError::new(
            ErrorCode::NotFound,
            format!("unknown collection '{collection}'"),
        ))
    })
}

fn failure(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/client_sync_tests.rs"]
mod client_sync_tests;
