//! HTTP surface: router, handlers, serve loop.

use std::net::{IpAddr, SocketAddr};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use platform_api::{ApiError, ApiResult};
use platform_db::{self, DbPool};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{Compensation, Employee, ReportingStructure};
use crate::service::{self, db_error};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
    allowed_origins: Vec<String>,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16, allowed_origins: Vec<String>) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
            allowed_origins,
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state, &config.allowed_origins);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(addr = %config.addr, "org server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/employee", post(create_employee_handler))
        .route(
            "/api/employee/{id}",
            get(get_employee_handler).put(replace_employee_handler),
        )
        .route(
            "/api/employee/{id}/reportingStructure",
            get(reporting_structure_handler),
        )
        .route("/api/compensation", post(create_compensation_handler))
        .route("/api/compensation/{id}", get(get_compensation_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(allowed_origins)),
        )
        .with_state(state)
}

async fn create_employee_handler(
    State(state): State<AppState>,
    Json(body): Json<Employee>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let created = service::create_employee(&state.pool, body).await?;
    debug!(employee_id = ?created.employee_id, "employee created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Employee>> {
    let id = parse_employee_id(&id)?;
    match service::get_employee_by_id(&state.pool, id).await? {
        Some(employee) => Ok(Json(employee)),
        None => Err(ApiError::NotFound),
    }
}

async fn replace_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Employee>,
) -> ApiResult<Json<Employee>> {
    let id = parse_employee_id(&id)?;
    let original = platform_db::find_employee(&state.pool, id)
        .await
        .map_err(db_error)?
        .ok_or(ApiError::NotFound)?;
    let replaced = service::replace_employee(&state.pool, original, body).await?;
    Ok(Json(replaced))
}

async fn reporting_structure_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReportingStructure>> {
    let id = parse_employee_id(&id)?;
    match service::get_reporting_structure(&state.pool, id).await? {
        Some(structure) => Ok(Json(structure)),
        None => Err(ApiError::NotFound),
    }
}

async fn create_compensation_handler(
    State(state): State<AppState>,
    Json(body): Json<Compensation>,
) -> ApiResult<(StatusCode, Json<Compensation>)> {
    debug!(employee = %body.employee, "compensation create request");
    platform_db::find_employee(&state.pool, body.employee)
        .await
        .map_err(db_error)?
        .ok_or(ApiError::NotFound)?;
    let created = service::create_compensation(&state.pool, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_compensation_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Compensation>> {
    let id = parse_employee_id(&id)?;
    match service::get_compensation_by_employee_id(&state.pool, id).await? {
        Some(compensation) => Ok(Json(compensation)),
        None => Err(ApiError::NotFound),
    }
}

/// Malformed identifiers behave like ids with no matching record.
fn parse_employee_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = state.pool.ping().await.is_ok();
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
