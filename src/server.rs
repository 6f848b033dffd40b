//! # Server Configuration
//!
//! This module contains the server setup and configuration for the Floorplan
//! API.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, patch},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::handlers::{self, tables};
use crate::repositories::TableRepository;
use crate::service::TableService;
use crate::telemetry;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    /// Builds the table lifecycle service over the SeaORM-backed store.
    pub fn table_service(&self) -> TableService {
        TableService::new(Arc::new(TableRepository::new(Arc::new(self.db.clone()))))
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route(
            "/tables",
            get(tables::list_tables).post(tables::create_table),
        )
        .route("/tables/available", get(tables::list_available_tables))
        .route(
            "/tables/by-status/{status}",
            get(tables::list_tables_by_status),
        )
        .route(
            "/tables/{id}",
            get(tables::get_table)
                .put(tables::update_table)
                .delete(tables::delete_table),
        )
        .route("/tables/{id}/status", patch(tables::update_table_status))
        .layer(middleware::from_fn(telemetry::trace_context_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;
    let profile = config.profile.clone();

    let state = AppState::new(db, Arc::new(config));
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Registers the bearer scheme referenced by the staff-only endpoints.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz,
        crate::handlers::tables::list_tables,
        crate::handlers::tables::list_available_tables,
        crate::handlers::tables::list_tables_by_status,
        crate::handlers::tables::create_table,
        crate::handlers::tables::get_table,
        crate::handlers::tables::update_table,
        crate::handlers::tables::update_table_status,
        crate::handlers::tables::delete_table,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::TableStatus,
            crate::handlers::HealthResponse,
            crate::handlers::tables::TableInfo,
            crate::handlers::tables::TablesResponse,
            crate::handlers::tables::CreateTableRequest,
            crate::handlers::tables::UpdateTableRequest,
            crate::handlers::tables::StatusUpdateRequest,
            crate::error::ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Floorplan API",
        description = "API for managing restaurant tables",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
