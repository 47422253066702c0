use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{delete, get, patch, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::Store;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::require_auth;
use crate::services::{AdminService, PropertyService, ProposalService, ServiceError, SessionService};

/// Shared, cheaply cloneable request state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub store: Arc<dyn Store>,
    pub properties: PropertyService,
    pub proposals: ProposalService,
    pub sessions: SessionService,
    pub admins: AdminService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        let tokens = Arc::new(TokenService::new(&config.security.jwt_secret));

        Self {
            properties: PropertyService::new(store.clone()),
            proposals: ProposalService::new(store.clone()),
            sessions: SessionService::new(store.clone(), tokens.clone()),
            admins: AdminService::new(store.clone(), config.security.bcrypt_cost),
            config: Arc::new(config),
            tokens,
            store,
        }
    }

    /// HTTP form of a domain error under the configured detail policy.
    pub fn error(&self, err: ServiceError) -> ApiError {
        ApiError::from_service(err, self.config.security.expose_error_detail)
    }
}

pub fn app(state: AppState) -> Router {
    let auth = from_fn_with_state(state.tokens.clone(), require_auth);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/imoveis", get(public::properties::list))
        .route("/imoveis/destaques", get(public::properties::featured))
        .route("/imoveis/pesquisa/:termo", get(public::properties::search))
        .route("/imoveis/:id", get(public::properties::show))
        .route("/admins/login", post(public::session::admin_login))
        .route("/clientes/login", post(public::session::customer_login))
        .route("/propostas", post(public::proposals::create))
        .route("/propostas/:id", get(public::proposals::by_customer))
        // Protected
        .route("/imoveis", post(protected::properties::create).layer(auth.clone()))
        .route(
            "/imoveis/:id",
            put(protected::properties::update)
                .patch(protected::properties::update)
                .layer(auth.clone()),
        )
        .route("/imoveis/:id", delete(protected::properties::remove).layer(auth.clone()))
        .route(
            "/admins",
            get(protected::admins::list)
                .post(protected::admins::create)
                .layer(auth.clone()),
        )
        .route("/admins/:id", get(protected::admins::show).layer(auth.clone()))
        .route("/propostas", get(protected::proposals::list).layer(auth.clone()))
        .route("/propostas/:id", patch(protected::proposals::reply).layer(auth))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "LM Aluguéis API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "imoveis": "/imoveis, /imoveis/destaques, /imoveis/pesquisa/:termo, /imoveis/:id",
            "admins": "/admins/login (public), /admins[/:id] (protected)",
            "clientes": "/clientes/login",
            "propostas": "POST /propostas, GET /propostas/:clienteId (public), GET /propostas, PATCH /propostas/:id (protected)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            ApiError::service_unavailable("Banco de dados indisponível").into_response()
        }
    }
}
