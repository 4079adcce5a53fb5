//! Fiscalização de Obras
//!
//! Case-management portal for municipal building-works inspections.
//!
//! ## Features
//!
//! - **Intake**: open inspection cases from citizen complaints and
//!   internal referrals, with inline document attachments
//! - **Investigation**: findings reports, enforcement actions, verified
//!   infractions, photo evidence, scheduled return visits — every change
//!   lands in the case's audit trail
//! - **Reports**: case-list exports (PDF/CSV/XLSX/DOC) and the paginated
//!   per-case dossier

mod config;
mod handlers;
mod lifecycle;
mod models;
mod pdf;
mod presentation;
mod report;
mod store;
mod summary;
mod validation;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use handlers::AppState;
use store::archive::CaseArchive;
use store::memory::InMemoryStore;
use store::users::{SessionStore, UserDirectory};
use summary::Summarizer;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fiscaliza_obras=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Starting Fiscalização de Obras portal");
    tracing::info!("Environment: {:?}", config.environment);

    // Record store (in-memory, with the configured artificial latency)
    let store = Arc::new(InMemoryStore::with_latency(Duration::from_millis(
        config.store_latency_ms,
    )));

    // User directory
    let users = Arc::new(UserDirectory::new());
    if config.seed_demo_accounts {
        users.seed_defaults().await?;
        tracing::info!("Seeded demo accounts");
    }

    // Optional external case archive
    let archive = match config.database_url {
        Some(ref url) => match CaseArchive::connect(url).await {
            Ok(archive) => {
                tracing::info!("Case archive connected");
                Some(Arc::new(archive))
            }
            Err(e) => {
                tracing::error!("Case archive unavailable, continuing without it: {}", e);
                None
            }
        },
        None => None,
    };

    // Create application state
    let state = AppState {
        store,
        users,
        sessions: Arc::new(SessionStore::new(config.session_expiry_hours)),
        archive,
        summarizer: Arc::new(Summarizer::new(
            config.summary_api_key.clone(),
            config.summary_api_url.clone(),
        )),
        session_expiry_hours: config.session_expiry_hours,
        is_production: config.is_production(),
    };

    // Build CORS layer (cookies require explicit origins in production)
    let cors = if config.is_production() {
        CorsLayer::new()
            .allow_origin(
                config
                    .cors_origins
                    .iter()
                    .filter_map(|o| o.parse().ok())
                    .collect::<Vec<_>>(),
            )
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
    } else {
        CorsLayer::permissive()
    };

    // Authenticated endpoints
    let session_routes = Router::new()
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/me", get(handlers::get_session_user))
        .route("/inspections", get(handlers::list_inspections))
        .route("/inspections", post(handlers::create_inspection))
        .route("/inspections/:id", get(handlers::get_inspection))
        .route("/inspections/:id", put(handlers::update_inspection))
        .route("/inspections/:id/photos", post(handlers::add_photo))
        .route("/inspections/:id/follow-ups", post(handlers::add_follow_up))
        .route("/inspections/:id/summary", post(handlers::summarize_report))
        .route("/inspections/:id/report", get(handlers::detail_report))
        .route("/reports/inspections", get(handlers::list_report))
        .route("/presentation", get(handlers::presentation_map))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::require_session,
        ));

    // User management (admin only)
    let admin_routes = Router::new()
        .route("/users", get(handlers::list_users))
        .route("/users", post(handlers::create_user))
        .route("/users/:id", put(handlers::update_user))
        .route("/users/:id", delete(handlers::delete_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::require_admin,
        ));

    let api_routes = Router::new()
        .route("/auth/login", post(handlers::login))
        .merge(session_routes)
        .merge(admin_routes);

    // Build main router
    let app = Router::new()
        .nest("/api", api_routes)
        .nest_service("/", ServeDir::new(&config.frontend_dir))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::security_headers,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.max_body_size))
        .layer(cors)
        .with_state(state);

    // Start server
    let addr = config.server_addr();
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Frontend served from: {}", config.frontend_dir);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
