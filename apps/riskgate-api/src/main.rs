//! riskgate API server.
//!
//! Change-management risk assessment service built with Axum: account and
//! session management with mandatory TOTP MFA, a pure risk scoring engine,
//! and per-user assessment history behind Postgres row-level security.

mod config;
mod health;
mod logging;
mod openapi;
mod state;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Extension, Router};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use riskgate_api_auth::{
    auth_router, jwt_auth_middleware, AuthService, AuthState, JwtPublicKey, MfaService,
    SessionEvents, TokenConfig, TokenService, TotpEncryption,
};
use riskgate_api_risk::{risk_router, RiskState};
use riskgate_db::models::MfaChallenge;
use riskgate_db::{run_migrations, DbPool};

use config::Config;
use health::{health_handler, livez_handler, readyz_handler};
use openapi::swagger_routes;
use state::AppState;

#[tokio::main]
async fn main() {
    // Fail fast on missing or invalid configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.rust_log);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.host,
        port = config.port,
        env = %config.app_env,
        "Starting riskgate API"
    );

    let pool = match DbPool::connect(&config.database_url).await {
        Ok(pool) => {
            info!("Database connection established");
            pool
        }
        Err(e) => {
            eprintln!("Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    if config.run_migrations {
        if let Err(e) = run_migrations(&pool).await {
            eprintln!("FATAL: Database migration failed: {e}");
            std::process::exit(1);
        }
    }

    let totp_encryption = match TotpEncryption::from_key(&config.mfa_encryption_key) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to create TOTP encryption: {e}");
            std::process::exit(1);
        }
    };

    let token_config = TokenConfig {
        private_key: config.jwt_private_key.as_bytes().to_vec(),
        issuer: config.jwt_issuer.clone(),
        audience: config.jwt_issuer.clone(),
    };

    let session_events = SessionEvents::new();
    spawn_session_event_listener(&session_events);
    spawn_challenge_purge_task(pool.clone());

    let auth_state = AuthState {
        pool: pool.clone(),
        auth_service: Arc::new(AuthService::new(pool.clone())),
        token_service: Arc::new(TokenService::new(token_config, pool.clone())),
        mfa_service: Arc::new(MfaService::new(
            pool.clone(),
            totp_encryption,
            config.mfa_issuer.clone(),
        )),
        session_events: session_events.clone(),
        jwt_public_key: config.jwt_public_key.clone(),
    };

    let auth_routes = auth_router(auth_state);

    // Risk routes require a full access token; the middleware inserts the
    // authenticated UserId extension the handlers rely on.
    let risk_routes = risk_router(RiskState::new(pool.clone()))
        .layer(axum::middleware::from_fn(jwt_auth_middleware))
        .layer(Extension(JwtPublicKey(config.jwt_public_key.clone())));

    let cors = build_cors_layer(&config.cors_origins);

    let app_state = AppState::new(pool);
    let shutting_down = app_state.shutting_down.clone();

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/livez", get(livez_handler))
        .route("/readyz", get(readyz_handler))
        .merge(swagger_routes())
        .with_state(app_state)
        .nest("/auth", auth_routes)
        .nest("/risk", risk_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = match config.bind_addr().parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!("Invalid bind address '{}': {e}", config.bind_addr());
            std::process::exit(1);
        }
    };

    info!(%addr, "Server listening");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {addr}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutting_down))
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// Subscribe to session lifecycle events and log them.
///
/// The single subscription lives for the life of the process; dropping the
/// receiver at shutdown (task abort on runtime teardown) deregisters it.
fn spawn_session_event_listener(events: &SessionEvents) {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    info!(user_id = %event.user_id(), ?event, "Session event");
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Session event listener lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// How often expired MFA challenges are purged.
const CHALLENGE_PURGE_INTERVAL: Duration = Duration::from_secs(300);

/// Periodically delete expired MFA challenges so abandoned logins do not
/// accumulate rows forever.
fn spawn_challenge_purge_task(pool: DbPool) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(CHALLENGE_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            match MfaChallenge::purge_expired(pool.inner()).await {
                Ok(0) => {}
                Ok(purged) => info!(purged, "Purged expired MFA challenges"),
                Err(e) => tracing::warn!("Failed to purge expired MFA challenges: {e}"),
            }
        }
    });
}

/// Build CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    use tower_http::cors::AllowOrigin;

    let is_wildcard = origins.len() == 1 && origins[0] == "*";

    let allow_origin = if is_wildcard {
        AllowOrigin::any()
    } else {
        let allowed: Vec<axum::http::HeaderValue> =
            origins.iter().filter_map(|o| o.parse().ok()).collect();
        AllowOrigin::list(allowed)
    };

    let mut layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .max_age(Duration::from_secs(3600));

    if is_wildcard {
        layer = layer.allow_methods(Any).allow_headers(Any);
    } else {
        use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
        use axum::http::Method;
        layer = layer
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT, ORIGIN])
            .allow_credentials(true);
    }

    layer
}

/// Graceful shutdown signal handler.
///
/// Sets the `shutting_down` flag before returning so the readiness probe
/// returns 503 and drains traffic before Axum stops accepting connections.
async fn shutdown_signal(shutting_down: Arc<AtomicBool>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }

    shutting_down.store(true, Ordering::Release);
    info!("Readiness probe set to unhealthy, draining traffic");
}
