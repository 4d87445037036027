//! Parking service entry point
//!
//! Reads configuration from TOML file (~/.config/parking-service/config.toml).

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{error, info};

use parkhub::application::{AuthService, ParkingService, SlotService, UserService};
use parkhub::domain::{Account, ParkingTariff, Role};
use parkhub::infrastructure::crypto::jwt::JwtConfig;
use parkhub::infrastructure::crypto::password::hash_password;
use parkhub::infrastructure::storage::{InMemoryStorage, Storage};
use parkhub::{create_api_router, default_config_path, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("PARKING_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting parking service...");

    // Prometheus recorder must be installed before any metrics calls
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("failed to install Prometheus metrics recorder: {}", e))?;
    info!("Prometheus metrics recorder installed");

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_minutes: app_cfg.security.jwt_expiration_minutes,
        issuer: "parking-service".to_string(),
    };
    info!(
        "JWT configured with {}min token expiration",
        jwt_config.expiration_minutes
    );

    let price_per_hour = Decimal::try_from(app_cfg.tariff.price_per_hour)
        .map_err(|e| format!("invalid tariff price_per_hour: {}", e))?;
    let max_daily = if app_cfg.tariff.max_daily <= 0.0 {
        None
    } else {
        Some(
            Decimal::try_from(app_cfg.tariff.max_daily)
                .map_err(|e| format!("invalid tariff max_daily: {}", e))?,
        )
    };
    let tariff = ParkingTariff::new(price_per_hour, max_daily, app_cfg.tariff.currency.clone())?;
    info!(
        "Tariff: {} {}/hour, daily cap {:?}",
        price_per_hour, app_cfg.tariff.currency, max_daily
    );

    // ── Storage and services ───────────────────────────────────
    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());

    create_default_admin(&storage, &app_cfg).await;

    let auth_service = Arc::new(AuthService::new(storage.clone(), jwt_config));
    let slot_service = Arc::new(SlotService::new(storage.clone()));
    let parking_service = Arc::new(ParkingService::new(storage.clone(), tariff));
    let user_service = Arc::new(UserService::new(storage.clone()));

    let router = create_api_router(
        storage,
        auth_service,
        slot_service,
        parking_service,
        user_service,
        prometheus_handle,
    );

    // ── HTTP server with graceful shutdown ─────────────────────
    let addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Parking service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

/// Create the seed admin account when the store is empty
async fn create_default_admin(storage: &Arc<dyn Storage>, app_cfg: &AppConfig) {
    let existing = storage.list_accounts().await.unwrap_or_default();
    if !existing.is_empty() {
        return;
    }

    info!("Creating default admin account...");

    let password_hash = match hash_password(&app_cfg.admin.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash admin password: {}", e);
            return;
        }
    };

    let account = match Account::create(
        app_cfg.admin.username.clone(),
        password_hash,
        Role::Admin,
        Some(app_cfg.admin.email.clone()),
    ) {
        Ok(account) => account,
        Err(e) => {
            error!("Failed to build admin account: {}", e);
            return;
        }
    };

    match storage.save_account(account).await {
        Ok(()) => {
            info!("Default admin created: {}", app_cfg.admin.username);
            info!("Please change the admin password immediately!");
        }
        Err(e) => error!("Failed to create admin account: {}", e),
    }
}
