use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use urban_match::config::{CorsSettings, LoggingSettings, Settings, StorageBackend};
use urban_match::core::Matcher;
use urban_match::error::{handle_json_payload_error, handle_path_error, handle_query_payload_error};
use urban_match::routes::{self, AppState};
use urban_match::services::{AssistantClient, MemoryUserStore, OtpClient, PgUserStore, ProfileCache, UserStore};

/// RUST_LOG wins over the configured level
fn init_tracing(logging: &LoggingSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.is_pretty() {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn build_cors(settings: &CorsSettings) -> Cors {
    settings
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .expose_headers([header::CONTENT_TYPE])
        .supports_credentials()
}

fn io_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // No subscriber yet: report load failures on stderr
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    init_tracing(&settings.logging);

    info!("Starting UrbanMatch service...");
    info!("Configuration loaded successfully");

    // Storage backend
    let store: Arc<dyn UserStore> = match settings.database.backend {
        StorageBackend::Postgres => {
            let db = &settings.database;
            let pg = PgUserStore::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .map_err(|e| io_error("Failed to connect to PostgreSQL", e))?;
            info!(
                "PostgreSQL store initialized (max: {} connections)",
                db.max_connections.unwrap_or(10)
            );
            Arc::new(pg)
        }
        StorageBackend::Memory => {
            info!("Using in-memory store; profiles are lost on restart");
            Arc::new(MemoryUserStore::new())
        }
    };

    let cache_size = settings.cache.profile_cache_size.unwrap_or(1000);
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let cache = Arc::new(ProfileCache::new(cache_size, cache_ttl));

    info!("Profile cache initialized ({} entries, TTL: {}s)", cache_size, cache_ttl);

    let otp_settings = &settings.otp;
    let otp = Arc::new(
        OtpClient::new(
            otp_settings.base_url.clone(),
            otp_settings.organization.clone(),
            otp_settings.subject.clone(),
            otp_settings.otp_type.clone(),
            Duration::from_secs(otp_settings.timeout_secs.unwrap_or(30)),
        )
        .map_err(|e| io_error("Failed to build OTP client", e))?,
    );

    let assistant_settings = &settings.assistant;
    if assistant_settings.api_key.is_none() {
        tracing::warn!("No API key configured for text generation");
    }
    let assistant = Arc::new(
        AssistantClient::new(
            assistant_settings.base_url.clone(),
            assistant_settings.api_key.clone(),
            assistant_settings.model.clone(),
            assistant_settings.temperature,
            assistant_settings.max_tokens,
            Duration::from_secs(assistant_settings.timeout_secs.unwrap_or(60)),
        )
        .map_err(|e| io_error("Failed to build text-generation client", e))?,
    );

    // Initialize matcher with configured weights
    let weights = settings.scoring_weights();
    let matcher = Matcher::new(weights, settings.matching.options());

    info!("Matcher initialized with weights: {:?}", weights);

    let app_state = AppState {
        store,
        cache,
        otp,
        assistant,
        matcher,
        max_limit: settings.matching.max_limit,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let cors_settings = settings.cors.clone();

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(build_cors(&cors_settings))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
