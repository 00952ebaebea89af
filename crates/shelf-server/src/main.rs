//! Shelf Server
//!
//! A books CRUD service with three interchangeable storage backends: an
//! in-process list, MongoDB fronted by a cache-aside Redis layer, or Redis
//! as the sole system of record. The backend is chosen at startup via
//! `STORAGE_BACKEND`.

mod error;
mod handlers;
mod storage;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{delete, get};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use storage::{BookStore, CachedStore, MemoryStore, MongoStore, RedisCache, RedisStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookStore>,
    pub backend: Backend,
}

/// Active storage backend, chosen at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Memory,
    MongoDb,
    Redis,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Memory => f.write_str("memory"),
            Backend::MongoDb => f.write_str("MongoDB"),
            Backend::Redis => f.write_str("Redis"),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Shelf Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = load_config().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, backend={}",
        config.bind_address, config.backend
    );

    let store: Arc<dyn BookStore> = match config.backend {
        Backend::Memory => {
            info!("Using in-memory storage");
            Arc::new(MemoryStore::new())
        }
        Backend::MongoDb => {
            info!("Connecting to MongoDB at {}...", config.mongodb_url);
            let durable = Arc::new(
                MongoStore::connect(&config.mongodb_url, &config.mongodb_database)
                    .await
                    .context("Failed to initialize MongoDB backend")?,
            );
            info!("Connecting to Redis cache at {}...", config.redis_url);
            let cache = Arc::new(
                RedisCache::connect(&config.redis_url)
                    .await
                    .context("Failed to initialize Redis cache")?,
            );
            Arc::new(CachedStore::new(durable, cache))
        }
        Backend::Redis => {
            info!("Connecting to Redis at {}...", config.redis_url);
            Arc::new(
                RedisStore::connect(&config.redis_url)
                    .await
                    .context("Failed to initialize Redis backend")?,
            )
        }
    };

    let state = AppState {
        store,
        backend: config.backend,
    };
    let app = build_router(state);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/books",
            get(handlers::books::list).post(handlers::books::create),
        )
        .route(
            "/books/:id",
            get(handlers::books::get)
                .put(handlers::books::update)
                .delete(handlers::books::delete),
        );

    // The maintenance route matches the active backend; the in-memory
    // variant has none.
    let router = match state.backend {
        Backend::Memory => router,
        Backend::MongoDb => router.route("/clear-mongodb", delete(handlers::books::clear)),
        Backend::Redis => router.route("/clear-redis", delete(handlers::books::clear)),
    };

    router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Clone)]
struct Config {
    bind_address: String,
    backend: Backend,
    mongodb_url: String,
    mongodb_database: String,
    redis_url: String,
}

fn load_config() -> Result<Config> {
    let backend = match std::env::var("STORAGE_BACKEND").as_deref() {
        Err(_) | Ok("memory") => Backend::Memory,
        Ok("mongodb") => Backend::MongoDb,
        Ok("redis") => Backend::Redis,
        Ok(other) => anyhow::bail!("Unknown STORAGE_BACKEND: {}", other),
    };

    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let mongodb_url = std::env::var("MONGODB_URL")
        .unwrap_or_else(|_| "mongodb://127.0.0.1:27017".to_string());
    let mongodb_database =
        std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "shelf".to_string());
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

    Ok(Config {
        bind_address,
        backend,
        mongodb_url,
        mongodb_database,
        redis_url,
    })
}
