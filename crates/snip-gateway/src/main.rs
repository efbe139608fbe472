mod app;
mod cli;
mod error;
mod handlers;
mod model;
mod state;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use snip_cache::{LayeredCache, MokaUrlCache, RedisUrlCache};
use snip_core::{Repository, Shortener};
use snip_generator::Sha256Generator;
use snip_shortener::ShortenerService;
use snip_storage::{InMemoryRepository, SqliteRepository};
use tracing::{info, warn};

use crate::app::App;
use crate::cli::{CacheBackendArg, StorageBackendArg, CLI};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    snip_telemetry::init(config.log_format.into())?;

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        storage_backend = %config.storage,
        cache_backend = %config.cache,
        "starting snip gateway"
    );

    let shortener = match config.storage {
        StorageBackendArg::InMemory => build_shortener(InMemoryRepository::new(), &config).await,
        StorageBackendArg::Sqlite => {
            let repository = SqliteRepository::connect(&config.database_url)
                .await
                .with_context(|| format!("failed to open database {}", config.database_url))?;
            repository
                .create_schema()
                .await
                .context("failed to create database schema")?;
            build_shortener(repository, &config).await
        }
    };

    let state = AppState::new(shortener, config.base_url.clone());
    let router = App::router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening for HTTP requests");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

async fn build_shortener<R: Repository>(repository: R, config: &CLI) -> Arc<dyn Shortener> {
    let service = ShortenerService::new(repository, Sha256Generator::new());
    let ttl = config.cache_ttl();
    let local = || MokaUrlCache::with_capacity(config.cache_capacity);

    match config.cache {
        CacheBackendArg::None => Arc::new(service),
        CacheBackendArg::Moka => Arc::new(service.with_cache(local(), ttl)),
        CacheBackendArg::Redis => match connect_redis(config).await {
            Some(redis) => Arc::new(service.with_cache(redis, ttl)),
            None => Arc::new(service),
        },
        CacheBackendArg::Layered => match connect_redis(config).await {
            Some(redis) => Arc::new(service.with_cache(LayeredCache::new(local(), redis, ttl), ttl)),
            None => Arc::new(service.with_cache(local(), ttl)),
        },
    }
}

/// The cache is optional: an unreachable Redis only costs the shared tier.
async fn connect_redis(config: &CLI) -> Option<RedisUrlCache> {
    let redis_url = config.redis_url.as_deref()?;

    match RedisUrlCache::connect(redis_url).await {
        Ok(cache) => {
            info!("connected to Redis cache");
            Some(cache)
        }
        Err(e) => {
            warn!(error = %e, "Redis unavailable, continuing without the Redis cache tier");
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
