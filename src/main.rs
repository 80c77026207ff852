//! IIIF media server binary.
//!
//! This binary loads the media catalog, configures the file store and
//! starts the HTTP server.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iiif_media_server::{
    config::Config,
    media::MediaCatalog,
    server::{create_router, RouterConfig},
    store::StoreKind,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let store = match config.file_store() {
        Ok(store) => store,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("IIIF media server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Catalog: {}", config.catalog.display());
    match store.kind() {
        StoreKind::Local => {
            if let Some(ref path) = config.files_path {
                info!("  Store: {} ({})", store.kind().name(), path.display());
                if !path.is_dir() {
                    warn!("  Store path does not exist or is not a directory");
                }
            }
        }
        StoreKind::Remote => {
            if let Some(ref url) = config.files_url {
                info!("  Store: {} ({})", store.kind().name(), url);
            }
        }
    }
    match config.public_url {
        Some(ref url) => info!("  Public URL: {}", url),
        None => info!("  Public URL: derived from request headers"),
    }
    info!("  Default API version: {}", config.default_version);
    if config.serve_local_files {
        info!("  Local files: served directly");
    }

    let catalog = match MediaCatalog::load(&config.catalog).await {
        Ok(catalog) => {
            info!("  Loaded {} media record(s)", catalog.len());
            catalog
        }
        Err(e) => {
            error!("Failed to load catalog: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if catalog.is_empty() {
        warn!("  Catalog is empty, every request will return 404");
    }

    let router = create_router(catalog, store, build_router_config(&config));

    let addr = config.bind_address();

    info!("");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!("    curl -i http://{}/<media_id>", addr);
    info!("    curl http://{}/<media_id>/info.json", addr);
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "iiif_media_server=debug,tower_http=debug"
    } else {
        "iiif_media_server=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new()
        .with_default_version(config.default_version)
        .with_cache_max_age(config.cache_max_age)
        .with_serve_local_files(config.serve_local_files)
        .with_tracing(!config.no_tracing);

    if let Some(ref url) = config.public_url {
        router_config = router_config.with_public_url(url.clone());
    }

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}
