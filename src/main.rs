use std::{future::Future, sync::Arc};

use anyhow::Context;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reelscout_api::{
    config::Config,
    db::{create_pool, create_redis_client, Cache, MemoryUserStore, PgUserStore, UserStore},
    routes::{cors_layer, create_router, AppState},
    services::{IdentityToolkitClient, TmdbClient},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reelscout_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let store: Arc<dyn UserStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await.context("Failed to connect to database")?;
            tracing::info!("Using PostgreSQL user store");
            Arc::new(PgUserStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, user data is kept in memory");
            Arc::new(MemoryUserStore::new())
        }
    };

    let (cache, cache_writer) = match &config.redis_url {
        Some(url) => {
            let client = create_redis_client(url).context("Invalid REDIS_URL")?;
            let (cache, writer) = Cache::new(client);
            tracing::info!("Redis cache enabled");
            (cache, Some(writer))
        }
        None => {
            tracing::warn!("REDIS_URL not set, TMDB responses are not cached");
            (Cache::disabled(), None)
        }
    };

    let catalog = TmdbClient::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_image_url.clone(),
        config.tmdb_language.clone(),
    );
    let identity = IdentityToolkitClient::new(
        config.identity_api_key.clone(),
        config.identity_api_url.clone(),
    );

    let state = Arc::new(AppState::new(
        Arc::new(catalog),
        store,
        Arc::new(identity),
        config.recommendation_limit,
    ));

    let cors = cors_layer(config.cors_allowed_origin.as_deref())
        .context("Invalid CORS_ALLOWED_ORIGIN")?;
    let app = create_router(state, cors);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(writer) = cache_writer {
        writer.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = wait_for_signal("Ctrl+C", signal::ctrl_c());

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Completes when `signal` fires; a listener that failed to install never completes
async fn wait_for_signal<F>(name: &str, signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!(error = %e, signal = name, "Failed to listen for signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_failed_listener_does_not_trigger_shutdown() {
        let failed = async { Err::<(), _>(std::io::Error::other("no signal support")) };
        let waited =
            tokio::time::timeout(Duration::from_millis(50), wait_for_signal("test", failed)).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_received_signal_completes() {
        let received = async { Ok::<(), std::io::Error>(()) };
        let waited =
            tokio::time::timeout(Duration::from_millis(50), wait_for_signal("test", received)).await;
        assert!(waited.is_ok());
    }
}
