use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;

/// Keys for cached TMDB responses
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Genres,
    /// Fixed listing such as trending or upcoming, by page
    MovieList(&'static str, u32),
    TvList(&'static str, u32),
    /// Canonical query string of a search or discover request
    MovieSearch(String),
    Discover(String),
    PeopleSearch(String),
    MultiSearch(String),
    MovieDetails(u64),
    MovieGenres(u64),
    TvDetails(u64),
    PersonDetails(u64),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Genres => write!(f, "tmdb:genres"),
            CacheKey::MovieList(list, page) => write!(f, "tmdb:movies:{}:{}", list, page),
            CacheKey::TvList(list, page) => write!(f, "tmdb:tv:{}:{}", list, page),
            CacheKey::MovieSearch(query) => write!(f, "tmdb:search:{}", query.to_lowercase()),
            CacheKey::Discover(query) => write!(f, "tmdb:discover:{}", query),
            CacheKey::PeopleSearch(query) => write!(f, "tmdb:people:{}", query.to_lowercase()),
            CacheKey::MultiSearch(query) => write!(f, "tmdb:multi:{}", query.to_lowercase()),
            CacheKey::MovieDetails(id) => write!(f, "tmdb:movie:{}", id),
            CacheKey::MovieGenres(id) => write!(f, "tmdb:movie_genres:{}", id),
            CacheKey::TvDetails(id) => write!(f, "tmdb:tv_show:{}", id),
            CacheKey::PersonDetails(id) => write!(f, "tmdb:person:{}", id),
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Read-through cache for TMDB responses backed by Redis
///
/// A cache built with [`Cache::disabled`] never hits and drops writes, so
/// callers do not need to care whether Redis is configured.
#[derive(Clone)]
pub struct Cache {
    redis_client: Option<Client>,
    write_tx: Option<mpsc::UnboundedSender<CacheWriteMessage>>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Asks the writer task to flush pending writes and stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Creates a new Cache instance with an async write background task
    ///
    /// Writes go through a channel to a spawned task so that storing a
    /// response never delays the request that produced it.
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client: Some(redis_client),
            write_tx: Some(write_tx),
        };

        (cache, CacheWriterHandle { shutdown_tx })
    }

    /// A cache that stores nothing
    pub fn disabled() -> Self {
        Self {
            redis_client: None,
            write_tx: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.redis_client.is_some()
    }

    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        tracing::error!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    write_rx.close();
                    let mut flushed = 0usize;
                    while let Some(msg) = write_rx.recv().await {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        } else {
                            flushed += 1;
                        }
                    }

                    tracing::info!(flushed, "Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Retrieves a value from the cache by key
    ///
    /// Redis being unreachable counts as a miss; undecodable entries are an error.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let Some(client) = &self.redis_client else {
            return Ok(None);
        };

        let cached: Option<String> = match client.get_multiplexed_async_connection().await {
            Ok(mut conn) => match conn.get(key.to_string()).await {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(error = %e, key = %key, "Redis get failed");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Redis unavailable, skipping cache");
                None
            }
        };

        match cached {
            Some(json) => {
                tracing::debug!(key = %key, "Cache hit");
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => {
                tracing::debug!(key = %key, "Cache miss");
                Ok(None)
            }
        }
    }

    /// Queues a value for storage without waiting for Redis
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let Some(write_tx) = &self.write_tx else {
            return;
        };

        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if let Err(e) = write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}
