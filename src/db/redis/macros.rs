/// Read-through caching for async lookups.
///
/// Evaluates to `Ok(value)` from the cache when `$key` is present. Otherwise
/// awaits `$fetch`, propagates its error with `?`, queues the result for a
/// background write with `$ttl` seconds to live, and evaluates to `Ok(value)`.
///
/// ```rust,ignore
/// let genres: Vec<Genre> = cached!(self.cache, CacheKey::Genres, GENRE_TTL, async {
///     let raw: TmdbGenreList = self.get_json("/genre/movie/list", &[], "Genre list").await?;
///     AppResult::Ok(raw.genres)
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $fetch:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await? {
            Some(hit) => $crate::error::AppResult::Ok(hit),
            None => {
                let fresh = $fetch.await?;
                $cache.set_in_background(&key, &fresh, $ttl);
                $crate::error::AppResult::Ok(fresh)
            }
        }
    }};
}
