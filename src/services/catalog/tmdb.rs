//! TMDB v3 catalog client
//!
//! Listings and searches are cached for an hour, detail pages for a day and
//! the genre list for a week. Every request carries the API key and the
//! configured language as query parameters.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        tmdb::{
            TmdbGenreList, TmdbMovie, TmdbMovieDetails, TmdbMovieGenres, TmdbMultiResult,
            TmdbPage, TmdbPerson, TmdbPersonDetails, TmdbStatus, TmdbTv, TmdbTvDetails,
        },
        Genre, ImageBase, MovieDetails, MovieId, MovieSummary, MultiSearchResult, Page,
        PersonDetails, PersonId, PersonSummary, TvShowDetails, TvSummary,
    },
    services::catalog::{DiscoverParams, MovieCatalog},
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

const LIST_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 86400; // 1 day
const GENRE_CACHE_TTL: u64 = 604800; // 1 week

const MOVIE_APPEND: &str = "credits,videos,release_dates,images,reviews";
const TV_APPEND: &str = "credits,images,videos,reviews";
const PERSON_APPEND: &str = "movie_credits,external_ids";

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    images: ImageBase,
    cache: Cache,
}

impl TmdbClient {
    pub fn new(
        cache: Cache,
        api_key: String,
        api_url: String,
        image_url: String,
        language: String,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            images: ImageBase::new(image_url),
            cache,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// GETs `path` and decodes the JSON body
    ///
    /// A 404 becomes `NotFound` naming `what`; any other failure status is
    /// an `ExternalApi` error carrying TMDB's status message.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        what: &str,
    ) -> AppResult<T> {
        let response = self
            .http_client
            .get(self.url(path))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(path = %path, "TMDB resource not found");
            return Err(AppError::NotFound(format!("{} not found", what)));
        }

        if !status.is_success() {
            let message = serde_json::from_str::<TmdbStatus>(&body)
                .ok()
                .and_then(|s| s.status_message)
                .unwrap_or(body);
            tracing::error!(
                path = %path,
                status = %status,
                message = %message,
                "TMDB request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {}: {}",
                status, message
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                "Failed to deserialize TMDB response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }

    async fn movie_list(&self, list: &'static str, path: &str, page: u32) -> AppResult<Page<MovieSummary>> {
        let page = page.max(1);
        cached!(self.cache, CacheKey::MovieList(list, page), LIST_CACHE_TTL, async {
            let raw: TmdbPage<TmdbMovie> = self
                .get_json(path, &[("page", page.to_string())], "Movie list")
                .await?;
            AppResult::Ok(raw.into_page(|m| m.into_summary(&self.images)))
        })
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbClient {
    async fn trending_movies(&self) -> AppResult<Page<MovieSummary>> {
        self.movie_list("trending", "/trending/movie/week", 1).await
    }

    async fn upcoming_movies(&self, page: u32) -> AppResult<Page<MovieSummary>> {
        self.movie_list("upcoming", "/movie/upcoming", page).await
    }

    async fn top_rated_movies(&self, page: u32) -> AppResult<Page<MovieSummary>> {
        self.movie_list("top_rated", "/movie/top_rated", page).await
    }

    async fn popular_movies(&self, page: u32) -> AppResult<Page<MovieSummary>> {
        self.movie_list("popular", "/movie/popular", page).await
    }

    async fn tv_on_the_air(&self, page: u32) -> AppResult<Page<TvSummary>> {
        let page = page.max(1);
        cached!(self.cache, CacheKey::TvList("on_the_air", page), LIST_CACHE_TTL, async {
            let raw: TmdbPage<TmdbTv> = self
                .get_json("/tv/on_the_air", &[("page", page.to_string())], "TV list")
                .await?;
            AppResult::Ok(raw.into_page(|t| t.into_summary(&self.images)))
        })
    }

    async fn movie_genres(&self) -> AppResult<Vec<Genre>> {
        cached!(self.cache, CacheKey::Genres, GENRE_CACHE_TTL, async {
            let raw: TmdbGenreList = self.get_json("/genre/movie/list", &[], "Genre list").await?;
            AppResult::Ok(raw.genres)
        })
    }

    async fn search_movies(
        &self,
        query: &str,
        year: Option<i32>,
        page: u32,
    ) -> AppResult<Page<MovieSummary>> {
        let page = page.max(1);
        let mut params = vec![
            ("query", query.to_string()),
            ("include_adult", "false".to_string()),
            ("page", page.to_string()),
        ];
        if let Some(year) = year {
            params.push(("primary_release_year", year.to_string()));
        }

        let key = CacheKey::MovieSearch(format!(
            "{}:{}:{}",
            query.trim(),
            year.map(|y| y.to_string()).unwrap_or_default(),
            page
        ));

        let results: Page<MovieSummary> = cached!(self.cache, key, LIST_CACHE_TTL, async {
            let raw: TmdbPage<TmdbMovie> =
                self.get_json("/search/movie", &params, "Search").await?;
            AppResult::Ok(raw.into_page(|m| m.into_summary(&self.images)))
        })?;

        tracing::info!(
            query = %query,
            results = results.results.len(),
            "Movie search completed"
        );

        Ok(results)
    }

    async fn discover_movies(&self, params: &DiscoverParams) -> AppResult<Page<MovieSummary>> {
        let key = CacheKey::Discover(params.cache_fragment());
        cached!(self.cache, key, LIST_CACHE_TTL, async {
            let raw: TmdbPage<TmdbMovie> = self
                .get_json("/discover/movie", &params.query_pairs(), "Discover")
                .await?;
            AppResult::Ok(raw.into_page(|m| m.into_summary(&self.images)))
        })
    }

    async fn search_people(&self, query: &str, page: u32) -> AppResult<Page<PersonSummary>> {
        let page = page.max(1);
        let key = CacheKey::PeopleSearch(format!("{}:{}", query.trim(), page));
        cached!(self.cache, key, LIST_CACHE_TTL, async {
            let params = [
                ("query", query.to_string()),
                ("include_adult", "false".to_string()),
                ("page", page.to_string()),
            ];
            let raw: TmdbPage<TmdbPerson> =
                self.get_json("/search/person", &params, "People search").await?;
            AppResult::Ok(raw.into_page(|p| p.into_summary(&self.images)))
        })
    }

    async fn search_multi(&self, query: &str, page: u32) -> AppResult<Page<MultiSearchResult>> {
        let page = page.max(1);
        let key = CacheKey::MultiSearch(format!("{}:{}", query.trim(), page));
        cached!(self.cache, key, LIST_CACHE_TTL, async {
            let params = [
                ("query", query.to_string()),
                ("include_adult", "false".to_string()),
                ("page", page.to_string()),
            ];
            let raw: TmdbPage<TmdbMultiResult> =
                self.get_json("/search/multi", &params, "Search").await?;
            AppResult::Ok(raw.into_page_filtered(|r| r.into_result(&self.images)))
        })
    }

    async fn movie_details(&self, id: MovieId) -> AppResult<MovieDetails> {
        cached!(self.cache, CacheKey::MovieDetails(id), DETAILS_CACHE_TTL, async {
            let raw: TmdbMovieDetails = self
                .get_json(
                    &format!("/movie/{}", id),
                    &[("append_to_response", MOVIE_APPEND.to_string())],
                    &format!("Movie {}", id),
                )
                .await?;
            AppResult::Ok(MovieDetails::from_tmdb(raw, &self.images))
        })
    }

    async fn movie_genre_ids(&self, id: MovieId) -> AppResult<Vec<u64>> {
        cached!(self.cache, CacheKey::MovieGenres(id), DETAILS_CACHE_TTL, async {
            let raw: TmdbMovieGenres = self
                .get_json(&format!("/movie/{}", id), &[], &format!("Movie {}", id))
                .await?;
            AppResult::Ok(raw.genres.into_iter().map(|g| g.id).collect::<Vec<u64>>())
        })
    }

    async fn tv_details(&self, id: u64) -> AppResult<TvShowDetails> {
        cached!(self.cache, CacheKey::TvDetails(id), DETAILS_CACHE_TTL, async {
            let raw: TmdbTvDetails = self
                .get_json(
                    &format!("/tv/{}", id),
                    &[("append_to_response", TV_APPEND.to_string())],
                    &format!("TV show {}", id),
                )
                .await?;
            AppResult::Ok(TvShowDetails::from_tmdb(raw, &self.images))
        })
    }

    async fn person_details(&self, id: PersonId) -> AppResult<PersonDetails> {
        cached!(self.cache, CacheKey::PersonDetails(id), DETAILS_CACHE_TTL, async {
            let raw: TmdbPersonDetails = self
                .get_json(
                    &format!("/person/{}", id),
                    &[("append_to_response", PERSON_APPEND.to_string())],
                    &format!("Person {}", id),
                )
                .await?;
            AppResult::Ok(PersonDetails::from_tmdb(raw, &self.images))
        })
    }
}
