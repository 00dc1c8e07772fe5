use crate::{
    error::{AppError, AppResult},
    models::{MovieSummary, MultiSearchResult, PersonSummary, SearchResults},
    services::catalog::{DiscoverParams, GenreMatch, MovieCatalog},
};
use serde::Deserialize;

const MIN_YEAR: i32 = 1870;
const MAX_YEAR: i32 = 2100;
const MIN_SUGGESTION_LEN: usize = 2;

/// Raw search parameters as they arrive on the query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub year: Option<String>,
    /// Comma separated TMDB genre ids
    pub genres: Option<String>,
    pub actor: Option<String>,
    pub page: Option<u32>,
}

/// How the movie half of a search is answered
#[derive(Debug, Clone, PartialEq)]
pub enum MovieSearchPlan {
    /// Title search, then keep only movies carrying every `required_genres` id
    Text {
        query: String,
        year: Option<i32>,
        required_genres: Vec<u64>,
        page: u32,
    },
    /// Popularity-sorted discover, unfiltered when no filters were given
    Discover(DiscoverParams),
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_year(raw: &str) -> AppResult<i32> {
    let year = raw
        .parse::<i32>()
        .ok()
        .filter(|y| raw.len() == 4 && (MIN_YEAR..=MAX_YEAR).contains(y))
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Year must be between {} and {}, got '{}'",
                MIN_YEAR, MAX_YEAR, raw
            ))
        })?;
    Ok(year)
}

fn parse_genres(raw: &str) -> AppResult<Vec<u64>> {
    let mut genres = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = part
            .parse::<u64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid genre id '{}'", part)))?;
        if !genres.contains(&id) {
            genres.push(id);
        }
    }
    Ok(genres)
}

/// Decides which catalog call answers the movie part of a search
pub fn plan_movie_search(filters: &SearchFilters) -> AppResult<MovieSearchPlan> {
    let query = non_blank(&filters.query);
    let year = non_blank(&filters.year).map(parse_year).transpose()?;
    let genres = match non_blank(&filters.genres) {
        Some(raw) => parse_genres(raw)?,
        None => Vec::new(),
    };
    let page = filters.page.unwrap_or(1).max(1);

    let plan = match query {
        Some(query) => MovieSearchPlan::Text {
            query: query.to_string(),
            year,
            required_genres: genres,
            page,
        },
        None => MovieSearchPlan::Discover(DiscoverParams {
            genres,
            genre_match: GenreMatch::All,
            year,
            page,
        }),
    };

    Ok(plan)
}

async fn search_movies(
    catalog: &dyn MovieCatalog,
    plan: &MovieSearchPlan,
) -> AppResult<Vec<MovieSummary>> {
    match plan {
        MovieSearchPlan::Text {
            query,
            year,
            required_genres,
            page,
        } => {
            let found = catalog.search_movies(query, *year, *page).await?;
            Ok(found
                .results
                .into_iter()
                .filter(|m| required_genres.iter().all(|g| m.genre_ids.contains(g)))
                .collect())
        }
        MovieSearchPlan::Discover(params) => Ok(catalog.discover_movies(params).await?.results),
    }
}

/// Runs a search over movies and, when an actor name is given, people
pub async fn run_search(
    catalog: &dyn MovieCatalog,
    filters: &SearchFilters,
) -> AppResult<SearchResults> {
    let plan = plan_movie_search(filters)?;
    tracing::debug!(plan = ?plan, "Planned movie search");

    let movies = search_movies(catalog, &plan).await?;

    let people = match non_blank(&filters.actor) {
        Some(actor) => catalog.search_people(actor, 1).await?.results,
        None => Vec::new(),
    };

    tracing::info!(
        movies = movies.len(),
        people = people.len(),
        "Search completed"
    );

    Ok(SearchResults { movies, people })
}

/// People matching a partially typed actor name
pub async fn people_suggestions(
    catalog: &dyn MovieCatalog,
    name: &str,
) -> AppResult<Vec<PersonSummary>> {
    let name = name.trim();
    if name.chars().count() < MIN_SUGGESTION_LEN {
        return Ok(Vec::new());
    }
    Ok(catalog.search_people(name, 1).await?.results)
}

/// Mixed movie, TV and people hits for a quick search box
///
/// A blank query returns nothing without calling the catalog.
pub async fn quick_search(
    catalog: &dyn MovieCatalog,
    query: &str,
    page: u32,
) -> AppResult<Vec<MultiSearchResult>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    Ok(catalog.search_multi(query, page.max(1)).await?.results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::Page, services::catalog::MockMovieCatalog};
    use tokio_test::{assert_err, assert_ok};

    fn movie(id: u64, genre_ids: Vec<u64>) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {}", id),
            overview: None,
            poster_url: None,
            backdrop_url: None,
            release_date: None,
            release_year: None,
            vote_average: 7.0,
            genre_ids,
            popularity: 10.0,
        }
    }

    fn page<T>(results: Vec<T>) -> Page<T> {
        Page {
            page: 1,
            total_pages: 1,
            total_results: results.len() as u32,
            results,
        }
    }

    fn filters(query: Option<&str>, year: Option<&str>, genres: Option<&str>) -> SearchFilters {
        SearchFilters {
            query: query.map(String::from),
            year: year.map(String::from),
            genres: genres.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_plan_query_only() {
        let plan = plan_movie_search(&filters(Some(" matrix "), None, None)).unwrap();
        assert_eq!(
            plan,
            MovieSearchPlan::Text {
                query: "matrix".to_string(),
                year: None,
                required_genres: vec![],
                page: 1,
            }
        );
    }

    #[test]
    fn test_plan_nothing_is_popular_discover() {
        let plan = plan_movie_search(&SearchFilters::default()).unwrap();
        assert_eq!(plan, MovieSearchPlan::Discover(DiscoverParams::default()));
    }

    #[test]
    fn test_plan_filters_without_query() {
        let plan = plan_movie_search(&filters(None, Some("1999"), Some("28,878"))).unwrap();
        match plan {
            MovieSearchPlan::Discover(params) => {
                assert_eq!(params.year, Some(1999));
                assert_eq!(params.genres, vec![28, 878]);
                assert_eq!(params.genre_match, GenreMatch::All);
            }
            other => panic!("unexpected plan {:?}", other),
        }
    }

    #[test]
    fn test_plan_rejects_bad_filters() {
        assert_err!(plan_movie_search(&filters(None, Some("99"), None)));
        assert_err!(plan_movie_search(&filters(None, Some("1600"), None)));
        assert_err!(plan_movie_search(&filters(None, Some("abcd"), None)));
        assert_err!(plan_movie_search(&filters(None, None, Some("28,action"))));
        assert_err!(plan_movie_search(&filters(None, None, Some("0"))));
        assert_ok!(plan_movie_search(&filters(None, Some(" 2024 "), Some("28, 12,"))));
    }

    #[tokio::test]
    async fn test_query_with_filters_keeps_movies_with_all_genres() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search_movies()
            .withf(|query, year, page| {
                query.to_string() == "matrix" && *year == Some(1999) && *page == 1
            })
            .returning(|_, _, _| {
                Ok(page(vec![
                    movie(603, vec![28, 878]),
                    movie(604, vec![28]),
                    movie(605, vec![878, 28, 53]),
                ]))
            });

        let results = run_search(&catalog, &filters(Some("matrix"), Some("1999"), Some("878,28")))
            .await
            .unwrap();

        let ids: Vec<u64> = results.movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![603, 605]);
        assert!(results.people.is_empty());
    }

    #[tokio::test]
    async fn test_actor_searches_people() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_discover_movies()
            .returning(|_| Ok(page(vec![movie(1, vec![])])));
        catalog
            .expect_search_people()
            .withf(|name, _| name.to_string() == "Keanu")
            .times(1)
            .returning(|_, _| {
                Ok(page(vec![PersonSummary {
                    id: 6384,
                    name: "Keanu Reeves".to_string(),
                    profile_url: None,
                    known_for_department: Some("Acting".to_string()),
                }]))
            });

        let results = run_search(
            &catalog,
            &SearchFilters {
                actor: Some("Keanu".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(results.movies.len(), 1);
        assert_eq!(results.people[0].id, 6384);
    }

    #[tokio::test]
    async fn test_quick_search_returns_tagged_results() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search_multi()
            .withf(|query, page| query.to_string() == "matrix" && *page == 1)
            .times(1)
            .returning(|_, _| {
                Ok(page(vec![
                    MultiSearchResult::Movie(movie(603, vec![28, 878])),
                    MultiSearchResult::Person(PersonSummary {
                        id: 6384,
                        name: "Keanu Reeves".to_string(),
                        profile_url: None,
                        known_for_department: Some("Acting".to_string()),
                    }),
                ]))
            });

        let results = quick_search(&catalog, "  matrix ", 0).await.unwrap();
        let ids: Vec<u64> = results.iter().map(MultiSearchResult::id).collect();
        assert_eq!(ids, vec![603, 6384]);
        assert!(matches!(results[1], MultiSearchResult::Person(_)));
    }

    #[tokio::test]
    async fn test_blank_quick_search_skips_catalog() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_search_multi().never();
        let results = quick_search(&catalog, "   ", 1).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_short_suggestion_skips_catalog() {
        let catalog = MockMovieCatalog::new();
        let people = people_suggestions(&catalog, " k ").await.unwrap();
        assert!(people.is_empty());
    }
}
