use crate::{
    error::AppResult,
    models::{MovieId, RecommendedMovie},
    services::catalog::{DiscoverParams, MovieCatalog},
};
use std::collections::{HashMap, HashSet};

/// Ratings at or above this value count as a taste signal
pub const HIGH_RATING_THRESHOLD: u8 = 7;

/// Largest number of recommendations a single request may ask for
pub const MAX_RECOMMENDATION_LIMIT: usize = 100;

/// Generates genre-based movie recommendations
///
/// Genres of the watchlist and of highly rated movies are weighted by how many
/// of those movies carry them. One page of popular movies sharing any of the
/// genres is then ranked by the summed weight of the genres each candidate
/// matches. Users without any signal get plain popular movies.
///
/// Movies already in the watchlist or rated are never recommended.
pub async fn generate_recommendations(
    catalog: &dyn MovieCatalog,
    watchlist: &[MovieId],
    ratings: &HashMap<MovieId, u8>,
    limit: usize,
) -> AppResult<Vec<RecommendedMovie>> {
    let seen: HashSet<MovieId> = watchlist.iter().chain(ratings.keys()).copied().collect();

    // HashMap iteration order is arbitrary; sort for a reproducible base order
    let mut top_rated: Vec<MovieId> = ratings
        .iter()
        .filter(|(_, rating)| **rating >= HIGH_RATING_THRESHOLD)
        .map(|(id, _)| *id)
        .collect();
    top_rated.sort_unstable();

    let mut base = Vec::new();
    let mut in_base = HashSet::new();
    for id in watchlist.iter().chain(top_rated.iter()) {
        if in_base.insert(*id) {
            base.push(*id);
        }
    }

    let genre_weights = collect_genre_weights(catalog, &base).await;

    let params = if genre_weights.is_empty() {
        tracing::debug!("No genre signal, falling back to popular movies");
        DiscoverParams::default()
    } else {
        let mut genres: Vec<u64> = genre_weights.keys().copied().collect();
        genres.sort_unstable();
        DiscoverParams::any_genre(genres)
    };

    let candidates = catalog.discover_movies(&params).await?.results;

    let mut returned = HashSet::new();
    let mut recommendations: Vec<RecommendedMovie> = candidates
        .into_iter()
        .filter(|movie| !seen.contains(&movie.id) && returned.insert(movie.id))
        .map(|movie| {
            let matched_genres: Vec<u64> = movie
                .genre_ids
                .iter()
                .copied()
                .filter(|g| genre_weights.contains_key(g))
                .collect();
            let score = matched_genres.iter().map(|g| genre_weights[g]).sum();
            RecommendedMovie {
                movie,
                score,
                matched_genres,
            }
        })
        .collect();

    // Stable sort: ties keep the catalog's popularity order
    recommendations.sort_by(|a, b| b.score.cmp(&a.score));
    recommendations.truncate(limit);

    tracing::info!(
        base_movies = base.len(),
        genres = genre_weights.len(),
        recommended = recommendations.len(),
        "Recommendations generated"
    );

    Ok(recommendations)
}

/// Counts, per genre, how many base movies carry it
///
/// Lookups run one after another; a failed lookup only loses that movie's genres.
async fn collect_genre_weights(catalog: &dyn MovieCatalog, base: &[MovieId]) -> HashMap<u64, u32> {
    let mut weights = HashMap::new();

    for &id in base {
        match catalog.movie_genre_ids(id).await {
            Ok(genres) => {
                let unique: HashSet<u64> = genres.into_iter().collect();
                for genre in unique {
                    *weights.entry(genre).or_insert(0) += 1;
                }
            }
            Err(e) => {
                tracing::warn!(movie_id = id, error = %e, "Failed to fetch movie genres");
            }
        }
    }

    weights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::{MovieSummary, Page},
        services::catalog::{GenreMatch, MockMovieCatalog},
    };

    fn movie(id: u64, genre_ids: Vec<u64>) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {}", id),
            overview: None,
            poster_url: None,
            backdrop_url: None,
            release_date: None,
            release_year: None,
            vote_average: 7.5,
            genre_ids,
            popularity: 50.0,
        }
    }

    fn page(results: Vec<MovieSummary>) -> Page<MovieSummary> {
        Page {
            page: 1,
            total_pages: 1,
            total_results: results.len() as u32,
            results,
        }
    }

    fn ids(recs: &[RecommendedMovie]) -> Vec<u64> {
        recs.iter().map(|r| r.movie.id).collect()
    }

    #[tokio::test]
    async fn test_cold_start_returns_popular() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_movie_genre_ids().never();
        catalog
            .expect_discover_movies()
            .withf(|params| params.genres.is_empty())
            .times(1)
            .returning(|_| Ok(page(vec![movie(1, vec![28]), movie(2, vec![35])])));

        let recs = generate_recommendations(&catalog, &[], &HashMap::new(), 20)
            .await
            .unwrap();

        assert_eq!(ids(&recs), vec![1, 2]);
        assert!(recs.iter().all(|r| r.score == 0));
    }

    #[tokio::test]
    async fn test_excludes_seen_and_ranks_by_overlap() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_movie_genre_ids().returning(|id| match id {
            10 => Ok(vec![28, 878]),
            20 => Ok(vec![28]),
            _ => Ok(vec![]),
        });
        catalog
            .expect_discover_movies()
            .withf(|params| params.genres == vec![28, 878] && params.genre_match == GenreMatch::Any)
            .returning(|_| {
                Ok(page(vec![
                    movie(10, vec![28, 878]), // in watchlist
                    movie(100, vec![878]),
                    movie(101, vec![28, 878]),
                    movie(30, vec![28]), // rated low
                    movie(102, vec![28]),
                    movie(101, vec![28, 878]), // duplicate
                ]))
            });

        let ratings = HashMap::from([(20, 9), (30, 3)]);
        let recs = generate_recommendations(&catalog, &[10], &ratings, 20)
            .await
            .unwrap();

        // 28 is carried by two base movies, 878 by one
        assert_eq!(ids(&recs), vec![101, 102, 100]);
        assert_eq!(recs[0].score, 3);
        assert_eq!(recs[0].matched_genres, vec![28, 878]);
        assert_eq!(recs[1].score, 2);
        assert_eq!(recs[2].score, 1);
    }

    #[tokio::test]
    async fn test_low_ratings_give_no_signal() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_movie_genre_ids().never();
        catalog
            .expect_discover_movies()
            .withf(|params| params.genres.is_empty())
            .returning(|_| Ok(page(vec![movie(5, vec![18]), movie(6, vec![18])])));

        let ratings = HashMap::from([(5, 2), (7, 6)]);
        let recs = generate_recommendations(&catalog, &[], &ratings, 20)
            .await
            .unwrap();

        assert_eq!(ids(&recs), vec![6]);
    }

    #[tokio::test]
    async fn test_failed_genre_lookup_is_skipped() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_movie_genre_ids().returning(|id| match id {
            1 => Err(AppError::ExternalApi("boom".to_string())),
            _ => Ok(vec![16]),
        });
        catalog
            .expect_discover_movies()
            .withf(|params| params.genres == vec![16])
            .returning(|_| Ok(page(vec![movie(50, vec![16])])));

        let recs = generate_recommendations(&catalog, &[1, 2], &HashMap::new(), 20)
            .await
            .unwrap();

        assert_eq!(ids(&recs), vec![50]);
    }

    #[tokio::test]
    async fn test_truncates_to_limit() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_discover_movies()
            .returning(|_| Ok(page((1..=10).map(|id| movie(id, vec![])).collect())));

        let recs = generate_recommendations(&catalog, &[], &HashMap::new(), 3)
            .await
            .unwrap();

        assert_eq!(ids(&recs), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_discover_failure_propagates() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_discover_movies()
            .returning(|_| Err(AppError::ExternalApi("down".to_string())));

        let result = generate_recommendations(&catalog, &[], &HashMap::new(), 5).await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }
}
