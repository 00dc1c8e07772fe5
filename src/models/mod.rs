use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod details;
pub mod tmdb;
pub mod user;

pub use details::{
    CastMember, MovieDetails, PersonDetails, Review, TvShowDetails,
};
pub use user::{
    AuthSession, AuthUser, FavoriteActor, MovieRating, ProfileUpdate, UserProfile,
    WatchlistEntry,
};

/// TMDB movie identifier
pub type MovieId = u64;

/// TMDB person identifier
pub type PersonId = u64;

/// Image size segment understood by the TMDB image CDN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Poster on detail pages
    Poster,
    /// Poster in lists and search results
    Thumbnail,
    /// Headshots and review avatars
    Profile,
    Original,
}

impl Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSize::Poster => write!(f, "w500"),
            ImageSize::Thumbnail => write!(f, "w300"),
            ImageSize::Profile => write!(f, "w200"),
            ImageSize::Original => write!(f, "original"),
        }
    }
}

/// Builds absolute image URLs from the relative paths TMDB returns
#[derive(Debug, Clone)]
pub struct ImageBase {
    base_url: String,
}

impl ImageBase {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns `None` when TMDB has no image for the slot
    pub fn url(&self, size: ImageSize, path: Option<&str>) -> Option<String> {
        let path = path.map(str::trim).filter(|p| !p.is_empty())?;
        // Review avatars sometimes carry a full gravatar URL behind a leading slash
        if let Some(absolute) = path.strip_prefix('/').filter(|p| p.starts_with("http")) {
            return Some(absolute.to_string());
        }
        let path = path.trim_start_matches('/');
        Some(format!("{}/{}/{}", self.base_url, size, path))
    }
}

/// Movie as it appears in lists, search results and recommendations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub release_date: Option<String>,
    pub release_year: Option<i32>,
    pub vote_average: f64,
    pub genre_ids: Vec<u64>,
    pub popularity: f64,
}

/// TV show as it appears in lists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TvSummary {
    pub id: u64,
    pub name: String,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub first_air_date: Option<String>,
    pub vote_average: f64,
}

/// Person as it appears in search results and actor suggestions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonSummary {
    pub id: PersonId,
    pub name: String,
    pub profile_url: Option<String>,
    pub known_for_department: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// One page of a paginated TMDB listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page: self.page,
            total_pages: self.total_pages,
            total_results: self.total_results,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Movies and people matching a search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchResults {
    pub movies: Vec<MovieSummary>,
    pub people: Vec<PersonSummary>,
}

/// One hit of a search across movies, TV shows and people
///
/// Serialized with a `media_type` tag so clients can route to the right page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum MultiSearchResult {
    Movie(MovieSummary),
    Tv(TvSummary),
    Person(PersonSummary),
}

impl MultiSearchResult {
    pub fn id(&self) -> u64 {
        match self {
            MultiSearchResult::Movie(movie) => movie.id,
            MultiSearchResult::Tv(show) => show.id,
            MultiSearchResult::Person(person) => person.id,
        }
    }
}

/// A recommended movie with the genre overlap that ranked it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendedMovie {
    #[serde(flatten)]
    pub movie: MovieSummary,
    pub score: u32,
    pub matched_genres: Vec<u64>,
}

/// Extracts the year from a TMDB `YYYY-MM-DD` date
pub fn release_year(date: Option<&str>) -> Option<i32> {
    date.and_then(|d| d.get(0..4)).and_then(|y| y.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_sizes() {
        let images = ImageBase::new("https://image.tmdb.org/t/p/");
        assert_eq!(
            images.url(ImageSize::Poster, Some("/abc.jpg")),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg".to_string())
        );
        assert_eq!(
            images.url(ImageSize::Thumbnail, Some("/abc.jpg")),
            Some("https://image.tmdb.org/t/p/w300/abc.jpg".to_string())
        );
        assert_eq!(
            images.url(ImageSize::Original, Some("/abc.jpg")),
            Some("https://image.tmdb.org/t/p/original/abc.jpg".to_string())
        );
    }

    #[test]
    fn test_image_url_missing_path() {
        let images = ImageBase::new("https://image.tmdb.org/t/p");
        assert_eq!(images.url(ImageSize::Profile, None), None);
        assert_eq!(images.url(ImageSize::Profile, Some("")), None);
    }

    #[test]
    fn test_image_url_embedded_absolute_url() {
        let images = ImageBase::new("https://image.tmdb.org/t/p");
        assert_eq!(
            images.url(
                ImageSize::Profile,
                Some("/https://secure.gravatar.com/avatar/abc.jpg")
            ),
            Some("https://secure.gravatar.com/avatar/abc.jpg".to_string())
        );
    }

    #[test]
    fn test_release_year() {
        assert_eq!(release_year(Some("2010-07-15")), Some(2010));
        assert_eq!(release_year(Some("")), None);
        assert_eq!(release_year(None), None);
    }

    #[test]
    fn test_recommended_movie_flattens_summary() {
        let rec = RecommendedMovie {
            movie: MovieSummary {
                id: 27205,
                title: "Inception".to_string(),
                overview: None,
                poster_url: None,
                backdrop_url: None,
                release_date: Some("2010-07-15".to_string()),
                release_year: Some(2010),
                vote_average: 8.4,
                genre_ids: vec![28, 878],
                popularity: 90.0,
            },
            score: 2,
            matched_genres: vec![28, 878],
        };

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["id"], 27205);
        assert_eq!(json["title"], "Inception");
        assert_eq!(json["score"], 2);
    }
}
