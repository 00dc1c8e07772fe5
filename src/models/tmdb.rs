//! Raw TMDB v3 response shapes.
//!
//! TMDB omits or nulls most fields freely, so nearly everything is
//! `#[serde(default)]`. Conversions into client-facing types need an
//! [`ImageBase`] to resolve poster and profile paths.
use serde::{Deserialize, Deserializer};

use super::{
    release_year, Genre, ImageBase, ImageSize, MovieSummary, MultiSearchResult, Page,
    PersonSummary, TvSummary,
};

/// TMDB sends `""` for unknown dates; treat it like a missing value
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn first_page() -> u32 {
    1
}

// ============================================================================
// Listings
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl<T> TmdbPage<T> {
    pub fn into_page<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page: self.page,
            total_pages: self.total_pages,
            total_results: self.total_results,
            results: self.results.into_iter().map(f).collect(),
        }
    }

    /// Like [`TmdbPage::into_page`], dropping results `f` maps to `None`
    pub fn into_page_filtered<U>(self, f: impl FnMut(T) -> Option<U>) -> Page<U> {
        Page {
            page: self.page,
            total_pages: self.total_pages,
            total_results: self.total_results,
            results: self.results.into_iter().filter_map(f).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub popularity: f64,
}

impl TmdbMovie {
    pub fn into_summary(self, images: &ImageBase) -> MovieSummary {
        MovieSummary {
            id: self.id,
            poster_url: images.url(ImageSize::Thumbnail, self.poster_path.as_deref()),
            backdrop_url: images.url(ImageSize::Original, self.backdrop_path.as_deref()),
            release_year: release_year(self.release_date.as_deref()),
            release_date: self.release_date,
            title: self.title,
            overview: self.overview,
            vote_average: self.vote_average,
            genre_ids: self.genre_ids,
            popularity: self.popularity,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTv {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

impl TmdbTv {
    pub fn into_summary(self, images: &ImageBase) -> TvSummary {
        TvSummary {
            id: self.id,
            poster_url: images.url(ImageSize::Thumbnail, self.poster_path.as_deref()),
            name: self.name,
            overview: self.overview,
            first_air_date: self.first_air_date,
            vote_average: self.vote_average,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPerson {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub known_for_department: Option<String>,
}

impl TmdbPerson {
    pub fn into_summary(self, images: &ImageBase) -> PersonSummary {
        PersonSummary {
            id: self.id,
            profile_url: images.url(ImageSize::Thumbnail, self.profile_path.as_deref()),
            name: self.name,
            known_for_department: self.known_for_department,
        }
    }
}

/// Entry of `/search/multi`, tagged by `media_type`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum TmdbMultiResult {
    Movie(TmdbMovie),
    Tv(TmdbTv),
    Person(TmdbPerson),
    #[serde(other)]
    Unknown,
}

impl TmdbMultiResult {
    pub fn into_result(self, images: &ImageBase) -> Option<MultiSearchResult> {
        match self {
            TmdbMultiResult::Movie(movie) => {
                Some(MultiSearchResult::Movie(movie.into_summary(images)))
            }
            TmdbMultiResult::Tv(show) => Some(MultiSearchResult::Tv(show.into_summary(images))),
            TmdbMultiResult::Person(person) => {
                Some(MultiSearchResult::Person(person.into_summary(images)))
            }
            TmdbMultiResult::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

// ============================================================================
// Detail responses (with append_to_response blocks)
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbResults<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCastCredit>,
    #[serde(default)]
    pub crew: Vec<TmdbCrewCredit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCastCredit {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCrewCredit {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub job: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    pub key: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub video_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbReleaseDates {
    pub iso_3166_1: String,
    #[serde(default)]
    pub release_dates: Vec<TmdbReleaseDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbReleaseDate {
    #[serde(default)]
    pub certification: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbImages {
    #[serde(default)]
    pub backdrops: Vec<TmdbImageFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbImageFile {
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbReview {
    pub id: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author_details: Option<TmdbAuthorDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbAuthorDetails {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub avatar_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSpokenLanguage {
    #[serde(default)]
    pub english_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCompany {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub tagline: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub revenue: Option<u64>,
    #[serde(default)]
    pub spoken_languages: Vec<TmdbSpokenLanguage>,
    #[serde(default)]
    pub production_companies: Vec<TmdbCompany>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub credits: Option<TmdbCredits>,
    #[serde(default)]
    pub videos: Option<TmdbResults<TmdbVideo>>,
    #[serde(default)]
    pub release_dates: Option<TmdbResults<TmdbReleaseDates>>,
    #[serde(default)]
    pub images: Option<TmdbImages>,
    #[serde(default)]
    pub reviews: Option<TmdbResults<TmdbReview>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCreator {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTvDetails {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub first_air_date: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub last_air_date: Option<String>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub created_by: Vec<TmdbCreator>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub credits: Option<TmdbCredits>,
    #[serde(default)]
    pub videos: Option<TmdbResults<TmdbVideo>>,
    #[serde(default)]
    pub images: Option<TmdbImages>,
    #[serde(default)]
    pub reviews: Option<TmdbResults<TmdbReview>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbPersonMovieCredits {
    #[serde(default)]
    pub cast: Vec<TmdbMovie>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbExternalIds {
    #[serde(default)]
    pub imdb_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPersonDetails {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub biography: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub deathday: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub movie_credits: Option<TmdbPersonMovieCredits>,
    #[serde(default)]
    pub external_ids: Option<TmdbExternalIds>,
}

/// `/movie/{id}` without appended blocks; only the genres are read
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieGenres {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Error body TMDB sends with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbStatus {
    #[serde(default)]
    pub status_code: Option<i64>,
    #[serde(default)]
    pub status_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_page_deserialization() {
        let json = r#"{
            "page": 1,
            "results": [
                {
                    "id": 27205,
                    "title": "Inception",
                    "overview": "Cobb, a skilled thief...",
                    "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
                    "backdrop_path": null,
                    "release_date": "2010-07-15",
                    "vote_average": 8.4,
                    "genre_ids": [28, 878, 12],
                    "popularity": 83.9
                },
                {
                    "id": 99,
                    "title": "Unreleased",
                    "release_date": ""
                }
            ],
            "total_pages": 12,
            "total_results": 231
        }"#;

        let page: TmdbPage<TmdbMovie> = serde_json::from_str(json).unwrap();
        let images = ImageBase::new("https://image.tmdb.org/t/p");
        let page = page.into_page(|m| m.into_summary(&images));

        assert_eq!(page.total_pages, 12);
        assert_eq!(page.results.len(), 2);

        let inception = &page.results[0];
        assert_eq!(inception.release_year, Some(2010));
        assert_eq!(inception.genre_ids, vec![28, 878, 12]);
        assert_eq!(
            inception.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w300/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg")
        );
        assert_eq!(inception.backdrop_url, None);

        let unreleased = &page.results[1];
        assert_eq!(unreleased.release_date, None);
        assert_eq!(unreleased.release_year, None);
        assert!(unreleased.genre_ids.is_empty());
    }

    #[test]
    fn test_page_without_results_field() {
        let page: TmdbPage<TmdbMovie> = serde_json::from_str("{}").unwrap();
        assert_eq!(page.page, 1);
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_person_to_summary() {
        let json = r#"{"id": 6193, "name": "Leonardo DiCaprio", "profile_path": "/wo2hJpn04vbtmh0B9utCFdsQhxM.jpg", "known_for_department": "Acting"}"#;
        let person: TmdbPerson = serde_json::from_str(json).unwrap();
        let summary = person.into_summary(&ImageBase::new("https://image.tmdb.org/t/p"));

        assert_eq!(summary.name, "Leonardo DiCaprio");
        assert_eq!(summary.known_for_department.as_deref(), Some("Acting"));
        assert!(summary.profile_url.unwrap().ends_with("/w300/wo2hJpn04vbtmh0B9utCFdsQhxM.jpg"));
    }

    #[test]
    fn test_multi_search_page_keeps_known_media_types() {
        let json = r#"{
            "page": 1,
            "results": [
                {"media_type": "movie", "id": 603, "title": "The Matrix", "release_date": "1999-03-30"},
                {"media_type": "tv", "id": 1399, "name": "Game of Thrones", "first_air_date": ""},
                {"media_type": "person", "id": 6384, "name": "Keanu Reeves", "profile_path": null},
                {"media_type": "collection", "id": 2344, "name": "The Matrix Collection"}
            ],
            "total_pages": 1,
            "total_results": 4
        }"#;

        let page: TmdbPage<TmdbMultiResult> = serde_json::from_str(json).unwrap();
        let images = ImageBase::new("https://image.tmdb.org/t/p");
        let page = page.into_page_filtered(|r| r.into_result(&images));

        assert_eq!(page.results.len(), 3);
        match &page.results[0] {
            MultiSearchResult::Movie(movie) => assert_eq!(movie.release_year, Some(1999)),
            other => panic!("unexpected result {:?}", other),
        }
        match &page.results[1] {
            MultiSearchResult::Tv(show) => assert_eq!(show.first_air_date, None),
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(page.results[2].id(), 6384);

        let tagged = serde_json::to_value(&page.results[2]).unwrap();
        assert_eq!(tagged["media_type"], "person");
        assert_eq!(tagged["name"], "Keanu Reeves");
    }

    #[test]
    fn test_video_type_field() {
        let json = r#"{"key": "YoHD9XEInc0", "site": "YouTube", "type": "Trailer"}"#;
        let video: TmdbVideo = serde_json::from_str(json).unwrap();
        assert_eq!(video.video_type, "Trailer");
    }
}
