use serde::{Deserialize, Serialize};

use super::{
    release_year,
    tmdb::{
        TmdbCredits, TmdbImages, TmdbMovieDetails, TmdbPersonDetails, TmdbResults,
        TmdbReview, TmdbTvDetails, TmdbVideo,
    },
    Genre, ImageBase, ImageSize, MovieId, MovieSummary, PersonId,
};

/// Number of cast members and known-for credits surfaced on detail pages
const TOP_BILLED: usize = 6;

const NOT_AVAILABLE: &str = "N/A";
const UNKNOWN: &str = "Unknown";
pub const NO_BIOGRAPHY: &str = "No biography available.";
const NO_REVIEW_TEXT: &str = "No review text available.";
const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: PersonId,
    pub name: String,
    pub character: Option<String>,
    pub profile_url: Option<String>,
    /// Filled in for movie pages; absent elsewhere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub content: String,
    pub rating: Option<f64>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: MovieId,
    pub title: String,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub release_year: Option<i32>,
    /// Human-readable running time, e.g. "2h 28m"
    pub runtime: String,
    pub genres: Vec<Genre>,
    pub director: String,
    pub cast: Vec<CastMember>,
    pub trailers: Vec<String>,
    pub box_office: String,
    pub languages: String,
    pub production_company: String,
    /// US content rating such as "PG-13"
    pub certification: String,
    pub vote_average: f64,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub images: Vec<String>,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TvShowDetails {
    pub id: u64,
    pub name: String,
    pub overview: Option<String>,
    pub first_air_date: Option<String>,
    pub last_air_date: Option<String>,
    pub number_of_seasons: Option<u32>,
    pub number_of_episodes: Option<u32>,
    pub status: Option<String>,
    pub genres: Vec<Genre>,
    pub creators: Vec<String>,
    pub cast: Vec<CastMember>,
    pub trailers: Vec<String>,
    pub vote_average: f64,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub images: Vec<String>,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonDetails {
    pub id: PersonId,
    pub name: String,
    pub biography: String,
    pub birthday: Option<String>,
    pub deathday: Option<String>,
    pub place_of_birth: Option<String>,
    pub profile_url: Option<String>,
    pub known_for_department: Option<String>,
    pub imdb_id: Option<String>,
    pub known_for: Vec<MovieSummary>,
}

/// Formats minutes as "2h 28m"
pub fn format_runtime(minutes: Option<u32>) -> String {
    match minutes {
        Some(m) if m > 0 => format!("{}h {}m", m / 60, m % 60),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Formats revenue in millions of dollars, e.g. "$836.8M"
pub fn format_box_office(revenue: Option<u64>) -> String {
    match revenue {
        Some(r) if r > 0 => format!("${:.1}M", r as f64 / 1_000_000.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn trailer_urls(videos: Option<TmdbResults<TmdbVideo>>) -> Vec<String> {
    videos
        .map(|v| v.results)
        .unwrap_or_default()
        .into_iter()
        .filter(|v| v.video_type == "Trailer" && v.site.eq_ignore_ascii_case("youtube"))
        .map(|v| format!("https://www.youtube.com/embed/{}", v.key))
        .collect()
}

fn top_cast(credits: Option<&TmdbCredits>, images: &ImageBase) -> Vec<CastMember> {
    credits
        .map(|c| c.cast.as_slice())
        .unwrap_or_default()
        .iter()
        .take(TOP_BILLED)
        .map(|c| CastMember {
            id: c.id,
            name: c.name.clone(),
            character: c.character.clone().filter(|s| !s.is_empty()),
            profile_url: images.url(ImageSize::Profile, c.profile_path.as_deref()),
            biography: None,
        })
        .collect()
}

fn backdrop_urls(gallery: Option<TmdbImages>, images: &ImageBase) -> Vec<String> {
    gallery
        .unwrap_or_default()
        .backdrops
        .into_iter()
        .filter_map(|img| images.url(ImageSize::Original, img.file_path.as_deref()))
        .collect()
}

fn reviews(reviews: Option<TmdbResults<TmdbReview>>, images: &ImageBase) -> Vec<Review> {
    reviews
        .map(|r| r.results)
        .unwrap_or_default()
        .into_iter()
        .map(|r| {
            let (rating, avatar_path) = r
                .author_details
                .map(|d| (d.rating, d.avatar_path))
                .unwrap_or((None, None));
            Review {
                id: r.id,
                author: r
                    .author
                    .filter(|a| !a.trim().is_empty())
                    .unwrap_or_else(|| ANONYMOUS.to_string()),
                content: r
                    .content
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| NO_REVIEW_TEXT.to_string()),
                rating,
                avatar_url: images.url(ImageSize::Profile, avatar_path.as_deref()),
            }
        })
        .collect()
}

impl MovieDetails {
    pub fn from_tmdb(raw: TmdbMovieDetails, images: &ImageBase) -> Self {
        let director = raw
            .credits
            .as_ref()
            .and_then(|c| c.crew.iter().find(|p| p.job == "Director"))
            .map(|p| p.name.clone())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let certification = raw
            .release_dates
            .as_ref()
            .and_then(|rd| rd.results.iter().find(|r| r.iso_3166_1 == "US"))
            .and_then(|us| {
                us.release_dates
                    .iter()
                    .find(|d| !d.certification.trim().is_empty())
            })
            .map(|d| d.certification.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let languages = raw
            .spoken_languages
            .iter()
            .map(|l| l.english_name.as_str())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        let production_company = raw
            .production_companies
            .first()
            .map(|c| c.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());

        Self {
            id: raw.id,
            cast: top_cast(raw.credits.as_ref(), images),
            release_year: release_year(raw.release_date.as_deref()),
            runtime: format_runtime(raw.runtime),
            box_office: format_box_office(raw.revenue),
            languages: if languages.is_empty() {
                UNKNOWN.to_string()
            } else {
                languages
            },
            poster_url: images.url(ImageSize::Poster, raw.poster_path.as_deref()),
            backdrop_url: images.url(ImageSize::Original, raw.backdrop_path.as_deref()),
            trailers: trailer_urls(raw.videos),
            images: backdrop_urls(raw.images, images),
            reviews: reviews(raw.reviews, images),
            title: raw.title,
            tagline: raw.tagline,
            overview: raw.overview,
            release_date: raw.release_date,
            genres: raw.genres,
            director,
            production_company,
            certification,
            vote_average: raw.vote_average,
        }
    }
}

impl TvShowDetails {
    pub fn from_tmdb(raw: TmdbTvDetails, images: &ImageBase) -> Self {
        Self {
            id: raw.id,
            cast: top_cast(raw.credits.as_ref(), images),
            creators: raw.created_by.into_iter().map(|c| c.name).collect(),
            poster_url: images.url(ImageSize::Poster, raw.poster_path.as_deref()),
            backdrop_url: images.url(ImageSize::Original, raw.backdrop_path.as_deref()),
            trailers: trailer_urls(raw.videos),
            images: backdrop_urls(raw.images, images),
            reviews: reviews(raw.reviews, images),
            name: raw.name,
            overview: raw.overview,
            first_air_date: raw.first_air_date,
            last_air_date: raw.last_air_date,
            number_of_seasons: raw.number_of_seasons,
            number_of_episodes: raw.number_of_episodes,
            status: raw.status,
            genres: raw.genres,
            vote_average: raw.vote_average,
        }
    }
}

impl PersonDetails {
    pub fn from_tmdb(raw: TmdbPersonDetails, images: &ImageBase) -> Self {
        let known_for = raw
            .movie_credits
            .unwrap_or_default()
            .cast
            .into_iter()
            .take(TOP_BILLED)
            .map(|m| m.into_summary(images))
            .collect();

        Self {
            id: raw.id,
            name: raw.name,
            biography: raw.biography.unwrap_or_else(|| NO_BIOGRAPHY.to_string()),
            birthday: raw.birthday,
            deathday: raw.deathday,
            place_of_birth: raw.place_of_birth,
            profile_url: images.url(ImageSize::Poster, raw.profile_path.as_deref()),
            known_for_department: raw.known_for_department,
            imdb_id: raw.external_ids.and_then(|ids| ids.imdb_id),
            known_for,
        }
    }
}
