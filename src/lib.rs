use serde::{Deserialize, Serialize};

pub mod config;
pub mod description;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod info_line;
pub mod listing;
pub mod markup;
pub mod pagination;
pub mod poster;
pub mod redirect;
pub mod times;

pub use config::{ClientConfig, ExtractionConfig, Grouping};
pub use error::{Error, Result};
pub use fetch::{HttpFetcher, PageFetcher};
pub use pagination::{Listings, Showtimes};
pub use poster::{ImdbPosters, PosterLookup};

/// A theater and what it plays.
///
/// Ids come from the listing's own links and are not guaranteed unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theater {
    /// Empty when the listing carries no theater link
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    /// Filled in theater-grouped listings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub movies: Vec<Movie>,
    /// Filled for theaters nested under a movie
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub showtimes: Vec<String>,
}

/// A movie and its showings.
///
/// `None` means the field did not appear in the listing at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub name: String,
    pub runtime: Option<String>,
    pub rating: Option<String>,
    pub genre: Option<String>,
    pub trailer: Option<String>,
    pub imdb: Option<String>,
    pub director: Option<String>,
    pub cast: Option<Vec<String>>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    /// Filled in theater-grouped listings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub showtimes: Vec<String>,
    /// Filled in movie-grouped listings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub theaters: Vec<Theater>,
}
