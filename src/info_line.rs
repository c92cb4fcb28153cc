//! Classification of the free-text info line under each movie.
//!
//! The first line looks like `1hr 32min - Rated PG-13 - Action - Trailer - IMDb`, but any
//! of runtime, rating and genre may be missing. An optional second line carries the
//! credits: `Director: Jane Doe - Cast: A, B, C`.

const SEPARATOR: &str = " - ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieInfo {
    pub runtime: Option<String>,
    pub rating: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credits {
    pub director: Option<String>,
    pub cast: Option<Vec<String>>,
}

fn is_duration(segment: &str) -> bool {
    segment.contains("hr ") || segment.contains("min")
}

fn is_rated(segment: &str) -> bool {
    segment.contains("Rated")
}

fn is_link_text(segment: &str) -> bool {
    let lower = segment.to_ascii_lowercase();
    lower.contains("imdb") || lower.contains("trailer")
}

fn ascii_only(s: &str) -> String {
    s.chars().filter(char::is_ascii).collect::<String>().trim().to_string()
}

/// Genre candidate: absent when missing or when it is really trailer/IMDb link text.
fn genre_at(segments: &[&str], index: usize) -> Option<String> {
    segments
        .get(index)
        .filter(|s| !is_link_text(s))
        .map(|s| s.trim().to_string())
}

/// Split `line` on `" - "` and classify runtime, rating and genre.
///
/// When the first segment is not a duration it becomes the genre and the remaining
/// segments are dropped.
pub fn parse_info(line: &str) -> MovieInfo {
    let segments: Vec<&str> = line.split(SEPARATOR).map(str::trim).collect();
    let first = segments.first().copied().unwrap_or_default();

    let info = if !is_duration(first) {
        MovieInfo {
            runtime: None,
            rating: None,
            genre: Some(first.to_string()),
        }
    } else {
        let runtime = Some(first.to_string());
        match segments.get(1) {
            Some(second) if is_rated(second) => MovieInfo {
                runtime,
                rating: Some(second.replacen("Rated", "", 1).trim().to_string()),
                genre: genre_at(&segments, 2),
            },
            Some(_) => MovieInfo {
                runtime,
                rating: None,
                genre: genre_at(&segments, 1),
            },
            None => MovieInfo {
                runtime,
                ..MovieInfo::default()
            },
        }
    };

    MovieInfo {
        runtime: info.runtime.as_deref().map(ascii_only),
        rating: info.rating.as_deref().map(ascii_only),
        genre: info.genre.as_deref().map(ascii_only),
    }
}

/// Pull `Director:` and `Cast:` out of the credits line.
pub fn parse_credits(line: &str) -> Credits {
    let mut credits = Credits::default();
    for segment in line.split(SEPARATOR).map(str::trim) {
        if let Some(director) = segment.strip_prefix("Director:") {
            credits.director = Some(director.trim().to_string());
        } else if let Some(cast) = segment.strip_prefix("Cast:") {
            credits.cast = Some(
                cast.split(", ")
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }
    }
    credits
}
