//! Driving extraction across every page of a listing.

use reqwest::Client;
use scraper::Html;
use tracing::{debug, info, instrument, warn};

use crate::config::{ClientConfig, ExtractionConfig, Grouping};
use crate::error::{Error, Result};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::listing;
use crate::poster::{ImdbPosters, PosterLookup};
use crate::redirect;
use crate::{Movie, Theater};

/// Result of a full listing extraction, shaped by the grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listings {
    Theaters(Vec<Theater>),
    Movies(Vec<Movie>),
}

impl Listings {
    pub fn len(&self) -> usize {
        match self {
            Listings::Theaters(t) => t.len(),
            Listings::Movies(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Entry point for showtime extraction.
///
/// Holds no per-request state; one instance can serve concurrent requests.
pub struct Showtimes {
    fetcher: Box<dyn PageFetcher>,
    posters: Box<dyn PosterLookup>,
    config: ClientConfig,
}

impl Showtimes {
    pub fn new(config: ClientConfig) -> Self {
        let client = Client::new();
        let fetcher = HttpFetcher::new(client.clone(), &config);
        let posters = ImdbPosters::new(client).with_user_agent(config.user_agent.clone());
        Self::with_collaborators(fetcher, posters, config)
    }

    pub fn with_collaborators(
        fetcher: impl PageFetcher + 'static,
        posters: impl PosterLookup + 'static,
        config: ClientConfig,
    ) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            posters: Box::new(posters),
            config,
        }
    }

    /// All theaters near `location`, each with its movies.
    pub async fn theaters(&self, location: &str, date_offset: i32) -> Result<Vec<Theater>> {
        let options = ExtractionConfig::new(date_offset, Grouping::ByTheater);
        self.paginate(location, options, listing::theaters).await
    }

    /// All movies near `location`, each with the theaters showing it.
    pub async fn movies(&self, location: &str, date_offset: i32) -> Result<Vec<Movie>> {
        let options = ExtractionConfig::new(date_offset, Grouping::ByMovie);
        self.paginate(location, options, listing::movies).await
    }

    pub async fn listings(&self, location: &str, options: ExtractionConfig) -> Result<Listings> {
        match options.grouping {
            Grouping::ByTheater => self
                .paginate(location, options, listing::theaters)
                .await
                .map(Listings::Theaters),
            Grouping::ByMovie => self
                .paginate(location, options, listing::movies)
                .await
                .map(Listings::Movies),
        }
    }

    /// One movie by id with the theaters showing it, plus its poster when IMDb knows it.
    #[instrument(skip(self))]
    pub async fn movie(&self, location: &str, mid: &str, date_offset: i32) -> Result<Movie> {
        let query = [
            ("near", location.to_string()),
            ("mid", mid.to_string()),
            ("date", date_offset.to_string()),
        ];
        let body = self.fetcher.fetch(&query).await?;
        let mut movie = {
            let doc = Html::parse_document(&body);
            let mut movies = listing::movies(&doc)?;
            let index = movies.iter().position(|m| m.id == mid).unwrap_or(0);
            if index >= movies.len() {
                return Err(Error::EmptyResult(format!("movie {mid} has no listing")));
            }
            movies.swap_remove(index)
        };

        if let Some(imdb_id) = movie.imdb.as_deref().and_then(redirect::imdb_id) {
            match self.posters.poster(&imdb_id).await {
                Ok(poster) => movie.poster_url = poster,
                Err(e) => warn!(%imdb_id, error = %e, "poster lookup failed"),
            }
        }
        Ok(movie)
    }

    fn page_query(
        &self,
        location: &str,
        options: ExtractionConfig,
        page: u32,
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("near", location.to_string()),
            ("date", options.date_offset.to_string()),
            ("start", (page * self.config.page_size).to_string()),
        ];
        if options.grouping == Grouping::ByMovie {
            query.push(("sort", "1".to_string()));
        }
        query
    }

    /// Fetch pages one at a time from offset 0, accumulating records until the page has no
    /// "Next" control. Any failure, including running past `max_pages`, abandons the pages
    /// gathered so far.
    #[instrument(skip(self, extract), fields(grouping = ?options.grouping))]
    async fn paginate<T>(
        &self,
        location: &str,
        options: ExtractionConfig,
        extract: fn(&Html) -> Result<Vec<T>>,
    ) -> Result<Vec<T>> {
        let mut accumulated = Vec::new();
        for page in 0..self.config.max_pages {
            let query = self.page_query(location, options, page);
            let body = self.fetcher.fetch(&query).await?;
            let (records, has_next) = {
                let doc = Html::parse_document(&body);
                (extract(&doc)?, listing::has_next_page(&doc)?)
            };
            info!(page, records = records.len(), "extracted listing page");
            accumulated.extend(records);
            if !has_next {
                debug!(pages = page + 1, total = accumulated.len(), "reached last page");
                return Ok(accumulated);
            }
        }
        warn!(
            max_pages = self.config.max_pages,
            "page limit reached before the last page"
        );
        Err(Error::PageLimit {
            max_pages: self.config.max_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakePages {
        pages: Vec<String>,
        queries: Mutex<Vec<Vec<(String, String)>>>,
    }

    impl FakePages {
        fn new(pages: Vec<String>) -> Self {
            Self {
                pages,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<Vec<(String, String)>> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl PageFetcher for std::sync::Arc<FakePages> {
        async fn fetch(&self, query: &[(&str, String)]) -> Result<String> {
            let mut queries = self.queries.lock().unwrap();
            let call = queries.len();
            queries.push(query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect());
            self.pages.get(call).cloned().ok_or(Error::Status {
                status: 500,
                url: "fake".to_string(),
            })
        }
    }

    struct FixedPoster(Option<&'static str>);

    #[async_trait::async_trait]
    impl PosterLookup for FixedPoster {
        async fn poster(&self, _imdb_id: &str) -> Result<Option<String>> {
            match self.0 {
                Some(src) => Ok(Some(src.to_string())),
                None => Err(Error::Status {
                    status: 404,
                    url: "imdb".to_string(),
                }),
            }
        }
    }

    fn movie(name: &str, imdb: bool) -> String {
        let imdb_link = if imdb {
            r#" - <a href="/url?q=http://www.imdb.com/title/tt0371746/&amp;sa=X">IMDb</a>"#
        } else {
            ""
        };
        format!(
            r#"<div class="movie"><div class="name"><a href="/movies?mid={name}">{name}</a></div>
               <span class="info">1hr 30min - Rated R - Drama{imdb_link}</span>
               <div class="syn"><span>About {name}.</span></div>
               <div class="times">7:00  9:30pm</div></div>"#
        )
    }

    fn theater_page(theaters: &[&str], next: bool) -> String {
        let blocks: String = theaters
            .iter()
            .map(|name| {
                format!(
                    r#"<div class="theater"><div class="desc"><h2 class="name"><a href="/movies?tid={name}">{name}</a></h2>
                       <div class="info">1 Main St - 555-0100</div></div>
                       <div class="showtimes">{}</div></div>"#,
                    movie("Heat", false)
                )
            })
            .collect();
        let navbar = if next {
            r#"<div id="navbar"><table><tr><td><a href="/movies?start=10">Next</a></td></tr></table></div>"#
        } else {
            r#"<div id="navbar"><table><tr><td>1</td></tr></table></div>"#
        };
        format!(r#"<html><body><div id="results">{blocks}</div>{navbar}</body></html>"#)
    }

    fn movie_page(movies: &[&str], next: bool) -> String {
        let blocks: String = movies
            .iter()
            .map(|name| {
                format!(
                    r#"<div class="movie"><div class="desc"><h2 class="name"><a href="/movies?mid={name}">{name}</a></h2>
                       <div class="info">1hr 30min - Rated R - Drama - <a href="/url?q=http://www.imdb.com/title/tt0371746/&amp;sa=X">IMDb</a></div>
                       <div class="syn"><span>About {name}.</span></div></div>
                       <div class="showtimes"><div class="theater"><div class="name">Castro</div>
                       <div class="address">429 Castro St</div><div class="times">7:00  9:30pm</div></div></div></div>"#
                )
            })
            .collect();
        let navbar = if next {
            r#"<div id="navbar"><table><tr><td><a href="/movies?start=10">Next</a></td></tr></table></div>"#
        } else {
            ""
        };
        format!(r#"<html><body><div id="results">{blocks}</div>{navbar}</body></html>"#)
    }

    fn showtimes(pages: Vec<String>, config: ClientConfig) -> (Showtimes, std::sync::Arc<FakePages>) {
        let fake = std::sync::Arc::new(FakePages::new(pages));
        let showtimes =
            Showtimes::with_collaborators(fake.clone(), FixedPoster(Some("/poster.jpg")), config);
        (showtimes, fake)
    }

    fn param<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
        query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[tokio::test]
    async fn concatenates_pages_in_order() {
        let pages = vec![
            theater_page(&["a1", "a2"], true),
            theater_page(&["b1"], true),
            theater_page(&["c1"], false),
        ];
        let (showtimes, fake) = showtimes(pages, ClientConfig::default());

        let theaters = showtimes.theaters("94103", 2).await.unwrap();
        let ids: Vec<&str> = theaters.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "b1", "c1"]);
        assert_eq!(theaters[0].movies[0].showtimes, vec!["7:00pm", "9:30pm"]);

        let queries = fake.queries();
        assert_eq!(queries.len(), 3);
        let starts: Vec<&str> = queries.iter().filter_map(|q| param(q, "start")).collect();
        assert_eq!(starts, vec!["0", "10", "20"]);
        assert!(queries.iter().all(|q| param(q, "near") == Some("94103")));
        assert!(queries.iter().all(|q| param(q, "date") == Some("2")));
        assert!(queries.iter().all(|q| param(q, "sort").is_none()));
    }

    #[tokio::test]
    async fn failure_discards_earlier_pages() {
        // Second page is missing, so the fake reports a server error.
        let pages = vec![theater_page(&["a1"], true)];
        let (showtimes, fake) = showtimes(pages, ClientConfig::default());

        let err = showtimes.theaters("94103", 0).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(fake.queries().len(), 2);
    }

    #[tokio::test]
    async fn empty_first_page_is_an_error() {
        let pages = vec![
            r#"<html><body><div id="results">No showtimes were found.</div></body></html>"#
                .to_string(),
        ];
        let (showtimes, _) = showtimes(pages, ClientConfig::default());

        match showtimes.theaters("00000", 0).await {
            Err(Error::EmptyResult(msg)) => assert_eq!(msg, "No showtimes were found."),
            other => panic!("expected EmptyResult, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn movie_grouping_sorts_and_stops_on_last_page() {
        let pages = vec![movie_page(&["m1"], true), movie_page(&["m2", "m3"], false)];
        let (showtimes, fake) = showtimes(pages, ClientConfig::default());

        let listings = showtimes
            .listings("94103", ExtractionConfig::new(0, Grouping::ByMovie))
            .await
            .unwrap();
        let Listings::Movies(movies) = listings else {
            panic!("expected movies");
        };
        let ids: Vec<&str> = movies.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3"]);
        assert_eq!(movies[2].theaters[0].showtimes, vec!["7:00pm", "9:30pm"]);

        let queries = fake.queries();
        assert_eq!(queries.len(), 2);
        assert!(queries.iter().all(|q| param(q, "sort") == Some("1")));
    }

    #[tokio::test]
    async fn page_limit_is_an_error() {
        let pages = vec![
            theater_page(&["a"], true),
            theater_page(&["b"], true),
            theater_page(&["c"], true),
        ];
        let (showtimes, fake) = showtimes(pages, ClientConfig::default().with_max_pages(2));

        let err = showtimes.theaters("94103", 0).await.unwrap_err();
        assert!(matches!(err, Error::PageLimit { max_pages: 2 }));
        assert_eq!(fake.queries().len(), 2);
    }

    #[tokio::test]
    async fn single_movie_with_poster() {
        let pages = vec![movie_page(&["other", "m7"], false)];
        let (showtimes, fake) = showtimes(pages, ClientConfig::default());

        let movie = showtimes.movie("94103", "m7", 1).await.unwrap();
        assert_eq!(movie.id, "m7");
        assert_eq!(movie.poster_url.as_deref(), Some("/poster.jpg"));
        assert_eq!(movie.theaters.len(), 1);

        let queries = fake.queries();
        assert_eq!(param(&queries[0], "mid"), Some("m7"));
        assert_eq!(param(&queries[0], "date"), Some("1"));
    }

    #[tokio::test]
    async fn poster_failure_leaves_poster_absent() {
        let fake = std::sync::Arc::new(FakePages::new(vec![movie_page(&["m7"], false)]));
        let showtimes =
            Showtimes::with_collaborators(fake, FixedPoster(None), ClientConfig::default());

        let movie = showtimes.movie("94103", "m7", 0).await.unwrap();
        assert_eq!(movie.poster_url, None);
        assert!(movie.imdb.is_some());
    }

    #[tokio::test]
    async fn theater_page_movies_without_imdb() {
        let (showtimes, _) = showtimes(vec![theater_page(&["solo"], false)], ClientConfig::default());
        let theaters = showtimes.theaters("94103", 0).await.unwrap();
        assert_eq!(theaters.len(), 1);
        assert_eq!(theaters[0].movies[0].imdb, None);
        assert_eq!(theaters[0].movies[0].description, "About Heat.");
    }

    #[test]
    fn listings_len() {
        assert!(Listings::Movies(Vec::new()).is_empty());
        assert_eq!(Listings::Theaters(vec![Theater::default()]).len(), 1);
    }
}
