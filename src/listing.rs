//! Locating theater and movie blocks in a listing page.
//!
//! Theater-grouped page:
//!
//! ```html
//! <div class="theater">
//!   <div class="desc">
//!     <h2 class="name"><a href="/movies?near=...&tid=...">Castro Theatre</a></h2>
//!     <div class="info">429 Castro St, San Francisco - (415) 621-6120</div>
//!   </div>
//!   <div class="showtimes">
//!     <div class="movie">
//!       <div class="name"><a href="/movies?near=...&mid=...">Vertigo</a></div>
//!       <span class="info">2hr 8min - Rated PG - Mystery - <a href="/url?q=...">Trailer</a><br>Director: ...</span>
//!       <div class="syn"><span>...</span><span style="display:none">... <a>« less</a></span><a>more »</a></div>
//!       <div class="times">1:00  4:00  7:00pm</div>
//!     </div>
//!   </div>
//! </div>
//! ```
//!
//! A movie-grouped page swaps the nesting: `.movie` blocks hold their header in `.desc`
//! and a `.showtimes .theater` per screening venue, each with `.name`, `.address` and `.times`.

use scraper::{ElementRef, Html, Selector};

use crate::description;
use crate::error::{Error, Result};
use crate::info_line::{self, Credits, MovieInfo};
use crate::markup::{self, Case, selector};
use crate::redirect;
use crate::times;
use crate::{Movie, Theater};

const INFO_SEPARATOR: &str = " - ";

struct Selectors {
    results: Selector,
    theater: Selector,
    movie: Selector,
    desc: Selector,
    theater_name: Selector,
    theater_link: Selector,
    theater_info: Selector,
    nested_movie: Selector,
    nested_theater: Selector,
    name: Selector,
    name_link: Selector,
    info: Selector,
    address: Selector,
    link: Selector,
    syn: Selector,
    span: Selector,
    hidden_span: Selector,
    times: Selector,
    navbar_link: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            results: selector("#results")?,
            theater: selector(".theater")?,
            movie: selector(".movie")?,
            desc: selector(".desc")?,
            theater_name: selector(".desc h2.name")?,
            theater_link: selector(".desc h2.name a")?,
            theater_info: selector(".desc .info")?,
            nested_movie: selector(".showtimes .movie")?,
            nested_theater: selector(".showtimes .theater")?,
            name: selector(".name")?,
            name_link: selector(".name a")?,
            info: selector(".info")?,
            address: selector(".address")?,
            link: selector("a")?,
            syn: selector(".syn")?,
            span: selector("span")?,
            hidden_span: selector(r#"span[style*="display:none"], span[style*="display: none"]"#)?,
            times: selector(".times")?,
            navbar_link: selector("#navbar td a")?,
        })
    }
}

/// The page's own status text, used when it lists nothing.
fn empty_result(doc: &Html, s: &Selectors) -> Error {
    let message = markup::first_text(doc.root_element(), &s.results).unwrap_or_default();
    Error::EmptyResult(message)
}

/// `address - phone`; either part may be missing.
fn address_and_phone(line: Option<String>) -> (String, String) {
    let line = line.unwrap_or_default();
    let mut parts = line.split(INFO_SEPARATOR).map(str::trim);
    let address = parts.next().unwrap_or_default().to_string();
    let phone = parts.next().unwrap_or_default().to_string();
    (address, phone)
}

fn synopsis(block: ElementRef<'_>, s: &Selectors) -> String {
    let Some(syn) = block.select(&s.syn).next() else {
        return String::new();
    };
    let hidden = syn.select(&s.hidden_span).next();
    let hidden_id = hidden.map(|h| h.id());
    let primary = match syn.select(&s.span).find(|span| Some(span.id()) != hidden_id) {
        Some(span) => markup::text(span),
        None if hidden.is_none() => markup::text(syn),
        None => String::new(),
    };
    let expanded = hidden.map(markup::text);
    let toggle = hidden
        .and_then(|h| markup::find_last_containing(h, &s.link, "less", Case::Insensitive))
        .map(markup::text);
    description::reconstruct(&primary, expanded.as_deref(), toggle.as_deref())
}

fn link_target(info: ElementRef<'_>, s: &Selectors, label: &str) -> Option<String> {
    markup::find_containing(info, &s.link, label, Case::Sensitive)
        .and_then(|a| redirect::target_url(a.value().attr("href")))
}

/// Fields of one movie block. `None` when the block has no description.
fn movie_block(block: ElementRef<'_>, s: &Selectors) -> Option<Movie> {
    let description = synopsis(block, s);
    if description.is_empty() {
        return None;
    }

    let info_el = block.select(&s.info).next();
    let lines = info_el.map(markup::lines).unwrap_or_default();
    let info = lines
        .first()
        .filter(|line| !line.is_empty())
        .map(|line| info_line::parse_info(line))
        .unwrap_or_else(MovieInfo::default);
    let credits = if lines.len() > 1 {
        info_line::parse_credits(&lines[1..].join(INFO_SEPARATOR))
    } else {
        Credits::default()
    };

    Some(Movie {
        id: redirect::movie_id(markup::first_attr(block, &s.name_link, "href")).unwrap_or_default(),
        name: markup::first_text(block, &s.name).unwrap_or_default(),
        runtime: info.runtime,
        rating: info.rating,
        genre: info.genre,
        trailer: info_el.and_then(|el| link_target(el, s, "Trailer")),
        imdb: info_el.and_then(|el| link_target(el, s, "IMDb")),
        director: credits.director,
        cast: credits.cast,
        description,
        poster_url: None,
        showtimes: block
            .select(&s.times)
            .next()
            .map(|t| times::normalize_text(&markup::text(t)))
            .unwrap_or_default(),
        theaters: Vec::new(),
    })
}

fn theater_block(block: ElementRef<'_>, s: &Selectors) -> Theater {
    let (address, phone_number) = address_and_phone(markup::first_text(block, &s.theater_info));
    Theater {
        id: redirect::theater_id(markup::first_attr(block, &s.theater_link, "href"))
            .unwrap_or_default(),
        name: markup::first_text(block, &s.theater_name).unwrap_or_default(),
        address,
        phone_number,
        movies: block
            .select(&s.nested_movie)
            .filter_map(|movie| movie_block(movie, s))
            .collect(),
        showtimes: Vec::new(),
    }
}

fn nested_theater(block: ElementRef<'_>, s: &Selectors) -> Theater {
    let (address, phone_number) = address_and_phone(markup::first_text(block, &s.address));
    Theater {
        id: redirect::theater_id(markup::first_attr(block, &s.name_link, "href"))
            .unwrap_or_default(),
        name: markup::first_text(block, &s.name).unwrap_or_default(),
        address,
        phone_number,
        movies: Vec::new(),
        showtimes: block
            .select(&s.times)
            .next()
            .map(|t| times::normalize_text(&markup::text(t)))
            .unwrap_or_default(),
    }
}

/// Theaters on a theater-grouped page, movies nested.
pub fn theaters(doc: &Html) -> Result<Vec<Theater>> {
    let s = Selectors::new()?;
    let blocks: Vec<ElementRef<'_>> = doc.select(&s.theater).collect();
    if blocks.is_empty() {
        return Err(empty_result(doc, &s));
    }
    Ok(blocks.into_iter().map(|b| theater_block(b, &s)).collect())
}

/// Movies on a movie-grouped page, theaters nested.
pub fn movies(doc: &Html) -> Result<Vec<Movie>> {
    let s = Selectors::new()?;
    let blocks: Vec<ElementRef<'_>> = doc.select(&s.movie).collect();
    if blocks.is_empty() {
        return Err(empty_result(doc, &s));
    }
    Ok(blocks
        .into_iter()
        .filter_map(|block| {
            let header = block.select(&s.desc).next()?;
            let mut movie = movie_block(header, &s)?;
            movie.theaters = block
                .select(&s.nested_theater)
                .map(|t| nested_theater(t, &s))
                .collect();
            Some(movie)
        })
        .collect())
}

/// Whether the page navigation offers a further page.
pub fn has_next_page(doc: &Html) -> Result<bool> {
    let s = Selectors::new()?;
    Ok(markup::find_containing(doc.root_element(), &s.navbar_link, "Next", Case::Sensitive).is_some())
}
