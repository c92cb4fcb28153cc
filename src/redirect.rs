//! Decoding of the redirect ("cloaked") links listings use for ids, trailers and IMDb pages.

use url::Url;

/// Links in the listing are relative to this origin.
const LINK_ORIGIN: &str = "https://google.com";

/// Value of query parameter `key` in `href`, which may be absolute or site-relative.
///
/// Returns `None` when the href is empty, unparseable, or lacks the parameter.
pub fn query_param(href: Option<&str>, key: &str) -> Option<String> {
    let href = href.map(str::trim).filter(|h| !h.is_empty())?;
    let base = Url::parse(LINK_ORIGIN).ok()?;
    let url = base.join(href).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Theater id from the `tid` parameter of a theater link.
pub fn theater_id(href: Option<&str>) -> Option<String> {
    query_param(href, "tid")
}

/// Movie id from the `mid` parameter of a movie link.
pub fn movie_id(href: Option<&str>) -> Option<String> {
    query_param(href, "mid")
}

/// True target of a `/url?q=...` redirect, e.g. a trailer or IMDb page.
pub fn target_url(href: Option<&str>) -> Option<String> {
    query_param(href, "q").filter(|q| !q.is_empty())
}

/// IMDb title id: the last non-empty path segment of an IMDb URL.
pub fn imdb_id(imdb_url: &str) -> Option<String> {
    let url = Url::parse(imdb_url).ok()?;
    url.path_segments()?
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}
