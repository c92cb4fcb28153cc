//! Poster lookup on IMDb title pages.

use reqwest::Client;
use scraper::Html;

use crate::config::DEFAULT_USER_AGENT;
use crate::error::Result;
use crate::fetch::get_text;
use crate::markup::{self, selector};

const IMDB_TITLE_URL: &str = "http://www.imdb.com/title/";

#[async_trait::async_trait]
pub trait PosterLookup: Send + Sync {
    /// Poster image URL for an IMDb title id such as `tt0371746`.
    async fn poster(&self, imdb_id: &str) -> Result<Option<String>>;
}

pub struct ImdbPosters {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl ImdbPosters {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: IMDB_TITLE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// `src` of the primary poster image on a title page.
pub fn poster_src(html: &str) -> Result<Option<String>> {
    let doc = Html::parse_document(html);
    let img = selector("#img_primary img")?;
    Ok(markup::first_attr(doc.root_element(), &img, "src")
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(str::to_string))
}

#[async_trait::async_trait]
impl PosterLookup for ImdbPosters {
    async fn poster(&self, imdb_id: &str) -> Result<Option<String>> {
        let url = format!("{}{}", self.base_url, imdb_id);
        let body = get_text(&self.client, &url, &self.user_agent, &[]).await?;
        poster_src(&body)
    }
}
