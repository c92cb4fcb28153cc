//! Fetching listing pages.

use reqwest::{Client, header};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Source of listing pages.
///
/// Implementations perform one request per call and never retry.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page for `query` and return its markup.
    async fn fetch(&self, query: &[(&str, String)]) -> Result<String>;
}

/// Fetches listing pages over HTTP.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, query: &[(&str, String)]) -> Result<String> {
        debug!(url = %self.base_url, ?query, "fetching listing page");
        get_text(&self.client, &self.base_url, &self.user_agent, query).await
    }
}

/// GET `url` with the given user agent and return the body of a successful response.
pub(crate) async fn get_text(
    client: &Client,
    url: &str,
    user_agent: &str,
    query: &[(&str, String)],
) -> Result<String> {
    let resp = client
        .get(url)
        .header(header::USER_AGENT, user_agent)
        .query(query)
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(resp.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn sends_query_and_user_agent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/movies")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("near".into(), "94103".into()),
                Matcher::UrlEncoded("date".into(), "0".into()),
                Matcher::UrlEncoded("start".into(), "10".into()),
            ]))
            .match_header("user-agent", "test-agent")
            .with_status(200)
            .with_body("<html></html>")
            .expect(1)
            .create_async()
            .await;

        let config = ClientConfig::default()
            .with_base_url(format!("{}/movies", server.url()))
            .with_user_agent("test-agent");
        let fetcher = HttpFetcher::new(Client::new(), &config);
        let body = fetcher
            .fetch(&[
                ("near", "94103".to_string()),
                ("date", "0".to_string()),
                ("start", "10".to_string()),
            ])
            .await
            .unwrap();
        assert_eq!(body, "<html></html>");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_transport_failure() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/movies")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("busy")
            .create_async()
            .await;

        let config = ClientConfig::default().with_base_url(format!("{}/movies", server.url()));
        let fetcher = HttpFetcher::new(Client::new(), &config);
        let err = fetcher.fetch(&[("near", "x".to_string())]).await.unwrap_err();
        assert!(matches!(err, Error::Status { status: 503, .. }));
        assert!(err.is_transport());

        mock.assert_async().await;
    }
}
