//! Outbound HTTP fetchers
//!
//! Three fetch shapes, matching how their callers handle failure:
//! the price export treats any non-200 as an error the caller skips a
//! cycle over; article fetches swallow every failure into `None` because
//! an unavailable article is an expected, per-row condition; the quote
//! page is an error because without it the whole ticker capture is moot.
//!
//! No retries anywhere. A failed fetch is simply skipped for that cycle.

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{info, warn};

use crate::error::PipelineError;

/// Build the shared HTTP client carrying the configured User-Agent.
pub fn build_client(user_agent: &str) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .build()
        .context("Failed to build HTTP client")
}

/// Fetch the provider's CSV price export. Non-200 status is an error;
/// the caller decides whether to skip the cycle.
pub async fn fetch_export_csv(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .context("Failed to send export request")?;

    if !response.status().is_success() {
        return Err(PipelineError::Fetch(format!(
            "export endpoint returned status {}",
            response.status()
        ))
        .into());
    }

    response
        .text()
        .await
        .context("Failed to read export response body")
}

/// Fetch an article body. Returns `None` on non-200 status or transport
/// error; callers must treat that as "unavailable", never as legitimate
/// empty content.
pub async fn fetch_article(client: &Client, url: &str) -> Option<String> {
    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            warn!("Error fetching article from {}: {}", url, e);
            return None;
        }
    };

    if !response.status().is_success() {
        warn!(
            "Failed to fetch article from {}: {}",
            url,
            response.status()
        );
        return None;
    }

    match response.text().await {
        Ok(body) => Some(body),
        Err(e) => {
            warn!("Error reading article body from {}: {}", url, e);
            None
        }
    }
}

/// Fetch the quote page for a ticker, for the news-table scrape. The
/// ticker is appended to the configured base URL.
pub async fn fetch_quote_page(client: &Client, base_url: &str, ticker: &str) -> Result<String> {
    let url = format!("{}{}", base_url, ticker);
    info!("Fetching quote page {}", url);
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Failed to request quote page {}", url))?;

    if !response.status().is_success() {
        return Err(PipelineError::Fetch(format!(
            "quote page {} returned status {}",
            url,
            response.status()
        ))
        .into());
    }

    response.text().await.context("Failed to read quote page body")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_export_fetch_returns_body_on_200() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/export.ashx")
            .with_status(200)
            .with_body("Ticker,Price\nAAPL,187.44\n")
            .create_async()
            .await;

        let client = build_client("test-agent").unwrap();
        let url = format!("{}/export.ashx", server.url());
        let body = fetch_export_csv(&client, &url).await.unwrap();
        assert_eq!(body, "Ticker,Price\nAAPL,187.44\n");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_export_fetch_errors_on_non_200() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/export.ashx")
            .with_status(503)
            .create_async()
            .await;

        let client = build_client("test-agent").unwrap();
        let url = format!("{}/export.ashx", server.url());
        let err = fetch_export_csv(&client, &url).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::Fetch(_))
        ));
    }

    #[tokio::test]
    async fn test_article_fetch_swallows_failures() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/gone")
            .with_status(404)
            .create_async()
            .await;

        let client = build_client("test-agent").unwrap();
        assert_eq!(
            fetch_article(&client, &format!("{}/gone", server.url())).await,
            None
        );
        // Unreachable host: transport error, still None
        assert_eq!(
            fetch_article(&client, "http://127.0.0.1:1/article").await,
            None
        );
    }

    #[tokio::test]
    async fn test_quote_page_appends_ticker_to_base_url() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/quote.ashx?t=AAPL")
            .with_status(200)
            .with_body("<table id=\"news-table\"></table>")
            .create_async()
            .await;

        let client = build_client("test-agent").unwrap();
        let base = format!("{}/quote.ashx?t=", server.url());
        let html = fetch_quote_page(&client, &base, "AAPL").await.unwrap();
        assert!(html.contains("news-table"));
    }

    #[tokio::test]
    async fn test_quote_page_fetch_errors_on_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/quote.ashx?t=AAPL")
            .with_status(500)
            .create_async()
            .await;

        let client = build_client("test-agent").unwrap();
        let base = format!("{}/quote.ashx?t=", server.url());
        let err = fetch_quote_page(&client, &base, "AAPL").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::Fetch(_))
        ));

        assert!(
            fetch_quote_page(&client, "http://127.0.0.1:1/quote.ashx?t=", "AAPL")
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_article_fetch_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/story")
            .with_status(200)
            .with_body("<p>Body text</p>")
            .create_async()
            .await;

        let client = build_client("test-agent").unwrap();
        let body = fetch_article(&client, &format!("{}/story", server.url())).await;
        assert_eq!(body.as_deref(), Some("<p>Body text</p>"));
    }
}
