//! Resource hints: warm the HTTP cache for a view that will likely open next.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use ct_core::ports::ResourceHintPort;
use reqwest::{Client, Url};
use tracing::debug;

/// Low-priority `GET {site}{path}` whose body is discarded.
pub struct HttpResourceHint {
    client: Client,
    site_base_url: Url,
}

impl HttpResourceHint {
    pub fn new(site_base_url: &str) -> Result<Self> {
        let site_base_url = Url::parse(site_base_url)
            .with_context(|| format!("invalid site base URL: {site_base_url}"))?;
        if site_base_url.cannot_be_a_base() {
            bail!("site base URL cannot carry a path: {site_base_url}");
        }
        let client = Client::builder()
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            site_base_url,
        })
    }

    /// View paths arrive already percent-encoded and are appended under the
    /// base path, so a site mounted at `/app` is hinted at `/app/en/...`.
    fn target(&self, path: &str) -> Url {
        let mut url = self.site_base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url
    }
}

#[async_trait]
impl ResourceHintPort for HttpResourceHint {
    async fn hint(&self, path: &str) -> Result<()> {
        let url = self.target(path);
        let response = self
            .client
            .get(url.clone())
            .header("priority", "u=5")
            .header("purpose", "prefetch")
            .send()
            .await
            .with_context(|| format!("prefetch request to {url} failed"))?;
        let status = response.status();
        if !status.is_success() {
            bail!("prefetch of {url} returned {status}");
        }
        // Reading the body is what populates intermediate caches.
        let bytes = response.bytes().await?;
        debug!(%url, size = bytes.len(), "View prefetched");
        Ok(())
    }
}

/// Used when no site is configured.
pub struct NoopResourceHint;

#[async_trait]
impl ResourceHintPort for NoopResourceHint {
    async fn hint(&self, _path: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn hint_fetches_view_path_with_low_priority() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/en/project/p2")
            .match_header("priority", "u=5")
            .match_header("purpose", "prefetch")
            .with_status(200)
            .with_body("<html></html>")
            .create_async()
            .await;
        let hint = HttpResourceHint::new(&server.url()).unwrap();

        hint.hint("/en/project/p2").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn hint_keeps_site_base_path() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/site/en/project/p2")
            .with_status(200)
            .create_async()
            .await;
        let hint = HttpResourceHint::new(&format!("{}/site/", server.url())).unwrap();

        hint.hint("/en/project/p2").await.unwrap();

        mock.assert_async().await;
    }

    #[test]
    fn target_does_not_reencode_view_path() {
        let hint = HttpResourceHint::new("https://codetok.example/app").unwrap();

        assert_eq!(
            hint.target("/en/project/a%20b").as_str(),
            "https://codetok.example/app/en/project/a%20b"
        );
        let root = HttpResourceHint::new("https://codetok.example").unwrap();
        assert_eq!(
            root.target("/en/project/p1").as_str(),
            "https://codetok.example/en/project/p1"
        );
    }

    #[tokio::test]
    async fn hint_reports_error_status() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/en/project/p2")
            .with_status(500)
            .create_async()
            .await;
        let hint = HttpResourceHint::new(&server.url()).unwrap();

        assert!(hint.hint("/en/project/p2").await.is_err());
    }

    #[tokio::test]
    async fn noop_hint_always_succeeds() {
        assert!(NoopResourceHint.hint("/en").await.is_ok());
    }
}
