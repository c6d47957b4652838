//! HTTP catalog adapter
//! 基于 HTTP 的作品目录适配器
//!
//! `GET {base}/api/projects/{id}` and `GET {base}/api/projects/random`.

use anyhow::{bail, Context};
use async_trait::async_trait;
use ct_core::ports::{CatalogError, FetchPriority, ProjectCatalogPort};
use ct_core::{ProjectId, ProjectPayload};
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, instrument};

/// RFC 9218 urgency for background requests.
const PRIORITY_HEADER: &str = "priority";
const LOW_PRIORITY: &str = "u=5";

const RANDOM_SEGMENT: &str = "random";

pub struct HttpProjectCatalog {
    client: Client,
    base_url: Url,
}

impl HttpProjectCatalog {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .context("failed to build HTTP client")?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> anyhow::Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("invalid API base URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            bail!("API base URL cannot carry a path: {base_url}");
        }
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segment: &str) -> Result<Url, CatalogError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::Transport(format!("bad base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "projects", segment]);
        Ok(url)
    }

    async fn get(&self, url: Url, priority: FetchPriority) -> Result<ProjectPayload, CatalogError> {
        let mut request = self.client.get(url);
        if priority == FetchPriority::Low {
            request = request.header(PRIORITY_HEADER, LOW_PRIORITY);
        }

        let response = request.send().await.map_err(map_transport)?;
        let status = response.status();
        debug!(%status, "Catalog responded");

        match status {
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound),
            _ if !status.is_success() => Err(CatalogError::Status(status.as_u16())),
            _ => response
                .json::<ProjectPayload>()
                .await
                .map_err(|e| CatalogError::Decode(e.to_string())),
        }
    }
}

fn map_transport(error: reqwest::Error) -> CatalogError {
    match error.status() {
        Some(StatusCode::NOT_FOUND) => CatalogError::NotFound,
        Some(status) => CatalogError::Status(status.as_u16()),
        None => CatalogError::Transport(error.to_string()),
    }
}

#[async_trait]
impl ProjectCatalogPort for HttpProjectCatalog {
    #[instrument(skip(self, id), fields(project_id = %id))]
    async fn fetch_project(
        &self,
        id: &ProjectId,
        priority: FetchPriority,
    ) -> Result<ProjectPayload, CatalogError> {
        let url = self.endpoint(id.as_str())?;
        self.get(url, priority).await
    }

    #[instrument(skip(self))]
    async fn fetch_random(&self, priority: FetchPriority) -> Result<ProjectPayload, CatalogError> {
        let url = self.endpoint(RANDOM_SEGMENT)?;
        self.get(url, priority).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const BODY: &str = r#"{
        "projectId": "p1",
        "title": "Demo",
        "files": ["a.html", "b.css"],
        "mainFile": "a.html",
        "fileContents": {"a.html": "<h1>Hi</h1>", "b.css": "h1{}"}
    }"#;

    #[tokio::test]
    async fn fetch_project_decodes_payload() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/projects/p1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .create_async()
            .await;
        let catalog = HttpProjectCatalog::new(&server.url()).unwrap();

        let payload = catalog
            .fetch_project(&ProjectId::from("p1"), FetchPriority::Normal)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(payload.main_file, "a.html");
        assert_eq!(payload.file_contents.len(), 2);
    }

    #[tokio::test]
    async fn missing_project_maps_to_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/projects/missing")
            .with_status(404)
            .create_async()
            .await;
        let catalog = HttpProjectCatalog::new(&server.url()).unwrap();

        let err = catalog
            .fetch_project(&ProjectId::from("missing"), FetchPriority::Normal)
            .await
            .unwrap_err();

        assert_eq!(err, CatalogError::NotFound);
    }

    #[tokio::test]
    async fn other_statuses_are_generic_failures() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/projects/random")
            .with_status(502)
            .create_async()
            .await;
        let catalog = HttpProjectCatalog::new(&server.url()).unwrap();

        let err = catalog.fetch_random(FetchPriority::Normal).await.unwrap_err();

        assert_eq!(err, CatalogError::Status(502));
    }

    #[tokio::test]
    async fn low_priority_requests_carry_priority_header() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/projects/random")
            .match_header("priority", "u=5")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .create_async()
            .await;
        let catalog = HttpProjectCatalog::new(&server.url()).unwrap();

        catalog.fetch_random(FetchPriority::Low).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn normal_priority_requests_omit_priority_header() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/projects/random")
            .match_header("priority", Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .create_async()
            .await;
        let catalog = HttpProjectCatalog::new(&server.url()).unwrap();

        catalog.fetch_random(FetchPriority::Normal).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/projects/p1")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;
        let catalog = HttpProjectCatalog::new(&server.url()).unwrap();

        let err = catalog
            .fetch_project(&ProjectId::from("p1"), FetchPriority::Normal)
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_kept() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/codetok/api/projects/p1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .create_async()
            .await;
        let catalog = HttpProjectCatalog::new(&format!("{}/codetok/", server.url())).unwrap();

        catalog
            .fetch_project(&ProjectId::from("p1"), FetchPriority::Normal)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(HttpProjectCatalog::new("not a url").is_err());
        assert!(HttpProjectCatalog::new("mailto:someone@example.com").is_err());
    }
}
