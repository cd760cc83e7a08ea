//! Concrete downloads client backed by the GitHub HTTP API.
//!
//! Bridges the [`DownloadsClient`] trait from the core crate to reqwest.
//! Authentication is fixed at construction from resolved [`Credentials`];
//! the host may be a bare hostname (https assumed) or a full URL whose
//! scheme is kept.

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use tracing::debug;

use ghd_uploader_core::contract::{ClientError, Download, DownloadsClient, NewDownload};
use ghd_uploader_core::credentials::Credentials;
use ghd_uploader_core::repository::RepositoryId;

/// Default host for API calls.
pub const DEFAULT_HOST: &str = "api.github.com";

pub struct GitHubDownloads {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl GitHubDownloads {
    pub fn new(host: &str, credentials: Credentials) -> Self {
        let host = if host.is_empty() { DEFAULT_HOST } else { host };
        if host != DEFAULT_HOST {
            debug!(host, "Using custom host");
        }
        let base_url = if host.contains("://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("https://{host}")
        };
        Self {
            http: reqwest::Client::new(),
            base_url,
            credentials,
        }
    }

    fn downloads_url(&self, repo: &RepositoryId) -> String {
        format!(
            "{}/repos/{}/{}/downloads",
            self.base_url,
            repo.owner(),
            repo.name()
        )
    }

    fn authenticate(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::OAuth2(token) => request.bearer_auth(token),
        }
    }
}

/// Wire shape of one download in a listing response.
#[derive(Debug, Deserialize)]
struct DownloadResource {
    #[serde(default)]
    name: String,
    id: i64,
}

async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(format!("{status}: {body}").into())
}

#[async_trait]
impl DownloadsClient for GitHubDownloads {
    async fn list_downloads(&self, repo: &RepositoryId) -> Result<Vec<Download>, ClientError> {
        let response = self
            .authenticate(self.http.get(self.downloads_url(repo)))
            .send()
            .await?;
        let resources: Vec<DownloadResource> = expect_success(response).await?.json().await?;
        Ok(resources
            .into_iter()
            .map(|resource| Download {
                name: resource.name,
                id: resource.id,
            })
            .collect())
    }

    async fn delete_download(&self, repo: &RepositoryId, id: i64) -> Result<(), ClientError> {
        let url = format!("{}/{}", self.downloads_url(repo), id);
        let response = self.authenticate(self.http.delete(url)).send().await?;
        expect_success(response).await?;
        Ok(())
    }

    async fn create_download<'a>(
        &self,
        repo: &RepositoryId,
        new: NewDownload<'a>,
        content: Vec<u8>,
    ) -> Result<(), ClientError> {
        let mut form = multipart::Form::new()
            .text("name", new.name.to_string())
            .text("size", new.size.to_string())
            .part(
                "file",
                multipart::Part::bytes(content).file_name(new.name.to_string()),
            );
        if let Some(description) = new.description {
            form = form.text("description", description.to_string());
        }
        let response = self
            .authenticate(self.http.post(self.downloads_url(repo)).multipart(form))
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(host: &str) -> GitHubDownloads {
        GitHubDownloads::new(host, Credentials::OAuth2("token".into()))
    }

    #[test]
    fn bare_hostnames_get_https() {
        let repo = RepositoryId::new("owner", "repo").unwrap();
        assert_eq!(
            client("api.github.com").downloads_url(&repo),
            "https://api.github.com/repos/owner/repo/downloads"
        );
    }

    #[test]
    fn full_urls_keep_their_scheme() {
        let repo = RepositoryId::new("owner", "repo").unwrap();
        assert_eq!(
            client("http://ghe.local:8080/").downloads_url(&repo),
            "http://ghe.local:8080/repos/owner/repo/downloads"
        );
    }

    #[test]
    fn empty_host_falls_back_to_the_default() {
        let repo = RepositoryId::new("owner", "repo").unwrap();
        assert_eq!(
            client("").downloads_url(&repo),
            "https://api.github.com/repos/owner/repo/downloads"
        );
    }
}
