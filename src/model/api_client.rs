//! SoundPy backend HTTP client

use std::time::Duration;

use anyhow::{Context, Result};
use futures::future::BoxFuture;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::{log_api_request, log_api_result};
use super::content::{
    Playlist, PlaylistJson, PlaylistSummary, PlaylistSummaryJson, SearchResponseJson, StreamDescriptor,
    StreamJson, Track,
};

/// Remote endpoints consumed by the controllers.
///
/// Every call is single-shot: no retry, no batching.
pub trait MusicApi: Send + Sync {
    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<Track>>>;
    fn get_playlists<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<PlaylistSummary>>>;
    fn playlist<'a>(&'a self, link: &'a str) -> BoxFuture<'a, Result<Playlist>>;
    fn download<'a>(&'a self, link: &'a str) -> BoxFuture<'a, Result<Vec<u8>>>;
    fn stream<'a>(&'a self, link: &'a str) -> BoxFuture<'a, Result<StreamDescriptor>>;
    /// Raw GET of an absolute URL (artwork, resolved stream URLs)
    fn fetch_bytes<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>>>;
}

#[derive(Debug)]
pub struct HttpStatusError {
    pub endpoint: String,
    pub status: StatusCode,
}

impl std::fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} returned {}", self.endpoint, self.status)
    }
}

impl std::error::Error for HttpStatusError {}

/// `reqwest` implementation of [`MusicApi`]
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(base_url).with_context(|| format!("invalid API base URL: {}", base_url))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;

        Ok(Self { http, base_url: base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, param: &str, value: &str) -> Result<Url> {
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut().append_pair(param, value);
        Ok(url)
    }

    async fn get_response(&self, url: Url, endpoint: &str) -> Result<reqwest::Response> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HttpStatusError { endpoint: endpoint.to_string(), status }.into());
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, param: &str, value: &str) -> Result<T> {
        let url = self.endpoint(path, param, value)?;
        let response = self.get_response(url, path).await?;
        response
            .json::<T>()
            .await
            .with_context(|| format!("decoding /{} response", path))
    }

    async fn get_bytes(&self, url: Url, endpoint: &str) -> Result<Vec<u8>> {
        let response = self.get_response(url, endpoint).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

impl MusicApi for ApiClient {
    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<Track>>> {
        Box::pin(async move {
            log_api_request!("search", query);
            let result = self
                .get_json::<SearchResponseJson>("search", "query", query)
                .await
                .map(|body| body.results.into_iter().map(Track::from).collect::<Vec<_>>());
            log_api_result!("search", result);
            result
        })
    }

    fn get_playlists<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<PlaylistSummary>>> {
        Box::pin(async move {
            log_api_request!("getPlaylist", query);
            let result = self
                .get_json::<Vec<PlaylistSummaryJson>>("getPlaylist", "query", query)
                .await
                .map(|body| body.into_iter().map(PlaylistSummary::from).collect::<Vec<_>>());
            log_api_result!("getPlaylist", result);
            result
        })
    }

    fn playlist<'a>(&'a self, link: &'a str) -> BoxFuture<'a, Result<Playlist>> {
        Box::pin(async move {
            log_api_request!("playlist", link);
            let result = self
                .get_json::<PlaylistJson>("playlist", "link", link)
                .await
                .map(|body| body.into_playlist(None));
            log_api_result!("playlist", result);
            result
        })
    }

    fn download<'a>(&'a self, link: &'a str) -> BoxFuture<'a, Result<Vec<u8>>> {
        Box::pin(async move {
            log_api_request!("download", link);
            let result = match self.endpoint("download", "link", link) {
                Ok(url) => self.get_bytes(url, "download").await,
                Err(e) => Err(e),
            };
            log_api_result!("download", result);
            result
        })
    }

    fn stream<'a>(&'a self, link: &'a str) -> BoxFuture<'a, Result<StreamDescriptor>> {
        Box::pin(async move {
            log_api_request!("stream", link);
            let result = self
                .get_json::<StreamJson>("stream", "link", link)
                .await
                .map(StreamDescriptor::from);
            log_api_result!("stream", result);
            result
        })
    }

    fn fetch_bytes<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>>> {
        Box::pin(async move {
            let parsed = Url::parse(url).with_context(|| format!("invalid URL: {}", url))?;
            self.get_bytes(parsed, url).await
        })
    }
}
