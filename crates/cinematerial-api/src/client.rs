//! `CinematerialClient` - Cinematerial API client implementation.

use std::fmt;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::instrument;
use url::Url;

use crate::api::LocalCinematerialApi;
use crate::error::{CinematerialError, Result};
use crate::params::{PosterQuery, ResolvedQuery, WidthBounds};
use crate::signer::{Md5Signer, RequestSigner};
use crate::types::CinematerialResult;

/// Default base URL for the Cinematerial API.
#[allow(clippy::expect_used)]
static DEFAULT_BASE_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://api.cinematerial.com/").expect("invalid default base URL")
});

/// Lookup endpoint, relative to the base URL.
const REQUEST_PATH: &str = "1/request.json";

/// Default User-Agent.
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Cinematerial API client.
///
/// Holds only immutable credentials and settings; share it behind an `Arc`
/// to search from several tasks at once.
#[allow(clippy::module_name_repetitions)]
pub struct CinematerialClient {
    /// HTTP client.
    http_client: Client,
    /// Full lookup endpoint URL (base URL joined with the request path).
    endpoint: Url,
    /// API key.
    api_key: String,
    /// API secret, only ever fed to the signer.
    api_secret: String,
    /// Accepted poster widths.
    width_bounds: WidthBounds,
    /// Request signer.
    signer: Arc<dyn RequestSigner>,
}

impl fmt::Debug for CinematerialClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CinematerialClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("width_bounds", &self.width_bounds)
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}

/// Builder for `CinematerialClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CinematerialClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    api_secret: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    width_bounds: Option<WidthBounds>,
    signer: Option<Arc<dyn RequestSigner>>,
}

impl CinematerialClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            api_secret: None,
            user_agent: None,
            timeout: None,
            width_bounds: None,
            signer: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API secret (required).
    #[must_use]
    pub fn api_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_secret = Some(secret.into());
        self
    }

    /// Sets the User-Agent (default: `cinematerial-api/<version>`).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets a deadline for each request, from connect to the end of the body.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the accepted poster widths (default: 30-300, default 300).
    #[must_use]
    pub const fn width_bounds(mut self, bounds: WidthBounds) -> Self {
        self.width_bounds = Some(bounds);
        self
    }

    /// Replaces the request signer (default: [`Md5Signer`]).
    #[must_use]
    pub fn signer(mut self, signer: impl RequestSigner + 'static) -> Self {
        self.signer = Some(Arc::new(signer));
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` or `api_secret` is not set ([`CinematerialError::MissingArgument`]).
    /// - `api_key` or `api_secret` is empty ([`CinematerialError::EmptyArgument`]).
    /// - The base URL cannot be joined with the request path.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<CinematerialClient> {
        let api_key = require_credential("api_key", self.api_key)?;
        let api_secret = require_credential("api_secret", self.api_secret)?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.clone());
        let endpoint = base_url.join(REQUEST_PATH)?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| String::from(DEFAULT_USER_AGENT));

        let mut http_builder = Client::builder().user_agent(&user_agent).gzip(true);
        if let Some(timeout) = self.timeout {
            http_builder = http_builder.timeout(timeout);
        }
        let http_client = http_builder
            .build()
            .map_err(CinematerialError::ClientBuild)?;

        Ok(CinematerialClient {
            http_client,
            endpoint,
            api_key,
            api_secret,
            width_bounds: self.width_bounds.unwrap_or_default(),
            signer: self.signer.unwrap_or_else(|| Arc::new(Md5Signer)),
        })
    }
}

/// Rejects absent and empty credentials.
fn require_credential(name: &'static str, value: Option<String>) -> Result<String> {
    let value = value.ok_or(CinematerialError::MissingArgument(name))?;
    if value.is_empty() {
        return Err(CinematerialError::EmptyArgument(name));
    }
    Ok(value)
}

impl CinematerialClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> CinematerialClientBuilder {
        CinematerialClientBuilder::new()
    }

    /// Creates a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if either credential is empty or the HTTP client
    /// cannot be built.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
        Self::builder()
            .api_key(api_key)
            .api_secret(api_secret)
            .build()
    }

    /// Returns the accepted poster widths.
    #[must_use]
    pub const fn width_bounds(&self) -> &WidthBounds {
        &self.width_bounds
    }

    /// Looks up posters by numeric IMDb id at the default width.
    ///
    /// # Errors
    ///
    /// See [`LocalCinematerialApi::search`].
    pub async fn search_by_id(&self, imdb_id: i64) -> Result<CinematerialResult> {
        self.search(&PosterQuery::by_id(imdb_id)).await
    }

    /// Looks up posters by numeric IMDb id at `width` pixels.
    ///
    /// # Errors
    ///
    /// See [`LocalCinematerialApi::search`].
    pub async fn search_by_id_with_width(
        &self,
        imdb_id: i64,
        width: i32,
    ) -> Result<CinematerialResult> {
        self.search(&PosterQuery::by_id(imdb_id).width(width)).await
    }

    /// Looks up posters by IMDb title page address at the default width.
    ///
    /// # Errors
    ///
    /// See [`LocalCinematerialApi::search`].
    pub async fn search_by_url(&self, url: &str) -> Result<CinematerialResult> {
        self.search(&PosterQuery::by_url(url)).await
    }

    /// Looks up posters by IMDb title page address at `width` pixels.
    ///
    /// # Errors
    ///
    /// See [`LocalCinematerialApi::search`].
    pub async fn search_by_url_with_width(
        &self,
        url: &str,
        width: i32,
    ) -> Result<CinematerialResult> {
        self.search(&PosterQuery::by_url(url).width(width)).await
    }

    /// Builds the signed request URL for a numeric IMDb id without sending it.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive id or a width out of range.
    pub fn api_url_by_id(&self, imdb_id: i64, width: i32) -> Result<String> {
        self.api_url(&PosterQuery::by_id(imdb_id).width(width))
            .map(String::from)
    }

    /// Builds the signed request URL for an IMDb title page address without sending it.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an address that is not a title page
    /// or a width out of range.
    pub fn api_url_by_url(&self, url: &str, width: i32) -> Result<String> {
        self.api_url(&PosterQuery::by_url(url).width(width))
            .map(String::from)
    }

    /// Validates `query` and builds its signed request URL.
    ///
    /// # Errors
    ///
    /// Returns the validation error of the first invalid input.
    pub fn api_url(&self, query: &PosterQuery) -> Result<Url> {
        let resolved = query.resolve(&self.width_bounds)?;
        Ok(self.signed_url(&resolved))
    }

    /// Appends the lookup parameters and their signature to the endpoint.
    fn signed_url(&self, resolved: &ResolvedQuery) -> Url {
        let signature = self.signer.sign(
            &self.api_key,
            &self.api_secret,
            resolved.imdb_id,
            resolved.width,
        );

        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("imdb_id", &resolved.imdb_id.to_string())
            .append_pair("api_key", &self.api_key)
            .append_pair("secret", &signature)
            .append_pair("width", &resolved.width.to_string());
        url
    }

    /// Sends the lookup request and maps the response.
    ///
    /// The URL carries the signature, so it is never logged and is stripped
    /// from transport errors.
    async fn fetch(&self, resolved: ResolvedQuery, url: Url) -> Result<CinematerialResult> {
        let imdb_id = resolved.imdb_id;
        tracing::debug!(
            imdb_id = %imdb_id,
            width = %resolved.width,
            "Cinematerial API request"
        );

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|source| CinematerialError::Transport {
                imdb_id,
                source: source.without_url(),
            })?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(imdb_id = %imdb_id, "title not found (HTTP 404)");
            return Ok(CinematerialResult::default());
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            return Err(CinematerialError::Status {
                imdb_id,
                status,
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| CinematerialError::Transport {
                imdb_id,
                source: source.without_url(),
            })?;

        let result = CinematerialResult::from_payload(&body)
            .map_err(|source| CinematerialError::Decode { imdb_id, source })?;

        if result.is_found() {
            tracing::debug!(
                imdb_id = %imdb_id,
                posters = result.posters().len(),
                "Cinematerial API response"
            );
        } else {
            tracing::debug!(imdb_id = %imdb_id, "title not found");
        }

        Ok(result)
    }
}

impl LocalCinematerialApi for CinematerialClient {
    #[instrument(skip_all)]
    async fn search(&self, query: &PosterQuery) -> Result<CinematerialResult> {
        let resolved = query.resolve(&self.width_bounds)?;
        let url = self.signed_url(&resolved);
        self.fetch(resolved, url).await
    }
}
