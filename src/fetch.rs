//! Remote data access: invite metadata and icon bytes.

use crate::error::{Endpoint, Error, Result};
use crate::model::{ImageFormat, InviteRecord};
use crate::RendererConfig;
use futures::future::{BoxFuture, FutureExt};
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Where invite records and icon bytes come from.
///
/// The renderer talks to the upstream API only through this trait, so tests
/// can substitute an in-memory source.
pub trait InviteSource: Send + Sync {
    /// Look up the invite `code`, including approximate counts
    fn fetch_invite<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<InviteRecord>>;

    /// Raw icon image bytes for a guild
    fn fetch_icon<'a>(
        &'a self,
        guild_id: &'a str,
        icon_id: &'a str,
        format: ImageFormat,
    ) -> BoxFuture<'a, Result<Vec<u8>>>;
}

/// `InviteSource` backed by the HTTP API and icon CDN
pub struct HttpSource {
    client: Client,
    user_agent: String,
    timeout_ms: u64,
    api_base: Url,
    cdn_base: Url,
}

impl HttpSource {
    pub fn new(config: &RendererConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                Error::InitializationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            timeout_ms: config.timeout_ms,
            api_base: parse_base(&config.api_base_url)?,
            cdn_base: parse_base(&config.cdn_base_url)?,
        })
    }

    /// `{api}/invites/{code}?with_counts=true`
    pub fn invite_url(&self, code: &str) -> Url {
        let mut url = with_segments(&self.api_base, &["invites", code]);
        url.query_pairs_mut().append_pair("with_counts", "true");
        url
    }

    /// `{cdn}/icons/{guild_id}/{icon_id}.{jpg|gif}`
    pub fn icon_url(&self, guild_id: &str, icon_id: &str, format: ImageFormat) -> Url {
        let file = format!("{}.{}", icon_id, format.extension());
        with_segments(&self.cdn_base, &["icons", guild_id, &file])
    }

    async fn get_bytes(&self, url: Url, endpoint: Endpoint) -> Result<Vec<u8>> {
        log::debug!("GET {}", url);
        let resp = self
            .client
            .get(url.clone())
            .header(USER_AGENT, self.user_agent.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(endpoint, &url, e))?;

        let status = resp.status();
        if !status.is_success() {
            log::warn!("{} request to {} returned {}", endpoint, url, status);
            return Err(Error::fetch(endpoint, format!("{} returned {}", url, status)));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| self.transport_error(endpoint, &url, e))?;
        Ok(body.to_vec())
    }

    fn transport_error(&self, endpoint: Endpoint, url: &Url, err: reqwest::Error) -> Error {
        log::warn!("{} request to {} failed: {}", endpoint, url, err);
        if err.is_timeout() {
            Error::Timeout {
                endpoint,
                ms: self.timeout_ms,
            }
        } else {
            Error::fetch(endpoint, format!("{}: {}", url, err))
        }
    }
}

impl InviteSource for HttpSource {
    fn fetch_invite<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<InviteRecord>> {
        async move {
            let body = self.get_bytes(self.invite_url(code), Endpoint::Invite).await?;
            InviteRecord::from_json(&body)
        }
        .boxed()
    }

    fn fetch_icon<'a>(
        &'a self,
        guild_id: &'a str,
        icon_id: &'a str,
        format: ImageFormat,
    ) -> BoxFuture<'a, Result<Vec<u8>>> {
        async move {
            let url = self.icon_url(guild_id, icon_id, format);
            let bytes = self.get_bytes(url, Endpoint::Icon).await?;
            if bytes.is_empty() {
                return Err(Error::malformed(Endpoint::Icon, "empty image body"));
            }
            Ok(bytes)
        }
        .boxed()
    }
}

fn parse_base(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| Error::ConfigError(format!("Invalid base URL {:?}: {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(Error::ConfigError(format!(
            "Base URL {:?} cannot carry a path",
            raw
        )));
    }
    Ok(url)
}

fn with_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // `parse_base` rejected cannot-be-a-base URLs, so this always succeeds
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
