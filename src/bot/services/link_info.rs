//! Third-party enrichment: video link info lookup and URL shortening.
//!
//! Single-shot GET calls, never retried.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde_json::Value;

#[derive(Debug)]
pub enum EnrichmentError {
    Http(reqwest::Error),
    Status(reqwest::StatusCode),
    UnexpectedShape,
}

impl fmt::Display for EnrichmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrichmentError::Http(err) => write!(f, "lookup request failed: {err}"),
            EnrichmentError::Status(code) => write!(f, "lookup answered {code}"),
            EnrichmentError::UnexpectedShape => write!(f, "lookup returned an unexpected shape"),
        }
    }
}

impl std::error::Error for EnrichmentError {}

impl From<reqwest::Error> for EnrichmentError {
    fn from(err: reqwest::Error) -> Self {
        EnrichmentError::Http(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkInfo {
    pub title: String,
    pub author: String,
    pub thumbnail: Option<String>,
    pub download_url: String,
}

fn first_string<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

impl LinkInfo {
    /// Reads the lookup payload. The interesting object may sit under `data`,
    /// under `result`, or be the root itself.
    pub fn from_response(body: &Value, lookup_url: &str) -> Result<LinkInfo, EnrichmentError> {
        let info = ["data", "result"]
            .iter()
            .filter_map(|key| body.get(*key))
            .find(|v| v.is_object())
            .unwrap_or(body);

        if !info.is_object() {
            return Err(EnrichmentError::UnexpectedShape);
        }

        let title = first_string(info, &["desc", "title"]).unwrap_or("Video TikTok");

        let author = info
            .get("author")
            .and_then(|a| match a {
                Value::String(s) if !s.is_empty() => Some(s.as_str()),
                Value::Object(_) => first_string(a, &["nickname"]),
                _ => None,
            })
            .unwrap_or("-");

        Ok(LinkInfo {
            title: title.to_string(),
            author: author.to_string(),
            thumbnail: first_string(info, &["cover", "thumbnail", "origin_cover"])
                .map(str::to_string),
            download_url: first_string(info, &["url"]).unwrap_or(lookup_url).to_string(),
        })
    }
}

pub trait Enricher: Send + Sync {
    fn link_info(&self, link: &str) -> impl Future<Output = Result<LinkInfo, EnrichmentError>> + Send;

    fn shorten(&self, link: &str) -> impl Future<Output = Result<String, EnrichmentError>> + Send;
}

pub struct HttpEnricher {
    client: reqwest::Client,
    link_info_api: String,
    shortener_api: reqwest::Url,
}

impl HttpEnricher {
    pub fn new(link_info_api: String, shortener_api: reqwest::Url) -> Result<Self, EnrichmentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            link_info_api,
            shortener_api,
        })
    }

    /// Lookup endpoint for `link`; the link is appended percent-encoded.
    pub fn lookup_url(&self, link: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(link.as_bytes()).collect();

        format!("{}{}", self.link_info_api, encoded)
    }
}

impl Enricher for HttpEnricher {
    async fn link_info(&self, link: &str) -> Result<LinkInfo, EnrichmentError> {
        let lookup_url = self.lookup_url(link);

        let response = self.client.get(&lookup_url).send().await?;
        if !response.status().is_success() {
            return Err(EnrichmentError::Status(response.status()));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|_| EnrichmentError::UnexpectedShape)?;

        LinkInfo::from_response(&body, &lookup_url)
    }

    async fn shorten(&self, link: &str) -> Result<String, EnrichmentError> {
        let response = self
            .client
            .get(self.shortener_api.clone())
            .query(&[("url", link)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EnrichmentError::Status(response.status()));
        }

        let short = response.text().await?.trim().to_string();
        if short.is_empty() {
            return Err(EnrichmentError::UnexpectedShape);
        }

        Ok(short)
    }
}
