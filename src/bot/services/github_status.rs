//! Status document kept in a GitHub repository through the contents API.
//!
//! The file's blob `sha` is the revision; GitHub refuses a `PUT` whose `sha`
//! is stale, which gives compare-and-swap semantics for free.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::status_store::{BackendError, RemoteStatus, Revision, StatusBackend};
use crate::config::RemoteStatusConfig;

const USER_AGENT: &str = "SiteStatus";

#[derive(Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct StatusDocument {
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

pub fn decode_document(encoded: &str) -> Result<StatusDocument, BackendError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();

    let raw = STANDARD
        .decode(compact)
        .map_err(|err| BackendError::Malformed(err.to_string()))?;

    serde_json::from_slice(&raw).map_err(|err| BackendError::Malformed(err.to_string()))
}

pub fn encode_document(document: &StatusDocument) -> Result<String, BackendError> {
    let raw = serde_json::to_vec_pretty(document)
        .map_err(|err| BackendError::Malformed(err.to_string()))?;

    Ok(STANDARD.encode(raw))
}

pub struct GithubStatusBackend {
    client: reqwest::Client,
    url: reqwest::Url,
    token: String,
}

impl GithubStatusBackend {
    pub fn new(config: &RemoteStatusConfig) -> Result<Self, BackendError> {
        let mut url = config.api_root.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::Malformed("api root cannot be a base".into()))?
            .pop_if_empty()
            .extend(["repos", config.owner.as_str(), config.repo.as_str(), "contents"])
            .extend(config.path.split('/').filter(|s| !s.is_empty()));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            url,
            token: config.token.clone(),
        })
    }

    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }
}

impl StatusBackend for GithubStatusBackend {
    async fn fetch(&self) -> Result<RemoteStatus, BackendError> {
        let response = self
            .client
            .get(self.url.clone())
            .header("Authorization", format!("token {}", self.token))
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Status(response.status()));
        }

        let contents = response.json::<ContentsResponse>().await?;
        let document = decode_document(&contents.content)?;

        Ok(RemoteStatus {
            active: document.active,
            revision: Revision(contents.sha.into()),
        })
    }

    async fn store(&self, active: bool, precondition: &Revision) -> Result<(), BackendError> {
        let document = StatusDocument {
            active,
            updated_at: Some(chrono::Utc::now().to_rfc3339()),
        };

        let body = json!({
            "message": format!("set site active={active}"),
            "content": encode_document(&document)?,
            "sha": precondition.0.as_str(),
        });

        let response = self
            .client
            .put(self.url.clone())
            .header("Authorization", format!("token {}", self.token))
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => Ok(()),
            reqwest::StatusCode::CONFLICT | reqwest::StatusCode::UNPROCESSABLE_ENTITY => {
                Err(BackendError::Conflict)
            }
            s => Err(BackendError::Status(s)),
        }
    }
}
