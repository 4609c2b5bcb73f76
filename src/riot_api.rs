use crate::error::RiotApiError;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

pub const DEFAULT_RECENT_MATCHES: usize = 5;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
pub struct AccountResponse {
    pub puuid: String,
}

fn build_headers(api_key: &str) -> Result<HeaderMap, anyhow::Error> {
    let mut headers = HeaderMap::new();
    headers.insert("X-Riot-Token", HeaderValue::from_str(api_key)?);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}

/// Thin client for the account-v1 and match-v5 endpoints of one routing region.
#[derive(Debug, Clone)]
pub struct RiotClient {
    client: Client,
    headers: HeaderMap,
    base_url: Url,
}

impl RiotClient {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, anyhow::Error> {
        Self::with_timeout(api_key, base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        api_key: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let base_url = Url::parse(base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| RiotApiError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            headers: build_headers(api_key)?,
            base_url,
        })
    }

    pub async fn get_account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountResponse, RiotApiError> {
        let url = self.endpoint(
            &["riot", "account", "v1", "accounts", "by-riot-id"],
            &[game_name, tag_line],
        )?;
        info!(%url, "fetching PUUID for {}#{}", game_name, tag_line);

        self.get_json(url).await
    }

    pub async fn get_puuid(&self, game_name: &str, tag_line: &str) -> Result<String, RiotApiError> {
        let account = self.get_account_by_riot_id(game_name, tag_line).await?;
        Ok(account.puuid)
    }

    /// Most recent first, as returned by match-v5.
    pub async fn get_match_ids_by_puuid(
        &self,
        puuid: &str,
        count: usize,
    ) -> Result<Vec<String>, RiotApiError> {
        let mut url = self.endpoint(&["lol", "match", "v5", "matches", "by-puuid"], &[puuid])?;
        url.path_segments_mut()
            .map_err(|_| RiotApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .push("ids");
        url.query_pairs_mut()
            .append_pair("count", &count.to_string());
        info!(%url, "fetching recent matches for {}", puuid);

        self.get_json(url).await
    }

    pub async fn get_match_json(&self, match_id: &str) -> Result<Value, RiotApiError> {
        let url = self.endpoint(&["lol", "match", "v5", "matches"], &[match_id])?;
        info!(%url, "fetching match details for {}", match_id);

        self.get_json(url).await
    }

    pub async fn get_match_timeline_json(&self, match_id: &str) -> Result<Value, RiotApiError> {
        let mut url = self.endpoint(&["lol", "match", "v5", "matches"], &[match_id])?;
        url.path_segments_mut()
            .map_err(|_| RiotApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .push("timeline");
        info!(%url, "fetching match timeline for {}", match_id);

        self.get_json(url).await
    }

    /// Appends fixed path segments, then caller-supplied ones. Caller values are
    /// pushed as single escaped segments, so `/` and `?` cannot change the path.
    fn endpoint(&self, fixed: &[&str], params: &[&str]) -> Result<Url, RiotApiError> {
        for param in params {
            if param.is_empty() || *param == "." || *param == ".." {
                return Err(RiotApiError::InvalidParameter(param.to_string()));
            }
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RiotApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(fixed)
            .extend(params);

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RiotApiError> {
        let response = self
            .client
            .get(url.clone())
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|err| {
                error!(%url, "network error: {}", err);
                RiotApiError::Transport(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(%url, status = status.as_u16(), "API request failed");
            let body = response.text().await.unwrap_or_default();
            return Err(RiotApiError::Status { status, body });
        }

        let bytes = response.bytes().await.map_err(|err| {
            error!(%url, "network error while reading body: {}", err);
            RiotApiError::Transport(err)
        })?;

        serde_json::from_slice(&bytes).map_err(|source| RiotApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
