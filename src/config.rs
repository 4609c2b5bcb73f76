use anyhow::{Context, Result, bail};
use std::env;
use std::net::SocketAddr;

const DEFAULT_REGION: &str = "europe";
const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone)]
pub struct Config {
    pub riot_api_key: String,
    pub riot_base_url: String,
    pub llm: Option<LlmConfig>,
    pub bind_addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl Config {
    /// Reads `.env` / `.env.local` if present, then the process environment.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let Some(riot_api_key) = get("RIOT_API_KEY") else {
            bail!("RIOT_API_KEY is not set");
        };

        let riot_base_url = match get("RIOT_BASE_URL") {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let region = get("REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());
                format!("https://{}.api.riotgames.com", region.to_lowercase())
            }
        };

        let llm = get("LLM_API_KEY")
            .or_else(|| get("OPENAI_API_KEY"))
            .map(|api_key| LlmConfig {
                api_key,
                base_url: get("LLM_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            });

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .with_context(|| format!("BIND_ADDR '{}' is not a socket address", bind_raw))?;

        Ok(Self {
            riot_api_key,
            riot_base_url,
            llm,
            bind_addr,
        })
    }
}
