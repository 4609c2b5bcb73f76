//! Coaching feedback from an OpenAI-compatible chat-completions endpoint.
//!
//! The prompt embeds the condensed player summary as JSON; the raw match
//! records never leave the process.

use crate::config::LlmConfig;
use crate::error::InsightError;
use crate::player_summary::PlayerSummary;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{error, info};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const SYSTEM_PROMPT: &str = "You are an expert League of Legends coach.";

const COACHING_INSTRUCTIONS: &str = "Instructions:\n\
     1. Identify misplays or suboptimal decisions.\n\
     2. Suggest actionable improvements.\n\
     3. Summarize overall strengths and weaknesses.\n\
     Provide concise, coaching-style feedback.";

#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub insights: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

pub fn build_prompt(summary: &PlayerSummary, question: Option<&str>) -> Result<String, InsightError> {
    let stats = serde_json::to_string(&summary.player_stats)?;
    let timeline = serde_json::to_string(&summary.player_timeline)?;

    let mut prompt = format!(
        "You are a League of Legends AI coach. Analyze this player's match:\n\n\
         Following is the player stats: {}\n\
         Following is the match's major timeline events: {}\n\n",
        stats, timeline
    );

    match question.map(str::trim).filter(|q| !q.is_empty()) {
        Some(question) => {
            prompt.push_str("The player asks: ");
            prompt.push_str(question);
        }
        None => prompt.push_str(COACHING_INSTRUCTIONS),
    }

    Ok(prompt)
}

#[derive(Debug, Clone)]
pub struct InsightClient {
    client: Client,
    config: LlmConfig,
}

impl InsightClient {
    pub fn new(config: LlmConfig) -> Result<Self, InsightError> {
        Self::with_timeout(config, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(config: LlmConfig, timeout: Duration) -> Result<Self, InsightError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            config,
        })
    }

    pub async fn generate(
        &self,
        summary: &PlayerSummary,
        question: Option<&str>,
    ) -> Result<Insight, InsightError> {
        let prompt = build_prompt(summary, question)?;
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ]
        });

        info!(%url, model = %self.config.model, "requesting coaching feedback");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!(%url, status = status.as_u16(), "LLM request failed");
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Status { status, body });
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        let insights = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(InsightError::EmptyResponse)?;

        Ok(Insight {
            insights,
            model: self.config.model.clone(),
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player_stats::player_stats_from_participant;
    use crate::player_timeline::TimelineFrame;

    fn summary() -> PlayerSummary {
        PlayerSummary {
            player_stats: player_stats_from_participant(&json!({
                "championName": "Jinx",
                "kills": 7
            })),
            player_timeline: vec![TimelineFrame {
                timestamp: 3,
                events: vec![json!({ "type": "FEAT_UPDATE" })],
                participant_frame: json!({ "level": 4 }),
            }],
        }
    }

    fn config(base_url: String) -> LlmConfig {
        LlmConfig {
            api_key: "sk-test".to_string(),
            base_url,
            model: "test-model".to_string(),
        }
    }

    fn client(base_url: String) -> InsightClient {
        InsightClient::new(config(base_url)).unwrap()
    }

    #[test]
    fn prompt_embeds_summary_and_default_instructions() {
        let prompt = build_prompt(&summary(), None).unwrap();
        assert!(prompt.contains("\"champion\":\"Jinx\""));
        assert!(prompt.contains("FEAT_UPDATE"));
        assert!(prompt.contains("Suggest actionable improvements"));
    }

    #[test]
    fn prompt_uses_player_question_when_given() {
        let prompt = build_prompt(&summary(), Some("  How was my laning?  ")).unwrap();
        assert!(prompt.contains("The player asks: How was my laning?"));
        assert!(!prompt.contains("Suggest actionable improvements"));
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Ward more."}}]}"#)
            .create_async()
            .await;

        let insight = client(server.url()).generate(&summary(), None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(insight.insights, "Ward more.");
        assert_eq!(insight.model, "test-model");
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = client(server.url()).generate(&summary(), None).await.unwrap_err();
        assert!(matches!(err, InsightError::EmptyResponse));
    }

    #[tokio::test]
    async fn non_success_status_carries_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let err = client(server.url()).generate(&summary(), None).await.unwrap_err();
        match err {
            InsightError::Status { status, body } => {
                assert_eq!(status.as_u16(), 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn stalled_endpoint_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client =
            InsightClient::with_timeout(config(format!("http://{addr}")), Duration::from_millis(200))
                .unwrap();
        let err = client.generate(&summary(), None).await.unwrap_err();

        match err {
            InsightError::Transport(source) => assert!(source.is_timeout()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
