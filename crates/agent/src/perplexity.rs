//! Perplexity chat-completion client behind the [`ConfirmationOracle`] seam.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crossell_core::config::OracleConfig;
use crossell_core::oracle::{
    parse_reply, ConfirmationOracle, ConfirmationOutcome, ConfirmationRequest, FailPolicy,
};

use crate::prompt;

#[derive(Debug, Error)]
enum OracleTransportError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("response carried no completion choices")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: String,
}

/// HTTP adapter for the remote confirmation service.
///
/// Runs unconfigured when no credential is present: every candidate then
/// takes the fail-policy path instead of a network round trip.
pub struct PerplexityOracle {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
    fail_policy: FailPolicy,
}

impl PerplexityOracle {
    pub fn from_config(config: &OracleConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            fail_policy: config.fail_policy,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn fail_policy(&self) -> FailPolicy {
        self.fail_policy
    }

    async fn send(
        &self,
        api_key: &SecretString,
        request: &ConfirmationRequest,
    ) -> Result<String, OracleTransportError> {
        let user_prompt = prompt::confirmation_prompt(request);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: prompt::SYSTEM_PROMPT },
                ChatMessage { role: "user", content: &user_prompt },
            ],
        };

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OracleTransportError::Status(status));
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(OracleTransportError::EmptyResponse)
    }
}

impl std::fmt::Debug for PerplexityOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerplexityOracle")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("configured", &self.is_configured())
            .field("fail_policy", &self.fail_policy)
            .finish()
    }
}

#[async_trait]
impl ConfirmationOracle for PerplexityOracle {
    async fn confirm(&self, request: &ConfirmationRequest) -> ConfirmationOutcome {
        let Some(api_key) = &self.api_key else {
            warn!(
                event_name = "oracle.unconfigured",
                ingredient = %request.ingredient,
                candidate = %request.candidate_product,
                "confirmation requested without an API credential"
            );
            return self.fail_policy.fallback_outcome("no API credential configured");
        };

        match self.send(api_key, request).await {
            Ok(reply) => {
                let outcome = parse_reply(&reply);
                debug!(
                    event_name = "oracle.verdict",
                    ingredient = %request.ingredient,
                    candidate = %request.candidate_product,
                    confirmed = outcome.confirmed,
                    "oracle replied"
                );
                outcome
            }
            Err(error) => {
                warn!(
                    event_name = "oracle.fallback",
                    ingredient = %request.ingredient,
                    candidate = %request.candidate_product,
                    error = %error,
                    policy = ?self.fail_policy,
                    "oracle unreachable, applying fail policy"
                );
                self.fail_policy.fallback_outcome(&error.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>, fail_policy: FailPolicy) -> OracleConfig {
        OracleConfig {
            api_key: api_key.map(|key| key.to_string().into()),
            base_url: "https://api.perplexity.ai/chat/completions".to_string(),
            model: "sonar".to_string(),
            timeout_secs: 30,
            fail_policy,
        }
    }

    fn request() -> ConfirmationRequest {
        ConfirmationRequest {
            ingredient: "Cocoa Powder".to_string(),
            candidate_product: "Dutch Cocoa".to_string(),
            catalogue_item_name: "Chocolate Babka".to_string(),
            category: "Bakery".to_string(),
            description: "Braided brioche with chocolate filling".to_string(),
            ingredient_text: "Wheat Flour, Sugar; Cocoa Powder; Butter".to_string(),
        }
    }

    #[tokio::test]
    async fn unconfigured_oracle_accepts_under_fail_open() {
        let oracle = PerplexityOracle::from_config(&config(None, FailPolicy::FailOpen))
            .expect("build client");
        assert!(!oracle.is_configured());

        let outcome = oracle.confirm(&request()).await;
        assert!(outcome.confirmed);
        assert!(outcome.reasoning.contains("fail-open"));
        assert!(outcome.reasoning.contains("no API credential"));
    }

    #[tokio::test]
    async fn unconfigured_oracle_rejects_under_fail_closed() {
        let oracle = PerplexityOracle::from_config(&config(None, FailPolicy::FailClosed))
            .expect("build client");

        let outcome = oracle.confirm(&request()).await;
        assert!(!outcome.confirmed);
        assert!(outcome.reasoning.contains("fail-closed"));
    }

    #[test]
    fn debug_output_never_contains_the_credential() {
        let oracle = PerplexityOracle::from_config(&config(
            Some("pplx-super-secret"),
            FailPolicy::FailOpen,
        ))
        .expect("build client");

        let rendered = format!("{oracle:?}");
        assert!(!rendered.contains("pplx-super-secret"));
        assert!(rendered.contains("configured: true"));
    }

    #[test]
    fn chat_request_serializes_in_api_shape() {
        let body = ChatRequest {
            model: "sonar",
            messages: vec![
                ChatMessage { role: "system", content: "be terse" },
                ChatMessage { role: "user", content: "YES or NO?" },
            ],
        };

        let value = serde_json::to_value(&body).expect("serialize");
        assert_eq!(value["model"], "sonar");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "YES or NO?");
    }

    #[test]
    fn chat_response_parses_first_choice() {
        let raw = r#"{
            "id": "resp-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "YES - direct match."}}
            ]
        }"#;

        let parsed: ChatResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(parsed.choices[0].message.content, "YES - direct match.");
    }
}
