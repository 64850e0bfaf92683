use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::oracle::{
    error::{OracleError, malformed, refusal, timeout, unavailable},
    parse::parse_decision,
    ports::DecisionOraclePort,
    prompts::build_decision_prompt,
    types::{Decision, DecisionRequest},
};

#[derive(Debug, Clone)]
pub struct HttpOracleConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key_env: Option<String>,
}

/// Decision Oracle over an OpenAI-compatible chat-completions dialect. The
/// call deadline is owned by the scheduler, not the adapter.
pub struct HttpDecisionOracle {
    client: Client,
    config: HttpOracleConfig,
}

impl HttpDecisionOracle {
    pub fn new(config: HttpOracleConfig) -> Self {
        Self {
            client: Client::builder()
                .build()
                .expect("reqwest client must build"),
            config,
        }
    }
}

#[async_trait]
impl DecisionOraclePort for HttpDecisionOracle {
    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, OracleError> {
        let prompt = build_decision_prompt(request);
        let url = format!(
            "{}/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user },
            ],
            "response_format": { "type": "json_object" },
        });

        let mut http_request = self.client.post(&url).json(&body);
        if let Some(env_name) = self.config.api_key_env.as_ref() {
            if let Ok(key) = std::env::var(env_name) {
                http_request = http_request.bearer_auth(key);
            }
        }

        let response = http_request.send().await.map_err(|err| {
            if err.is_timeout() {
                timeout(format!("decision endpoint timed out: {err}"))
            } else {
                unavailable(format!("decision endpoint unreachable: {err}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!(
                "decision endpoint returned {status}"
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| malformed(format!("decision envelope is not json: {err}")))?;

        let content = payload
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("decision envelope missing message content"))?;

        if content.trim().is_empty() {
            return Err(refusal("oracle returned empty decision content"));
        }

        parse_decision(content)
    }
}
