//! `chat/completions` client implementing [`GenerationService`].

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use autoflow_app::ports::{GenerationRequest, GenerationService};
use autoflow_domain::error::AutoflowError;
use autoflow_domain::time::elapsed_ms;

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::schema;

const SYSTEM_PROMPT: &str = "You are the automation assistant of a business support \
platform. Answer with a single JSON object that matches the requested schema and nothing else.";

/// Generation service backed by an OpenAI-compatible HTTP API.
pub struct HttpGenerationService {
    config: GenerationConfig,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpGenerationService {
    /// Build the client. The API key is resolved once, here.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Client`] if the TLS backend cannot be
    /// initialised.
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(GenerationError::Client)?;
        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            tracing::warn!(base_url = %config.base_url, "no generation API key configured");
        }
        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    fn request_body<'a>(&'a self, request: &'a GenerationRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: [
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchema {
                    name: request.schema_name,
                    schema: &request.schema,
                    strict: true,
                },
            },
        }
    }

    #[tracing::instrument(
        skip_all,
        fields(schema = request.schema_name, model = %self.config.model)
    )]
    async fn complete(
        &self,
        request: &GenerationRequest,
    ) -> Result<serde_json::Value, GenerationError> {
        let start = Instant::now();
        let mut call = self
            .client
            .post(self.config.completions_url())
            .json(&self.request_body(request));
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }

        let response = call.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await?;
        let value = extract_object(chat)?;
        schema::check(&request.schema, &value).map_err(|violation| {
            GenerationError::Schema {
                schema: request.schema_name,
                violation,
            }
        })?;

        tracing::debug!(elapsed_ms = elapsed_ms(start), "generation completed");
        Ok(value)
    }
}

impl GenerationService for HttpGenerationService {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<serde_json::Value, AutoflowError> {
        Ok(self.complete(&request).await?)
    }
}

/// Pull the JSON object out of the first choice.
fn extract_object(response: ChatResponse) -> Result<serde_json::Value, GenerationError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(GenerationError::EmptyResponse)?;
    Ok(serde_json::from_str(&content)?)
}

// -- chat/completions request/response types --

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    response_format: ResponseFormat<'a>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchema<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchema<'a> {
    name: &'a str,
    schema: &'a serde_json::Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service() -> HttpGenerationService {
        HttpGenerationService::new(GenerationConfig {
            model: "test-model".to_string(),
            api_key: Some("sk-test".to_string()),
            ..GenerationConfig::default()
        })
        .unwrap()
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            schema_name: "categorize",
            prompt: "Classify: Where is my invoice?".to_string(),
            schema: json!({"type": "object", "required": ["category"]}),
        }
    }

    fn chat_response(content: Option<&str>) -> ChatResponse {
        serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        }))
        .unwrap()
    }

    #[test]
    fn should_request_json_schema_response_format() {
        let service = service();
        let request = request();

        let body = serde_json::to_value(service.request_body(&request)).unwrap();

        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Classify: Where is my invoice?");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "categorize");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert_eq!(
            body["response_format"]["json_schema"]["schema"]["required"][0],
            "category"
        );
    }

    #[test]
    fn should_extract_object_from_first_choice() {
        let value = extract_object(chat_response(Some(r#"{"category":"billing"}"#))).unwrap();
        assert_eq!(value, json!({"category": "billing"}));
    }

    #[test]
    fn should_fail_when_content_is_missing() {
        let result = extract_object(chat_response(None));
        assert!(matches!(result, Err(GenerationError::EmptyResponse)));
    }

    #[test]
    fn should_fail_when_content_is_not_json() {
        let result = extract_object(chat_response(Some("Sure! The category is billing.")));
        assert!(matches!(result, Err(GenerationError::Json(_))));
    }

    #[test]
    fn should_convert_into_generation_error() {
        let err: AutoflowError = GenerationError::EmptyResponse.into();
        assert!(matches!(err, AutoflowError::Generation(_)));
        assert_eq!(
            err.chain_message(),
            "generation service error: response has no content"
        );
    }
}
