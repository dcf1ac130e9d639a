//! Reasoning engine backed by an OpenAI-compatible chat completions endpoint.
//!
//! Each capability is offered as a function tool taking a single `input` string. Prior
//! observations are replayed as assistant tool calls followed by tool results.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::capability::{CapabilityDescriptor, CapabilityKind};
use super::engine::{
    CapabilityCall, EngineError, EngineRequest, EngineStep, Observation, ReasoningEngine,
};
use crate::config::EngineConfig;

const SYSTEM_PROMPT: &str = "You are an HR operations assistant. Use the provided tools to answer from the company's workforce data and HR policy. When a tool returns a markdown table or an email draft, include it in full in your answer. If data is missing, say so instead of guessing.";

pub struct OpenAiCompatEngine {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiCompatEngine {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| EngineError::Transport(err.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let api_key = config.api_key.clone().ok_or(EngineError::Authentication)?;
        Self::new(&config.base_url, api_key, &config.model, config.timeout)
    }

    pub fn request_body(&self, request: &EngineRequest) -> Value {
        json!({
            "model": self.model,
            "messages": to_api_messages(request),
            "tools": to_api_tools(&request.capabilities),
            "temperature": 0,
            "stream": false,
        })
    }
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    function: ApiFunction,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunction {
    name: String,
    /// JSON-encoded arguments object.
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ApiToolCall>>,
}

fn to_api_messages(request: &EngineRequest) -> Vec<ApiMessage> {
    let mut messages = vec![
        ApiMessage {
            role: "system",
            content: Some(SYSTEM_PROMPT.to_string()),
            tool_calls: None,
            tool_call_id: None,
        },
        ApiMessage {
            role: "user",
            content: Some(request.instruction.clone()),
            tool_calls: None,
            tool_call_id: None,
        },
    ];

    for Observation { call, output } in &request.observations {
        messages.push(ApiMessage {
            role: "assistant",
            content: None,
            tool_calls: Some(vec![ApiToolCall {
                id: call.id.clone(),
                kind: function_type(),
                function: ApiFunction {
                    name: call.capability.name().to_string(),
                    arguments: json!({ "input": call.input }).to_string(),
                },
            }]),
            tool_call_id: None,
        });
        messages.push(ApiMessage {
            role: "tool",
            content: Some(output.clone()),
            tool_calls: None,
            tool_call_id: Some(call.id.clone()),
        });
    }

    messages
}

fn to_api_tools(capabilities: &[CapabilityDescriptor]) -> Vec<Value> {
    capabilities
        .iter()
        .map(|capability| {
            json!({
                "type": "function",
                "function": {
                    "name": capability.name,
                    "description": capability.description,
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "input": {
                                "type": "string",
                                "description": "Free-text input for the capability."
                            }
                        },
                        "required": ["input"]
                    }
                }
            })
        })
        .collect()
}

/// Turn a completion into the next step. The first tool call wins over any text content.
pub fn parse_completion(response: ApiResponse) -> Result<EngineStep, EngineError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| EngineError::MalformedResponse("no choices in response".to_string()))?;

    if let Some(call) = choice.message.tool_calls.unwrap_or_default().into_iter().next() {
        let capability = CapabilityKind::from_name(&call.function.name)
            .ok_or_else(|| EngineError::UnknownCapability(call.function.name.clone()))?;
        let input = match serde_json::from_str::<Value>(&call.function.arguments) {
            Ok(Value::Object(arguments)) => arguments
                .get("input")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_default(),
            Ok(Value::String(input)) => input,
            _ => call.function.arguments.clone(),
        };
        return Ok(EngineStep::Invoke(CapabilityCall {
            id: call.id,
            capability,
            input,
        }));
    }

    match choice.message.content {
        Some(content) if !content.trim().is_empty() => Ok(EngineStep::Answer(content)),
        _ => Err(EngineError::MalformedResponse(
            "completion carried neither a tool call nor text".to_string(),
        )),
    }
}

#[async_trait]
impl ReasoningEngine for OpenAiCompatEngine {
    fn name(&self) -> &str {
        &self.model
    }

    async fn next_step(&self, request: &EngineRequest) -> Result<EngineStep, EngineError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(
            model = %self.model,
            observations = request.observations.len(),
            "requesting next engine step"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|err| EngineError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        match status {
            200 => {}
            401 | 403 => return Err(EngineError::Authentication),
            429 => return Err(EngineError::RateLimited),
            _ => {
                let body = response.text().await.unwrap_or_default();
                warn!(status, body = %body, "engine returned an error");
                return Err(EngineError::Status { status, body });
            }
        }

        let parsed: ApiResponse = response
            .json()
            .await
            .map_err(|err| EngineError::MalformedResponse(err.to_string()))?;
        parse_completion(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn parse(body: Value) -> Result<EngineStep, EngineError> {
        parse_completion(serde_json::from_value(body).expect("response shape"))
    }

    #[test]
    fn tool_call_becomes_invocation() {
        let step = parse(json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_7",
                        "type": "function",
                        "function": {
                            "name": "compensation",
                            "arguments": "{\"input\":\"employee 104 at 12%\"}"
                        }
                    }]
                }
            }]
        }))
        .expect("step");

        assert_eq!(
            step,
            EngineStep::Invoke(CapabilityCall {
                id: "call_7".to_string(),
                capability: CapabilityKind::Compensation,
                input: "employee 104 at 12%".to_string(),
            })
        );
    }

    #[test]
    fn text_content_becomes_answer() {
        let step = parse(json!({
            "choices": [{ "message": { "content": "Headcount is 50." } }]
        }))
        .expect("step");
        assert_eq!(step, EngineStep::Answer("Headcount is 50.".to_string()));
    }

    #[test]
    fn unknown_tools_and_empty_replies_are_errors() {
        let unknown = parse(json!({
            "choices": [{
                "message": {
                    "tool_calls": [{
                        "id": "x",
                        "function": { "name": "python_repl", "arguments": "{}" }
                    }]
                }
            }]
        }));
        assert!(matches!(unknown, Err(EngineError::UnknownCapability(name)) if name == "python_repl"));

        assert!(matches!(
            parse(json!({ "choices": [] })),
            Err(EngineError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse(json!({ "choices": [{ "message": { "content": "  " } }] })),
            Err(EngineError::MalformedResponse(_))
        ));
    }

    #[test]
    fn observations_are_replayed_as_tool_messages() {
        let engine = OpenAiCompatEngine::new(
            "https://example.test/v1/",
            "key",
            "test-model",
            Duration::from_secs(5),
        )
        .expect("client builds");
        let mut request = EngineRequest::new("Audit the data");
        request.observations.push(Observation {
            call: CapabilityCall {
                id: "call_1".to_string(),
                capability: CapabilityKind::AuditDataIntegrity,
                input: "Audit the data".to_string(),
            },
            output: "clean".to_string(),
        });

        let body = engine.request_body(&request);
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["tools"].as_array().map(Vec::len), Some(12));
        let messages = body["messages"].as_array().expect("messages");
        assert_eq!(messages.len(), 4);
        assert_eq!(
            messages[2]["tool_calls"][0]["function"]["name"],
            "audit_data_integrity"
        );
        assert_eq!(messages[3]["role"], "tool");
        assert_eq!(messages[3]["tool_call_id"], "call_1");
        assert_eq!(engine.base_url, "https://example.test/v1");
    }
}
