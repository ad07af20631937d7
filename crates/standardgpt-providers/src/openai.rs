//! OpenAI-compatible chat completion client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use standardgpt_core::config::CompletionConfig;
use standardgpt_core::errors::CompletionError;
use standardgpt_core::prompts::CompletionRequest;
use standardgpt_core::traits::{ICompletionService, TokenSink};

use crate::http;

pub struct OpenAiCompletion {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Deserialize)]
struct ChatContent {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Option<ChatContent>,
}

impl OpenAiCompletion {
    pub fn new(config: &CompletionConfig) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms);
        Self {
            client: http::client(timeout),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: http::api_key(&config.api_key_env),
            timeout,
        }
    }

    /// Explicit key, for callers that do not use the environment.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

impl OpenAiCompletion {
    async fn send(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<reqwest::Response, CompletionError> {
        let Some(key) = &self.api_key else {
            return Err(CompletionError::Unavailable {
                reason: "no API key configured".to_string(),
            });
        };

        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt.user,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream,
        };

        debug!(kind = request.kind.as_str(), model = %self.model, stream, "completion request");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(request, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::Rejected {
                status: status.as_u16(),
                reason: http::error_body(response).await,
            });
        }
        Ok(response)
    }

    fn transport_error(&self, request: &CompletionRequest, e: reqwest::Error) -> CompletionError {
        if e.is_timeout() {
            CompletionError::Timeout {
                operation: request.kind.as_str().to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            CompletionError::Unavailable {
                reason: e.to_string(),
            }
        }
    }
}

impl ICompletionService for OpenAiCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let response = self.send(request, false).await?;
        let value: Value = response
            .json()
            .await
            .map_err(|e| CompletionError::MalformedResponse {
                reason: e.to_string(),
            })?;
        parse_chat_response(value)
    }

    /// Server-sent events, one content delta per `data:` line.
    async fn complete_stream(
        &self,
        request: &CompletionRequest,
        on_token: &TokenSink,
    ) -> Result<String, CompletionError> {
        let mut response = self.send(request, true).await?;
        let mut decoder = SseDecoder::default();
        let mut text = String::new();

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.transport_error(request, e))?
        {
            for fragment in decoder.push(&chunk)? {
                on_token(&fragment);
                text.push_str(&fragment);
            }
            if decoder.is_done() {
                break;
            }
        }

        if text.trim().is_empty() {
            return Err(CompletionError::MalformedResponse {
                reason: "stream carried no content".to_string(),
            });
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

/// First choice's message content, trimmed.
pub fn parse_chat_response(value: Value) -> Result<String, CompletionError> {
    let parsed: ChatResponse =
        serde_json::from_value(value).map_err(|e| CompletionError::MalformedResponse {
            reason: e.to_string(),
        })?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| CompletionError::MalformedResponse {
            reason: "no choices with content".to_string(),
        })
}

/// Splits a chat completion event stream into content fragments.
///
/// Bytes may arrive cut anywhere, including inside a UTF-8 sequence, so
/// only complete lines are decoded.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    done: bool,
}

impl SseDecoder {
    /// Feed raw bytes; returns the fragments completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<String>, CompletionError> {
        self.buffer.extend_from_slice(bytes);
        let mut fragments = Vec::new();
        while !self.done {
            let Some(end) = self.buffer.iter().position(|b| *b == b'\n') else {
                break;
            };
            let line: Vec<u8> = self.buffer.drain(..=end).collect();
            let line = std::str::from_utf8(&line).map_err(|e| CompletionError::MalformedResponse {
                reason: e.to_string(),
            })?;
            let Some(data) = line.trim().strip_prefix("data:") else {
                continue;
            };
            let data = data.trim();
            if data == "[DONE]" {
                self.done = true;
                break;
            }
            if let Some(fragment) = parse_stream_delta(data)? {
                fragments.push(fragment);
            }
        }
        Ok(fragments)
    }

    /// Whether the terminating `[DONE]` marker was seen.
    pub fn is_done(&self) -> bool {
        self.done
    }
}

fn parse_stream_delta(data: &str) -> Result<Option<String>, CompletionError> {
    let chunk: StreamChunk =
        serde_json::from_str(data).map_err(|e| CompletionError::MalformedResponse {
            reason: e.to_string(),
        })?;
    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta)
        .and_then(|d| d.content)
        .filter(|c| !c.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_first_choice() {
        let v = json!({
            "choices": [
                { "message": { "role": "assistant", "content": "  without\n" } },
                { "message": { "role": "assistant", "content": "personal" } }
            ]
        });
        assert_eq!(parse_chat_response(v).unwrap(), "without");
    }

    #[test]
    fn empty_choices_are_malformed() {
        let err = parse_chat_response(json!({ "choices": [] })).unwrap_err();
        assert!(matches!(err, CompletionError::MalformedResponse { .. }));
        let err = parse_chat_response(json!({ "choices": [{ "message": { "content": null } }] }))
            .unwrap_err();
        assert!(matches!(err, CompletionError::MalformedResponse { .. }));
    }

    #[test]
    fn request_body_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: [
                ChatMessage { role: "system", content: "s" },
                ChatMessage { role: "user", content: "u" },
            ],
            max_tokens: 20,
            temperature: 0.1,
            stream: false,
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["messages"][1]["role"], "user");
        assert_eq!(v["max_tokens"], 20);
        assert!(v.get("stream").is_none());
    }

    #[test]
    fn decoder_joins_lines_split_across_chunks() {
        let mut decoder = SseDecoder::default();
        let first = decoder
            .push(b"data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\ndata: {\"choi")
            .unwrap();
        assert!(first.is_empty());
        let second = decoder
            .push(b"ces\":[{\"delta\":{\"content\":\"R\xc3\xb8r \"}}]}\n\n")
            .unwrap();
        assert_eq!(second, vec!["Rør ".to_string()]);
        assert!(!decoder.is_done());
    }

    #[test]
    fn decoder_splits_utf8_safely() {
        let mut decoder = SseDecoder::default();
        let line = "data: {\"choices\":[{\"delta\":{\"content\":\"Rør\"}}]}\n".as_bytes();
        let cut = line.iter().position(|b| *b == 0xc3).unwrap() + 1;
        assert!(decoder.push(&line[..cut]).unwrap().is_empty());
        assert_eq!(decoder.push(&line[cut..]).unwrap(), vec!["Rør".to_string()]);
    }

    #[test]
    fn decoder_stops_at_done_marker() {
        let mut decoder = SseDecoder::default();
        let fragments = decoder
            .push(b"data: {\"choices\":[{\"delta\":{\"content\":\"ja\"}}]}\ndata: [DONE]\ndata: {\"choices\":[{\"delta\":{\"content\":\"nei\"}}]}\n")
            .unwrap();
        assert_eq!(fragments, vec!["ja".to_string()]);
        assert!(decoder.is_done());
    }

    #[test]
    fn garbage_event_is_malformed() {
        let mut decoder = SseDecoder::default();
        let err = decoder.push(b"data: not json\n").unwrap_err();
        assert!(matches!(err, CompletionError::MalformedResponse { .. }));
    }
}
