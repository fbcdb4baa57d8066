//! The sketch interpreter turns one canvas snapshot into a natural-language
//! description via a single call to a vision-capable chat-completion
//! endpoint. The whole exchange is in-memory: PNG encoding, base64, one
//! request, one reply. No state is kept between calls.

use crate::canvas::Snapshot;
use crate::config;
use base64::{engine::general_purpose, Engine as _};
use image::error::{ParameterError, ParameterErrorKind};
use image::{ImageError, ImageOutputFormat, RgbaImage};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

/// Why an analysis attempt failed. Each variant carries the underlying
/// message verbatim so the page can display it as-is.
#[derive(Debug, Error)]
pub enum InterpretError {
    /// The canvas bitmap could not be encoded as a PNG
    #[error("image encoding failed: {0}")]
    Encoding(#[from] ImageError),

    /// The request never produced an HTTP response
    #[error("network failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint rejected the credential
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The endpoint answered, but not with a usable description
    #[error("malformed model response: {0}")]
    Response(String),
}

/// One user message with its content parts, chat-completion style
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    model: &'static str,
    messages: Vec<Message>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Encode one snapshot losslessly as PNG, entirely in memory
pub fn encode_png(snapshot: &Snapshot) -> Result<Vec<u8>, ImageError> {
    let frame: RgbaImage = RgbaImage::from_raw(
        snapshot.width(),
        snapshot.height(),
        snapshot.pixels().to_vec(),
    )
    .ok_or_else(|| {
        ImageError::Parameter(ParameterError::from_kind(
            ParameterErrorKind::DimensionMismatch,
        ))
    })?;

    let mut data: Vec<u8> = Vec::new();
    frame.write_to(&mut Cursor::new(&mut data), ImageOutputFormat::Png)?;
    Ok(data)
}

/// Build the outbound request body: the fixed instruction plus the snapshot
/// as an inline data URI. Identical snapshots produce byte-identical bodies.
pub(crate) fn build_request(snapshot: &Snapshot) -> Result<ChatRequest, InterpretError> {
    let png = encode_png(snapshot)?;
    let b64 = general_purpose::STANDARD.encode(png);

    Ok(ChatRequest {
        model: config::MODEL,
        messages: vec![Message {
            role: "user",
            content: vec![
                ContentPart::Text {
                    text: config::PROMPT.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!("data:image/png;base64,{b64}"),
                    },
                },
            ],
        }],
        max_tokens: config::MAX_TOKENS,
    })
}

/// Pull the human-readable message out of an OpenAI-style error body,
/// falling back to the raw body text
fn api_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ApiError {
        error: ApiErrorDetail,
    }
    #[derive(Deserialize)]
    struct ApiErrorDetail {
        message: String,
    }

    match serde_json::from_str::<ApiError>(body) {
        Ok(err) => err.error.message,
        Err(_) => body.trim().to_string(),
    }
}

/// Issues analysis requests against one fixed endpoint. The credential is a
/// per-call parameter, never stored here or anywhere else in the process.
pub struct Interpreter {
    http: reqwest::Client,
    endpoint: String,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_endpoint(config::OPENAI_ENDPOINT.to_string())
    }

    /// Point the interpreter at a different chat-completion URL
    pub fn with_endpoint(endpoint: String) -> Self {
        Interpreter {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Ask the model to describe one snapshot. Exactly one outbound request
    /// per call; the caller is responsible for the precondition checks
    /// (non-empty credential, canvas actually drawn on).
    pub async fn interpret(
        &self,
        snapshot: &Snapshot,
        api_key: &str,
    ) -> Result<String, InterpretError> {
        let request = build_request(snapshot)?;

        debug!("submitting analysis request to {}", self.endpoint);
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(InterpretError::Auth(api_error_message(&body)));
        }
        if !status.is_success() {
            return Err(InterpretError::Response(api_error_message(&body)));
        }

        let reply: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| InterpretError::Response(format!("could not parse endpoint reply: {e}")))?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                InterpretError::Response("endpoint reply contained no description text".to_string())
            })
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::FRAME_BYTES;
    use actix_web::{web, App, HttpResponse};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn white_snapshot() -> Snapshot {
        Snapshot::from_rgba(vec![255u8; FRAME_BYTES]).unwrap()
    }

    fn patterned_snapshot() -> Snapshot {
        let pixels = (0..FRAME_BYTES).map(|i| (i % 251) as u8).collect();
        Snapshot::from_rgba(pixels).unwrap()
    }

    #[test]
    fn png_round_trip_is_lossless() {
        let snapshot = patterned_snapshot();
        let png = encode_png(&snapshot).unwrap();

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.width(), 600);
        assert_eq!(decoded.height(), 400);
        assert_eq!(decoded.into_raw(), snapshot.pixels());
    }

    #[test]
    fn request_payload_is_byte_identical_across_calls() {
        let snapshot = white_snapshot();
        let first = serde_json::to_vec(&build_request(&snapshot).unwrap()).unwrap();
        let second = serde_json::to_vec(&build_request(&snapshot).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn request_carries_instruction_and_inline_image() {
        let request = build_request(&white_snapshot()).unwrap();
        let value: serde_json::Value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["max_tokens"], 300);
        assert_eq!(value["messages"].as_array().unwrap().len(), 1);
        assert_eq!(value["messages"][0]["role"], "user");

        let content = value["messages"][0]["content"].as_array().unwrap();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], crate::config::PROMPT);
        assert_eq!(content[1]["type"], "image_url");
        let url = content[1]["image_url"]["url"].as_str().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[actix_web::test]
    async fn returns_the_model_description() {
        let srv = actix_test::start(|| {
            App::new().route(
                "/v1/chat/completions",
                web::post().to(|| async {
                    HttpResponse::Ok().json(json!({
                        "choices": [
                            {"message": {"role": "assistant", "content": "A blank white canvas."}}
                        ]
                    }))
                }),
            )
        });

        let interpreter = Interpreter::with_endpoint(srv.url("/v1/chat/completions"));
        let text = interpreter
            .interpret(&white_snapshot(), "sk-test")
            .await
            .unwrap();
        assert_eq!(text, "A blank white canvas.");
    }

    #[actix_web::test]
    async fn surfaces_authentication_failures_verbatim() {
        let srv = actix_test::start(|| {
            App::new().route(
                "/v1/chat/completions",
                web::post().to(|| async {
                    HttpResponse::Unauthorized().json(json!({
                        "error": {
                            "message": "Incorrect API key provided: sk-test.",
                            "type": "invalid_request_error"
                        }
                    }))
                }),
            )
        });

        let interpreter = Interpreter::with_endpoint(srv.url("/v1/chat/completions"));
        let err = interpreter
            .interpret(&white_snapshot(), "sk-test")
            .await
            .unwrap_err();

        match err {
            InterpretError::Auth(message) => {
                assert_eq!(message, "Incorrect API key provided: sk-test.");
            }
            other => panic!("expected an auth error, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn flags_a_reply_with_no_description() {
        let srv = actix_test::start(|| {
            App::new().route(
                "/v1/chat/completions",
                web::post().to(|| async { HttpResponse::Ok().json(json!({"choices": []})) }),
            )
        });

        let interpreter = Interpreter::with_endpoint(srv.url("/v1/chat/completions"));
        let err = interpreter
            .interpret(&white_snapshot(), "sk-test")
            .await
            .unwrap_err();
        assert!(matches!(err, InterpretError::Response(_)));
    }

    #[actix_web::test]
    async fn classifies_an_unreachable_endpoint_as_transport() {
        // Nothing listens on the discard port
        let interpreter = Interpreter::with_endpoint("http://127.0.0.1:9/".to_string());
        let err = interpreter
            .interpret(&white_snapshot(), "sk-test")
            .await
            .unwrap_err();
        assert!(matches!(err, InterpretError::Transport(_)));
    }
}
