//! Live adapter for the third-party provider's describe and synthesis APIs.
//!
//! Describe calls go to the chat-completions endpoint as a multimodal
//! message. Synthesis without references is a compact JSON body to the
//! generations endpoint; with references it becomes a multipart form to the
//! edits endpoint, one binary PNG part per reference image. Body assembly is
//! kept in pure functions so the JSON-vs-multipart switch is testable
//! without a server.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::codec;
use crate::error::GenError;
use crate::ports::remote::{
    DescribeFuture, DescribeRequest, RemoteClient, SynthesisRequest, SynthesizeFuture,
    SynthesizedImage,
};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Live direct client holding the user's key as a bearer credential.
pub struct DirectClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl DirectClient {
    /// Create a client against the default API base.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_API_BASE.to_string())
    }

    /// Create a client against a custom API base.
    #[must_use]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self { client: Client::new(), api_key, base_url }
    }
}

impl RemoteClient for DirectClient {
    fn describe(&self, request: &DescribeRequest) -> DescribeFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let body = build_describe_body(&request);
            debug!(fields = request.fields.len(), images = request.reference_images.len(),
                "describe call");

            let response = self
                .client
                .post(format!("{}/chat/completions", self.base_url))
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;
            if !status.is_success() {
                return Err(api_error(status.as_u16(), &response_text));
            }

            parse_describe_response(&response_text)
        })
    }

    fn synthesize(&self, request: &SynthesisRequest) -> SynthesizeFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let payload = build_synthesis_payload(&request)?;

            let response = match payload {
                SynthesisPayload::Json(body) => {
                    self.client
                        .post(format!("{}/images/generations", self.base_url))
                        .header("Authorization", format!("Bearer {}", self.api_key))
                        .json(&body)
                        .send()
                        .await?
                }
                SynthesisPayload::Multipart { fields, images } => {
                    let mut form = Form::new();
                    for (name, value) in fields {
                        form = form.text(name, value);
                    }
                    for (i, png) in images.into_iter().enumerate() {
                        let part = Part::bytes(png)
                            .file_name(format!("reference-{i}.png"))
                            .mime_str("image/png")
                            .map_err(|e| {
                                GenError::ImageConversion(format!("Bad part mime: {e}"))
                            })?;
                        form = form.part("image[]", part);
                    }
                    self.client
                        .post(format!("{}/images/edits", self.base_url))
                        .header("Authorization", format!("Bearer {}", self.api_key))
                        .multipart(form)
                        .send()
                        .await?
                }
            };

            let status = response.status();
            let response_text = response.text().await?;
            if !status.is_success() {
                return Err(api_error(status.as_u16(), &response_text));
            }

            parse_synthesis_response(&response_text)
        })
    }
}

/// Assembled synthesis request body, before transport encoding.
pub enum SynthesisPayload {
    /// Compact JSON body for the generations endpoint.
    Json(serde_json::Value),
    /// Multipart form for the edits endpoint.
    Multipart {
        /// Text fields.
        fields: Vec<(&'static str, String)>,
        /// One PNG payload per reference image.
        images: Vec<Vec<u8>>,
    },
}

/// Build the synthesis body: JSON without references, multipart with them.
///
/// # Errors
///
/// Returns [`GenError::ImageConversion`] if a reference image cannot be
/// normalized to PNG.
pub fn build_synthesis_payload(request: &SynthesisRequest) -> Result<SynthesisPayload, GenError> {
    if request.reference_images.is_empty() {
        return Ok(SynthesisPayload::Json(serde_json::json!({
            "model": request.model,
            "prompt": request.prompt,
            "size": request.size,
            "quality": request.quality,
            "background": "transparent",
            "n": 1,
        })));
    }

    let mut images = Vec::with_capacity(request.reference_images.len());
    for reference in &request.reference_images {
        images.push(codec::normalize_to_png(reference)?);
    }

    Ok(SynthesisPayload::Multipart {
        fields: vec![
            ("model", request.model.clone()),
            ("prompt", request.prompt.clone()),
            ("size", request.size.to_string()),
            ("quality", request.quality.to_string()),
            ("background", "transparent".to_string()),
            ("n", "1".to_string()),
        ],
        images,
    })
}

/// Build the chat-completions body for a describe call.
///
/// The user payload renders each named field under a heading with its role
/// note, then attaches any reference images as data-URI image parts.
#[must_use]
pub fn build_describe_body(request: &DescribeRequest) -> serde_json::Value {
    let mut content = Vec::new();
    content.push(serde_json::json!({
        "type": "text",
        "text": render_fields(&request.fields),
    }));
    for image in &request.reference_images {
        content.push(serde_json::json!({
            "type": "image_url",
            "image_url": { "url": codec::to_data_uri(image) },
        }));
    }

    serde_json::json!({
        "model": "gpt-4o-mini",
        "messages": [
            { "role": "system", "content": request.system_prompt },
            { "role": "user", "content": content },
        ],
    })
}

fn render_fields(fields: &[crate::ports::remote::DescribeField]) -> String {
    let mut document = String::new();
    for field in fields {
        document.push_str(&format!("### {} ({})\n{}\n\n", field.name, field.role, field.content));
    }
    document.trim_end().to_string()
}

/// Extract the refined text from a chat-completions response body.
///
/// # Errors
///
/// Returns [`GenError::MalformedResponse`] if the body does not parse or
/// carries no choice content.
pub fn parse_describe_response(body: &str) -> Result<String, GenError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| GenError::MalformedResponse(format!("Failed to parse describe response: {e}")))?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenError::MalformedResponse("Describe response has no choices".into()))?;
    Ok(choice.message.content)
}

/// Extract the base64 image from a synthesis response body.
///
/// # Errors
///
/// Returns [`GenError::MalformedResponse`] if the body does not parse or
/// carries no `b64_json` payload.
pub fn parse_synthesis_response(body: &str) -> Result<SynthesizedImage, GenError> {
    let parsed: ImagesResponse = serde_json::from_str(body).map_err(|e| {
        GenError::MalformedResponse(format!("Failed to parse synthesis response: {e}"))
    })?;
    let item = parsed
        .data
        .into_iter()
        .next()
        .ok_or_else(|| GenError::MalformedResponse("Synthesis response has no image data".into()))?;
    Ok(SynthesizedImage { b64: item.b64_json })
}

/// Map a non-2xx response to a typed error, preferring the provider's
/// structured message over the raw body.
#[must_use]
pub fn api_error(status: u16, body: &str) -> GenError {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body.to_string()
            }
        });
    GenError::Api { status, message }
}

// --- provider response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    b64_json: String,
}
