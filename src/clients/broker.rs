//! Live adapter for the first-party backend.
//!
//! One POST carries the whole generation request (plus the forwarded key in
//! brokered-BYOK mode); the backend runs both pipeline operations and
//! returns the image and description together. Error bodies carry a
//! discriminant that maps quota and subscription failures to their own
//! error variants so the host can present actionable messages.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::GenError;
use crate::ports::broker::{
    BrokerClient, BrokerGenerateFuture, BrokerReply, BrokerRequest, Cocktail, CocktailFuture,
};

/// Live client for the first-party backend.
pub struct BrokeredClient {
    client: Client,
    base_url: String,
}

impl BrokeredClient {
    /// Create a client against the given backend base URL.
    #[must_use]
    pub fn new(base_url: String) -> Self {
        Self { client: Client::new(), base_url }
    }
}

impl BrokerClient for BrokeredClient {
    fn generate(&self, request: &BrokerRequest) -> BrokerGenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            debug!(kind = %request.subject_kind, byok = request.api_key.is_some(),
                "brokered generate call");

            let response = self
                .client
                .post(format!("{}/api/generate", self.base_url))
                .json(&request)
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;
            if !status.is_success() {
                return Err(classify_broker_error(status.as_u16(), &response_text));
            }

            serde_json::from_str::<BrokerReply>(&response_text).map_err(|e| {
                GenError::MalformedResponse(format!("Failed to parse broker response: {e}"))
            })
        })
    }

    fn fetch_cocktail(&self) -> CocktailFuture<'_> {
        Box::pin(async move {
            let response =
                self.client.get(format!("{}/api/cocktail", self.base_url)).send().await?;

            let status = response.status();
            let response_text = response.text().await?;
            if !status.is_success() {
                return Err(classify_broker_error(status.as_u16(), &response_text));
            }

            serde_json::from_str::<Cocktail>(&response_text).map_err(|e| {
                GenError::MalformedResponse(format!("Failed to parse cocktail response: {e}"))
            })
        })
    }
}

/// Map a non-2xx broker response to a typed error.
///
/// Bodies shaped `{"error": <discriminant>, "message": <text>}` map
/// `subscription_required` and `quota_exceeded` to their own variants with
/// the server's message preserved; anything else becomes a generic API
/// error carrying whatever text is available.
#[must_use]
pub fn classify_broker_error(status: u16, body: &str) -> GenError {
    #[derive(Deserialize)]
    struct BrokerErrorBody {
        error: String,
        message: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<BrokerErrorBody>(body) {
        let message = parsed.message.unwrap_or_else(|| parsed.error.clone());
        return match parsed.error.as_str() {
            "subscription_required" => GenError::SubscriptionRequired(message),
            "quota_exceeded" => GenError::QuotaExceeded(message),
            _ => GenError::Api { status, message },
        };
    }

    let message =
        if body.trim().is_empty() { format!("HTTP {status}") } else { body.to_string() };
    GenError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_exceeded_is_typed_with_server_message() {
        let err = classify_broker_error(
            429,
            r#"{"error":"quota_exceeded","message":"Monthly limit of 50 generations reached"}"#,
        );
        match err {
            GenError::QuotaExceeded(msg) => {
                assert_eq!(msg, "Monthly limit of 50 generations reached");
            }
            other => panic!("expected QuotaExceeded, got {other:?}"),
        }
    }

    #[test]
    fn subscription_required_is_typed_with_server_message() {
        let err = classify_broker_error(
            403,
            r#"{"error":"subscription_required","message":"Upgrade to generate images"}"#,
        );
        match err {
            GenError::SubscriptionRequired(msg) => assert_eq!(msg, "Upgrade to generate images"),
            other => panic!("expected SubscriptionRequired, got {other:?}"),
        }
    }

    #[test]
    fn unknown_discriminant_is_generic_api_error() {
        let err =
            classify_broker_error(400, r#"{"error":"bad_request","message":"missing text"}"#);
        match err {
            GenError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "missing text");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn unstructured_body_falls_back_to_text_then_status() {
        match classify_broker_error(502, "bad gateway") {
            GenError::Api { message, .. } => assert_eq!(message, "bad gateway"),
            other => panic!("expected Api, got {other:?}"),
        }
        match classify_broker_error(502, "") {
            GenError::Api { message, .. } => assert_eq!(message, "HTTP 502"),
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn discriminant_without_message_reuses_discriminant() {
        match classify_broker_error(429, r#"{"error":"quota_exceeded"}"#) {
            GenError::QuotaExceeded(msg) => assert_eq!(msg, "quota_exceeded"),
            other => panic!("expected QuotaExceeded, got {other:?}"),
        }
    }
}
