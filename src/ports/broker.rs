//! Brokered client port: the first-party backend performs the describe and
//! synthesis steps server-side in one round trip, and additionally serves
//! the curated cocktail content.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::GenError;

/// Wire body of the brokered generate call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerRequest {
    /// Subject kind wire name.
    #[serde(rename = "type")]
    pub subject_kind: String,
    /// Long-form source text.
    pub text: String,
    /// Effective context prompt.
    pub prompt: String,
    /// Reference images as `data:` URIs.
    pub reference_images: Vec<String>,
    /// Model identifier.
    pub model: String,
    /// Quality wire name.
    pub quality: String,
    /// Aspect-ratio wire name.
    pub aspect_ratio: String,
    /// Forwarded local key, present only in brokered-BYOK mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Quota usage reported on a successful brokered response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Usage {
    /// Generations consumed this period.
    pub used: u64,
    /// Generations allowed this period.
    pub limit: u64,
}

/// Successful brokered response: image and description together.
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerReply {
    /// Base64-encoded PNG payload.
    pub image: String,
    /// Refined description produced server-side.
    pub description: String,
    /// Optional quota metadata.
    pub usage: Option<Usage>,
}

/// Curated cocktail content served by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cocktail {
    /// Cocktail name.
    pub name: String,
    /// Recipe text.
    pub recipe: String,
    /// Optional image URL.
    pub image_url: Option<String>,
}

/// Boxed future returned by [`BrokerClient::generate`].
pub type BrokerGenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<BrokerReply, GenError>> + Send + 'a>>;

/// Boxed future returned by [`BrokerClient::fetch_cocktail`].
pub type CocktailFuture<'a> = Pin<Box<dyn Future<Output = Result<Cocktail, GenError>> + Send + 'a>>;

/// Operations offered by the first-party backend.
pub trait BrokerClient: Send + Sync {
    /// Run the combined describe-and-synthesize call.
    fn generate(&self, request: &BrokerRequest) -> BrokerGenerateFuture<'_>;

    /// Fetch the current curated cocktail.
    fn fetch_cocktail(&self) -> CocktailFuture<'_>;
}
