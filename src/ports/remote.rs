//! Direct remote-client port: the two third-party operations the pipeline
//! uses, a text "describe" call and an image-synthesis call.

use std::future::Future;
use std::pin::Pin;

use crate::error::GenError;
use crate::request::ReferenceImage;

/// One named long-form field of a describe call's user payload.
///
/// The refiner receives each field with a human-readable note about its role
/// and priority, so the priority rule survives transport as plain text.
#[derive(Debug, Clone)]
pub struct DescribeField {
    /// Field name (e.g., `"source-text"`).
    pub name: &'static str,
    /// Role and priority note shown to the refiner.
    pub role: &'static str,
    /// Field content.
    pub content: String,
}

/// A description-refinement request.
#[derive(Debug, Clone)]
pub struct DescribeRequest {
    /// System instruction for the refiner.
    pub system_prompt: String,
    /// Named long-form fields forming the user payload.
    pub fields: Vec<DescribeField>,
    /// Images attached to the user payload (reference-description step only).
    pub reference_images: Vec<ReferenceImage>,
}

/// An image-synthesis request.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// Final image prompt.
    pub prompt: String,
    /// Model identifier.
    pub model: String,
    /// Pixel size as `"WxH"`.
    pub size: &'static str,
    /// Quality wire name.
    pub quality: &'static str,
    /// Reference images; non-empty switches the call to edit/composition
    /// mode with a multipart body.
    pub reference_images: Vec<ReferenceImage>,
}

/// Transport form of a synthesized image: base64 as carried in the response.
#[derive(Debug, Clone)]
pub struct SynthesizedImage {
    /// Base64-encoded PNG payload.
    pub b64: String,
}

/// Boxed future returned by [`RemoteClient::describe`].
pub type DescribeFuture<'a> = Pin<Box<dyn Future<Output = Result<String, GenError>> + Send + 'a>>;

/// Boxed future returned by [`RemoteClient::synthesize`].
pub type SynthesizeFuture<'a> =
    Pin<Box<dyn Future<Output = Result<SynthesizedImage, GenError>> + Send + 'a>>;

/// The two third-party operations used by the direct generation pathway.
pub trait RemoteClient: Send + Sync {
    /// Run a describe call and return the refined text (untrimmed).
    fn describe(&self, request: &DescribeRequest) -> DescribeFuture<'_>;

    /// Run an image-synthesis call and return the transport-form image.
    fn synthesize(&self, request: &SynthesisRequest) -> SynthesizeFuture<'_>;
}
