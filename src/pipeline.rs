//! Generation pipeline and the service context that bundles the resolved
//! client.
//!
//! Direct strategies run the five-step flow: best-effort reference
//! description, subject refinement, prompt construction, image synthesis,
//! base64 decode. Brokered strategies hand the whole request to the
//! first-party backend, which runs the same two operations server-side in
//! one round trip. Only the reference-description step may fail without
//! aborting the pipeline.

use tracing::{debug, warn};

use crate::account::{resolve_strategy, AccountState, GenerationStrategy};
use crate::clients::{BrokeredClient, DirectClient};
use crate::codec;
use crate::error::GenError;
use crate::ports::broker::{BrokerClient, BrokerRequest, Cocktail};
use crate::ports::remote::{DescribeField, DescribeRequest, RemoteClient, SynthesisRequest};
use crate::prompts;
use crate::request::GenerationRequest;

/// Stand-in reference description when no images were supplied or the
/// description call failed.
pub const NO_REFERENCE_SENTINEL: &str = "no reference images provided";

const REFERENCE_DESCRIBE_SYSTEM: &str = "You describe images for an \
    illustrator. Describe the physical appearance, art style, palette, and \
    composition of the attached images in concise visual terms. Output only \
    the description.";

/// Terminal artifact of a generation run. Ownership transfers to the
/// caller, which is responsible for persistence.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// Raw PNG bytes.
    pub data: Vec<u8>,
    /// Always `"image/png"`.
    pub mime_type: String,
}

/// Image plus the refined description it was rendered from.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// The synthesized image.
    pub image: GeneratedImage,
    /// The refined subject description.
    pub description: String,
    /// Quota metadata, present only on brokered runs that report it.
    pub usage: Option<crate::ports::broker::Usage>,
}

enum ServiceMode {
    Direct(Box<dyn RemoteClient>),
    Brokered { broker: Box<dyn BrokerClient>, forwarded_key: Option<String> },
}

/// Bundles the client selected for the resolved strategy.
///
/// Built once per request from the account snapshot, or assembled directly
/// with injected clients for tests and embedding hosts.
pub struct ServiceContext {
    mode: ServiceMode,
}

impl ServiceContext {
    /// Resolve the strategy for an account snapshot and construct the
    /// matching live client.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Unconfigured`] when no strategy applies.
    pub fn from_account(account: &AccountState, broker_base_url: &str) -> Result<Self, GenError> {
        let strategy = resolve_strategy(account)?;
        debug!(?strategy, "resolved generation strategy");

        let mode = match strategy {
            GenerationStrategy::LocalDirectByok => {
                let key = account.local_api_key.clone().ok_or_else(|| {
                    GenError::Config("direct strategy resolved without a local key".into())
                })?;
                ServiceMode::Direct(Box::new(DirectClient::new(key)))
            }
            GenerationStrategy::ServerPooled => ServiceMode::Brokered {
                broker: Box::new(BrokeredClient::new(broker_base_url.to_string())),
                forwarded_key: None,
            },
            GenerationStrategy::ServerBrokeredByok => ServiceMode::Brokered {
                broker: Box::new(BrokeredClient::new(broker_base_url.to_string())),
                forwarded_key: account.local_api_key.clone(),
            },
        };
        Ok(Self { mode })
    }

    /// Build a direct-mode context around an injected client.
    #[must_use]
    pub fn direct(client: Box<dyn RemoteClient>) -> Self {
        Self { mode: ServiceMode::Direct(client) }
    }

    /// Build a brokered-mode context around an injected client.
    #[must_use]
    pub fn brokered(broker: Box<dyn BrokerClient>, forwarded_key: Option<String>) -> Self {
        Self { mode: ServiceMode::Brokered { broker, forwarded_key } }
    }

    /// Run one generation request to completion.
    ///
    /// # Errors
    ///
    /// Validation failures surface before any network call. After that,
    /// describe/synthesis/decode failures abort with their typed error;
    /// only the reference-description step is non-fatal.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome, GenError> {
        request.validate()?;
        match &self.mode {
            ServiceMode::Direct(client) => run_direct(request, client.as_ref()).await,
            ServiceMode::Brokered { broker, forwarded_key } => {
                run_brokered(request, broker.as_ref(), forwarded_key.as_deref()).await
            }
        }
    }

    /// Fetch the curated cocktail from the backend.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Unconfigured`] in direct mode, where no backend
    /// is in play.
    pub async fn cocktail(&self) -> Result<Cocktail, GenError> {
        match &self.mode {
            ServiceMode::Brokered { broker, .. } => broker.fetch_cocktail().await,
            ServiceMode::Direct(_) => Err(GenError::Unconfigured(
                "Cocktail content requires a linked account.".into(),
            )),
        }
    }
}

async fn run_direct(
    request: &GenerationRequest,
    client: &dyn RemoteClient,
) -> Result<GenerationOutcome, GenError> {
    let strategy = prompts::strategy_for(request.subject_kind);

    // Step 1: best-effort reference description. Never aborts the run.
    let reference_description = if request.reference_images.is_empty() {
        NO_REFERENCE_SENTINEL.to_string()
    } else {
        describe_references(request, client).await
    };

    // Step 2: subject refinement. Blank output is fatal.
    let refine = DescribeRequest {
        system_prompt: strategy.describe_system.to_string(),
        fields: vec![
            DescribeField {
                name: "source-text",
                role: "long-form subject text; lowest priority on conflict",
                content: request.raw_text.clone(),
            },
            DescribeField {
                name: "reference-image-description",
                role: "what the supplied reference images show",
                content: reference_description,
            },
            DescribeField {
                name: "context-prompt",
                role: "user instruction; highest priority on conflict",
                content: request.effective_context_prompt().to_string(),
            },
        ],
        reference_images: Vec::new(),
    };
    let refined = client.describe(&refine).await?;
    let refined = refined.trim();
    if refined.is_empty() {
        return Err(GenError::EmptyDescription);
    }

    // Steps 3-4: wrap into the final prompt and synthesize one image.
    let synthesis = SynthesisRequest {
        prompt: strategy.build_image_prompt(refined),
        model: request.model.clone(),
        size: request.aspect_ratio.size(),
        quality: request.quality.as_str(),
        reference_images: request.reference_images.clone(),
    };
    let transport = client.synthesize(&synthesis).await?;

    // Step 5: transport encoding to raw bytes.
    let data = codec::decode_base64(&transport.b64)?;
    Ok(GenerationOutcome {
        image: GeneratedImage { data, mime_type: "image/png".into() },
        description: refined.to_string(),
        usage: None,
    })
}

async fn describe_references(request: &GenerationRequest, client: &dyn RemoteClient) -> String {
    let describe = DescribeRequest {
        system_prompt: REFERENCE_DESCRIBE_SYSTEM.to_string(),
        fields: vec![DescribeField {
            name: "instruction",
            role: "task",
            content: "Describe the physical appearance of the attached reference images."
                .to_string(),
        }],
        reference_images: request.reference_images.clone(),
    };

    match client.describe(&describe).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            warn!("reference description came back empty; continuing without it");
            NO_REFERENCE_SENTINEL.to_string()
        }
        Err(e) => {
            warn!(error = %e, "reference description failed; continuing without it");
            NO_REFERENCE_SENTINEL.to_string()
        }
    }
}

async fn run_brokered(
    request: &GenerationRequest,
    broker: &dyn BrokerClient,
    forwarded_key: Option<&str>,
) -> Result<GenerationOutcome, GenError> {
    let body = BrokerRequest {
        subject_kind: request.subject_kind.as_str().to_string(),
        text: request.raw_text.clone(),
        prompt: request.effective_context_prompt().to_string(),
        reference_images: request.reference_images.iter().map(codec::to_data_uri).collect(),
        model: request.model.clone(),
        quality: request.quality.as_str().to_string(),
        aspect_ratio: request.aspect_ratio.as_str().to_string(),
        api_key: forwarded_key.map(String::from),
    };

    let reply = broker.generate(&body).await?;
    if let Some(usage) = reply.usage {
        debug!(used = usage.used, limit = usage.limit, "broker quota usage");
    }

    let description = reply.description.trim().to_string();
    if description.is_empty() {
        return Err(GenError::EmptyDescription);
    }

    let data = codec::decode_base64(&reply.image)?;
    Ok(GenerationOutcome {
        image: GeneratedImage { data, mime_type: "image/png".into() },
        description,
        usage: reply.usage,
    })
}
