//! Easel - AI portrait generation core for tabletop game hosts.
//!
//! Given a subject description, an optional context prompt, and up to four
//! reference images, easel resolves which of three generation pathways the
//! current account/key combination allows (pooled server, brokered
//! bring-your-own-key, or direct bring-your-own-key), runs the
//! describe-then-render pipeline against the chosen backend, and returns a
//! PNG plus the refined description. Persistence and presentation are the
//! caller's concern.

pub mod account;
pub mod cli;
pub mod clients;
pub mod codec;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod ports;
pub mod prompts;
pub mod request;

pub use account::{resolve_strategy, AccountState, GenerationStrategy};
pub use error::GenError;
pub use pipeline::{GeneratedImage, GenerationOutcome, ServiceContext};
pub use request::{AspectRatio, GenerationRequest, Quality, ReferenceImage, SubjectKind};
