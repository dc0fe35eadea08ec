//! Generation request vocabulary and pre-network validation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenError;

/// Hard cap on reference images per request.
pub const MAX_REFERENCE_IMAGES: usize = 4;

/// Hard cap on the raw subject text, in characters.
pub const MAX_SUBJECT_TEXT_CHARS: usize = 10_000;

/// The category of subject being illustrated, which selects the prompt
/// strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    /// A player character or NPC.
    Character,
    /// A monster or beast.
    Creature,
    /// A location or environment.
    Scene,
    /// An object, weapon, or piece of equipment.
    Item,
}

impl SubjectKind {
    /// Wire name used in the brokered request body.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Creature => "creature",
            Self::Scene => "scene",
            Self::Item => "item",
        }
    }
}

impl FromStr for SubjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "character" => Ok(Self::Character),
            "creature" => Ok(Self::Creature),
            "scene" => Ok(Self::Scene),
            "item" => Ok(Self::Item),
            other => Err(format!(
                "Unknown subject kind '{other}'. Valid: character, creature, scene, item"
            )),
        }
    }
}

/// Quality level passed through to the synthesis endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Cheapest and fastest.
    Low,
    /// Balanced.
    Medium,
    /// Best output, slowest.
    High,
}

impl Quality {
    /// Wire name for both transports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("Unsupported quality '{other}'. Valid: low, medium, high")),
        }
    }
}

/// Requested output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    /// 1024x1024.
    Square,
    /// 1536x1024.
    Landscape,
    /// 1024x1536.
    Portrait,
}

impl AspectRatio {
    /// Pixel dimensions expected by the synthesis endpoint, as `"WxH"`.
    #[must_use]
    pub fn size(self) -> &'static str {
        match self {
            Self::Square => "1024x1024",
            Self::Landscape => "1536x1024",
            Self::Portrait => "1024x1536",
        }
    }

    /// Wire name used in the brokered request body.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
        }
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "square" => Ok(Self::Square),
            "landscape" => Ok(Self::Landscape),
            "portrait" => Ok(Self::Portrait),
            other => {
                Err(format!("Unsupported aspect ratio '{other}'. Valid: square, landscape, portrait"))
            }
        }
    }
}

/// A caller-supplied image used to steer the synthesized output.
#[derive(Debug, Clone)]
pub struct ReferenceImage {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// Declared MIME type (e.g., `"image/png"`, `"image/jpeg"`).
    pub mime_type: String,
}

/// One portrait-generation request. Immutable once handed to the pipeline.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Subject category.
    pub subject_kind: SubjectKind,
    /// Long-form source text describing the subject (sheet/journal extract).
    pub raw_text: String,
    /// Optional user instruction that overrides `raw_text` and the reference
    /// description when they conflict.
    pub context_prompt: Option<String>,
    /// Up to [`MAX_REFERENCE_IMAGES`] style/composition references.
    pub reference_images: Vec<ReferenceImage>,
    /// Quality level.
    pub quality: Quality,
    /// Output shape.
    pub aspect_ratio: AspectRatio,
    /// Synthesis model identifier.
    pub model: String,
}

impl GenerationRequest {
    /// Validate invariants that must hold before any network call.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidArgument`] when the reference-image cap or
    /// subject-text cap is exceeded, or the subject text is blank.
    pub fn validate(&self) -> Result<(), GenError> {
        if self.reference_images.len() > MAX_REFERENCE_IMAGES {
            return Err(GenError::InvalidArgument(format!(
                "Too many reference images: {} (maximum {MAX_REFERENCE_IMAGES})",
                self.reference_images.len()
            )));
        }
        if self.raw_text.chars().count() > MAX_SUBJECT_TEXT_CHARS {
            return Err(GenError::InvalidArgument(format!(
                "Subject text too long (maximum {MAX_SUBJECT_TEXT_CHARS} characters)"
            )));
        }
        if self.raw_text.trim().is_empty() {
            return Err(GenError::InvalidArgument("Subject text is empty".to_string()));
        }
        Ok(())
    }

    /// The context prompt in effect: the caller's, or the kind's default.
    #[must_use]
    pub fn effective_context_prompt(&self) -> &str {
        match self.context_prompt.as_deref() {
            Some(p) if !p.trim().is_empty() => p,
            _ => crate::prompts::strategy_for(self.subject_kind).default_context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            subject_kind: SubjectKind::Character,
            raw_text: "A grizzled dwarven smith with a braided copper beard.".into(),
            context_prompt: None,
            reference_images: Vec::new(),
            quality: Quality::Medium,
            aspect_ratio: AspectRatio::Square,
            model: "gpt-image-1".into(),
        }
    }

    #[test]
    fn size_mapping() {
        assert_eq!(AspectRatio::Square.size(), "1024x1024");
        assert_eq!(AspectRatio::Landscape.size(), "1536x1024");
        assert_eq!(AspectRatio::Portrait.size(), "1024x1536");
    }

    #[test]
    fn subject_kind_round_trip() {
        for name in ["character", "creature", "scene", "item"] {
            assert_eq!(name.parse::<SubjectKind>().unwrap().as_str(), name);
        }
        assert!("vehicle".parse::<SubjectKind>().is_err());
    }

    #[test]
    fn quality_parse() {
        assert_eq!("high".parse::<Quality>().unwrap(), Quality::High);
        assert!("ultra".parse::<Quality>().is_err());
    }

    #[test]
    fn aspect_ratio_parse() {
        assert_eq!("landscape".parse::<AspectRatio>().unwrap(), AspectRatio::Landscape);
        assert!("16:9".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn too_many_references_rejected() {
        let mut req = request();
        req.reference_images = (0..5)
            .map(|_| ReferenceImage { data: vec![0u8; 4], mime_type: "image/png".into() })
            .collect();
        assert!(matches!(req.validate(), Err(GenError::InvalidArgument(_))));
    }

    #[test]
    fn four_references_accepted() {
        let mut req = request();
        req.reference_images = (0..4)
            .map(|_| ReferenceImage { data: vec![0u8; 4], mime_type: "image/png".into() })
            .collect();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn oversized_text_rejected() {
        let mut req = request();
        req.raw_text = "x".repeat(MAX_SUBJECT_TEXT_CHARS + 1);
        assert!(matches!(req.validate(), Err(GenError::InvalidArgument(_))));
    }

    #[test]
    fn blank_text_rejected() {
        let mut req = request();
        req.raw_text = "   ".into();
        assert!(matches!(req.validate(), Err(GenError::InvalidArgument(_))));
    }

    #[test]
    fn explicit_context_prompt_wins() {
        let mut req = request();
        req.context_prompt = Some("wearing a crimson cloak".into());
        assert_eq!(req.effective_context_prompt(), "wearing a crimson cloak");
    }

    #[test]
    fn blank_context_prompt_falls_back_to_default() {
        let mut req = request();
        req.context_prompt = Some("   ".into());
        assert_eq!(
            req.effective_context_prompt(),
            crate::prompts::strategy_for(SubjectKind::Character).default_context
        );
    }
}
