//! Per-subject-kind prompt strategies.
//!
//! Each subject kind carries three pieces of prompt text: a default context
//! instruction (used when the caller supplies none), a system instruction for
//! the description-refinement call, and a deterministic template wrapping the
//! refined description into the final image prompt. All variants share the
//! same mechanism; only the wording differs, so this is a static lookup table
//! rather than a trait hierarchy.

use crate::request::SubjectKind;

/// Prompt text set for one subject kind.
#[derive(Debug)]
pub struct PromptStrategy {
    /// Fallback context instruction when the caller supplies none.
    pub default_context: &'static str,
    /// System instruction for the description-refinement call.
    pub describe_system: &'static str,
    prompt_prefix: &'static str,
    prompt_suffix: &'static str,
}

impl PromptStrategy {
    /// Wrap a refined description into the final image prompt.
    ///
    /// Pure: the same description always yields the same prompt string.
    #[must_use]
    pub fn build_image_prompt(&self, description: &str) -> String {
        format!("{}{}{}", self.prompt_prefix, description, self.prompt_suffix)
    }
}

// The refiner instructions share three rules across all kinds: the user's
// context prompt outranks the source text and the reference description on
// conflict, names/personality/lore are excluded, and only physically
// visualizable detail survives.

const CHARACTER: PromptStrategy = PromptStrategy {
    default_context: "A head-and-shoulders portrait emphasizing the face.",
    describe_system: "You refine character descriptions for an illustrator. \
        From the provided source text, reference-image description, and user \
        context prompt, write a single concise physical description of the \
        character. When the user context prompt conflicts with the source \
        text or the reference-image description, the user context prompt \
        always wins. Exclude names, personality, backstory, and lore. Keep \
        only what can be seen: build, face, hair, skin, clothing, equipment, \
        pose. Output only the description.",
    prompt_prefix: "A fantasy character portrait illustration of ",
    prompt_suffix: ". Single subject centered against a plain background \
        with generous negative space. Strong emphasis on facial detail and \
        expression. Consistent painterly illustration style, soft studio \
        lighting, no text or watermarks.",
};

const CREATURE: PromptStrategy = PromptStrategy {
    default_context: "A full-body depiction showing the creature's anatomy.",
    describe_system: "You refine creature descriptions for an illustrator. \
        From the provided source text, reference-image description, and user \
        context prompt, write a single concise physical description of the \
        creature. When the user context prompt conflicts with the source \
        text or the reference-image description, the user context prompt \
        always wins. Exclude names, temperament, habitat lore, and game \
        statistics. Keep only what can be seen: anatomy, hide or plumage, \
        limbs, eyes, teeth, stance. Output only the description.",
    prompt_prefix: "A fantasy creature illustration of ",
    prompt_suffix: ". Single creature centered against a plain background \
        with generous negative space. Strong emphasis on the head and eyes. \
        Consistent painterly illustration style, dramatic lighting, no text \
        or watermarks.",
};

const SCENE: PromptStrategy = PromptStrategy {
    default_context: "A wide establishing view of the location.",
    describe_system: "You refine scene descriptions for an illustrator. From \
        the provided source text, reference-image description, and user \
        context prompt, write a single concise physical description of the \
        location. When the user context prompt conflicts with the source \
        text or the reference-image description, the user context prompt \
        always wins. Exclude place names, history, and narrative events. \
        Keep only what can be seen: terrain, architecture, vegetation, \
        weather, light. Output only the description.",
    prompt_prefix: "A fantasy environment illustration of ",
    prompt_suffix: ". Wide framing with a clear foreground, midground, and \
        background. Centered composition with breathing room at the edges. \
        Consistent painterly illustration style, atmospheric lighting, no \
        text or watermarks.",
};

const ITEM: PromptStrategy = PromptStrategy {
    default_context: "A clean studio rendering of the object by itself.",
    describe_system: "You refine object descriptions for an illustrator. \
        From the provided source text, reference-image description, and user \
        context prompt, write a single concise physical description of the \
        object. When the user context prompt conflicts with the source text \
        or the reference-image description, the user context prompt always \
        wins. Exclude names, provenance, and magical effects that have no \
        visible form. Keep only what can be seen: shape, materials, wear, \
        ornamentation. Output only the description.",
    prompt_prefix: "A fantasy item illustration of ",
    prompt_suffix: ". Single object centered against a plain background \
        with generous negative space, framed to fill most of the canvas. \
        Consistent painterly illustration style, even studio lighting, no \
        text or watermarks.",
};

/// Look up the strategy for a subject kind.
#[must_use]
pub fn strategy_for(kind: SubjectKind) -> &'static PromptStrategy {
    match kind {
        SubjectKind::Character => &CHARACTER,
        SubjectKind::Creature => &CREATURE,
        SubjectKind::Scene => &SCENE,
        SubjectKind::Item => &ITEM,
    }
}
