//! Account snapshot and generation-strategy resolution.
//!
//! The host application owns account linking and subscription state; this
//! module only reads a per-request snapshot and derives which of the three
//! generation pathways applies. Resolution is a pure function: no I/O, no
//! caching, re-derivable from the same inputs.

use crate::error::GenError;

/// Subscription tier that includes pooled server-side generation, in cents.
pub const TIER_POOLED: u32 = 500;

/// Lowest paid tier, in cents. Carries no generation entitlement of its own
/// but is a real boundary on the billing side.
pub const TIER_SUPPORTER: u32 = 300;

/// Read-only snapshot of the account and local credential state.
#[derive(Debug, Clone, Default)]
pub struct AccountState {
    /// Whether a first-party account is linked in the host application.
    pub linked: bool,
    /// Subscription tier as a cents-equivalent (0 = free, 300, 500, 1000).
    pub tier_cents: u32,
    /// Locally configured third-party API key, if any.
    pub local_api_key: Option<String>,
    /// Whether the user prefers routing through the first-party backend.
    pub server_mode_preferred: bool,
}

/// One of the three generation pathways.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStrategy {
    /// First-party backend generates with its own pooled credential.
    ServerPooled,
    /// First-party backend generates with the user's forwarded key.
    ServerBrokeredByok,
    /// This process calls the third-party provider directly with the
    /// user's key.
    LocalDirectByok,
}

/// Resolve the generation strategy for an account snapshot.
///
/// Priority order, first match wins:
/// 1. linked + pooled tier + server mode preferred → `ServerPooled`
/// 2. linked + local key → `ServerBrokeredByok` (the key is forwarded so the
///    backend can still validate tier-gated features)
/// 3. unlinked + local key → `LocalDirectByok`
///
/// # Errors
///
/// Returns [`GenError::Unconfigured`] when no pathway applies. The message
/// distinguishes "linked but insufficient tier, no fallback key" from
/// "no account and no key".
pub fn resolve_strategy(account: &AccountState) -> Result<GenerationStrategy, GenError> {
    if account.linked && account.tier_cents >= TIER_POOLED && account.server_mode_preferred {
        return Ok(GenerationStrategy::ServerPooled);
    }
    if account.linked && account.local_api_key.is_some() {
        return Ok(GenerationStrategy::ServerBrokeredByok);
    }
    if !account.linked && account.local_api_key.is_some() {
        return Ok(GenerationStrategy::LocalDirectByok);
    }

    let message = if account.linked {
        "Your linked account's tier does not include image generation and no \
         API key is configured as a fallback. Upgrade your subscription or add \
         your own key."
    } else {
        "No account is linked and no API key is configured. Link an account or \
         add your own key."
    };
    Err(GenError::Unconfigured(message.to_string()))
}
