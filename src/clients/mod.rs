//! Live HTTP adapters for the [`crate::ports`] traits.

pub mod broker;
pub mod direct;

pub use broker::BrokeredClient;
pub use direct::DirectClient;
