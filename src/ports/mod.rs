//! Port traits for the remote services the pipeline depends on.
//!
//! Live adapters in [`crate::clients`] implement these; tests inject
//! recording doubles instead.

pub mod broker;
pub mod remote;

pub use broker::{BrokerClient, BrokerReply, BrokerRequest, Cocktail, Usage};
pub use remote::{DescribeField, DescribeRequest, RemoteClient, SynthesisRequest, SynthesizedImage};
