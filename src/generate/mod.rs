//! Remote text generation: endpoint catalogue and HTTP client.

pub mod client;
pub mod endpoint;

pub use client::{Generator, HttpGenerator};
pub use endpoint::{EndpointKind, Payload};
