//! Core components of the `dlws-rs` crate.
//!
//! This module contains the foundational building blocks of the library, including:
//! - The HTTP transport [`DlClient`] and its builder.
//! - The primary [`DlError`] type.
//! - Shared data models like [`Identifier`], [`Batch`] and [`Row`].
//! - The request kind registry and the structural reply view.

/// The HTTP client (`DlClient`), builder, and polling configuration.
pub mod client;
/// The primary error type (`DlError`) for the crate.
pub mod error;
/// Shared data models used across modules (identifiers, field lists, batches, rows).
pub mod models;
/// Schema-tolerant access to reply envelopes.
pub mod node;
/// Request kinds and the kind → operation table.
pub mod registry;
/// Transport trait for invoking remote operations.
pub mod services;

pub(crate) mod net;

#[cfg(feature = "tracing-subscriber")]
pub(crate) mod telemetry;

// convenient re-exports so most code can just `use crate::core::DlClient`
pub use client::{DlClient, DlClientBuilder, PollConfig};
pub use error::DlError;
pub use models::{Batch, FieldList, Identifier, Override, Row};
pub use node::Response;
pub use registry::{Operation, Registry, RequestKind};
pub use services::OperationClient;

/// A reply envelope as decoded from the wire.
pub type Envelope = serde_json::Value;
