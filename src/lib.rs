//! dlws-rs: bulk reference, history and field-metadata requests against a data-license
//! web service, flattened into tabular rows.
//!
//! The pipeline, leaves first:
//! - [`batch`]: split identifiers into request-sized [`Batch`]es.
//! - [`payload`]: build the wire body for one batch.
//! - [`request`]: submit a job / retrieve its reply / make a synchronous call.
//! - [`poll`]: drive retrieval attempts off the reply's status code.
//! - [`normalize`]: turn a reply envelope into [`Row`]s, whatever its shape.
//! - [`store`]: persist rows and raw replies.
//!
//! [`DownloadBuilder`] strings these together; [`FieldSearchBuilder`] covers field
//! catalog lookups.

pub mod batch;
pub mod core;
pub mod download;
pub mod fields;
pub mod normalize;
pub mod payload;
pub mod poll;
pub mod request;
pub mod store;

pub use batch::{ChunkingConfig, CsvColumns, chunk, load_fields, load_identifiers};
pub use crate::core::{
    Batch, DlClient, DlClientBuilder, DlError, Envelope, FieldList, Identifier, Operation,
    OperationClient, Override, PollConfig, Registry, RequestKind, Response, Row,
};
pub use download::{DownloadBuilder, DownloadReport};
pub use fields::FieldSearchBuilder;
pub use payload::{RequestPayload, build_payload};
pub use poll::{PollState, Poller};
pub use store::{FileSystemStore, MemoryStore, OutputSink, resolve_store};

#[cfg(feature = "tracing-subscriber")]
pub use crate::core::telemetry::init_tracing;
