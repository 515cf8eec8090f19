use crate::core::DlError;
use futures::future::BoxFuture;
use serde_json::Value;
use std::time::Duration;

/// A boxed future returned by [`OperationClient`] implementations.
pub type OperationFuture<'a> = BoxFuture<'a, Result<Value, DlError>>;

/// A transport that can invoke named remote operations.
///
/// This decouples request submission, polling and the download pipeline from the
/// wire transport. It is implemented by [`DlClient`](crate::DlClient); tests and
/// embedders can provide their own.
pub trait OperationClient: Send + Sync {
    /// Invokes `operation` with `body` and returns the reply envelope.
    ///
    /// # Arguments
    /// * `operation` - The remote operation name (see [`Registry`](crate::Registry)).
    /// * `body` - The request body, already shaped for the wire.
    /// * `timeout` - An optional per-call timeout overriding the transport default.
    ///
    /// # Errors
    ///
    /// Implementations return [`DlError::Fault`] when the remote side rejects the call
    /// and [`DlError::Transport`] on network failures.
    fn invoke<'a>(
        &'a self,
        operation: &'a str,
        body: Value,
        timeout: Option<Duration>,
    ) -> OperationFuture<'a>;
}
