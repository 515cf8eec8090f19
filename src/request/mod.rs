//! Submitting jobs, retrieving their replies, and synchronous calls.

use crate::core::{
    DlError, Envelope, Operation, OperationClient, Registry, RequestKind,
    node::{Response, SearchLimits, find_first, lookup, lookup_text},
};
use crate::payload::RequestPayload;
use crate::poll::is_empty_reply;
use serde_json::json;
use std::time::Duration;

/// Field names that carry the job identifier in a submit reply, most specific first.
pub const JOB_ID_KEYS: &[&str] = &["responseId", "response_id", "jobId", "requestId"];

/// Field names that carry a textual processing status in a retrieve reply.
const STATUS_TEXT_KEYS: &[&str] = &["processingStatus", "status"];

/// Normalized status values that mean the job is finished.
const DONE_STATUSES: &[&str] = &["completed", "complete", "success", "succeeded", "done"];

/// Submits `payload` with the kind's asynchronous submit operation and returns the job id.
///
/// # Errors
///
/// - [`DlError::Configuration`] if the kind is not asynchronous or the reply carries no
///   job identifier anywhere.
/// - [`DlError::Fault`] / [`DlError::Transport`] straight from the transport.
#[tracing::instrument(skip(client, registry, payload), err, fields(kind = %payload.kind()))]
pub async fn submit<C>(
    client: &C,
    registry: &Registry,
    payload: &RequestPayload,
) -> Result<String, DlError>
where
    C: OperationClient + ?Sized,
{
    let kind = payload.kind();
    let Operation::Async { submit, .. } = registry.get(kind)? else {
        return Err(DlError::Configuration(format!(
            "{kind} is not submitted asynchronously"
        )));
    };

    tracing::debug!(operation = %submit, "submitting request");
    let reply = client.invoke(submit, payload.to_value()?, None).await?;

    let id = extract_job_id(&reply).ok_or_else(|| {
        DlError::Configuration(format!("{submit} reply carries no response identifier"))
    })?;
    tracing::debug!(job_id = %id, "request accepted");
    Ok(id)
}

/// Finds the job identifier in a submit reply: exact candidate keys at the top level
/// first, then a bounded depth-first search of the whole envelope.
pub fn extract_job_id<R: Response + ?Sized>(reply: &R) -> Option<String> {
    lookup_text(reply, JOB_ID_KEYS)
        .or_else(|| find_first(reply, JOB_ID_KEYS, SearchLimits::default()))
}

/// One retrieval attempt for `job_id`.
///
/// Returns `Ok(None)` when the reply is not ready yet: a fault, a transport failure, an
/// undecodable body, an empty reply, or an explicit processing status that is not a
/// "done" value.
/// Only configuration problems surface as errors.
///
/// # Errors
///
/// Returns [`DlError::Configuration`] if `kind` has no retrieve operation.
pub async fn retrieve<C>(
    client: &C,
    registry: &Registry,
    kind: RequestKind,
    job_id: &str,
    timeout: Duration,
) -> Result<Option<Envelope>, DlError>
where
    C: OperationClient + ?Sized,
{
    let Operation::Async { retrieve, .. } = registry.get(kind)? else {
        return Err(DlError::Configuration(format!(
            "{kind} has no retrieve operation"
        )));
    };

    let body = json!({ "responseId": job_id });
    match client.invoke(retrieve, body, Some(timeout)).await {
        Ok(reply) if is_empty_reply(&reply) => {
            tracing::debug!(job_id, "empty reply; not ready");
            Ok(None)
        }
        Ok(reply) if is_still_processing(&reply) => {
            tracing::debug!(job_id, "reply reports processing status; not ready");
            Ok(None)
        }
        Ok(reply) => Ok(Some(reply)),
        Err(e @ DlError::Fault { .. }) => {
            tracing::debug!(job_id, error = %e, "retrieve fault; treating as not ready");
            Ok(None)
        }
        Err(e) if e.is_transient() => {
            tracing::warn!(job_id, error = %e, "retrieve failed; will retry");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Runs the kind's synchronous call operation. Failures are not retried.
///
/// # Errors
///
/// - [`DlError::Configuration`] if the kind is not synchronous.
/// - [`DlError::Fault`] / [`DlError::Transport`] straight from the transport.
#[tracing::instrument(skip(client, registry, payload), err, fields(kind = %payload.kind()))]
pub async fn call<C>(
    client: &C,
    registry: &Registry,
    payload: &RequestPayload,
    timeout: Duration,
) -> Result<Envelope, DlError>
where
    C: OperationClient + ?Sized,
{
    let kind = payload.kind();
    let Operation::Sync { call } = registry.get(kind)? else {
        return Err(DlError::Configuration(format!("{kind} is not a synchronous call")));
    };
    tracing::debug!(operation = %call, "calling");
    client.invoke(call, payload.to_value()?, Some(timeout)).await
}

/// A reply whose textual processing status is present and not a "done" value.
/// Numeric statuses are left to the poller's status-code handling.
fn is_still_processing<R: Response + ?Sized>(reply: &R) -> bool {
    let Some(status) = lookup(reply, STATUS_TEXT_KEYS) else {
        return false;
    };
    if status.integer().is_some() || !status.children().is_empty() {
        return false;
    }
    let Some(text) = status.text() else {
        return false;
    };
    let normalized = text.trim().to_ascii_lowercase();
    !DONE_STATUSES.contains(&normalized.as_str())
}
