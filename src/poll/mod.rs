//! Polling an asynchronous job until its reply is ready.
//!
//! Each attempt either yields an envelope or nothing. An envelope's integer status
//! code decides the outcome:
//!
//! | code              | outcome                                   |
//! |-------------------|-------------------------------------------|
//! | none decodable    | ready (see [`status_code`])               |
//! | `0`               | ready                                     |
//! | `100`, `300`      | still processing: sleep, try again        |
//! | anything else     | [`DlError::PollTerminal`], no more tries  |
//!
//! No envelope (not ready, fault, transport failure, an empty reply) also sleeps
//! and tries again.
//! After the last attempt the poller fails with [`DlError::PollExhausted`] without a
//! trailing sleep.

use crate::core::{DlError, Envelope, PollConfig, node::{Response, path}};
use serde_json::Value;
use std::future::Future;

/// Status code meaning the reply is complete.
pub const STATUS_SUCCESS: i64 = 0;
/// Status codes meaning the job is still being processed.
pub const STATUS_IN_PROGRESS: &[i64] = &[100, 300];

/// Candidate locations of the status code, tried in order.
const STATUS_PATHS: &[&[&str]] = &[
    &["statusCode"],
    &["status"],
    &["processingStatus"],
    &["statusCode", "code"],
    &["status", "code"],
    &["status", "statusCode"],
    &["header", "statusCode"],
    &["headers", "statusCode"],
    &["responseHeader", "statusCode"],
];

/// Where one attempt left the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// The reply is complete.
    Ready,
    /// No reply yet, or the service reports it is still working.
    Continue,
    /// The service reported a status code outside the known set.
    Terminal(i64),
}

/// Classifies a decoded status code.
pub fn classify(code: Option<i64>) -> PollState {
    match code {
        // No code at all is taken as success. This is a heuristic that has not been
        // confirmed against live traffic.
        None => PollState::Ready,
        Some(STATUS_SUCCESS) => PollState::Ready,
        Some(c) if STATUS_IN_PROGRESS.contains(&c) => PollState::Continue,
        Some(c) => PollState::Terminal(c),
    }
}

/// Decodes the integer status code of a reply: the envelope itself when it is an
/// integer, otherwise the first candidate path that resolves to one.
pub fn status_code<R: Response + ?Sized>(reply: &R) -> Option<i64> {
    reply.integer().or_else(|| {
        STATUS_PATHS
            .iter()
            .find_map(|steps| path(reply, steps).and_then(Response::integer))
    })
}

/// Whether a reply carries nothing at all: `null`, `{}` or `[]`.
///
/// Such a reply is never a finished job; it is handled like a missing one.
pub fn is_empty_reply(reply: &Envelope) -> bool {
    match reply {
        Value::Null => true,
        Value::Object(obj) => obj.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Drives retrieval attempts according to a [`PollConfig`].
#[derive(Debug, Clone, Default)]
pub struct Poller {
    cfg: PollConfig,
}

impl Poller {
    pub fn new(cfg: PollConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &PollConfig {
        &self.cfg
    }

    /// Calls `fetch` until a ready reply arrives, a terminal status is seen, or the
    /// attempts run out.
    ///
    /// `fetch` returning `Ok(None)` or a transient error counts as "not ready".
    ///
    /// # Errors
    ///
    /// - [`DlError::PollTerminal`] on an unknown status code.
    /// - [`DlError::PollExhausted`] when every attempt came back not ready.
    /// - Any non-transient error returned by `fetch`, unchanged.
    pub async fn poll<F, Fut>(&self, mut fetch: F) -> Result<Envelope, DlError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<Envelope>, DlError>>,
    {
        let attempts = self.cfg.attempts.get();
        let mut last_status: Option<i64> = None;

        for attempt in 1..=attempts {
            let reply = match fetch().await {
                Ok(reply) => reply,
                Err(e) if e.is_transient() => {
                    tracing::debug!(attempt, error = %e, "poll attempt failed");
                    None
                }
                Err(e) => return Err(e),
            };

            if let Some(reply) = reply.filter(|r| !is_empty_reply(r)) {
                let code = status_code(&reply);
                if code.is_some() {
                    last_status = code;
                }
                match classify(code) {
                    PollState::Ready => {
                        tracing::debug!(attempt, ?code, "reply ready");
                        return Ok(reply);
                    }
                    PollState::Terminal(code) => {
                        tracing::warn!(attempt, code, "job reported terminal status");
                        return Err(DlError::PollTerminal { code });
                    }
                    PollState::Continue => {
                        tracing::debug!(attempt, ?code, "job still processing");
                    }
                }
            } else {
                tracing::debug!(attempt, "no reply yet");
            }

            if attempt < attempts {
                tokio::time::sleep(self.cfg.interval).await;
            }
        }

        Err(DlError::PollExhausted {
            attempts,
            last_status,
        })
    }
}
