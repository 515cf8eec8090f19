//! Request kinds and the fixed kind → remote operation table.

use crate::core::DlError;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The kinds of request this crate knows how to build, dispatch and normalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Historical time series per instrument and field.
    History,
    /// Point-in-time reference data per instrument and field.
    Data,
    /// Field metadata search (synchronous; ignores identifiers).
    FieldsCatalog,
}

impl RequestKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::History => "history",
            Self::Data => "data",
            Self::FieldsCatalog => "fields_catalog",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = DlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "history" => Ok(Self::History),
            "data" => Ok(Self::Data),
            "fields_catalog" | "fundamentals_headers" => Ok(Self::FieldsCatalog),
            other => Err(DlError::Configuration(format!(
                "unsupported request kind: {other:?}"
            ))),
        }
    }
}

/// How a request kind is dispatched remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Submit a job, then poll a second operation for its reply.
    Async { submit: String, retrieve: String },
    /// A single blocking call.
    Sync { call: String },
}

impl Operation {
    pub const fn is_async(&self) -> bool {
        matches!(self, Self::Async { .. })
    }
}

/// Immutable kind → operation table. Build once, pass by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    ops: HashMap<RequestKind, Operation>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut ops = HashMap::new();
        ops.insert(
            RequestKind::History,
            Operation::Async {
                submit: "submitGetHistoryRequest".into(),
                retrieve: "retrieveGetHistoryResponse".into(),
            },
        );
        ops.insert(
            RequestKind::Data,
            Operation::Async {
                submit: "submitGetDataRequest".into(),
                retrieve: "retrieveGetDataResponse".into(),
            },
        );
        ops.insert(
            RequestKind::FieldsCatalog,
            Operation::Sync {
                call: "getFields".into(),
            },
        );
        Self { ops }
    }
}

impl Registry {
    /// A table with no operations; populate it with [`Registry::with_operation`].
    pub fn empty() -> Self {
        Self {
            ops: HashMap::new(),
        }
    }

    /// Returns a copy of the table with `kind` mapped to `op`.
    #[must_use]
    pub fn with_operation(mut self, kind: RequestKind, op: Operation) -> Self {
        self.ops.insert(kind, op);
        self
    }

    /// Looks up the operation for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`DlError::Configuration`] if the table has no entry for `kind`.
    pub fn get(&self, kind: RequestKind) -> Result<&Operation, DlError> {
        self.ops.get(&kind).ok_or_else(|| {
            DlError::Configuration(format!("no remote operation registered for {kind}"))
        })
    }
}
