use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum DlError {
    /// A request could not be assembled or dispatched as configured
    /// (unknown request kind, missing input columns, unsupported output target, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The remote service explicitly rejected a request.
    #[error("{operation} rejected by remote service{}: {message}", status_suffix(.status))]
    Fault {
        /// The remote operation that raised the fault.
        operation: String,
        /// The HTTP status code, when the fault arrived on a non-2xx reply.
        status: Option<u16>,
        /// The fault string reported by the service (or the raw body when none was given).
        message: String,
    },

    /// A network-level failure (connect, TLS, timeout, truncated body).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The reply body was not in a decodable shape.
    #[error("Data format unexpected: {0}")]
    Data(String),

    /// Polling ran out of attempts before the job became ready.
    #[error("polling gave up after {attempts} attempts (last status: {})", status_label(.last_status))]
    PollExhausted {
        /// How many retrieval attempts were made.
        attempts: u32,
        /// The last status code decoded from a reply, if any.
        last_status: Option<i64>,
    },

    /// The remote service reported a status code that is neither ready nor in progress.
    #[error("job failed with terminal status code {code}")]
    PollTerminal {
        /// The decoded status code.
        code: i64,
    },

    /// Rows carry columns that the existing table header does not have.
    #[error("cannot append to {key}: columns {columns:?} are not in the existing header")]
    ColumnMismatch {
        /// The output key being appended to.
        key: String,
        /// Columns missing from the existing header.
        columns: Vec<String>,
    },

    /// A tabular input or output could not be read or written as CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An I/O error while reading inputs or writing outputs.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DlError {
    /// Whether a failure during the retrieval phase should be folded into "not ready yet".
    ///
    /// Faults, transport failures and undecodable bodies are transient while polling;
    /// everything else is surfaced.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Fault { .. } | Self::Transport(_) | Self::Data(_)
        )
    }
}

fn status_label(code: &Option<i64>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}
