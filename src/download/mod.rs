//! The batch pipeline: chunk identifiers, build one payload per batch, submit and poll
//! (or call), normalize the reply and hand the rows to an output sink.

mod model;

pub use model::DownloadReport;

use crate::{
    batch::{ChunkingConfig, batches},
    core::{
        DlClient, DlError, FieldList, Identifier, OperationClient, Override, PollConfig,
        Registry, RequestKind,
    },
    normalize::to_rows,
    payload::build_payload,
    poll::Poller,
    request,
    store::OutputSink,
};
use serde_json::{Map, Value};

/// A builder for running one request kind over a list of identifiers.
///
/// Batches run strictly one after another: at most one asynchronous job is in flight,
/// and rows are written to the sink before the next batch is submitted. The first
/// batch that fails aborts the run; earlier batches stay written.
///
/// # Example
///
/// ```no_run
/// # use dlws_rs::{DlClient, DownloadBuilder, FileSystemStore, Identifier, RequestKind};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DlClient::builder().build()?;
/// let report = DownloadBuilder::new(&client, RequestKind::Data)
///     .fields(["PX_LAST", "NAME"])
///     .identifiers([Identifier::new("IBM US", "Equity", "TICKER")])
///     .run(&FileSystemStore::new(), "out/data.csv")
///     .await?;
/// println!("{} rows in {} batches", report.rows_written, report.batches);
/// # Ok(())
/// # }
/// ```
pub struct DownloadBuilder<'a, C: OperationClient + ?Sized = DlClient> {
    client: &'a C,
    kind: RequestKind,
    registry: Registry,
    fields: FieldList,
    identifiers: Vec<Identifier>,
    overrides: Vec<Override>,
    params: Map<String, Value>,
    chunking: ChunkingConfig,
    polling: PollConfig,
    dry_run: bool,
    include_raw: bool,
    append: bool,
}

impl<'a, C: OperationClient + ?Sized> DownloadBuilder<'a, C> {
    /// Creates a new `DownloadBuilder` for `kind` with default chunking and polling.
    pub fn new(client: &'a C, kind: RequestKind) -> Self {
        Self {
            client,
            kind,
            registry: Registry::default(),
            fields: FieldList::new(),
            identifiers: Vec::new(),
            overrides: Vec::new(),
            params: Map::new(),
            chunking: ChunkingConfig::default(),
            polling: PollConfig::default(),
            dry_run: false,
            include_raw: false,
            append: false,
        }
    }

    /// Uses a custom kind → operation table.
    #[must_use]
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Adds fields to request; repeated names are dropped.
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for f in fields {
            self.fields.push(f);
        }
        self
    }

    /// Adds identifiers to request, in order.
    #[must_use]
    pub fn identifiers(mut self, ids: impl IntoIterator<Item = Identifier>) -> Self {
        self.identifiers.extend(ids);
        self
    }

    /// Adds field overrides sent with every batch.
    #[must_use]
    pub fn overrides(mut self, overrides: impl IntoIterator<Item = Override>) -> Self {
        self.overrides.extend(overrides);
        self
    }

    /// Sets request headers (`history`/`data`) or catalog criteria (`fields_catalog`).
    #[must_use]
    pub fn params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn chunking(mut self, cfg: ChunkingConfig) -> Self {
        self.chunking = cfg;
        self
    }

    #[must_use]
    pub fn polling(mut self, cfg: PollConfig) -> Self {
        self.polling = cfg;
        self
    }

    /// Builds payloads without contacting the service. Each payload is logged and
    /// returned in [`DownloadReport::dry_run_payloads`]; nothing is written.
    #[must_use]
    pub const fn dry_run(mut self, yes: bool) -> Self {
        self.dry_run = yes;
        self
    }

    /// Also writes each raw reply as text under `{key}.chunk{n}.json`.
    #[must_use]
    pub const fn include_raw(mut self, yes: bool) -> Self {
        self.include_raw = yes;
        self
    }

    /// Appends the first batch's rows to an existing table instead of replacing it.
    /// Later batches always append.
    #[must_use]
    pub const fn append(mut self, yes: bool) -> Self {
        self.append = yes;
        self
    }

    /// Runs every batch and writes its rows to `sink` under `key`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a batch: configuration problems, submit or
    /// call failures, [`DlError::PollTerminal`] / [`DlError::PollExhausted`], or a
    /// sink error.
    #[tracing::instrument(skip(self, sink), err, fields(kind = %self.kind))]
    pub async fn run<S>(self, sink: &S, key: &str) -> Result<DownloadReport, DlError>
    where
        S: OutputSink + ?Sized,
    {
        let Self {
            client,
            kind,
            registry,
            fields,
            identifiers,
            overrides,
            params,
            chunking,
            polling,
            dry_run,
            include_raw,
            mut append,
        } = self;

        let mut report = DownloadReport::started(kind, dry_run);
        let asynchronous = registry.get(kind)?.is_async();
        let timeout = polling.per_attempt_timeout;
        let poller = Poller::new(polling);

        for (idx, batch) in (1usize..).zip(batches(kind, identifiers, &chunking)) {
            let payload = build_payload(
                kind,
                fields.as_slice(),
                batch.identifiers(),
                &overrides,
                &params,
            );

            if dry_run {
                let body = serde_json::to_string_pretty(&payload)
                    .map_err(|e| DlError::Data(format!("payload encode: {e}")))?;
                tracing::info!(chunk = idx, "dry run payload:\n{body}");
                report.dry_run_payloads.push(body);
                report.batches += 1;
                continue;
            }

            tracing::info!(chunk = idx, identifiers = batch.len(), "processing batch");
            let reply = if asynchronous {
                let job_id = request::submit(client, &registry, &payload).await?;
                tracing::debug!(
                    chunk = idx,
                    %job_id,
                    max_wait = ?poller.config().max_wait(),
                    "polling"
                );
                poller
                    .poll(|| request::retrieve(client, &registry, kind, &job_id, timeout))
                    .await?
            } else {
                request::call(client, &registry, &payload, timeout).await?
            };

            if include_raw {
                let raw = serde_json::to_string_pretty(&reply)
                    .map_err(|e| DlError::Data(format!("reply encode: {e}")))?;
                sink.write_text(&format!("{key}.chunk{idx}.json"), &raw).await?;
            }

            let rows = to_rows(kind, &reply);
            sink.write_rows(key, &rows, append).await?;
            if !rows.is_empty() {
                append = true;
            }
            tracing::info!(chunk = idx, rows = rows.len(), "batch written");
            report.batches += 1;
            report.rows_written += rows.len();
        }

        report.finish();
        Ok(report)
    }
}
