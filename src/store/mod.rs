//! Output sinks for raw replies and normalized rows.

mod filesystem;
mod memory;

pub use filesystem::FileSystemStore;
pub use memory::MemoryStore;

use crate::core::{DlError, Row};
use futures::future::BoxFuture;

/// A boxed future returned by [`OutputSink`] implementations.
pub type SinkFuture<'a> = BoxFuture<'a, Result<(), DlError>>;

/// Destination for everything a download produces.
///
/// Writes for one run are issued strictly in order; an implementation shared across
/// concurrent runs must serialize them itself.
pub trait OutputSink: Send + Sync {
    /// Stores `text` under `key`, replacing any previous content.
    fn write_text<'a>(&'a self, key: &'a str, text: &'a str) -> SinkFuture<'a>;

    /// Stores `rows` as a table under `key`, appending to an existing table when
    /// `append` is set. Writing no rows is a no-op.
    fn write_rows<'a>(&'a self, key: &'a str, rows: &'a [Row], append: bool) -> SinkFuture<'a>;
}

/// Picks the sink for an output URI.
///
/// # Errors
///
/// Returns [`DlError::Configuration`] for object-store URIs (`s3://`), which are not
/// supported.
pub fn resolve_store(uri: &str) -> Result<FileSystemStore, DlError> {
    if uri.starts_with("s3://") {
        return Err(DlError::Configuration(format!(
            "object-store output is not supported: {uri}"
        )));
    }
    Ok(FileSystemStore::new())
}

/// The table header for `rows`: every key in first-seen order, the first row's keys first.
pub fn header_for(rows: &[Row]) -> Vec<String> {
    let mut header: Vec<String> = Vec::new();
    for key in rows.iter().flat_map(Row::keys) {
        if !header.iter().any(|h| h == key) {
            header.push(key.to_string());
        }
    }
    header
}

/// Columns used by `rows` that `header` lacks, in first-seen order.
pub(crate) fn unknown_columns(header: &[String], rows: &[Row]) -> Vec<String> {
    header_for(rows)
        .into_iter()
        .filter(|k| !header.contains(k))
        .collect()
}
