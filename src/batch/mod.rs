//! Splitting identifier streams into request-sized batches.

mod loader;

pub use loader::{CsvColumns, load_fields, load_identifiers};

use crate::core::{Batch, Identifier, RequestKind};
use std::num::NonZeroUsize;

/// How identifiers are grouped into requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// When `false`, the whole input is sent as one request and vendor limits are
    /// the caller's responsibility.
    pub enabled: bool,
    /// Upper bound on identifiers per request.
    pub max_identifiers_per_request: NonZeroUsize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_identifiers_per_request: NonZeroUsize::new(500).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Lazy iterator over fixed-size batches. See [`chunk`].
#[derive(Debug)]
pub struct Chunks<I> {
    inner: I,
    size: NonZeroUsize,
}

impl<I: Iterator<Item = Identifier>> Iterator for Chunks<I> {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        let items: Vec<Identifier> = self.inner.by_ref().take(self.size.get()).collect();
        if items.is_empty() {
            None
        } else {
            Some(Batch::new(items))
        }
    }
}

/// Splits `items` into batches of at most `size` identifiers, preserving order.
/// Only the last batch may be short; an empty input yields no batches.
pub fn chunk<I>(items: I, size: NonZeroUsize) -> Chunks<I::IntoIter>
where
    I: IntoIterator<Item = Identifier>,
{
    Chunks {
        inner: items.into_iter(),
        size,
    }
}

/// Produces the batch sequence a request of `kind` should run over.
///
/// - `FieldsCatalog` ignores identifiers: always one empty batch.
/// - Chunking disabled: the whole input as one batch (none when the input is empty).
/// - Otherwise: [`chunk`] with the configured maximum.
pub fn batches<'a, I>(
    kind: RequestKind,
    items: I,
    cfg: &ChunkingConfig,
) -> Box<dyn Iterator<Item = Batch> + Send + 'a>
where
    I: IntoIterator<Item = Identifier>,
    I::IntoIter: Send + 'a,
{
    if kind == RequestKind::FieldsCatalog {
        return Box::new(std::iter::once(Batch::default()));
    }
    if !cfg.enabled {
        let all: Vec<Identifier> = items.into_iter().collect();
        if all.is_empty() {
            return Box::new(std::iter::empty());
        }
        return Box::new(std::iter::once(Batch::new(all)));
    }
    Box::new(chunk(items, cfg.max_identifiers_per_request))
}
