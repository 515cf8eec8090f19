use super::{OutputSink, SinkFuture, header_for, unknown_columns};
use crate::core::{DlError, Row};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Keeps everything in memory. Useful for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    texts: HashMap<String, String>,
    tables: HashMap<String, Vec<Row>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The text stored under `key`, if any.
    pub fn text(&self, key: &str) -> Option<String> {
        self.lock().texts.get(key).cloned()
    }

    /// All rows stored under `key` (empty when nothing was written).
    pub fn rows(&self, key: &str) -> Vec<Row> {
        self.lock().tables.get(key).cloned().unwrap_or_default()
    }

    /// Keys of every text written so far, sorted.
    pub fn text_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().texts.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl OutputSink for MemoryStore {
    fn write_text<'a>(&'a self, key: &'a str, text: &'a str) -> SinkFuture<'a> {
        Box::pin(async move {
            self.lock().texts.insert(key.to_string(), text.to_string());
            Ok(())
        })
    }

    fn write_rows<'a>(&'a self, key: &'a str, rows: &'a [Row], append: bool) -> SinkFuture<'a> {
        Box::pin(async move {
            if rows.is_empty() {
                return Ok(());
            }
            let mut inner = self.lock();
            let table = inner.tables.entry(key.to_string()).or_default();
            if append && !table.is_empty() {
                let unknown = unknown_columns(&header_for(table), rows);
                if !unknown.is_empty() {
                    return Err(DlError::ColumnMismatch {
                        key: key.to_string(),
                        columns: unknown,
                    });
                }
                table.extend_from_slice(rows);
            } else {
                *table = rows.to_vec();
            }
            Ok(())
        })
    }
}
