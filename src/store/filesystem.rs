use super::{OutputSink, SinkFuture, header_for, unknown_columns};
use crate::core::{DlError, Row};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Writes text files and CSV tables on the local filesystem; keys are paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemStore;

impl FileSystemStore {
    pub const fn new() -> Self {
        Self
    }
}

impl OutputSink for FileSystemStore {
    fn write_text<'a>(&'a self, key: &'a str, text: &'a str) -> SinkFuture<'a> {
        Box::pin(async move {
            ensure_parent(key).await?;
            tokio::fs::write(key, text).await?;
            Ok(())
        })
    }

    fn write_rows<'a>(&'a self, key: &'a str, rows: &'a [Row], append: bool) -> SinkFuture<'a> {
        Box::pin(write_table(key, rows, append))
    }
}

async fn write_table(key: &str, rows: &[Row], append: bool) -> Result<(), DlError> {
    if rows.is_empty() {
        return Ok(());
    }
    ensure_parent(key).await?;

    let existing = if append {
        read_header(key).await?
    } else {
        None
    };

    let (header, write_header) = match existing {
        Some(header) => {
            let unknown = unknown_columns(&header, rows);
            if !unknown.is_empty() {
                return Err(DlError::ColumnMismatch {
                    key: key.to_string(),
                    columns: unknown,
                });
            }
            (header, false)
        }
        None => (header_for(rows), true),
    };

    let out = encode_table(&header, rows, write_header)?;

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .append(!write_header)
        .truncate(write_header)
        .open(key)
        .await?;
    file.write_all(&out).await?;
    file.flush().await?;
    tracing::debug!(key, rows = rows.len(), append = !write_header, "wrote table");
    Ok(())
}

/// Renders `rows` as CSV records in `header` column order, preceded by the header
/// record itself when `with_header` is set. Missing and null cells are empty.
fn encode_table(header: &[String], rows: &[Row], with_header: bool) -> Result<Vec<u8>, DlError> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    if with_header {
        wtr.write_record(header)?;
    }
    for row in rows {
        wtr.write_record(
            header
                .iter()
                .map(|col| row.get(col).flatten().unwrap_or_default()),
        )?;
    }
    wtr.into_inner().map_err(|e| DlError::Io(e.into_error()))
}

/// The header record of an existing, non-empty table at `key`.
async fn read_header(key: &str) -> Result<Option<Vec<String>>, DlError> {
    let path = PathBuf::from(key);
    tokio::task::spawn_blocking(move || first_record(&path))
        .await
        .map_err(|e| DlError::Io(std::io::Error::other(e)))?
}

fn first_record(path: &Path) -> Result<Option<Vec<String>>, DlError> {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);
    let mut record = csv::StringRecord::new();
    if !rdr.read_record(&mut record)? || record.iter().all(str::is_empty) {
        return Ok(None);
    }
    Ok(Some(record.iter().map(str::to_string).collect()))
}

async fn ensure_parent(key: &str) -> Result<(), DlError> {
    if let Some(parent) = Path::new(key).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}
