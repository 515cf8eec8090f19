use crate::core::{DlError, FieldList, Identifier};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Column mapping for a tabular identifier source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvColumns {
    pub id: String,
    pub yellow_key: String,
    pub kind: String,
    /// Extra columns copied into [`Identifier::extras`] when non-empty.
    pub extras: Vec<String>,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            id: "id".into(),
            yellow_key: "yellow_key".into(),
            kind: "type".into(),
            extras: Vec::new(),
        }
    }
}

/// Reads identifiers from a CSV source with a header row.
///
/// Quoted cells may span lines; records shorter than the header read missing cells
/// as empty.
///
/// # Errors
///
/// Returns [`DlError::Configuration`] if a required column is missing from the header,
/// and [`DlError::Csv`] if the source is not valid CSV or cannot be read.
pub fn load_identifiers<R: Read>(
    reader: R,
    columns: &CsvColumns,
) -> Result<Vec<Identifier>, DlError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let header: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let position = |name: &str| header.iter().position(|h| h == name);
    let (id_at, yk_at, kind_at) = match (
        position(&columns.id),
        position(&columns.yellow_key),
        position(&columns.kind),
    ) {
        (Some(a), Some(b), Some(c)) => (a, b, c),
        _ => {
            let missing: Vec<&str> = [&columns.id, &columns.yellow_key, &columns.kind]
                .into_iter()
                .filter(|c| position(c).is_none())
                .map(String::as_str)
                .collect();
            return Err(DlError::Configuration(format!(
                "missing required identifier columns: {missing:?}"
            )));
        }
    };
    let extra_at: Vec<(&str, usize)> = columns
        .extras
        .iter()
        .filter_map(|c| position(c).map(|i| (c.as_str(), i)))
        .collect();

    let mut out = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let cell = |i: usize| record.get(i).unwrap_or_default().to_string();

        let extras: BTreeMap<String, String> = extra_at
            .iter()
            .filter_map(|(name, i)| {
                let v = cell(*i);
                (!v.is_empty()).then(|| ((*name).to_string(), v))
            })
            .collect();

        out.push(Identifier::new(cell(id_at), cell(yk_at), cell(kind_at)).with_extras(extras));
    }
    Ok(out)
}

/// Reads a field list file (comma, semicolon or newline separated).
///
/// # Errors
///
/// Returns [`DlError::Io`] if the file cannot be read.
pub async fn load_fields(path: impl AsRef<Path>) -> Result<FieldList, DlError> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(FieldList::parse(&raw))
}
