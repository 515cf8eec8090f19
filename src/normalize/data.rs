use super::{IDENTIFIER_COLUMN, bulk::format_bulk, cell_value, entry_identifier, instrument_entries};
use crate::core::{
    Row,
    node::{Response, lookup, lookup_text},
};

/// One row per instrument entry: `identifier`, then one column per named data cell in
/// first-seen order. Bulk cells are flattened into a single string cell; nameless
/// cells are skipped and repeated field names keep their first value.
pub fn data_rows<R: Response + ?Sized>(reply: &R) -> Vec<Row> {
    instrument_entries(reply)
        .into_iter()
        .map(|entry| {
            let mut row = Row::new();
            row.insert(IDENTIFIER_COLUMN, Some(entry_identifier(entry)));

            let cells = lookup(entry, &["data"])
                .map(Response::items)
                .unwrap_or_default();
            for cell in cells {
                let Some(field) = lookup_text(cell, &["field"]) else {
                    continue;
                };
                let value = match lookup(cell, &["bulkarray"]) {
                    Some(bulk) => Some(format_bulk(bulk)),
                    None => cell_value(cell),
                };
                row.insert(field, value);
            }
            row
        })
        .collect()
}
