use super::{DATE_COLUMN, IDENTIFIER_COLUMN, cell_value, entry_identifier, instrument_entries};
use crate::core::{
    Row,
    node::{Response, lookup, lookup_text},
};

/// Keys naming the field of an override-bearing field descriptor.
const DESCRIPTOR_NAME_KEYS: &[&str] = &["field", "mnemonic", "name", "id"];

/// One row per instrument entry: `identifier`, `date`, then one column per field in
/// the reply's own field order.
///
/// Values map onto field names by position when there are exactly as many values as
/// declared fields. Otherwise the values are kept under `COL_1`, `COL_2`, ...
pub fn history_rows<R: Response + ?Sized>(reply: &R) -> Vec<Row> {
    let field_names = reply_field_names(reply);

    instrument_entries(reply)
        .into_iter()
        .map(|entry| {
            let mut row = Row::new();
            row.insert(IDENTIFIER_COLUMN, Some(entry_identifier(entry)));
            row.insert(
                DATE_COLUMN,
                Some(lookup(entry, &["date"]).and_then(Response::text).unwrap_or_default()),
            );

            let values: Vec<Option<String>> = lookup(entry, &["data"])
                .map(Response::items)
                .unwrap_or_default()
                .into_iter()
                .map(cell_value)
                .collect();

            if !field_names.is_empty() && values.len() == field_names.len() {
                for (name, value) in field_names.iter().zip(values) {
                    if !name.is_empty() {
                        row.insert(name.as_str(), value);
                    }
                }
            } else {
                for (i, value) in values.into_iter().enumerate() {
                    row.insert(format!("COL_{}", i + 1), value);
                }
            }
            row
        })
        .collect()
}

/// The reply's ordered field names: the plain name list, or failing that the names
/// of the override-bearing field descriptors.
fn reply_field_names<R: Response + ?Sized>(reply: &R) -> Vec<String> {
    let Some(fields) = lookup(reply, &["fields"]) else {
        return Vec::new();
    };

    let plain: Vec<String> = lookup(fields, &["field"])
        .map(Response::items)
        .unwrap_or_default()
        .into_iter()
        .filter_map(Response::text)
        .collect();
    if !plain.is_empty() {
        return plain;
    }

    lookup(fields, &["fieldWithOverrides"])
        .map(Response::items)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|d| lookup_text(d, DESCRIPTOR_NAME_KEYS))
        .collect()
}
