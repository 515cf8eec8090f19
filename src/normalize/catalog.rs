use crate::core::{
    Row,
    node::{Response, lookup, lookup_text},
};

/// The fixed column set of a fields-catalog row, with the keys tried for each column.
pub const CATALOG_COLUMNS: &[(&str, &[&str])] = &[
    ("field", &["field", "mnemonic", "name", "id"]),
    ("displayName", &["displayName", "label", "description"]),
    ("category", &["category", "dlCategory"]),
    ("datatype", &["datatype", "type"]),
    ("description", &["description", "longDescription"]),
];

/// One fixed five-column row per catalog entry; absent columns are empty strings.
pub fn catalog_rows<R: Response + ?Sized>(reply: &R) -> Vec<Row> {
    let container = lookup(reply, &["fields", "FieldSearchResponse"]).unwrap_or(reply);
    // `{"fields": [...]}` puts the entries directly under the container
    let entries = match lookup(container, &["field", "fields"]) {
        Some(list) => list.items(),
        None if is_sequence(container) => container.items(),
        None => Vec::new(),
    };

    entries
        .into_iter()
        .map(|entry| {
            CATALOG_COLUMNS
                .iter()
                .map(|(column, keys)| (*column, Some(lookup_text(entry, keys).unwrap_or_default())))
                .collect::<Row>()
        })
        .collect()
}

fn is_sequence<R: Response + ?Sized>(node: &R) -> bool {
    let children = node.children();
    !children.is_empty() && children.iter().all(|(name, _)| name.is_none())
}
