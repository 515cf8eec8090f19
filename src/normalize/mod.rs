//! Turning reply envelopes into flat rows.
//!
//! Every reader goes through [`lookup`](crate::core::node::lookup), so a value is
//! found whether it arrives as an attribute or as a child element, at the top level
//! or inside a nested container. Missing or empty replies produce no rows.

mod bulk;
mod catalog;
mod data;
mod history;

pub use bulk::format_bulk;
pub use catalog::{CATALOG_COLUMNS, catalog_rows};
pub use data::data_rows;
pub use history::history_rows;

use crate::core::{
    RequestKind, Row,
    node::{Response, lookup, lookup_text},
};

/// Column holding the resolved instrument identifier.
pub const IDENTIFIER_COLUMN: &str = "identifier";
/// Column holding the observation date of a history row.
pub const DATE_COLUMN: &str = "date";

/// Keys tried, in order, on a nested instrument descriptor.
const INSTRUMENT_ID_KEYS: &[&str] = &["id", "security", "ticker", "code"];

/// Normalizes `reply` with the strategy for `kind`.
pub fn to_rows<R: Response + ?Sized>(kind: RequestKind, reply: &R) -> Vec<Row> {
    match kind {
        RequestKind::History => history_rows(reply),
        RequestKind::Data => data_rows(reply),
        RequestKind::FieldsCatalog => catalog_rows(reply),
    }
}

/// The per-instrument entries of a history or data reply.
fn instrument_entries<R: Response + ?Sized>(reply: &R) -> Vec<&R> {
    let container = lookup(reply, &["instrumentDatas"]).unwrap_or(reply);
    lookup(container, &["instrumentData"])
        .map(Response::items)
        .unwrap_or_default()
}

/// The identifier of an instrument entry: its nested descriptor first, then its own code.
fn entry_identifier<R: Response + ?Sized>(entry: &R) -> String {
    lookup(entry, &["instrument"])
        .and_then(|inst| lookup_text(inst, INSTRUMENT_ID_KEYS))
        .or_else(|| lookup_text(entry, &["code"]))
        .unwrap_or_default()
}

/// The value carried by a cell: its `value` attribute/element, or the node itself when
/// it is a bare scalar.
fn cell_value<R: Response + ?Sized>(cell: &R) -> Option<String> {
    match lookup(cell, &["value"]) {
        Some(v) => v.text(),
        None if cell.children().is_empty() => cell.text(),
        None => None,
    }
}
