use crate::core::node::{Response, lookup};

/// Flattens a bulk cell into one bracketed string.
///
/// With a positive `columns` hint the flat value list is split into rows of that
/// width (`[[a,b],[c,d]]`); without one it is a single list (`[a,b,c,d]`). Numbers and
/// booleans are written bare, text is double-quoted with `\` and `"` escaped, and
/// missing values are `null`.
pub fn format_bulk<R: Response + ?Sized>(bulk: &R) -> String {
    let columns = lookup(bulk, &["columns"])
        .and_then(Response::integer)
        .and_then(|c| usize::try_from(c).ok())
        .filter(|c| *c > 0);

    let values: Vec<String> = lookup(bulk, &["data"])
        .map(Response::items)
        .unwrap_or_default()
        .into_iter()
        .map(|entry| match lookup(entry, &["value"]) {
            Some(v) => scalar(v),
            None if entry.children().is_empty() => scalar(entry),
            None => "null".to_string(),
        })
        .collect();

    match columns {
        Some(width) => {
            let rows: Vec<String> = values
                .chunks(width)
                .map(|r| format!("[{}]", r.join(",")))
                .collect();
            format!("[{}]", rows.join(","))
        }
        None => format!("[{}]", values.join(",")),
    }
}

fn scalar<R: Response + ?Sized>(v: &R) -> String {
    if v.is_null() {
        return "null".to_string();
    }
    match (v.text(), v.is_bare_literal()) {
        (Some(t), true) => t,
        (Some(t), false) => format!("\"{}\"", t.replace('\\', "\\\\").replace('"', "\\\"")),
        (None, _) => "null".to_string(),
    }
}
