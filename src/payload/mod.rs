//! Pure construction of wire request bodies.

mod wire;

pub use wire::{
    FieldSearchRequest, FieldsNode, InstrumentNode, InstrumentRequest, InstrumentsNode,
    OverrideNode, OverridesNode,
};

use crate::core::{DlError, Identifier, Override, RequestKind};
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Category filter applied to every fields-catalog search unless overridden.
pub const DEFAULT_CATALOG_CATEGORY: &str = "Fundamentals";

/// A request body, one variant per [`RequestKind`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestPayload {
    History(InstrumentRequest),
    Data(InstrumentRequest),
    FieldsCatalog(FieldSearchRequest),
}

impl RequestPayload {
    pub const fn kind(&self) -> RequestKind {
        match self {
            Self::History(_) => RequestKind::History,
            Self::Data(_) => RequestKind::Data,
            Self::FieldsCatalog(_) => RequestKind::FieldsCatalog,
        }
    }

    /// Renders the body as sent on the wire.
    ///
    /// # Errors
    ///
    /// Returns [`DlError::Data`] if serialization fails.
    pub fn to_value(&self) -> Result<Value, DlError> {
        serde_json::to_value(self).map_err(|e| DlError::Data(format!("payload encode: {e}")))
    }
}

/// Builds the request body for one batch.
///
/// - `History`/`Data`: `headers` is emitted only when `params` is non-empty and
///   `overrides` only when there are overrides; identifiers become instruments.
/// - `FieldsCatalog`: criteria are the default category filter merged with (and
///   overridden by) `params`; identifiers and overrides are ignored.
pub fn build_payload(
    kind: RequestKind,
    fields: &[String],
    batch: &[Identifier],
    overrides: &[Override],
    params: &Map<String, Value>,
) -> RequestPayload {
    match kind {
        RequestKind::History => {
            RequestPayload::History(instrument_request(fields, batch, overrides, params))
        }
        RequestKind::Data => {
            RequestPayload::Data(instrument_request(fields, batch, overrides, params))
        }
        RequestKind::FieldsCatalog => {
            let mut criteria = Map::new();
            criteria.insert("dlCategories".into(), json!([DEFAULT_CATALOG_CATEGORY]));
            for (k, v) in params {
                criteria.insert(k.clone(), v.clone());
            }
            RequestPayload::FieldsCatalog(FieldSearchRequest { criteria })
        }
    }
}

/// Like [`build_payload`], but takes the request kind by name.
///
/// # Errors
///
/// Returns [`DlError::Configuration`] if `kind` is not a recognized request kind.
pub fn build_payload_for(
    kind: &str,
    fields: &[String],
    batch: &[Identifier],
    overrides: &[Override],
    params: &Map<String, Value>,
) -> Result<RequestPayload, DlError> {
    let kind: RequestKind = kind.parse()?;
    Ok(build_payload(kind, fields, batch, overrides, params))
}

fn instrument_request(
    fields: &[String],
    batch: &[Identifier],
    overrides: &[Override],
    params: &Map<String, Value>,
) -> InstrumentRequest {
    InstrumentRequest {
        headers: (!params.is_empty()).then(|| params.clone()),
        fields: FieldsNode {
            field: fields.to_vec(),
        },
        instruments: InstrumentsNode {
            instrument: batch
                .iter()
                .map(|i| InstrumentNode {
                    id: i.id().to_string(),
                    yellowkey: i.yellow_key().to_string(),
                    kind: i.kind().to_string(),
                })
                .collect(),
        },
        overrides: (!overrides.is_empty()).then(|| OverridesNode {
            entries: overrides
                .iter()
                .map(|o| OverrideNode {
                    field: o.name.clone(),
                    value: o.value.clone(),
                })
                .collect(),
        }),
    }
}

/// Search criteria for a fields-catalog lookup built from filter lists.
///
/// Empty lists are omitted; keywords are joined into a single search phrase.
pub fn field_search_criteria(
    categories: &[String],
    sectors: &[String],
    keywords: &[String],
) -> Map<String, Value> {
    let mut crit = Map::new();
    if !categories.is_empty() {
        crit.insert("dlCategories".into(), json!(categories));
    }
    if !sectors.is_empty() {
        crit.insert("marketsectors".into(), json!(sectors));
    }
    if !keywords.is_empty() {
        crit.insert("keyword".into(), Value::String(keywords.join(" ")));
    }
    crit
}
