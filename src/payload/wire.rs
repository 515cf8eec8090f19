use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Map<String, Value>>,
    pub fields: FieldsNode,
    pub instruments: InstrumentsNode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<OverridesNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldsNode {
    pub field: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstrumentsNode {
    pub instrument: Vec<InstrumentNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstrumentNode {
    pub id: String,
    // lowercase on the wire
    pub yellowkey: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverridesNode {
    #[serde(rename = "override")]
    pub entries: Vec<OverrideNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideNode {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSearchRequest {
    pub criteria: Map<String, Value>,
}
