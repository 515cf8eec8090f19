use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::collections::BTreeMap;

/* ----- IDENTIFIERS (shared by batch/, payload/, download/) ----- */

/// A security identifier as read from an inline list or a tabular file.
///
/// Identifiers are immutable once read: there are no setters, only accessors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Identifier {
    id: String,
    #[serde(default)]
    yellow_key: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    extras: BTreeMap<String, String>,
}

impl Identifier {
    /// Creates an identifier with no extra columns.
    pub fn new(
        id: impl Into<String>,
        yellow_key: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            yellow_key: yellow_key.into(),
            kind: kind.into(),
            extras: BTreeMap::new(),
        }
    }

    /// Attaches extra pass-through columns.
    #[must_use]
    pub fn with_extras(mut self, extras: BTreeMap<String, String>) -> Self {
        self.extras = extras;
        self
    }

    /// The identifier value (ticker, ISIN, CUSIP, ...).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The market-sector qualifier ("Equity", "Corp", ...).
    pub fn yellow_key(&self) -> &str {
        &self.yellow_key
    }

    /// The identifier type ("TICKER", "ISIN", ...).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Extra columns carried along from the source.
    pub fn extras(&self) -> &BTreeMap<String, String> {
        &self.extras
    }
}

/// A field override sent alongside a request (`name` is the field mnemonic).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Override {
    pub name: String,
    pub value: String,
}

impl Override {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/* ----- FIELDS ----- */

/// An ordered list of unique field mnemonics. Duplicates are dropped on insertion,
/// keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldList(Vec<String>);

impl FieldList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `field` unless it is already present. Returns whether it was added.
    pub fn push(&mut self, field: impl Into<String>) -> bool {
        let field = field.into();
        if self.0.contains(&field) {
            return false;
        }
        self.0.push(field);
        true
    }

    /// Parses a comma, semicolon or newline separated list, trimming tokens and
    /// skipping blanks.
    pub fn parse(text: &str) -> Self {
        text.split([',', ';', '\n'])
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FieldList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut out = Self::new();
        for f in iter {
            out.push(f);
        }
        out
    }
}

/* ----- BATCHES ----- */

/// An immutable group of identifiers submitted together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch(Vec<Identifier>);

impl Batch {
    pub(crate) fn new(items: Vec<Identifier>) -> Self {
        Self(items)
    }

    pub fn identifiers(&self) -> &[Identifier] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<Identifier> {
        self.0
    }
}

/* ----- ROWS (produced by normalize/, consumed by store/) ----- */

/// One flat output row: an ordered mapping of column name to optional text.
///
/// Keys never repeat; the first write for a key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, Option<String>)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `key` unless it is already present. Returns whether the cell was written.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.cells.push((key, value));
        true
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.cells.iter().any(|(k, _)| k == key)
    }

    /// The cell for `key`: `None` when the column is absent, `Some(None)` for a null cell.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (k, v) in &self.cells {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
