use crate::{
    core::{DlClient, DlError, Operation, OperationClient, Registry, RequestKind, Row},
    normalize::catalog_rows,
    payload::field_search_criteria,
};
use serde_json::{Value, json};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A builder for searching the vendor's field catalog (mnemonics and metadata).
///
/// Unlike a `fields_catalog` download, no default category filter is applied: with
/// no filters set the search is sent without criteria.
pub struct FieldSearchBuilder<'a, C: OperationClient + ?Sized = DlClient> {
    client: &'a C,
    registry: Registry,
    categories: Vec<String>,
    sectors: Vec<String>,
    keywords: Vec<String>,
    timeout: Duration,
}

impl<'a, C: OperationClient + ?Sized> FieldSearchBuilder<'a, C> {
    /// Creates a new `FieldSearchBuilder` with no filters.
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            registry: Registry::default(),
            categories: Vec::new(),
            sectors: Vec::new(),
            keywords: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Uses a custom kind → operation table.
    #[must_use]
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Adds a data-license category filter (repeatable).
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Adds a market sector filter (repeatable).
    #[must_use]
    pub fn sector(mut self, sector: impl Into<String>) -> Self {
        self.sectors.push(sector.into());
        self
    }

    /// Adds a keyword; keywords are joined into one search phrase.
    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    /// Sets the timeout of the catalog call. Default: 30 seconds.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs the search and returns one five-column row per field.
    ///
    /// # Errors
    ///
    /// Returns [`DlError::Configuration`] if the registry has no synchronous catalog
    /// operation, or the transport's fault/transport error unchanged.
    #[tracing::instrument(skip(self), err)]
    pub async fn fetch(self) -> Result<Vec<Row>, DlError> {
        let Operation::Sync { call } = self.registry.get(RequestKind::FieldsCatalog)? else {
            return Err(DlError::Configuration(
                "fields catalog is not a synchronous call".into(),
            ));
        };

        let criteria = field_search_criteria(&self.categories, &self.sectors, &self.keywords);
        let body = if criteria.is_empty() {
            Value::Object(serde_json::Map::new())
        } else {
            json!({ "criteria": criteria })
        };

        let reply = self.client.invoke(call, body, Some(self.timeout)).await?;
        let rows = catalog_rows(&reply);
        tracing::info!(fields = rows.len(), "field search complete");
        Ok(rows)
    }
}
