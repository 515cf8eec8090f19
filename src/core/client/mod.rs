//! Public client surface + builder.
//! Defaults live in `constants`; polling knobs in `retry`.

mod constants;
pub(crate) mod retry;

use crate::core::{DlError, net, services::{OperationClient, OperationFuture}};
use constants::{DEFAULT_ENDPOINT, DEFAULT_OPERATION_TIMEOUT, USER_AGENT};
use reqwest::{Client, Identity};
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub use retry::PollConfig;

/// Holds one configured HTTP session (connection pool + client identity) and the
/// service endpoint. Cloning is cheap and shares the session.
#[derive(Debug, Clone)]
pub struct DlClient {
    http: Client,
    endpoint: Url,
}

impl DlClient {
    /// Create a new builder.
    pub fn builder() -> DlClientBuilder {
        DlClientBuilder::default()
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// The service base URL; operation names are joined onto it.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub(crate) fn operation_url(&self, operation: &str) -> Result<Url, DlError> {
        Ok(self.endpoint.join(operation)?)
    }
}

impl OperationClient for DlClient {
    fn invoke<'a>(
        &'a self,
        operation: &'a str,
        body: Value,
        timeout: Option<Duration>,
    ) -> OperationFuture<'a> {
        Box::pin(net::post_operation(self, operation, body, timeout))
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct DlClientBuilder {
    user_agent: Option<String>,
    endpoint: Option<Url>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    identity: Option<Identity>,
}

impl DlClientBuilder {
    /// Override the User-Agent.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the service base URL. A trailing `/` is added when missing so that
    /// operation names join underneath it.
    #[must_use]
    pub fn endpoint(mut self, url: Url) -> Self {
        self.endpoint = Some(url);
        self
    }

    /// Set the default per-operation timeout. Default: 30 seconds.
    #[must_use]
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    #[must_use]
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Present a TLS client certificate on every connection.
    #[must_use]
    pub fn identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Convenience for [`identity`](Self::identity) from a PEM bundle holding the
    /// private key and certificate chain.
    ///
    /// # Errors
    ///
    /// Returns [`DlError::Transport`] if the PEM bundle cannot be parsed.
    pub fn identity_pem(self, pem: &[u8]) -> Result<Self, DlError> {
        let identity = Identity::from_pem(pem)?;
        Ok(self.identity(identity))
    }

    /// Builds the client. The HTTP session is created once here and reused by every call.
    ///
    /// # Errors
    ///
    /// Returns an error if the default endpoint cannot be parsed or the HTTP client
    /// cannot be built.
    pub fn build(self) -> Result<DlClient, DlError> {
        let mut endpoint = match self.endpoint {
            Some(u) => u,
            None => Url::parse(DEFAULT_ENDPOINT)?,
        };
        if !endpoint.path().ends_with('/') {
            let p = format!("{}/", endpoint.path());
            endpoint.set_path(&p);
        }

        let mut httpb = reqwest::Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT))
            .timeout(self.timeout.unwrap_or(DEFAULT_OPERATION_TIMEOUT));

        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }
        if let Some(id) = self.identity {
            httpb = httpb.identity(id);
        }

        let http = httpb.build()?;

        Ok(DlClient { http, endpoint })
    }
}
