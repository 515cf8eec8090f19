//! Centralized constants for the default endpoint, UA and timeouts.

use std::time::Duration;

/// Identifies this client to the service.
pub(crate) const USER_AGENT: &str = concat!("dlws-rs/", env!("CARGO_PKG_VERSION"));

/// Default base URL of the data-license web service (operation name is appended).
pub(crate) const DEFAULT_ENDPOINT: &str = "https://dlws.bloomberg.com/dlps/";

/// Default timeout applied to every remote operation.
pub(crate) const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);
