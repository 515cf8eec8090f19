use crate::core::{DlClient, DlError, node::{Response, lookup, lookup_text}};
use serde_json::Value;
use std::time::Duration;

/// Longest raw body excerpt carried into a fault message.
const FAULT_EXCERPT: usize = 256;

/// POST `body` as JSON to `{endpoint}/{operation}` and decode the reply envelope.
///
/// Non-2xx replies and 2xx replies carrying a fault element become [`DlError::Fault`];
/// network failures surface as [`DlError::Transport`].
pub(crate) async fn post_operation(
    client: &DlClient,
    operation: &str,
    body: Value,
    timeout: Option<Duration>,
) -> Result<Value, DlError> {
    let url = client.operation_url(operation)?;
    let mut req = client.http().post(url.clone()).json(&body);
    if let Some(t) = timeout {
        req = req.timeout(t);
    }

    tracing::trace!(%url, "invoking remote operation");
    let resp = req.send().await?;
    let status = resp.status();
    let text = resp.text().await?;

    let parsed: Option<Value> = if text.trim().is_empty() {
        Some(Value::Null)
    } else {
        serde_json::from_str(&text).ok()
    };

    if !status.is_success() {
        let message = parsed
            .as_ref()
            .and_then(fault_message)
            .unwrap_or_else(|| excerpt(&text));
        return Err(DlError::Fault {
            operation: operation.to_string(),
            status: Some(status.as_u16()),
            message,
        });
    }

    let envelope = parsed
        .ok_or_else(|| DlError::Data(format!("{operation}: reply is not valid JSON")))?;

    if let Some(message) = fault_message(&envelope) {
        return Err(DlError::Fault {
            operation: operation.to_string(),
            status: None,
            message,
        });
    }

    Ok(envelope)
}

/// Extracts the fault string when `envelope` carries a fault element.
fn fault_message(envelope: &Value) -> Option<String> {
    let fault = lookup(envelope, &["fault", "Fault"])?;
    let message = lookup_text(fault, &["faultstring", "faultString", "message", "reason"])
        .or_else(|| fault.text())
        .unwrap_or_else(|| "unspecified fault".to_string());
    Some(message)
}

fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "empty reply body".to_string();
    }
    match trimmed.char_indices().nth(FAULT_EXCERPT) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
