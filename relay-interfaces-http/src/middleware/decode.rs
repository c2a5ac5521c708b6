use std::io::Read;

use anyhow::{bail, Result};
use axum::http::HeaderMap;
use flate2::read::GzDecoder;

use relay_domain::StatusEvent;

/// Decodes a webhook body into a status event. Both fields are required strings.
///
/// `max_bytes` caps the decoded size, so a small gzip body cannot expand
/// past the configured body limit.
pub fn parse_status_event(headers: &HeaderMap, body: &[u8], max_bytes: u64) -> Result<StatusEvent> {
    let content = maybe_gunzip(headers, body, max_bytes)?;
    let event: StatusEvent = serde_json::from_str(&content)?;
    Ok(event)
}

fn maybe_gunzip(headers: &HeaderMap, body: &[u8], limit: u64) -> Result<String> {
    let gzip = headers
        .get("Content-Encoding")
        .and_then(|encoding| encoding.to_str().ok())
        .is_some_and(|encoding| encoding == "gzip");
    if !gzip {
        return Ok(String::from_utf8(body.to_vec())?);
    }

    let mut out = String::new();
    GzDecoder::new(body)
        .take(limit.saturating_add(1))
        .read_to_string(&mut out)?;
    if out.len() as u64 > limit {
        bail!("decoded body exceeds {} bytes", limit);
    }
    Ok(out)
}
