//! Scan input resolution
//!
//! Turns whatever the QR decoder (or the page URL) hands us into a raw card
//! id. Range checking is left to the engine.

use thiserror::Error;

use crate::sim::ScanError;

/// Query parameter carrying the card id
const ID_PARAM: &str = "id";

/// The camera or QR decoder failed; no detail is kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Error)]
#[error("could not read the QR code")]
pub struct ScanSourceError;

fn parse_id(text: &str) -> Result<i64, ScanError> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| ScanError::InvalidId(text.to_string()))
}

/// Look up `id=` in a query string (leading `?` optional, fragment ignored)
///
/// Returns `None` when there is no `id` parameter at all.
pub fn id_from_query(query: &str) -> Option<Result<i64, ScanError>> {
    let query = query.split('#').next().unwrap_or_default();
    let query = query.strip_prefix('?').unwrap_or(query);

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| *key == ID_PARAM)
        .map(|(_, value)| parse_id(value))
}

/// Resolve a decoded QR payload: a bare integer, or a URL whose query has `id`
pub fn resolve_payload(payload: &str) -> Result<i64, ScanError> {
    let trimmed = payload.trim();
    if let Ok(id) = trimmed.parse::<i64>() {
        return Ok(id);
    }

    let query = match trimmed.split_once('?') {
        Some((_, query)) => query,
        None if trimmed.contains('=') => trimmed,
        None => return Err(ScanError::InvalidId(payload.to_string())),
    };

    match id_from_query(query) {
        Some(Ok(id)) => Ok(id),
        _ => Err(ScanError::InvalidId(payload.to_string())),
    }
}
