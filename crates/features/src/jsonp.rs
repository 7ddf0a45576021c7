//! JSONP wrapping.

use crate::{Result, TranslateError};
use busproxy_core::validation::is_valid_callback;

/// Wraps `payload` as `callback(payload);`.
///
/// The callback is validated here as well as at the request boundary, so no
/// unchecked name can reach a response body.
///
/// ```
/// let body = busproxy_features::jsonp::wrap("foo", b"{}").unwrap();
/// assert_eq!(body, b"foo({});");
/// ```
pub fn wrap(callback: &str, payload: &[u8]) -> Result<Vec<u8>> {
    if !is_valid_callback(callback) {
        return Err(TranslateError::InvalidCallback(callback.to_string()));
    }

    let mut body = Vec::with_capacity(callback.len() + payload.len() + 3);
    body.extend_from_slice(callback.as_bytes());
    body.push(b'(');
    body.extend_from_slice(payload);
    body.extend_from_slice(b");");
    Ok(body)
}
