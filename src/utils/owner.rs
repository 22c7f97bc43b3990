//! Caller identity extraction from HTTP request headers.

use crate::AppError;
use axum::http::HeaderMap;

/// Header carrying the authenticated caller id, set by the upstream gateway.
pub const OWNER_HEADER: &str = "x-owner-id";

/// Longest owner id accepted from the header.
const MAX_OWNER_LEN: usize = 128;

/// Extracts the caller id from the `X-Owner-Id` header, if present.
///
/// Surrounding whitespace is trimmed and a blank header counts as absent.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the header is not valid UTF-8 or is too long.
pub fn extract_owner_from_headers(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    let Some(value) = headers.get(OWNER_HEADER) else {
        return Ok(None);
    };

    let owner = value
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid X-Owner-Id header", serde_json::json!({})))?
        .trim();

    if owner.is_empty() {
        return Ok(None);
    }

    if owner.len() > MAX_OWNER_LEN {
        return Err(AppError::bad_request(
            "X-Owner-Id header is too long",
            serde_json::json!({ "max_length": MAX_OWNER_LEN }),
        ));
    }

    Ok(Some(owner.to_string()))
}

/// Like [`extract_owner_from_headers`] but the caller must be identified.
///
/// # Errors
///
/// Returns [`AppError::Unauthorized`] when the header is missing or blank.
pub fn require_owner(headers: &HeaderMap) -> Result<String, AppError> {
    extract_owner_from_headers(headers)?.ok_or_else(|| {
        AppError::unauthorized(
            "Unauthorized",
            serde_json::json!({ "reason": "X-Owner-Id header is missing" }),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(OWNER_HEADER, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_extract_owner_present() {
        let owner = extract_owner_from_headers(&headers("user-42")).unwrap();
        assert_eq!(owner.as_deref(), Some("user-42"));
    }

    #[test]
    fn test_extract_owner_trims() {
        let owner = extract_owner_from_headers(&headers("  user-42 ")).unwrap();
        assert_eq!(owner.as_deref(), Some("user-42"));
    }

    #[test]
    fn test_extract_owner_absent_or_blank() {
        assert_eq!(extract_owner_from_headers(&HeaderMap::new()).unwrap(), None);
        assert_eq!(extract_owner_from_headers(&headers("   ")).unwrap(), None);
    }

    #[test]
    fn test_extract_owner_too_long() {
        let mut headers = HeaderMap::new();
        headers.insert(
            OWNER_HEADER,
            HeaderValue::from_str(&"a".repeat(MAX_OWNER_LEN + 1)).unwrap(),
        );

        assert!(matches!(
            extract_owner_from_headers(&headers),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_require_owner_missing() {
        assert!(matches!(
            require_owner(&HeaderMap::new()),
            Err(AppError::Unauthorized { .. })
        ));
    }
}
