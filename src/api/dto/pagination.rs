//! Pagination query parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse numbers from query strings.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<u32>,
}

impl PaginationParams {
    /// Applies defaults and checks bounds.
    ///
    /// `page` defaults to 1 and must be at least 1. `limit` defaults to 10 and must be
    /// between 1 and 100.
    ///
    /// # Returns
    ///
    /// `(page, limit)` tuple.
    pub fn validate_and_get_page_limit(&self) -> Result<(u32, u32), String> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);

        if page == 0 {
            return Err("Page must be greater than 0".to_string());
        }

        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(format!("Limit must be between 1 and {}", MAX_LIMIT));
        }

        Ok((page, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<u32>, limit: Option<u32>) -> PaginationParams {
        PaginationParams { page, limit }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(params(None, None).validate_and_get_page_limit(), Ok((1, 10)));
    }

    #[test]
    fn test_custom_page_and_limit() {
        assert_eq!(
            params(Some(3), Some(50)).validate_and_get_page_limit(),
            Ok((3, 50))
        );
    }

    #[test]
    fn test_page_zero_is_error() {
        assert!(params(Some(0), None).validate_and_get_page_limit().is_err());
    }

    #[test]
    fn test_limit_bounds() {
        assert!(params(None, Some(0)).validate_and_get_page_limit().is_err());
        assert!(params(None, Some(1)).validate_and_get_page_limit().is_ok());
        assert!(params(None, Some(100)).validate_and_get_page_limit().is_ok());
        assert!(params(None, Some(101)).validate_and_get_page_limit().is_err());
    }

    #[test]
    fn test_parses_query_strings() {
        let p: PaginationParams = serde_json::from_str(r#"{"page": "2", "limit": "25"}"#).unwrap();
        assert_eq!(p.page, Some(2));
        assert_eq!(p.limit, Some(25));

        assert!(serde_json::from_str::<PaginationParams>(r#"{"page": "two"}"#).is_err());
    }
}
