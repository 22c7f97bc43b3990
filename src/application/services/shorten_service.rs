//! Short URL creation service.

use std::sync::Arc;

use serde_json::json;
use tracing::{error, info};
use url::Url;

use crate::domain::codec;
use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::repositories::{SequenceRepository, ShortUrlRepository};
use crate::error::AppError;

/// Checks that `raw` is an absolute `http` or `https` URL with a host.
///
/// # Errors
///
/// Returns [`AppError::Validation`] describing why the URL was rejected.
pub fn validate_target_url(raw: &str) -> Result<(), AppError> {
    let parsed = Url::parse(raw).map_err(|e| {
        AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::bad_request(
            "Only http and https URLs can be shortened",
            json!({ "scheme": parsed.scheme() }),
        ));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(AppError::bad_request(
            "URL must include a host",
            json!({ "url": raw }),
        ));
    }

    Ok(())
}

/// Issues short codes for destination URLs.
///
/// Codes come from a shared sequence, so two requests never receive the same code and no
/// collision check against storage is needed before inserting.
pub struct ShortenService<S: SequenceRepository, R: ShortUrlRepository> {
    sequence_repository: Arc<S>,
    short_url_repository: Arc<R>,
    sequence_name: String,
}

impl<S: SequenceRepository, R: ShortUrlRepository> ShortenService<S, R> {
    /// Creates a new shortening service drawing values from the `sequence_name` counter.
    pub fn new(
        sequence_repository: Arc<S>,
        short_url_repository: Arc<R>,
        sequence_name: impl Into<String>,
    ) -> Self {
        Self {
            sequence_repository,
            short_url_repository,
            sequence_name: sequence_name.into(),
        }
    }

    /// Creates a record for `original_url` with a freshly allocated code.
    ///
    /// A value taken from the sequence is consumed even when the insert fails afterwards;
    /// such gaps are never reused.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is not an absolute http(s) URL
    /// - [`AppError::Allocation`] if the sequence transaction failed
    /// - [`AppError::CapacityExceeded`] once the sequence outgrows six characters
    /// - [`AppError::DuplicateCode`] if an active record already holds the code
    /// - [`AppError::Internal`] on other storage errors
    pub async fn shorten(
        &self,
        original_url: String,
        owner_id: Option<String>,
    ) -> Result<ShortUrl, AppError> {
        validate_target_url(&original_url)?;

        let value = self
            .sequence_repository
            .next_value(&self.sequence_name)
            .await?;

        let code = codec::encode(value).map_err(|e| {
            error!(value, sequence = %self.sequence_name, "Sequence exhausted code capacity");
            AppError::from(e)
        })?;

        let new_url = NewShortUrl {
            code,
            original_url,
            owner_id,
        };

        match self.short_url_repository.insert(new_url).await {
            Ok(record) => {
                info!(id = record.id, code = %record.code, "Short URL created");
                Ok(record)
            }
            Err(e @ AppError::DuplicateCode { .. }) => {
                error!(error = %e, value, "Allocated code already in use");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::short_url::sample;
    use crate::domain::repositories::{MockSequenceRepository, MockShortUrlRepository};

    fn service(
        sequence_repo: MockSequenceRepository,
        url_repo: MockShortUrlRepository,
    ) -> ShortenService<MockSequenceRepository, MockShortUrlRepository> {
        ShortenService::new(Arc::new(sequence_repo), Arc::new(url_repo), "short_url")
    }

    #[tokio::test]
    async fn test_shorten_first_value() {
        let mut sequence_repo = MockSequenceRepository::new();
        let mut url_repo = MockShortUrlRepository::new();

        sequence_repo
            .expect_next_value()
            .withf(|name| name == "short_url")
            .times(1)
            .returning(|_| Ok(1));

        url_repo
            .expect_insert()
            .withf(|new_url| {
                new_url.code == "000001"
                    && new_url.original_url == "https://example.com"
                    && new_url.owner_id.is_none()
            })
            .times(1)
            .returning(|new_url| Ok(sample(1, &new_url.code, &new_url.original_url, None)));

        let record = service(sequence_repo, url_repo)
            .shorten("https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_eq!(record.code, "000001");
        assert_eq!(record.original_url, "https://example.com");
        assert_eq!(record.visit_count, 0);
    }

    #[tokio::test]
    async fn test_shorten_keeps_owner() {
        let mut sequence_repo = MockSequenceRepository::new();
        let mut url_repo = MockShortUrlRepository::new();

        sequence_repo
            .expect_next_value()
            .times(1)
            .returning(|_| Ok(62));

        url_repo
            .expect_insert()
            .withf(|new_url| new_url.code == "000010" && new_url.owner_id.as_deref() == Some("u1"))
            .times(1)
            .returning(|new_url| {
                Ok(sample(
                    7,
                    &new_url.code,
                    &new_url.original_url,
                    new_url.owner_id.as_deref(),
                ))
            });

        let record = service(sequence_repo, url_repo)
            .shorten("http://example.org/a?b=c".to_string(), Some("u1".to_string()))
            .await
            .unwrap();

        assert_eq!(record.code, "000010");
        assert!(record.is_owned_by("u1"));
    }

    #[tokio::test]
    async fn test_shorten_rejects_invalid_url_without_allocating() {
        let mut sequence_repo = MockSequenceRepository::new();
        let mut url_repo = MockShortUrlRepository::new();
        sequence_repo.expect_next_value().times(0);
        url_repo.expect_insert().times(0);

        let service = service(sequence_repo, url_repo);

        for bad in ["not-a-url", "ftp://example.com/file", "/relative/path", ""] {
            let result = service.shorten(bad.to_string(), None).await;
            assert!(
                matches!(result, Err(AppError::Validation { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_shorten_propagates_allocation_failure() {
        let mut sequence_repo = MockSequenceRepository::new();
        let mut url_repo = MockShortUrlRepository::new();

        sequence_repo
            .expect_next_value()
            .times(1)
            .returning(|_| Err(AppError::allocation("lock timeout", json!({}))));
        url_repo.expect_insert().times(0);

        let result = service(sequence_repo, url_repo)
            .shorten("https://example.com".to_string(), None)
            .await;

        assert!(matches!(result, Err(AppError::Allocation { .. })));
    }

    #[tokio::test]
    async fn test_shorten_capacity_exceeded() {
        let mut sequence_repo = MockSequenceRepository::new();
        let mut url_repo = MockShortUrlRepository::new();

        sequence_repo
            .expect_next_value()
            .times(1)
            .returning(|_| Ok(codec::CAPACITY));
        url_repo.expect_insert().times(0);

        let result = service(sequence_repo, url_repo)
            .shorten("https://example.com".to_string(), None)
            .await;

        assert!(matches!(
            result,
            Err(AppError::CapacityExceeded { value }) if value == codec::CAPACITY
        ));
    }

    #[tokio::test]
    async fn test_shorten_propagates_duplicate_code() {
        let mut sequence_repo = MockSequenceRepository::new();
        let mut url_repo = MockShortUrlRepository::new();

        sequence_repo
            .expect_next_value()
            .times(1)
            .returning(|_| Ok(5));
        url_repo
            .expect_insert()
            .times(1)
            .returning(|new_url| Err(AppError::DuplicateCode { code: new_url.code }));

        let result = service(sequence_repo, url_repo)
            .shorten("https://example.com".to_string(), None)
            .await;

        assert!(matches!(
            result,
            Err(AppError::DuplicateCode { code }) if code == "000005"
        ));
    }

    #[test]
    fn test_validate_target_url() {
        assert!(validate_target_url("https://example.com").is_ok());
        assert!(validate_target_url("http://localhost:8080/path?q=1#frag").is_ok());
        assert!(validate_target_url("mailto:someone@example.com").is_err());
        assert!(validate_target_url("javascript:alert(1)").is_err());
        assert!(validate_target_url("example.com").is_err());
    }
}
