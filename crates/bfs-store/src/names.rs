//! Bucket name validation.
//!
//! Valid bucket names:
//! - Must be 1 to 255 characters long
//! - Must only contain ASCII letters, digits, `.`, `-` and `_`
//! - Must start and end with a letter or digit
//! - Must not contain `..`
//!
//! These are the legacy (mixed-case) rules; stricter stores reject more.

use crate::error::{StoreError, StoreResult};

const MAX_BUCKET_NAME_LEN: usize = 255;

/// Validate a bucket name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use bfs_store::validate_bucket_name;
///
/// assert!(validate_bucket_name("bucketA").is_ok());
/// assert!(validate_bucket_name("my.bucket-1").is_ok());
/// assert!(validate_bucket_name("").is_err());
/// assert!(validate_bucket_name("has/slash").is_err());
/// ```
pub fn validate_bucket_name(name: &str) -> StoreResult<()> {
    let invalid = |reason: String| StoreError::InvalidBucketName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("bucket name must not be empty".into()));
    }
    if name.len() > MAX_BUCKET_NAME_LEN {
        return Err(invalid(format!(
            "longer than {MAX_BUCKET_NAME_LEN} characters"
        )));
    }
    if let Some(ch) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')))
    {
        return Err(invalid(format!("contains forbidden character: {ch:?}")));
    }
    let first = name.chars().next().unwrap_or('.');
    let last = name.chars().last().unwrap_or('.');
    if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
        return Err(invalid("must start and end with a letter or digit".into()));
    }
    if name.contains("..") {
        return Err(invalid("must not contain '..'".into()));
    }
    Ok(())
}
