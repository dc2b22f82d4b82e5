use thiserror::Error;
use url::Url;

/// Errors rejecting a candidate URL from the stash.
#[derive(Debug, Error)]
pub enum StashUrlError {
    /// The URL string could not be parsed.
    #[error("invalid URL: {0}")]
    Invalid(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("unsupported scheme: {0} (only http/https can be stashed)")]
    UnsupportedScheme(String),
}

/// Validates a URL string before it is admitted to the read-later list.
///
/// Only web pages are stashable; browser-internal and file URLs are rejected.
/// The stash never dereferences what it stores, so no host-level policy
/// applies here.
pub fn validate_stash_url(raw: &str) -> Result<Url, StashUrlError> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(StashUrlError::UnsupportedScheme(scheme.to_owned())),
    }
}
