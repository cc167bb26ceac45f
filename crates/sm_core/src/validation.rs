use url::Url;

use crate::types::{Source, SummaryRequest, MAX_LENGTH, MIN_LENGTH};
use crate::{Error, Result};

/// Parses `input` as an absolute http(s) URL with a host.
pub fn validate_url(input: &str) -> Result<Url> {
    let invalid = || Error::InvalidUrl(input.to_string());
    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let url = Url::parse(input).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || !has_authority(input, url.scheme()) {
        return Err(invalid());
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(invalid()),
    }
}

/// The parser repairs inputs such as `https:example.com` or `http:/example.com`;
/// the raw text itself must spell out `scheme://host`.
fn has_authority(input: &str, scheme: &str) -> bool {
    input
        .get(scheme.len()..)
        .and_then(|rest| rest.strip_prefix("://"))
        .is_some_and(|authority| !authority.is_empty() && !authority.starts_with('/'))
}

/// Checks a request before any extraction or model work happens.
pub fn validate_request(request: &SummaryRequest) -> Result<()> {
    match &request.source {
        Source::Url(url) => {
            validate_url(url)?;
        }
        Source::Text(text) => {
            if text.trim().is_empty() {
                return Err(Error::EmptyText);
            }
        }
        Source::Pdf { bytes, .. } => {
            if bytes.is_empty() {
                return Err(Error::MissingFile);
            }
        }
    }

    if let Some(length) = request.length {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            return Err(Error::InvalidInput(format!(
                "Summary length must be between {} and {}",
                MIN_LENGTH, MAX_LENGTH
            )));
        }
    }

    if request.num_pages == Some(0) {
        return Err(Error::InvalidInput(
            "Select at least one page to summarize".to_string(),
        ));
    }

    Ok(())
}

/// Resolves how many pages a page-wise request covers.
pub fn resolve_page_count(requested: Option<usize>, available: usize) -> Result<usize> {
    if available == 0 {
        return Err(Error::InvalidInput("The PDF file has no pages".to_string()));
    }
    match requested {
        None => Ok(available),
        Some(n) if (1..=available).contains(&n) => Ok(n),
        Some(n) => Err(Error::InvalidInput(format!(
            "Cannot summarize {} pages, the PDF file has {}",
            n, available
        ))),
    }
}
