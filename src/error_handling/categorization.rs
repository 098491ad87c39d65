//! Error categorization and retry strategy.

use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

use super::types::NetworkErrorKind;

/// Creates an exponential backoff retry strategy for the page fetch.
///
/// Returns a retry strategy configured with:
/// - Initial delay: `RETRY_INITIAL_DELAY_MS` milliseconds
/// - Backoff factor: `RETRY_FACTOR`
/// - Maximum delay: `RETRY_MAX_DELAY_SECS` seconds
/// - Maximum retries: `RETRY_MAX_ATTEMPTS`
///
/// Probes are single-shot and do not use this.
pub fn get_retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(crate::config::RETRY_INITIAL_DELAY_MS)
        .factor(crate::config::RETRY_FACTOR)
        .max_delay(Duration::from_secs(crate::config::RETRY_MAX_DELAY_SECS))
        .take(crate::config::RETRY_MAX_ATTEMPTS)
}

/// Categorizes a `reqwest::Error` into a `NetworkErrorKind`.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> NetworkErrorKind {
    if let Some(status) = error.status() {
        match status.as_u16() {
            403 => return NetworkErrorKind::BotDetection,
            404 => return NetworkErrorKind::NotFound,
            429 => return NetworkErrorKind::TooManyRequests,
            _ if status.is_client_error() => return NetworkErrorKind::ClientError,
            _ if status.is_server_error() => return NetworkErrorKind::ServerError,
            _ => {}
        }
    }

    if error.is_builder() {
        NetworkErrorKind::Builder
    } else if error.is_redirect() {
        NetworkErrorKind::Redirect
    } else if error.is_timeout() {
        NetworkErrorKind::Timeout
    } else if error.is_connect() {
        NetworkErrorKind::Connect
    } else if error.is_request() {
        NetworkErrorKind::Request
    } else if error.is_body() {
        NetworkErrorKind::Body
    } else if error.is_decode() {
        NetworkErrorKind::Decode
    } else {
        NetworkErrorKind::Other
    }
}

/// Whether a failed page fetch is worth retrying.
///
/// Transient transport failures and 429/5xx are retried; everything else
/// (bad certificates, 4xx, builder errors) fails immediately.
pub fn is_retriable(error: &reqwest::Error) -> bool {
    matches!(
        categorize_reqwest_error(error),
        NetworkErrorKind::Timeout
            | NetworkErrorKind::Connect
            | NetworkErrorKind::Request
            | NetworkErrorKind::TooManyRequests
            | NetworkErrorKind::ServerError
    )
}
