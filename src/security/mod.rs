//! Security checks applied before any network access.

mod url_validation;

pub use url_validation::{is_redirect_target_allowed, validate_target_url, MAX_URL_LENGTH};
