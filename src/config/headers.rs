//! HTTP header name constants.
//!
//! Names are lowercase, matching how `reqwest`'s `HeaderMap` stores them and how the
//! renderer records them on the snapshot.

/// HTTP Strict Transport Security header
pub const HEADER_STRICT_TRANSPORT_SECURITY: &str = "strict-transport-security";
/// X-Content-Type-Options header
pub const HEADER_X_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";
/// X-Frame-Options header
pub const HEADER_X_FRAME_OPTIONS: &str = "x-frame-options";

/// Headers whose absence is reported by the security headers rule.
pub const REQUIRED_SECURITY_HEADERS: &[&str] = &[
    HEADER_STRICT_TRANSPORT_SECURITY,
    HEADER_X_CONTENT_TYPE_OPTIONS,
    HEADER_X_FRAME_OPTIONS,
];
