//! Default values applied when `config.toml` or the environment leaves a
//! setting unspecified.

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// How far ahead of today a booking date may be, in days. The window is
/// inclusive on both ends.
pub const DEFAULT_MAX_DAYS_AHEAD: i64 = 30;

pub const DEFAULT_SIGN_IN_ROUTE: &str = "/login";

/// Endpoints a signed-in user acts on directly. Failures here are always
/// surfaced in place instead of being treated as session evidence.
pub fn default_user_action_endpoints() -> Vec<String> {
    vec!["/appointments".to_string(), "/availability".to_string()]
}

/// Machine-readable error codes the server uses for unusable tokens.
pub fn default_invalid_token_codes() -> Vec<String> {
    vec![
        "TOKEN_EXPIRED".to_string(),
        "TOKEN_INVALID".to_string(),
        "TOKEN_MISSING".to_string(),
        "TOKEN_REVOKED".to_string(),
    ]
}

/// Wording that marks a 401 message as being about the session itself.
pub fn default_auth_vocabulary() -> Vec<String> {
    vec![
        "token".to_string(),
        "unauthorized".to_string(),
        "authorization".to_string(),
        "authentication".to_string(),
        "session expired".to_string(),
    ]
}
