use super::defaults;
use crate::services::session_guard::SessionPolicy;
use serde::Deserialize;

/// Session guard configuration.
///
/// The classification policy is data, not code: deployments can extend
/// the endpoint allow-list, token codes, and vocabulary without a client
/// change.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct SessionConfig {
    sign_in_route: Option<String>,
    user_action_endpoints: Option<Vec<String>>,
    invalid_token_codes: Option<Vec<String>>,
    auth_vocabulary: Option<Vec<String>>,
}

impl SessionConfig {
    pub fn sign_in_route(&self) -> &str {
        self.sign_in_route
            .as_deref()
            .unwrap_or(defaults::DEFAULT_SIGN_IN_ROUTE)
    }

    pub fn user_action_endpoints(&self) -> Vec<String> {
        self.user_action_endpoints
            .clone()
            .unwrap_or_else(defaults::default_user_action_endpoints)
    }

    pub fn invalid_token_codes(&self) -> Vec<String> {
        self.invalid_token_codes
            .clone()
            .unwrap_or_else(defaults::default_invalid_token_codes)
    }

    pub fn auth_vocabulary(&self) -> Vec<String> {
        self.auth_vocabulary
            .clone()
            .unwrap_or_else(defaults::default_auth_vocabulary)
    }

    /// Materializes the classification policy for the session guard.
    pub fn policy(&self) -> SessionPolicy {
        SessionPolicy {
            user_action_endpoints: self.user_action_endpoints(),
            invalid_token_codes: self.invalid_token_codes(),
            auth_vocabulary: self.auth_vocabulary(),
            sign_in_route: self.sign_in_route().to_string(),
        }
    }
}
