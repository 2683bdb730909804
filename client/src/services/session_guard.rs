//! Session guard: failure classification and sign-out teardown.
//!
//! Every failed API call is routed through [`SessionGuard::handle_failure`],
//! which decides whether the failure is a recoverable request problem the
//! caller should surface in place, or evidence that the session itself is
//! invalid and must be torn down.
//!
//! The distinction matters most for endpoints a signed-in user acts on
//! directly: a rejected booking must never be mistaken for an expired
//! session, or the user loses their in-progress selections to a redirect.

use api::{ApiError, BookingApi, Endpoint};
use std::sync::Arc;

/// Outcome of classifying a failed API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The session is intact; surface this message where the user acted.
    Recoverable(String),
    /// The stored session is no longer valid and has to be torn down.
    SessionInvalid,
}

/// Navigation seam between the client core and the embedding shell.
///
/// The guard only ever redirects to the sign-in entry point, and only when
/// the user is not already there.
pub trait Navigator: Send + Sync {
    fn current_location(&self) -> String;
    fn navigate_to(&self, route: &str);
}

/// Classification policy for failed API calls.
///
/// Endpoints listed in `user_action_endpoints` are ones a signed-in user
/// acts on directly; failures there always stay local to the action, no
/// matter what status or wording the server used.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    pub user_action_endpoints: Vec<String>,
    pub invalid_token_codes: Vec<String>,
    pub auth_vocabulary: Vec<String>,
    pub sign_in_route: String,
}

impl SessionPolicy {
    fn is_user_action(&self, endpoint: Endpoint) -> bool {
        self.user_action_endpoints
            .iter()
            .any(|prefix| endpoint.path().starts_with(prefix.as_str()))
    }

    /// Classifies a failed call. Pure and total: every error maps to
    /// exactly one [`FailureKind`].
    ///
    /// Precedence:
    /// 1. Failures on user-action endpoints are always recoverable.
    /// 2. A 401 rejection whose error code is a known invalid-token code,
    ///    or whose message uses authentication vocabulary, invalidates
    ///    the session.
    /// 3. Everything else is recoverable.
    pub fn classify(&self, endpoint: Endpoint, error: &ApiError) -> FailureKind {
        if self.is_user_action(endpoint) {
            return FailureKind::Recoverable(error.user_message());
        }

        if let ApiError::Rejected {
            status: 401,
            code,
            message,
        } = error
        {
            let code_matches = code.as_deref().is_some_and(|code| {
                self.invalid_token_codes
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(code))
            });
            let lowered = message.to_lowercase();
            let vocabulary_matches = self
                .auth_vocabulary
                .iter()
                .any(|term| lowered.contains(term.to_lowercase().as_str()));

            if code_matches || vocabulary_matches {
                return FailureKind::SessionInvalid;
            }
        }

        FailureKind::Recoverable(error.user_message())
    }
}

/// Intercepts failed API calls and owns the sign-out teardown path.
pub struct SessionGuard {
    policy: SessionPolicy,
    credentials: Arc<api::auth::CredentialStore>,
    api: Arc<dyn BookingApi>,
    navigator: Arc<dyn Navigator>,
}

impl SessionGuard {
    pub fn new(
        policy: SessionPolicy,
        credentials: Arc<api::auth::CredentialStore>,
        api: Arc<dyn BookingApi>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            policy,
            credentials,
            api,
            navigator,
        }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    pub fn sign_in_route(&self) -> &str {
        &self.policy.sign_in_route
    }

    /// Classifies without side effects.
    pub fn classify(&self, endpoint: Endpoint, error: &ApiError) -> FailureKind {
        self.policy.classify(endpoint, error)
    }

    /// Classifies a failure and, when the session turned out to be
    /// invalid, tears it down before returning.
    pub fn handle_failure(&self, endpoint: Endpoint, error: &ApiError) -> FailureKind {
        let kind = self.policy.classify(endpoint, error);
        if kind == FailureKind::SessionInvalid {
            log::warn!(
                "Invalid session detected on {} ({}); signing out",
                endpoint.path(),
                error
            );
            self.force_sign_out();
        }
        kind
    }

    /// Clears the stored credential pair and the installed bearer, then
    /// redirects to the sign-in entry point unless the user is already
    /// there. Safe to invoke repeatedly; repeated invalid-session events
    /// never loop redirects.
    pub fn force_sign_out(&self) {
        self.credentials.clear();
        self.api.clear_bearer();

        let sign_in = &self.policy.sign_in_route;
        if self.navigator.current_location() != *sign_in {
            self.navigator.navigate_to(sign_in);
        }
    }
}
