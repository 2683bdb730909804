use crate::app::model::Model;
use crate::app::task_manager::TaskManager;
use crate::components::common::{AuthActivityMsg, Msg, NotificationActivityMsg};
use crate::error::AppError;
use crate::services::session_guard::FailureKind;
use crate::validation::{EmailValidator, PasswordValidator, Validator};
use api::Endpoint;
use api::auth::Role;

impl Model {
    pub fn update_auth(&mut self, msg: AuthActivityMsg) -> Option<Msg> {
        match msg {
            AuthActivityMsg::Login { email, password } => {
                if let Err(e) = self.validate_credentials(&email, &password) {
                    self.error_reporter.report_warning(e, "Auth", "login");
                    return None;
                }
                self.sign_in(email, password);
                None
            }
            AuthActivityMsg::Register {
                email,
                password,
                role,
            } => {
                if let Err(e) = self.validate_credentials(&email, &password) {
                    self.error_reporter.report_warning(e, "Auth", "register");
                    return None;
                }
                self.register(email, password, role);
                None
            }
            AuthActivityMsg::SignedIn(credential) => {
                // The only success path that writes the credential store.
                if let Err(e) = self.credentials.save(&credential) {
                    self.error_reporter
                        .report_simple(AppError::from(e), "Auth", "persist_credential");
                }
                self.api.set_bearer(credential.token.expose());
                log::info!("Signed in as {}", credential.user.email);
                self.signed_in = Some(credential.user);
                self.navigator.navigate_to("/");
                Some(Msg::NotificationActivity(NotificationActivityMsg::Success(
                    "Signed in successfully".to_string(),
                )))
            }
            AuthActivityMsg::SignInFailed(message) => Some(Msg::NotificationActivity(
                NotificationActivityMsg::Error(message),
            )),
            AuthActivityMsg::Logout => {
                // Same teardown as an invalid session: clear the pair,
                // drop the bearer, land on the sign-in route.
                self.session_guard.force_sign_out();
                self.signed_in = None;
                Some(Msg::NotificationActivity(NotificationActivityMsg::Info(
                    "Signed out".to_string(),
                )))
            }
        }
    }

    fn validate_credentials(&self, email: &str, password: &str) -> Result<(), AppError> {
        EmailValidator.validate(email)?;
        PasswordValidator.validate(password)?;
        Ok(())
    }

    fn sign_in(&self, email: String, password: String) {
        let api = self.api.clone();
        let guard = self.session_guard.clone();
        let tx = self.tx_to_main.clone();
        let reporter = self.error_reporter.clone();

        self.task_manager.execute("Signing in...", async move {
            match api.login(&email, &password).await {
                Ok(credential) => {
                    TaskManager::send_message_or_report_error(
                        &tx,
                        Msg::AuthActivity(AuthActivityMsg::SignedIn(credential)),
                        "signed in",
                        &reporter,
                    );
                    Ok(())
                }
                Err(e) => match guard.handle_failure(Endpoint::Auth, &e) {
                    FailureKind::Recoverable(message) => {
                        TaskManager::send_message_or_report_error(
                            &tx,
                            Msg::AuthActivity(AuthActivityMsg::SignInFailed(message)),
                            "sign in failed",
                            &reporter,
                        );
                        Ok(())
                    }
                    FailureKind::SessionInvalid => Ok(()),
                },
            }
        });
    }

    fn register(&self, email: String, password: String, role: Role) {
        let api = self.api.clone();
        let guard = self.session_guard.clone();
        let tx = self.tx_to_main.clone();
        let reporter = self.error_reporter.clone();

        self.task_manager.execute("Creating account...", async move {
            match api.register(&email, &password, role).await {
                Ok(credential) => {
                    TaskManager::send_message_or_report_error(
                        &tx,
                        Msg::AuthActivity(AuthActivityMsg::SignedIn(credential)),
                        "registered",
                        &reporter,
                    );
                    Ok(())
                }
                Err(e) => match guard.handle_failure(Endpoint::Auth, &e) {
                    FailureKind::Recoverable(message) => {
                        TaskManager::send_message_or_report_error(
                            &tx,
                            Msg::AuthActivity(AuthActivityMsg::SignInFailed(message)),
                            "registration failed",
                            &reporter,
                        );
                        Ok(())
                    }
                    FailureKind::SessionInvalid => Ok(()),
                },
            }
        });
    }
}
