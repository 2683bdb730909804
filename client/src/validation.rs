use crate::error::AppError;

/// Core validation trait that all validators must implement.
///
/// Provides a consistent interface for validating user input before it is
/// allowed to trigger a network request.
///
/// # Type Parameters
///
/// * `T` - The type of data being validated (can be unsized like `str`)
pub trait Validator<T: ?Sized> {
    type Error;

    /// Validate the input and return Ok(()) if valid, or Err with validation error
    fn validate(&self, input: &T) -> Result<(), Self::Error>;
}

/// Validates the shape of an email address without contacting any server.
pub struct EmailValidator;

impl Validator<str> for EmailValidator {
    type Error = AppError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("Email is required".to_string()));
        }

        let mut parts = trimmed.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty() || domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "Please enter a valid email address".to_string(),
            ));
        }

        Ok(())
    }
}

/// Minimum password length accepted at registration and sign-in.
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub struct PasswordValidator;

impl Validator<str> for PasswordValidator {
    type Error = AppError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        if input.is_empty() {
            return Err(AppError::Validation("Password is required".to_string()));
        }
        if input.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
            )));
        }
        Ok(())
    }
}
