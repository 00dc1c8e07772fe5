//! Account sign-up, sign-in and token verification.
//!
//! Credentials never touch this service's storage: they are forwarded to
//! an external identity service which issues and verifies ID tokens.
use crate::{
    error::{AppError, AppResult},
    models::{AuthSession, AuthUser},
};

pub mod identity_toolkit;

pub use identity_toolkit::IdentityToolkitClient;

/// Minimum password length accepted by the identity service
pub const MIN_PASSWORD_LEN: usize = 6;

#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates an account and sets its display name
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AppResult<AuthSession>;

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// Resolves an ID token to the account it was issued for
    async fn verify(&self, id_token: &str) -> AppResult<AuthUser>;
}

/// Normalized sign-up input
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid {
        return Err(AppError::InvalidInput("A valid email is required".to_string()));
    }
    Ok(email.to_string())
}

fn check_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

pub fn validate_sign_up(email: &str, password: &str, name: &str) -> AppResult<SignUpInput> {
    let email = normalize_email(email)?;
    check_password(password)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Name is required".to_string()));
    }
    Ok(SignUpInput {
        email,
        password: password.to_string(),
        name: name.to_string(),
    })
}

/// Returns the trimmed email; the password is only checked for presence
pub fn validate_sign_in(email: &str, password: &str) -> AppResult<String> {
    let email = normalize_email(email)?;
    if password.is_empty() {
        return Err(AppError::InvalidInput("Password is required".to_string()));
    }
    Ok(email)
}
