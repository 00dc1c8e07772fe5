//! Identity Toolkit REST client (the API behind Firebase Authentication)
//!
//! Flow:
//! 1. Sign-up: `accounts:signUp`, then `accounts:update` to set the display name
//! 2. Sign-in: `accounts:signInWithPassword`
//! 3. Token verification: `accounts:lookup` with the caller's ID token
use crate::{
    error::{AppError, AppResult},
    models::{AuthSession, AuthUser},
    services::identity::IdentityProvider,
};
use reqwest::Client as HttpClient;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileRequest<'a> {
    id_token: &'a str,
    display_name: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

/// Body of signUp and signInWithPassword responses
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    id_token: String,
    refresh_token: String,
    /// Seconds, sent as a string
    expires_in: String,
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

impl TokenResponse {
    fn into_session(self) -> AuthSession {
        AuthSession {
            expires_in: self.expires_in.parse().unwrap_or(3600),
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            user: AuthUser {
                user_id: self.local_id,
                email: self.email,
                display_name: self.display_name.filter(|n| !n.is_empty()),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileResponse {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    disabled: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Maps an Identity Toolkit error message to an application error
///
/// Messages look like `EMAIL_EXISTS` or `WEAK_PASSWORD : Password should be ...`.
fn map_identity_error(message: &str) -> AppError {
    let code = message.split(" : ").next().unwrap_or(message).trim();
    match code {
        "EMAIL_EXISTS" => AppError::Conflict("An account with this email already exists".to_string()),
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            AppError::Unauthorized("Invalid email or password".to_string())
        }
        "USER_DISABLED" => AppError::Unauthorized("This account has been disabled".to_string()),
        "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" => {
            AppError::Unauthorized("Session is invalid or expired".to_string())
        }
        "WEAK_PASSWORD" | "INVALID_EMAIL" | "MISSING_PASSWORD" | "MISSING_EMAIL" => {
            AppError::InvalidInput(message.to_string())
        }
        "TOO_MANY_ATTEMPTS_TRY_LATER" => {
            AppError::ExternalApi("Too many attempts, try again later".to_string())
        }
        _ => AppError::ExternalApi(format!("Identity service error: {}", message)),
    }
}

#[derive(Clone)]
pub struct IdentityToolkitClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl IdentityToolkitClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> AppResult<T> {
        let url = format!("{}/accounts:{}", self.api_url, method);

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| text.clone());
            tracing::warn!(
                method = %method,
                status = %status,
                message = %message,
                "Identity service rejected request"
            );
            return Err(map_identity_error(&message));
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(error = %e, method = %method, "Failed to parse identity response");
            AppError::ExternalApi(format!("Failed to parse identity response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl IdentityProvider for IdentityToolkitClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AppResult<AuthSession> {
        let created: TokenResponse = self
            .post(
                "signUp",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        let mut session = created.into_session();

        let updated: UpdateProfileResponse = self
            .post(
                "update",
                &UpdateProfileRequest {
                    id_token: &session.id_token,
                    display_name,
                    return_secure_token: true,
                },
            )
            .await?;

        session.user.display_name = updated
            .display_name
            .or_else(|| Some(display_name.to_string()));
        // Updating a profile may rotate tokens
        if let (Some(id_token), Some(refresh_token)) = (updated.id_token, updated.refresh_token) {
            session.id_token = id_token;
            session.refresh_token = refresh_token;
            if let Some(expires_in) = updated.expires_in.and_then(|e| e.parse().ok()) {
                session.expires_in = expires_in;
            }
        }

        tracing::info!(user_id = %session.user.user_id, "Account created");
        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let response: TokenResponse = self
            .post(
                "signInWithPassword",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        let session = response.into_session();
        tracing::info!(user_id = %session.user.user_id, "Signed in");
        Ok(session)
    }

    async fn verify(&self, id_token: &str) -> AppResult<AuthUser> {
        let response: LookupResponse = self.post("lookup", &LookupRequest { id_token }).await?;

        let user = response
            .users
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Unauthorized("Session is invalid or expired".to_string()))?;

        if user.disabled {
            return Err(AppError::Unauthorized(
                "This account has been disabled".to_string(),
            ));
        }

        Ok(AuthUser {
            user_id: user.local_id,
            email: user.email,
            display_name: user.display_name.filter(|n| !n.is_empty()),
        })
    }
}
