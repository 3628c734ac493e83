//! Admin authentication endpoints.

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

use super::types::{AdminUser, LoginRequest, LoginResponse, UserEnvelope};
use super::{ApiClient, ApiError};
use crate::error::{clear_sentry_user, set_sentry_user};

/// `/auth` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(super) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Log in and store the returned token and profile in the session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for wrong credentials, or an error
    /// if the request fails or the credentials cannot be stored.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<AdminUser, ApiError> {
        let body = LoginRequest {
            username,
            password: password.expose_secret(),
        };
        let response: LoginResponse = self.client.post("/auth/login", &body).await?;

        let token = SecretString::from(response.access_token);
        self.client.session().save(&token, &response.user)?;
        set_sentry_user(&response.user.id, response.user.email.as_deref());
        info!(username = %response.user.username, "Admin logged in");

        Ok(response.user)
    }

    /// Check the stored token and refresh the cached profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::SessionExpired`] if the token is no longer valid.
    #[instrument(skip(self))]
    pub async fn verify(&self) -> Result<AdminUser, ApiError> {
        let response: UserEnvelope = self.client.get("/auth/verify").await?;
        self.client.session().update_user(&response.user)?;
        Ok(response.user)
    }

    /// Forget the stored credentials. The backend keeps no session state.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be removed from storage.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.client.session().clear()?;
        clear_sentry_user();
        info!("Admin logged out");
        Ok(())
    }
}
