//! Sign-in, registration, and sign-out

use storefront_common::{AppError, AppResult};
use storefront_core::{
    dto::validate, AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, UserInfo,
};
use storefront_session::{ApiRequest, TransportError};
use tracing::instrument;

use super::{decode, error, with_body, StorefrontClient};

const LOGIN_PATH: &str = "/auth/login/";
const REGISTER_PATH: &str = "/auth/register/";
const LOGOUT_PATH: &str = "/auth/logout/";

impl StorefrontClient {
    /// Sign in and establish a session
    #[instrument(skip_all)]
    pub async fn login(&self, request: &LoginRequest) -> AppResult<UserInfo> {
        validate(request)?;

        let response = self
            .transport
            .send(with_body(ApiRequest::post(LOGIN_PATH), request)?)
            .await
            .map_err(|e| match e {
                TransportError::AuthorizationDenied => AppError::InvalidCredentials,
                other => error::from_transport(other),
            })?;

        self.start_session(decode(&response)?)
    }

    /// Create an account; the API signs the new user in right away
    #[instrument(skip_all)]
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<UserInfo> {
        validate(request)?;

        let response = self
            .transport
            .send(with_body(ApiRequest::post(REGISTER_PATH), request)?)
            .await
            .map_err(error::from_transport)?;

        self.start_session(decode(&response)?)
    }

    /// Sign out locally, revoking the refresh token server-side if possible
    #[instrument(skip(self))]
    pub async fn logout(&self) -> AppResult<()> {
        if let Some(refresh) = self.guard.refresh_token() {
            let request = with_body(ApiRequest::post(LOGOUT_PATH), &RefreshRequest { refresh })?;
            if let Err(e) = self.guard.send(request).await {
                tracing::warn!(error = %e, "Server-side logout failed");
            }
        }
        self.guard.logout().map_err(error::from_session)
    }

    fn start_session(&self, auth: AuthResponse) -> AppResult<UserInfo> {
        self.guard
            .establish(&auth.access, &auth.refresh, &auth.user)
            .map_err(error::from_session)?;
        tracing::info!(user_id = auth.user.id, "Signed in");
        Ok(auth.user)
    }
}
