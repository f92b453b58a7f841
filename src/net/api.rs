//! REST client for the school backend.
//!
//! Every call goes through [`ApiClient::request`], which prefixes the
//! configured base URL, merges headers (JSON content type, bearer token when
//! one is stored, then caller headers with last-merged-wins), parses the body
//! as JSON and converts non-success statuses into [`ApiError::Status`].
//!
//! ERROR HANDLING
//! ==============
//! Every failure is logged before it is returned. The named operations only
//! perform their session side effect when the envelope reports success and
//! carries data; a well-formed envelope without data is not an error.
//!
//! `logout` always clears the session and navigates to the login page, even
//! when the server call fails.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::rc::Rc;

use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName};
use http::{HeaderMap, HeaderValue, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{ApiError, FALLBACK_ERROR_MESSAGE};
use super::transport::{ApiRequest, HttpTransport};
use super::types::{
    ApiEnvelope, ChangePasswordRequest, ForgotPasswordRequest, LoginCredentials, RefreshTokenRequest,
    RegisterRequest, ResetPasswordRequest, TokenGrant, UserProfile,
};
use crate::config::ClientConfig;
use crate::util::surface::Navigator;
use crate::session::SessionStore;

pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const LOGOUT_ENDPOINT: &str = "/auth/logout";
pub const CURRENT_USER_ENDPOINT: &str = "/auth/me";
pub const REGISTER_ENDPOINT: &str = "/auth/register";
pub const REFRESH_ENDPOINT: &str = "/auth/refresh";
pub const FORGOT_PASSWORD_ENDPOINT: &str = "/auth/forgot-password";
pub const RESET_PASSWORD_ENDPOINT: &str = "/auth/reset-password";
pub const CHANGE_PASSWORD_ENDPOINT: &str = "/auth/change-password";
pub const HEALTH_ENDPOINT: &str = "/auth/health";

// =============================================================================
// REQUEST OPTIONS
// =============================================================================

/// Method, extra headers and body for one call. Defaults to a bodiless GET.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl RequestOptions {
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn post() -> Self {
        Self { method: Method::POST, ..Self::default() }
    }

    #[must_use]
    pub fn with_method(method: Method) -> Self {
        Self { method, ..Self::default() }
    }

    /// Serialize `body` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if `body` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self)
    }

    /// Add a caller header. It replaces any default header of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidHeader`] if the name or value is not a
    /// valid HTTP header.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, ApiError> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        self.headers.insert(name, HeaderValue::from_str(value)?);
        Ok(self)
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Authenticated API client. Cloning shares the session, transport and
/// navigator.
#[derive(Clone)]
pub struct ApiClient {
    base: String,
    login_page: String,
    session: SessionStore,
    transport: Rc<dyn HttpTransport>,
    navigator: Rc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        session: SessionStore,
        transport: Rc<dyn HttpTransport>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        Self {
            base: config.api_base.clone(),
            login_page: config.login_page.clone(),
            session,
            transport,
            navigator,
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Send a request to `{base}{endpoint}` and return the parsed JSON body.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] if no response arrives.
    /// - [`ApiError::Decode`] if the body is not JSON.
    /// - [`ApiError::Status`] for non-2xx statuses, carrying the body's
    ///   `message` or `"Request failed"`.
    /// - [`ApiError::InvalidHeader`] if the stored token cannot be sent.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let result = self.dispatch(endpoint, options).await;
        if let Err(e) = &result {
            log::error!("API error on {endpoint}: {e}");
        }
        result
    }

    /// [`Self::request`], then decode the body into `T`.
    ///
    /// # Errors
    ///
    /// As [`Self::request`], plus [`ApiError::Decode`] when the body does not
    /// have the shape of `T`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let body = self.request(endpoint, options).await?;
        serde_json::from_value(body).map_err(|e| {
            let err = ApiError::from(e);
            log::error!("API error on {endpoint}: {err}");
            err
        })
    }

    async fn dispatch(&self, endpoint: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let request = self.prepare(endpoint, options)?;
        log::debug!("{} {}", request.method, request.url);

        let response = self.transport.send(request).await?;
        let body: Value = serde_json::from_str(&response.body)?;

        if !response.is_success() {
            if response.status == 401 && self.session.user().is_some() {
                log::warn!("access token rejected while a cached profile is still stored");
            }
            return Err(ApiError::Status { status: response.status, message: failure_message(&body) });
        }
        Ok(body)
    }

    fn prepare(&self, endpoint: &str, options: RequestOptions) -> Result<ApiRequest, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = self.session.token().filter(|t| !t.is_empty()) {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
        }
        // Extending from another map replaces same-named entries.
        headers.extend(options.headers);

        Ok(ApiRequest {
            method: options.method,
            url: format!("{}{endpoint}", self.base),
            headers,
            body: options.body,
        })
    }

    // =========================================================================
    // AUTH
    // =========================================================================

    /// `POST /auth/login`. Stores the issued tokens on success.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<ApiEnvelope<TokenGrant>, ApiError> {
        self.grant_request(LOGIN_ENDPOINT, RequestOptions::post().json(credentials)?).await
    }

    /// `POST /auth/register`. Stores the issued tokens on success.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn register(&self, request: &RegisterRequest) -> Result<ApiEnvelope<TokenGrant>, ApiError> {
        self.grant_request(REGISTER_ENDPOINT, RequestOptions::post().json(request)?).await
    }

    /// `POST /auth/refresh` with the stored refresh token. Stores the rotated
    /// tokens on success.
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingRefreshToken`] without sending anything if no
    /// refresh token is stored; otherwise see [`Self::request_json`].
    pub async fn refresh(&self) -> Result<ApiEnvelope<TokenGrant>, ApiError> {
        let Some(refresh_token) = self.session.refresh_token() else {
            log::error!("API error on {REFRESH_ENDPOINT}: {}", ApiError::MissingRefreshToken);
            return Err(ApiError::MissingRefreshToken);
        };
        let body = RefreshTokenRequest { refresh_token: &refresh_token };
        self.grant_request(REFRESH_ENDPOINT, RequestOptions::post().json(&body)?).await
    }

    async fn grant_request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiEnvelope<TokenGrant>, ApiError> {
        let envelope: ApiEnvelope<TokenGrant> = self.request_json(endpoint, options).await?;
        if let Some(grant) = envelope.payload() {
            self.session.store_grant(grant);
        }
        Ok(envelope)
    }

    /// `POST /auth/logout`, then clear the session and go to the login page
    /// whatever the server said.
    ///
    /// # Errors
    ///
    /// The server call's error, returned after cleanup has run.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.request(LOGOUT_ENDPOINT, RequestOptions::post()).await;
        self.session.clear_auth();
        self.navigator.navigate(&self.login_page);
        result.map(|_| ())
    }

    /// `GET /auth/me`. Caches the profile on success.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn current_user(&self) -> Result<ApiEnvelope<UserProfile>, ApiError> {
        let envelope: ApiEnvelope<UserProfile> = self.request_json(CURRENT_USER_ENDPOINT, RequestOptions::get()).await?;
        if let Some(profile) = envelope.payload() {
            self.session.set_user(profile);
        }
        Ok(envelope)
    }

    /// `POST /auth/forgot-password`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn forgot_password(&self, email: &str) -> Result<ApiEnvelope<Value>, ApiError> {
        let body = ForgotPasswordRequest { email };
        self.request_json(FORGOT_PASSWORD_ENDPOINT, RequestOptions::post().json(&body)?).await
    }

    /// `POST /auth/reset-password` with an emailed reset token.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<ApiEnvelope<Value>, ApiError> {
        let body = ResetPasswordRequest { token, new_password, confirm_password };
        self.request_json(RESET_PASSWORD_ENDPOINT, RequestOptions::post().json(&body)?).await
    }

    /// `POST /auth/change-password` for the signed-in user.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<ApiEnvelope<Value>, ApiError> {
        let body = ChangePasswordRequest { current_password, new_password, confirm_password };
        self.request_json(CHANGE_PASSWORD_ENDPOINT, RequestOptions::post().json(&body)?).await
    }

    /// `GET /auth/health`.
    ///
    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn health(&self) -> Result<ApiEnvelope<String>, ApiError> {
        self.request_json(HEALTH_ENDPOINT, RequestOptions::get()).await
    }
}

/// The body's `message` when it is a truthy scalar, else the fallback.
/// Numbers and `true` are stringified; `0`, `false`, `""` and containers are not.
fn failure_message(body: &Value) -> String {
    match body.get("message") {
        Some(Value::String(m)) if !m.is_empty() => m.clone(),
        Some(Value::Number(n)) if n.as_f64().is_some_and(|f| f.abs() > 0.0) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_owned(),
        _ => FALLBACK_ERROR_MESSAGE.to_owned(),
    }
}
