//! Login, signup, password reset and logout flows.

use std::sync::Arc;

use school_blog_api_types::{AuthResponse, Credentials};
use thiserror::Error;
use tracing::{info, warn};

use crate::application::api::{BlogApi, ClientError};
use crate::application::error::{Operation, OperationError, OperationResultExt};
use crate::application::session::{SessionContext, SessionError};
use crate::domain::session::Session;

pub const RESET_LINK_SENT: &str = "Password reset link has been sent to your email.";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Operation(#[from] OperationError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AuthError {
    /// Text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Operation(err) => err.message.clone(),
            AuthError::Session(err) => format!("Could not store the session: {err}"),
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn BlogApi>,
    session: SessionContext,
}

impl AuthService {
    pub fn new(api: Arc<dyn BlogApi>, session: SessionContext) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let credentials = credentials(username, password).for_operation(Operation::Login)?;
        let response = self
            .api
            .login(&credentials)
            .await
            .for_operation(Operation::Login)
            .inspect_err(|err| warn!(username, error = %err.source, "login failed"))?;
        self.establish(credentials.username, response)
    }

    pub async fn signup(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let credentials = credentials(username, password).for_operation(Operation::Signup)?;
        let response = self
            .api
            .signup(&credentials)
            .await
            .for_operation(Operation::Signup)
            .inspect_err(|err| warn!(username, error = %err.source, "signup failed"))?;
        self.establish(credentials.username, response)
    }

    /// Ask the service to mail a reset link. Returns the service's own message
    /// when it sent one, otherwise the stock confirmation.
    pub async fn forgot_password(&self, email: &str) -> Result<String, OperationError> {
        let email = email.trim();
        if !is_plausible_email(email) {
            return Err(OperationError::new(
                Operation::ForgotPassword,
                ClientError::InvalidInput("email address is not valid".into()),
            ));
        }
        let message = self
            .api
            .forgot_password(email)
            .await
            .for_operation(Operation::ForgotPassword)
            .inspect_err(|err| warn!(error = %err.source, "password reset request failed"))?;
        info!("password reset requested");
        Ok(message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| RESET_LINK_SENT.to_string()))
    }

    pub fn logout(&self) -> Result<Option<Session>, SessionError> {
        self.session.clear()
    }

    fn establish(&self, username: String, response: AuthResponse) -> Result<Session, AuthError> {
        let id = response.user_id().unwrap_or_default().to_string();
        let username = response
            .user
            .and_then(|u| u.username)
            .unwrap_or(username);
        let session = Session::new(username, id, response.token);
        self.session.establish(session.clone())?;
        Ok(session)
    }
}

fn credentials(username: &str, password: &str) -> Result<Credentials, ClientError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(ClientError::InvalidInput(
            "username and password are required".into(),
        ));
    }
    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

fn is_plausible_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
}
