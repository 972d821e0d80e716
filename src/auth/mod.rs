//! Authentication: login, registration, logout and password changes.
//!
//! Every operation comes in a typed form returning `Result`. Login and
//! registration also have boolean forms that log the failure, for callers
//! that only need to know whether to move on to the next screen.

use crate::errors::ClientError;
use crate::inflight::InFlight;
use crate::models::User;
use crate::AppContext;

/// Shortest password the backend accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

const LOGIN_KEY: &str = "login";
const REGISTER_KEY: &str = "register";

pub struct AuthClient {
    ctx: AppContext,
    inflight: InFlight,
}

impl AuthClient {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            inflight: InFlight::new(),
        }
    }

    /// Sign in and persist the session. Returns false on any failure.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        match self.try_login(email, password).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("Login failed: {}", e);
                false
            }
        }
    }

    /// Sign in and persist the session.
    ///
    /// Once the session is stored the device registrar is told a user is
    /// available, so a pending push token gets registered.
    pub async fn try_login(&self, email: &str, password: &str) -> Result<User, ClientError> {
        validate_login(email, password)?;
        let _guard = self.inflight.begin(LOGIN_KEY)?;

        let user = User::from(self.ctx.api.login(email.trim(), password).await?);
        self.ctx.session.store(user.clone()).await?;
        tracing::info!("Logged in as {}", user.email);

        self.ctx.devices.user_available(&user).await;
        Ok(user)
    }

    /// Create an account. Does not sign in. Returns false on any failure.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> bool {
        match self.try_register(name, email, password).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Registration failed: {}", e);
                false
            }
        }
    }

    pub async fn try_register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        validate_registration(name, email, password, password)?;
        let _guard = self.inflight.begin(REGISTER_KEY)?;

        self.ctx
            .api
            .register(name.trim(), email.trim(), password)
            .await?;
        tracing::info!("Registered account for {}", email.trim());
        Ok(())
    }

    /// Sign out. The push token is detached first, best-effort; the session
    /// is cleared whatever the outcome.
    pub async fn logout(&self) {
        if let Some(user) = self.ctx.session.current_user().await {
            self.ctx.devices.unregister(&user).await;
        }

        if let Err(e) = self.ctx.session.clear().await {
            tracing::error!("Error during logout: {}", e);
        }
        tracing::info!("Logged out");
    }

    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ClientError> {
        validate_password_change(old_password, new_password)?;
        let user = self.ctx.session.require_user().await?;

        self.ctx
            .api
            .change_password(&user.access_token, old_password, new_password)
            .await?;
        tracing::info!("Password changed for {}", user.email);
        Ok(())
    }
}

/// Field checks from the sign-in screen.
pub fn validate_login(email: &str, password: &str) -> Result<(), ClientError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ClientError::Validation(
            "Please fill in all fields".to_string(),
        ));
    }
    Ok(())
}

/// Field checks from the sign-up screen.
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), ClientError> {
    if name.trim().is_empty()
        || email.trim().is_empty()
        || password.is_empty()
        || confirm_password.is_empty()
    {
        return Err(ClientError::Validation(
            "Please fill in all fields".to_string(),
        ));
    }
    if password != confirm_password {
        return Err(ClientError::Validation(
            "Passwords do not match".to_string(),
        ));
    }
    check_password_length(password)
}

pub fn validate_password_change(old_password: &str, new_password: &str) -> Result<(), ClientError> {
    if old_password.is_empty() || new_password.is_empty() {
        return Err(ClientError::Validation(
            "Please fill in all fields".to_string(),
        ));
    }
    check_password_length(new_password)
}

fn check_password_length(password: &str) -> Result<(), ClientError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClientError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
