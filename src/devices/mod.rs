//! Push-device registration.
//!
//! Links the device's push token to the signed-in owner so the backend can
//! notify them when someone is at the door. Registration is best-effort:
//! failures are logged and never block login or logout.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::ApiClient;
use crate::db::Repository;
use crate::models::{DevicePlatform, DeviceRegistration, User};

/// Storage key for the last acquired push token.
pub const PUSH_TOKEN_STORAGE_KEY: &str = "push_token";

pub struct DeviceRegistrar {
    api: Arc<ApiClient>,
    repo: Repository,
    platform: DevicePlatform,
    push_token: RwLock<Option<String>>,
}

impl DeviceRegistrar {
    pub fn new(api: Arc<ApiClient>, repo: Repository, platform: DevicePlatform) -> Self {
        Self {
            api,
            repo,
            platform,
            push_token: RwLock::new(None),
        }
    }

    /// Restore the push token saved by a previous run.
    pub async fn load(&self) {
        match self.repo.get_item(PUSH_TOKEN_STORAGE_KEY).await {
            Ok(token) => *self.push_token.write().await = token,
            Err(e) => tracing::warn!("Could not read stored push token: {}", e),
        }
    }

    pub async fn push_token(&self) -> Option<String> {
        self.push_token.read().await.clone()
    }

    /// A push token was obtained from the platform. Registers it right away
    /// when someone is signed in; otherwise registration waits for
    /// [`user_available`](Self::user_available).
    pub async fn token_acquired(&self, token: String, user: Option<&User>) -> bool {
        if let Err(e) = self.repo.set_item(PUSH_TOKEN_STORAGE_KEY, &token).await {
            tracing::warn!("Could not persist push token: {}", e);
        }
        *self.push_token.write().await = Some(token.clone());

        match user {
            Some(user) => self.register(user, &token).await,
            None => false,
        }
    }

    /// A user signed in. Registers the known push token, if any.
    pub async fn user_available(&self, user: &User) -> bool {
        match self.push_token().await {
            Some(token) => self.register(user, &token).await,
            None => false,
        }
    }

    /// Detach the push token from `user`. Returns whether the backend confirmed.
    pub async fn unregister(&self, user: &User) -> bool {
        let Some(token) = self.push_token().await else {
            return false;
        };

        let registration = self.registration(user, &token);
        match self
            .api
            .unregister_device(&user.access_token, &registration)
            .await
        {
            Ok(()) => {
                tracing::info!("Push token unregistered for user {}", user.id);
                true
            }
            Err(e) => {
                tracing::warn!("Push token unregistration failed: {}", e);
                false
            }
        }
    }

    async fn register(&self, user: &User, token: &str) -> bool {
        let registration = self.registration(user, token);
        match self
            .api
            .register_device(&user.access_token, &registration)
            .await
        {
            Ok(()) => {
                tracing::info!(
                    "Push token registered for user {} ({})",
                    user.id,
                    self.platform
                );
                true
            }
            Err(e) => {
                tracing::warn!("Push token registration failed: {}", e);
                false
            }
        }
    }

    fn registration(&self, user: &User, token: &str) -> DeviceRegistration {
        DeviceRegistration {
            owner_id: user.id.clone(),
            push_token: token.to_string(),
            platform: self.platform,
        }
    }
}
