//! Session store: the single persisted user record and its in-memory mirror.

use tokio::sync::RwLock;

use crate::db::Repository;
use crate::errors::ClientError;
use crate::models::User;

/// Storage key the user record lives under.
pub const USER_STORAGE_KEY: &str = "user";

/// Snapshot of the session as the screens see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    /// True until the stored session has been read at startup
    pub is_loading: bool,
}

pub struct SessionStore {
    repo: Repository,
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            state: RwLock::new(SessionState {
                user: None,
                is_loading: true,
            }),
        }
    }

    /// Read the stored user into memory.
    ///
    /// Storage failures and unreadable records both load as "no session"; an
    /// unreadable record is also deleted so it is not retried on every start.
    pub async fn load(&self) -> Option<User> {
        let user = match self.repo.get_item(USER_STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("Discarding unreadable stored session: {}", e);
                    if let Err(e) = self.repo.remove_item(USER_STORAGE_KEY).await {
                        tracing::warn!("Could not remove stored session: {}", e);
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::error!("Error loading stored user: {}", e);
                None
            }
        };

        let mut state = self.state.write().await;
        state.user = user.clone();
        state.is_loading = false;
        user
    }

    /// Persist `user` as the session, replacing any previous one.
    pub async fn store(&self, user: User) -> Result<(), ClientError> {
        let raw = serde_json::to_string(&user)?;
        self.repo.set_item(USER_STORAGE_KEY, &raw).await?;
        self.state.write().await.user = Some(user);
        Ok(())
    }

    /// Drop the session. Memory is cleared even if storage fails.
    pub async fn clear(&self) -> Result<(), ClientError> {
        self.state.write().await.user = None;
        self.repo.remove_item(USER_STORAGE_KEY).await
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    /// The current user, provided it carries an id and an access token.
    pub async fn require_user(&self) -> Result<User, ClientError> {
        match self.current_user().await {
            Some(user) if !user.id.is_empty() && !user.access_token.is_empty() => Ok(user),
            _ => Err(ClientError::Unauthenticated(
                "User not authenticated".to_string(),
            )),
        }
    }
}
