use crate::errors::Result;
use crate::models::AuthUser;
use crate::remote::RemoteClient;
use crate::storage::{KeyValueStore, TOKEN_KEY, USER_KEY};
use std::sync::Arc;
use tracing::{error, info};

/// Session bookkeeping on top of [`RemoteClient`].
///
/// A persisted token is the only thing that makes the remote store
/// authoritative; the cached user record is informational.
#[derive(Debug, Clone)]
pub struct AuthGate {
    kv: KeyValueStore,
    client: Arc<RemoteClient>,
}

impl AuthGate {
    pub fn new(kv: KeyValueStore, client: Arc<RemoteClient>) -> Self {
        Self { kv, client }
    }

    pub fn client(&self) -> &Arc<RemoteClient> {
        &self.client
    }

    pub async fn is_authenticated(&self) -> bool {
        matches!(self.kv.get(TOKEN_KEY).await, Ok(Some(token)) if !token.is_empty())
    }

    pub async fn get_stored_user(&self) -> Option<AuthUser> {
        let raw = match self.kv.get(USER_KEY).await {
            Ok(raw) => raw?,
            Err(err) => {
                error!("failed to read cached user: {err}");
                return None;
            }
        };
        serde_json::from_str(&raw).ok()
    }

    pub async fn store_user(&self, user: &AuthUser) -> Result<()> {
        let payload = serde_json::to_string(user)?;
        self.kv.set(USER_KEY, &payload).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser> {
        let response = self.client.login(email, password).await?;
        self.store_user(&response.user).await?;
        info!(email = %response.user.email, "logged in");
        Ok(response.user)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthUser> {
        let response = self.client.register(name, email, password).await?;
        self.store_user(&response.user).await?;
        info!(email = %response.user.email, "registered");
        Ok(response.user)
    }

    /// Drops the token and cached user. Logs and settings are left to the caller.
    pub async fn logout(&self) -> Result<()> {
        self.client.clear_token().await?;
        self.kv.remove(USER_KEY).await?;
        info!("logged out");
        Ok(())
    }
}
