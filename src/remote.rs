use crate::errors::{AppError, Result};
use crate::models::{
    AuthResponse, HealthStatus, IntakeLog, IntakeLogPayload, IntakeLogsResponse, LoginPayload,
    RegisterPayload, StatsOverview, UserSettings, UserSettingsUpdate,
};
use crate::storage::{KeyValueStore, TOKEN_KEY};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, error};

pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Typed wrapper over the hydration REST API.
///
/// Holds at most one bearer token, mirrored into the key-value store so a
/// later process picks the session back up. Calls are never retried here.
#[derive(Debug)]
pub struct RemoteClient {
    base_url: String,
    http: Client,
    kv: KeyValueStore,
    token: RwLock<Option<String>>,
}

impl RemoteClient {
    /// Builds a client, restoring a previously persisted token.
    pub async fn restore(base_url: &str, kv: KeyValueStore) -> Self {
        let token = match kv.get(TOKEN_KEY).await {
            Ok(token) => token.filter(|value| !value.is_empty()),
            Err(err) => {
                error!("failed to read stored token: {err}");
                None
            }
        };
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
            kv,
            token: RwLock::new(token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn set_token(&self, token: &str) -> Result<()> {
        *self.token.write().await = Some(token.to_string());
        self.kv.set(TOKEN_KEY, token).await
    }

    pub async fn clear_token(&self) -> Result<()> {
        *self.token.write().await = None;
        self.kv.remove(TOKEN_KEY).await
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "api request");
        let mut req = self.http.request(method, url);
        if let Some(token) = self.token.read().await.as_deref() {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send(&self, req: RequestBuilder) -> Result<Vec<u8>> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(AppError::from_response(status.as_u16(), &body));
        }
        Ok(body.to_vec())
    }

    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let body = self.send(req).await?;
        serde_json::from_slice(&body).map_err(|err| AppError::Decode {
            message: err.to_string(),
        })
    }

    // Auth

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse> {
        let payload = RegisterPayload {
            name,
            email,
            password,
        };
        let req = self.request(Method::POST, "/auth/register").await.json(&payload);
        let response: AuthResponse = self.execute(req).await?;
        self.set_token(&response.token).await?;
        Ok(response)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let payload = LoginPayload { email, password };
        let req = self.request(Method::POST, "/auth/login").await.json(&payload);
        let response: AuthResponse = self.execute(req).await?;
        self.set_token(&response.token).await?;
        Ok(response)
    }

    // Intake

    pub async fn add_intake(&self, amount_ml: u32, timestamp: i64) -> Result<IntakeLog> {
        let payload = IntakeLogPayload {
            amount_ml,
            timestamp,
        };
        let req = self.request(Method::POST, "/intake").await.json(&payload);
        self.execute(req).await
    }

    pub async fn get_intake_logs(&self, limit: u32, offset: u32) -> Result<IntakeLogsResponse> {
        let path = format!("/intake?limit={limit}&offset={offset}");
        let req = self.request(Method::GET, &path).await;
        self.execute(req).await
    }

    pub async fn delete_intake(&self, id: &str) -> Result<()> {
        let req = self.request(Method::DELETE, &format!("/intake/{id}")).await;
        self.send(req).await?;
        Ok(())
    }

    // Settings

    pub async fn get_settings(&self) -> Result<UserSettings> {
        let req = self.request(Method::GET, "/user/settings").await;
        self.execute(req).await
    }

    pub async fn update_settings(&self, update: &UserSettingsUpdate) -> Result<UserSettings> {
        let req = self.request(Method::PUT, "/user/settings").await.json(update);
        self.execute(req).await
    }

    // Stats

    pub async fn get_stats(&self) -> Result<StatsOverview> {
        let req = self.request(Method::GET, "/stats/overview").await;
        self.execute(req).await
    }

    pub async fn health_check(&self) -> Result<HealthStatus> {
        let req = self.request(Method::GET, "/health").await;
        self.execute(req).await
    }
}
