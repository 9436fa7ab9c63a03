use crate::auth::AuthGate;
use crate::config::{Config, Mode};
use crate::errors::{AppError, Result};
use crate::export;
use crate::models::{
    IntakeLog, QUICK_ADD_AMOUNTS, StatsOverview, UserSettingsUpdate, validate_amount,
};
use crate::remote::{DEFAULT_PAGE_LIMIT, RemoteClient};
use crate::state::{AppState, Phase, Screen};
use crate::stats::build_overview;
use crate::storage::{KeyValueStore, LocalStore};
use chrono::{Local, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Orchestrates the local store, remote client and auth gate behind the
/// state the presentation layer renders.
///
/// Mutations update in-memory state first and are not rolled back when the
/// authoritative store rejects them; the failure only sets `state.error`.
pub struct App {
    mode: Mode,
    local: LocalStore,
    auth: AuthGate,
    state: AppState,
}

impl App {
    pub async fn new(config: &Config) -> Self {
        let kv = KeyValueStore::new(&config.data_dir);
        let client = Arc::new(RemoteClient::restore(&config.api_url, kv.clone()).await);
        Self::from_parts(config.mode, LocalStore::new(kv.clone()), AuthGate::new(kv, client))
    }

    pub fn from_parts(mode: Mode, local: LocalStore, auth: AuthGate) -> Self {
        Self {
            mode,
            local,
            auth,
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn auth(&self) -> &AuthGate {
        &self.auth
    }

    pub fn client(&self) -> &RemoteClient {
        self.auth.client()
    }

    pub fn navigate(&mut self, screen: Screen) {
        self.state.screen = screen;
    }

    pub fn clear_error(&mut self) {
        self.state.error = None;
    }

    /// True when writes go to the API rather than the local store.
    pub async fn remote_is_authoritative(&self) -> bool {
        self.mode == Mode::Synced
            && !self.state.using_local_data
            && self.auth.is_authenticated().await
    }

    pub async fn mount(&mut self) {
        self.state.phase = Phase::Loading;

        if self.mode == Mode::LocalOnly {
            self.load_local().await;
            return;
        }

        if self.auth.is_authenticated().await {
            self.state.user = self.auth.get_stored_user().await;
            self.load_remote().await;
        } else {
            self.state.phase = Phase::Unauthenticated;
        }
    }

    async fn load_local(&mut self) {
        self.state.logs = self.local.read_logs().await;
        self.state.settings = self.local.read_settings().await;
        self.state.phase = Phase::Ready;
    }

    async fn load_remote(&mut self) {
        let client = self.auth.client();
        let (logs, settings) = tokio::join!(
            client.get_intake_logs(DEFAULT_PAGE_LIMIT, 0),
            client.get_settings()
        );

        match (logs, settings) {
            (Ok(page), Ok(settings)) => {
                let mut logs = page.intake_logs;
                logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                self.state.logs = logs;
                self.state.settings = settings;
                self.state.using_local_data = false;
                self.state.phase = Phase::Ready;
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!("remote load failed, using local data: {err}");
                self.load_local().await;
                self.state.using_local_data = true;
            }
        }
    }

    /// Rejects operations that need the API when running offline.
    pub fn ensure_online(&self) -> Result<()> {
        if self.mode == Mode::LocalOnly {
            return Err(AppError::invalid("the server is not used in offline mode"));
        }
        Ok(())
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        self.ensure_online()?;
        self.state.auth_error = None;
        match self.auth.login(email, password).await {
            Ok(user) => {
                self.state.user = Some(user);
                self.state.using_local_data = false;
                self.load_remote().await;
                Ok(())
            }
            Err(err) => {
                self.state.auth_error = Some(err.to_string());
                self.state.phase = Phase::Unauthenticated;
                Err(err)
            }
        }
    }

    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> Result<()> {
        self.ensure_online()?;
        self.state.auth_error = None;
        match self.auth.register(name, email, password).await {
            Ok(user) => {
                self.state.user = Some(user);
                self.state.using_local_data = false;
                self.load_remote().await;
                Ok(())
            }
            Err(err) => {
                self.state.auth_error = Some(err.to_string());
                self.state.phase = Phase::Unauthenticated;
                Err(err)
            }
        }
    }

    pub async fn logout(&mut self) -> Result<()> {
        self.auth.logout().await?;
        self.state.reset_data();
        self.state.screen = Screen::Dashboard;
        if self.mode == Mode::LocalOnly {
            self.load_local().await;
        } else {
            self.state.phase = Phase::Unauthenticated;
        }
        Ok(())
    }

    fn ensure_ready(&self) -> Result<()> {
        match self.state.phase {
            Phase::Ready => Ok(()),
            Phase::Unauthenticated => Err(AppError::NotAuthenticated),
            Phase::Loading => Err(AppError::invalid("data is still loading")),
        }
    }

    pub async fn add_log(&mut self, amount_ml: u32, duration_seconds: u32) -> Result<IntakeLog> {
        self.add_log_at(amount_ml, duration_seconds, Utc::now().timestamp_millis())
            .await
    }

    pub async fn add_log_at(
        &mut self,
        amount_ml: u32,
        duration_seconds: u32,
        timestamp: i64,
    ) -> Result<IntakeLog> {
        validate_amount(amount_ml)?;
        self.ensure_ready()?;

        let entry = IntakeLog::new_local(amount_ml, duration_seconds, timestamp)?;
        self.state.logs.insert(0, entry.clone());
        self.state.screen = Screen::Dashboard;

        if self.remote_is_authoritative().await {
            match self.auth.client().add_intake(amount_ml, timestamp).await {
                Ok(mut created) => {
                    if created.duration_seconds == 0 {
                        created.duration_seconds = duration_seconds;
                    }
                    if let Some(slot) = self.state.logs.iter_mut().find(|log| log.id == entry.id) {
                        *slot = created.clone();
                    }
                    return Ok(created);
                }
                Err(err) => {
                    error!("failed to save intake remotely: {err}");
                    self.state.error = Some(err.to_string());
                }
            }
        } else if let Err(err) = self.local.write_logs(&self.state.logs).await {
            error!("failed to save intake locally: {err}");
            self.state.error = Some(err.to_string());
        }

        Ok(entry)
    }

    pub async fn quick_add(&mut self, index: usize) -> Result<IntakeLog> {
        let amount = QUICK_ADD_AMOUNTS.get(index).copied().ok_or_else(|| {
            AppError::invalid(format!(
                "quick-add slot must be between 1 and {}",
                QUICK_ADD_AMOUNTS.len()
            ))
        })?;
        self.add_log(amount, 0).await
    }

    pub async fn update_settings(&mut self, update: UserSettingsUpdate) -> Result<()> {
        update.validate()?;
        self.ensure_ready()?;
        if update.is_empty() {
            return Ok(());
        }

        self.state.settings.apply(&update);

        if self.remote_is_authoritative().await {
            match self.auth.client().update_settings(&update).await {
                Ok(settings) => self.state.settings = settings,
                Err(err) => {
                    error!("failed to save settings remotely: {err}");
                    self.state.error = Some(err.to_string());
                }
            }
        } else if let Err(err) = self.local.write_settings(&self.state.settings).await {
            error!("failed to save settings locally: {err}");
            self.state.error = Some(err.to_string());
        }
        Ok(())
    }

    pub async fn toggle_language(&mut self) -> Result<()> {
        let update = UserSettingsUpdate {
            language: Some(self.state.settings.language.toggled()),
            ..Default::default()
        };
        self.update_settings(update).await
    }

    /// Deletes an entry from the remote store. Local-only entries cannot be deleted.
    pub async fn delete_log(&mut self, id: &str) -> Result<()> {
        self.ensure_ready()?;
        self.ensure_online()?;
        if !self.auth.is_authenticated().await {
            return Err(AppError::NotAuthenticated);
        }
        if self.state.using_local_data {
            return Err(AppError::invalid(
                "server data is unavailable; entries can only be deleted from the server",
            ));
        }

        self.state.logs.retain(|log| log.id != id);
        if let Err(err) = self.auth.client().delete_intake(id).await {
            error!("failed to delete intake {id}: {err}");
            self.state.error = Some(err.to_string());
        } else {
            info!(id, "deleted intake");
        }
        Ok(())
    }

    /// Server overview when the API is authoritative, local aggregate otherwise.
    pub async fn stats(&self) -> StatsOverview {
        if self.remote_is_authoritative().await {
            match self.auth.client().get_stats().await {
                Ok(overview) => return overview,
                Err(err) => warn!("remote stats unavailable, computing locally: {err}"),
            }
        }
        build_overview(&self.state.logs, &self.state.settings)
    }

    pub fn export_csv(&self) -> String {
        export::to_csv(&self.state.logs, self.state.settings.language, &Local)
    }
}
