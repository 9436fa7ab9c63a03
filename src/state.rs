use crate::models::{AuthUser, IntakeLog, UserSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Unauthenticated,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Dashboard,
    History,
    Stats,
    Settings,
}

/// Everything the presentation layer renders from.
#[derive(Debug, Clone)]
pub struct AppState {
    pub phase: Phase,
    pub screen: Screen,
    /// Newest first.
    pub logs: Vec<IntakeLog>,
    pub settings: UserSettings,
    pub user: Option<AuthUser>,
    /// Set when the remote load failed and local data is shown instead.
    pub using_local_data: bool,
    /// Soft, non-blocking failure of the last mutating action.
    pub error: Option<String>,
    /// Login/registration failure shown on the login form.
    pub auth_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            phase: Phase::Loading,
            screen: Screen::default(),
            logs: Vec::new(),
            settings: UserSettings::default(),
            user: None,
            using_local_data: false,
            error: None,
            auth_error: None,
        }
    }
}

impl AppState {
    pub fn reset_data(&mut self) {
        self.logs.clear();
        self.settings = UserSettings::default();
        self.user = None;
        self.using_local_data = false;
        self.error = None;
    }
}
