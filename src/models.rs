use crate::errors::AppError;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};
use uuid::Uuid;

pub const DEFAULT_DAILY_GOAL_ML: u32 = 2500;
pub const DEFAULT_REMINDER_INTERVAL_MINUTES: u32 = 60;
pub const QUICK_ADD_AMOUNTS: [u32; 4] = [100, 200, 300, 500];

/// One recorded water-intake event. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeLog {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub amount_ml: u32,
    #[serde(default)]
    pub duration_seconds: u32,
}

impl IntakeLog {
    /// Creates a local entry with a client-generated id.
    pub fn new_local(amount_ml: u32, duration_seconds: u32, timestamp: i64) -> Result<Self, AppError> {
        validate_amount(amount_ml)?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            timestamp,
            amount_ml,
            duration_seconds,
        })
    }
}

pub fn validate_amount(amount_ml: u32) -> Result<(), AppError> {
    if amount_ml == 0 {
        return Err(AppError::invalid("amount must be greater than zero"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en-US")]
    EnUs,
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::EnUs => "en-US",
            Language::PtBr => "pt-BR",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::EnUs => Language::PtBr,
            Language::PtBr => Language::EnUs,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "en-US" | "en" => Ok(Language::EnUs),
            "pt-BR" | "pt" => Ok(Language::PtBr),
            other => Err(AppError::invalid(format!(
                "unknown language '{other}' (expected en-US or pt-BR)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

impl FromStr for Theme {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(AppError::invalid(format!(
                "unknown theme '{other}' (expected light, dark or system)"
            ))),
        }
    }
}

/// Per-session settings. Missing fields deserialize to their defaults so
/// records written by older versions stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub daily_goal_ml: u32,
    pub reminder_interval_minutes: u32,
    pub notifications_enabled: bool,
    pub language: Language,
    pub theme: Theme,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            daily_goal_ml: DEFAULT_DAILY_GOAL_ML,
            reminder_interval_minutes: DEFAULT_REMINDER_INTERVAL_MINUTES,
            notifications_enabled: false,
            language: Language::default(),
            theme: Theme::default(),
        }
    }
}

impl UserSettings {
    /// Overlays each well-formed field of a stored record on the defaults.
    ///
    /// A field that is missing, `null` or of the wrong shape keeps its default
    /// without discarding its siblings.
    pub fn from_stored(stored: &Value) -> Self {
        let mut settings = Self::default();
        let Some(fields) = stored.as_object() else {
            return settings;
        };
        settings.apply(&UserSettingsUpdate {
            daily_goal_ml: stored_field(fields, "dailyGoalMl"),
            reminder_interval_minutes: stored_field(fields, "reminderIntervalMinutes"),
            notifications_enabled: stored_field(fields, "notificationsEnabled"),
            language: stored_field(fields, "language"),
            theme: stored_field(fields, "theme"),
        });
        settings
    }

    pub fn apply(&mut self, update: &UserSettingsUpdate) {
        if let Some(goal) = update.daily_goal_ml {
            self.daily_goal_ml = goal;
        }
        if let Some(interval) = update.reminder_interval_minutes {
            self.reminder_interval_minutes = interval;
        }
        if let Some(enabled) = update.notifications_enabled {
            self.notifications_enabled = enabled;
        }
        if let Some(language) = update.language {
            self.language = language;
        }
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
    }
}

/// Partial settings change; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_goal_ml: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_interval_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl UserSettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.daily_goal_ml == Some(0) {
            return Err(AppError::invalid("daily goal must be greater than zero"));
        }
        if self.reminder_interval_minutes == Some(0) {
            return Err(AppError::invalid("reminder interval must be greater than zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUser,
}

#[derive(Debug, Serialize)]
pub struct RegisterPayload<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct LoginPayload<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeLogPayload {
    pub amount_ml: u32,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeLogsResponse {
    pub intake_logs: Vec<IntakeLog>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonthlyStatus {
    OnTrack,
    Behind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub today_total: u64,
    pub weekly_total: u64,
    pub monthly_total: u64,
    pub daily_goal: u32,
    pub daily_goal_met: bool,
    pub monthly_status: MonthlyStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

fn stored_field<T: DeserializeOwned>(fields: &Map<String, Value>, key: &str) -> Option<T> {
    fields
        .get(key)
        .and_then(|value| T::deserialize(value).ok())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}
