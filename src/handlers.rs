use crate::app::App;
use crate::cli::{Command, SettingsCommand};
use crate::errors::{AppError, Result};
use crate::export::export_filename;
use crate::models::{Language, Theme, UserSettingsUpdate};
use crate::state::{Phase, Screen};
use crate::stats;
use crate::ui;
use chrono::Local;
use std::path::PathBuf;
use tokio::fs;

/// Runs one command against a mounted app and returns the text to print.
pub async fn run(app: &mut App, command: Command) -> Result<String> {
    let needs_session = !matches!(
        command,
        Command::Login { .. } | Command::Register { .. } | Command::Health
    );
    if needs_session && app.state().phase == Phase::Unauthenticated {
        return Err(AppError::NotAuthenticated);
    }

    match command {
        Command::Login { email, password } => {
            app.login(&email, &password).await?;
            Ok(welcome(app))
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            app.register(&name, &email, &password).await?;
            Ok(welcome(app))
        }
        Command::Health => {
            app.ensure_online()?;
            let health = app.client().health_check().await?;
            Ok(format!("{}: {}", app.client().base_url(), health.status))
        }
        Command::Status => Ok(status(app)),
        Command::Add {
            amount_ml,
            duration,
        } => {
            app.add_log(amount_ml, duration).await?;
            Ok(status(app))
        }
        Command::Quick { slot } => {
            app.quick_add(slot.checked_sub(1).unwrap_or(usize::MAX)).await?;
            Ok(status(app))
        }
        Command::History => {
            app.navigate(Screen::History);
            Ok(ui::render_history(app.state(), &Local))
        }
        Command::Stats => {
            app.navigate(Screen::Stats);
            let overview = app.stats().await;
            let now = Local::now();
            let state = app.state();
            Ok(ui::render_stats(
                &overview,
                &stats::last_7_days(&state.logs, &now),
                stats::total_all_time(&state.logs),
                state.settings.language,
            ))
        }
        Command::Settings { command } => {
            app.navigate(Screen::Settings);
            if let Some(SettingsCommand::Set {
                goal,
                interval,
                notifications,
                language,
                theme,
            }) = command
            {
                let update = UserSettingsUpdate {
                    daily_goal_ml: goal,
                    reminder_interval_minutes: interval,
                    notifications_enabled: notifications,
                    language: language.as_deref().map(str::parse::<Language>).transpose()?,
                    theme: theme.as_deref().map(str::parse::<Theme>).transpose()?,
                };
                app.update_settings(update).await?;
            }
            Ok(with_error(app, ui::render_settings(&app.state().settings)))
        }
        Command::Language => {
            app.toggle_language().await?;
            Ok(with_error(app, ui::render_settings(&app.state().settings)))
        }
        Command::Logout => {
            app.logout().await?;
            Ok("Logged out.".to_string())
        }
        Command::Delete { id } => {
            app.delete_log(&id).await?;
            Ok(with_error(app, format!("Deleted {id}.")))
        }
        Command::Export { output } => {
            let path = output
                .unwrap_or_else(|| PathBuf::from(export_filename(Local::now().date_naive())));
            fs::write(&path, app.export_csv())
                .await
                .map_err(|err| AppError::storage(&path.display().to_string(), err))?;
            Ok(format!("Exported {} entries to {}", app.state().logs.len(), path.display()))
        }
    }
}

fn welcome(app: &App) -> String {
    let state = app.state();
    let name = state
        .user
        .as_ref()
        .map(|user| user.name.as_str())
        .unwrap_or("");
    format!("Logged in as {name}.\n\n{}", status(app))
}

fn status(app: &App) -> String {
    ui::render_dashboard(app.state(), &Local::now())
}

fn with_error(app: &App, mut out: String) -> String {
    if let Some(error) = &app.state().error {
        out.push_str(&format!("\n! {error}"));
    }
    out
}
