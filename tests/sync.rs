mod common;

use common::{EMAIL, Harness, MockApi, PASSWORD, TOKEN};
use hydrotime::{
    AppError, Mode, Phase, Screen,
    models::{IntakeLog, Language, MonthlyStatus, UserSettings, UserSettingsUpdate},
};
use serde_json::json;

#[tokio::test]
async fn synced_mode_without_session_requires_login() {
    let api = MockApi::default();
    let harness = Harness::new(&api).await;
    let mut app = harness.app(Mode::Synced).await;

    app.mount().await;
    assert_eq!(app.state().phase, Phase::Unauthenticated);

    let err = app.add_log(250, 0).await.unwrap_err();
    assert!(matches!(err, AppError::NotAuthenticated));
    assert!(app.state().logs.is_empty());
}

#[tokio::test]
async fn local_only_mode_reads_and_writes_local_store() {
    let api = MockApi::default();
    let harness = Harness::new(&api).await;
    let existing = IntakeLog::new_local(400, 0, 1_700_000_000_000).unwrap();
    harness.local().write_logs(std::slice::from_ref(&existing)).await.unwrap();

    let mut app = harness.app(Mode::LocalOnly).await;
    app.mount().await;
    assert_eq!(app.state().phase, Phase::Ready);
    assert_eq!(app.state().logs, vec![existing.clone()]);

    let added = app.add_log(250, 15).await.unwrap();
    assert_eq!(app.state().logs[0], added);

    let stored = harness.local().read_logs().await;
    assert_eq!(stored, vec![added, existing]);
    assert_eq!(api.state.lock().await.intake_posts, 0);
}

#[tokio::test]
async fn authenticated_mount_loads_remote_data() {
    let api = MockApi::default();
    api.state.lock().await.logs = vec![
        json!({ "id": 7, "timestamp": 1_700_000_000_000i64, "amountMl": 300 }),
        json!({ "id": 8, "timestamp": 1_700_000_500_000i64, "amountMl": 200 }),
    ];
    let harness = Harness::new(&api).await;
    harness.client().await.set_token(TOKEN).await.unwrap();

    let mut app = harness.app(Mode::Synced).await;
    app.mount().await;

    let state = app.state();
    assert_eq!(state.phase, Phase::Ready);
    assert!(!state.using_local_data);
    assert_eq!(state.settings.daily_goal_ml, 3000);
    assert_eq!(state.settings.language, Language::EnUs);
    let ids: Vec<&str> = state.logs.iter().map(|log| log.id.as_str()).collect();
    assert_eq!(ids, vec!["8", "7"]);
}

#[tokio::test]
async fn remote_failure_on_load_falls_back_to_local_and_stays_local() {
    let api = MockApi::default();
    api.state.lock().await.fail_settings = true;
    let harness = Harness::new(&api).await;
    harness.client().await.set_token(TOKEN).await.unwrap();
    let local_settings = UserSettings {
        daily_goal_ml: 1800,
        ..UserSettings::default()
    };
    harness.local().write_settings(&local_settings).await.unwrap();

    let mut app = harness.app(Mode::Synced).await;
    app.mount().await;
    assert_eq!(app.state().phase, Phase::Ready);
    assert!(app.state().using_local_data);
    assert_eq!(app.state().settings, local_settings);
    assert!(!app.remote_is_authoritative().await);

    app.add_log(300, 0).await.unwrap();
    assert_eq!(api.state.lock().await.intake_posts, 0);
    assert_eq!(harness.local().read_logs().await.len(), 1);
    assert!(app.state().error.is_none());

    let id = app.state().logs[0].id.clone();
    assert!(matches!(
        app.delete_log(&id).await,
        Err(AppError::InvalidInput(_))
    ));
    assert_eq!(app.state().logs.len(), 1);
    assert!(api.state.lock().await.deleted.is_empty());
}

#[tokio::test]
async fn failed_remote_write_keeps_optimistic_entry() {
    let api = MockApi::default();
    let harness = Harness::new(&api).await;
    harness.client().await.set_token(TOKEN).await.unwrap();

    let mut app = harness.app(Mode::Synced).await;
    app.mount().await;
    api.state.lock().await.fail_writes = true;

    let entry = app.add_log(500, 0).await.unwrap();
    assert_eq!(app.state().logs, vec![entry]);
    assert_eq!(app.state().error.as_deref(), Some("API Error: 500"));
    assert_eq!(api.state.lock().await.intake_posts, 1);
    // Remote is authoritative, so nothing lands in the local store.
    assert!(harness.local().read_logs().await.is_empty());

    app.clear_error();
    assert!(app.state().error.is_none());
}

#[tokio::test]
async fn successful_remote_write_adopts_server_id() {
    let api = MockApi::default();
    let harness = Harness::new(&api).await;
    harness.client().await.set_token(TOKEN).await.unwrap();

    let mut app = harness.app(Mode::Synced).await;
    app.mount().await;
    app.navigate(Screen::History);

    let created = app.add_log_at(250, 40, 1_700_000_000_000).await.unwrap();
    assert_eq!(created.id, "101");
    assert_eq!(created.duration_seconds, 40);
    assert_eq!(app.state().logs, vec![created]);
    assert_eq!(app.state().screen, Screen::Dashboard);
}

#[tokio::test]
async fn invalid_amount_is_rejected_before_any_write() {
    let api = MockApi::default();
    let harness = Harness::new(&api).await;
    let mut app = harness.app(Mode::LocalOnly).await;
    app.mount().await;

    assert!(matches!(app.add_log(0, 0).await, Err(AppError::InvalidInput(_))));
    assert!(matches!(app.quick_add(9).await, Err(AppError::InvalidInput(_))));
    assert!(app.state().logs.is_empty());

    let quick = app.quick_add(2).await.unwrap();
    assert_eq!(quick.amount_ml, 300);
}

#[tokio::test]
async fn login_failure_is_reported_on_form() {
    let api = MockApi::default();
    let harness = Harness::new(&api).await;
    let mut app = harness.app(Mode::Synced).await;
    app.mount().await;

    assert!(app.login(EMAIL, "nope").await.is_err());
    assert_eq!(app.state().phase, Phase::Unauthenticated);
    assert_eq!(app.state().auth_error.as_deref(), Some("Invalid credentials"));

    app.login(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(app.state().phase, Phase::Ready);
    assert!(app.state().auth_error.is_none());
    assert_eq!(app.state().user.as_ref().map(|user| user.name.as_str()), Some("Ana"));
    assert_eq!(app.state().settings.daily_goal_ml, 3000);
}

#[tokio::test]
async fn logout_resets_in_memory_state() {
    let api = MockApi::default();
    let harness = Harness::new(&api).await;
    let mut app = harness.app(Mode::Synced).await;
    app.mount().await;
    app.login(EMAIL, PASSWORD).await.unwrap();
    app.add_log(200, 0).await.unwrap();

    app.logout().await.unwrap();
    let state = app.state();
    assert_eq!(state.phase, Phase::Unauthenticated);
    assert!(state.logs.is_empty());
    assert!(state.user.is_none());
    assert_eq!(state.settings, UserSettings::default());
    assert!(!app.auth().is_authenticated().await);
}

#[tokio::test]
async fn settings_changes_go_to_authoritative_store() {
    let api = MockApi::default();
    let harness = Harness::new(&api).await;
    harness.client().await.set_token(TOKEN).await.unwrap();
    let mut app = harness.app(Mode::Synced).await;
    app.mount().await;

    app.toggle_language().await.unwrap();
    assert_eq!(app.state().settings.language, Language::PtBr);
    assert_eq!(
        api.state.lock().await.settings_puts,
        vec![json!({ "language": "pt-BR" })]
    );
    assert_eq!(harness.local().read_settings().await, UserSettings::default());

    let err = app
        .update_settings(UserSettingsUpdate {
            daily_goal_ml: Some(0),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[tokio::test]
async fn local_settings_changes_are_persisted() {
    let api = MockApi::default();
    let harness = Harness::new(&api).await;
    let mut app = harness.app(Mode::LocalOnly).await;
    app.mount().await;

    app.update_settings(UserSettingsUpdate {
        daily_goal_ml: Some(2000),
        notifications_enabled: Some(true),
        ..Default::default()
    })
    .await
    .unwrap();

    let stored = harness.local().read_settings().await;
    assert_eq!(stored.daily_goal_ml, 2000);
    assert!(stored.notifications_enabled);
    assert_eq!(stored, app.state().settings);
}

#[tokio::test]
async fn delete_is_remote_only() {
    let api = MockApi::default();
    let harness = Harness::new(&api).await;

    let mut offline = harness.app(Mode::LocalOnly).await;
    offline.mount().await;
    let local = offline.add_log(100, 0).await.unwrap();
    assert!(matches!(
        offline.delete_log(&local.id).await,
        Err(AppError::InvalidInput(_))
    ));
    assert_eq!(offline.state().logs.len(), 1);

    harness.client().await.set_token(TOKEN).await.unwrap();
    let mut app = harness.app(Mode::Synced).await;
    app.mount().await;
    let created = app.add_log(250, 0).await.unwrap();
    app.delete_log(&created.id).await.unwrap();
    assert!(app.state().logs.is_empty());
    assert_eq!(api.state.lock().await.deleted, vec![created.id]);
}

#[tokio::test]
async fn stats_prefer_server_and_fall_back_locally() {
    let api = MockApi::default();
    let harness = Harness::new(&api).await;
    harness.client().await.set_token(TOKEN).await.unwrap();
    let mut app = harness.app(Mode::Synced).await;
    app.mount().await;

    let remote = app.stats().await;
    assert_eq!(remote.today_total, 1200);
    assert_eq!(remote.monthly_status, MonthlyStatus::Behind);

    let mut offline = harness.app(Mode::LocalOnly).await;
    offline.mount().await;
    offline.add_log(700, 0).await.unwrap();
    let local = offline.stats().await;
    assert_eq!(local.today_total, 700);
    assert_eq!(local.weekly_total, 700);
    assert_eq!(local.daily_goal, 2500);
    assert!(!local.daily_goal_met);
}

#[tokio::test]
async fn export_lists_every_entry() {
    let api = MockApi::default();
    let harness = Harness::new(&api).await;
    let mut app = harness.app(Mode::LocalOnly).await;
    app.mount().await;
    app.add_log(100, 0).await.unwrap();
    app.add_log(200, 0).await.unwrap();

    let csv = app.export_csv();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Date,Time,Amount (ml)");
    assert!(lines[1].ends_with(",200"));
    assert!(lines[2].ends_with(",100"));
}
