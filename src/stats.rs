//! Derived statistics over the in-memory intake log list.
//!
//! Everything here is recomputed from the full list on every call. Calendar
//! days are evaluated in the time zone of the `now` (or `tz`) argument.

use crate::models::{
    DEFAULT_DAILY_GOAL_ML, IntakeLog, Language, MonthlyStatus, StatsOverview, UserSettings,
};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone};

const WEEK_MS: i64 = 7 * 24 * 3600 * 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub label: String,
    pub entries: Vec<IntakeLog>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub total: u64,
}

pub fn effective_goal(goal: u32) -> u32 {
    if goal == 0 { DEFAULT_DAILY_GOAL_ML } else { goal }
}

pub fn today_total<Tz: TimeZone>(logs: &[IntakeLog], now: &DateTime<Tz>) -> u64 {
    let today = now.date_naive();
    let tz = now.timezone();
    sum(logs.iter().filter(|log| local_date(&tz, log.timestamp) == Some(today)))
}

/// Rolling 7×24h window ending at `now`, not aligned to calendar weeks.
pub fn weekly_total<Tz: TimeZone>(logs: &[IntakeLog], now: &DateTime<Tz>) -> u64 {
    let cutoff = now.timestamp_millis() - WEEK_MS;
    sum(logs.iter().filter(|log| log.timestamp >= cutoff))
}

pub fn monthly_total<Tz: TimeZone>(logs: &[IntakeLog], now: &DateTime<Tz>) -> u64 {
    let tz = now.timezone();
    let (year, month) = (now.year(), now.month());
    sum(logs.iter().filter(|log| {
        local_date(&tz, log.timestamp)
            .is_some_and(|date| date.year() == year && date.month() == month)
    }))
}

/// Linear pacing check: on track when the month so far averages the goal.
pub fn monthly_status(monthly_total: u64, daily_goal: u32, day_of_month: u32) -> MonthlyStatus {
    let expected = u64::from(day_of_month) * u64::from(daily_goal);
    if monthly_total >= expected {
        MonthlyStatus::OnTrack
    } else {
        MonthlyStatus::Behind
    }
}

pub fn goal_met(today_total: u64, goal: u32) -> bool {
    today_total >= u64::from(effective_goal(goal))
}

pub fn progress_percent(current: u64, goal: u32) -> f64 {
    let percent = current as f64 / f64::from(effective_goal(goal)) * 100.0;
    percent.clamp(0.0, 100.0)
}

pub fn total_all_time(logs: &[IntakeLog]) -> u64 {
    sum(logs.iter())
}

/// Groups entries by calendar day, most recent day first and newest entry
/// first within a day.
pub fn group_by_day<Tz: TimeZone>(
    logs: &[IntakeLog],
    tz: &Tz,
    language: Language,
) -> Vec<DayGroup> {
    let mut sorted = logs.to_vec();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut groups: Vec<DayGroup> = Vec::new();
    for log in sorted {
        let Some(date) = local_date(tz, log.timestamp) else {
            continue;
        };
        let label = day_label(date, language);
        match groups.iter_mut().find(|group| group.label == label) {
            Some(group) => {
                group.total += u64::from(log.amount_ml);
                group.entries.push(log);
            }
            None => groups.push(DayGroup {
                date,
                label,
                total: u64::from(log.amount_ml),
                entries: vec![log],
            }),
        }
    }
    groups
}

/// Seven daily totals, oldest first, ending with `now`'s day.
pub fn last_7_days<Tz: TimeZone>(logs: &[IntakeLog], now: &DateTime<Tz>) -> Vec<DailyPoint> {
    let today = now.date_naive();
    let tz = now.timezone();
    (0..7)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let total = sum(logs.iter().filter(|log| local_date(&tz, log.timestamp) == Some(date)));
            DailyPoint { date, total }
        })
        .collect()
}

pub fn build_overview(logs: &[IntakeLog], settings: &UserSettings) -> StatsOverview {
    build_overview_at(logs, settings, &Local::now())
}

pub fn build_overview_at<Tz: TimeZone>(
    logs: &[IntakeLog],
    settings: &UserSettings,
    now: &DateTime<Tz>,
) -> StatsOverview {
    let goal = effective_goal(settings.daily_goal_ml);
    let today = today_total(logs, now);
    let monthly = monthly_total(logs, now);
    StatsOverview {
        today_total: today,
        weekly_total: weekly_total(logs, now),
        monthly_total: monthly,
        daily_goal: goal,
        daily_goal_met: goal_met(today, goal),
        monthly_status: monthly_status(monthly, goal, now.day()),
    }
}

/// One reminder interval after the latest entry. `None` when notifications
/// are off or nothing has been logged.
pub fn next_reminder<Tz: TimeZone>(
    logs: &[IntakeLog],
    settings: &UserSettings,
    tz: &Tz,
) -> Option<DateTime<Tz>> {
    if !settings.notifications_enabled {
        return None;
    }
    let latest = logs.iter().map(|log| log.timestamp).max()?;
    let interval_ms = i64::from(settings.reminder_interval_minutes.max(1)) * 60_000;
    tz.timestamp_millis_opt(latest + interval_ms).single()
}

pub fn day_label(date: NaiveDate, language: Language) -> String {
    match language {
        Language::EnUs => format!("{}/{}/{}", date.month(), date.day(), date.year()),
        Language::PtBr => date.format("%d/%m/%Y").to_string(),
    }
}

pub fn time_label<Tz: TimeZone>(at: &DateTime<Tz>, language: Language) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match language {
        Language::EnUs => at.format("%I:%M %p").to_string(),
        Language::PtBr => at.format("%H:%M").to_string(),
    }
}

fn local_date<Tz: TimeZone>(tz: &Tz, timestamp: i64) -> Option<NaiveDate> {
    tz.timestamp_millis_opt(timestamp)
        .single()
        .map(|at| at.date_naive())
}

fn sum<'a>(logs: impl Iterator<Item = &'a IntakeLog>) -> u64 {
    logs.map(|log| u64::from(log.amount_ml)).sum()
}
