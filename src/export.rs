use crate::models::{IntakeLog, Language};
use crate::stats::{day_label, time_label};
use chrono::{NaiveDate, TimeZone};
use std::fmt::Display;

const HEADER: &str = "Date,Time,Amount (ml)";

/// Renders the logs as CSV, one row per entry in the order given.
pub fn to_csv<Tz: TimeZone>(logs: &[IntakeLog], language: Language, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let mut lines = Vec::with_capacity(logs.len() + 1);
    lines.push(HEADER.to_string());
    for log in logs {
        let Some(at) = tz.timestamp_millis_opt(log.timestamp).single() else {
            continue;
        };
        lines.push(format!(
            "{},{},{}",
            day_label(at.date_naive(), language),
            time_label(&at, language),
            log.amount_ml
        ));
    }
    lines.join("\n")
}

pub fn export_filename(today: NaiveDate) -> String {
    format!("hydrotime_export_{}.csv", today.format("%Y-%m-%d"))
}
