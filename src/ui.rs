use crate::models::{Language, MonthlyStatus, QUICK_ADD_AMOUNTS, StatsOverview, UserSettings};
use crate::state::AppState;
use crate::stats::{self, DailyPoint};
use chrono::{DateTime, Datelike, TimeZone, Weekday};
use std::fmt::{Display, Write};

pub struct Labels {
    pub daily_progress: &'static str,
    pub history: &'static str,
    pub no_records: &'static str,
    pub start_tracking: &'static str,
    pub total: &'static str,
    pub duration: &'static str,
    pub statistics: &'static str,
    pub last_7_days: &'static str,
    pub total_all_time: &'static str,
    pub settings: &'static str,
    pub daily_goal: &'static str,
    pub notifications: &'static str,
    pub reminder_interval: &'static str,
    pub language: &'static str,
    pub theme: &'static str,
    pub overview: &'static str,
    pub monthly_total: &'static str,
    pub goal_met: &'static str,
    pub keep_going: &'static str,
    pub on_track: &'static str,
    pub behind: &'static str,
    pub quick_add: &'static str,
    pub using_local_data: &'static str,
    pub login_required: &'static str,
    pub on: &'static str,
    pub off: &'static str,
    pub next_reminder: &'static str,
    pub reminder_due: &'static str,
}

static EN_US: Labels = Labels {
    daily_progress: "Daily Progress",
    history: "History",
    no_records: "No records found.",
    start_tracking: "Start tracking your hydration!",
    total: "Total",
    duration: "Duration",
    statistics: "Statistics",
    last_7_days: "Last 7 Days",
    total_all_time: "Total All Time",
    settings: "Settings",
    daily_goal: "Daily Goal (ml)",
    notifications: "Notifications",
    reminder_interval: "Interval (minutes)",
    language: "Language",
    theme: "Theme",
    overview: "Overview",
    monthly_total: "Current Month",
    goal_met: "Goal Met!",
    keep_going: "Keep Going",
    on_track: "On Track",
    behind: "Behind",
    quick_add: "Quick add",
    using_local_data: "Server unavailable, showing local data.",
    login_required: "Not logged in. Run `hydrotime login` or use --offline.",
    on: "on",
    off: "off",
    next_reminder: "Next reminder",
    reminder_due: "Time to drink water!",
};

static PT_BR: Labels = Labels {
    daily_progress: "Progresso Diário",
    history: "Histórico",
    no_records: "Nenhum registro encontrado.",
    start_tracking: "Comece a monitorar sua hidratação!",
    total: "Total",
    duration: "Duração",
    statistics: "Estatísticas",
    last_7_days: "Últimos 7 Dias",
    total_all_time: "Total Acumulado",
    settings: "Configurações",
    daily_goal: "Meta Diária (ml)",
    notifications: "Notificações",
    reminder_interval: "Intervalo (minutos)",
    language: "Idioma",
    theme: "Tema",
    overview: "Resumo",
    monthly_total: "Mês Atual",
    goal_met: "Meta Batida!",
    keep_going: "Continue assim",
    on_track: "No Ritmo",
    behind: "Atrasado",
    quick_add: "Adição rápida",
    using_local_data: "Servidor indisponível, exibindo dados locais.",
    login_required: "Sem sessão. Use `hydrotime login` ou --offline.",
    on: "ligado",
    off: "desligado",
    next_reminder: "Próximo lembrete",
    reminder_due: "Hora de beber água!",
};

pub fn labels(language: Language) -> &'static Labels {
    match language {
        Language::EnUs => &EN_US,
        Language::PtBr => &PT_BR,
    }
}

pub fn render_dashboard<Tz: TimeZone>(state: &AppState, now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    let t = labels(state.settings.language);
    let today = stats::today_total(&state.logs, now);
    let goal = stats::effective_goal(state.settings.daily_goal_ml);
    let status = if stats::goal_met(today, goal) {
        t.goal_met
    } else {
        t.keep_going
    };
    let quick = QUICK_ADD_AMOUNTS
        .iter()
        .enumerate()
        .map(|(slot, amount)| format!("[{}] {amount} ml", slot + 1))
        .collect::<Vec<_>>()
        .join("  ");

    let mut out = DASHBOARD_TEMPLATE
        .replace("{{TITLE}}", t.daily_progress)
        .replace("{{TODAY}}", &today.to_string())
        .replace("{{GOAL}}", &goal.to_string())
        .replace("{{PERCENT}}", &format!("{:.0}", stats::progress_percent(today, goal)))
        .replace("{{BAR}}", &progress_bar(stats::progress_percent(today, goal)))
        .replace("{{STATUS}}", status)
        .replace("{{QUICK_LABEL}}", t.quick_add)
        .replace("{{QUICK}}", &quick);
    if let Some(due) = stats::next_reminder(&state.logs, &state.settings, &now.timezone()) {
        if due <= *now {
            let _ = write!(out, "\n\n{}", t.reminder_due);
        } else {
            let time = stats::time_label(&due, state.settings.language);
            let _ = write!(out, "\n\n{}: {time}", t.next_reminder);
        }
    }
    push_notices(&mut out, state);
    out
}

pub fn render_history<Tz: TimeZone>(state: &AppState, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let language = state.settings.language;
    let t = labels(language);
    let mut out = format!("{}\n", t.history);

    let groups = stats::group_by_day(&state.logs, tz, language);
    if groups.is_empty() {
        let _ = writeln!(out, "  {}\n  {}", t.no_records, t.start_tracking);
        return out;
    }

    for group in groups {
        let _ = writeln!(out, "\n{}  ({}: {} ml)", group.label, t.total, group.total);
        for log in group.entries {
            let Some(at) = tz.timestamp_millis_opt(log.timestamp).single() else {
                continue;
            };
            let _ = write!(
                out,
                "  {}  {:>5} ml  [{}]",
                stats::time_label(&at, language),
                log.amount_ml,
                log.id
            );
            if log.duration_seconds > 0 {
                let _ = write!(out, "  {}: {}s", t.duration, log.duration_seconds);
            }
            out.push('\n');
        }
    }
    out
}

pub fn render_stats(
    overview: &StatsOverview,
    last_7_days: &[DailyPoint],
    total_all_time: u64,
    language: Language,
) -> String {
    let t = labels(language);
    let status = match overview.monthly_status {
        MonthlyStatus::OnTrack => t.on_track,
        MonthlyStatus::Behind => t.behind,
    };
    let mut out = format!("{}\n\n{}\n", t.statistics, t.overview);
    let _ = writeln!(out, "  {:<16} {} ml", t.daily_progress, overview.today_total);
    let _ = writeln!(out, "  {:<16} {} ml", t.last_7_days, overview.weekly_total);
    let _ = writeln!(out, "  {:<16} {} ml ({status})", t.monthly_total, overview.monthly_total);
    let _ = writeln!(
        out,
        "  {:<16} {} ml ({})",
        t.daily_goal,
        overview.daily_goal,
        if overview.daily_goal_met { t.goal_met } else { t.keep_going }
    );

    let _ = writeln!(out, "\n{}", t.last_7_days);
    let peak = last_7_days.iter().map(|point| point.total).max().unwrap_or(0).max(1);
    for point in last_7_days {
        let width = (point.total * 20 / peak) as usize;
        let _ = writeln!(
            out,
            "  {} {:<5} {:<20} {}",
            weekday_label(point.date.weekday(), language),
            stats::day_label(point.date, language),
            "#".repeat(width),
            point.total
        );
    }

    let _ = writeln!(out, "\n{}: {:.1} L", t.total_all_time, total_all_time as f64 / 1000.0);
    out
}

pub fn render_settings(settings: &UserSettings) -> String {
    let t = labels(settings.language);
    let mut out = format!("{}\n", t.settings);
    let _ = writeln!(out, "  {:<22} {}", t.language, settings.language);
    let _ = writeln!(out, "  {:<22} {}", t.theme, settings.theme.as_str());
    let _ = writeln!(out, "  {:<22} {}", t.daily_goal, settings.daily_goal_ml);
    let _ = writeln!(
        out,
        "  {:<22} {}",
        t.notifications,
        if settings.notifications_enabled { t.on } else { t.off }
    );
    let _ = writeln!(out, "  {:<22} {}", t.reminder_interval, settings.reminder_interval_minutes);
    out
}

pub fn render_login_required(language: Language) -> String {
    labels(language).login_required.to_string()
}

fn push_notices(out: &mut String, state: &AppState) {
    let t = labels(state.settings.language);
    if state.using_local_data {
        let _ = write!(out, "\n! {}", t.using_local_data);
    }
    if let Some(error) = &state.error {
        let _ = write!(out, "\n! {error}");
    }
}

fn progress_bar(percent: f64) -> String {
    const WIDTH: usize = 30;
    let filled = ((percent / 100.0) * WIDTH as f64).round() as usize;
    format!("[{}{}]", "=".repeat(filled), " ".repeat(WIDTH - filled.min(WIDTH)))
}

fn weekday_label(day: Weekday, language: Language) -> &'static str {
    const EN: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    const PT: [&str; 7] = ["seg", "ter", "qua", "qui", "sex", "sáb", "dom"];
    let index = day.num_days_from_monday() as usize;
    match language {
        Language::EnUs => EN[index],
        Language::PtBr => PT[index],
    }
}

const DASHBOARD_TEMPLATE: &str = "{{TITLE}}
  {{TODAY}} / {{GOAL}} ml  ({{PERCENT}}%)
  {{BAR}}
  {{STATUS}}

{{QUICK_LABEL}}: {{QUICK}}";
