//! Weekly report generation.
//!
//! Pure functions over already-loaded daily logs:
//! - Per-day summaries
//! - Caloric balance over the days actually logged
//! - 7-day window aggregation

use crate::macros::{round1, sum_totals};
use crate::{DailyLog, DaySummary, UserSettings, WeeklyReport};
use chrono::{Duration, Local, NaiveDate};

/// Length of a report window in days, inclusive of both ends
pub const WEEK_DAYS: i64 = 7;

/// Summarize a single day's log
pub fn summarize_day(log: &DailyLog) -> DaySummary {
    let totals = sum_totals(&log.entries);

    DaySummary {
        log_date: log.log_date,
        total_calories: totals.calories,
        total_protein: round1(totals.protein),
        total_carbs: round1(totals.carbs),
        total_fat: round1(totals.fat),
        entry_count: log.entries.len(),
    }
}

/// Net calories over a period: intake minus `days * resting_energy`
///
/// Positive is a surplus, negative a deficit.
pub fn caloric_balance(total_calories: i64, days: i64, resting_energy: i64) -> i64 {
    total_calories - days * resting_energy
}

/// Default report start: six days before `today`, so the window ends today
///
/// Clamped to `NaiveDate::MIN` at the bottom of the calendar.
pub fn default_week_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_signed(Duration::days(WEEK_DAYS - 1))
        .unwrap_or(NaiveDate::MIN)
}

/// Last day of the week starting at `week_start`, clamped to `NaiveDate::MAX`
pub fn week_end(week_start: NaiveDate) -> NaiveDate {
    week_start
        .checked_add_signed(Duration::days(WEEK_DAYS - 1))
        .unwrap_or(NaiveDate::MAX)
}

/// Generate a weekly report, defaulting the window to the week ending today
pub fn generate_weekly_report(
    logs: &[DailyLog],
    settings: &UserSettings,
    week_start: Option<NaiveDate>,
) -> WeeklyReport {
    generate_weekly_report_at(logs, settings, week_start, Local::now().date_naive())
}

/// Generate a weekly report with an explicit notion of "today"
///
/// Logs outside `[week_start, week_start + 6]` are dropped. Days without a log
/// are omitted rather than zero-filled, and the resting energy baseline is
/// multiplied by the number of days logged, not by seven.
///
/// Weekly macro totals are summed from the per-day values (already rounded to
/// one decimal) and rounded again.
pub fn generate_weekly_report_at(
    logs: &[DailyLog],
    settings: &UserSettings,
    week_start: Option<NaiveDate>,
    today: NaiveDate,
) -> WeeklyReport {
    let week_start = week_start.unwrap_or_else(|| default_week_start(today));
    let week_end = week_end(week_start);

    let mut week_logs: Vec<&DailyLog> = logs
        .iter()
        .filter(|log| week_start <= log.log_date && log.log_date <= week_end)
        .collect();
    // Stable, so equal dates keep their input order
    week_logs.sort_by_key(|log| log.log_date);

    let daily_summaries: Vec<DaySummary> = week_logs.into_iter().map(summarize_day).collect();

    let total_calories: i64 = daily_summaries.iter().map(|s| s.total_calories).sum();
    let total_protein: f64 = daily_summaries.iter().map(|s| s.total_protein).sum();
    let total_carbs: f64 = daily_summaries.iter().map(|s| s.total_carbs).sum();
    let total_fat: f64 = daily_summaries.iter().map(|s| s.total_fat).sum();
    let days_logged = daily_summaries.len();

    let avg_daily_calories = if days_logged > 0 {
        round1(total_calories as f64 / days_logged as f64)
    } else {
        0.0
    };

    let fat_added = caloric_balance(
        total_calories,
        days_logged as i64,
        i64::from(settings.resting_energy),
    );

    tracing::debug!(
        "Weekly report {}..{}: {} days logged, balance {}",
        week_start,
        week_end,
        days_logged,
        fat_added
    );

    WeeklyReport {
        week_start,
        week_end,
        daily_summaries,
        total_calories,
        avg_daily_calories,
        total_protein: round1(total_protein),
        total_carbs: round1(total_carbs),
        total_fat: round1(total_fat),
        fat_added,
        days_logged,
    }
}

impl WeeklyReport {
    /// One-line reading of the caloric balance
    ///
    /// A zero balance reads "Caloric balance over N days", never
    /// "Caloric deficit of 0 calories".
    pub fn interpretation(&self) -> String {
        match self.fat_added {
            n if n > 0 => format!(
                "Caloric surplus of {} calories over {} days",
                n, self.days_logged
            ),
            n if n < 0 => format!(
                "Caloric deficit of {} calories over {} days",
                n.abs(),
                self.days_logged
            ),
            _ => format!("Caloric balance over {} days", self.days_logged),
        }
    }
}
