//! Tool operations exposed to callers.
//!
//! Each method loads what it needs from the store, hands plain values to the
//! calculators, and returns a serializable response. A `Tools` value is bound
//! to one authenticated user; it holds no state beyond that binding.

use crate::logging::short_id;
use crate::macros::summarize;
use crate::reports::{default_week_start, generate_weekly_report_at, week_end};
use crate::{
    parse_log_date, CachedFood, DailyLog, DailySummary, Error, FoodEntry, FoodEntryUpdate,
    FoodLogStore, NewFood, Result, UserSettings,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

const NO_SETTINGS_WARNING: &str = "No settings configured. Use setup_user to see remaining goals.";

/// Default number of cached foods scanned per search
pub const DEFAULT_SEARCH_LIMIT: usize = 100;

// ============================================================================
// Responses
// ============================================================================

#[derive(Clone, Debug, Serialize)]
pub struct SetupResponse {
    pub settings: UserSettings,
    pub message: String,
}

/// A created or edited entry plus the day's summary
#[derive(Clone, Debug, Serialize)]
pub struct EntryResponse {
    pub entry: FoodEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_summary: Option<DailySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub entries_remaining: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_summary: Option<DailySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Goals {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: Option<u32>,
}

impl From<&UserSettings> for Goals {
    fn from(settings: &UserSettings) -> Self {
        Self {
            calories: settings.calorie_goal,
            protein: settings.protein_goal,
            carbs: settings.carb_goal,
            fat: settings.fat_goal,
        }
    }
}

/// One day's entries with goals and summary
#[derive(Clone, Debug, Serialize)]
pub struct DayResponse {
    pub date: NaiveDate,
    pub entries: Vec<FoodEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<Goals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<DailySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DayTotals {
    pub date: NaiveDate,
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub entry_count: usize,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WeeklyTotals {
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct WeeklyReportResponse {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days_logged: usize,
    pub daily_summaries: Vec<DayTotals>,
    pub weekly_totals: WeeklyTotals,
    pub avg_daily_calories: f64,
    pub fat_added: i64,
    pub interpretation: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct CacheAddResponse {
    pub food: CachedFood,
    pub message: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExportResponse {
    pub path: String,
    pub days: usize,
    pub entries: usize,
}

// ============================================================================
// Tools
// ============================================================================

/// The tool set, bound to one user
pub struct Tools<'a, S: FoodLogStore> {
    store: &'a S,
    user_id: String,
    today: NaiveDate,
    search_limit: usize,
}

impl<'a, S: FoodLogStore> Tools<'a, S> {
    /// Bind the tools to an authenticated user id
    pub fn new(store: &'a S, user_id: impl Into<String>) -> Self {
        Self {
            store,
            user_id: user_id.into(),
            today: Local::now().date_naive(),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Override what counts as "today"
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn summary_or_warning(
        &self,
        log: &DailyLog,
    ) -> Result<(Option<DailySummary>, Option<String>)> {
        Ok(match self.store.get_settings(&self.user_id)? {
            Some(settings) => (Some(summarize(&log.entries, &settings)), None),
            None => (None, Some(NO_SETTINGS_WARNING.to_string())),
        })
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    /// Store the user's daily goals and resting energy
    pub fn setup_user(&self, settings: UserSettings) -> Result<SetupResponse> {
        self.store.save_settings(&self.user_id, &settings)?;

        let fat = settings
            .fat_goal
            .map(|g| format!(", Fat: {}g", g))
            .unwrap_or_default();
        let message = format!(
            "Settings saved!\nGoals: {} cal, {}g protein, {}g carbs{}\nResting energy: {} cal/day",
            settings.calorie_goal,
            settings.protein_goal,
            settings.carb_goal,
            fat,
            settings.resting_energy
        );

        Ok(SetupResponse { settings, message })
    }

    pub fn get_settings(&self) -> Result<UserSettings> {
        self.store
            .get_settings(&self.user_id)?
            .ok_or(Error::SettingsMissing)
    }

    // ------------------------------------------------------------------
    // Logging
    // ------------------------------------------------------------------

    /// Add a food entry to a day's log (today by default)
    pub fn log_food(&self, food: NewFood, date: Option<NaiveDate>) -> Result<EntryResponse> {
        let entry = FoodEntry::new(food)?;
        self.log_entry(entry, date)
    }

    fn log_entry(&self, entry: FoodEntry, date: Option<NaiveDate>) -> Result<EntryResponse> {
        let log_date = date.unwrap_or(self.today);
        let log = self.store.add_entry(&self.user_id, entry.clone(), log_date)?;
        tracing::info!(
            "Logged {} for {} on {}",
            entry.name,
            short_id(&self.user_id),
            log_date
        );

        let (daily_summary, warning) = self.summary_or_warning(&log)?;
        Ok(EntryResponse {
            entry,
            daily_summary,
            warning,
        })
    }

    /// Update an existing entry; only provided fields change
    pub fn update_food(
        &self,
        entry_id: Uuid,
        update: FoodEntryUpdate,
        date: Option<NaiveDate>,
    ) -> Result<EntryResponse> {
        if update.is_empty() {
            return Err(Error::Validation("No updates provided.".into()));
        }

        let log_date = date.unwrap_or(self.today);
        let log = self
            .store
            .update_entry(&self.user_id, log_date, entry_id, &update)?;

        let entry = log
            .entries
            .iter()
            .find(|e| e.id == entry_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("entry {}", entry_id)))?;

        let (daily_summary, warning) = self.summary_or_warning(&log)?;
        Ok(EntryResponse {
            entry,
            daily_summary,
            warning,
        })
    }

    /// Remove an entry from a day's log
    pub fn delete_food(&self, entry_id: Uuid, date: Option<NaiveDate>) -> Result<DeleteResponse> {
        let log_date = date.unwrap_or(self.today);
        let log = self.store.delete_entry(&self.user_id, log_date, entry_id)?;

        let (daily_summary, warning) = self.summary_or_warning(&log)?;
        Ok(DeleteResponse {
            success: true,
            entries_remaining: log.entries.len(),
            daily_summary,
            warning,
        })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn get_today(&self) -> Result<DayResponse> {
        self.day(self.today)
    }

    /// A specific day's log; `date` must be `YYYY-MM-DD`
    pub fn get_day(&self, date: &str) -> Result<DayResponse> {
        self.day(parse_log_date(date)?)
    }

    fn day(&self, date: NaiveDate) -> Result<DayResponse> {
        let entries = self
            .store
            .get_log(&self.user_id, date)?
            .map(|log| log.entries)
            .unwrap_or_default();

        Ok(match self.store.get_settings(&self.user_id)? {
            Some(settings) => DayResponse {
                date,
                summary: Some(summarize(&entries, &settings)),
                goals: Some(Goals::from(&settings)),
                entries,
                warning: None,
            },
            None => DayResponse {
                date,
                entries,
                goals: None,
                summary: None,
                warning: Some("No settings configured. Use setup_user first.".into()),
            },
        })
    }

    /// Weekly report for the 7 days starting at `week_start`
    ///
    /// Defaults to the week ending today.
    pub fn get_weekly_report(&self, week_start: Option<NaiveDate>) -> Result<WeeklyReportResponse> {
        let settings = self.get_settings()?;

        let start = week_start.unwrap_or_else(|| default_week_start(self.today));
        let end = week_end(start);
        let logs = self.store.get_logs_range(&self.user_id, start, end)?;
        let report = generate_weekly_report_at(&logs, &settings, Some(start), self.today);

        Ok(WeeklyReportResponse {
            week_start: report.week_start,
            week_end: report.week_end,
            days_logged: report.days_logged,
            daily_summaries: report
                .daily_summaries
                .iter()
                .map(|s| DayTotals {
                    date: s.log_date,
                    calories: s.total_calories,
                    protein: s.total_protein,
                    carbs: s.total_carbs,
                    fat: s.total_fat,
                    entry_count: s.entry_count,
                })
                .collect(),
            weekly_totals: WeeklyTotals {
                calories: report.total_calories,
                protein: report.total_protein,
                carbs: report.total_carbs,
                fat: report.total_fat,
            },
            avg_daily_calories: report.avg_daily_calories,
            fat_added: report.fat_added,
            interpretation: report.interpretation(),
        })
    }

    // ------------------------------------------------------------------
    // Cache
    // ------------------------------------------------------------------

    pub fn search_cache(&self, query: &str) -> Result<Vec<CachedFood>> {
        self.store
            .search_cache(&self.user_id, query, self.search_limit)
    }

    pub fn add_to_cache(&self, food: NewFood) -> Result<CacheAddResponse> {
        let food = CachedFood::new(food)?;
        self.store.add_to_cache(&self.user_id, &food)?;

        let message = format!(
            "Added '{}' to your food cache (ID: {})",
            food.name,
            food.short_id()
        );
        Ok(CacheAddResponse { food, message })
    }

    /// Log a cached food as a new entry and bump its use count
    pub fn log_cached(&self, food_id: Uuid, date: Option<NaiveDate>) -> Result<EntryResponse> {
        let cached = self
            .store
            .get_cached_food(&self.user_id, food_id)?
            .ok_or_else(|| Error::NotFound(format!("cached food {}", food_id)))?;

        let response = self.log_entry(cached.to_entry()?, date)?;
        // Entry is saved at this point; a failed bump is only logged
        if let Err(e) = self.store.increment_cache_use(&self.user_id, food_id) {
            tracing::warn!("Failed to bump use count for cached food {}: {}", food_id, e);
        }
        Ok(response)
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Write every entry logged between `start` and `end` to a CSV file
    pub fn export_csv(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        path: &Path,
    ) -> Result<ExportResponse> {
        if start > end {
            return Err(Error::Validation(format!(
                "export start {} is after end {}",
                start, end
            )));
        }

        let logs = self.store.get_logs_range(&self.user_id, start, end)?;
        let entries = crate::export::export_csv(&logs, path)?;

        Ok(ExportResponse {
            path: path.display().to_string(),
            days: logs.len(),
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileStore;

    const USER: &str = "fedcba9876543210fedcba9876543210";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn food(name: &str, calories: u32, protein: f64, carbs: f64, fat: f64) -> NewFood {
        NewFood {
            name: name.into(),
            description: None,
            calories,
            protein,
            carbs,
            fat,
        }
    }

    fn settings(fat_goal: Option<u32>) -> UserSettings {
        UserSettings {
            calorie_goal: 2000,
            protein_goal: 150,
            carb_goal: 200,
            fat_goal,
            resting_energy: 1800,
        }
    }

    fn tools(store: &FileStore) -> Tools<'_, FileStore> {
        Tools::new(store, USER).with_today(date(2024, 12, 28))
    }

    #[test]
    fn test_setup_and_get_settings() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let tools = tools(&store);

        assert!(matches!(tools.get_settings(), Err(Error::SettingsMissing)));

        let response = tools.setup_user(settings(Some(65))).unwrap();
        assert!(response.message.contains("2000 cal"));
        assert!(response.message.contains("Fat: 65g"));
        assert!(response.message.contains("Resting energy: 1800 cal/day"));
        assert_eq!(tools.get_settings().unwrap(), settings(Some(65)));

        let response = tools.setup_user(settings(None)).unwrap();
        assert!(!response.message.contains("Fat"));
    }

    #[test]
    fn test_log_food_with_summary() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let tools = tools(&store);
        tools.setup_user(settings(None)).unwrap();

        tools
            .log_food(food("Coffee", 65, 4.0, 6.5, 2.5), None)
            .unwrap();
        let response = tools
            .log_food(food("Eggs", 140, 12.0, 0.0, 10.0), None)
            .unwrap();

        let summary = response.daily_summary.unwrap();
        assert_eq!(summary.total_calories, 205);
        assert_eq!(summary.calories_remaining, 1795);
        assert!(response.warning.is_none());
    }

    #[test]
    fn test_log_food_without_settings_warns() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let tools = tools(&store);

        let response = tools
            .log_food(food("Coffee", 65, 4.0, 6.5, 2.5), None)
            .unwrap();
        assert!(response.daily_summary.is_none());
        assert!(response.warning.is_some());

        // Still logged
        assert_eq!(tools.get_today().unwrap().entries.len(), 1);
    }

    #[test]
    fn test_log_food_rejects_invalid_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let tools = tools(&store);

        let result = tools.log_food(food("", 65, 4.0, 6.5, 2.5), None);
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(tools.get_today().unwrap().entries.is_empty());
    }

    #[test]
    fn test_update_food() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let tools = tools(&store);
        tools.setup_user(settings(Some(65))).unwrap();

        let logged = tools
            .log_food(food("Coffee", 65, 4.0, 6.5, 2.5), None)
            .unwrap();
        let update = FoodEntryUpdate {
            calories: Some(120),
            fat: Some(6.0),
            ..Default::default()
        };
        let response = tools.update_food(logged.entry.id, update, None).unwrap();

        assert_eq!(response.entry.calories, 120);
        let summary = response.daily_summary.unwrap();
        assert_eq!(summary.total_calories, 120);
        assert_eq!(summary.fat_remaining, Some(59.0));
    }

    #[test]
    fn test_update_food_requires_changes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let tools = tools(&store);

        let result = tools.update_food(Uuid::new_v4(), FoodEntryUpdate::default(), None);
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_update_unknown_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let tools = tools(&store);
        let update = FoodEntryUpdate {
            calories: Some(1),
            ..Default::default()
        };
        let result = tools.update_food(Uuid::new_v4(), update, None);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_delete_food() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let tools = tools(&store);
        tools.setup_user(settings(None)).unwrap();

        let coffee = tools
            .log_food(food("Coffee", 65, 4.0, 6.5, 2.5), None)
            .unwrap();
        tools
            .log_food(food("Eggs", 140, 12.0, 0.0, 10.0), None)
            .unwrap();

        let response = tools.delete_food(coffee.entry.id, None).unwrap();
        assert!(response.success);
        assert_eq!(response.entries_remaining, 1);
        assert_eq!(response.daily_summary.unwrap().total_calories, 140);

        assert!(matches!(
            tools.delete_food(coffee.entry.id, None),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_get_day_with_and_without_settings() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let tools = tools(&store);

        tools
            .log_food(food("Soup", 300, 10.0, 30.0, 8.0), Some(date(2024, 12, 25)))
            .unwrap();

        let day = tools.get_day("2024-12-25").unwrap();
        assert_eq!(day.entries.len(), 1);
        assert!(day.summary.is_none());
        assert!(day.warning.is_some());

        tools.setup_user(settings(None)).unwrap();
        let day = tools.get_day("2024-12-25").unwrap();
        assert_eq!(day.goals.unwrap().calories, 2000);
        assert_eq!(day.summary.unwrap().calories_remaining, 1700);

        // Empty day still has a full summary
        let empty = tools.get_day("2024-12-26").unwrap();
        assert!(empty.entries.is_empty());
        assert_eq!(empty.summary.unwrap().calories_remaining, 2000);
    }

    #[test]
    fn test_get_day_rejects_bad_date() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let tools = tools(&store);

        match tools.get_day("12/25/2024") {
            Err(Error::InvalidDate(msg)) => {
                assert_eq!(msg, "Invalid date format. Use YYYY-MM-DD.")
            }
            other => panic!("expected InvalidDate, got {:?}", other),
        }
    }

    #[test]
    fn test_weekly_report_requires_settings() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let tools = tools(&store);
        assert!(matches!(
            tools.get_weekly_report(None),
            Err(Error::SettingsMissing)
        ));
    }

    #[test]
    fn test_weekly_report_last_seven_days() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let tools = tools(&store);
        tools.setup_user(settings(None)).unwrap();

        tools
            .log_food(food("Old", 5000, 0.0, 0.0, 0.0), Some(date(2024, 12, 20)))
            .unwrap();
        tools
            .log_food(food("A", 2000, 100.0, 200.0, 50.0), Some(date(2024, 12, 25)))
            .unwrap();
        tools
            .log_food(food("B", 2200, 120.0, 220.0, 60.0), Some(date(2024, 12, 26)))
            .unwrap();

        let report = tools.get_weekly_report(None).unwrap();
        assert_eq!(report.week_start, date(2024, 12, 22));
        assert_eq!(report.week_end, date(2024, 12, 28));
        assert_eq!(report.days_logged, 2);
        assert_eq!(report.weekly_totals.calories, 4200);
        assert_eq!(report.avg_daily_calories, 2100.0);
        assert_eq!(report.fat_added, 600);
        assert_eq!(
            report.interpretation,
            "Caloric surplus of 600 calories over 2 days"
        );
        assert_eq!(report.daily_summaries[0].date, date(2024, 12, 25));
    }

    #[test]
    fn test_cache_add_search_and_log() {
        crate::logging::init_test();
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let tools = tools(&store);
        tools.setup_user(settings(None)).unwrap();

        let added = tools
            .add_to_cache(food("Cappuccino", 65, 4.0, 6.5, 2.5))
            .unwrap();
        assert!(added.message.contains("Cappuccino"));
        assert!(added.message.contains(&added.food.short_id()));

        let found = tools.search_cache("cappu").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].use_count, 0);

        let logged = tools.log_cached(added.food.id, None).unwrap();
        assert_eq!(logged.entry.name, "Cappuccino");
        assert_eq!(logged.daily_summary.unwrap().total_calories, 65);

        let found = tools.search_cache("cappu").unwrap();
        assert_eq!(found[0].use_count, 1);

        assert!(matches!(
            tools.log_cached(Uuid::new_v4(), None),
            Err(Error::NotFound(_))
        ));
    }

    /// Store whose cache use counter always fails
    struct StaleCacheStore(FileStore);

    impl FoodLogStore for StaleCacheStore {
        fn get_user(&self, user_id: &str) -> Result<Option<crate::User>> {
            self.0.get_user(user_id)
        }
        fn save_user(&self, user_id: &str, user: &crate::User) -> Result<()> {
            self.0.save_user(user_id, user)
        }
        fn get_settings(&self, user_id: &str) -> Result<Option<UserSettings>> {
            self.0.get_settings(user_id)
        }
        fn save_settings(&self, user_id: &str, settings: &UserSettings) -> Result<()> {
            self.0.save_settings(user_id, settings)
        }
        fn get_log(&self, user_id: &str, log_date: NaiveDate) -> Result<Option<DailyLog>> {
            self.0.get_log(user_id, log_date)
        }
        fn save_log(&self, user_id: &str, log: &DailyLog) -> Result<()> {
            self.0.save_log(user_id, log)
        }
        fn get_logs_range(
            &self,
            user_id: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<DailyLog>> {
            self.0.get_logs_range(user_id, start, end)
        }
        fn modify_log<F>(&self, user_id: &str, log_date: NaiveDate, f: F) -> Result<DailyLog>
        where
            F: FnOnce(DailyLog) -> Result<DailyLog>,
        {
            self.0.modify_log(user_id, log_date, f)
        }
        fn get_cached_food(&self, user_id: &str, food_id: Uuid) -> Result<Option<CachedFood>> {
            self.0.get_cached_food(user_id, food_id)
        }
        fn add_to_cache(&self, user_id: &str, food: &CachedFood) -> Result<()> {
            self.0.add_to_cache(user_id, food)
        }
        fn list_cached_foods(&self, user_id: &str) -> Result<Vec<CachedFood>> {
            self.0.list_cached_foods(user_id)
        }
        fn increment_cache_use(&self, _user_id: &str, food_id: Uuid) -> Result<CachedFood> {
            Err(Error::NotFound(format!("cached food {}", food_id)))
        }
    }

    #[test]
    fn test_log_cached_survives_failed_use_count() {
        let dir = tempfile::tempdir().unwrap();
        let store = StaleCacheStore(FileStore::new(dir.path()));
        let tools = Tools::new(&store, USER).with_today(date(2024, 12, 28));

        let added = tools
            .add_to_cache(food("Cappuccino", 65, 4.0, 6.5, 2.5))
            .unwrap();
        let logged = tools.log_cached(added.food.id, None).unwrap();
        assert_eq!(logged.entry.name, "Cappuccino");

        // Logged exactly once, counter untouched
        assert_eq!(tools.get_today().unwrap().entries.len(), 1);
        assert_eq!(tools.search_cache("cappu").unwrap()[0].use_count, 0);
    }

    #[test]
    fn test_weekly_report_at_calendar_end() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let tools = tools(&store);
        tools.setup_user(settings(None)).unwrap();

        let start = NaiveDate::MAX - chrono::Duration::days(2);
        let report = tools.get_weekly_report(Some(start)).unwrap();
        assert_eq!(report.week_start, start);
        assert_eq!(report.week_end, NaiveDate::MAX);
        assert_eq!(report.days_logged, 0);
    }

    #[test]
    fn test_export_csv() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("data"));
        let tools = tools(&store);

        tools
            .log_food(food("A", 100, 1.0, 2.0, 3.0), Some(date(2024, 12, 25)))
            .unwrap();
        tools
            .log_food(food("B", 200, 1.0, 2.0, 3.0), Some(date(2024, 12, 26)))
            .unwrap();
        tools
            .log_food(food("C", 300, 1.0, 2.0, 3.0), Some(date(2024, 12, 26)))
            .unwrap();

        let out = dir.path().join("export.csv");
        let response = tools
            .export_csv(date(2024, 12, 22), date(2024, 12, 28), &out)
            .unwrap();
        assert_eq!(response.days, 2);
        assert_eq!(response.entries, 3);
        assert!(out.exists());

        assert!(tools
            .export_csv(date(2024, 12, 28), date(2024, 12, 22), &out)
            .is_err());
    }
}
