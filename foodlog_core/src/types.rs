//! Core domain types for FoodLogr.
//!
//! This module defines the fundamental types used throughout the system:
//! - Logged food entries and their edits
//! - User goal settings
//! - Daily logs and cached foods
//! - Derived summaries and weekly reports
//!
//! Stored types validate on construction. Derived types are built fresh by
//! the calculators and never point back at their inputs.

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Validation helpers
// ============================================================================

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation("name must not be empty".into()));
    }
    Ok(())
}

fn check_grams(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Validation(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )));
    }
    Ok(())
}

fn check_macros(protein: f64, carbs: f64, fat: f64) -> Result<()> {
    check_grams("protein", protein)?;
    check_grams("carbs", carbs)?;
    check_grams("fat", fat)
}

/// Parse a `YYYY-MM-DD` date as supplied by a caller
pub fn parse_log_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate("Invalid date format. Use YYYY-MM-DD.".into()))
}

// ============================================================================
// Food Entries
// ============================================================================

/// Nutrient values for one serving, as supplied by a caller
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewFood {
    pub name: String,
    pub description: Option<String>,
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// A single food item logged by the user
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FoodEntry {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub logged_at: DateTime<Utc>,
}

impl FoodEntry {
    /// Create a new entry with a fresh id, logged now
    pub fn new(food: NewFood) -> Result<Self> {
        Self::new_at(food, Utc::now())
    }

    /// Create a new entry with a fresh id and an explicit timestamp
    pub fn new_at(food: NewFood, logged_at: DateTime<Utc>) -> Result<Self> {
        let entry = Self {
            id: Uuid::new_v4(),
            name: food.name,
            description: food.description,
            calories: food.calories,
            protein: food.protein,
            carbs: food.carbs,
            fat: food.fat,
            logged_at,
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Check the name and nutrient constraints
    ///
    /// Entries read back from storage go through this as well, since serde
    /// cannot reject negative or non-finite floats on its own.
    pub fn validate(&self) -> Result<()> {
        check_name(&self.name)?;
        check_macros(self.protein, self.carbs, self.fat)
    }

    /// Produce a new entry with the given fields replaced
    ///
    /// `id` and `logged_at` carry over unchanged.
    pub fn apply(&self, update: &FoodEntryUpdate) -> Result<Self> {
        let updated = Self {
            id: self.id,
            name: update.name.clone().unwrap_or_else(|| self.name.clone()),
            description: update
                .description
                .clone()
                .or_else(|| self.description.clone()),
            calories: update.calories.unwrap_or(self.calories),
            protein: update.protein.unwrap_or(self.protein),
            carbs: update.carbs.unwrap_or(self.carbs),
            fat: update.fat.unwrap_or(self.fat),
            logged_at: self.logged_at,
        };
        updated.validate()?;
        Ok(updated)
    }
}

/// Partial edit of a food entry; `None` keeps the current value
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FoodEntryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub calories: Option<u32>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

impl FoodEntryUpdate {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.calories.is_none()
            && self.protein.is_none()
            && self.carbs.is_none()
            && self.fat.is_none()
    }
}

// ============================================================================
// Settings, Logs and Users
// ============================================================================

/// User configuration for daily goals and metrics
///
/// Unsigned fields make negative goals unrepresentable; `fat_goal` of `None`
/// means fat is not tracked, which is different from a goal of zero.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSettings {
    pub calorie_goal: u32,
    pub protein_goal: u32,
    pub carb_goal: u32,
    #[serde(default)]
    pub fat_goal: Option<u32>,
    pub resting_energy: u32,
}

/// A day's food log containing all entries in logging order
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyLog {
    pub log_date: NaiveDate,
    #[serde(default)]
    pub entries: Vec<FoodEntry>,
}

impl DailyLog {
    /// An empty log for the given date
    pub fn new(log_date: NaiveDate) -> Self {
        Self {
            log_date,
            entries: Vec::new(),
        }
    }

    /// Validate every entry in the log
    pub fn validate(&self) -> Result<()> {
        self.entries.iter().try_for_each(FoodEntry::validate)
    }
}

/// A frequently used food item saved for quick reuse
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CachedFood {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default)]
    pub use_count: u32,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

impl CachedFood {
    pub fn new(food: NewFood) -> Result<Self> {
        check_name(&food.name)?;
        check_macros(food.protein, food.carbs, food.fat)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: food.name,
            description: food.description,
            calories: food.calories,
            protein: food.protein,
            carbs: food.carbs,
            fat: food.fat,
            use_count: 0,
            created_at: now,
            last_used: now,
        })
    }

    /// Build a fresh log entry from this template
    pub fn to_entry(&self) -> Result<FoodEntry> {
        FoodEntry::new(NewFood {
            name: self.name.clone(),
            description: self.description.clone(),
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        })
    }

    /// Short id shown to users
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}

/// A registered user. Only the hash of the API key is kept.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub api_key_hash: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Derived Types
// ============================================================================

/// Summary of daily intake calculated from entries
///
/// `*_remaining` is negative when over goal. `fat_remaining` is omitted from
/// serialized output when no fat goal is set.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailySummary {
    pub total_calories: i64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub calories_remaining: i64,
    pub protein_remaining: f64,
    pub carbs_remaining: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat_remaining: Option<f64>,
}

/// Summary for a single day in a weekly report
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DaySummary {
    pub log_date: NaiveDate,
    pub total_calories: i64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub entry_count: usize,
}

/// Weekly report with daily summaries and aggregate metrics
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeeklyReport {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub daily_summaries: Vec<DaySummary>,
    pub total_calories: i64,
    pub avg_daily_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    /// Total calories minus `days_logged * resting_energy`; negative is a deficit
    pub fat_added: i64,
    pub days_logged: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coffee() -> NewFood {
        NewFood {
            name: "Coffee".into(),
            description: None,
            calories: 65,
            protein: 4.0,
            carbs: 6.5,
            fat: 2.5,
        }
    }

    #[test]
    fn test_valid_entry_gets_defaults() {
        let entry = FoodEntry::new(coffee()).unwrap();
        assert_eq!(entry.name, "Coffee");
        assert!(entry.description.is_none());
        assert!(!entry.id.is_nil());
    }

    #[test]
    fn test_entry_ids_are_unique() {
        let a = FoodEntry::new(coffee()).unwrap();
        let b = FoodEntry::new(coffee()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_entry_with_description() {
        let entry = FoodEntry::new(NewFood {
            description: Some("Cappuccino with 2% milk".into()),
            ..coffee()
        })
        .unwrap();
        assert_eq!(
            entry.description.as_deref(),
            Some("Cappuccino with 2% milk")
        );
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = FoodEntry::new(NewFood {
            name: "".into(),
            ..coffee()
        });
        assert!(matches!(result, Err(Error::Validation(_))));

        let blank = FoodEntry::new(NewFood {
            name: "   ".into(),
            ..coffee()
        });
        assert!(matches!(blank, Err(Error::Validation(_))));
    }

    #[test]
    fn test_negative_macros_rejected() {
        let result = FoodEntry::new(NewFood {
            protein: -1.0,
            ..coffee()
        });
        assert!(matches!(result, Err(Error::Validation(_))));

        let nan = FoodEntry::new(NewFood {
            fat: f64::NAN,
            ..coffee()
        });
        assert!(matches!(nan, Err(Error::Validation(_))));
    }

    #[test]
    fn test_negative_calories_rejected_on_deserialize() {
        let json = r#"{"name":"Food","calories":-100,"protein":10,"carbs":10,"fat":5,"description":null}"#;
        assert!(serde_json::from_str::<NewFood>(json).is_err());
    }

    #[test]
    fn test_apply_update_keeps_identity() {
        let entry = FoodEntry::new(coffee()).unwrap();
        let update = FoodEntryUpdate {
            calories: Some(90),
            fat: Some(4.0),
            ..Default::default()
        };

        let updated = entry.apply(&update).unwrap();
        assert_eq!(updated.id, entry.id);
        assert_eq!(updated.logged_at, entry.logged_at);
        assert_eq!(updated.calories, 90);
        assert_eq!(updated.fat, 4.0);
        assert_eq!(updated.name, "Coffee");
        // Original value is untouched
        assert_eq!(entry.calories, 65);
    }

    #[test]
    fn test_apply_update_validates() {
        let entry = FoodEntry::new(coffee()).unwrap();
        let update = FoodEntryUpdate {
            name: Some("".into()),
            ..Default::default()
        };
        assert!(entry.apply(&update).is_err());
    }

    #[test]
    fn test_empty_update() {
        assert!(FoodEntryUpdate::default().is_empty());
        let update = FoodEntryUpdate {
            carbs: Some(1.0),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_settings_fat_goal_optional() {
        let json = r#"{"calorie_goal":2000,"protein_goal":150,"carb_goal":200,"resting_energy":1800}"#;
        let settings: UserSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.calorie_goal, 2000);
        assert_eq!(settings.fat_goal, None);

        let json = r#"{"calorie_goal":2000,"protein_goal":150,"carb_goal":200,"fat_goal":65,"resting_energy":1800}"#;
        let settings: UserSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.fat_goal, Some(65));
    }

    #[test]
    fn test_negative_goal_rejected() {
        let json = r#"{"calorie_goal":-100,"protein_goal":150,"carb_goal":200,"resting_energy":1800}"#;
        assert!(serde_json::from_str::<UserSettings>(json).is_err());
    }

    #[test]
    fn test_empty_log() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap();
        let log = DailyLog::new(date);
        assert_eq!(log.log_date, date);
        assert!(log.entries.is_empty());
    }

    #[test]
    fn test_cached_food_defaults() {
        let food = CachedFood::new(coffee()).unwrap();
        assert_eq!(food.use_count, 0);
        assert!(food.description.is_none());
        assert_eq!(food.short_id().len(), 8);

        let entry = food.to_entry().unwrap();
        assert_eq!(entry.name, food.name);
        assert_eq!(entry.calories, food.calories);
        assert_ne!(entry.id, food.id);
    }

    #[test]
    fn test_cached_food_validates() {
        let result = CachedFood::new(NewFood {
            carbs: -0.5,
            ..coffee()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_log_date() {
        assert_eq!(
            parse_log_date("2024-12-28").unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 28).unwrap()
        );
        assert!(matches!(
            parse_log_date("28/12/2024"),
            Err(Error::InvalidDate(_))
        ));
        assert!(parse_log_date("2024-02-30").is_err());
    }
}
