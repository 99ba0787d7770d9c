//! Document store for users, settings, daily logs and cached foods.
//!
//! Each document is a JSON file under the data directory:
//!
//! ```text
//! users/{user_id}/user.json
//! users/{user_id}/settings.json
//! users/{user_id}/logs/{YYYY-MM-DD}.json
//! users/{user_id}/cache/{food_id}.json
//! ```
//!
//! Writes go through a temp file and an atomic rename. Read-modify-write of a
//! single document holds an exclusive lock on a sidecar `.lock` file for the
//! whole cycle, so concurrent writers never drop each other's changes.

use crate::logging::short_id;
use crate::{
    CachedFood, DailyLog, Error, FoodEntry, FoodEntryUpdate, Result, User, UserSettings,
};
use chrono::{NaiveDate, Utc};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Persistence operations the tools rely on
pub trait FoodLogStore {
    fn get_user(&self, user_id: &str) -> Result<Option<User>>;
    fn save_user(&self, user_id: &str, user: &User) -> Result<()>;

    fn get_settings(&self, user_id: &str) -> Result<Option<UserSettings>>;
    fn save_settings(&self, user_id: &str, settings: &UserSettings) -> Result<()>;

    fn get_log(&self, user_id: &str, log_date: NaiveDate) -> Result<Option<DailyLog>>;
    fn save_log(&self, user_id: &str, log: &DailyLog) -> Result<()>;

    /// Logs with `start <= log_date <= end`, ascending by date
    fn get_logs_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyLog>>;

    /// Atomically replace a day's log with `f(current)`
    ///
    /// A missing log is handed to `f` as an empty one. Nothing is written if
    /// `f` fails.
    fn modify_log<F>(&self, user_id: &str, log_date: NaiveDate, f: F) -> Result<DailyLog>
    where
        F: FnOnce(DailyLog) -> Result<DailyLog>;

    fn get_cached_food(&self, user_id: &str, food_id: Uuid) -> Result<Option<CachedFood>>;
    fn add_to_cache(&self, user_id: &str, food: &CachedFood) -> Result<()>;
    fn list_cached_foods(&self, user_id: &str) -> Result<Vec<CachedFood>>;

    /// Bump `use_count` and `last_used` for a cached food
    fn increment_cache_use(&self, user_id: &str, food_id: Uuid) -> Result<CachedFood>;

    /// Append an entry to a day's log, creating the log if needed
    fn add_entry(&self, user_id: &str, entry: FoodEntry, log_date: NaiveDate) -> Result<DailyLog> {
        self.modify_log(user_id, log_date, move |mut log| {
            log.entries.push(entry);
            Ok(log)
        })
    }

    /// Replace one entry with its updated version
    fn update_entry(
        &self,
        user_id: &str,
        log_date: NaiveDate,
        entry_id: Uuid,
        update: &FoodEntryUpdate,
    ) -> Result<DailyLog> {
        self.modify_log(user_id, log_date, |log| {
            let mut found = false;
            let entries = log
                .entries
                .iter()
                .map(|entry| {
                    if entry.id == entry_id {
                        found = true;
                        entry.apply(update)
                    } else {
                        Ok(entry.clone())
                    }
                })
                .collect::<Result<Vec<_>>>()?;

            if !found {
                tracing::warn!("Entry not found: {}", entry_id);
                return Err(Error::NotFound(format!("entry {} on {}", entry_id, log_date)));
            }

            Ok(DailyLog { entries, ..log })
        })
    }

    /// Remove one entry from a day's log
    fn delete_entry(&self, user_id: &str, log_date: NaiveDate, entry_id: Uuid) -> Result<DailyLog> {
        self.modify_log(user_id, log_date, |log| {
            let original_count = log.entries.len();
            let entries: Vec<FoodEntry> = log
                .entries
                .into_iter()
                .filter(|entry| entry.id != entry_id)
                .collect();

            if entries.len() == original_count {
                tracing::warn!("Entry not found: {}", entry_id);
                return Err(Error::NotFound(format!("entry {} on {}", entry_id, log_date)));
            }

            Ok(DailyLog {
                log_date: log.log_date,
                entries,
            })
        })
    }

    /// Case-insensitive substring search on cached food names
    ///
    /// Only the `limit` most-used foods are scanned; results are ordered by
    /// use count, highest first.
    fn search_cache(&self, user_id: &str, query: &str, limit: usize) -> Result<Vec<CachedFood>> {
        let mut foods = self.list_cached_foods(user_id)?;
        foods.sort_by(|a, b| b.use_count.cmp(&a.use_count));

        let query = query.to_lowercase();
        Ok(foods
            .into_iter()
            .take(limit)
            .filter(|food| food.name.to_lowercase().contains(&query))
            .collect())
    }
}

/// JSON-file document store rooted at a data directory
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `data_dir`; directories are created lazily
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: data_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn user_dir(&self, user_id: &str) -> Result<PathBuf> {
        let valid = !user_id.is_empty()
            && user_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::Validation(format!("invalid user id: {:?}", user_id)));
        }
        Ok(self.root.join("users").join(user_id))
    }

    fn user_path(&self, user_id: &str) -> Result<PathBuf> {
        Ok(self.user_dir(user_id)?.join("user.json"))
    }

    fn settings_path(&self, user_id: &str) -> Result<PathBuf> {
        Ok(self.user_dir(user_id)?.join("settings.json"))
    }

    fn logs_dir(&self, user_id: &str) -> Result<PathBuf> {
        Ok(self.user_dir(user_id)?.join("logs"))
    }

    fn log_path(&self, user_id: &str, log_date: NaiveDate) -> Result<PathBuf> {
        Ok(self
            .logs_dir(user_id)?
            .join(format!("{}.json", log_date.format("%Y-%m-%d"))))
    }

    fn cache_dir(&self, user_id: &str) -> Result<PathBuf> {
        Ok(self.user_dir(user_id)?.join("cache"))
    }

    fn cache_path(&self, user_id: &str, food_id: Uuid) -> Result<PathBuf> {
        Ok(self.cache_dir(user_id)?.join(format!("{}.json", food_id)))
    }

    fn read_log(path: &Path) -> Result<Option<DailyLog>> {
        match read_json::<DailyLog>(path)? {
            Some(log) => {
                log.validate()?;
                Ok(Some(log))
            }
            None => Ok(None),
        }
    }
}

impl FoodLogStore for FileStore {
    fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        read_json(&self.user_path(user_id)?)
    }

    fn save_user(&self, user_id: &str, user: &User) -> Result<()> {
        write_json_atomic(&self.user_path(user_id)?, user)?;
        tracing::info!("Saved user {}", short_id(user_id));
        Ok(())
    }

    fn get_settings(&self, user_id: &str) -> Result<Option<UserSettings>> {
        tracing::debug!("Fetching settings for user: {}", short_id(user_id));
        read_json(&self.settings_path(user_id)?)
    }

    fn save_settings(&self, user_id: &str, settings: &UserSettings) -> Result<()> {
        tracing::info!("Saving settings for user: {}", short_id(user_id));
        write_json_atomic(&self.settings_path(user_id)?, settings)
    }

    fn get_log(&self, user_id: &str, log_date: NaiveDate) -> Result<Option<DailyLog>> {
        tracing::debug!("Fetching log for {} on {}", short_id(user_id), log_date);
        Self::read_log(&self.log_path(user_id, log_date)?)
    }

    fn save_log(&self, user_id: &str, log: &DailyLog) -> Result<()> {
        tracing::info!("Saving log for {} on {}", short_id(user_id), log.log_date);
        let path = self.log_path(user_id, log.log_date)?;
        with_exclusive_lock(&path, || write_json_atomic(&path, log))
    }

    fn get_logs_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyLog>> {
        tracing::debug!(
            "Fetching logs for {} from {} to {}",
            short_id(user_id),
            start,
            end
        );

        let dir = self.logs_dir(user_id)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut logs = Vec::new();
        for dir_entry in std::fs::read_dir(&dir)? {
            let path = dir_entry?.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            let date = match path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok())
            {
                Some(date) => date,
                None => {
                    tracing::warn!("Skipping unexpected file in logs dir: {:?}", path);
                    continue;
                }
            };
            if date < start || date > end {
                continue;
            }

            match Self::read_log(&path) {
                Ok(Some(log)) => logs.push(log),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Failed to read log {:?}: {}", path, e);
                    // Continue with the remaining days
                }
            }
        }

        logs.sort_by_key(|log| log.log_date);
        tracing::debug!("Found {} logs in range", logs.len());
        Ok(logs)
    }

    fn modify_log<F>(&self, user_id: &str, log_date: NaiveDate, f: F) -> Result<DailyLog>
    where
        F: FnOnce(DailyLog) -> Result<DailyLog>,
    {
        let path = self.log_path(user_id, log_date)?;

        with_exclusive_lock(&path, || {
            let current = Self::read_log(&path)?.unwrap_or_else(|| DailyLog::new(log_date));
            let updated = f(current)?;
            write_json_atomic(&path, &updated)?;
            tracing::info!(
                "Updated log for {} on {} ({} entries)",
                short_id(user_id),
                log_date,
                updated.entries.len()
            );
            Ok(updated)
        })
    }

    fn get_cached_food(&self, user_id: &str, food_id: Uuid) -> Result<Option<CachedFood>> {
        read_json(&self.cache_path(user_id, food_id)?)
    }

    fn add_to_cache(&self, user_id: &str, food: &CachedFood) -> Result<()> {
        tracing::info!("Adding to cache for {}: {}", short_id(user_id), food.name);
        write_json_atomic(&self.cache_path(user_id, food.id)?, food)
    }

    fn list_cached_foods(&self, user_id: &str) -> Result<Vec<CachedFood>> {
        let dir = self.cache_dir(user_id)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut foods = Vec::new();
        for dir_entry in std::fs::read_dir(&dir)? {
            let path = dir_entry?.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            match read_json::<CachedFood>(&path) {
                Ok(Some(food)) => foods.push(food),
                Ok(None) => {}
                Err(e) => tracing::warn!("Failed to read cached food {:?}: {}", path, e),
            }
        }

        tracing::debug!("Listed {} cached foods for {}", foods.len(), short_id(user_id));
        Ok(foods)
    }

    fn increment_cache_use(&self, user_id: &str, food_id: Uuid) -> Result<CachedFood> {
        let path = self.cache_path(user_id, food_id)?;

        with_exclusive_lock(&path, || {
            let food = read_json::<CachedFood>(&path)?
                .ok_or_else(|| Error::NotFound(format!("cached food {}", food_id)))?;
            let updated = CachedFood {
                use_count: food.use_count.saturating_add(1),
                last_used: Utc::now(),
                ..food
            };
            write_json_atomic(&path, &updated)?;
            tracing::debug!("Cached food {} used {} times", food_id, updated.use_count);
            Ok(updated)
        })
    }
}

// ============================================================================
// File helpers
// ============================================================================

/// Read a JSON document with a shared lock; `None` if the file is missing
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read_result = BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read_result?;

    match serde_json::from_str(&contents) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!("Failed to parse {:?}: {}", path, e);
            Err(Error::Json(e))
        }
    }
}

/// Atomically replace `path` with the JSON form of `value`
///
/// Writes to a temp file in the same directory, syncs it, then renames it
/// over the target.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "document path missing parent")
    })?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        serde_json::to_writer(&mut writer, value)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Wrote {:?}", path);
    Ok(())
}

/// Run `f` while holding an exclusive lock on `<path>.lock`
fn with_exclusive_lock<T>(path: &Path, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let mut lock_name = path.as_os_str().to_os_string();
    lock_name.push(".lock");
    let lock_path = PathBuf::from(lock_name);

    if let Some(parent) = lock_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)?;
    lock_file.lock_exclusive()?;

    let result = f();

    // Lock is also released when the file is dropped
    lock_file.unlock()?;
    result
}
