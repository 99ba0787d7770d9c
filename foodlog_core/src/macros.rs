//! Macro calculations for a single day.
//!
//! All functions here are pure: same input, same output, no I/O.
//!
//! Rounding is half away from zero throughout (`f64::round`), applied to one
//! decimal place for grams and to whole numbers for calories.

use crate::{DailySummary, FoodEntry, UserSettings};
use std::iter::Sum;
use std::ops::Add;

const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Raw (unrounded) nutrient totals
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MacroTotals {
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl From<&FoodEntry> for MacroTotals {
    fn from(entry: &FoodEntry) -> Self {
        Self {
            calories: i64::from(entry.calories),
            protein: entry.protein,
            carbs: entry.carbs,
            fat: entry.fat,
        }
    }
}

impl Add for MacroTotals {
    type Output = MacroTotals;

    fn add(self, other: MacroTotals) -> MacroTotals {
        MacroTotals {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }
}

impl Sum for MacroTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(MacroTotals::default(), |acc, t| acc + t)
    }
}

/// Round to one decimal place, half away from zero
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Sum every nutrient field across the entries
///
/// Returns zeros for an empty slice. No rounding is applied.
pub fn sum_totals(entries: &[FoodEntry]) -> MacroTotals {
    entries.iter().map(MacroTotals::from).sum()
}

/// Daily totals plus what is left of each goal
///
/// Remaining amounts are computed from the unrounded totals and then rounded,
/// so `protein_remaining` may differ from `protein_goal - total_protein` by a
/// tenth at `.x5` boundaries.
pub fn summarize(entries: &[FoodEntry], settings: &UserSettings) -> DailySummary {
    let totals = sum_totals(entries);

    DailySummary {
        total_calories: totals.calories,
        total_protein: round1(totals.protein),
        total_carbs: round1(totals.carbs),
        total_fat: round1(totals.fat),
        calories_remaining: i64::from(settings.calorie_goal) - totals.calories,
        protein_remaining: round1(f64::from(settings.protein_goal) - totals.protein),
        carbs_remaining: round1(f64::from(settings.carb_goal) - totals.carbs),
        fat_remaining: settings
            .fat_goal
            .map(|goal| round1(f64::from(goal) - totals.fat)),
    }
}

/// Estimate calories from macronutrients (4/4/9 kcal per gram)
///
/// Inputs are not validated here.
pub fn calories_from_macros(protein: f64, carbs: f64, fat: f64) -> i64 {
    (protein * KCAL_PER_GRAM_PROTEIN + carbs * KCAL_PER_GRAM_CARBS + fat * KCAL_PER_GRAM_FAT)
        .round() as i64
}
