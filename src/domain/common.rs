//! Pure money math shared by the budget and savings ledgers.
//!
//! Everything in this module is a function of its inputs: derived fields
//! stored on entities are projections of these helpers and can be rebuilt
//! from source amounts at any time.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Four-level classification of spending against an allocation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    #[default]
    Safe,
    Warning,
    Danger,
    Exceeded,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetStatus::Safe => "safe",
            BudgetStatus::Warning => "warning",
            BudgetStatus::Danger => "danger",
            BudgetStatus::Exceeded => "exceeded",
        };
        f.write_str(label)
    }
}

/// Percentage of an allocation consumed, rounded and capped at 100.
///
/// Returns 0 when nothing is allocated.
pub fn progress_percentage(spent: i64, allocated: i64) -> u32 {
    if allocated <= 0 {
        return 0;
    }
    let ratio = spent as f64 / allocated as f64 * 100.0;
    (ratio.round() as i64).clamp(0, 100) as u32
}

/// Classifies spending against an allocation.
///
/// Bands are inclusive at their lower bound: `Warning` starts at 75%,
/// `Danger` at 90%, and `Exceeded` only strictly above 100%. A zero
/// allocation is always `Safe`.
pub fn classify_status(spent: i64, allocated: i64) -> BudgetStatus {
    if allocated <= 0 {
        return BudgetStatus::Safe;
    }
    let percentage = spent as f64 / allocated as f64 * 100.0;
    if percentage > 100.0 {
        BudgetStatus::Exceeded
    } else if percentage >= 90.0 {
        BudgetStatus::Danger
    } else if percentage >= 75.0 {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Safe
    }
}

/// Progress toward a savings target, rounded but deliberately uncapped:
/// a goal funded past its target reads above 100.
pub fn goal_progress(current: i64, target: i64) -> u32 {
    if target <= 0 {
        return 0;
    }
    let ratio = current as f64 / target as f64 * 100.0;
    ratio.round().max(0.0) as u32
}

/// Calendar-month difference between two dates, ignoring the day component.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}

/// Amount that must be saved each month to reach `target` by `target_date`.
///
/// Deadlines already reached (or passed) count as one month remaining; a
/// goal funded past its target yields 0.
pub fn monthly_target(target: i64, current: i64, target_date: NaiveDate, today: NaiveDate) -> i64 {
    let months_remaining = months_between(today, target_date).max(1) as i64;
    let remaining = target - current;
    if remaining <= 0 {
        return 0;
    }
    // Integer ceiling; remaining and months_remaining are both positive here.
    (remaining + months_remaining - 1) / months_remaining
}
