//! Domain types for savings goals.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{goal_progress, monthly_target};
use crate::domain::{Identifiable, NamedEntity};

/// A named target balance, deadline-bound (`Berjangka`) or open-ended
/// (`Reguler`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsGoal {
    pub id: Uuid,
    pub name: String,
    pub goal_type: SavingsType,
    pub target_amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    pub initial_amount: i64,
    pub current_amount: i64,
    pub icon: String,
    pub color: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_target: Option<i64>,
    pub progress_percentage: u32,
    pub remaining_amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavingsGoal {
    /// Builds a goal from validated input; the balance starts at the
    /// initial amount and is only mutated through deposit/withdraw.
    pub fn new(input: CreateSavingsInput, today: NaiveDate) -> Self {
        let now = Utc::now();
        let initial = input.initial_amount.unwrap_or(0);
        let mut goal = Self {
            id: Uuid::new_v4(),
            name: input.name,
            goal_type: input.goal_type,
            target_amount: input.target_amount,
            target_date: input.target_date,
            initial_amount: initial,
            current_amount: initial,
            icon: input.icon,
            color: input.color,
            is_active: true,
            monthly_target: None,
            progress_percentage: 0,
            remaining_amount: 0,
            created_at: now,
            updated_at: now,
        };
        goal.refresh_derived(today);
        goal
    }

    /// Re-derives progress, remaining amount, and the deadline-aware
    /// monthly target from the current balance.
    pub fn refresh_derived(&mut self, today: NaiveDate) {
        self.progress_percentage = goal_progress(self.current_amount, self.target_amount);
        self.remaining_amount = self.target_amount - self.current_amount;
        self.monthly_target = match (self.goal_type, self.target_date) {
            (SavingsType::Berjangka, Some(deadline)) => Some(monthly_target(
                self.target_amount,
                self.current_amount,
                deadline,
                today,
            )),
            _ => None,
        };
    }
}

impl Identifiable for SavingsGoal {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for SavingsGoal {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Supported goal flavours.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SavingsType {
    /// Time-boxed: carries a deadline and a computed monthly target.
    Berjangka,
    /// Open-ended: no deadline, no monthly target.
    Reguler,
}

impl fmt::Display for SavingsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SavingsType::Berjangka => "berjangka",
            SavingsType::Reguler => "reguler",
        };
        f.write_str(label)
    }
}

/// Already-validated input for creating a goal.
#[derive(Debug, Clone)]
pub struct CreateSavingsInput {
    pub name: String,
    pub goal_type: SavingsType,
    pub target_amount: i64,
    pub target_date: Option<NaiveDate>,
    pub initial_amount: Option<i64>,
    pub icon: String,
    pub color: String,
}

/// Partial update for a goal; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateSavingsInput {
    pub name: Option<String>,
    pub target_amount: Option<i64>,
    pub target_date: Option<NaiveDate>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
}
