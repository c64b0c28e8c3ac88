//! Domain types for monthly budget envelopes and their categories.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{classify_status, progress_percentage, BudgetStatus};
use crate::domain::{Identifiable, NamedEntity};

/// One calendar month's overall spending envelope.
///
/// The stored derived fields (`total_allocated`, `total_spent`, and friends)
/// are projections maintained by the budget service; the selectors on
/// `BudgetService` recompute them from category state and are ground truth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetPeriod {
    pub id: Uuid,
    /// Calendar month, 1 through 12.
    pub month: u32,
    pub year: i32,
    pub total_budget: i64,
    pub total_allocated: i64,
    pub total_spent: i64,
    pub remaining_to_allocate: i64,
    pub remaining_budget: i64,
    pub progress_percentage: u32,
    pub status: BudgetStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BudgetPeriod {
    pub fn new(month: u32, year: i32, total_budget: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            month,
            year,
            total_budget,
            total_allocated: 0,
            total_spent: 0,
            remaining_to_allocate: total_budget,
            remaining_budget: total_budget,
            progress_percentage: 0,
            status: BudgetStatus::Safe,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds every stored derived field from the given category sums.
    pub fn refresh_derived(&mut self, total_allocated: i64, total_spent: i64) {
        self.total_allocated = total_allocated;
        self.total_spent = total_spent;
        self.remaining_to_allocate = self.total_budget - total_allocated;
        self.remaining_budget = total_allocated - total_spent;
        self.progress_percentage = progress_percentage(total_spent, total_allocated);
        self.status = classify_status(total_spent, total_allocated);
    }
}

impl Identifiable for BudgetPeriod {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// A named slice of a period's envelope with its own allocation and spend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetCategory {
    pub id: Uuid,
    pub budget_period_id: Uuid,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub allocated_amount: i64,
    pub spent_amount: i64,
    pub category_type: CategoryType,
    pub remaining_amount: i64,
    pub progress_percentage: u32,
    pub status: BudgetStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BudgetCategory {
    pub fn new(input: CreateBudgetCategoryInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            budget_period_id: input.budget_period_id,
            name: input.name,
            icon: input.icon,
            color: input.color,
            allocated_amount: input.allocated_amount,
            spent_amount: 0,
            category_type: input.category_type,
            remaining_amount: input.allocated_amount,
            progress_percentage: 0,
            status: BudgetStatus::Safe,
            created_at: now,
            updated_at: now,
        }
    }

    /// Re-derives remaining/progress/status from the source amounts.
    pub fn refresh_derived(&mut self) {
        self.remaining_amount = self.allocated_amount - self.spent_amount;
        self.progress_percentage = progress_percentage(self.spent_amount, self.allocated_amount);
        self.status = classify_status(self.spent_amount, self.allocated_amount);
    }
}

impl Identifiable for BudgetCategory {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for BudgetCategory {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Whether a category recurs month over month or is a one-off envelope.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CategoryType {
    Recurring,
    OneOff,
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryType::Recurring => "recurring",
            CategoryType::OneOff => "one_off",
        };
        f.write_str(label)
    }
}

/// Input for creating a category. Presentation-level validation such as
/// name length happens upstream of the ledger.
#[derive(Debug, Clone)]
pub struct CreateBudgetCategoryInput {
    pub budget_period_id: Uuid,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub allocated_amount: i64,
    pub category_type: CategoryType,
}

/// Partial update for a category; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetCategoryInput {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub allocated_amount: Option<i64>,
    pub category_type: Option<CategoryType>,
}
