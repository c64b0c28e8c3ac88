use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BudgetCategory, BudgetPeriod, SavingsGoal, Transaction};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Root aggregate owning all budgeting state for one user.
///
/// Mutation goes through the services in `crate::core::services`; the
/// aggregate itself only offers storage, lookup, and timestamp upkeep.
/// Serialized as a single JSON document by the storage backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub periods: Vec<BudgetPeriod>,
    #[serde(default)]
    pub categories: Vec<BudgetCategory>,
    #[serde(default)]
    pub goals: Vec<SavingsGoal>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            periods: Vec::new(),
            categories: Vec::new(),
            goals: Vec::new(),
            transactions: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn period(&self, id: Uuid) -> Option<&BudgetPeriod> {
        self.periods.iter().find(|period| period.id == id)
    }

    pub fn period_mut(&mut self, id: Uuid) -> Option<&mut BudgetPeriod> {
        self.periods.iter_mut().find(|period| period.id == id)
    }

    /// Looks a period up by its (month, year) natural key.
    pub fn period_for(&self, month: u32, year: i32) -> Option<&BudgetPeriod> {
        self.periods
            .iter()
            .find(|period| period.month == month && period.year == year)
    }

    pub fn category(&self, id: Uuid) -> Option<&BudgetCategory> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn category_mut(&mut self, id: Uuid) -> Option<&mut BudgetCategory> {
        self.categories.iter_mut().find(|category| category.id == id)
    }

    /// Categories belonging to the given period.
    pub fn categories_for(&self, period_id: Uuid) -> impl Iterator<Item = &BudgetCategory> {
        self.categories
            .iter()
            .filter(move |category| category.budget_period_id == period_id)
    }

    pub fn goal(&self, id: Uuid) -> Option<&SavingsGoal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    pub fn goal_mut(&mut self, id: Uuid) -> Option<&mut SavingsGoal> {
        self.goals.iter_mut().find(|goal| goal.id == id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn transaction_mut(&mut self, id: Uuid) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|txn| txn.id == id)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
