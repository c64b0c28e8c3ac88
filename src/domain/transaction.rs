//! Domain types for income and expense transactions.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Identifiable;

/// A single income or expense event.
///
/// An expense may link to one budget category; an income may route into one
/// savings goal. Either link means the transaction's amount has already been
/// applied to that aggregate and must be reversed exactly once on deletion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionType,
    pub amount: i64,
    pub description: String,
    /// Display label, independent of any linked category's name (income
    /// sources are free text).
    pub category_name: String,
    pub transaction_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_period_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_goal_id: Option<Uuid>,
    /// Icon/color snapshot taken from the linked category or goal at
    /// creation time; survives later edits to the source entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(input: CreateTransactionInput, budget_period_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind: input.kind,
            amount: input.amount,
            description: input.description,
            category_name: input.category_name,
            transaction_date: input.transaction_date,
            budget_period_id,
            budget_category_id: input.budget_category_id,
            savings_goal_id: input.savings_goal_id,
            display_icon: None,
            display_color: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        };
        f.write_str(label)
    }
}

/// Already-validated input for recording a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub kind: TransactionType,
    pub amount: i64,
    pub description: String,
    pub category_name: String,
    pub transaction_date: NaiveDate,
    pub budget_category_id: Option<Uuid>,
    pub savings_goal_id: Option<Uuid>,
}

/// Partial update for a transaction. Changing `amount`, the linked
/// category/goal, or the kind triggers full side-effect reconciliation.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    pub kind: Option<TransactionType>,
    pub amount: Option<i64>,
    pub description: Option<String>,
    pub category_name: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub budget_category_id: Option<Option<Uuid>>,
    pub savings_goal_id: Option<Option<Uuid>>,
}

/// Query filters applied by `TransactionService::filtered`, in order:
/// type, inclusive date range, category, then case-insensitive search.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilters {
    pub kind: Option<TransactionType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
    pub search_query: Option<String>,
}

/// Income/expense totals over a filtered transaction set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionSummary {
    pub total_income: i64,
    pub total_expense: i64,
    pub net_balance: i64,
    pub transaction_count: usize,
    pub income_count: usize,
    pub expense_count: usize,
}
