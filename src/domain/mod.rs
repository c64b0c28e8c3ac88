pub mod budget;
pub mod common;
pub mod savings;
pub mod transaction;

pub use budget::{
    BudgetCategory, BudgetPeriod, CategoryType, CreateBudgetCategoryInput,
    UpdateBudgetCategoryInput,
};
pub use common::{
    classify_status, goal_progress, monthly_target, months_between, progress_percentage,
    BudgetStatus,
};
pub use savings::{CreateSavingsInput, SavingsGoal, SavingsType, UpdateSavingsInput};
pub use transaction::{
    CreateTransactionInput, Transaction, TransactionFilters, TransactionSummary, TransactionType,
    UpdateTransactionInput,
};

use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}
