pub mod budget_service;
pub mod savings_service;
pub mod transaction_service;

pub use budget_service::BudgetService;
pub use savings_service::SavingsService;
pub use transaction_service::{
    CurrentMonthResolver, PeriodResolver, TransactionDateResolver, TransactionService,
};
