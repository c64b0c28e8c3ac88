//! The transaction orchestrator.
//!
//! This is the only place that reaches into both the budget and savings
//! sides: an expense linked to a category flows through
//! `BudgetService::apply_spending_delta`, an income routed to a goal through
//! `SavingsService::deposit`, and deletion reverses exactly the stored side
//! effect. Every fallible check runs before the first mutation so a failure
//! never leaves a half-applied transaction.

use chrono::{Datelike, Local, NaiveDate, Utc};
use uuid::Uuid;

use crate::core::services::{BudgetService, SavingsService};
use crate::domain::{
    CreateTransactionInput, Transaction, TransactionFilters, TransactionSummary, TransactionType,
    UpdateTransactionInput,
};
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::Ledger;

/// Decides which budget period a new transaction belongs to.
///
/// Returning `None` stores the transaction without period linkage, matching
/// months for which no envelope was ever created.
pub trait PeriodResolver {
    fn resolve(&self, ledger: &Ledger, transaction_date: NaiveDate) -> Option<Uuid>;
}

/// Default policy: transactions belong to the month they are *entered* in,
/// regardless of their own date. A back-dated transaction entered today
/// still lands in today's period.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentMonthResolver;

impl PeriodResolver for CurrentMonthResolver {
    fn resolve(&self, ledger: &Ledger, _transaction_date: NaiveDate) -> Option<Uuid> {
        let today = Local::now().date_naive();
        ledger
            .period_for(today.month(), today.year())
            .map(|period| period.id)
    }
}

/// Alternate policy: transactions belong to the month of their own date.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionDateResolver;

impl PeriodResolver for TransactionDateResolver {
    fn resolve(&self, ledger: &Ledger, transaction_date: NaiveDate) -> Option<Uuid> {
        ledger
            .period_for(transaction_date.month(), transaction_date.year())
            .map(|period| period.id)
    }
}

/// Orchestrates transaction lifecycle and the exactly-once application of
/// financial side effects across the budget and savings aggregates.
pub struct TransactionService;

impl TransactionService {
    /// Records a transaction and applies its financial effect.
    ///
    /// Expenses with a linked category add to that category's spend; income
    /// with a linked goal deposits into it. The display icon/color are
    /// snapshotted from the linked entity at creation time. Records are
    /// prepended, so raw storage order is most-recent-first.
    pub fn create(
        ledger: &mut Ledger,
        resolver: &dyn PeriodResolver,
        input: CreateTransactionInput,
    ) -> LedgerResult<Uuid> {
        if input.amount <= 0 {
            return Err(LedgerError::InvalidAmount(input.amount));
        }
        let period_id = resolver.resolve(ledger, input.transaction_date);
        let snapshot = Self::display_snapshot(ledger, input.kind, &input)?;

        match (input.kind, input.budget_category_id, input.savings_goal_id) {
            (TransactionType::Expense, Some(category_id), _) => {
                BudgetService::apply_spending_delta(ledger, category_id, input.amount)?;
            }
            (TransactionType::Income, _, Some(goal_id)) => {
                SavingsService::deposit(ledger, goal_id, input.amount)?;
            }
            _ => {}
        }

        let mut txn = Transaction::new(input, period_id);
        if let Some((icon, color)) = snapshot {
            txn.display_icon = Some(icon);
            txn.display_color = Some(color);
        }
        let id = txn.id;
        ledger.transactions.insert(0, txn);
        ledger.touch();
        tracing::debug!(%id, "transaction created");
        Ok(id)
    }

    /// Deletes a transaction, reversing its stored side effect first.
    ///
    /// The reversal uses the amount and links recorded on the transaction,
    /// never re-derived values. Income rollback goes through the guarded
    /// `withdraw`; if the goal's balance was drained in the meantime the
    /// delete aborts with `InsufficientFunds` and the record stays.
    pub fn delete(ledger: &mut Ledger, id: Uuid) -> LedgerResult<Transaction> {
        let txn = ledger
            .transaction(id)
            .cloned()
            .ok_or(LedgerError::TransactionNotFound(id))?;
        Self::reverse_side_effect(ledger, &txn)?;
        ledger.transactions.retain(|stored| stored.id != id);
        ledger.touch();
        tracing::debug!(%id, "transaction deleted");
        Ok(txn)
    }

    /// Edits a transaction with full side-effect reconciliation: the old
    /// effect is reversed and the new one applied when the amount, kind, or
    /// linked category/goal changes.
    pub fn update(
        ledger: &mut Ledger,
        resolver: &dyn PeriodResolver,
        id: Uuid,
        changes: UpdateTransactionInput,
    ) -> LedgerResult<()> {
        let old = ledger
            .transaction(id)
            .cloned()
            .ok_or(LedgerError::TransactionNotFound(id))?;

        let kind = changes.kind.unwrap_or(old.kind);
        let amount = changes.amount.unwrap_or(old.amount);
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let transaction_date = changes.transaction_date.unwrap_or(old.transaction_date);
        let budget_category_id = changes
            .budget_category_id
            .unwrap_or(old.budget_category_id);
        let savings_goal_id = changes.savings_goal_id.unwrap_or(old.savings_goal_id);

        let reconcile = kind != old.kind
            || amount != old.amount
            || budget_category_id != old.budget_category_id
            || savings_goal_id != old.savings_goal_id;

        let mut snapshot = None;
        if reconcile {
            // Validate both sides before touching anything.
            let probe = CreateTransactionInput {
                kind,
                amount,
                description: String::new(),
                category_name: String::new(),
                transaction_date,
                budget_category_id,
                savings_goal_id,
            };
            snapshot = Self::display_snapshot(ledger, kind, &probe)?;
            Self::check_reversible(ledger, &old)?;

            Self::reverse_side_effect(ledger, &old)?;
            match (kind, budget_category_id, savings_goal_id) {
                (TransactionType::Expense, Some(category_id), _) => {
                    BudgetService::apply_spending_delta(ledger, category_id, amount)?;
                }
                (TransactionType::Income, _, Some(goal_id)) => {
                    SavingsService::deposit(ledger, goal_id, amount)?;
                }
                _ => {}
            }
        }

        let period_id = if reconcile {
            resolver.resolve(ledger, transaction_date)
        } else {
            old.budget_period_id
        };

        let txn = ledger
            .transaction_mut(id)
            .ok_or(LedgerError::TransactionNotFound(id))?;
        txn.kind = kind;
        txn.amount = amount;
        txn.transaction_date = transaction_date;
        txn.budget_category_id = budget_category_id;
        txn.savings_goal_id = savings_goal_id;
        txn.budget_period_id = period_id;
        if let Some(description) = changes.description {
            txn.description = description;
        }
        if let Some(category_name) = changes.category_name {
            txn.category_name = category_name;
        }
        if reconcile {
            let (icon, color) = match snapshot {
                Some((icon, color)) => (Some(icon), Some(color)),
                None => (None, None),
            };
            txn.display_icon = icon;
            txn.display_color = color;
        }
        txn.updated_at = Utc::now();
        ledger.touch();
        tracing::debug!(%id, reconciled = reconcile, "transaction updated");
        Ok(())
    }

    /// Applies the filters in order (type, inclusive date range, category,
    /// case-insensitive search) and sorts by transaction date, newest first.
    pub fn filtered<'a>(
        ledger: &'a Ledger,
        filters: &TransactionFilters,
    ) -> Vec<&'a Transaction> {
        let query = filters
            .search_query
            .as_ref()
            .map(|query| query.to_lowercase());
        let mut matches: Vec<&Transaction> = ledger
            .transactions
            .iter()
            .filter(|txn| filters.kind.map_or(true, |kind| txn.kind == kind))
            .filter(|txn| {
                filters
                    .start_date
                    .map_or(true, |start| txn.transaction_date >= start)
            })
            .filter(|txn| {
                filters
                    .end_date
                    .map_or(true, |end| txn.transaction_date <= end)
            })
            .filter(|txn| {
                filters
                    .category_id
                    .map_or(true, |category| txn.budget_category_id == Some(category))
            })
            .filter(|txn| {
                query.as_ref().map_or(true, |query| {
                    txn.description.to_lowercase().contains(query)
                        || txn.category_name.to_lowercase().contains(query)
                })
            })
            .collect();
        // Stable sort: same-day records keep their most-recent-first
        // storage order.
        matches.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        matches
    }

    /// Reduces the filtered set into income/expense totals and counts.
    pub fn summary(ledger: &Ledger, filters: &TransactionFilters) -> TransactionSummary {
        let mut summary = TransactionSummary::default();
        for txn in Self::filtered(ledger, filters) {
            summary.transaction_count += 1;
            match txn.kind {
                TransactionType::Income => {
                    summary.income_count += 1;
                    summary.total_income += txn.amount;
                }
                TransactionType::Expense => {
                    summary.expense_count += 1;
                    summary.total_expense += txn.amount;
                }
            }
        }
        summary.net_balance = summary.total_income - summary.total_expense;
        summary
    }

    /// The most recent transactions in date order.
    pub fn recent(ledger: &Ledger, limit: usize) -> Vec<&Transaction> {
        let mut matches = Self::filtered(ledger, &TransactionFilters::default());
        matches.truncate(limit);
        matches
    }

    /// Transactions dated within the given calendar month.
    pub fn by_period(ledger: &Ledger, month: u32, year: i32) -> Vec<&Transaction> {
        let mut matches: Vec<&Transaction> = ledger
            .transactions
            .iter()
            .filter(|txn| {
                txn.transaction_date.month() == month && txn.transaction_date.year() == year
            })
            .collect();
        matches.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        matches
    }

    /// Resolves the linked entity for the display snapshot, surfacing
    /// `NotFound` before any mutation happens.
    fn display_snapshot(
        ledger: &Ledger,
        kind: TransactionType,
        input: &CreateTransactionInput,
    ) -> LedgerResult<Option<(String, String)>> {
        match (kind, input.budget_category_id, input.savings_goal_id) {
            (TransactionType::Expense, Some(category_id), _) => {
                let category = ledger
                    .category(category_id)
                    .ok_or(LedgerError::CategoryNotFound(category_id))?;
                Ok(Some((category.icon.clone(), category.color.clone())))
            }
            (TransactionType::Income, _, Some(goal_id)) => {
                let goal = ledger
                    .goal(goal_id)
                    .ok_or(LedgerError::GoalNotFound(goal_id))?;
                Ok(Some((goal.icon.clone(), goal.color.clone())))
            }
            _ => Ok(None),
        }
    }

    /// Checks that the stored side effect can be reversed without mutating.
    fn check_reversible(ledger: &Ledger, txn: &Transaction) -> LedgerResult<()> {
        match (txn.kind, txn.budget_category_id, txn.savings_goal_id) {
            (TransactionType::Expense, Some(category_id), _) => {
                ledger
                    .category(category_id)
                    .map(|_| ())
                    .ok_or(LedgerError::CategoryNotFound(category_id))
            }
            (TransactionType::Income, _, Some(goal_id)) => {
                let goal = ledger
                    .goal(goal_id)
                    .ok_or(LedgerError::GoalNotFound(goal_id))?;
                if goal.current_amount < txn.amount {
                    return Err(LedgerError::InsufficientFunds {
                        goal: goal_id,
                        available: goal.current_amount,
                        requested: txn.amount,
                    });
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Reverses exactly the side effect a stored transaction applied.
    fn reverse_side_effect(ledger: &mut Ledger, txn: &Transaction) -> LedgerResult<()> {
        match (txn.kind, txn.budget_category_id, txn.savings_goal_id) {
            (TransactionType::Expense, Some(category_id), _) => {
                BudgetService::apply_spending_delta(ledger, category_id, -txn.amount)
            }
            (TransactionType::Income, _, Some(goal_id)) => {
                SavingsService::withdraw(ledger, goal_id, txn.amount)
            }
            _ => Ok(()),
        }
    }
}
