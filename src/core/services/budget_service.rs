//! Business logic for budget periods and their categories.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{BudgetCategory, CreateBudgetCategoryInput, UpdateBudgetCategoryInput};
use crate::domain::budget::BudgetPeriod;
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::Ledger;

/// Provides validated CRUD helpers for budget periods and categories, plus
/// the spending-delta primitive every transaction mutation funnels through.
pub struct BudgetService;

impl BudgetService {
    /// Upserts a period by its (month, year) natural key.
    ///
    /// An existing period keeps its allocation and spend figures; only
    /// `total_budget` is overwritten. Callers rely on this to never end up
    /// with two periods for the same month.
    pub fn create_or_update_period(
        ledger: &mut Ledger,
        month: u32,
        year: i32,
        total_budget: i64,
    ) -> LedgerResult<Uuid> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::InvalidInput(format!(
                "month {} is out of range 1-12",
                month
            )));
        }
        if let Some(id) = ledger.period_for(month, year).map(|period| period.id) {
            let (allocated, spent) = Self::category_sums(ledger, id);
            let period = ledger
                .period_mut(id)
                .ok_or(LedgerError::PeriodNotFound(id))?;
            period.total_budget = total_budget;
            period.refresh_derived(allocated, spent);
            period.updated_at = Utc::now();
            ledger.touch();
            tracing::debug!(%id, month, year, total_budget, "budget period updated");
            return Ok(id);
        }
        let period = BudgetPeriod::new(month, year, total_budget);
        let id = period.id;
        ledger.periods.push(period);
        ledger.touch();
        tracing::debug!(%id, month, year, total_budget, "budget period created");
        Ok(id)
    }

    /// Adds a category to its parent period and re-derives the period's
    /// allocation figures.
    ///
    /// Allocation that would exceed the period's remaining envelope is
    /// rejected with `OverAllocation`.
    pub fn add_category(
        ledger: &mut Ledger,
        input: CreateBudgetCategoryInput,
    ) -> LedgerResult<Uuid> {
        let period_id = input.budget_period_id;
        let period = ledger
            .period(period_id)
            .ok_or(LedgerError::PeriodNotFound(period_id))?;
        let (allocated, _) = Self::category_sums(ledger, period_id);
        let remaining = period.total_budget - allocated;
        if input.allocated_amount > remaining {
            return Err(LedgerError::OverAllocation {
                period: period_id,
                requested: input.allocated_amount,
                remaining,
            });
        }
        let category = BudgetCategory::new(input);
        let id = category.id;
        ledger.categories.push(category);
        Self::refresh_period(ledger, period_id)?;
        tracing::debug!(%id, period = %period_id, "budget category created");
        Ok(id)
    }

    /// Merges the partial update into the category. Allocation changes are
    /// checked against the period envelope and cascade into the parent's
    /// derived fields.
    pub fn update_category(
        ledger: &mut Ledger,
        id: Uuid,
        changes: UpdateBudgetCategoryInput,
    ) -> LedgerResult<()> {
        let (period_id, current_allocation) = {
            let category = ledger
                .category(id)
                .ok_or(LedgerError::CategoryNotFound(id))?;
            (category.budget_period_id, category.allocated_amount)
        };
        if let Some(new_allocation) = changes.allocated_amount {
            let period = ledger
                .period(period_id)
                .ok_or(LedgerError::PeriodNotFound(period_id))?;
            let (allocated, _) = Self::category_sums(ledger, period_id);
            // The category's own current allocation does not count against it.
            let remaining = period.total_budget - (allocated - current_allocation);
            if new_allocation > remaining {
                return Err(LedgerError::OverAllocation {
                    period: period_id,
                    requested: new_allocation,
                    remaining,
                });
            }
        }
        let category = ledger
            .category_mut(id)
            .ok_or(LedgerError::CategoryNotFound(id))?;
        if let Some(name) = changes.name {
            category.name = name;
        }
        if let Some(icon) = changes.icon {
            category.icon = icon;
        }
        if let Some(color) = changes.color {
            category.color = color;
        }
        if let Some(category_type) = changes.category_type {
            category.category_type = category_type;
        }
        if let Some(allocated_amount) = changes.allocated_amount {
            category.allocated_amount = allocated_amount;
        }
        category.refresh_derived();
        category.updated_at = Utc::now();
        Self::refresh_period(ledger, period_id)?;
        Ok(())
    }

    /// Removes the category and re-derives the parent period's allocation.
    ///
    /// Spend already attributed to the category is not reversed; deleting a
    /// category that live transactions still reference is unsupported.
    pub fn delete_category(ledger: &mut Ledger, id: Uuid) -> LedgerResult<()> {
        let period_id = ledger
            .category(id)
            .map(|category| category.budget_period_id)
            .ok_or(LedgerError::CategoryNotFound(id))?;
        ledger.categories.retain(|category| category.id != id);
        Self::refresh_period(ledger, period_id)?;
        tracing::debug!(%id, period = %period_id, "budget category deleted");
        Ok(())
    }

    /// Applies a signed spending delta to a category: positive when a
    /// transaction is recorded, negative when one is rolled back.
    ///
    /// Over-budget deltas are allowed; they surface as `Exceeded` status
    /// rather than an error.
    pub fn apply_spending_delta(
        ledger: &mut Ledger,
        category_id: Uuid,
        delta: i64,
    ) -> LedgerResult<()> {
        let category = ledger
            .category_mut(category_id)
            .ok_or(LedgerError::CategoryNotFound(category_id))?;
        category.spent_amount += delta;
        category.refresh_derived();
        category.updated_at = Utc::now();
        let period_id = category.budget_period_id;
        Self::refresh_period(ledger, period_id)?;
        tracing::debug!(category = %category_id, delta, "spending delta applied");
        Ok(())
    }

    /// Sum of category allocations in the period, recomputed at query time.
    pub fn total_allocated(ledger: &Ledger, period_id: Uuid) -> i64 {
        ledger
            .categories_for(period_id)
            .map(|category| category.allocated_amount)
            .sum()
    }

    /// Sum of category spend in the period, recomputed at query time.
    pub fn total_spent(ledger: &Ledger, period_id: Uuid) -> i64 {
        ledger
            .categories_for(period_id)
            .map(|category| category.spent_amount)
            .sum()
    }

    /// Unallocated envelope remaining, floored at zero for allocation UIs.
    pub fn remaining_to_allocate(ledger: &Ledger, period_id: Uuid) -> i64 {
        let Some(period) = ledger.period(period_id) else {
            return 0;
        };
        (period.total_budget - Self::total_allocated(ledger, period_id)).max(0)
    }

    /// Rebuilds the period's stored derived fields from category ground
    /// truth. Also usable as a repair hook after external data migration.
    pub fn refresh_period(ledger: &mut Ledger, period_id: Uuid) -> LedgerResult<()> {
        let (allocated, spent) = Self::category_sums(ledger, period_id);
        let period = ledger
            .period_mut(period_id)
            .ok_or(LedgerError::PeriodNotFound(period_id))?;
        period.refresh_derived(allocated, spent);
        period.updated_at = Utc::now();
        ledger.touch();
        Ok(())
    }

    fn category_sums(ledger: &Ledger, period_id: Uuid) -> (i64, i64) {
        ledger.categories_for(period_id).fold(
            (0, 0),
            |(allocated, spent), category| {
                (
                    allocated + category.allocated_amount,
                    spent + category.spent_amount,
                )
            },
        )
    }
}
