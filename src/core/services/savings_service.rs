//! Business logic for savings goals and guarded balance mutation.

use chrono::{Local, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{CreateSavingsInput, SavingsGoal, SavingsType, UpdateSavingsInput};
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::Ledger;

/// CRUD over savings goals plus deposit/withdraw with a balance floor.
///
/// Monthly targets for fixed-term goals depend on "today"; every public
/// operation has an `_at` variant taking an explicit date so the math stays
/// deterministic under test, with the plain name delegating to the local
/// calendar date.
pub struct SavingsService;

impl SavingsService {
    pub fn create(ledger: &mut Ledger, input: CreateSavingsInput) -> LedgerResult<Uuid> {
        Self::create_at(ledger, input, today())
    }

    pub fn create_at(
        ledger: &mut Ledger,
        input: CreateSavingsInput,
        today: NaiveDate,
    ) -> LedgerResult<Uuid> {
        if input.target_amount <= 0 {
            return Err(LedgerError::InvalidAmount(input.target_amount));
        }
        if input.goal_type == SavingsType::Berjangka && input.target_date.is_none() {
            return Err(LedgerError::MissingTargetDate);
        }
        let goal = SavingsGoal::new(input, today);
        let id = goal.id;
        ledger.goals.push(goal);
        ledger.touch();
        tracing::debug!(%id, "savings goal created");
        Ok(id)
    }

    pub fn update(ledger: &mut Ledger, id: Uuid, changes: UpdateSavingsInput) -> LedgerResult<()> {
        Self::update_at(ledger, id, changes, today())
    }

    /// Merges the partial update and re-derives progress, remaining amount,
    /// and monthly target whenever the target moves.
    pub fn update_at(
        ledger: &mut Ledger,
        id: Uuid,
        changes: UpdateSavingsInput,
        today: NaiveDate,
    ) -> LedgerResult<()> {
        if let Some(target_amount) = changes.target_amount {
            if target_amount <= 0 {
                return Err(LedgerError::InvalidAmount(target_amount));
            }
        }
        let goal = ledger.goal_mut(id).ok_or(LedgerError::GoalNotFound(id))?;
        if let Some(name) = changes.name {
            goal.name = name;
        }
        if let Some(target_amount) = changes.target_amount {
            goal.target_amount = target_amount;
        }
        if let Some(target_date) = changes.target_date {
            goal.target_date = Some(target_date);
        }
        if let Some(icon) = changes.icon {
            goal.icon = icon;
        }
        if let Some(color) = changes.color {
            goal.color = color;
        }
        if let Some(is_active) = changes.is_active {
            goal.is_active = is_active;
        }
        goal.refresh_derived(today);
        goal.updated_at = Utc::now();
        ledger.touch();
        Ok(())
    }

    /// Hard delete. Prefer `deactivate` when history should survive.
    pub fn delete(ledger: &mut Ledger, id: Uuid) -> LedgerResult<()> {
        let before = ledger.goals.len();
        ledger.goals.retain(|goal| goal.id != id);
        if ledger.goals.len() == before {
            return Err(LedgerError::GoalNotFound(id));
        }
        ledger.touch();
        tracing::debug!(%id, "savings goal deleted");
        Ok(())
    }

    /// Soft delete: the goal keeps its balance but stops being active.
    pub fn deactivate(ledger: &mut Ledger, id: Uuid) -> LedgerResult<()> {
        let goal = ledger.goal_mut(id).ok_or(LedgerError::GoalNotFound(id))?;
        goal.is_active = false;
        goal.updated_at = Utc::now();
        ledger.touch();
        Ok(())
    }

    pub fn deposit(ledger: &mut Ledger, id: Uuid, amount: i64) -> LedgerResult<()> {
        Self::deposit_at(ledger, id, amount, today())
    }

    pub fn deposit_at(
        ledger: &mut Ledger,
        id: Uuid,
        amount: i64,
        today: NaiveDate,
    ) -> LedgerResult<()> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let goal = ledger.goal_mut(id).ok_or(LedgerError::GoalNotFound(id))?;
        goal.current_amount += amount;
        goal.refresh_derived(today);
        goal.updated_at = Utc::now();
        let balance = goal.current_amount;
        ledger.touch();
        tracing::debug!(%id, amount, balance, "funds deposited");
        Ok(())
    }

    pub fn withdraw(ledger: &mut Ledger, id: Uuid, amount: i64) -> LedgerResult<()> {
        Self::withdraw_at(ledger, id, amount, today())
    }

    /// Withdraws `amount`, failing with `InsufficientFunds` (and no
    /// mutation) when the balance cannot cover it. The balance never goes
    /// negative through this ledger.
    pub fn withdraw_at(
        ledger: &mut Ledger,
        id: Uuid,
        amount: i64,
        today: NaiveDate,
    ) -> LedgerResult<()> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let goal = ledger.goal_mut(id).ok_or(LedgerError::GoalNotFound(id))?;
        if goal.current_amount < amount {
            return Err(LedgerError::InsufficientFunds {
                goal: id,
                available: goal.current_amount,
                requested: amount,
            });
        }
        goal.current_amount -= amount;
        goal.refresh_derived(today);
        goal.updated_at = Utc::now();
        let balance = goal.current_amount;
        ledger.touch();
        tracing::debug!(%id, amount, balance, "funds withdrawn");
        Ok(())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
