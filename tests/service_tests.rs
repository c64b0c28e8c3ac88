use chrono::NaiveDate;
use uuid::Uuid;

use tabungan_core::{
    core::services::{BudgetService, PeriodResolver, SavingsService, TransactionService},
    domain::{
        BudgetStatus, CategoryType, CreateBudgetCategoryInput, CreateSavingsInput,
        CreateTransactionInput, SavingsType, TransactionFilters, TransactionType,
        UpdateTransactionInput,
    },
    errors::LedgerError,
    ledger::Ledger,
};

/// Pins period resolution to a fixed month so the suite does not depend on
/// the wall clock.
struct FixedMonthResolver {
    month: u32,
    year: i32,
}

impl PeriodResolver for FixedMonthResolver {
    fn resolve(&self, ledger: &Ledger, _transaction_date: NaiveDate) -> Option<Uuid> {
        ledger
            .period_for(self.month, self.year)
            .map(|period| period.id)
    }
}

fn february_resolver() -> FixedMonthResolver {
    FixedMonthResolver {
        month: 2,
        year: 2024,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn category_input(period: Uuid, name: &str, amount: i64) -> CreateBudgetCategoryInput {
    CreateBudgetCategoryInput {
        budget_period_id: period,
        name: name.into(),
        icon: "🍜".into(),
        color: "#ff7043".into(),
        allocated_amount: amount,
        category_type: CategoryType::Recurring,
    }
}

fn expense(category: Uuid, amount: i64, day: u32) -> CreateTransactionInput {
    CreateTransactionInput {
        kind: TransactionType::Expense,
        amount,
        description: "belanja".into(),
        category_name: "Makan".into(),
        transaction_date: date(2024, 2, day),
        budget_category_id: Some(category),
        savings_goal_id: None,
    }
}

fn income_to_goal(goal: Uuid, amount: i64, day: u32) -> CreateTransactionInput {
    CreateTransactionInput {
        kind: TransactionType::Income,
        amount,
        description: "gaji".into(),
        category_name: "Gaji".into(),
        transaction_date: date(2024, 2, day),
        budget_category_id: None,
        savings_goal_id: Some(goal),
    }
}

fn reguler_goal(name: &str, target: i64, initial: Option<i64>) -> CreateSavingsInput {
    CreateSavingsInput {
        name: name.into(),
        goal_type: SavingsType::Reguler,
        target_amount: target,
        target_date: None,
        initial_amount: initial,
        icon: "🏝️".into(),
        color: "#26a69a".into(),
    }
}

/// Period with one "Makan" category allocated at 1,500,000 out of a
/// 5,000,000 envelope.
fn prepared_budget() -> (Ledger, Uuid, Uuid) {
    let mut ledger = Ledger::new("Rumah Tangga");
    let period = BudgetService::create_or_update_period(&mut ledger, 2, 2024, 5_000_000).unwrap();
    let category =
        BudgetService::add_category(&mut ledger, category_input(period, "Makan", 1_500_000))
            .unwrap();
    (ledger, period, category)
}

#[test]
fn scenario_a_category_allocation_rolls_up_into_the_period() {
    let (ledger, period, _) = prepared_budget();
    assert_eq!(BudgetService::total_allocated(&ledger, period), 1_500_000);
    assert_eq!(
        BudgetService::remaining_to_allocate(&ledger, period),
        3_500_000
    );
    let stored = ledger.period(period).unwrap();
    assert_eq!(stored.total_allocated, 1_500_000);
    assert_eq!(stored.remaining_to_allocate, 3_500_000);
}

#[test]
fn scenario_b_expense_updates_category_and_period() {
    let (mut ledger, period, category) = prepared_budget();
    TransactionService::create(
        &mut ledger,
        &february_resolver(),
        expense(category, 300_000, 10),
    )
    .unwrap();

    let stored = ledger.category(category).unwrap();
    assert_eq!(stored.spent_amount, 300_000);
    assert_eq!(stored.progress_percentage, 20);
    assert_eq!(stored.status, BudgetStatus::Safe);
    assert_eq!(BudgetService::total_spent(&ledger, period), 300_000);
    assert_eq!(ledger.period(period).unwrap().total_spent, 300_000);
}

#[test]
fn scenario_c_cumulative_spend_reaches_danger() {
    let (mut ledger, _, category) = prepared_budget();
    let resolver = february_resolver();
    TransactionService::create(&mut ledger, &resolver, expense(category, 300_000, 10)).unwrap();
    TransactionService::create(&mut ledger, &resolver, expense(category, 1_100_000, 15)).unwrap();

    let stored = ledger.category(category).unwrap();
    assert_eq!(stored.spent_amount, 1_400_000);
    assert_eq!(stored.status, BudgetStatus::Danger);
    assert_eq!(stored.progress_percentage, 93);
}

#[test]
fn scenario_d_deleting_a_transaction_reverses_exactly_its_amount() {
    let (mut ledger, period, category) = prepared_budget();
    let resolver = february_resolver();
    let first =
        TransactionService::create(&mut ledger, &resolver, expense(category, 300_000, 10))
            .unwrap();
    TransactionService::create(&mut ledger, &resolver, expense(category, 1_100_000, 15)).unwrap();

    TransactionService::delete(&mut ledger, first).unwrap();

    let stored = ledger.category(category).unwrap();
    assert_eq!(stored.spent_amount, 1_100_000);
    assert_eq!(stored.status, BudgetStatus::Safe);
    assert_eq!(stored.progress_percentage, 73);
    assert_eq!(BudgetService::total_spent(&ledger, period), 1_100_000);
    assert!(ledger.transaction(first).is_none());
}

#[test]
fn scenario_e_monthly_target_recomputes_from_the_new_balance() {
    let mut ledger = Ledger::new("Tabungan");
    let created_on = date(2024, 1, 15);
    let goal = SavingsService::create_at(
        &mut ledger,
        CreateSavingsInput {
            name: "Liburan".into(),
            goal_type: SavingsType::Berjangka,
            target_amount: 1_200_000,
            target_date: Some(date(2024, 7, 15)),
            initial_amount: None,
            icon: "🏝️".into(),
            color: "#26a69a".into(),
        },
        created_on,
    )
    .unwrap();
    assert_eq!(ledger.goal(goal).unwrap().monthly_target, Some(200_000));

    SavingsService::deposit_at(&mut ledger, goal, 200_000, date(2024, 2, 15)).unwrap();
    let stored = ledger.goal(goal).unwrap();
    assert_eq!(stored.current_amount, 200_000);
    assert_eq!(stored.monthly_target, Some(200_000));
}

#[test]
fn scenario_f_overdraw_fails_and_leaves_the_balance_alone() {
    let mut ledger = Ledger::new("Tabungan");
    let goal =
        SavingsService::create(&mut ledger, reguler_goal("Dana Darurat", 5_000_000, Some(300_000)))
            .unwrap();

    let err = SavingsService::withdraw(&mut ledger, goal, 500_000).expect_err("overdraw");
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    assert_eq!(ledger.goal(goal).unwrap().current_amount, 300_000);
}

#[test]
fn allocation_and_spend_sums_hold_across_category_churn() {
    let (mut ledger, period, makan) = prepared_budget();
    let transport =
        BudgetService::add_category(&mut ledger, category_input(period, "Transport", 800_000))
            .unwrap();
    BudgetService::apply_spending_delta(&mut ledger, makan, 250_000).unwrap();
    BudgetService::apply_spending_delta(&mut ledger, transport, 100_000).unwrap();

    let expected_allocated: i64 = ledger
        .categories_for(period)
        .map(|c| c.allocated_amount)
        .sum();
    let expected_spent: i64 = ledger.categories_for(period).map(|c| c.spent_amount).sum();
    assert_eq!(
        BudgetService::total_allocated(&ledger, period),
        expected_allocated
    );
    assert_eq!(BudgetService::total_spent(&ledger, period), expected_spent);
    let stored = ledger.period(period).unwrap();
    assert_eq!(stored.total_allocated, expected_allocated);
    assert_eq!(stored.total_spent, expected_spent);

    BudgetService::delete_category(&mut ledger, transport).unwrap();
    assert_eq!(BudgetService::total_allocated(&ledger, period), 1_500_000);
    assert_eq!(ledger.period(period).unwrap().total_allocated, 1_500_000);
}

#[test]
fn income_to_savings_round_trips_through_create_and_delete() {
    let (mut ledger, _, _) = prepared_budget();
    let goal =
        SavingsService::create(&mut ledger, reguler_goal("Liburan", 3_000_000, None)).unwrap();

    let resolver = february_resolver();
    let txn = TransactionService::create(&mut ledger, &resolver, income_to_goal(goal, 750_000, 5))
        .unwrap();
    assert_eq!(ledger.goal(goal).unwrap().current_amount, 750_000);
    let stored = ledger.transaction(txn).unwrap();
    assert_eq!(stored.display_icon.as_deref(), Some("🏝️"));

    TransactionService::delete(&mut ledger, txn).unwrap();
    assert_eq!(ledger.goal(goal).unwrap().current_amount, 0);
    assert!(ledger.transaction(txn).is_none());
}

#[test]
fn delete_aborts_when_the_goal_cannot_fund_the_rollback() {
    let (mut ledger, _, _) = prepared_budget();
    let goal =
        SavingsService::create(&mut ledger, reguler_goal("Liburan", 3_000_000, None)).unwrap();
    let resolver = february_resolver();
    let txn = TransactionService::create(&mut ledger, &resolver, income_to_goal(goal, 750_000, 5))
        .unwrap();

    // Someone drained the goal directly in the meantime.
    SavingsService::withdraw(&mut ledger, goal, 500_000).unwrap();

    let err = TransactionService::delete(&mut ledger, txn).expect_err("rollback underfunded");
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    // The record survives and the balance is untouched by the failed delete.
    assert!(ledger.transaction(txn).is_some());
    assert_eq!(ledger.goal(goal).unwrap().current_amount, 250_000);
}

#[test]
fn update_reconciliation_moves_spend_between_categories_exactly_once() {
    let (mut ledger, period, makan) = prepared_budget();
    let transport =
        BudgetService::add_category(&mut ledger, category_input(period, "Transport", 800_000))
            .unwrap();
    let resolver = february_resolver();
    let txn =
        TransactionService::create(&mut ledger, &resolver, expense(makan, 300_000, 10)).unwrap();

    TransactionService::update(
        &mut ledger,
        &resolver,
        txn,
        UpdateTransactionInput {
            amount: Some(450_000),
            budget_category_id: Some(Some(transport)),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(ledger.category(makan).unwrap().spent_amount, 0);
    assert_eq!(ledger.category(transport).unwrap().spent_amount, 450_000);
    assert_eq!(BudgetService::total_spent(&ledger, period), 450_000);
    let stored = ledger.transaction(txn).unwrap();
    assert_eq!(stored.amount, 450_000);
    assert_eq!(stored.budget_category_id, Some(transport));
    // Display snapshot follows the new category.
    assert_eq!(stored.display_icon.as_deref(), Some("🍜"));
}

#[test]
fn update_without_financial_changes_leaves_side_effects_alone() {
    let (mut ledger, _, makan) = prepared_budget();
    let resolver = february_resolver();
    let txn =
        TransactionService::create(&mut ledger, &resolver, expense(makan, 300_000, 10)).unwrap();

    TransactionService::update(
        &mut ledger,
        &resolver,
        txn,
        UpdateTransactionInput {
            description: Some("makan malam".into()),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(ledger.category(makan).unwrap().spent_amount, 300_000);
    assert_eq!(ledger.transaction(txn).unwrap().description, "makan malam");
}

#[test]
fn unknown_ids_surface_typed_not_found_errors() {
    let mut ledger = Ledger::new("Kosong");
    let missing = Uuid::new_v4();

    assert!(matches!(
        BudgetService::apply_spending_delta(&mut ledger, missing, 1).unwrap_err(),
        LedgerError::CategoryNotFound(_)
    ));
    assert!(matches!(
        BudgetService::delete_category(&mut ledger, missing).unwrap_err(),
        LedgerError::CategoryNotFound(_)
    ));
    assert!(matches!(
        SavingsService::deposit(&mut ledger, missing, 1).unwrap_err(),
        LedgerError::GoalNotFound(_)
    ));
    assert!(matches!(
        SavingsService::delete(&mut ledger, missing).unwrap_err(),
        LedgerError::GoalNotFound(_)
    ));
    assert!(matches!(
        TransactionService::delete(&mut ledger, missing).unwrap_err(),
        LedgerError::TransactionNotFound(_)
    ));
}

#[test]
fn filters_narrow_by_type_date_category_and_search() {
    let (mut ledger, _, makan) = prepared_budget();
    let resolver = february_resolver();
    TransactionService::create(&mut ledger, &resolver, expense(makan, 300_000, 5)).unwrap();
    TransactionService::create(&mut ledger, &resolver, expense(makan, 100_000, 20)).unwrap();
    TransactionService::create(
        &mut ledger,
        &resolver,
        CreateTransactionInput {
            kind: TransactionType::Income,
            amount: 4_000_000,
            description: "Gaji bulanan".into(),
            category_name: "Gaji".into(),
            transaction_date: date(2024, 2, 1),
            budget_category_id: None,
            savings_goal_id: None,
        },
    )
    .unwrap();

    let only_income = TransactionService::filtered(
        &ledger,
        &TransactionFilters {
            kind: Some(TransactionType::Income),
            ..Default::default()
        },
    );
    assert_eq!(only_income.len(), 1);
    assert_eq!(only_income[0].amount, 4_000_000);

    // Date bounds are inclusive on both ends.
    let ranged = TransactionService::filtered(
        &ledger,
        &TransactionFilters {
            start_date: Some(date(2024, 2, 1)),
            end_date: Some(date(2024, 2, 5)),
            ..Default::default()
        },
    );
    assert_eq!(ranged.len(), 2);

    let by_category = TransactionService::filtered(
        &ledger,
        &TransactionFilters {
            category_id: Some(makan),
            ..Default::default()
        },
    );
    assert_eq!(by_category.len(), 2);

    let searched = TransactionService::filtered(
        &ledger,
        &TransactionFilters {
            search_query: Some("GAJI".into()),
            ..Default::default()
        },
    );
    assert_eq!(searched.len(), 1);

    // Sorted newest first.
    let all = TransactionService::filtered(&ledger, &TransactionFilters::default());
    assert_eq!(all[0].transaction_date, date(2024, 2, 20));
    assert_eq!(all[2].transaction_date, date(2024, 2, 1));
}

#[test]
fn summary_reduces_the_filtered_set() {
    let (mut ledger, _, makan) = prepared_budget();
    let resolver = february_resolver();
    TransactionService::create(&mut ledger, &resolver, expense(makan, 300_000, 5)).unwrap();
    TransactionService::create(&mut ledger, &resolver, expense(makan, 100_000, 20)).unwrap();
    TransactionService::create(
        &mut ledger,
        &resolver,
        CreateTransactionInput {
            kind: TransactionType::Income,
            amount: 4_000_000,
            description: "Gaji bulanan".into(),
            category_name: "Gaji".into(),
            transaction_date: date(2024, 2, 1),
            budget_category_id: None,
            savings_goal_id: None,
        },
    )
    .unwrap();

    let summary = TransactionService::summary(&ledger, &TransactionFilters::default());
    assert_eq!(summary.total_income, 4_000_000);
    assert_eq!(summary.total_expense, 400_000);
    assert_eq!(summary.net_balance, 3_600_000);
    assert_eq!(summary.transaction_count, 3);
    assert_eq!(summary.income_count, 1);
    assert_eq!(summary.expense_count, 2);
}

#[test]
fn refresh_period_repairs_tampered_derived_fields() {
    let (mut ledger, period, makan) = prepared_budget();
    BudgetService::apply_spending_delta(&mut ledger, makan, 400_000).unwrap();

    // Simulate a stored projection that drifted from ground truth.
    ledger.period_mut(period).unwrap().total_spent = 0;
    ledger.period_mut(period).unwrap().total_allocated = 0;

    BudgetService::refresh_period(&mut ledger, period).unwrap();
    let stored = ledger.period(period).unwrap();
    assert_eq!(stored.total_allocated, 1_500_000);
    assert_eq!(stored.total_spent, 400_000);
    assert_eq!(stored.remaining_budget, 1_100_000);
}
