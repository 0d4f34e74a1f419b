mod common;

use std::sync::Arc;

use budget_engine::{
    domain::{CategoryGroup, NewTransaction, TargetAllocation, TransactionKind},
    errors::BudgetError,
    storage::{BudgetStore, CategoryRecord, InMemoryStore, TransactionRecord, UserDocument},
};
use common::{date, open_session};
use serde_json::json;

fn raw(
    id: i64,
    kind: &str,
    amount: serde_json::Value,
    category: &str,
    when: &str,
) -> TransactionRecord {
    TransactionRecord {
        id,
        user_id: 1,
        description: json!(""),
        amount,
        transaction_type: json!(kind),
        category: json!(category),
        date: json!(when),
    }
}

#[test]
fn new_user_starts_with_household_defaults() {
    let session = open_session(Box::new(InMemoryStore::new()));
    assert!(!session.is_degraded());
    assert_eq!(session.snapshot().taxonomy().all().len(), 7);
    assert_eq!(session.snapshot().targets().projected_income, 5000.0);
    assert_eq!(session.snapshot().targets().target("Housing"), 1500.0);
}

#[test]
fn messy_store_records_are_sanitised_once() {
    let store = InMemoryStore::new().with_user(
        1,
        UserDocument {
            transactions: vec![
                raw(1, "expense", json!("42.5"), "Food", "2024-03-02T10:00:00"),
                raw(2, "expense", json!(null), "Food", "2024-03-03"),
                raw(3, "transfer", json!(10), "Food", "2024-03-03"),
                raw(4, "expense", json!(99), "Food", "someday"),
            ],
            categories: CategoryRecord::default(),
        },
    );
    let session = open_session(Box::new(store));
    assert_eq!(session.dropped_records(), [3]);
    let report = session.month_report(2024, 3);
    assert_eq!(report.aggregate.expense_by_category.get("Food"), Some(42.5));
    assert_eq!(session.year_report(2024).rows[2].expense_total, 42.5);
}

#[test]
fn unknown_expense_category_is_filed_under_other() {
    let mut session = open_session(Box::new(InMemoryStore::new()));
    let created = session
        .add_transaction(
            NewTransaction::new("Concert", 60.0, TransactionKind::Expense)
                .with_category("Music")
                .on(date(2024, 3, 4)),
        )
        .expect("create");
    assert_eq!(created.category.as_deref(), Some("Other"));
    let report = session.month_report(2024, 3);
    assert_eq!(report.aggregate.expense_by_category.get("Other"), Some(60.0));
}

#[test]
fn taxonomy_edits_persist_with_reconciled_targets() {
    let store = Arc::new(InMemoryStore::new());
    let mut session = open_session(Box::new(store.clone()));
    session
        .replace_taxonomy_from_payload(&json!({
            "needs_categories": ["Housing", "Childcare"],
            "wants_categories": ["Travel", "Other"],
            "savings_categories": ["Pension"],
        }))
        .expect("replace");
    session.set_targets([("Pension", 400.0)]).expect("targets");
    session.set_projected_income(6000.0).expect("income");

    let stored = store.fetch_categories(1).expect("fetch");
    assert_eq!(stored.categories, ["Housing", "Childcare", "Travel", "Other", "Pension"]);

    let targets = session.snapshot().targets();
    assert_eq!(targets.projected_income, 6000.0);
    assert_eq!(targets.target("Housing"), 1500.0);
    assert_eq!(targets.target("Pension"), 400.0);
    assert!(!targets.targets.contains_key("Food"));

    let moved = session.snapshot().taxonomy().assign("Travel", CategoryGroup::Needs);
    session.replace_taxonomy(moved).expect("move");
    assert_eq!(
        session.snapshot().taxonomy().group_of("Travel"),
        Some(CategoryGroup::Needs)
    );
}

#[test]
fn whole_plan_replacement_is_reconciled_before_saving() {
    let store = Arc::new(InMemoryStore::new());
    let mut session = open_session(Box::new(store.clone()));
    let plan = TargetAllocation::new(3200.0)
        .with_target("Housing", 1200.0)
        .with_target("Boat", 800.0);
    session.set_allocation(plan).expect("save plan");

    let targets = session.snapshot().targets();
    assert_eq!(targets.projected_income, 3200.0);
    assert_eq!(targets.target("Housing"), 1200.0);
    assert_eq!(targets.target("Food"), 0.0);
    assert!(!targets.targets.contains_key("Boat"));
    let stored = store.fetch_categories(1).expect("fetch");
    assert!(!stored.targets.expect("plan saved").contains_key("Boat"));
}

#[test]
fn rejected_payload_leaves_store_untouched() {
    let store = Arc::new(InMemoryStore::new());
    let mut session = open_session(Box::new(store.clone()));
    let err = session
        .replace_taxonomy_from_payload(&json!({"wants_categories": 3}))
        .expect_err("not a list");
    assert!(matches!(err, BudgetError::Validation(_)));
    assert_eq!(store.fetch_categories(1).expect("fetch"), CategoryRecord::default());
}

#[test]
fn outage_degrades_without_losing_the_snapshot() {
    let store = Arc::new(InMemoryStore::new());
    let mut session = open_session(Box::new(store.clone()));
    let created = session
        .add_transaction(NewTransaction::new("Pay", 2500.0, TransactionKind::Income))
        .expect("create");

    store.set_offline(true);
    assert!(session.delete_transaction(created.id).is_err());
    assert_eq!(session.snapshot().transactions().len(), 1);

    store.set_offline(false);
    session.delete_transaction(created.id).expect("delete");
    assert!(session.snapshot().transactions().is_empty());
    assert!(matches!(
        session.delete_transaction(created.id),
        Err(BudgetError::TransactionNotFound(_))
    ));
}

#[test]
fn unreadable_categories_open_degraded() {
    let store = InMemoryStore::new().with_user(
        1,
        UserDocument {
            transactions: Vec::new(),
            categories: serde_json::from_value(json!({"needs_categories": "Rent"}))
                .expect("record"),
        },
    );
    let session = open_session(Box::new(store));
    assert!(session.is_degraded());
    let summary = session.advisor_summary(2024, 3);
    assert_eq!(summary.total_expenses, 0.0);
    assert_eq!(summary.projected_savings, Some(5000.0));
}
