mod common;

use std::fs;

use budget_engine::{
    config::Config,
    core::{BudgetSession, FixedClock},
    domain::{NewTransaction, TransactionKind},
    storage::{BudgetStore, CategoryRecord, JsonStore},
};
use common::{date, temp_dir};
use serde_json::json;

#[test]
fn session_state_survives_reopening() {
    let root = temp_dir();
    {
        let store = JsonStore::new(Some(root.clone())).expect("open store");
        let mut session = BudgetSession::open(
            Box::new(store),
            Box::new(FixedClock(date(2024, 5, 1))),
            Config::default(),
            3,
        );
        session
            .add_transaction(
                NewTransaction::new("Groceries", 82.4, TransactionKind::Expense)
                    .with_category("Food"),
            )
            .expect("create");
        session.set_projected_income(4100.0).expect("income");
    }

    let store = JsonStore::new(Some(root)).expect("reopen store");
    let session = BudgetSession::open(
        Box::new(store),
        Box::new(FixedClock(date(2024, 5, 20))),
        Config::default(),
        3,
    );
    assert_eq!(session.snapshot().targets().projected_income, 4100.0);
    let report = session.current_month_report();
    assert_eq!(report.aggregate.expense_by_category.get("Food"), Some(82.4));
}

#[test]
fn users_are_stored_separately() {
    let store = JsonStore::new(Some(temp_dir())).expect("open store");
    let draft = NewTransaction::new("Bus", 2.5, TransactionKind::Expense).on(date(2024, 1, 1));
    store.create_transaction(1, &draft).expect("create");
    store.create_transaction(2, &draft).expect("create");
    store.create_transaction(2, &draft).expect("create");
    assert_eq!(store.fetch_transactions(1).expect("fetch").len(), 1);
    assert_eq!(store.fetch_transactions(2).expect("fetch").len(), 2);
    assert!(store.user_path(1).exists());
    assert!(store.user_path(2).exists());
}

#[test]
fn writes_leave_no_temporary_files() {
    let root = temp_dir();
    let store = JsonStore::new(Some(root.clone())).expect("open store");
    store
        .save_categories(7, &CategoryRecord::default())
        .expect("save");
    let leftovers: Vec<_> = fs::read_dir(root.join("users"))
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().map_or(false, |ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn corrupt_document_is_a_storage_error() {
    let store = JsonStore::new(Some(temp_dir())).expect("open store");
    fs::write(store.user_path(5), "{ not json").expect("write garbage");
    let err = store.fetch_transactions(5).expect_err("corrupt file");
    assert!(err.to_string().contains("unreadable"));
}

#[test]
fn numeric_date_only_loses_its_own_record() {
    let store = JsonStore::new(Some(temp_dir())).expect("open store");
    let document = json!({
        "transactions": [
            {"id": 1, "amount": 2500, "transaction_type": "income", "date": "2024-03-01"},
            {
                "id": 2,
                "amount": 40,
                "transaction_type": "expense",
                "category": "Food",
                "date": 20240302
            },
            {"id": 3, "amount": 5, "transaction_type": 9, "date": "2024-03-04"}
        ]
    });
    fs::write(store.user_path(8), document.to_string()).expect("write document");

    let session = BudgetSession::open(
        Box::new(store),
        Box::new(FixedClock(date(2024, 3, 20))),
        Config::default(),
        8,
    );
    assert!(!session.is_degraded());
    assert_eq!(session.dropped_records(), [3]);
    assert_eq!(session.snapshot().transactions().len(), 2);
    let report = session.current_month_report();
    assert_eq!(report.aggregate.income_total, 2500.0);
    assert_eq!(report.aggregate.expense_by_category.get("Food"), Some(0.0));
}
