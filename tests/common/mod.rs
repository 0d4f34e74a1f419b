#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use budget_engine::{
    config::Config,
    core::{BudgetSession, FixedClock},
    domain::{Transaction, TransactionKind},
    storage::BudgetStore,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn clock() -> Box<FixedClock> {
    Box::new(FixedClock(date(2024, 3, 20)))
}

pub fn open_session(store: Box<dyn BudgetStore>) -> BudgetSession {
    BudgetSession::open(store, clock(), Config::default(), 1)
}

pub fn income(id: i64, amount: f64, on: NaiveDate) -> Transaction {
    Transaction::new(id, TransactionKind::Income, amount, None, on)
}

pub fn expense(id: i64, amount: f64, category: &str, on: NaiveDate) -> Transaction {
    Transaction::new(id, TransactionKind::Expense, amount, Some(category), on)
}
