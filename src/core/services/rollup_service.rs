use std::collections::BTreeSet;

use chrono::Datelike;

use crate::core::time::Clock;
use crate::domain::summary::{YearRollupRow, MONTH_NAMES};
use crate::domain::transaction::{Transaction, TransactionKind};

pub struct RollupService;

impl RollupService {
    /// Twelve rows, January first. `net_saved` is not floored and can go negative.
    pub fn rollup_year(transactions: &[Transaction], year: i32) -> Vec<YearRollupRow> {
        let mut income = [0.0_f64; 12];
        let mut expense = [0.0_f64; 12];
        for txn in transactions {
            let Some(date) = txn.date.filter(|date| date.year() == year) else {
                continue;
            };
            let slot = date.month0() as usize;
            match txn.kind {
                TransactionKind::Income => income[slot] += txn.amount,
                TransactionKind::Expense => expense[slot] += txn.amount,
                TransactionKind::Savings => {}
            }
        }

        MONTH_NAMES
            .iter()
            .enumerate()
            .map(|(slot, label)| YearRollupRow {
                month_index: slot as u32,
                label: label.to_string(),
                income_total: income[slot],
                expense_total: expense[slot],
                net_saved: income[slot] - expense[slot],
            })
            .collect()
    }

    /// Years with at least one dated transaction plus the current year, newest first.
    pub fn available_years(transactions: &[Transaction], clock: &dyn Clock) -> Vec<i32> {
        let years: BTreeSet<i32> = transactions
            .iter()
            .filter_map(|txn| txn.date.map(|date| date.year()))
            .chain(std::iter::once(clock.current_year()))
            .collect();
        years.into_iter().rev().collect()
    }

    /// Month name for a zero-based index, if it is in range.
    pub fn month_label(month_index: u32) -> Option<&'static str> {
        MONTH_NAMES.get(month_index as usize).copied()
    }
}
