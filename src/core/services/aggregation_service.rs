//! Folds transactions into monthly buckets and top-N projections.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::category::{CategoryTaxonomy, OTHER_CATEGORY};
use crate::domain::summary::{CategoryAmounts, MonthlyAggregate, TopProjections};
use crate::domain::transaction::{Transaction, TransactionKind};

/// Label of the catch-all entry in category filters.
pub const ALL_CATEGORIES: &str = "All";

/// Income, expense and savings sums over an arbitrary transaction list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct KindTotals {
    pub income: f64,
    pub expense: f64,
    pub savings: f64,
}

impl KindTotals {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

pub struct AggregationService;

impl AggregationService {
    /// Transactions dated in the given calendar month, in input order.
    pub fn month_transactions(
        transactions: &[Transaction],
        year: i32,
        month: u32,
    ) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|txn| txn.falls_in(year, month))
            .cloned()
            .collect()
    }

    pub fn aggregate_month(
        transactions: &[Transaction],
        year: i32,
        month: u32,
        taxonomy: &CategoryTaxonomy,
    ) -> MonthlyAggregate {
        let mut income_total = 0.0;
        let mut expense_by_category = CategoryAmounts::zeroed(taxonomy.all());
        let mut savings_by_category = CategoryAmounts::zeroed(taxonomy.all());
        let mut matched = 0usize;

        for txn in transactions.iter().filter(|txn| txn.falls_in(year, month)) {
            matched += 1;
            match txn.kind {
                TransactionKind::Income => income_total += txn.amount,
                TransactionKind::Expense => {
                    expense_by_category.add(Self::bucket(txn, taxonomy), txn.amount)
                }
                TransactionKind::Savings => {
                    savings_by_category.add(Self::bucket(txn, taxonomy), txn.amount)
                }
            }
        }

        tracing::debug!(year, month, matched, income_total, "month aggregated");
        MonthlyAggregate {
            year,
            month,
            income_total,
            expense_by_category,
            savings_by_category,
        }
    }

    /// Category bucket for a transaction: its own category when the taxonomy
    /// knows it, `Other` otherwise.
    pub fn bucket<'a>(txn: &'a Transaction, taxonomy: &CategoryTaxonomy) -> &'a str {
        match txn.category_name() {
            Some(name) if taxonomy.contains(name) => name,
            _ => OTHER_CATEGORY,
        }
    }

    pub fn top_expenses(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
        Self::top_by(
            transactions.iter().filter(|txn| txn.kind == TransactionKind::Expense),
            n,
            |txn| txn.amount,
        )
    }

    pub fn top_income(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
        Self::top_by(
            transactions.iter().filter(|txn| txn.kind == TransactionKind::Income),
            n,
            |txn| txn.amount,
        )
    }

    /// Largest movements of any kind by absolute amount.
    pub fn top_transactions(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
        Self::top_by(transactions.iter(), n, |txn| txn.amount.abs())
    }

    pub fn top_projections(transactions: &[Transaction], n: usize) -> TopProjections {
        TopProjections {
            expenses: Self::top_expenses(transactions, n),
            income: Self::top_income(transactions, n),
            transactions: Self::top_transactions(transactions, n),
        }
    }

    /// Keeps transactions filed under `category`; `None` or `All` keeps everything.
    pub fn filter_by_category(
        transactions: &[Transaction],
        category: Option<&str>,
    ) -> Vec<Transaction> {
        match category {
            None | Some(ALL_CATEGORIES) => transactions.to_vec(),
            Some(wanted) => transactions
                .iter()
                .filter(|txn| txn.category_name() == Some(wanted))
                .cloned()
                .collect(),
        }
    }

    pub fn totals(transactions: &[Transaction]) -> KindTotals {
        transactions
            .iter()
            .fold(KindTotals::default(), |mut totals, txn| {
                match txn.kind {
                    TransactionKind::Income => totals.income += txn.amount,
                    TransactionKind::Expense => totals.expense += txn.amount,
                    TransactionKind::Savings => totals.savings += txn.amount,
                }
                totals
            })
    }

    /// Filter choices: `All`, then every distinct category in name order.
    pub fn category_options(transactions: &[Transaction]) -> Vec<String> {
        let distinct: BTreeSet<&str> = transactions
            .iter()
            .filter_map(Transaction::category_name)
            .filter(|name| *name != ALL_CATEGORIES)
            .collect();
        std::iter::once(ALL_CATEGORIES)
            .chain(distinct)
            .map(str::to_string)
            .collect()
    }

    fn top_by<'a, I, F>(transactions: I, n: usize, key: F) -> Vec<Transaction>
    where
        I: Iterator<Item = &'a Transaction>,
        F: Fn(&Transaction) -> f64,
    {
        let mut ranked: Vec<&Transaction> = transactions.collect();
        // sort_by is stable, so equal amounts keep input order
        ranked.sort_by(|a, b| key(b).total_cmp(&key(a)));
        ranked.into_iter().take(n).cloned().collect()
    }
}
