//! Derived, read-only views handed to the presentation layer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::category::CategoryGroup;
use crate::domain::transaction::Transaction;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A single `(category, amount)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
}

/// Category → amount mapping that remembers insertion order.
///
/// Display ordering falls back to insertion order for categories outside the
/// taxonomy, so a plain hash map is not enough here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CategoryAmount>", into = "Vec<CategoryAmount>")]
pub struct CategoryAmounts {
    entries: Vec<CategoryAmount>,
    index: HashMap<String, usize>,
}

impl CategoryAmounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds every category with zero, keeping the given order.
    pub fn zeroed<I>(categories: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut amounts = Self::new();
        for category in categories {
            amounts.ensure(category.as_ref());
        }
        amounts
    }

    /// Sets the amount for `category`, appending it if new.
    pub fn set(&mut self, category: &str, amount: f64) {
        let slot = self.ensure(category);
        self.entries[slot].amount = amount;
    }

    /// Adds to the amount for `category`, appending it if new.
    pub fn add(&mut self, category: &str, amount: f64) {
        let slot = self.ensure(category);
        self.entries[slot].amount += amount;
    }

    pub fn with(mut self, category: &str, amount: f64) -> Self {
        self.set(category, amount);
        self
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.index
            .get(category)
            .map(|slot| self.entries[*slot].amount)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.index.contains_key(category)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|entry| entry.amount).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|entry| (entry.category.as_str(), entry.amount))
    }

    fn ensure(&mut self, category: &str) -> usize {
        if let Some(slot) = self.index.get(category) {
            return *slot;
        }
        let slot = self.entries.len();
        self.entries.push(CategoryAmount {
            category: category.to_string(),
            amount: 0.0,
        });
        self.index.insert(category.to_string(), slot);
        slot
    }
}

impl From<Vec<CategoryAmount>> for CategoryAmounts {
    fn from(entries: Vec<CategoryAmount>) -> Self {
        let mut amounts = CategoryAmounts::new();
        for entry in entries {
            amounts.add(&entry.category, entry.amount);
        }
        amounts
    }
}

impl From<CategoryAmounts> for Vec<CategoryAmount> {
    fn from(amounts: CategoryAmounts) -> Self {
        amounts.entries
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for CategoryAmounts {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        let mut amounts = CategoryAmounts::new();
        for (category, amount) in iter {
            amounts.set(category.as_ref(), amount);
        }
        amounts
    }
}

/// Transactions of one calendar month folded by kind and category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyAggregate {
    pub year: i32,
    pub month: u32,
    pub income_total: f64,
    pub expense_by_category: CategoryAmounts,
    pub savings_by_category: CategoryAmounts,
}

impl MonthlyAggregate {
    pub fn expense_total(&self) -> f64 {
        self.expense_by_category.total()
    }

    /// Actual residual `max(0, income − expenses)`.
    pub fn saved(&self) -> f64 {
        (self.income_total - self.expense_total()).max(0.0)
    }
}

/// Colour bucket a presentation row is drawn with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ColorGroup {
    Needs,
    Wants,
    Savings,
    Default,
}

impl From<CategoryGroup> for ColorGroup {
    fn from(group: CategoryGroup) -> Self {
        match group {
            CategoryGroup::Needs => ColorGroup::Needs,
            CategoryGroup::Wants => ColorGroup::Wants,
            CategoryGroup::Savings => ColorGroup::Savings,
        }
    }
}

/// How a zero or negative percentage base is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DivisionMode {
    /// Non-positive totals yield `0%` for every row.
    #[default]
    Strict,
    /// Non-positive totals are replaced by a divisor of `1`.
    Safe,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PresentationRow {
    pub label: String,
    pub amount: f64,
    /// Share of the percentage base, rounded to one decimal.
    pub percentage: f64,
    pub color_group: ColorGroup,
    /// `0..=100`, relative to the largest amount in the row set.
    pub bar_width: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearRollupRow {
    /// Zero-based month index.
    pub month_index: u32,
    pub label: String,
    pub income_total: f64,
    pub expense_total: f64,
    /// `income_total − expense_total`; may be negative.
    pub net_saved: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TopProjections {
    pub expenses: Vec<Transaction>,
    pub income: Vec<Transaction>,
    pub transactions: Vec<Transaction>,
}

/// Everything the month dashboard renders, derived from one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyReport {
    pub aggregate: MonthlyAggregate,
    pub expenditure_rows: Vec<PresentationRow>,
    pub target_rows: Vec<PresentationRow>,
    pub simple_actual_rows: Vec<PresentationRow>,
    pub simple_target_rows: Vec<PresentationRow>,
    pub top: TopProjections,
    pub allocated_percentage: f64,
    pub allocation_exceeds_income: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearReport {
    pub year: i32,
    pub rows: Vec<YearRollupRow>,
    pub available_years: Vec<i32>,
}
