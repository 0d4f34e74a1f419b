//! Planned monthly spend per category plus the projected income it is measured against.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::common::finite_or_zero;

pub const DEFAULT_PROJECTED_INCOME: f64 = 5000.0;

/// Starter targets for the default taxonomy.
pub const DEFAULT_TARGETS: [(&str, f64); 7] = [
    ("Housing", 1500.0),
    ("Food", 600.0),
    ("Utilities", 400.0),
    ("Transport", 750.0),
    ("Entertainment", 250.0),
    ("Healthcare", 250.0),
    ("Other", 250.0),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetAllocation {
    pub projected_income: f64,
    #[serde(default)]
    pub targets: BTreeMap<String, f64>,
}

impl TargetAllocation {
    pub fn new(projected_income: f64) -> Self {
        Self {
            projected_income: finite_or_zero(projected_income),
            targets: BTreeMap::new(),
        }
    }

    pub fn with_target(mut self, category: impl Into<String>, amount: f64) -> Self {
        self.targets.insert(category.into(), finite_or_zero(amount));
        self
    }

    pub fn target(&self, category: &str) -> f64 {
        self.targets.get(category).copied().unwrap_or(0.0)
    }

    pub fn allocated_total(&self) -> f64 {
        self.targets.values().sum()
    }

    /// Residual `max(0, projected_income − allocated_total)`.
    pub fn saved_amount(&self) -> f64 {
        (self.projected_income - self.allocated_total()).max(0.0)
    }

    pub fn allocation_exceeds_income(&self) -> bool {
        self.allocated_total() > self.projected_income
    }
}

impl Default for TargetAllocation {
    fn default() -> Self {
        DEFAULT_TARGETS.iter().fold(
            TargetAllocation::new(DEFAULT_PROJECTED_INCOME),
            |allocation, (category, amount)| allocation.with_target(*category, *amount),
        )
    }
}
