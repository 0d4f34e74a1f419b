//! Immutable view of one user's budget: taxonomy, targets and transactions.

use serde::{Deserialize, Serialize};

use crate::core::services::{
    AdvisorContext, AdvisorService, AggregationService, PresentationService, RollupService,
    TargetService,
};
use crate::core::time::Clock;
use crate::domain::category::CategoryTaxonomy;
use crate::domain::summary::{MonthlyAggregate, MonthlyReport, YearReport};
use crate::domain::target::TargetAllocation;
use crate::domain::transaction::Transaction;

/// Every report is a pure function of a snapshot. Edits never mutate in place;
/// the `with_*` methods return a new snapshot with targets kept in step with
/// the taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SnapshotParts")]
pub struct BudgetSnapshot {
    taxonomy: CategoryTaxonomy,
    targets: TargetAllocation,
    transactions: Vec<Transaction>,
}

#[derive(Deserialize)]
struct SnapshotParts {
    #[serde(default)]
    taxonomy: CategoryTaxonomy,
    #[serde(default)]
    targets: TargetAllocation,
    #[serde(default)]
    transactions: Vec<Transaction>,
}

impl From<SnapshotParts> for BudgetSnapshot {
    fn from(parts: SnapshotParts) -> Self {
        BudgetSnapshot::new(parts.taxonomy, parts.targets, parts.transactions)
    }
}

impl Default for BudgetSnapshot {
    fn default() -> Self {
        Self::new(
            CategoryTaxonomy::default(),
            TargetAllocation::default(),
            Vec::new(),
        )
    }
}

impl BudgetSnapshot {
    pub fn new(
        taxonomy: CategoryTaxonomy,
        targets: TargetAllocation,
        transactions: Vec<Transaction>,
    ) -> Self {
        let targets = TargetService::reconcile(&targets, &taxonomy);
        Self {
            taxonomy,
            targets,
            transactions,
        }
    }

    pub fn taxonomy(&self) -> &CategoryTaxonomy {
        &self.taxonomy
    }

    pub fn targets(&self) -> &TargetAllocation {
        &self.targets
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn with_taxonomy(&self, taxonomy: CategoryTaxonomy) -> Self {
        Self {
            targets: TargetService::reconcile(&self.targets, &taxonomy),
            taxonomy,
            transactions: self.transactions.clone(),
        }
    }

    /// Replaces the whole allocation, dropping categories the taxonomy lacks.
    pub fn with_allocation(&self, allocation: TargetAllocation) -> Self {
        Self {
            targets: TargetService::reconcile(&allocation, &self.taxonomy),
            ..self.clone()
        }
    }

    pub fn with_targets<I, S>(&self, updates: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            targets: TargetService::set_targets(&self.targets, &self.taxonomy, updates),
            ..self.clone()
        }
    }

    pub fn with_projected_income(&self, amount: f64) -> Self {
        Self {
            targets: TargetService::set_projected_income(&self.targets, amount),
            ..self.clone()
        }
    }

    pub fn with_transactions(&self, transactions: Vec<Transaction>) -> Self {
        Self {
            taxonomy: self.taxonomy.clone(),
            targets: self.targets.clone(),
            transactions,
        }
    }

    pub fn aggregate_month(&self, year: i32, month: u32) -> MonthlyAggregate {
        AggregationService::aggregate_month(&self.transactions, year, month, &self.taxonomy)
    }

    pub fn month_report(&self, year: i32, month: u32, top_n: usize) -> MonthlyReport {
        let aggregate = self.aggregate_month(year, month);
        let in_month = AggregationService::month_transactions(&self.transactions, year, month);
        MonthlyReport {
            expenditure_rows: PresentationService::expenditure_rows(&aggregate, &self.taxonomy),
            target_rows: PresentationService::target_rows(&self.targets, &self.taxonomy),
            simple_actual_rows: PresentationService::simple_actual_rows(&aggregate, &self.taxonomy),
            simple_target_rows: PresentationService::simple_target_rows(
                &self.targets,
                &self.taxonomy,
            ),
            top: AggregationService::top_projections(&in_month, top_n),
            allocated_percentage: TargetService::allocated_percentage(&self.targets),
            allocation_exceeds_income: self.targets.allocation_exceeds_income(),
            aggregate,
        }
    }

    pub fn year_report(&self, year: i32, clock: &dyn Clock) -> YearReport {
        YearReport {
            year,
            rows: RollupService::rollup_year(&self.transactions, year),
            available_years: RollupService::available_years(&self.transactions, clock),
        }
    }

    pub fn advisor_context(&self, year: i32, month: u32) -> AdvisorContext {
        AdvisorService::context(&self.aggregate_month(year, month), &self.targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryGroup;
    use crate::domain::transaction::TransactionKind;
    use chrono::NaiveDate;

    #[test]
    fn deserialized_snapshot_is_reconciled() {
        let raw = serde_json::json!({
            "taxonomy": {"needs": ["Rent"], "wants": [], "savings": ["Pension"]},
            "targets": {"projected_income": 2000.0, "targets": {"Rent": 800.0, "Yacht": 90.0}},
        });
        let snapshot: BudgetSnapshot = serde_json::from_value(raw).expect("parse snapshot");
        let keys: Vec<&str> = snapshot.targets().targets.keys().map(String::as_str).collect();
        assert_eq!(keys, ["Other", "Pension", "Rent"]);
        assert_eq!(snapshot.targets().target("Rent"), 800.0);
        assert!(snapshot.transactions().is_empty());
    }

    #[test]
    fn taxonomy_change_reconciles_targets_without_touching_original() {
        let base = BudgetSnapshot::default();
        let edited = base
            .taxonomy()
            .remove("Food")
            .assign("Travel", CategoryGroup::Wants);
        let next = base.with_taxonomy(edited);
        assert_eq!(base.targets().target("Food"), 600.0);
        assert!(!next.targets().targets.contains_key("Food"));
        assert_eq!(next.targets().target("Travel"), 0.0);
        let keys: Vec<&String> = next.targets().targets.keys().collect();
        assert_eq!(keys.len(), next.taxonomy().all().len());
    }

    #[test]
    fn month_report_carries_allocation_state() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();
        let snapshot = BudgetSnapshot::default()
            .with_projected_income(3000.0)
            .with_transactions(vec![
                Transaction::new(1, TransactionKind::Income, 3000.0, None, date),
                Transaction::new(2, TransactionKind::Expense, 1200.0, Some("Housing"), date),
            ]);
        let report = snapshot.month_report(2024, 5, 3);
        assert!(report.allocation_exceeds_income);
        assert!((report.allocated_percentage - 133.333).abs() < 0.01);
        assert_eq!(report.aggregate.income_total, 3000.0);
        assert_eq!(report.expenditure_rows.last().map(|row| row.amount), Some(1800.0));
        assert_eq!(report.top.expenses.len(), 1);
    }
}
