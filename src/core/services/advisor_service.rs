//! Locally computed budget snapshot, used when the remote advisor is unreachable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::summary::{CategoryAmount, CategoryAmounts, MonthlyAggregate};
use crate::domain::target::TargetAllocation;

/// Month context handed to an advisor, remote or local.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisorContext {
    pub projected_income: f64,
    pub income_to_date: f64,
    pub expenses_by_category: CategoryAmounts,
    pub targets: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisorSummary {
    pub income_to_date: f64,
    pub total_expenses: f64,
    pub net: f64,
    pub top_categories: Vec<CategoryAmount>,
    /// `None` when there is no projected income or spending already exceeds it.
    pub projected_savings: Option<f64>,
    pub overspending: bool,
}

pub struct AdvisorService;

impl AdvisorService {
    pub fn context(aggregate: &MonthlyAggregate, allocation: &TargetAllocation) -> AdvisorContext {
        AdvisorContext {
            projected_income: allocation.projected_income,
            income_to_date: aggregate.income_total,
            expenses_by_category: aggregate.expense_by_category.clone(),
            targets: allocation.targets.clone(),
        }
    }

    pub fn local_summary(context: &AdvisorContext, top_n: usize) -> AdvisorSummary {
        let total_expenses = context.expenses_by_category.total();
        let overspending =
            context.projected_income > 0.0 && total_expenses > context.projected_income;
        let projected_savings = (context.projected_income > 0.0 && !overspending)
            .then(|| (context.projected_income - total_expenses).max(0.0));

        let mut spent: Vec<CategoryAmount> = context
            .expenses_by_category
            .iter()
            .filter(|(_, amount)| *amount > 0.0)
            .map(|(category, amount)| CategoryAmount {
                category: category.to_string(),
                amount,
            })
            .collect();
        spent.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        spent.truncate(top_n);

        if overspending {
            tracing::warn!(
                total_expenses,
                projected_income = context.projected_income,
                "spending exceeds projected income"
            );
        }

        AdvisorSummary {
            income_to_date: context.income_to_date,
            total_expenses,
            net: context.income_to_date - total_expenses,
            top_categories: spent,
            projected_savings,
            overspending,
        }
    }
}
