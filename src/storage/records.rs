//! Wire records exchanged with the external store.
//!
//! Store payloads are loosely typed; these records keep the loose fields as raw
//! JSON so validation happens exactly once, when they are turned into domain
//! types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::services::{CategoryService, TargetService};
use crate::domain::category::{
    CategoryGroup, CategoryTaxonomy, DEFAULT_NEEDS, DEFAULT_SAVINGS, DEFAULT_WANTS,
};
use crate::domain::common::{coerce_amount, RecordId, UserId};
use crate::domain::target::TargetAllocation;
use crate::domain::transaction::NewTransaction;
use crate::errors::Result;

/// One stored transaction. Everything but the ids is kept as raw JSON, so a
/// single malformed field never fails the whole user document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub id: RecordId,
    #[serde(default)]
    pub user_id: UserId,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub transaction_type: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub category: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub date: Value,
}

impl TransactionRecord {
    pub fn from_new(id: RecordId, user_id: UserId, draft: &NewTransaction) -> Self {
        Self {
            id,
            user_id,
            description: Value::from(draft.description.clone()),
            amount: Value::from(draft.amount),
            transaction_type: Value::from(draft.kind.to_string()),
            category: draft.category.clone().map_or(Value::Null, Value::from),
            date: draft
                .date
                .map_or(Value::Null, |date| Value::from(date.format("%Y-%m-%d").to_string())),
        }
    }
}

/// Category settings for one user: the taxonomy lists plus the target plan.
///
/// `None` lists fall back to the household defaults. `targets: None` means the
/// user never saved a plan and the starter targets apply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryRecord {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub needs_categories: Option<Value>,
    #[serde(default)]
    pub wants_categories: Option<Value>,
    #[serde(default)]
    pub savings_categories: Option<Value>,
    #[serde(default)]
    pub projected_income: Option<Value>,
    #[serde(default)]
    pub targets: Option<BTreeMap<String, Value>>,
}

impl CategoryRecord {
    pub fn from_parts(taxonomy: &CategoryTaxonomy, allocation: &TargetAllocation) -> Self {
        let list = |names: &[String]| Some(Value::from(names.to_vec()));
        Self {
            categories: taxonomy.all().to_vec(),
            needs_categories: list(taxonomy.needs()),
            wants_categories: list(taxonomy.wants()),
            savings_categories: list(taxonomy.savings()),
            projected_income: Some(Value::from(allocation.projected_income)),
            targets: Some(
                allocation
                    .targets
                    .iter()
                    .map(|(category, amount)| (category.clone(), Value::from(*amount)))
                    .collect(),
            ),
        }
    }

    /// Validates the group lists into a taxonomy. The flat `categories` list is
    /// always re-derived and never trusted.
    pub fn taxonomy(&self) -> Result<CategoryTaxonomy> {
        let needs = group_list(CategoryGroup::Needs, &self.needs_categories, &DEFAULT_NEEDS)?;
        let wants = group_list(CategoryGroup::Wants, &self.wants_categories, &DEFAULT_WANTS)?;
        let savings = group_list(
            CategoryGroup::Savings,
            &self.savings_categories,
            &DEFAULT_SAVINGS,
        )?;
        Ok(CategoryService::set_taxonomy(needs, wants, savings))
    }

    pub fn allocation(
        &self,
        taxonomy: &CategoryTaxonomy,
        default_projected_income: f64,
    ) -> TargetAllocation {
        let projected_income = self
            .projected_income
            .as_ref()
            .map_or(default_projected_income, coerce_amount);
        let planned = match &self.targets {
            Some(targets) => TargetAllocation {
                projected_income,
                targets: targets
                    .iter()
                    .map(|(category, amount)| (category.clone(), coerce_amount(amount)))
                    .collect(),
            },
            None => TargetAllocation {
                projected_income,
                ..TargetAllocation::default()
            },
        };
        TargetService::reconcile(&planned, taxonomy)
    }
}

fn group_list(
    group: CategoryGroup,
    raw: &Option<Value>,
    defaults: &[&str],
) -> Result<Vec<String>> {
    match raw {
        Some(value) => CategoryService::string_list(group, value),
        None => Ok(defaults.iter().map(|name| name.to_string()).collect()),
    }
}
