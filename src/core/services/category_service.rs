use serde_json::Value;

use crate::domain::category::{CategoryGroup, CategoryTaxonomy};
use crate::errors::BudgetError;

use super::ServiceResult;

pub struct CategoryService;

impl CategoryService {
    /// Replaces the whole taxonomy in one step, normalising the raw lists.
    pub fn set_taxonomy<N, W, S>(needs: N, wants: W, savings: S) -> CategoryTaxonomy
    where
        N: IntoIterator,
        N::Item: AsRef<str>,
        W: IntoIterator,
        W::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        let taxonomy = CategoryTaxonomy::new(needs, wants, savings);
        tracing::debug!(
            needs = taxonomy.needs().len(),
            wants = taxonomy.wants().len(),
            savings = taxonomy.savings().len(),
            "taxonomy normalised"
        );
        taxonomy
    }

    /// Builds a taxonomy from loosely-typed JSON lists.
    ///
    /// Each argument must be a JSON array; anything else is a validation error.
    /// Non-string entries inside an array are skipped.
    pub fn set_taxonomy_from_json(
        needs: &Value,
        wants: &Value,
        savings: &Value,
    ) -> ServiceResult<CategoryTaxonomy> {
        let needs = Self::string_list(CategoryGroup::Needs, needs)?;
        let wants = Self::string_list(CategoryGroup::Wants, wants)?;
        let savings = Self::string_list(CategoryGroup::Savings, savings)?;
        Ok(Self::set_taxonomy(needs, wants, savings))
    }

    /// Parses an edit payload shaped like
    /// `{"needs_categories": [...], "wants_categories": [...], "savings_categories": [...]}`.
    /// Missing lists are treated as empty.
    pub fn from_payload(payload: &Value) -> ServiceResult<CategoryTaxonomy> {
        let object = payload.as_object().ok_or_else(|| {
            BudgetError::Validation("category payload must be a JSON object".into())
        })?;
        let empty = Value::Array(Vec::new());
        let field = |key: &str| object.get(key).unwrap_or(&empty);
        Self::set_taxonomy_from_json(
            field("needs_categories"),
            field("wants_categories"),
            field("savings_categories"),
        )
    }

    pub(crate) fn string_list(group: CategoryGroup, value: &Value) -> ServiceResult<Vec<String>> {
        let items = value.as_array().ok_or_else(|| {
            BudgetError::Validation(format!("{} categories must be a list", group))
        })?;
        Ok(items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect())
    }
}
