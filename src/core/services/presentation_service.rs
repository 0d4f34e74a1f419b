//! Turns category amounts into ordered, coloured rows for display.

use std::collections::HashSet;

use crate::domain::category::{CategoryGroup, CategoryTaxonomy, OTHER_CATEGORY, SAVED_LABEL};
use crate::domain::common::{finite_or_zero, round_one_decimal};
use crate::domain::summary::{
    CategoryAmounts, ColorGroup, DivisionMode, MonthlyAggregate, PresentationRow,
};
use crate::domain::target::TargetAllocation;

pub struct PresentationService;

impl PresentationService {
    /// Orders `amounts` by taxonomy (Needs, Wants with `Other` last, Savings),
    /// then any categories the taxonomy does not know in their original order,
    /// and finally the `Saved` entry if one is present.
    ///
    /// Categories missing from `amounts` are skipped rather than zero-filled.
    pub fn build_rows(
        amounts: &CategoryAmounts,
        taxonomy: &CategoryTaxonomy,
        total: f64,
        mode: DivisionMode,
    ) -> Vec<PresentationRow> {
        let mut ordered: Vec<&str> = Vec::with_capacity(amounts.len());
        let mut used: HashSet<&str> = HashSet::new();

        for name in taxonomy.needs() {
            push_once(name, amounts, &mut used, &mut ordered);
        }
        let mut wants: Vec<&str> = taxonomy
            .wants()
            .iter()
            .map(String::as_str)
            .filter(|name| *name != OTHER_CATEGORY)
            .collect();
        if taxonomy.wants().iter().any(|name| name == OTHER_CATEGORY)
            || amounts.contains(OTHER_CATEGORY)
        {
            wants.push(OTHER_CATEGORY);
        }
        for name in wants {
            push_once(name, amounts, &mut used, &mut ordered);
        }
        for name in taxonomy.savings() {
            push_once(name, amounts, &mut used, &mut ordered);
        }
        for (name, _) in amounts.iter() {
            push_once(name, amounts, &mut used, &mut ordered);
        }
        if amounts.contains(SAVED_LABEL) {
            ordered.push(SAVED_LABEL);
        }

        let max = ordered
            .iter()
            .filter_map(|name| amounts.get(name))
            .fold(0.0_f64, f64::max);

        ordered
            .into_iter()
            .map(|name| {
                let amount = amounts.get(name).unwrap_or(0.0);
                PresentationRow {
                    label: name.to_string(),
                    amount,
                    percentage: Self::percentage(amount, total, mode),
                    color_group: Self::classify(name, taxonomy),
                    bar_width: Self::bar_width(amount, max),
                }
            })
            .collect()
    }

    /// Colour bucket for a row label. Savings membership is checked first, then
    /// Needs, then Wants; the synthetic `Saved` row counts as Savings.
    pub fn classify(name: &str, taxonomy: &CategoryTaxonomy) -> ColorGroup {
        if name == SAVED_LABEL {
            return ColorGroup::Savings;
        }
        [CategoryGroup::Savings, CategoryGroup::Needs, CategoryGroup::Wants]
            .into_iter()
            .find(|group| taxonomy.is_in(*group, name))
            .map_or(ColorGroup::Default, ColorGroup::from)
    }

    /// Share of `total`, rounded to one decimal. Never NaN or infinite.
    pub fn percentage(amount: f64, total: f64, mode: DivisionMode) -> f64 {
        let divisor = match mode {
            _ if total > 0.0 => total,
            DivisionMode::Strict => return 0.0,
            DivisionMode::Safe => 1.0,
        };
        finite_or_zero(round_one_decimal(amount / divisor * 100.0))
    }

    pub fn bar_width(amount: f64, max: f64) -> u32 {
        if max > 0.0 {
            let scaled = finite_or_zero((amount / max * 100.0).round());
            scaled.clamp(0.0, 100.0) as u32
        } else {
            0
        }
    }

    /// Detailed actual-spend rows for one month, with `Saved = max(0, income − expenses)`.
    pub fn expenditure_rows(
        aggregate: &MonthlyAggregate,
        taxonomy: &CategoryTaxonomy,
    ) -> Vec<PresentationRow> {
        let amounts = aggregate
            .expense_by_category
            .clone()
            .with(SAVED_LABEL, aggregate.saved());
        Self::build_rows(&amounts, taxonomy, aggregate.income_total, DivisionMode::Safe)
    }

    /// Detailed planned-spend rows, as a share of projected income.
    pub fn target_rows(
        allocation: &TargetAllocation,
        taxonomy: &CategoryTaxonomy,
    ) -> Vec<PresentationRow> {
        let amounts = Self::target_amounts(allocation, taxonomy)
            .with(SAVED_LABEL, allocation.saved_amount());
        Self::build_rows(
            &amounts,
            taxonomy,
            allocation.projected_income,
            DivisionMode::Strict,
        )
    }

    /// Collapses amounts into exactly three rows: Needs, Wants and Savings.
    ///
    /// Savings also absorbs the residual `max(0, income − spent)`. A `Saved`
    /// entry in `amounts` is ignored since the residual is recomputed here.
    pub fn build_simple_rows(
        amounts: &CategoryAmounts,
        taxonomy: &CategoryTaxonomy,
        income: f64,
        mode: DivisionMode,
    ) -> Vec<PresentationRow> {
        let group_sum = |group: CategoryGroup| -> f64 {
            taxonomy
                .categories_in(group)
                .iter()
                .filter(|name| name.as_str() != SAVED_LABEL)
                .filter_map(|name| amounts.get(name))
                .sum()
        };
        let needs = group_sum(CategoryGroup::Needs);
        let wants = group_sum(CategoryGroup::Wants);
        let savings = group_sum(CategoryGroup::Savings);
        let residual = (income - (needs + wants + savings)).max(0.0);

        let buckets = [
            (CategoryGroup::Needs, needs),
            (CategoryGroup::Wants, wants),
            (CategoryGroup::Savings, savings + residual),
        ];
        let max = buckets.iter().map(|(_, amount)| *amount).fold(0.0_f64, f64::max);
        buckets
            .into_iter()
            .map(|(group, amount)| PresentationRow {
                label: group.label().to_string(),
                amount,
                percentage: Self::percentage(amount, income, mode),
                color_group: group.into(),
                bar_width: Self::bar_width(amount, max),
            })
            .collect()
    }

    pub fn simple_actual_rows(
        aggregate: &MonthlyAggregate,
        taxonomy: &CategoryTaxonomy,
    ) -> Vec<PresentationRow> {
        Self::build_simple_rows(
            &aggregate.expense_by_category,
            taxonomy,
            aggregate.income_total,
            DivisionMode::Safe,
        )
    }

    pub fn simple_target_rows(
        allocation: &TargetAllocation,
        taxonomy: &CategoryTaxonomy,
    ) -> Vec<PresentationRow> {
        Self::build_simple_rows(
            &Self::target_amounts(allocation, taxonomy),
            taxonomy,
            allocation.projected_income,
            DivisionMode::Strict,
        )
    }

    fn target_amounts(
        allocation: &TargetAllocation,
        taxonomy: &CategoryTaxonomy,
    ) -> CategoryAmounts {
        taxonomy
            .all()
            .iter()
            .map(|name| (name.as_str(), allocation.target(name)))
            .collect()
    }
}

fn push_once<'a>(
    name: &'a str,
    amounts: &CategoryAmounts,
    used: &mut HashSet<&'a str>,
    ordered: &mut Vec<&'a str>,
) {
    if name != SAVED_LABEL && amounts.contains(name) && used.insert(name) {
        ordered.push(name);
    }
}
