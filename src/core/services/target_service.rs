use crate::domain::category::CategoryTaxonomy;
use crate::domain::common::finite_or_zero;
use crate::domain::target::TargetAllocation;

pub struct TargetService;

impl TargetService {
    /// Rebuilds the allocation so its keys are exactly `taxonomy.all()`.
    ///
    /// Retained categories keep their amounts, new ones start at `0`, and
    /// categories missing from the taxonomy are dropped.
    pub fn reconcile(previous: &TargetAllocation, taxonomy: &CategoryTaxonomy) -> TargetAllocation {
        let targets = taxonomy
            .all()
            .iter()
            .map(|category| (category.clone(), previous.target(category)))
            .collect();
        let dropped: Vec<&str> = previous
            .targets
            .keys()
            .filter(|category| !taxonomy.contains(category))
            .map(String::as_str)
            .collect();
        if !dropped.is_empty() {
            tracing::debug!(?dropped, "dropping targets for removed categories");
        }
        let reconciled = TargetAllocation {
            projected_income: previous.projected_income,
            targets,
        };
        Self::warn_if_overallocated(&reconciled);
        reconciled
    }

    /// Applies per-category target edits, then reconciles against the taxonomy.
    /// Negative or non-finite amounts are stored as `0`.
    pub fn set_targets<I, S>(
        previous: &TargetAllocation,
        taxonomy: &CategoryTaxonomy,
        updates: I,
    ) -> TargetAllocation
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut next = previous.clone();
        for (category, amount) in updates {
            next.targets
                .insert(category.into(), finite_or_zero(amount).max(0.0));
        }
        Self::reconcile(&next, taxonomy)
    }

    pub fn set_projected_income(previous: &TargetAllocation, amount: f64) -> TargetAllocation {
        let next = TargetAllocation {
            projected_income: finite_or_zero(amount),
            targets: previous.targets.clone(),
        };
        Self::warn_if_overallocated(&next);
        next
    }


    /// Share of projected income already allocated, `0` when income is not positive.
    pub fn allocated_percentage(allocation: &TargetAllocation) -> f64 {
        if allocation.projected_income > 0.0 {
            allocation.allocated_total() / allocation.projected_income * 100.0
        } else {
            0.0
        }
    }

    fn warn_if_overallocated(allocation: &TargetAllocation) {
        if allocation.allocation_exceeds_income() {
            tracing::warn!(
                allocated = allocation.allocated_total(),
                projected_income = allocation.projected_income,
                "target allocation exceeds projected income"
            );
        }
    }
}
