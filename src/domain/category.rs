//! Domain types representing the Needs/Wants/Savings category taxonomy.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Fallback bucket for unrecognised categories. Always the last Want.
pub const OTHER_CATEGORY: &str = "Other";

/// Label of the synthetic residual row appended to every presentation.
pub const SAVED_LABEL: &str = "Saved";

pub const DEFAULT_NEEDS: [&str; 4] = ["Housing", "Food", "Utilities", "Healthcare"];
pub const DEFAULT_WANTS: [&str; 3] = ["Transport", "Entertainment", OTHER_CATEGORY];
pub const DEFAULT_SAVINGS: [&str; 0] = [];

/// The three disjoint groups every expense category belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CategoryGroup {
    Needs,
    Wants,
    Savings,
}

impl CategoryGroup {
    pub const ALL: [CategoryGroup; 3] = [
        CategoryGroup::Needs,
        CategoryGroup::Wants,
        CategoryGroup::Savings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CategoryGroup::Needs => "Needs",
            CategoryGroup::Wants => "Wants",
            CategoryGroup::Savings => "Savings",
        }
    }
}

impl fmt::Display for CategoryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Partition of expense categories into Needs, Wants and Savings.
///
/// Instances are always normalised: names are trimmed and non-blank, no name
/// appears in more than one group, and `Other` is the final Want. The only way
/// to obtain a taxonomy is through [`CategoryTaxonomy::new`] (or the edit
/// helpers built on it), so every consumer can rely on those invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TaxonomyLists", into = "TaxonomyLists")]
pub struct CategoryTaxonomy {
    needs: Vec<String>,
    wants: Vec<String>,
    savings: Vec<String>,
    all: Vec<String>,
    membership: HashMap<String, CategoryGroup>,
}

impl CategoryTaxonomy {
    /// Builds a normalised taxonomy from raw group lists.
    ///
    /// Blank entries are dropped and duplicates removed by first occurrence. A
    /// name listed in several groups keeps the first one in Needs, Wants,
    /// Savings order, except `Other`, which always lands last in Wants.
    pub fn new<N, W, S>(needs: N, wants: W, savings: S) -> Self
    where
        N: IntoIterator,
        N::Item: AsRef<str>,
        W: IntoIterator,
        W::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        let mut membership = HashMap::new();
        let needs = claim(&mut membership, CategoryGroup::Needs, needs);
        let mut wants = claim(&mut membership, CategoryGroup::Wants, wants);
        wants.push(OTHER_CATEGORY.to_string());
        membership.insert(OTHER_CATEGORY.to_string(), CategoryGroup::Wants);
        let savings = claim(&mut membership, CategoryGroup::Savings, savings);

        let all = needs
            .iter()
            .chain(wants.iter())
            .chain(savings.iter())
            .cloned()
            .collect();

        Self {
            needs,
            wants,
            savings,
            all,
            membership,
        }
    }

    pub fn needs(&self) -> &[String] {
        &self.needs
    }

    pub fn wants(&self) -> &[String] {
        &self.wants
    }

    pub fn savings(&self) -> &[String] {
        &self.savings
    }

    /// Order-preserving union `needs ⧺ wants ⧺ savings`.
    pub fn all(&self) -> &[String] {
        &self.all
    }

    pub fn categories_in(&self, group: CategoryGroup) -> &[String] {
        match group {
            CategoryGroup::Needs => &self.needs,
            CategoryGroup::Wants => &self.wants,
            CategoryGroup::Savings => &self.savings,
        }
    }

    pub fn group_of(&self, name: &str) -> Option<CategoryGroup> {
        self.membership.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.membership.contains_key(name)
    }

    pub fn is_in(&self, group: CategoryGroup, name: &str) -> bool {
        self.group_of(name) == Some(group)
    }

    /// Names users cannot claim: `Other` and the synthetic `Saved` row.
    pub fn is_reserved(name: &str) -> bool {
        name == OTHER_CATEGORY || name == SAVED_LABEL
    }

    /// Moves (or adds) a category into `group`; the latest assignment wins and
    /// any earlier membership is dropped. `Other` stays in Wants.
    pub fn assign(&self, name: &str, group: CategoryGroup) -> Self {
        let name = name.trim();
        if name.is_empty() || Self::is_reserved(name) {
            return self.clone();
        }
        let mut lists = self.lists_without(name);
        match group {
            CategoryGroup::Needs => lists.needs.push(name.to_string()),
            CategoryGroup::Wants => lists.wants.push(name.to_string()),
            CategoryGroup::Savings => lists.savings.push(name.to_string()),
        }
        lists.into()
    }

    /// Drops a category from whichever group holds it. `Other` cannot be removed.
    pub fn remove(&self, name: &str) -> Self {
        let name = name.trim();
        if name == OTHER_CATEGORY || !self.contains(name) {
            return self.clone();
        }
        self.lists_without(name).into()
    }

    /// Renames a category in place, keeping its group and position.
    pub fn rename(&self, from: &str, to: &str) -> Self {
        let (from, to) = (from.trim(), to.trim());
        if from == OTHER_CATEGORY
            || to.is_empty()
            || Self::is_reserved(to)
            || !self.contains(from)
        {
            return self.clone();
        }
        let swap = |list: &[String]| -> Vec<String> {
            list.iter()
                .map(|name| if name == from { to.to_string() } else { name.clone() })
                .collect()
        };
        Self::new(swap(&self.needs), swap(&self.wants), swap(&self.savings))
    }

    fn lists_without(&self, name: &str) -> TaxonomyLists {
        let keep = |list: &[String]| -> Vec<String> {
            list.iter().filter(|entry| *entry != name).cloned().collect()
        };
        TaxonomyLists {
            needs: keep(&self.needs),
            wants: keep(&self.wants),
            savings: keep(&self.savings),
            all: Vec::new(),
        }
    }
}

impl Default for CategoryTaxonomy {
    fn default() -> Self {
        Self::new(DEFAULT_NEEDS, DEFAULT_WANTS, DEFAULT_SAVINGS)
    }
}

/// Serialised shape of a taxonomy; `all` is derived and ignored on input.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaxonomyLists {
    #[serde(default)]
    needs: Vec<String>,
    #[serde(default)]
    wants: Vec<String>,
    #[serde(default)]
    savings: Vec<String>,
    #[serde(default, skip_deserializing)]
    all: Vec<String>,
}

impl From<TaxonomyLists> for CategoryTaxonomy {
    fn from(lists: TaxonomyLists) -> Self {
        CategoryTaxonomy::new(lists.needs, lists.wants, lists.savings)
    }
}

impl From<CategoryTaxonomy> for TaxonomyLists {
    fn from(taxonomy: CategoryTaxonomy) -> Self {
        TaxonomyLists {
            needs: taxonomy.needs,
            wants: taxonomy.wants,
            savings: taxonomy.savings,
            all: taxonomy.all,
        }
    }
}

/// Trims, drops blanks and reserved names, and keeps names not yet claimed by
/// an earlier group.
fn claim<I>(
    membership: &mut HashMap<String, CategoryGroup>,
    group: CategoryGroup,
    names: I,
) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut claimed = Vec::new();
    for raw in names {
        let name = raw.as_ref().trim();
        if name.is_empty()
            || CategoryTaxonomy::is_reserved(name)
            || membership.contains_key(name)
        {
            continue;
        }
        membership.insert(name.to_string(), group);
        claimed.push(name.to_string());
    }
    claimed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[String]) -> Vec<&str> {
        list.iter().map(String::as_str).collect()
    }

    #[test]
    fn default_taxonomy_matches_household_defaults() {
        let taxonomy = CategoryTaxonomy::default();
        assert_eq!(
            names(taxonomy.needs()),
            ["Housing", "Food", "Utilities", "Healthcare"]
        );
        assert_eq!(names(taxonomy.wants()), ["Transport", "Entertainment", "Other"]);
        assert!(taxonomy.savings().is_empty());
        assert_eq!(taxonomy.all().len(), 7);
    }

    #[test]
    fn empty_lists_leave_only_other() {
        let empty: [&str; 0] = [];
        let taxonomy = CategoryTaxonomy::new(empty, empty, empty);
        assert_eq!(names(taxonomy.all()), ["Other"]);
        assert_eq!(taxonomy.group_of("Other"), Some(CategoryGroup::Wants));
    }

    #[test]
    fn blank_and_duplicate_names_are_dropped() {
        let taxonomy = CategoryTaxonomy::new(
            ["  Rent ", "", "Rent", "   "],
            ["Other", "Games", "Games"],
            ["Pension"],
        );
        assert_eq!(names(taxonomy.needs()), ["Rent"]);
        assert_eq!(names(taxonomy.wants()), ["Games", "Other"]);
        assert_eq!(names(taxonomy.savings()), ["Pension"]);
    }

    #[test]
    fn cross_group_duplicates_keep_first_group() {
        let taxonomy = CategoryTaxonomy::new(["Food"], ["Food", "Travel"], ["Travel", "Other"]);
        assert_eq!(taxonomy.group_of("Food"), Some(CategoryGroup::Needs));
        assert_eq!(taxonomy.group_of("Travel"), Some(CategoryGroup::Wants));
        assert_eq!(names(taxonomy.wants()), ["Travel", "Other"]);
        assert!(taxonomy.savings().is_empty());
    }

    #[test]
    fn assign_moves_category_and_drops_old_membership() {
        let taxonomy = CategoryTaxonomy::default().assign("Transport", CategoryGroup::Needs);
        assert_eq!(taxonomy.group_of("Transport"), Some(CategoryGroup::Needs));
        assert!(!taxonomy.wants().iter().any(|name| name == "Transport"));
        assert_eq!(taxonomy.wants().last().map(String::as_str), Some("Other"));
    }

    #[test]
    fn new_wants_are_inserted_ahead_of_other() {
        let taxonomy = CategoryTaxonomy::default().assign("Travel", CategoryGroup::Wants);
        assert_eq!(
            names(taxonomy.wants()),
            ["Transport", "Entertainment", "Travel", "Other"]
        );
    }

    #[test]
    fn other_cannot_be_moved_removed_or_renamed() {
        let base = CategoryTaxonomy::default();
        assert_eq!(base.assign("Other", CategoryGroup::Savings), base);
        assert_eq!(base.remove("Other"), base);
        assert_eq!(base.rename("Other", "Misc"), base);
    }

    #[test]
    fn saved_label_is_never_a_user_category() {
        let taxonomy = CategoryTaxonomy::new(["Rent"], ["Saved"], [" Saved ", "Pension"]);
        assert!(!taxonomy.contains("Saved"));
        assert_eq!(names(taxonomy.all()), ["Rent", "Other", "Pension"]);
        assert_eq!(taxonomy.assign("Saved", CategoryGroup::Needs), taxonomy);
        assert_eq!(taxonomy.rename("Pension", "Saved"), taxonomy);
    }

    #[test]
    fn rename_keeps_position() {
        let taxonomy = CategoryTaxonomy::default().rename("Food", "Groceries");
        assert_eq!(
            names(taxonomy.needs()),
            ["Housing", "Groceries", "Utilities", "Healthcare"]
        );
    }

    #[test]
    fn serde_roundtrip_renormalises_input() {
        let raw = r#"{"needs":["Rent","Other"],"wants":["Other","Fun"],"savings":[" "]}"#;
        let taxonomy: CategoryTaxonomy = serde_json::from_str(raw).expect("parse taxonomy");
        assert_eq!(names(taxonomy.needs()), ["Rent"]);
        assert_eq!(names(taxonomy.wants()), ["Fun", "Other"]);
        let json = serde_json::to_value(&taxonomy).expect("serialise taxonomy");
        assert_eq!(json["all"], serde_json::json!(["Rent", "Fun", "Other"]));
    }
}
