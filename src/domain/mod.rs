pub mod category;
pub mod common;
pub mod summary;
pub mod target;
pub mod transaction;

pub use category::{CategoryGroup, CategoryTaxonomy, OTHER_CATEGORY, SAVED_LABEL};
pub use common::{RecordId, UserId};
pub use summary::{
    CategoryAmount, CategoryAmounts, ColorGroup, DivisionMode, MonthlyAggregate, MonthlyReport,
    PresentationRow, TopProjections, YearReport, YearRollupRow,
};
pub use target::TargetAllocation;
pub use transaction::{NewTransaction, Transaction, TransactionKind};
