pub mod advisor_service;
pub mod aggregation_service;
pub mod category_service;
pub mod presentation_service;
pub mod rollup_service;
pub mod target_service;
pub mod transaction_service;

pub use advisor_service::{AdvisorContext, AdvisorService, AdvisorSummary};
pub use aggregation_service::{AggregationService, KindTotals};
pub use category_service::CategoryService;
pub use presentation_service::PresentationService;
pub use rollup_service::RollupService;
pub use target_service::TargetService;
pub use transaction_service::TransactionService;

pub type ServiceResult<T> = crate::errors::Result<T>;
