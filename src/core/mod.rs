pub mod services;
pub mod session;
pub mod snapshot;
pub mod time;
pub mod utils;

pub use session::BudgetSession;
pub use snapshot::BudgetSnapshot;
pub use time::{Clock, FixedClock, SystemClock};
