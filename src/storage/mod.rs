pub mod json_backend;
pub mod memory;
pub mod records;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::common::{RecordId, UserId};
use crate::domain::transaction::NewTransaction;
use crate::errors::Result;

pub use json_backend::JsonStore;
pub use memory::InMemoryStore;
pub use records::{CategoryRecord, TransactionRecord};

/// The external store a session reads from and writes through.
///
/// Unknown users are provisioned lazily: fetching for a user that has never
/// been seen returns no transactions and a default category record.
pub trait BudgetStore: Send + Sync {
    fn fetch_transactions(&self, user_id: UserId) -> Result<Vec<TransactionRecord>>;
    fn create_transaction(&self, user_id: UserId, draft: &NewTransaction)
        -> Result<TransactionRecord>;
    fn delete_transaction(&self, user_id: UserId, id: RecordId) -> Result<()>;
    fn fetch_categories(&self, user_id: UserId) -> Result<CategoryRecord>;
    fn save_categories(&self, user_id: UserId, record: &CategoryRecord) -> Result<()>;
}

/// Lets a caller keep a handle on a store it hands to a session.
impl<T: BudgetStore + ?Sized> BudgetStore for Arc<T> {
    fn fetch_transactions(&self, user_id: UserId) -> Result<Vec<TransactionRecord>> {
        (**self).fetch_transactions(user_id)
    }

    fn create_transaction(
        &self,
        user_id: UserId,
        draft: &NewTransaction,
    ) -> Result<TransactionRecord> {
        (**self).create_transaction(user_id, draft)
    }

    fn delete_transaction(&self, user_id: UserId, id: RecordId) -> Result<()> {
        (**self).delete_transaction(user_id, id)
    }

    fn fetch_categories(&self, user_id: UserId) -> Result<CategoryRecord> {
        (**self).fetch_categories(user_id)
    }

    fn save_categories(&self, user_id: UserId, record: &CategoryRecord) -> Result<()> {
        (**self).save_categories(user_id, record)
    }
}

/// Everything stored for one user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserDocument {
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default)]
    pub categories: CategoryRecord,
}
