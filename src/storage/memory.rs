use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::domain::common::{RecordId, UserId};
use crate::domain::transaction::NewTransaction;
use crate::errors::{BudgetError, Result};

use super::{BudgetStore, CategoryRecord, TransactionRecord, UserDocument};

#[derive(Debug, Default)]
struct MemoryState {
    next_id: RecordId,
    users: HashMap<UserId, UserDocument>,
}

/// Process-local store used by tests and offline demos.
///
/// `set_offline(true)` makes every call fail with a storage error, which is how
/// the degraded-mode paths of a session get exercised.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
    offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user document directly, bypassing id assignment.
    pub fn with_user(self, user_id: UserId, document: UserDocument) -> Self {
        if let Ok(mut state) = self.state.lock() {
            let max_id = document
                .transactions
                .iter()
                .map(|record| record.id)
                .max()
                .unwrap_or(0);
            state.next_id = state.next_id.max(max_id);
            state.users.insert(user_id, document);
        }
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BudgetError::StorageError("store is offline".into()));
        }
        self.state
            .lock()
            .map_err(|_| BudgetError::StorageError("store lock poisoned".into()))
    }
}

impl BudgetStore for InMemoryStore {
    fn fetch_transactions(&self, user_id: UserId) -> Result<Vec<TransactionRecord>> {
        let state = self.lock()?;
        Ok(state
            .users
            .get(&user_id)
            .map(|doc| doc.transactions.clone())
            .unwrap_or_default())
    }

    fn create_transaction(
        &self,
        user_id: UserId,
        draft: &NewTransaction,
    ) -> Result<TransactionRecord> {
        let mut state = self.lock()?;
        state.next_id += 1;
        let record = TransactionRecord::from_new(state.next_id, user_id, draft);
        state
            .users
            .entry(user_id)
            .or_default()
            .transactions
            .push(record.clone());
        Ok(record)
    }

    fn delete_transaction(&self, user_id: UserId, id: RecordId) -> Result<()> {
        let mut state = self.lock()?;
        let doc = state
            .users
            .get_mut(&user_id)
            .ok_or(BudgetError::UserNotFound(user_id))?;
        let before = doc.transactions.len();
        doc.transactions.retain(|record| record.id != id);
        if doc.transactions.len() == before {
            return Err(BudgetError::TransactionNotFound(id));
        }
        Ok(())
    }

    fn fetch_categories(&self, user_id: UserId) -> Result<CategoryRecord> {
        let state = self.lock()?;
        Ok(state
            .users
            .get(&user_id)
            .map(|doc| doc.categories.clone())
            .unwrap_or_default())
    }

    fn save_categories(&self, user_id: UserId, record: &CategoryRecord) -> Result<()> {
        let mut state = self.lock()?;
        state.users.entry(user_id).or_default().categories = record.clone();
        Ok(())
    }
}
