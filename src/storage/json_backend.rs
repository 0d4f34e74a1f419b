use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::Mutex,
};

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    domain::{
        common::{RecordId, UserId},
        transaction::NewTransaction,
    },
    errors::{BudgetError, Result},
};

use super::{BudgetStore, CategoryRecord, TransactionRecord, UserDocument};

const USERS_DIR: &str = "users";
const STATE_FILE: &str = "state.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    #[serde(default)]
    next_id: RecordId,
}

/// File-backed store: one pretty-printed JSON document per user plus a small
/// state file holding the id counter.
#[derive(Debug)]
pub struct JsonStore {
    users_dir: PathBuf,
    state_file: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Opens (creating if needed) a store rooted at `root`, or at
    /// `<app dir>/store` when no root is given.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root =
            root.unwrap_or_else(|| PathResolver::store_dir_in(&PathResolver::base_dir()));
        ensure_dir(&root)?;
        let users_dir = root.join(USERS_DIR);
        ensure_dir(&users_dir)?;
        let state_file = root.join(STATE_FILE);
        Ok(Self {
            users_dir,
            state_file,
            write_lock: Mutex::new(()),
        })
    }

    pub fn user_path(&self, user_id: UserId) -> PathBuf {
        self.users_dir.join(format!("user_{}.json", user_id))
    }

    pub fn load_user(&self, user_id: UserId) -> Result<UserDocument> {
        let path = self.user_path(user_id);
        if !path.exists() {
            return Ok(UserDocument::default());
        }
        let data = fs::read_to_string(&path)?;
        serde_json::from_str(&data).map_err(|err| {
            BudgetError::StorageError(format!(
                "user document `{}` is unreadable: {}",
                path.display(),
                err
            ))
        })
    }

    fn save_user(&self, user_id: UserId, document: &UserDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(document)?;
        write_atomic(&self.user_path(user_id), &json)
    }

    fn read_state(&self) -> Result<StoreState> {
        if self.state_file.exists() {
            let data = fs::read_to_string(&self.state_file)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(StoreState::default())
        }
    }

    fn next_id(&self) -> Result<RecordId> {
        let mut state = self.read_state()?;
        state.next_id += 1;
        let data = serde_json::to_string_pretty(&state)?;
        write_atomic(&self.state_file, &data)?;
        Ok(state.next_id)
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| BudgetError::StorageError("store lock poisoned".into()))
    }
}

impl BudgetStore for JsonStore {
    fn fetch_transactions(&self, user_id: UserId) -> Result<Vec<TransactionRecord>> {
        Ok(self.load_user(user_id)?.transactions)
    }

    fn create_transaction(
        &self,
        user_id: UserId,
        draft: &NewTransaction,
    ) -> Result<TransactionRecord> {
        let _guard = self.guard()?;
        let mut document = self.load_user(user_id)?;
        let record = TransactionRecord::from_new(self.next_id()?, user_id, draft);
        document.transactions.push(record.clone());
        self.save_user(user_id, &document)?;
        tracing::debug!(user_id, id = record.id, "transaction written");
        Ok(record)
    }

    fn delete_transaction(&self, user_id: UserId, id: RecordId) -> Result<()> {
        let _guard = self.guard()?;
        if !self.user_path(user_id).exists() {
            return Err(BudgetError::UserNotFound(user_id));
        }
        let mut document = self.load_user(user_id)?;
        let before = document.transactions.len();
        document.transactions.retain(|record| record.id != id);
        if document.transactions.len() == before {
            return Err(BudgetError::TransactionNotFound(id));
        }
        self.save_user(user_id, &document)
    }

    fn fetch_categories(&self, user_id: UserId) -> Result<CategoryRecord> {
        Ok(self.load_user(user_id)?.categories)
    }

    fn save_categories(&self, user_id: UserId, record: &CategoryRecord) -> Result<()> {
        let _guard = self.guard()?;
        let mut document = self.load_user(user_id)?;
        document.categories = record.clone();
        self.save_user(user_id, &document)
    }
}
