use chrono::Datelike;
use serde_json::Value;

use crate::config::Config;
use crate::core::services::{
    AdvisorService, AdvisorSummary, CategoryService, TransactionService,
};
use crate::core::snapshot::BudgetSnapshot;
use crate::core::time::Clock;
use crate::domain::category::CategoryTaxonomy;
use crate::domain::common::{RecordId, UserId};
use crate::domain::summary::{MonthlyReport, YearReport};
use crate::domain::target::TargetAllocation;
use crate::domain::transaction::{NewTransaction, Transaction};
use crate::errors::{BudgetError, Result};
use crate::storage::{BudgetStore, CategoryRecord};

/// Owns one user's snapshot and keeps it in step with the store.
///
/// Every write goes to the store first and is followed by a full re-fetch, so
/// the snapshot always reflects what the store holds. If that re-fetch fails
/// the last good snapshot is kept and the session reports itself degraded.
pub struct BudgetSession {
    store: Box<dyn BudgetStore>,
    clock: Box<dyn Clock>,
    config: Config,
    user_id: UserId,
    snapshot: BudgetSnapshot,
    dropped_records: Vec<RecordId>,
    degraded: bool,
}

impl BudgetSession {
    /// Opens a session and loads the user's data. A store that cannot be read
    /// yields a degraded session over the default snapshot.
    pub fn open(
        store: Box<dyn BudgetStore>,
        clock: Box<dyn Clock>,
        config: Config,
        user_id: UserId,
    ) -> Self {
        let snapshot =
            BudgetSnapshot::default().with_projected_income(config.default_projected_income);
        let mut session = Self {
            store,
            clock,
            config,
            user_id,
            snapshot,
            dropped_records: Vec::new(),
            degraded: false,
        };
        if let Err(err) = session.refresh() {
            tracing::warn!(user_id, %err, "starting with local defaults");
        }
        session
    }

    pub fn snapshot(&self) -> &BudgetSnapshot {
        &self.snapshot
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Ids of stored records skipped at the last fetch because their kind was unknown.
    pub fn dropped_records(&self) -> &[RecordId] {
        &self.dropped_records
    }

    /// Re-reads transactions and category settings from the store.
    pub fn refresh(&mut self) -> Result<()> {
        match self.fetch_snapshot() {
            Ok((snapshot, dropped)) => {
                self.snapshot = snapshot;
                self.dropped_records = dropped;
                self.degraded = false;
                Ok(())
            }
            Err(err) => {
                self.degraded = true;
                Err(err)
            }
        }
    }

    fn fetch_snapshot(&self) -> Result<(BudgetSnapshot, Vec<RecordId>)> {
        let records = self.store.fetch_transactions(self.user_id)?;
        let categories = self.store.fetch_categories(self.user_id)?;
        let taxonomy = categories.taxonomy()?;
        let targets = categories.allocation(&taxonomy, self.config.default_projected_income);
        let (transactions, dropped) = TransactionService::normalize_records(records);
        tracing::debug!(
            user_id = self.user_id,
            transactions = transactions.len(),
            dropped = dropped.len(),
            "snapshot fetched"
        );
        Ok((BudgetSnapshot::new(taxonomy, targets, transactions), dropped))
    }

    fn refresh_after_write(&mut self) {
        if let Err(err) = self.refresh() {
            tracing::warn!(
                user_id = self.user_id,
                %err,
                "re-fetch failed; keeping previous snapshot"
            );
        }
    }

    pub fn add_transaction(&mut self, draft: NewTransaction) -> Result<Transaction> {
        let draft =
            TransactionService::prepare(draft, self.snapshot.taxonomy(), self.clock.as_ref());
        let record = self.store.create_transaction(self.user_id, &draft)?;
        tracing::info!(
            user_id = self.user_id,
            id = record.id,
            kind = %draft.kind,
            "transaction created"
        );
        let (mut created, _) = TransactionService::normalize_records(vec![record]);
        self.refresh_after_write();
        created.pop().ok_or_else(|| {
            BudgetError::StorageError("store returned an unusable record".into())
        })
    }

    pub fn delete_transaction(&mut self, id: RecordId) -> Result<()> {
        self.store.delete_transaction(self.user_id, id)?;
        tracing::info!(user_id = self.user_id, id, "transaction deleted");
        self.refresh_after_write();
        Ok(())
    }

    /// Replaces the taxonomy and saves it together with the reconciled targets.
    pub fn replace_taxonomy(&mut self, taxonomy: CategoryTaxonomy) -> Result<()> {
        let next = self.snapshot.with_taxonomy(taxonomy);
        self.save_categories(&next)?;
        tracing::info!(
            user_id = self.user_id,
            categories = next.taxonomy().all().len(),
            "taxonomy replaced"
        );
        Ok(())
    }

    /// Like [`BudgetSession::replace_taxonomy`] for an edit payload with
    /// `needs_categories`, `wants_categories` and `savings_categories` lists.
    pub fn replace_taxonomy_from_payload(&mut self, payload: &Value) -> Result<()> {
        let taxonomy = CategoryService::from_payload(payload)?;
        self.replace_taxonomy(taxonomy)
    }

    pub fn set_targets<I, S>(&mut self, updates: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let next = self.snapshot.with_targets(updates);
        self.save_categories(&next)
    }

    pub fn set_allocation(&mut self, allocation: TargetAllocation) -> Result<()> {
        let next = self.snapshot.with_allocation(allocation);
        self.save_categories(&next)
    }

    pub fn set_projected_income(&mut self, amount: f64) -> Result<()> {
        let next = self.snapshot.with_projected_income(amount);
        self.save_categories(&next)
    }

    fn save_categories(&mut self, next: &BudgetSnapshot) -> Result<()> {
        let record = CategoryRecord::from_parts(next.taxonomy(), next.targets());
        self.store.save_categories(self.user_id, &record)?;
        self.refresh_after_write();
        Ok(())
    }

    pub fn month_report(&self, year: i32, month: u32) -> MonthlyReport {
        self.snapshot.month_report(year, month, self.config.top_n)
    }

    pub fn current_month_report(&self) -> MonthlyReport {
        let today = self.clock.today();
        self.month_report(today.year(), today.month())
    }

    pub fn year_report(&self, year: i32) -> YearReport {
        self.snapshot.year_report(year, self.clock.as_ref())
    }

    /// Local fallback for the advisor, built from the given month.
    pub fn advisor_summary(&self, year: i32, month: u32) -> AdvisorSummary {
        AdvisorService::local_summary(
            &self.snapshot.advisor_context(year, month),
            self.config.top_n,
        )
    }
}
