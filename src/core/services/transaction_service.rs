//! Boundary validation for transactions coming from, and going to, the store.

use crate::core::time::Clock;
use crate::domain::category::{CategoryTaxonomy, OTHER_CATEGORY};
use crate::domain::common::{coerce_amount, finite_or_zero, RecordId};
use crate::domain::transaction::{
    parse_calendar_date, NewTransaction, Transaction, TransactionKind,
};
use crate::storage::TransactionRecord;
use serde_json::Value;

pub struct TransactionService;

impl TransactionService {
    /// Validates raw store records into domain transactions, keeping store order.
    ///
    /// Records whose kind is unknown or not text are dropped and their ids
    /// returned so the caller can report them. Malformed amounts become `0` and
    /// dates that are not parseable text become `None`.
    pub fn normalize_records(records: Vec<TransactionRecord>) -> (Vec<Transaction>, Vec<RecordId>) {
        let mut transactions = Vec::with_capacity(records.len());
        let mut dropped = Vec::new();
        for record in records {
            let parsed = match record.transaction_type.as_str() {
                Some(raw) => raw.parse::<TransactionKind>(),
                None => Err(format!("transaction kind {} is not text", record.transaction_type)),
            };
            let kind = match parsed {
                Ok(kind) => kind,
                Err(reason) => {
                    tracing::warn!(id = record.id, %reason, "dropping transaction record");
                    dropped.push(record.id);
                    continue;
                }
            };
            let date = record.date.as_str().and_then(parse_calendar_date);
            if date.is_none() {
                tracing::debug!(
                    id = record.id,
                    raw = %record.date,
                    "transaction has no usable date"
                );
            }
            let category = record
                .category
                .as_str()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string);
            transactions.push(Transaction {
                id: record.id,
                user_id: record.user_id,
                description: text_or_empty(&record.description),
                amount: coerce_amount(&record.amount),
                kind,
                category,
                date,
            });
        }
        (transactions, dropped)
    }

    /// Cleans a draft before it is sent to the store.
    ///
    /// A missing date becomes today and an expense filed under a category the
    /// taxonomy does not know is moved to `Other`.
    pub fn prepare(
        mut draft: NewTransaction,
        taxonomy: &CategoryTaxonomy,
        clock: &dyn Clock,
    ) -> NewTransaction {
        draft.description = draft.description.trim().to_string();
        draft.amount = finite_or_zero(draft.amount);
        draft.category = draft
            .category
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        if draft.date.is_none() {
            draft.date = Some(clock.today());
        }
        if draft.kind == TransactionKind::Expense {
            let known = draft
                .category
                .as_deref()
                .map_or(false, |name| taxonomy.contains(name));
            if !known {
                tracing::warn!(
                    category = ?draft.category,
                    "unknown expense category, filing under Other"
                );
                draft.category = Some(OTHER_CATEGORY.to_string());
            }
        }
        draft
    }
}

fn text_or_empty(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}
