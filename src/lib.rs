#![doc(test(attr(deny(warnings))))]

//! Budget Engine turns a household's transactions, Needs/Wants/Savings
//! taxonomy and monthly targets into the aggregates, ordered presentation rows
//! and yearly rollups a budgeting dashboard renders.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Engine tracing initialized.");
    });
}
