#![doc(test(attr(deny(warnings))))]

//! Tabungan Core offers the budgeting, savings, and transaction ledger
//! primitives that power higher level budgeting workflows and UIs.

pub mod core;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Tabungan Core tracing initialized.");
    });
}
