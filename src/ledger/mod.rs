//! The ledger aggregate: the persistence-friendly root that owns every
//! collection the services operate on.

#[allow(clippy::module_inception)]
pub mod ledger;

pub use ledger::Ledger;
