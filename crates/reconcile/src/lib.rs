//! `depot-reconcile` — the stock ledger reconciliation engine.
//!
//! Keeps a single mutable quantity on hand per inventory item consistent
//! with the history of receiving and distribution events, across create,
//! partial-update and delete paths. Every mutation computes a *signed delta*
//! against what was previously applied (never a blind re-apply) and commits
//! the quantity change, the ledger append and any requisition transition as
//! one atomic unit of work.
//!
//! The standing invariant: at every commit boundary, `item.stock` equals the
//! net of all `in` minus all `out` ledger entries for that item.

pub mod distribution;
pub mod error;
pub mod memory;
pub mod receiving;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use distribution::DistributionReconciler;
pub use error::ReconcileError;
pub use memory::InMemoryStockStore;
pub use receiving::ReceptionReconciler;
pub use store::{ReconcileStore, StoreTx};
