//! `depot-inventory` — inventory items and the immutable stock ledger.
//!
//! The quantity on hand of an [`InventoryItem`] is only ever changed through
//! the reconciliation engine's quantity store; every change is mirrored by an
//! append-only [`StockLedgerEntry`]. The standing invariant is that an item's
//! stock equals the signed sum of its ledger entries.

pub mod item;
pub mod ledger;

pub use item::{InventoryItem, InventoryItemId};
pub use ledger::{LedgerEntryId, MovementDirection, StockLedgerEntry, net_movement};
