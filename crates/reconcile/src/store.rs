use std::sync::Arc;

use depot_core::ActorId;
use depot_distribution::{DistributionEvent, DistributionId};
use depot_inventory::{
    InventoryItem, InventoryItemId, LedgerEntryId, MovementDirection, StockLedgerEntry,
};
use depot_receiving::{ReceivingEvent, ReceptionId};
use depot_requisitions::{Requisition, RequisitionId};

use crate::error::ReconcileError;

/// Transaction-scoped handle over the shared store.
///
/// A `StoreTx` only exists inside [`ReconcileStore::unit_of_work`]; every
/// mutation made through it either commits in full or leaves no trace.
///
/// ## Quantity adjustments
///
/// `adjust_stock` is the *only* way stock moves. It fails with
/// `ItemNotFound` for unknown items and with `InsufficientStock` when the
/// delta would take the quantity on hand below zero. Corrections arising
/// from edits and deletions are held to the same floor as creations.
///
/// ## Ledger appends
///
/// `record_entry` is append-only: entries are never updated or removed.
/// The quantity must be positive; the direction encodes the sign.
pub trait StoreTx {
    fn item(&self, id: InventoryItemId) -> Result<InventoryItem, ReconcileError>;

    /// Apply a signed delta to an item's quantity on hand, returning the new
    /// quantity.
    fn adjust_stock(&mut self, id: InventoryItemId, delta: i64) -> Result<i64, ReconcileError>;

    /// Append an audit entry describing a stock movement.
    fn record_entry(
        &mut self,
        item_id: InventoryItemId,
        direction: MovementDirection,
        quantity: i64,
        reason: String,
        actor_id: ActorId,
    ) -> Result<LedgerEntryId, ReconcileError>;

    fn insert_reception(&mut self, event: ReceivingEvent) -> Result<(), ReconcileError>;
    fn reception(&self, id: ReceptionId) -> Result<ReceivingEvent, ReconcileError>;
    fn replace_reception(&mut self, event: ReceivingEvent) -> Result<(), ReconcileError>;
    fn remove_reception(&mut self, id: ReceptionId) -> Result<ReceivingEvent, ReconcileError>;

    fn insert_distribution(&mut self, event: DistributionEvent) -> Result<(), ReconcileError>;
    fn distribution(&self, id: DistributionId) -> Result<DistributionEvent, ReconcileError>;
    fn replace_distribution(&mut self, event: DistributionEvent) -> Result<(), ReconcileError>;
    fn remove_distribution(&mut self, id: DistributionId)
    -> Result<DistributionEvent, ReconcileError>;

    fn requisition(&self, id: RequisitionId) -> Result<Requisition, ReconcileError>;
    fn put_requisition(&mut self, requisition: Requisition) -> Result<(), ReconcileError>;
}

/// Shared store with an atomic unit-of-work boundary.
///
/// Implementations must guarantee:
/// - **All-or-nothing**: if the closure returns `Err`, no mutation made
///   through the `StoreTx` becomes visible (no partial ledger entries, no
///   partially-updated items, no requisition change).
/// - **Serialized read-modify-write**: two units of work touching the same
///   item must not interleave their read-compute-write cycles (lost updates
///   break the stock/ledger invariant).
///
/// Reads outside a unit of work observe the latest committed state.
pub trait ReconcileStore: Send + Sync {
    fn unit_of_work<T, F>(&self, f: F) -> Result<T, ReconcileError>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T, ReconcileError>;

    fn get_item(&self, id: InventoryItemId) -> Option<InventoryItem>;
    fn get_reception(&self, id: ReceptionId) -> Option<ReceivingEvent>;
    fn get_distribution(&self, id: DistributionId) -> Option<DistributionEvent>;
    fn get_requisition(&self, id: RequisitionId) -> Option<Requisition>;

    /// All ledger entries for one item, in append order.
    fn ledger_entries_for(&self, id: InventoryItemId) -> Vec<StockLedgerEntry>;
}

impl<S> ReconcileStore for Arc<S>
where
    S: ReconcileStore + ?Sized,
{
    fn unit_of_work<T, F>(&self, f: F) -> Result<T, ReconcileError>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T, ReconcileError>,
    {
        (**self).unit_of_work(f)
    }

    fn get_item(&self, id: InventoryItemId) -> Option<InventoryItem> {
        (**self).get_item(id)
    }

    fn get_reception(&self, id: ReceptionId) -> Option<ReceivingEvent> {
        (**self).get_reception(id)
    }

    fn get_distribution(&self, id: DistributionId) -> Option<DistributionEvent> {
        (**self).get_distribution(id)
    }

    fn get_requisition(&self, id: RequisitionId) -> Option<Requisition> {
        (**self).get_requisition(id)
    }

    fn ledger_entries_for(&self, id: InventoryItemId) -> Vec<StockLedgerEntry> {
        (**self).ledger_entries_for(id)
    }
}
