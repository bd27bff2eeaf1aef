use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use depot_core::{ActorId, DomainError};
use depot_distribution::{DistributionEvent, DistributionId};
use depot_inventory::{
    InventoryItem, InventoryItemId, LedgerEntryId, MovementDirection, StockLedgerEntry,
};
use depot_receiving::{ReceivingEvent, ReceptionId};
use depot_requisitions::{Requisition, RequisitionId};

use crate::error::ReconcileError;
use crate::store::{ReconcileStore, StoreTx};

#[derive(Debug, Clone, Default)]
struct StoreState {
    items: HashMap<InventoryItemId, InventoryItem>,
    ledger: Vec<StockLedgerEntry>,
    receptions: HashMap<ReceptionId, ReceivingEvent>,
    distributions: HashMap<DistributionId, DistributionEvent>,
    requisitions: HashMap<RequisitionId, Requisition>,
}

/// In-memory store for the reconciliation engine.
///
/// All state lives behind one `RwLock`. A unit of work stages its mutations
/// on a clone of the state and swaps the clone in only when the closure
/// succeeds, so a failed operation leaves nothing behind. Holding the write
/// lock for the whole unit of work serializes read-modify-write cycles
/// across all items (stricter than the per-item minimum the invariant
/// needs).
///
/// Intended for tests/dev and single-process deployments. Not optimized for
/// throughput.
#[derive(Debug, Default)]
pub struct InMemoryStockStore {
    state: RwLock<StoreState>,
}

fn poisoned() -> ReconcileError {
    ReconcileError::Consistency("store lock poisoned".to_string())
}

impl InMemoryStockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an inventory item (setup path, outside any unit of work).
    pub fn insert_item(&self, item: InventoryItem) -> Result<(), ReconcileError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        if state.items.contains_key(&item.id()) {
            return Err(DomainError::conflict(format!("item {} already exists", item.id())).into());
        }
        state.items.insert(item.id(), item);
        Ok(())
    }

    /// Seed a requisition (setup path, outside any unit of work).
    pub fn insert_requisition(&self, requisition: Requisition) -> Result<(), ReconcileError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        if state.requisitions.contains_key(&requisition.id()) {
            return Err(DomainError::conflict(format!(
                "requisition {} already exists",
                requisition.id()
            ))
            .into());
        }
        state.requisitions.insert(requisition.id(), requisition);
        Ok(())
    }
}

/// Staged state of one unit of work.
struct MemoryTx {
    state: StoreState,
}

impl StoreTx for MemoryTx {
    fn item(&self, id: InventoryItemId) -> Result<InventoryItem, ReconcileError> {
        self.state
            .items
            .get(&id)
            .cloned()
            .ok_or(ReconcileError::ItemNotFound(id))
    }

    fn adjust_stock(&mut self, id: InventoryItemId, delta: i64) -> Result<i64, ReconcileError> {
        let item = self
            .state
            .items
            .get_mut(&id)
            .ok_or(ReconcileError::ItemNotFound(id))?;

        let available = item.stock();
        if delta < 0 && available.checked_add(delta).is_none_or(|q| q < 0) {
            return Err(ReconcileError::InsufficientStock {
                item_id: id,
                available,
                requested: delta.saturating_neg(),
            });
        }

        // Positive deltas that would overflow are caught here.
        Ok(item.apply_delta(delta)?)
    }

    fn record_entry(
        &mut self,
        item_id: InventoryItemId,
        direction: MovementDirection,
        quantity: i64,
        reason: String,
        actor_id: ActorId,
    ) -> Result<LedgerEntryId, ReconcileError> {
        if !self.state.items.contains_key(&item_id) {
            return Err(ReconcileError::ItemNotFound(item_id));
        }
        let entry =
            StockLedgerEntry::record(item_id, direction, quantity, reason, actor_id, Utc::now())?;
        let id = entry.id;
        self.state.ledger.push(entry);
        Ok(id)
    }

    fn insert_reception(&mut self, event: ReceivingEvent) -> Result<(), ReconcileError> {
        if self.state.receptions.contains_key(&event.id()) {
            return Err(
                DomainError::conflict(format!("reception {} already exists", event.id())).into(),
            );
        }
        self.state.receptions.insert(event.id(), event);
        Ok(())
    }

    fn reception(&self, id: ReceptionId) -> Result<ReceivingEvent, ReconcileError> {
        self.state
            .receptions
            .get(&id)
            .cloned()
            .ok_or(ReconcileError::ReceptionNotFound(id))
    }

    fn replace_reception(&mut self, event: ReceivingEvent) -> Result<(), ReconcileError> {
        if !self.state.receptions.contains_key(&event.id()) {
            return Err(ReconcileError::ReceptionNotFound(event.id()));
        }
        self.state.receptions.insert(event.id(), event);
        Ok(())
    }

    fn remove_reception(&mut self, id: ReceptionId) -> Result<ReceivingEvent, ReconcileError> {
        self.state
            .receptions
            .remove(&id)
            .ok_or(ReconcileError::ReceptionNotFound(id))
    }

    fn insert_distribution(&mut self, event: DistributionEvent) -> Result<(), ReconcileError> {
        if self.state.distributions.contains_key(&event.id()) {
            return Err(
                DomainError::conflict(format!("distribution {} already exists", event.id()))
                    .into(),
            );
        }
        self.state.distributions.insert(event.id(), event);
        Ok(())
    }

    fn distribution(&self, id: DistributionId) -> Result<DistributionEvent, ReconcileError> {
        self.state
            .distributions
            .get(&id)
            .cloned()
            .ok_or(ReconcileError::DistributionNotFound(id))
    }

    fn replace_distribution(&mut self, event: DistributionEvent) -> Result<(), ReconcileError> {
        if !self.state.distributions.contains_key(&event.id()) {
            return Err(ReconcileError::DistributionNotFound(event.id()));
        }
        self.state.distributions.insert(event.id(), event);
        Ok(())
    }

    fn remove_distribution(
        &mut self,
        id: DistributionId,
    ) -> Result<DistributionEvent, ReconcileError> {
        self.state
            .distributions
            .remove(&id)
            .ok_or(ReconcileError::DistributionNotFound(id))
    }

    fn requisition(&self, id: RequisitionId) -> Result<Requisition, ReconcileError> {
        self.state
            .requisitions
            .get(&id)
            .cloned()
            .ok_or(ReconcileError::RequisitionNotFound(id))
    }

    fn put_requisition(&mut self, requisition: Requisition) -> Result<(), ReconcileError> {
        if !self.state.requisitions.contains_key(&requisition.id()) {
            return Err(ReconcileError::RequisitionNotFound(requisition.id()));
        }
        self.state.requisitions.insert(requisition.id(), requisition);
        Ok(())
    }
}

impl ReconcileStore for InMemoryStockStore {
    fn unit_of_work<T, F>(&self, f: F) -> Result<T, ReconcileError>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T, ReconcileError>,
    {
        let mut guard = self.state.write().map_err(|_| poisoned())?;

        // Stage on a clone; commit is the swap below, rollback is dropping it.
        let mut tx = MemoryTx {
            state: guard.clone(),
        };
        let out = f(&mut tx)?;
        *guard = tx.state;
        Ok(out)
    }

    fn get_item(&self, id: InventoryItemId) -> Option<InventoryItem> {
        self.state.read().ok()?.items.get(&id).cloned()
    }

    fn get_reception(&self, id: ReceptionId) -> Option<ReceivingEvent> {
        self.state.read().ok()?.receptions.get(&id).cloned()
    }

    fn get_distribution(&self, id: DistributionId) -> Option<DistributionEvent> {
        self.state.read().ok()?.distributions.get(&id).cloned()
    }

    fn get_requisition(&self, id: RequisitionId) -> Option<Requisition> {
        self.state.read().ok()?.requisitions.get(&id).cloned()
    }

    fn ledger_entries_for(&self, id: InventoryItemId) -> Vec<StockLedgerEntry> {
        let state = match self.state.read() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        state
            .ledger
            .iter()
            .filter(|e| e.item_id == id)
            .cloned()
            .collect()
    }
}
