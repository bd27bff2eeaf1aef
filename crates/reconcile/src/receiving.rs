use chrono::Utc;
use tracing::debug;

use depot_core::{ActorId, RecordId};
use depot_inventory::{InventoryItemId, MovementDirection};
use depot_receiving::{
    NewReception, ReceivingEvent, ReceivingLineItem, ReceptionId, ReceptionStatus, ReceptionUpdate,
    applied_quantity, classify,
};

use crate::error::ReconcileError;
use crate::store::{ReconcileStore, StoreTx};

/// Reconciles goods-received events against inventory stock.
///
/// Stock only moves for lines linked to an inventory item, and only the
/// *applied* portion of a line moves it: the full received quantity when the
/// event is `complete`, nothing otherwise. Creations, edits and deletions all
/// reduce to signed deltas between the previously applied quantity and the
/// new one, so replaying an edit never double-counts.
pub struct ReceptionReconciler<S: ReconcileStore> {
    store: S,
}

impl<S: ReconcileStore> ReceptionReconciler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a new reception and apply its stock effect.
    ///
    /// The status is resolved first (explicit if supplied, classified from
    /// the lines otherwise); only then does any stock move. Linked items
    /// must exist even when the resolved status applies nothing.
    pub fn create(
        &self,
        input: NewReception,
        actor: ActorId,
    ) -> Result<ReceivingEvent, ReconcileError> {
        input.validate()?;
        let id = ReceptionId::new(RecordId::new());

        self.store.unit_of_work(|tx| {
            let status = input.status.unwrap_or_else(|| classify(&input.lines));
            let event = ReceivingEvent::new(
                id,
                input.requisition_id,
                status,
                input.lines.clone(),
                actor,
                Utc::now(),
            )?;

            for line in event.lines() {
                let Some(item_id) = line.item_id else {
                    continue;
                };
                // Existence check applies to every linked line, even when the
                // status keeps its quantity out of stock.
                tx.item(item_id)?;
                let applied = applied_quantity(status, line.received);
                if applied > 0 {
                    tx.adjust_stock(item_id, applied)?;
                    tx.record_entry(
                        item_id,
                        MovementDirection::In,
                        applied,
                        format!("reception {id}: received {applied} {}", line.item_name),
                        actor,
                    )?;
                }
            }

            if let Some(req_id) = event.requisition_id() {
                let mut requisition = tx.requisition(req_id)?;
                if status == ReceptionStatus::Complete {
                    requisition.mark_received()?;
                    tx.put_requisition(requisition)?;
                }
            }

            tx.insert_reception(event.clone())?;
            debug!(reception = %id, status = status.as_str(), "reception recorded");
            Ok(event)
        })
    }

    /// Edit a reception, correcting stock by the signed difference between
    /// what the old version applied and what the new one applies.
    ///
    /// The effective new status is resolved once up front (explicit status
    /// wins; otherwise new lines are reclassified; otherwise the old status
    /// stands), then every delta is computed against it in a single pass.
    pub fn update(
        &self,
        id: ReceptionId,
        update: ReceptionUpdate,
        actor: ActorId,
    ) -> Result<ReceivingEvent, ReconcileError> {
        update.validate()?;

        self.store.unit_of_work(|tx| {
            let old = tx.reception(id)?;
            let old_status = old.status();

            let lines_supplied = update.lines.is_some();
            let new_lines: Vec<ReceivingLineItem> = match update.lines {
                Some(lines) => lines,
                None => old.lines().to_vec(),
            };
            let new_status = match update.status {
                Some(status) => status,
                None if lines_supplied => classify(&new_lines),
                None => old_status,
            };

            for line in &new_lines {
                if let Some(item_id) = line.item_id {
                    tx.item(item_id)?;
                }
            }

            // Old lines first (covers removed and surviving links), then
            // lines newly linked in this edit.
            for line in old.lines() {
                let Some(item_id) = line.item_id else {
                    continue;
                };
                let old_applied = applied_quantity(old_status, line.received);
                let new_applied = new_lines
                    .iter()
                    .find(|l| l.item_id == Some(item_id))
                    .map(|l| applied_quantity(new_status, l.received))
                    .unwrap_or(0);
                apply_correction(tx, id, item_id, new_applied - old_applied, actor)?;
            }
            for line in &new_lines {
                let Some(item_id) = line.item_id else {
                    continue;
                };
                if old.lines().iter().any(|l| l.item_id == Some(item_id)) {
                    continue;
                }
                let new_applied = applied_quantity(new_status, line.received);
                apply_correction(tx, id, item_id, new_applied, actor)?;
            }

            if let Some(req_id) = old.requisition_id() {
                if old_status != ReceptionStatus::Complete
                    && new_status == ReceptionStatus::Complete
                {
                    let mut requisition = tx.requisition(req_id)?;
                    requisition.mark_received()?;
                    tx.put_requisition(requisition)?;
                } else if old_status == ReceptionStatus::Complete
                    && new_status != ReceptionStatus::Complete
                {
                    let mut requisition = tx.requisition(req_id)?;
                    requisition.revert_received()?;
                    tx.put_requisition(requisition)?;
                }
            }

            let mut updated = old;
            updated.replace(new_status, new_lines, Utc::now())?;
            tx.replace_reception(updated.clone())?;
            debug!(reception = %id, status = new_status.as_str(), "reception reconciled");
            Ok(updated)
        })
    }

    /// Delete a reception, reversing whatever it had applied to stock.
    pub fn delete(&self, id: ReceptionId, actor: ActorId) -> Result<(), ReconcileError> {
        self.store.unit_of_work(|tx| {
            let old = tx.remove_reception(id)?;

            for line in old.lines() {
                let Some(item_id) = line.item_id else {
                    continue;
                };
                let applied = applied_quantity(old.status(), line.received);
                if applied > 0 {
                    tx.adjust_stock(item_id, -applied)?;
                    tx.record_entry(
                        item_id,
                        MovementDirection::Out,
                        applied,
                        format!("reception {id} deleted: reversed {applied} {}", line.item_name),
                        actor,
                    )?;
                }
            }

            if let Some(req_id) = old.requisition_id() {
                if old.status() == ReceptionStatus::Complete {
                    let mut requisition = tx.requisition(req_id)?;
                    requisition.revert_received()?;
                    tx.put_requisition(requisition)?;
                }
            }

            debug!(reception = %id, "reception deleted and reversed");
            Ok(())
        })
    }
}

/// Apply one signed correction for an edit: move stock by `delta` and append
/// the matching ledger entry. A zero delta is a no-op (no entry).
fn apply_correction(
    tx: &mut dyn StoreTx,
    id: ReceptionId,
    item_id: InventoryItemId,
    delta: i64,
    actor: ActorId,
) -> Result<(), ReconcileError> {
    if delta == 0 {
        return Ok(());
    }
    tx.adjust_stock(item_id, delta)?;
    let (direction, magnitude) = if delta > 0 {
        (MovementDirection::In, delta)
    } else {
        (MovementDirection::Out, -delta)
    };
    tx.record_entry(
        item_id,
        direction,
        magnitude,
        format!("reception {id} edited: correction {delta:+}"),
        actor,
    )?;
    Ok(())
}
