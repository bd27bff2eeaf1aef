use chrono::Utc;
use tracing::{debug, warn};

use depot_core::{ActorId, RecordId};
use depot_distribution::{
    DistributionEvent, DistributionId, DistributionLineItem, DistributionUpdate, NewDistribution,
};
use depot_inventory::{InventoryItemId, MovementDirection};

use crate::error::ReconcileError;
use crate::store::{ReconcileStore, StoreTx};

/// Reconciles goods-issued events against inventory stock.
///
/// There is no applied-vs-recorded split here: a linked line always leaves
/// stock in full at creation, comes back in full at deletion, and edits move
/// stock by the per-item difference. Any decrement that would drive an item
/// below zero fails the whole operation.
pub struct DistributionReconciler<S: ReconcileStore> {
    store: S,
}

impl<S: ReconcileStore> DistributionReconciler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a new distribution, decrementing stock for every linked line.
    ///
    /// All lines are checked against current stock before anything moves, so
    /// the error names the first offending line rather than a half-applied
    /// state.
    pub fn create(
        &self,
        input: NewDistribution,
        actor: ActorId,
    ) -> Result<DistributionEvent, ReconcileError> {
        input.validate()?;
        let id = DistributionId::new(RecordId::new());

        self.store.unit_of_work(|tx| {
            let event = DistributionEvent::new(
                id,
                input.recipient.clone(),
                input.department.clone(),
                input.lines.clone(),
                actor,
                Utc::now(),
            )?;

            for line in event.lines() {
                let Some(item_id) = line.item_id else {
                    continue;
                };
                let item = tx.item(item_id)?;
                if item.stock() < line.quantity {
                    warn!(
                        item = %item_id,
                        available = item.stock(),
                        requested = line.quantity,
                        "distribution rejected: insufficient stock"
                    );
                    return Err(ReconcileError::InsufficientStock {
                        item_id,
                        available: item.stock(),
                        requested: line.quantity,
                    });
                }
            }

            for line in event.lines() {
                let Some(item_id) = line.item_id else {
                    continue;
                };
                tx.adjust_stock(item_id, -line.quantity)?;
                tx.record_entry(
                    item_id,
                    MovementDirection::Out,
                    line.quantity,
                    format!(
                        "distribution {id}: issued {} {} to {}",
                        line.quantity,
                        line.item_name,
                        event.recipient()
                    ),
                    actor,
                )?;
            }

            tx.insert_distribution(event.clone())?;
            debug!(distribution = %id, recipient = event.recipient(), "distribution recorded");
            Ok(event)
        })
    }

    /// Edit a distribution, moving stock by the per-item difference between
    /// the old and new line sets.
    pub fn update(
        &self,
        id: DistributionId,
        update: DistributionUpdate,
        actor: ActorId,
    ) -> Result<DistributionEvent, ReconcileError> {
        update.validate()?;

        self.store.unit_of_work(|tx| {
            let old = tx.distribution(id)?;

            let new_lines: Vec<DistributionLineItem> = match update.lines {
                Some(lines) => lines,
                None => old.lines().to_vec(),
            };

            for line in &new_lines {
                if let Some(item_id) = line.item_id {
                    tx.item(item_id)?;
                }
            }

            // Old lines first (removed and surviving links), then lines
            // newly linked in this edit. A larger issue decrements further;
            // a smaller or removed one restores the difference.
            for line in old.lines() {
                let Some(item_id) = line.item_id else {
                    continue;
                };
                let new_quantity = new_lines
                    .iter()
                    .find(|l| l.item_id == Some(item_id))
                    .map(|l| l.quantity)
                    .unwrap_or(0);
                // Stock delta is the inverse of the issued-quantity delta.
                apply_correction(tx, id, item_id, line.quantity - new_quantity, actor)?;
            }
            for line in &new_lines {
                let Some(item_id) = line.item_id else {
                    continue;
                };
                if old.lines().iter().any(|l| l.item_id == Some(item_id)) {
                    continue;
                }
                apply_correction(tx, id, item_id, -line.quantity, actor)?;
            }

            let mut updated = old;
            updated.replace(update.recipient, update.department, new_lines, Utc::now())?;
            tx.replace_distribution(updated.clone())?;
            debug!(distribution = %id, "distribution reconciled");
            Ok(updated)
        })
    }

    /// Delete a distribution, restoring every linked line to stock.
    pub fn delete(&self, id: DistributionId, actor: ActorId) -> Result<(), ReconcileError> {
        self.store.unit_of_work(|tx| {
            let old = tx.remove_distribution(id)?;

            for line in old.lines() {
                let Some(item_id) = line.item_id else {
                    continue;
                };
                tx.adjust_stock(item_id, line.quantity)?;
                tx.record_entry(
                    item_id,
                    MovementDirection::In,
                    line.quantity,
                    format!(
                        "distribution {id} deleted: restored {} {}",
                        line.quantity, line.item_name
                    ),
                    actor,
                )?;
            }

            debug!(distribution = %id, "distribution deleted and restored");
            Ok(())
        })
    }
}

/// Apply one signed stock correction for an edit and append the matching
/// ledger entry. The delta is in stock terms (negative issues more, positive
/// restores). A zero delta is a no-op.
fn apply_correction(
    tx: &mut dyn StoreTx,
    id: DistributionId,
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
        format!("distribution {id} edited: correction {delta:+}"),
        actor,
    )?;
    Ok(())
}
