use serde::{Deserialize, Serialize};

use depot_core::{DomainError, DomainResult, RecordId};

/// Inventory item identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryItemId(pub RecordId);

impl InventoryItemId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InventoryItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A stocked item with a single mutable quantity on hand.
///
/// `stock` is never written directly by reconciliation code; it moves only
/// through [`InventoryItem::apply_delta`], which the quantity store calls
/// inside a unit of work. `min_stock` is informational (low-stock visibility)
/// and takes no part in reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    id: InventoryItemId,
    name: String,
    category: String,
    unit: String,
    stock: i64,
    min_stock: i64,
}

impl InventoryItem {
    pub fn new(
        id: InventoryItemId,
        name: impl Into<String>,
        category: impl Into<String>,
        unit: impl Into<String>,
        stock: i64,
        min_stock: i64,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        if stock < 0 {
            return Err(DomainError::validation("stock cannot be negative"));
        }
        if min_stock < 0 {
            return Err(DomainError::validation("min_stock cannot be negative"));
        }

        Ok(Self {
            id,
            name,
            category: category.into(),
            unit: unit.into(),
            stock,
            min_stock,
        })
    }

    pub fn id(&self) -> InventoryItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn min_stock(&self) -> i64 {
        self.min_stock
    }

    /// Whether the quantity on hand has fallen below the informational threshold.
    pub fn is_below_min(&self) -> bool {
        self.stock < self.min_stock
    }

    /// Apply a signed quantity delta, returning the new quantity on hand.
    ///
    /// Invariant: stock never goes negative. Callers wanting a richer error
    /// (available vs. requested) must pre-check against [`InventoryItem::stock`].
    pub fn apply_delta(&mut self, delta: i64) -> DomainResult<i64> {
        let new_stock = self
            .stock
            .checked_add(delta)
            .ok_or_else(|| DomainError::invariant("stock adjustment overflows"))?;
        if new_stock < 0 {
            return Err(DomainError::invariant("stock cannot go negative"));
        }
        self.stock = new_stock;
        Ok(self.stock)
    }
}
