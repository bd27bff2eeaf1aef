//! `depot-receiving` — goods-received events and the status classifier.
//!
//! A reception records what physically arrived against what was requested.
//! Whether a line affects stock at all hinges on the event's tri-state
//! status: only `complete` receptions are reflected in the quantity on hand
//! (see [`applied_quantity`]); partial or discrepant deliveries wait for a
//! correcting edit.

pub mod reception;
pub mod status;

pub use reception::{NewReception, ReceivingEvent, ReceivingLineItem, ReceptionId, ReceptionUpdate};
pub use status::{ReceptionStatus, applied_quantity, classify};
