//! `depot-distribution` — goods-issued events.
//!
//! Distributions are the outbound mirror of receptions, without the
//! tri-state status: an issued line is always fully applied at creation,
//! fully restored at deletion, and re-diffed on edit.

pub mod dispatch;

pub use dispatch::{
    DistributionEvent, DistributionId, DistributionLineItem, DistributionUpdate, NewDistribution,
};
