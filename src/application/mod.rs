//! Application layer containing the payment lifecycle decision logic.
//!
//! This module defines the `PaymentLifecycleManager`, the entry point the
//! controller layer calls to populate, fetch and duplicate-check payment
//! records, and the status rules it applies.

pub mod manager;
pub mod status;
