//! Domain model: payment records, request-side value objects and the ports
//! through which the lifecycle manager reaches its collaborators.

pub mod account;
pub mod context;
pub mod payment;
pub mod ports;
pub mod request;
pub mod transaction;
