//! Payment orchestration engine: routes charge attempts for customer orders
//! to the right external gateway, records every attempt in a ledger, and
//! reconciles ambiguous outcomes with the gateway later.

pub mod application;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod infrastructure;
pub mod settings;
