//! Domain entities and the repository ports the engine is written against.

pub mod credentials;
pub mod order;
pub mod payment;
pub mod ports;
