//! Application layer: the orchestrator that drives one payment attempt from
//! eligibility check to recorded outcome.

pub mod orchestrator;
