//! Domain models for the CNK portal.

pub mod account;
pub mod audit;
pub mod personnel;
