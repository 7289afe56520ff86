//! CNK Core — Domain models, repository traits, and error types shared
//! by the portal crates.

pub mod error;
pub mod models;
pub mod repository;
