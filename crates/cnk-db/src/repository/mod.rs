//! SurrealDB repository implementations.

mod account;
mod audit;
mod personnel;

pub use account::SurrealAccountRepository;
pub use audit::SurrealAuditLogRepository;
pub use personnel::SurrealPersonnelRepository;
