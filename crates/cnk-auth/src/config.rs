//! Authentication configuration.

/// Configuration for the login service.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Optional pepper prepended to passwords before Argon2id
    /// verification. Must match the pepper the account store hashes
    /// with.
    pub pepper: Option<String>,
}
