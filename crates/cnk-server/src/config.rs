//! Process configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first; real
//! environment variables take precedence over it.

use std::env;

use cnk_auth::AuthConfig;
use cnk_db::DbConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} (expected true/false)")]
    InvalidBool { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db: DbConfig,
    pub auth: AuthConfig,
    /// Insert the demo accounts when the store has none.
    pub seed_demo_data: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = DbConfig::default();
        let db = DbConfig {
            url: lookup("CNK_DB_URL").unwrap_or(defaults.url),
            namespace: lookup("CNK_DB_NAMESPACE").unwrap_or(defaults.namespace),
            database: lookup("CNK_DB_DATABASE").unwrap_or(defaults.database),
            username: lookup("CNK_DB_USER").unwrap_or(defaults.username),
            password: lookup("CNK_DB_PASSWORD").unwrap_or(defaults.password),
        };

        let auth = AuthConfig {
            pepper: lookup("CNK_PASSWORD_PEPPER").filter(|p| !p.is_empty()),
        };

        let seed_demo_data = match lookup("CNK_SEED_DEMO") {
            None => db.is_embedded(),
            Some(value) => parse_bool("CNK_SEED_DEMO", value)?,
        };

        Ok(Self {
            db,
            auth,
            seed_demo_data,
        })
    }
}

fn parse_bool(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_to_embedded_store_with_demo_seed() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.db.url, "mem://");
        assert!(config.seed_demo_data);
        assert!(config.auth.pepper.is_none());
    }

    #[test]
    fn remote_store_does_not_seed_by_default() {
        let config =
            ServerConfig::from_lookup(lookup(&[("CNK_DB_URL", "ws://db:8000")])).unwrap();
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn reads_pepper_and_seed_flag() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("CNK_PASSWORD_PEPPER", "s3cret"),
            ("CNK_SEED_DEMO", "false"),
        ]))
        .unwrap();
        assert_eq!(config.auth.pepper.as_deref(), Some("s3cret"));
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn rejects_malformed_bool() {
        let err = ServerConfig::from_lookup(lookup(&[("CNK_SEED_DEMO", "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBool { var: "CNK_SEED_DEMO", .. }));
    }
}
