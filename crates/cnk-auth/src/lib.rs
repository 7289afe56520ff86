//! CNK Auth — Two-factor login, account administration, and the
//! account form state machine.

pub mod admin;
pub mod config;
pub mod error;
pub mod form;
pub mod password;
pub mod service;

pub use admin::{AccountAdminService, AccountPatch, NewAccount};
pub use config::AuthConfig;
pub use error::{AdminError, LoginError};
pub use form::{AccountDraft, AccountFormState};
pub use service::{LoginInput, LoginService};
