//! Password checks for the login procedure.
//!
//! Every check pays for one full Argon2id verification: against the
//! stored hash when the account exists, against a fixed stand-in hash
//! when it does not or when the stored value is unusable. A failed
//! login therefore takes the same time whether or not the username is
//! known.

use std::sync::LazyLock;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Cost parameters the account store hashes with (m=19456 KiB, t=2, p=1).
const STORE_M_COST: u32 = 19456;
const STORE_T_COST: u32 = 2;
const STORE_P_COST: u32 = 1;

/// Verified in place of a real hash for unknown usernames.
static STAND_IN_HASH: LazyLock<Option<String>> = LazyLock::new(|| {
    let params = argon2::Params::new(STORE_M_COST, STORE_T_COST, STORE_P_COST, None).ok()?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(b"cnk-portal-absent-account", &salt)
        .ok()
        .map(|hash| hash.to_string())
});

/// Result of checking a login password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordCheck {
    Match,
    Mismatch,
    /// No account holds the username.
    NoAccount,
    /// The stored value is not a verifiable Argon2 hash.
    Unusable(String),
}

impl PasswordCheck {
    pub fn is_match(&self) -> bool {
        matches!(self, PasswordCheck::Match)
    }
}

/// Check `password` against the stored hash of the account, or against
/// the stand-in hash when `stored_hash` is `None`.
///
/// If `pepper` is provided it is prepended to the password; it must
/// match the pepper the store hashed with.
pub fn check_password(
    password: &str,
    stored_hash: Option<&str>,
    pepper: Option<&str>,
) -> PasswordCheck {
    let input = match pepper {
        Some(p) => format!("{p}{password}"),
        None => password.to_string(),
    };

    let Some(stored_hash) = stored_hash else {
        verify_stand_in(&input);
        return PasswordCheck::NoAccount;
    };

    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            verify_stand_in(&input);
            return PasswordCheck::Unusable(format!("invalid hash format: {e}"));
        }
    };

    // Parameters come from the PHC string, so any cost setting verifies.
    match Argon2::default().verify_password(input.as_bytes(), &parsed) {
        Ok(()) => PasswordCheck::Match,
        Err(argon2::password_hash::Error::Password) => PasswordCheck::Mismatch,
        Err(e) => PasswordCheck::Unusable(format!("verify error: {e}")),
    }
}

fn verify_stand_in(input: &str) {
    if let Some(parsed) = STAND_IN_HASH
        .as_deref()
        .and_then(|hash| PasswordHash::new(hash).ok())
    {
        let _ = Argon2::default().verify_password(input.as_bytes(), &parsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_password(password: &str, pepper: Option<&str>) -> String {
        let input = match pepper {
            Some(p) => format!("{p}{password}"),
            None => password.to_string(),
        };
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(input.as_bytes(), &salt)
            .expect("hashing failed")
            .to_string()
    }

    #[test]
    fn correct_password_matches() {
        let hash = hash_password("1234", None);
        assert!(check_password("1234", Some(&hash), None).is_match());
    }

    #[test]
    fn wrong_password_is_a_mismatch() {
        let hash = hash_password("1234", None);
        assert_eq!(check_password("12345", Some(&hash), None), PasswordCheck::Mismatch);
        assert_eq!(check_password("", Some(&hash), None), PasswordCheck::Mismatch);
    }

    #[test]
    fn pepper_is_applied() {
        let hash = hash_password("1234", Some("pepper!"));
        assert!(check_password("1234", Some(&hash), Some("pepper!")).is_match());
        assert_eq!(check_password("1234", Some(&hash), None), PasswordCheck::Mismatch);
    }

    #[test]
    fn plaintext_stored_value_is_unusable() {
        let check = check_password("1234", Some("1234"), None);
        assert!(matches!(check, PasswordCheck::Unusable(_)));
    }

    #[test]
    fn unknown_account_never_matches() {
        assert_eq!(check_password("1234", None, None), PasswordCheck::NoAccount);
        assert_eq!(
            check_password("cnk-portal-absent-account", None, None),
            PasswordCheck::NoAccount
        );
    }

    #[test]
    fn stand_in_hash_costs_the_same_as_stored_hashes() {
        let hash = STAND_IN_HASH.as_deref().expect("stand-in hash computed");
        let parsed = PasswordHash::new(hash).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");

        let params = argon2::Params::try_from(&parsed).unwrap();
        assert_eq!(params.m_cost(), STORE_M_COST);
        assert_eq!(params.t_cost(), STORE_T_COST);
        assert_eq!(params.p_cost(), STORE_P_COST);
    }
}
