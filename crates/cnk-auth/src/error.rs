//! Login and account-administration error types.
//!
//! Every variant is scoped to the single attempted operation. The UI
//! layer renders [`LoginError::user_message`] / [`AdminError::user_message`]
//! and keeps the form populated for correction.

use cnk_core::error::PortalError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum LoginError {
    /// Unknown username or wrong password; the two are indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is not linked to a personnel record")]
    UnlinkedAccount,

    #[error("linked personnel record is missing")]
    PersonnelRecordMissing,

    #[error("SGK number does not match the personnel record")]
    SecondFactorMismatch,

    #[error(transparent)]
    Store(#[from] PortalError),
}

impl LoginError {
    /// Localized message shown on the login screen.
    pub fn user_message(&self) -> &'static str {
        match self {
            LoginError::InvalidCredentials => "Geçersiz kullanıcı adı veya şifre.",
            LoginError::UnlinkedAccount => {
                "Bu kullanıcı hesabı bir personel kartı ile ilişkilendirilmemiş."
            }
            LoginError::PersonnelRecordMissing => {
                "İlişkili personel kaydı veritabanında bulunamadı."
            }
            LoginError::SecondFactorMismatch => {
                "Girdiğiniz SGK Numarası sistemdeki kayıtlarla eşleşmiyor."
            }
            LoginError::Store(_) => "Beklenmeyen bir hata oluştu. Lütfen tekrar deneyin.",
        }
    }
}

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("required field is empty: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("username already exists: {username}")]
    DuplicateUsername { username: String },

    #[error("account not found: {id}")]
    NotFound { id: Uuid },

    #[error("the last admin account cannot be removed or demoted")]
    LastAdminProtected,

    #[error(transparent)]
    Store(PortalError),
}

impl From<PortalError> for AdminError {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::LastAdmin => AdminError::LastAdminProtected,
            other => AdminError::Store(other),
        }
    }
}

impl AdminError {
    /// Localized message shown on the account management screen.
    pub fn user_message(&self) -> &'static str {
        match self {
            AdminError::MissingRequiredField { .. } => {
                "Kullanıcı adı ve şifre alanları zorunludur."
            }
            AdminError::DuplicateUsername { .. } => "Bu kullanıcı adı zaten kullanılıyor.",
            AdminError::NotFound { .. } => "Kullanıcı bulunamadı.",
            AdminError::LastAdminProtected => "Son yönetici hesabı silinemez.",
            AdminError::Store(_) => "Beklenmeyen bir hata oluştu. Lütfen tekrar deneyin.",
        }
    }

    /// Map a store failure on account `id`, turning a missing record
    /// into [`AdminError::NotFound`].
    pub(crate) fn from_lookup(id: Uuid, err: PortalError) -> Self {
        if err.is_not_found() {
            AdminError::NotFound { id }
        } else {
            err.into()
        }
    }
}
