use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Machine-readable classification of an [`Error`], independent of its display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Save,
    Application,
    Storage,
    Format,
}

/// Every failure a profile operation can surface.
///
/// The `Display` impl carries the technical message that ends up in logs. Text meant for the
/// user comes from [`Error::user_message`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("Profile validation failed: {reason}")]
    Validation { reason: String },
    #[error("Profile not found. ID: {id}")]
    NotFound { id: String },
    #[error("Failed to save profile: {reason}")]
    Save { reason: String },
    #[error("Failed to apply profile (ID: {target}): {reason}")]
    Application { target: String, reason: String },
    #[error("Storage operation [{operation}] failed: {reason}")]
    Storage { operation: String, reason: String },
    #[error("{reason}")]
    Format { reason: String },
}

impl Error {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(id: impl ToString) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    pub(crate) fn format(reason: impl Into<String>) -> Self {
        Self::Format {
            reason: reason.into(),
        }
    }

    pub(crate) fn storage(operation: &str, reason: impl ToString) -> Self {
        Self::Storage {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } => ErrorKind::Validation,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Save { .. } => ErrorKind::Save,
            Error::Application { .. } => ErrorKind::Application,
            Error::Storage { .. } => ErrorKind::Storage,
            Error::Format { .. } => ErrorKind::Format,
        }
    }

    /// Whether this error is one the profile operations raise themselves and pass through
    /// without wrapping.
    pub fn is_expected(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation | ErrorKind::NotFound)
    }

    /// A message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Error::NotFound { .. } => {
                "The specified profile was not found. It may have been deleted.".to_string()
            }
            Error::Validation { reason } => format!("Profile validation failed: {reason}"),
            Error::Save { reason } => format!("Failed to save profile: {reason}"),
            Error::Application { reason, .. } => format!("Failed to apply profile: {reason}"),
            Error::Storage { reason, .. } => format!("Storage operation failed: {reason}"),
            Error::Format { reason } => reason.clone(),
        }
    }

    /// Wrap anything that isn't an expected error into the kind produced by `wrap`, keeping
    /// the original message.
    pub(crate) fn or_wrap(self, wrap: impl FnOnce(String) -> Error) -> Error {
        if self.is_expected() {
            self
        } else {
            wrap(self.to_string())
        }
    }
}
