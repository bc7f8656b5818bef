use thiserror::Error;

use crate::types::AccountId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FreedomError {
    /// the data-access collaborator could not produce the portfolio or payments
    #[error("data unavailable: {message}")]
    DataUnavailable {
        message: String,
    },

    #[error("override write failed for account {account_id}: {message}")]
    OverrideWriteFailed {
        account_id: AccountId,
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl FreedomError {
    pub fn data_unavailable(message: impl Into<String>) -> Self {
        FreedomError::DataUnavailable {
            message: message.into(),
        }
    }

    /// true for failures the caller should render as an empty state
    pub fn is_no_data(&self) -> bool {
        matches!(self, FreedomError::DataUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, FreedomError>;
