//! # Error Module
//!
//! Domain errors for Minibank using thiserror. Apart from `PasswordHash`,
//! every variant is a rejected input or a failed precondition.

use crate::account::AccountType;
use crate::ids::{AccountNumber, CustomerId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    // === Amount errors ===
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The result would not fit in a `Decimal`
    #[error("Amount overflow in {operation} on account {account_number}")]
    Overflow {
        operation: &'static str,
        account_number: AccountNumber,
    },

    /// A bank-wide total would not fit in a `Decimal`
    #[error("Bank total overflow in {0}")]
    TotalOverflow(&'static str),

    #[error("Withdrawal of {amount} denied on account {account_number}")]
    WithdrawalDenied {
        account_number: AccountNumber,
        amount: Decimal,
    },

    // === Account errors ===
    #[error("Unknown account type: {0}")]
    UnknownAccountType(String),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountNumber),

    #[error("Cannot transfer to the same account: {0}")]
    SameAccountTransfer(AccountNumber),

    #[error("Account is inactive: {0}")]
    AccountInactive(AccountNumber),

    #[error("{operation} is not supported on {account_type} accounts")]
    UnsupportedOperation {
        operation: &'static str,
        account_type: AccountType,
    },

    // === Customer errors ===
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Invalid email or password")]
    AuthenticationFailed,

    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}

/// Result type alias với CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create an invalid amount error for a named operation
    pub fn invalid_amount(operation: &str, amount: Decimal) -> Self {
        Self::InvalidAmount(format!("{} amount must be positive: {}", operation, amount))
    }

    /// Kiểm tra có phải lỗi not found không
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::AccountNotFound(_) | CoreError::CustomerNotFound(_)
        )
    }

    pub fn is_withdrawal_denied(&self) -> bool {
        matches!(self, CoreError::WithdrawalDenied { .. })
    }
}
