//! # Transaction Module
//!
//! A Transaction is one ledger event on one account. It is created pending,
//! moved to completed or failed straight away, and never changed after that.
//! Amounts are signed: credits are positive, debits negative.

use crate::ids::TransactionId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Loại giao dịch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    /// Memo on the receiving side of a transfer
    TransferIn,
    /// Memo on the sending side of a transfer
    TransferOut,
    Interest,
    Fee,
    AccountOpening,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::TransferIn => "transfer_in",
            TransactionType::TransferOut => "transfer_out",
            TransactionType::Interest => "interest",
            TransactionType::Fee => "fee",
            TransactionType::AccountOpening => "account_opening",
        }
    }

    /// Whether a record of this type moves the account balance.
    ///
    /// Transfer memos ride on top of the withdrawal/deposit pair that
    /// actually moves the money, so they are excluded.
    pub fn moves_balance(&self) -> bool {
        !matches!(self, TransactionType::TransferIn | TransactionType::TransferOut)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trạng thái giao dịch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Giao dịch ngân hàng
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    tx_type: TransactionType,
    amount: Decimal,
    description: String,
    timestamp: DateTime<Utc>,
    status: TransactionStatus,
}

impl Transaction {
    /// Tạo giao dịch mới ở trạng thái pending
    pub fn create(
        id: TransactionId,
        tx_type: TransactionType,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            tx_type,
            amount,
            description: description.into(),
            timestamp: Utc::now(),
            status: TransactionStatus::Pending,
        }
    }

    pub fn complete(&mut self) {
        self.status = TransactionStatus::Completed;
    }

    pub fn fail(&mut self) {
        self.status = TransactionStatus::Failed;
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn tx_type(&self) -> TransactionType {
        self.tx_type
    }

    /// Signed amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    /// Amount this record contributes to the account balance
    pub fn balance_effect(&self) -> Decimal {
        if self.is_completed() && self.tx_type.moves_balance() {
            self.amount
        } else {
            Decimal::ZERO
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {}: {} - {} ({})",
            self.id,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.tx_type,
            self.amount,
            self.description,
            self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_is_pending() {
        let tx = Transaction::create(1, TransactionType::Deposit, dec!(100), "Deposit");

        assert_eq!(tx.id(), 1);
        assert_eq!(tx.status(), TransactionStatus::Pending);
        assert_eq!(tx.amount(), dec!(100));
        assert_eq!(tx.description(), "Deposit");
        assert!(!tx.is_completed());
    }

    #[test]
    fn test_status_transitions() {
        let mut tx = Transaction::create(1, TransactionType::Withdrawal, dec!(-50), "Withdrawal");
        let created_at = tx.timestamp();

        tx.complete();
        assert!(tx.is_completed());

        tx.fail();
        assert_eq!(tx.status(), TransactionStatus::Failed);

        // Status changes never touch the recorded fields
        assert_eq!(tx.amount(), dec!(-50));
        assert_eq!(tx.tx_type(), TransactionType::Withdrawal);
        assert_eq!(tx.timestamp(), created_at);
    }

    #[test]
    fn test_balance_effect() {
        let mut deposit = Transaction::create(1, TransactionType::Deposit, dec!(100), "Deposit");
        assert_eq!(deposit.balance_effect(), dec!(0));
        deposit.complete();
        assert_eq!(deposit.balance_effect(), dec!(100));

        let mut memo = Transaction::create(2, TransactionType::TransferOut, dec!(-100), "Transfer");
        memo.complete();
        assert_eq!(memo.balance_effect(), dec!(0));

        let mut failed = Transaction::create(3, TransactionType::Fee, dec!(-10), "Fee");
        failed.fail();
        assert_eq!(failed.balance_effect(), dec!(0));
    }

    #[test]
    fn test_type_str() {
        assert_eq!(TransactionType::TransferIn.as_str(), "transfer_in");
        assert_eq!(TransactionType::AccountOpening.as_str(), "account_opening");
        assert!(TransactionType::Fee.moves_balance());
        assert!(!TransactionType::TransferOut.moves_balance());
    }

    #[test]
    fn test_display() {
        let mut tx = Transaction::create(7, TransactionType::Interest, dec!(1.5), "Monthly interest");
        tx.complete();
        let text = tx.to_string();

        assert!(text.starts_with("#7 "));
        assert!(text.contains("interest: 1.5 - Monthly interest (completed)"));
    }

    #[test]
    fn test_serialize_uses_snake_case() {
        let tx = Transaction::create(1, TransactionType::AccountOpening, dec!(0), "Opened");
        let json = serde_json::to_value(&tx).unwrap();

        assert_eq!(json["tx_type"], "account_opening");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["amount"], "0");
    }
}
