//! # Account Module
//!
//! Account là nơi giữ số dư. Có hai loại: Savings và Checking.
//! The variant-specific rules (withdrawal predicate, interest, monthly fee)
//! are dispatched by matching on [`AccountKind`].
//!
//! Every balance mutation appends exactly one completed balance-moving
//! [`Transaction`], so the balance always equals the sum of
//! [`Transaction::balance_effect`] over the history.

use crate::error::{CoreError, CoreResult};
use crate::ids::{AccountNumber, CustomerId, Sequence};
use crate::transaction::{Transaction, TransactionType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Loại tài khoản
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Savings,
    Checking,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "savings",
            AccountType::Checking => "checking",
        }
    }
}

impl FromStr for AccountType {
    type Err = CoreError;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "savings" => Ok(AccountType::Savings),
            "checking" => Ok(AccountType::Checking),
            _ => Err(CoreError::UnknownAccountType(s.to_string())),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_interest_rate() -> Decimal {
    Decimal::new(2, 2)
}

fn default_min_balance() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn default_overdraft_limit() -> Decimal {
    Decimal::new(500, 0)
}

fn default_monthly_fee() -> Decimal {
    Decimal::TEN
}

fn default_daily_withdrawal_limit() -> Decimal {
    Decimal::ONE_THOUSAND
}

/// Điều khoản tài khoản tiết kiệm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsTerms {
    /// Annual rate, e.g. 0.02
    #[serde(default = "default_interest_rate")]
    pub interest_rate: Decimal,
    /// Floor the balance may not drop below on withdrawal
    #[serde(default = "default_min_balance")]
    pub min_balance: Decimal,
}

impl Default for SavingsTerms {
    fn default() -> Self {
        Self {
            interest_rate: default_interest_rate(),
            min_balance: default_min_balance(),
        }
    }
}

/// Điều khoản tài khoản thanh toán
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckingTerms {
    /// How far below zero the balance may go
    #[serde(default = "default_overdraft_limit")]
    pub overdraft_limit: Decimal,
    #[serde(default = "default_monthly_fee")]
    pub monthly_fee: Decimal,
}

impl Default for CheckingTerms {
    fn default() -> Self {
        Self {
            overdraft_limit: default_overdraft_limit(),
            monthly_fee: default_monthly_fee(),
        }
    }
}

/// Terms applied to every account a customer opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTerms {
    #[serde(default = "default_daily_withdrawal_limit")]
    pub daily_withdrawal_limit: Decimal,
    #[serde(default)]
    pub savings: SavingsTerms,
    #[serde(default)]
    pub checking: CheckingTerms,
}

impl Default for AccountTerms {
    fn default() -> Self {
        Self {
            daily_withdrawal_limit: default_daily_withdrawal_limit(),
            savings: SavingsTerms::default(),
            checking: CheckingTerms::default(),
        }
    }
}

impl AccountTerms {
    pub fn kind_for(&self, account_type: AccountType) -> AccountKind {
        match account_type {
            AccountType::Savings => AccountKind::Savings(self.savings.clone()),
            AccountType::Checking => AccountKind::Checking(self.checking.clone()),
        }
    }
}

/// Account variant together with its variant-specific terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountKind {
    Savings(SavingsTerms),
    Checking(CheckingTerms),
}

impl AccountKind {
    pub fn account_type(&self) -> AccountType {
        match self {
            AccountKind::Savings(_) => AccountType::Savings,
            AccountKind::Checking(_) => AccountType::Checking,
        }
    }
}

/// Tài khoản ngân hàng.
///
/// An `Account` only comes into existence through
/// `Customer::open_account` with a concrete [`AccountType`]; there is no
/// kind-less base account to construct.
///
/// ```compile_fail,E0451
/// use minibank_core::{Account, AccountKind, SavingsTerms, Sequence};
/// use rust_decimal::Decimal;
///
/// let account = Account {
///     number: 1,
///     customer_id: 1,
///     balance: Decimal::ZERO,
///     kind: AccountKind::Savings(SavingsTerms::default()),
///     transactions: Vec::new(),
///     is_active: true,
///     daily_withdrawal_limit: Decimal::ONE_THOUSAND,
///     today_withdrawn: Decimal::ZERO,
///     opened_at: chrono::Utc::now(),
///     transaction_ids: Sequence::new(),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Account {
    number: AccountNumber,
    customer_id: CustomerId,
    balance: Decimal,
    kind: AccountKind,
    transactions: Vec<Transaction>,
    is_active: bool,
    daily_withdrawal_limit: Decimal,
    today_withdrawn: Decimal,
    opened_at: DateTime<Utc>,
    transaction_ids: Sequence,
}

impl Account {
    /// Open an account and record the `account_opening` transaction,
    /// even for a zero initial deposit.
    pub(crate) fn open(
        number: AccountNumber,
        customer_id: CustomerId,
        kind: AccountKind,
        daily_withdrawal_limit: Decimal,
        initial_deposit: Decimal,
        transaction_ids: Sequence,
    ) -> CoreResult<Self> {
        if initial_deposit < Decimal::ZERO {
            return Err(CoreError::InvalidAmount(format!(
                "Initial deposit cannot be negative: {}",
                initial_deposit
            )));
        }

        let mut account = Self {
            number,
            customer_id,
            balance: initial_deposit,
            kind,
            transactions: Vec::new(),
            is_active: true,
            daily_withdrawal_limit,
            today_withdrawn: Decimal::ZERO,
            opened_at: Utc::now(),
            transaction_ids,
        };

        let description = format!("Opened {} account", account.account_type());
        account.record(TransactionType::AccountOpening, initial_deposit, description);

        Ok(account)
    }

    // === Accessors ===

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    /// Owner of this account
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn kind(&self) -> &AccountKind {
        &self.kind
    }

    pub fn account_type(&self) -> AccountType {
        self.kind.account_type()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn daily_withdrawal_limit(&self) -> Decimal {
        self.daily_withdrawal_limit
    }

    pub fn today_withdrawn(&self) -> Decimal {
        self.today_withdrawn
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Lịch sử giao dịch (read-only)
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Owned copy of the history
    pub fn transaction_history(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    // === Balance operations ===

    /// Gửi tiền
    pub fn deposit(&mut self, amount: Decimal) -> CoreResult<Decimal> {
        self.ensure_can_receive(amount)?;

        self.balance = self.checked(self.balance.checked_add(amount), "deposit")?;
        self.record(TransactionType::Deposit, amount, "Deposit".to_string());
        debug!(account = self.number, %amount, balance = %self.balance, "deposit");

        Ok(self.balance)
    }

    /// Rút tiền
    pub fn withdraw(&mut self, amount: Decimal) -> CoreResult<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(CoreError::invalid_amount("Withdrawal", amount));
        }
        self.ensure_active()?;

        if !self.can_withdraw(amount) {
            warn!(
                account = self.number,
                %amount,
                balance = %self.balance,
                today_withdrawn = %self.today_withdrawn,
                "withdrawal denied"
            );
            return Err(CoreError::WithdrawalDenied {
                account_number: self.number,
                amount,
            });
        }

        let balance = self.checked(self.balance.checked_sub(amount), "withdraw")?;
        let today_withdrawn =
            self.checked(self.today_withdrawn.checked_add(amount), "withdraw")?;
        self.balance = balance;
        self.today_withdrawn = today_withdrawn;
        self.record(TransactionType::Withdrawal, -amount, "Withdrawal".to_string());
        debug!(account = self.number, %amount, balance = %self.balance, "withdrawal");

        Ok(self.balance)
    }

    /// Check that a deposit of `amount` would succeed.
    ///
    /// Transfers call this on the destination before debiting the source,
    /// so the deposit leg cannot fail once the withdrawal leg has run.
    pub fn ensure_can_receive(&self, amount: Decimal) -> CoreResult<()> {
        if amount <= Decimal::ZERO {
            return Err(CoreError::invalid_amount("Deposit", amount));
        }
        self.ensure_active()?;
        self.checked(self.balance.checked_add(amount), "deposit")?;
        Ok(())
    }

    /// Variant-specific withdrawal predicate
    pub(crate) fn can_withdraw(&self, amount: Decimal) -> bool {
        // A sum past Decimal::MAX is over any limit
        let within_daily_limit = self
            .today_withdrawn
            .checked_add(amount)
            .is_some_and(|total| total <= self.daily_withdrawal_limit);

        match &self.kind {
            AccountKind::Savings(terms) => {
                self.balance >= amount
                    && within_daily_limit
                    && self
                        .balance
                        .checked_sub(amount)
                        .is_some_and(|rest| rest >= terms.min_balance)
            }
            // Overdraft headroom replaces the plain balance check.
            // Headroom past Decimal::MAX covers any amount.
            AccountKind::Checking(terms) => {
                self.balance
                    .checked_add(terms.overdraft_limit)
                    .map_or(true, |headroom| headroom >= amount)
                    && within_daily_limit
            }
        }
    }

    /// Tính lãi (không thay đổi số dư). Checking accounts earn nothing.
    ///
    /// Fails with [`CoreError::Overflow`] when the product does not fit in a
    /// `Decimal`; the result is never saturated.
    pub fn calculate_interest(&self, months: u32) -> CoreResult<Decimal> {
        match &self.kind {
            AccountKind::Savings(terms) => {
                // balance × (rate / 12) × months, with the division done last
                let interest = self
                    .balance
                    .checked_mul(terms.interest_rate)
                    .and_then(|v| v.checked_mul(Decimal::from(months)))
                    .and_then(|v| v.checked_div(Decimal::from(12)));
                self.checked(interest, "calculate_interest")
            }
            AccountKind::Checking(_) => Ok(Decimal::ZERO),
        }
    }

    /// Áp dụng lãi (Savings only). Returns the interest credited.
    pub fn apply_interest(&mut self, months: u32) -> CoreResult<Decimal> {
        if !matches!(self.kind, AccountKind::Savings(_)) {
            return Err(self.unsupported("apply_interest"));
        }

        let interest = self.calculate_interest(months)?;
        self.balance = self.checked(self.balance.checked_add(interest), "apply_interest")?;
        let description = format!("Interest for {} month(s)", months);
        self.record(TransactionType::Interest, interest, description);
        debug!(account = self.number, %interest, balance = %self.balance, "interest applied");

        Ok(interest)
    }

    /// Thu phí hàng tháng (Checking only).
    ///
    /// Returns `Ok(false)` without touching the account when the balance
    /// cannot cover the fee; the fee is skipped, not carried as debt.
    pub fn charge_monthly_fee(&mut self) -> CoreResult<bool> {
        let fee = match &self.kind {
            AccountKind::Checking(terms) => terms.monthly_fee,
            AccountKind::Savings(_) => return Err(self.unsupported("charge_monthly_fee")),
        };

        if self.balance < fee {
            warn!(account = self.number, %fee, balance = %self.balance, "monthly fee skipped");
            return Ok(false);
        }

        self.balance = self.checked(self.balance.checked_sub(fee), "charge_monthly_fee")?;
        self.record(TransactionType::Fee, -fee, "Monthly maintenance fee".to_string());
        debug!(account = self.number, %fee, balance = %self.balance, "monthly fee charged");

        Ok(true)
    }

    /// Sending leg of a transfer: a withdrawal followed by a `transfer_out` memo.
    pub fn transfer_out(&mut self, amount: Decimal, to: AccountNumber) -> CoreResult<Decimal> {
        let balance = self.withdraw(amount)?;
        self.record(
            TransactionType::TransferOut,
            -amount,
            format!("Transfer to account {}", to),
        );
        Ok(balance)
    }

    /// Receiving leg of a transfer: a deposit followed by a `transfer_in` memo.
    pub fn transfer_in(&mut self, amount: Decimal, from: AccountNumber) -> CoreResult<Decimal> {
        let balance = self.deposit(amount)?;
        self.record(
            TransactionType::TransferIn,
            amount,
            format!("Transfer from account {}", from),
        );
        Ok(balance)
    }

    // === Status ===

    /// Start a new withdrawal tracking period. Nothing calls this on a timer;
    /// the owner of the bank decides when a day ends.
    pub fn reset_daily_withdrawals(&mut self) {
        self.today_withdrawn = Decimal::ZERO;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    /// Plain-data view for display
    pub fn statement(&self) -> AccountSnapshot {
        AccountSnapshot {
            account_number: self.number,
            customer_id: self.customer_id,
            account_type: self.account_type(),
            balance: self.balance,
            is_active: self.is_active,
            today_withdrawn: self.today_withdrawn,
            daily_withdrawal_limit: self.daily_withdrawal_limit,
            opened_at: self.opened_at,
            transactions: self.transaction_history(),
        }
    }

    fn ensure_active(&self) -> CoreResult<()> {
        if self.is_active {
            Ok(())
        } else {
            Err(CoreError::AccountInactive(self.number))
        }
    }

    /// Turn a checked arithmetic result into an overflow error
    fn checked(&self, value: Option<Decimal>, operation: &'static str) -> CoreResult<Decimal> {
        value.ok_or(CoreError::Overflow {
            operation,
            account_number: self.number,
        })
    }

    fn unsupported(&self, operation: &'static str) -> CoreError {
        CoreError::UnsupportedOperation {
            operation,
            account_type: self.account_type(),
        }
    }

    /// Ghi nhận giao dịch (đã hoàn tất)
    fn record(&mut self, tx_type: TransactionType, amount: Decimal, description: String) {
        let mut transaction =
            Transaction::create(self.transaction_ids.next_id(), tx_type, amount, description);
        transaction.complete();
        self.transactions.push(transaction);
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account {} ({}, owner: {}, balance: {})",
            self.number,
            self.account_type(),
            self.customer_id,
            self.balance
        )
    }
}

/// Snapshot of an account for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSnapshot {
    pub account_number: AccountNumber,
    pub customer_id: CustomerId,
    pub account_type: AccountType,
    pub balance: Decimal,
    pub is_active: bool,
    pub today_withdrawn: Decimal,
    pub daily_withdrawal_limit: Decimal,
    pub opened_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
}
