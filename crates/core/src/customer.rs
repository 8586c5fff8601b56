//! # Customer Module
//!
//! Customer sở hữu các Account và điều phối chuyển khoản giữa chúng.
//! Email uniqueness is the bank's job; a Customer does not check it.

use crate::account::{Account, AccountTerms, AccountType};
use crate::error::{CoreError, CoreResult};
use crate::ids::{AccountNumber, CustomerId, IdAllocator};
use crate::password;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// Khách hàng của ngân hàng.
#[derive(Debug, Clone)]
pub struct Customer {
    id: CustomerId,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    /// Account numbers are allocated in increasing order, so key order is
    /// also opening order.
    accounts: BTreeMap<AccountNumber, Account>,
    is_active: bool,
    created_at: DateTime<Utc>,
    ids: IdAllocator,
    terms: AccountTerms,
}

impl Customer {
    /// Tạo Customer mới. `password_hash` must already be hashed.
    pub fn new(
        id: CustomerId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password_hash: String,
        ids: IdAllocator,
        terms: AccountTerms,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password_hash,
            accounts: BTreeMap::new(),
            is_active: true,
            created_at: Utc::now(),
            ids,
            terms,
        }
    }

    // === Accessors ===

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn verify_password(&self, password: &str) -> bool {
        password::verify_password(password, &self.password_hash)
    }

    // === Accounts ===

    /// Mở tài khoản mới. `account_type` is matched case-insensitively.
    pub fn open_account(
        &mut self,
        account_type: &str,
        initial_deposit: Decimal,
    ) -> CoreResult<&mut Account> {
        let account_type: AccountType = account_type.parse()?;
        let number = self.ids.next_account_number();
        let account = Account::open(
            number,
            self.id,
            self.terms.kind_for(account_type),
            self.terms.daily_withdrawal_limit,
            initial_deposit,
            self.ids.transactions(),
        )?;

        info!(
            customer = self.id,
            account = number,
            %account_type,
            %initial_deposit,
            "account opened"
        );

        Ok(self.accounts.entry(number).or_insert(account))
    }

    pub fn get_account(&self, number: AccountNumber) -> CoreResult<&Account> {
        self.accounts
            .get(&number)
            .ok_or(CoreError::AccountNotFound(number))
    }

    pub fn get_account_mut(&mut self, number: AccountNumber) -> CoreResult<&mut Account> {
        self.accounts
            .get_mut(&number)
            .ok_or(CoreError::AccountNotFound(number))
    }

    pub fn has_account(&self, number: AccountNumber) -> bool {
        self.accounts.contains_key(&number)
    }

    /// All accounts in opening order
    pub fn get_accounts(&self) -> Vec<&Account> {
        self.accounts.values().collect()
    }

    pub fn accounts_mut(&mut self) -> impl Iterator<Item = &mut Account> {
        self.accounts.values_mut()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Tổng số dư của tất cả tài khoản.
    ///
    /// Read-only figure for listings; saturates at `Decimal::MAX`.
    pub fn total_balance(&self) -> Decimal {
        self.accounts
            .values()
            .fold(Decimal::ZERO, |total, account| total.saturating_add(account.balance()))
    }

    /// Chuyển tiền giữa hai tài khoản của cùng một khách hàng.
    ///
    /// The source gets a `withdrawal` and a `transfer_out` record, the
    /// destination a `deposit` and a `transfer_in` record. The destination is
    /// checked before the source is debited, so once the withdrawal succeeds
    /// the deposit cannot fail. Returns `(source_balance, destination_balance)`.
    pub fn transfer(
        &mut self,
        from: AccountNumber,
        to: AccountNumber,
        amount: Decimal,
    ) -> CoreResult<(Decimal, Decimal)> {
        self.get_account(from)?;
        let destination = self.get_account(to)?;
        if from == to {
            return Err(CoreError::SameAccountTransfer(from));
        }
        destination.ensure_can_receive(amount)?;

        let from_balance = self.get_account_mut(from)?.transfer_out(amount, to)?;
        let to_balance = self.get_account_mut(to)?.transfer_in(amount, from)?;

        debug!(customer = self.id, from, to, %amount, "transfer completed");
        Ok((from_balance, to_balance))
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    /// Plain-data projection for listings
    pub fn snapshot(&self) -> CustomerSummary {
        CustomerSummary {
            customer_id: self.id,
            name: self.full_name(),
            email: self.email.clone(),
            account_count: self.accounts.len(),
            total_balance: self.total_balance(),
            member_since: self.created_at,
        }
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} - {})", self.full_name(), self.id, self.email)
    }
}

/// Customer row for listings and reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSummary {
    pub customer_id: CustomerId,
    pub name: String,
    pub email: String,
    pub account_count: usize,
    pub total_balance: Decimal,
    pub member_since: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionType;
    use rust_decimal_macros::dec;

    fn alice() -> Customer {
        let hash = password::hash_password("pw", password::MIN_COST).unwrap();
        Customer::new(
            1,
            "Alice",
            "Nguyen",
            "alice@example.com",
            hash,
            IdAllocator::new(),
            AccountTerms::default(),
        )
    }

    #[test]
    fn test_customer_creation() {
        let customer = alice();

        assert_eq!(customer.id(), 1);
        assert_eq!(customer.full_name(), "Alice Nguyen");
        assert!(customer.is_active());
        assert_eq!(customer.account_count(), 0);
        assert_eq!(customer.total_balance(), dec!(0));
    }

    #[test]
    fn test_verify_password() {
        let customer = alice();
        assert!(customer.verify_password("pw"));
        assert!(!customer.verify_password("PW"));
    }

    #[test]
    fn test_open_account_case_insensitive() {
        let mut customer = alice();

        let savings = customer.open_account("Savings", dec!(500)).unwrap();
        assert_eq!(savings.account_type(), AccountType::Savings);
        assert_eq!(savings.customer_id(), 1);
        assert_eq!(savings.balance(), dec!(500));

        let checking = customer.open_account("CHECKING", dec!(0)).unwrap();
        assert_eq!(checking.account_type(), AccountType::Checking);
        assert_eq!(
            checking.transactions()[0].tx_type(),
            TransactionType::AccountOpening
        );
    }

    #[test]
    fn test_open_account_unknown_type() {
        let mut customer = alice();
        let result = customer.open_account("brokerage", dec!(100));

        assert!(matches!(result, Err(CoreError::UnknownAccountType(_))));
        assert_eq!(customer.account_count(), 0);
    }

    #[test]
    fn test_accounts_in_opening_order() {
        let mut customer = alice();
        let first = customer.open_account("checking", dec!(1)).unwrap().number();
        let second = customer.open_account("savings", dec!(2)).unwrap().number();
        let third = customer.open_account("checking", dec!(3)).unwrap().number();

        let numbers: Vec<_> = customer.get_accounts().iter().map(|a| a.number()).collect();
        assert_eq!(numbers, vec![first, second, third]);
        assert_eq!(customer.total_balance(), dec!(6));
    }

    #[test]
    fn test_get_account_not_found() {
        let customer = alice();
        assert!(matches!(
            customer.get_account(99),
            Err(CoreError::AccountNotFound(99))
        ));
    }

    #[test]
    fn test_transfer() {
        let mut customer = alice();
        let checking = customer.open_account("checking", dec!(800)).unwrap().number();
        let savings = customer.open_account("savings", dec!(200)).unwrap().number();

        let (from_balance, to_balance) = customer.transfer(checking, savings, dec!(300)).unwrap();

        assert_eq!(from_balance, dec!(500));
        assert_eq!(to_balance, dec!(500));
        // opening + withdrawal + transfer_out
        assert_eq!(customer.get_account(checking).unwrap().transactions().len(), 3);
        // opening + deposit + transfer_in
        assert_eq!(customer.get_account(savings).unwrap().transactions().len(), 3);
        assert_eq!(customer.total_balance(), dec!(1000));
    }

    #[test]
    fn test_transfer_missing_account() {
        let mut customer = alice();
        let checking = customer.open_account("checking", dec!(800)).unwrap().number();

        assert!(matches!(
            customer.transfer(checking, 42, dec!(10)),
            Err(CoreError::AccountNotFound(42))
        ));
        assert!(matches!(
            customer.transfer(42, checking, dec!(10)),
            Err(CoreError::AccountNotFound(42))
        ));
        assert_eq!(customer.get_account(checking).unwrap().balance(), dec!(800));
    }

    #[test]
    fn test_transfer_same_account() {
        let mut customer = alice();
        let checking = customer.open_account("checking", dec!(800)).unwrap().number();

        let result = customer.transfer(checking, checking, dec!(10));
        assert!(matches!(result, Err(CoreError::SameAccountTransfer(_))));
        assert_eq!(customer.get_account(checking).unwrap().transactions().len(), 1);
    }

    #[test]
    fn test_failed_withdrawal_leg_leaves_both_accounts_unchanged() {
        let mut customer = alice();
        let savings = customer.open_account("savings", dec!(300)).unwrap().number();
        let checking = customer.open_account("checking", dec!(0)).unwrap().number();

        // Would drop savings below its 100 minimum
        let result = customer.transfer(savings, checking, dec!(250));

        assert!(matches!(result, Err(CoreError::WithdrawalDenied { .. })));
        let savings = customer.get_account(savings).unwrap();
        let checking = customer.get_account(checking).unwrap();
        assert_eq!(savings.balance(), dec!(300));
        assert_eq!(savings.transactions().len(), 1);
        assert_eq!(checking.balance(), dec!(0));
        assert_eq!(checking.transactions().len(), 1);
    }

    #[test]
    fn test_transfer_to_inactive_account_does_not_debit_source() {
        let mut customer = alice();
        let checking = customer.open_account("checking", dec!(500)).unwrap().number();
        let savings = customer.open_account("savings", dec!(500)).unwrap().number();
        customer.get_account_mut(savings).unwrap().deactivate();

        let result = customer.transfer(checking, savings, dec!(100));

        assert!(matches!(result, Err(CoreError::AccountInactive(_))));
        assert_eq!(customer.get_account(checking).unwrap().balance(), dec!(500));
    }

    #[test]
    fn test_transfer_into_full_account_does_not_debit_source() {
        let mut customer = alice();
        let checking = customer.open_account("checking", dec!(500)).unwrap().number();
        let savings = customer.open_account("savings", Decimal::MAX).unwrap().number();

        let result = customer.transfer(checking, savings, dec!(100));

        assert!(matches!(result, Err(CoreError::Overflow { operation: "deposit", .. })));
        let source = customer.get_account(checking).unwrap();
        assert_eq!(source.balance(), dec!(500));
        assert_eq!(source.transactions().len(), 1);
    }

    #[test]
    fn test_total_balance_saturates() {
        let mut customer = alice();
        customer.open_account("savings", Decimal::MAX).unwrap();
        customer.open_account("checking", dec!(1)).unwrap();

        assert_eq!(customer.total_balance(), Decimal::MAX);
        assert_eq!(customer.snapshot().total_balance, Decimal::MAX);
    }

    #[test]
    fn test_snapshot() {
        let mut customer = alice();
        customer.open_account("checking", dec!(120)).unwrap();
        customer.open_account("savings", dec!(380)).unwrap();

        let summary = customer.snapshot();
        assert_eq!(summary.customer_id, 1);
        assert_eq!(summary.name, "Alice Nguyen");
        assert_eq!(summary.email, "alice@example.com");
        assert_eq!(summary.account_count, 2);
        assert_eq!(summary.total_balance, dec!(500));
    }
}
