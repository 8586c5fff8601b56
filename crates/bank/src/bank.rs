//! Bank aggregate - owns every customer and runs the bank-wide operations.

use crate::config::BankConfig;
use crate::report::{reserve_ratio, BankReport};
use chrono::Utc;
use minibank_core::{
    password, Account, AccountKind, AccountNumber, AccountTerms, AccountType, CoreError,
    CoreResult, Customer, CustomerId, CustomerSummary, IdAllocator,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// The bank.
///
/// Constructed explicitly and handed to whoever needs it; see
/// [`crate::BankInstance`] for the one-bank-per-holder lifecycle.
#[derive(Debug)]
pub struct Bank {
    name: String,
    location: String,
    /// Keyed by id; ids are allocated in increasing order
    customers: BTreeMap<CustomerId, Customer>,
    total_deposits: Decimal,
    total_loans: Decimal,
    bank_balance: Decimal,
    transaction_fee: Decimal,
    ids: IdAllocator,
    terms: AccountTerms,
    bcrypt_cost: u32,
}

impl Bank {
    /// Bank with default configuration
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self::from_config(&BankConfig::with_identity(name, location))
    }

    pub fn from_config(config: &BankConfig) -> Self {
        info!(name = %config.bank.name, location = %config.bank.location, "bank created");

        Self {
            name: config.bank.name.clone(),
            location: config.bank.location.clone(),
            customers: BTreeMap::new(),
            total_deposits: Decimal::ZERO,
            total_loans: Decimal::ZERO,
            bank_balance: config.bank.opening_capital,
            transaction_fee: config.bank.transaction_fee,
            ids: IdAllocator::new(),
            terms: config.accounts.clone(),
            bcrypt_cost: config.security.bcrypt_cost,
        }
    }

    // === Accessors ===

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Cached value from the last [`Bank::calculate_total_deposits`]
    pub fn total_deposits(&self) -> Decimal {
        self.total_deposits
    }

    pub fn total_loans(&self) -> Decimal {
        self.total_loans
    }

    pub fn bank_balance(&self) -> Decimal {
        self.bank_balance
    }

    pub fn transaction_fee(&self) -> Decimal {
        self.transaction_fee
    }

    pub fn terms(&self) -> &AccountTerms {
        &self.terms
    }

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    pub fn account_count(&self) -> usize {
        self.customers.values().map(Customer::account_count).sum()
    }

    /// Customers in registration order
    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }

    // === Customers ===

    /// Đăng ký khách hàng mới
    pub fn register_customer(
        &mut self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> CoreResult<&mut Customer> {
        if self.customers.values().any(|c| c.email() == email) {
            return Err(CoreError::DuplicateEmail(email.to_string()));
        }

        let password_hash = password::hash_password(password, self.bcrypt_cost)?;
        let id = self.ids.next_customer_id();
        let customer = Customer::new(
            id,
            first_name,
            last_name,
            email,
            password_hash,
            self.ids.clone(),
            self.terms.clone(),
        );

        info!(customer = id, %email, "customer registered");
        Ok(self.customers.entry(id).or_insert(customer))
    }

    pub fn authenticate(&self, email: &str, password: &str) -> CoreResult<&Customer> {
        self.customers
            .values()
            .find(|c| c.email() == email && c.verify_password(password))
            .ok_or(CoreError::AuthenticationFailed)
    }

    pub fn get_customer(&self, id: CustomerId) -> CoreResult<&Customer> {
        self.customers.get(&id).ok_or(CoreError::CustomerNotFound(id))
    }

    pub fn get_customer_mut(&mut self, id: CustomerId) -> CoreResult<&mut Customer> {
        self.customers
            .get_mut(&id)
            .ok_or(CoreError::CustomerNotFound(id))
    }

    /// Look an account up by number across all customers
    pub fn find_account(&self, number: AccountNumber) -> CoreResult<&Account> {
        self.customers
            .values()
            .find_map(|c| c.get_account(number).ok())
            .ok_or(CoreError::AccountNotFound(number))
    }

    // === Aggregates ===

    /// Tính lại tổng tiền gửi và lưu cache.
    /// Read-only figure; saturates at `Decimal::MAX`.
    pub fn calculate_total_deposits(&mut self) -> Decimal {
        self.total_deposits = self
            .customers
            .values()
            .fold(Decimal::ZERO, |total, c| total.saturating_add(c.total_balance()));
        self.total_deposits
    }

    /// Apply one month of interest to every savings account.
    ///
    /// The bank funds the interest from its own balance. Returns the total paid.
    /// Every account and the bank total are checked first, so an overflow
    /// anywhere leaves all balances untouched.
    pub fn apply_interest_to_all_savings_accounts(&mut self) -> CoreResult<Decimal> {
        let mut total_interest = Decimal::ZERO;
        for account in self.all_accounts() {
            if account.account_type() != AccountType::Savings {
                continue;
            }
            let interest = account.calculate_interest(1)?;
            if account.balance().checked_add(interest).is_none() {
                return Err(CoreError::Overflow {
                    operation: "apply_interest",
                    account_number: account.number(),
                });
            }
            total_interest = total_interest
                .checked_add(interest)
                .ok_or(CoreError::TotalOverflow("apply_interest_to_all_savings_accounts"))?;
        }
        let bank_balance = self
            .bank_balance
            .checked_sub(total_interest)
            .ok_or(CoreError::TotalOverflow("apply_interest_to_all_savings_accounts"))?;

        for customer in self.customers.values_mut() {
            for account in customer.accounts_mut() {
                if account.account_type() == AccountType::Savings {
                    account.apply_interest(1)?;
                }
            }
        }

        self.bank_balance = bank_balance;
        info!(%total_interest, bank_balance = %self.bank_balance, "interest paid");

        Ok(total_interest)
    }

    /// Charge the monthly fee on every checking account.
    ///
    /// Accounts that cannot cover the fee are skipped. Returns the total collected.
    /// The bank total is checked before any account is charged.
    pub fn charge_monthly_fees(&mut self) -> CoreResult<Decimal> {
        let mut total_fees = Decimal::ZERO;
        for account in self.all_accounts() {
            if let AccountKind::Checking(terms) = account.kind() {
                if account.balance() >= terms.monthly_fee {
                    total_fees = total_fees
                        .checked_add(terms.monthly_fee)
                        .ok_or(CoreError::TotalOverflow("charge_monthly_fees"))?;
                }
            }
        }
        let bank_balance = self
            .bank_balance
            .checked_add(total_fees)
            .ok_or(CoreError::TotalOverflow("charge_monthly_fees"))?;

        let mut skipped = 0usize;
        for customer in self.customers.values_mut() {
            for account in customer.accounts_mut() {
                if account.account_type() != AccountType::Checking {
                    continue;
                }
                if !account.charge_monthly_fee()? {
                    skipped += 1;
                }
            }
        }

        self.bank_balance = bank_balance;
        info!(%total_fees, skipped, bank_balance = %self.bank_balance, "monthly fees collected");

        Ok(total_fees)
    }

    fn all_accounts(&self) -> impl Iterator<Item = &Account> {
        self.customers.values().flat_map(Customer::get_accounts)
    }

    /// Reset the daily withdrawal tracking of every account.
    /// Returns how many accounts were reset.
    pub fn start_new_day(&mut self) -> usize {
        let mut reset = 0;
        for customer in self.customers.values_mut() {
            for account in customer.accounts_mut() {
                account.reset_daily_withdrawals();
                reset += 1;
            }
        }
        debug!(accounts = reset, "daily withdrawal limits reset");
        reset
    }

    /// Transfer between accounts that may belong to different customers.
    ///
    /// Same leg semantics as [`Customer::transfer`]: withdrawal plus
    /// `transfer_out` on the source, deposit plus `transfer_in` on the
    /// destination, destination validated before the source is debited.
    pub fn transfer_between_customers(
        &mut self,
        from_customer: CustomerId,
        from_account: AccountNumber,
        to_customer: CustomerId,
        to_account: AccountNumber,
        amount: Decimal,
    ) -> CoreResult<(Decimal, Decimal)> {
        if from_customer == to_customer {
            return self
                .get_customer_mut(from_customer)?
                .transfer(from_account, to_account, amount);
        }

        self.get_customer(from_customer)?.get_account(from_account)?;
        self.get_customer(to_customer)?
            .get_account(to_account)?
            .ensure_can_receive(amount)?;

        let from_balance = self
            .get_customer_mut(from_customer)?
            .get_account_mut(from_account)?
            .transfer_out(amount, to_account)?;
        let to_balance = self
            .get_customer_mut(to_customer)?
            .get_account_mut(to_account)?
            .transfer_in(amount, from_account)?;

        debug!(
            from_customer,
            from_account,
            to_customer,
            to_account,
            %amount,
            "cross-customer transfer completed"
        );
        Ok((from_balance, to_balance))
    }

    // === Reporting ===

    /// Tạo báo cáo ngân hàng. Refreshes the cached total deposits first.
    pub fn generate_bank_report(&mut self) -> BankReport {
        let total_deposits = self.calculate_total_deposits();

        BankReport {
            bank_name: self.name.clone(),
            location: self.location.clone(),
            total_customers: self.customer_count(),
            total_accounts: self.account_count(),
            total_deposits,
            bank_balance: self.bank_balance,
            total_loans: self.total_loans,
            reserve_ratio: reserve_ratio(self.bank_balance, total_deposits),
            generated_at: Utc::now(),
        }
    }

    /// Customer listing in registration order
    pub fn list_all_customers(&self) -> Vec<CustomerSummary> {
        self.customers.values().map(Customer::snapshot).collect()
    }
}
