//! Report data built from the bank: a bank overview and per-account statements.

use crate::exporters::ReportData;
use chrono::{DateTime, Utc};
use minibank_bank::{Bank, BankReport};
use minibank_core::{AccountSnapshot, CustomerSummary};
use rust_decimal::Decimal;

/// Bank report plus one row per customer
#[derive(Debug, Clone)]
pub struct BankOverview {
    pub title: String,
    pub report: BankReport,
    pub customers: Vec<CustomerSummary>,
}

impl BankOverview {
    /// Refreshes the bank's cached totals, like `Bank::generate_bank_report`.
    pub fn from_bank(bank: &mut Bank) -> Self {
        let report = bank.generate_bank_report();
        Self {
            title: format!("{} Bank Report", report.bank_name),
            customers: bank.list_all_customers(),
            report,
        }
    }
}

impl ReportData for BankOverview {
    fn title(&self) -> &str {
        &self.title
    }

    fn headers(&self) -> Vec<String> {
        ["Customer ID", "Name", "Email", "Accounts", "Total Balance", "Member Since"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.customers
            .iter()
            .map(|c| {
                vec![
                    c.customer_id.to_string(),
                    c.name.clone(),
                    c.email.clone(),
                    c.account_count.to_string(),
                    money(c.total_balance),
                    c.member_since.format("%Y-%m-%d").to_string(),
                ]
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        let r = &self.report;
        vec![
            ("Bank".to_string(), r.bank_name.clone()),
            ("Location".to_string(), r.location.clone()),
            ("Total Customers".to_string(), r.total_customers.to_string()),
            ("Total Accounts".to_string(), r.total_accounts.to_string()),
            ("Total Deposits".to_string(), money(r.total_deposits)),
            ("Bank Balance".to_string(), money(r.bank_balance)),
            ("Total Loans".to_string(), money(r.total_loans)),
            ("Reserve Ratio".to_string(), r.reserve_ratio_display()),
            ("Generated At".to_string(), timestamp(r.generated_at)),
        ]
    }
}

/// Sao kê tài khoản: one row per transaction, oldest first
#[derive(Debug, Clone)]
pub struct AccountStatement {
    pub title: String,
    pub snapshot: AccountSnapshot,
    pub generated_at: DateTime<Utc>,
}

impl AccountStatement {
    pub fn new(snapshot: AccountSnapshot) -> Self {
        Self {
            title: format!("Statement for account {}", snapshot.account_number),
            snapshot,
            generated_at: Utc::now(),
        }
    }
}

impl From<AccountSnapshot> for AccountStatement {
    fn from(snapshot: AccountSnapshot) -> Self {
        Self::new(snapshot)
    }
}

impl ReportData for AccountStatement {
    fn title(&self) -> &str {
        &self.title
    }

    fn headers(&self) -> Vec<String> {
        ["ID", "Timestamp", "Type", "Amount", "Description", "Status"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.snapshot
            .transactions
            .iter()
            .map(|t| {
                vec![
                    t.id().to_string(),
                    timestamp(t.timestamp()),
                    t.tx_type().to_string(),
                    money(t.amount()),
                    t.description().to_string(),
                    t.status().as_str().to_string(),
                ]
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        let s = &self.snapshot;
        let status = if s.is_active { "active" } else { "inactive" };
        vec![
            ("Account".to_string(), s.account_number.to_string()),
            ("Owner".to_string(), s.customer_id.to_string()),
            ("Type".to_string(), s.account_type.to_string()),
            ("Status".to_string(), status.to_string()),
            ("Balance".to_string(), money(s.balance)),
            (
                "Withdrawn Today".to_string(),
                format!("{} / {}", money(s.today_withdrawn), money(s.daily_withdrawal_limit)),
            ),
            ("Transactions".to_string(), s.transactions.len().to_string()),
            ("Generated At".to_string(), timestamp(self.generated_at)),
        ]
    }
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}
