//! Bank-wide report snapshot

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Snapshot returned by `Bank::generate_bank_report`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankReport {
    pub bank_name: String,
    pub location: String,
    pub total_customers: usize,
    pub total_accounts: usize,
    pub total_deposits: Decimal,
    pub bank_balance: Decimal,
    pub total_loans: Decimal,
    /// `bank_balance / total_deposits × 100`; `None` when there are no deposits
    pub reserve_ratio: Option<Decimal>,
    pub generated_at: DateTime<Utc>,
}

impl BankReport {
    /// Ratio rendered for display, "N/A" when undefined
    pub fn reserve_ratio_display(&self) -> String {
        match self.reserve_ratio {
            Some(ratio) => format!("{:.2}%", ratio.round_dp(2)),
            None => "N/A".to_string(),
        }
    }
}

/// Bank capital as a percentage of customer deposits.
///
/// Undefined (None) when deposits are zero.
pub fn reserve_ratio(bank_balance: Decimal, total_deposits: Decimal) -> Option<Decimal> {
    bank_balance
        .checked_div(total_deposits)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
}
