//! Bank configuration, loaded from TOML.
//!
//! ```toml
//! [bank]
//! name = "Minibank"
//! location = "Da Nang"
//! opening_capital = 1000000
//!
//! [accounts]
//! daily_withdrawal_limit = 1000
//!
//! [accounts.savings]
//! interest_rate = "0.02"
//! min_balance = 100
//!
//! [accounts.checking]
//! overdraft_limit = 500
//! monthly_fee = 10
//!
//! [security]
//! bcrypt_cost = 12
//! ```

use minibank_core::{password, AccountTerms};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankConfig {
    #[serde(default)]
    pub bank: BankSection,

    /// Withdrawal limit plus savings/checking terms
    #[serde(default)]
    pub accounts: AccountTerms,

    #[serde(default)]
    pub security: SecuritySection,
}

/// Identity and capital of the bank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankSection {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_location")]
    pub location: String,

    /// Bank's own capital at start-up
    #[serde(default = "default_opening_capital")]
    pub opening_capital: Decimal,

    /// Reported only; never charged
    #[serde(default = "default_transaction_fee")]
    pub transaction_fee: Decimal,

    /// Default log level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_name() -> String {
    "Minibank".to_string()
}

fn default_location() -> String {
    "Main Street".to_string()
}

fn default_opening_capital() -> Decimal {
    Decimal::new(1_000_000, 0)
}

fn default_transaction_fee() -> Decimal {
    Decimal::new(25, 1)
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BankSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            location: default_location(),
            opening_capital: default_opening_capital(),
            transaction_fee: default_transaction_fee(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecuritySection {
    /// bcrypt work factor (4..=31)
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_bcrypt_cost() -> u32 {
    password::DEFAULT_COST
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl BankConfig {
    /// Default configuration with the given name and location
    pub fn with_identity(name: impl Into<String>, location: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.bank.name = name.into();
        config.bank.location = location.into();
        config
    }

    /// Load configuration from file
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::load_str(&content)?;

        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Load configuration from string
    pub fn load_str(content: &str) -> Result<Self, ConfigError> {
        let config: BankConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bank.name.trim().is_empty() {
            return Err(ConfigError::Validation("bank name is empty".to_string()));
        }

        let non_negative = [
            ("bank.opening_capital", self.bank.opening_capital),
            ("bank.transaction_fee", self.bank.transaction_fee),
            ("accounts.savings.min_balance", self.accounts.savings.min_balance),
            ("accounts.checking.overdraft_limit", self.accounts.checking.overdraft_limit),
            ("accounts.checking.monthly_fee", self.accounts.checking.monthly_fee),
        ];
        for (field, value) in non_negative {
            if value < Decimal::ZERO {
                return Err(ConfigError::Validation(format!(
                    "{} must not be negative, got {}",
                    field, value
                )));
            }
        }

        if self.accounts.daily_withdrawal_limit <= Decimal::ZERO {
            return Err(ConfigError::Validation(format!(
                "accounts.daily_withdrawal_limit must be positive, got {}",
                self.accounts.daily_withdrawal_limit
            )));
        }

        let rate = self.accounts.savings.interest_rate;
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(ConfigError::Validation(format!(
                "accounts.savings.interest_rate must be within [0, 1], got {}",
                rate
            )));
        }

        if !(password::MIN_COST..=31).contains(&self.security.bcrypt_cost) {
            return Err(ConfigError::Validation(format!(
                "security.bcrypt_cost must be within 4..=31, got {}",
                self.security.bcrypt_cost
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BankConfig::default();

        assert_eq!(config.bank.opening_capital, dec!(1000000));
        assert_eq!(config.accounts.daily_withdrawal_limit, dec!(1000));
        assert_eq!(config.accounts.savings.interest_rate, dec!(0.02));
        assert_eq!(config.accounts.savings.min_balance, dec!(100));
        assert_eq!(config.accounts.checking.overdraft_limit, dec!(500));
        assert_eq!(config.accounts.checking.monthly_fee, dec!(10));
        assert_eq!(config.security.bcrypt_cost, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_string_gives_defaults() {
        let config = BankConfig::load_str("").unwrap();
        assert_eq!(config, BankConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = BankConfig::load_str(
            r#"
            [bank]
            name = "River Bank"

            [accounts.savings]
            interest_rate = "0.035"

            [security]
            bcrypt_cost = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.bank.name, "River Bank");
        assert_eq!(config.bank.location, "Main Street");
        assert_eq!(config.accounts.savings.interest_rate, dec!(0.035));
        assert_eq!(config.accounts.savings.min_balance, dec!(100));
        assert_eq!(config.accounts.checking.monthly_fee, dec!(10));
        assert_eq!(config.security.bcrypt_cost, 4);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad = [
            "[accounts.savings]\ninterest_rate = \"1.5\"",
            "[accounts.checking]\nmonthly_fee = -1",
            "[accounts]\ndaily_withdrawal_limit = 0",
            "[security]\nbcrypt_cost = 2",
            "[bank]\nname = \"  \"",
        ];

        for content in bad {
            let result = BankConfig::load_str(content);
            assert!(
                matches!(result, Err(ConfigError::Validation(_))),
                "expected validation error for {:?}",
                content
            );
        }
    }

    #[test]
    fn test_parse_error() {
        let result = BankConfig::load_str("[bank\nname = 1");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[bank]\nlocation = \"Hue\"").unwrap();

        let config = BankConfig::load_file(file.path()).unwrap();
        assert_eq!(config.bank.location, "Hue");
    }

    #[test]
    fn test_load_missing_file() {
        let result = BankConfig::load_file("/definitely/not/here/minibank.toml");
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = BankConfig::with_identity("Round Trip Bank", "Vinh");
        let text = config.to_toml().unwrap();
        let parsed = BankConfig::load_str(&text).unwrap();

        assert_eq!(parsed, config);
    }
}
