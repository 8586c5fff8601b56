//! # Minibank Bank
//!
//! The bank aggregate: customer registry, authentication, bank-wide
//! interest and fee batches, reporting, plus TOML configuration.
//!
//! ## Example
//!
//! ```
//! use minibank_bank::{Bank, BankConfig};
//! use rust_decimal::Decimal;
//!
//! let mut config = BankConfig::with_identity("Minibank", "Da Nang");
//! config.security.bcrypt_cost = 4;
//! let mut bank = Bank::from_config(&config);
//!
//! let alice = bank
//!     .register_customer("Alice", "Tran", "alice@example.com", "secret")
//!     .unwrap();
//! alice.open_account("savings", Decimal::new(1200, 0)).unwrap();
//!
//! let report = bank.generate_bank_report();
//! assert_eq!(report.total_customers, 1);
//! assert_eq!(report.total_deposits, Decimal::new(1200, 0));
//! ```

pub mod bank;
pub mod config;
pub mod instance;
pub mod report;

pub use bank::Bank;
pub use config::{BankConfig, BankSection, ConfigError, SecuritySection};
pub use instance::BankInstance;
pub use report::{reserve_ratio, BankReport};
