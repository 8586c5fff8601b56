//! # Minibank Core
//!
//! Core domain types cho Minibank: Transaction, Account (Savings/Checking),
//! Customer, id sequences and the error taxonomy.
//!
//! ## Example
//!
//! ```
//! use minibank_core::{AccountTerms, Customer, IdAllocator, password};
//! use rust_decimal::Decimal;
//!
//! let hash = password::hash_password("secret", password::MIN_COST).unwrap();
//! let mut alice = Customer::new(
//!     1,
//!     "Alice",
//!     "Tran",
//!     "alice@example.com",
//!     hash,
//!     IdAllocator::new(),
//!     AccountTerms::default(),
//! );
//!
//! let checking = alice.open_account("checking", Decimal::new(800, 0)).unwrap().number();
//! let savings = alice.open_account("savings", Decimal::new(200, 0)).unwrap().number();
//!
//! let (from, to) = alice.transfer(checking, savings, Decimal::new(300, 0)).unwrap();
//! assert_eq!(from, Decimal::new(500, 0));
//! assert_eq!(to, Decimal::new(500, 0));
//! ```

pub mod account;
pub mod customer;
pub mod error;
pub mod ids;
pub mod password;
pub mod transaction;

pub use account::{
    Account, AccountKind, AccountSnapshot, AccountTerms, AccountType, CheckingTerms, SavingsTerms,
};
pub use customer::{Customer, CustomerSummary};
pub use error::{CoreError, CoreResult};
pub use ids::{AccountNumber, CustomerId, IdAllocator, Sequence, TransactionId};
pub use transaction::{Transaction, TransactionStatus, TransactionType};
