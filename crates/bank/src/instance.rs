//! One bank per holder.
//!
//! `BankInstance` keeps the "construct once, later requests get the same bank"
//! behaviour without a global: the caller owns the holder and decides how
//! long it lives.

use crate::bank::Bank;
use crate::config::BankConfig;
use tracing::debug;

#[derive(Debug, Default)]
pub struct BankInstance {
    bank: Option<Bank>,
}

impl BankInstance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the held bank, building it on the first call.
    ///
    /// `name` and `location` are ignored once a bank exists.
    pub fn get_or_init(&mut self, name: &str, location: &str) -> &mut Bank {
        self.get_or_init_with(&BankConfig::with_identity(name, location))
    }

    /// Same as [`BankInstance::get_or_init`] with a full configuration.
    pub fn get_or_init_with(&mut self, config: &BankConfig) -> &mut Bank {
        if let Some(existing) = &self.bank {
            debug!(
                name = existing.name(),
                ignored = %config.bank.name,
                "bank already initialized"
            );
        }
        self.bank.get_or_insert_with(|| Bank::from_config(config))
    }

    pub fn get(&self) -> Option<&Bank> {
        self.bank.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut Bank> {
        self.bank.as_mut()
    }

    pub fn is_initialized(&self) -> bool {
        self.bank.is_some()
    }
}
