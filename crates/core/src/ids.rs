//! # Id Module
//!
//! Sequence generators for transaction ids, account numbers and customer ids.
//! The bank owns one [`IdAllocator`]; customers and accounts hold clones of
//! the handles they draw from, so every id stays unique for that bank.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub type TransactionId = u64;
pub type AccountNumber = u64;
pub type CustomerId = u64;

/// Monotonic counter. Clones share the same underlying counter.
#[derive(Debug, Clone)]
pub struct Sequence {
    next: Arc<AtomicU64>,
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequence {
    /// Sequence bắt đầu từ 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Arc::new(AtomicU64::new(first)),
        }
    }

    /// Take the next value
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    /// Value the next call to [`Sequence::next_id`] will return
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}

/// The three sequences a bank hands ids out of.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    transactions: Sequence,
    accounts: Sequence,
    customers: Sequence,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_transaction_id(&self) -> TransactionId {
        self.transactions.next_id()
    }

    pub fn next_account_number(&self) -> AccountNumber {
        self.accounts.next_id()
    }

    pub fn next_customer_id(&self) -> CustomerId {
        self.customers.next_id()
    }

    /// Handle to the shared transaction sequence
    pub fn transactions(&self) -> Sequence {
        self.transactions.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let seq = Sequence::new();
        assert_eq!(seq.next_id(), 1);
        assert_eq!(seq.next_id(), 2);
        assert_eq!(seq.peek(), 3);
    }

    #[test]
    fn test_clones_share_counter() {
        let seq = Sequence::starting_at(100);
        let other = seq.clone();

        assert_eq!(seq.next_id(), 100);
        assert_eq!(other.next_id(), 101);
        assert_eq!(seq.next_id(), 102);
    }

    #[test]
    fn test_allocators_are_independent() {
        let a = IdAllocator::new();
        let b = IdAllocator::new();

        assert_eq!(a.next_customer_id(), 1);
        assert_eq!(a.next_customer_id(), 2);
        assert_eq!(b.next_customer_id(), 1);

        // Each kind of id has its own sequence
        assert_eq!(a.next_account_number(), 1);
        assert_eq!(a.next_transaction_id(), 1);
    }

    #[test]
    fn test_transaction_handle_shares_allocator_sequence() {
        let ids = IdAllocator::new();
        let handle = ids.transactions();

        assert_eq!(handle.next_id(), 1);
        assert_eq!(ids.next_transaction_id(), 2);
    }
}
