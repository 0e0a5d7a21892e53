use super::account::{Account, Balance};
use super::event::WithdrawalCompleted;
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Outcome of a conditional debit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebitOutcome {
    /// The stored balance matched the expected value and was replaced.
    Applied,
    /// The stored balance no longer matches the snapshot the caller read.
    Conflict,
}

/// Read and conditional-update access to account records.
///
/// The store is the sole writer of accounts and must apply
/// `conditional_debit` atomically; it is the serialization point for
/// per-account balance mutation.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn get_by_account_id(&self, account_id: i64) -> Result<Option<Account>>;

    async fn get_by_number_and_pin(
        &self,
        account_number: Uuid,
        pin: u16,
    ) -> Result<Option<Account>>;

    /// Replaces the account balance with `new_balance` only if the stored
    /// balance still equals `expected_balance`.
    async fn conditional_debit(
        &self,
        account_id: i64,
        expected_balance: Balance,
        new_balance: Balance,
    ) -> Result<DebitOutcome>;
}

/// Receives completion events after a withdrawal has settled.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers a completion event. Fire-and-forget from the engine's point
    /// of view: a failed delivery is logged and never unwinds the settled
    /// withdrawal.
    async fn publish(&self, event: WithdrawalCompleted) -> Result<()>;
}

pub type AccountStoreBox = Box<dyn AccountStore>;
pub type NotificationSinkBox = Box<dyn NotificationSink>;
