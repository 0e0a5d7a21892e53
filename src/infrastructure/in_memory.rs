use crate::domain::account::{Account, Balance};
use crate::domain::ports::{AccountStore, DebitOutcome};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory account store.
///
/// Uses `Arc<RwLock<HashMap<i64, Account>>>` to allow shared concurrent
/// access. The conditional debit runs under the single write lock, which
/// makes it the atomic compare-and-set the engine's optimistic settlement
/// relies on.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<i64, Account>>>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an account record. Record creation belongs to
    /// the store; the engine only reads and issues conditional debits.
    pub async fn insert(&self, account: Account) {
        let mut accounts = self.accounts.write().await;
        accounts.insert(account.account_id, account);
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn get_by_account_id(&self, account_id: i64) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&account_id).cloned())
    }

    async fn get_by_number_and_pin(
        &self,
        account_number: Uuid,
        pin: u16,
    ) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|account| account.account_number == account_number && account.pin == pin)
            .cloned())
    }

    async fn conditional_debit(
        &self,
        account_id: i64,
        expected_balance: Balance,
        new_balance: Balance,
    ) -> Result<DebitOutcome> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&account_id) {
            Some(account) if account.balance == expected_balance => {
                account.balance = new_balance;
                Ok(DebitOutcome::Applied)
            }
            _ => Ok(DebitOutcome::Conflict),
        }
    }
}
