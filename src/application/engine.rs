use crate::application::cash_reserve::CashReserve;
use crate::domain::account::{self, Account, Amount, Balance};
use crate::domain::event::WithdrawalCompleted;
use crate::domain::ports::{AccountStoreBox, DebitOutcome, NotificationSinkBox};
use crate::error::{AtmError, Result};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Read-compute-write attempts before a debit conflict becomes a
/// settlement failure.
const MAX_DEBIT_ATTEMPTS: u32 = 3;

/// The single authority through which a withdrawal request becomes a
/// settled, notified state change.
///
/// The engine owns the dispenser's [`CashReserve`] and mediates all account
/// access through the injected store. It never caches balances across
/// requests, so it can be shared behind an `Arc` by any number of
/// concurrent callers.
pub struct AtmEngine {
    account_store: AccountStoreBox,
    notification_sink: NotificationSinkBox,
    cash_reserve: CashReserve,
}

impl AtmEngine {
    /// Creates an engine over the given collaborators with `initial_cash`
    /// loaded into the dispenser.
    pub fn new(
        account_store: AccountStoreBox,
        notification_sink: NotificationSinkBox,
        initial_cash: Decimal,
    ) -> Result<Self> {
        Ok(Self {
            account_store,
            notification_sink,
            cash_reserve: CashReserve::new(initial_cash)?,
        })
    }

    /// Cash currently held by the dispenser.
    pub fn cash_available(&self) -> Decimal {
        self.cash_reserve.available()
    }

    /// Adds delivered cash to the dispenser pool.
    pub fn replenish(&self, amount: Decimal) -> Result<()> {
        self.cash_reserve.replenish(amount)
    }

    /// Looks up the account matching `account_number` and `pin` and returns
    /// a snapshot of it. The snapshot is not locked; balances may move
    /// before any follow-up call.
    pub async fn validate_account(&self, account_number: Uuid, pin: u16) -> Result<Account> {
        if account_number.is_nil() {
            return Err(AtmError::InvalidInput(
                "account number must not be empty".to_string(),
            ));
        }
        if !account::is_valid_pin(pin) {
            return Err(AtmError::InvalidInput(
                "pin must be a 4-digit value".to_string(),
            ));
        }

        self.account_store
            .get_by_number_and_pin(account_number, pin)
            .await?
            .ok_or(AtmError::AccountNotFound)
    }

    /// Returns the withdrawable balance of the account: funds on deposit
    /// plus the overdraft allowance when the account has one.
    pub async fn get_balance(&self, account_id: i64) -> Result<Balance> {
        let account = self.fetch_account(account_id).await?;
        Ok(account.withdrawable_balance())
    }

    /// Authorizes and settles a single withdrawal, returning the
    /// withdrawable balance left on the account.
    ///
    /// Cash is reserved before the account is read; every failure past that
    /// point returns the reserved cash before the error surfaces, so the
    /// dispenser pool and the account ledger cannot drift apart.
    pub async fn withdraw(&self, account_id: i64, amount: Decimal) -> Result<Balance> {
        if account_id <= 0 {
            return Err(AtmError::InvalidInput(
                "account id must be positive".to_string(),
            ));
        }
        let amount = Amount::new(amount)?;

        self.cash_reserve.reserve(amount)?;

        if let Err(err) = self.settle(account_id, amount).await {
            self.cash_reserve.replenish(amount.value())?;
            return Err(err);
        }

        let event = WithdrawalCompleted {
            amount: amount.value(),
        };
        if let Err(err) = self.notification_sink.publish(event).await {
            tracing::warn!(
                amount = %event.amount,
                error = %err,
                "withdrawal settled but the completion notification was not delivered"
            );
        }

        // Fresh read rather than arithmetic on the in-flight snapshot: a
        // concurrent overdraft change is reflected in the returned balance.
        self.get_balance(account_id).await
    }

    /// Debits the account by `amount` under optimistic concurrency.
    ///
    /// Re-runs the read-check-write sequence on a stale snapshot, at most
    /// [`MAX_DEBIT_ATTEMPTS`] times. The conditional debit at the store is
    /// the sole serialization point for the account balance.
    async fn settle(&self, account_id: i64, amount: Amount) -> Result<()> {
        for attempt in 1..=MAX_DEBIT_ATTEMPTS {
            let account = self.fetch_account(account_id).await?;
            if Balance::from(amount) > account.withdrawable_balance() {
                return Err(AtmError::InsufficientFunds);
            }

            let new_balance = account.balance - Balance::from(amount);
            match self
                .account_store
                .conditional_debit(account_id, account.balance, new_balance)
                .await?
            {
                DebitOutcome::Applied => return Ok(()),
                DebitOutcome::Conflict => {
                    tracing::debug!(account_id, attempt, "stale balance snapshot, retrying debit");
                }
            }
        }

        Err(AtmError::SettlementFailure(MAX_DEBIT_ATTEMPTS))
    }

    async fn fetch_account(&self, account_id: i64) -> Result<Account> {
        if account_id <= 0 {
            return Err(AtmError::InvalidInput(
                "account id must be positive".to_string(),
            ));
        }
        self.account_store
            .get_by_account_id(account_id)
            .await?
            .ok_or(AtmError::AccountNotFound)
    }
}
