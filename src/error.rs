use thiserror::Error;

pub type Result<T> = std::result::Result<T, AtmError>;

/// Terminal failures of the withdrawal engine.
///
/// Every engine operation either succeeds or returns exactly one of these;
/// none of them is used for control flow past the protocol gates.
#[derive(Debug, Error)]
pub enum AtmError {
    /// Caller-supplied data failed static validation. Never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No account matches the given identifier or credentials.
    #[error("account not found")]
    AccountNotFound,

    /// The dispenser does not hold enough cash to cover the request. The
    /// account itself may be fine; callers surface this separately from
    /// [`AtmError::InsufficientFunds`].
    #[error("the dispenser does not hold enough cash")]
    InsufficientCash,

    /// The account balance (including any overdraft allowance) does not
    /// cover the requested amount.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Conditional debit retries were exhausted. Reserved cash has been
    /// returned; the account balance is untouched.
    #[error("settlement failed after {0} debit attempts")]
    SettlementFailure(u32),

    /// The notification sink rejected a completion event. Logged by the
    /// engine, never returned to withdrawal callers.
    #[error("notification sink unavailable")]
    NotificationUnavailable,

    /// Account store I/O fault.
    #[error("store error: {0}")]
    Store(#[from] std::io::Error),
}
