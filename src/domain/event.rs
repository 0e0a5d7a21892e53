use rust_decimal::Decimal;
use serde::Serialize;

/// Emitted exactly once per successful withdrawal, after the balance debit
/// has committed. Consumers use it for downstream bookkeeping such as
/// replenishment scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WithdrawalCompleted {
    /// The settled amount.
    pub amount: Decimal,
}
