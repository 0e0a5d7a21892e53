use crate::error::{AtmError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub, SubAssign};
use uuid::Uuid;

/// Lowest and highest PIN accepted by the engine.
pub const PIN_MIN: u16 = 1000;
pub const PIN_MAX: u16 = 9999;

/// Returns true when `pin` is a 4-digit value.
pub fn is_valid_pin(pin: u16) -> bool {
    (PIN_MIN..=PIN_MAX).contains(&pin)
}

/// A signed monetary value with exact decimal arithmetic.
///
/// Wrapper around `rust_decimal::Decimal` so balances are never mixed up
/// with raw numbers elsewhere in the domain.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

/// A strictly positive monetary amount, as requested at the dispenser.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(AtmError::InvalidInput("amount must be positive".to_string()))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AtmError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// A customer account as read from the account store.
///
/// The engine only ever holds a snapshot: records are created and mutated by
/// the store, and the engine changes balances exclusively through the
/// store's conditional debit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Stable internal identifier, always positive.
    pub account_id: i64,
    /// Opaque external identifier printed on the card.
    pub account_number: Uuid,
    pub account_name: String,
    /// 4-digit credential checked during validation.
    pub pin: u16,
    /// Funds on deposit. May be negative down to `-overdraft_limit`.
    pub balance: Balance,
    pub has_overdraft: bool,
    /// Additional funds available only when `has_overdraft` is set.
    pub overdraft_limit: Balance,
}

impl Account {
    /// Balance available for withdrawal, including the overdraft allowance
    /// when the account has one.
    pub fn withdrawable_balance(&self) -> Balance {
        if self.has_overdraft {
            self.balance + self.overdraft_limit
        } else {
            self.balance
        }
    }
}
