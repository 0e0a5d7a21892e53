use crate::domain::account::Amount;
use crate::error::{AtmError, Result};
use rust_decimal::Decimal;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Guard over the dispenser's pool of physical cash.
///
/// The check-and-decrement in [`CashReserve::reserve`] runs as a single
/// critical section, so concurrent reservations can never jointly push the
/// pool negative. The lock is only ever held for the duration of one
/// arithmetic operation and is never held across an await point.
#[derive(Debug)]
pub struct CashReserve {
    available: Mutex<Decimal>,
}

impl CashReserve {
    /// Creates a reserve holding `initial` cash, which must be positive.
    pub fn new(initial: Decimal) -> Result<Self> {
        if initial <= Decimal::ZERO {
            return Err(AtmError::InvalidInput(
                "initial cash must be positive".to_string(),
            ));
        }
        Ok(Self {
            available: Mutex::new(initial),
        })
    }

    /// Atomically checks and decrements the available cash.
    ///
    /// Fails with [`AtmError::InsufficientCash`] and leaves the pool
    /// unchanged when `amount` exceeds what is available.
    pub fn reserve(&self, amount: Amount) -> Result<()> {
        let mut available = self.lock();
        if amount.value() > *available {
            return Err(AtmError::InsufficientCash);
        }
        *available -= amount.value();
        Ok(())
    }

    /// Returns cash to the pool. Used both for replenishment deliveries and
    /// for the compensating return when settlement aborts after cash was
    /// already reserved.
    pub fn replenish(&self, amount: Decimal) -> Result<()> {
        if amount < Decimal::ZERO {
            return Err(AtmError::InvalidInput(
                "replenish amount must be non-negative".to_string(),
            ));
        }
        *self.lock() += amount;
        Ok(())
    }

    /// Cash currently available to dispense.
    pub fn available(&self) -> Decimal {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, Decimal> {
        self.available.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[test]
    fn test_new_rejects_non_positive_cash() {
        assert!(matches!(
            CashReserve::new(dec!(0)),
            Err(AtmError::InvalidInput(_))
        ));
        assert!(matches!(
            CashReserve::new(dec!(-10)),
            Err(AtmError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_reserve_decrements_available() {
        let reserve = CashReserve::new(dec!(100)).unwrap();
        reserve.reserve(Amount::new(dec!(30)).unwrap()).unwrap();
        assert_eq!(reserve.available(), dec!(70));
    }

    #[test]
    fn test_reserve_insufficient_leaves_pool_unchanged() {
        let reserve = CashReserve::new(dec!(10)).unwrap();
        let result = reserve.reserve(Amount::new(dec!(90)).unwrap());
        assert!(matches!(result, Err(AtmError::InsufficientCash)));
        assert_eq!(reserve.available(), dec!(10));
    }

    #[test]
    fn test_replenish_adds_cash() {
        let reserve = CashReserve::new(dec!(10)).unwrap();
        reserve.replenish(dec!(40)).unwrap();
        assert_eq!(reserve.available(), dec!(50));
        reserve.replenish(dec!(0)).unwrap();
        assert_eq!(reserve.available(), dec!(50));
    }

    #[test]
    fn test_replenish_rejects_negative_amount() {
        let reserve = CashReserve::new(dec!(10)).unwrap();
        assert!(matches!(
            reserve.replenish(dec!(-1)),
            Err(AtmError::InvalidInput(_))
        ));
        assert_eq!(reserve.available(), dec!(10));
    }

    #[test]
    fn test_concurrent_reserves_never_overdraw() {
        let reserve = Arc::new(CashReserve::new(dec!(100)).unwrap());

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let reserve = Arc::clone(&reserve);
                std::thread::spawn(move || reserve.reserve(Amount::new(dec!(30)).unwrap()).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|reserved| *reserved)
            .count() as i64;

        // 10 x 30 would overdraw a pool of 100: only 3 can win.
        assert_eq!(successes, 3);
        assert_eq!(
            reserve.available(),
            dec!(100) - Decimal::from(successes) * dec!(30)
        );
    }

    #[test]
    fn test_replenish_composes_with_concurrent_reserves() {
        let reserve = Arc::new(CashReserve::new(dec!(30)).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let reserve = Arc::clone(&reserve);
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        reserve.replenish(dec!(10)).unwrap();
                        true
                    } else {
                        reserve.reserve(Amount::new(dec!(10)).unwrap()).is_ok()
                    }
                })
            })
            .collect();

        let outcomes: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let reserved = outcomes.iter().skip(1).step_by(2).filter(|ok| **ok).count();

        // 4 replenishments always land; reserved cash never exceeds what
        // was available, and the pool is never negative.
        let expected = dec!(30) + dec!(40) - Decimal::from(reserved as i64) * dec!(10);
        assert_eq!(reserve.available(), expected);
        assert!(reserve.available() >= Decimal::ZERO);
    }
}
