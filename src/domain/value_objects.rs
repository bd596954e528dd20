//! Value Objects for E-commerce

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self { amount, currency: currency.to_string() }
    }
    pub fn zero(currency: &str) -> Self { Self::new(Decimal::ZERO, currency) }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }

    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency { return Err(MoneyError::CurrencyMismatch); }
        Ok(Money::new(self.amount + other.amount, &self.currency))
    }

    pub fn multiply(&self, qty: u32) -> Money {
        Money::new(self.amount * Decimal::from(qty), &self.currency)
    }

    /// Price after a percentage reduction, rounded to cents.
    pub fn percent_off(&self, rate: Percent) -> Money {
        let keep = Decimal::from(100 - u32::from(rate.value()));
        Money::new((self.amount * keep / Decimal::from(100u32)).round_dp(2), &self.currency)
    }
}

impl Default for Money {
    fn default() -> Self { Self::zero("USD") }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[derive(Debug, Clone)]
pub enum MoneyError { CurrencyMismatch }
impl std::error::Error for MoneyError {}
impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Currency mismatch") }
}

/// Quantity value object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Self { Self(value) }
    pub fn value(&self) -> u32 { self.0 }
    pub fn add(&self, other: u32) -> Self { Self(self.0.saturating_add(other)) }
    pub fn subtract(&self, other: u32) -> Option<Self> {
        if other > self.0 { None } else { Some(Self(self.0 - other)) }
    }
    pub fn is_zero(&self) -> bool { self.0 == 0 }
}

impl Default for Quantity {
    fn default() -> Self { Self(0) }
}

/// Percentage in the closed range 0..=100, used for discount rates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percent(u8);

impl Percent {
    pub fn new(value: u8) -> Result<Self, PercentError> {
        if value > 100 { return Err(PercentError::OutOfRange); }
        Ok(Self(value))
    }
    pub fn value(&self) -> u8 { self.0 }
}

impl TryFrom<u8> for Percent {
    type Error = PercentError;
    fn try_from(value: u8) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Percent> for u8 {
    fn from(p: Percent) -> u8 { p.0 }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}%", self.0) }
}

#[derive(Debug, Clone)]
pub enum PercentError { OutOfRange }
impl std::error::Error for PercentError {}
impl fmt::Display for PercentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "percentage must be between 0 and 100")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_add() {
        let a = Money::new(Decimal::new(100, 0), "USD");
        let b = Money::new(Decimal::new(50, 0), "USD");
        assert_eq!(a.add(&b).unwrap().amount(), Decimal::new(150, 0));
    }

    #[test]
    fn test_money_add_rejects_currency_mismatch() {
        let a = Money::new(Decimal::new(100, 0), "USD");
        let b = Money::new(Decimal::new(50, 0), "NGN");
        assert!(a.add(&b).is_err());
    }

    #[test]
    fn test_money_percent_off() {
        let price = Money::new(Decimal::new(100, 0), "USD");
        let reduced = price.percent_off(Percent::new(20).unwrap());
        assert_eq!(reduced.amount(), Decimal::new(80, 0));
    }

    #[test]
    fn test_percent_off_rounds_to_cents() {
        let price = Money::new(Decimal::new(999, 2), "USD"); // 9.99
        let reduced = price.percent_off(Percent::new(33).unwrap());
        assert_eq!(reduced.amount(), Decimal::new(669, 2)); // 6.6933 -> 6.69
    }

    #[test]
    fn test_quantity_subtract_floors() {
        let q = Quantity::new(3);
        assert_eq!(q.subtract(2).unwrap().value(), 1);
        assert!(q.subtract(4).is_none());
    }

    #[test]
    fn test_percent_bounds() {
        assert!(Percent::new(100).is_ok());
        assert!(Percent::new(101).is_err());
    }
}
