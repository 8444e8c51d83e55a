use std::{fmt, iter::Sum, ops::Add};

use crate::{EngineError, ResultEngine};

const SCALE: i64 = 100;

/// Signed transaction amount represented as **integer hundredths**.
///
/// Amounts are persisted with two fractional digits, so sums over a whole
/// subtree are exact and do not depend on the order descendants are visited.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::from_f64(12.34).unwrap();
/// assert_eq!(amount.hundredths(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Extra fractional digits are rounded half away from zero:
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!(Amount::from_f64(12.345).unwrap().hundredths(), 1235);
/// assert_eq!(Amount::from_f64(0.001).unwrap(), Amount::ZERO);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates a new amount from integer hundredths.
    #[must_use]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    /// Creates an amount from whole units, saturating at the `i64` bounds.
    #[must_use]
    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(SCALE))
    }

    /// Returns the raw value in hundredths.
    #[must_use]
    pub const fn hundredths(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is strictly greater than zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Converts a decimal number received from a client.
    ///
    /// The value is rounded to hundredths, half away from zero, on its
    /// shortest decimal form, so `12.345` becomes `12.35` even though its
    /// binary value sits just below. NaN, infinities and values outside `i64`
    /// hundredths are rejected.
    pub fn from_f64(value: f64) -> ResultEngine<Self> {
        if !value.is_finite() {
            return Err(EngineError::InvalidData(
                "amount must be a finite number".to_string(),
            ));
        }

        let text = value.abs().to_string();
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
        let mut digits = fraction.bytes().map(|digit| i128::from(digit - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let cents = digits.next().unwrap_or(0);
        let round_up = digits.next().is_some_and(|digit| digit >= 5);

        let too_large = || EngineError::InvalidData("amount too large".to_string());
        let whole: i128 = whole.parse().map_err(|_| too_large())?;
        let hundredths = whole
            .checked_mul(i128::from(SCALE))
            .map(|scaled| scaled + tenths * 10 + cents + i128::from(round_up))
            .ok_or_else(too_large)?;
        let signed = if value.is_sign_negative() {
            -hundredths
        } else {
            hundredths
        };

        i64::try_from(signed).map(Self).map_err(|_| too_large())
    }

    /// Lossy conversion for JSON rendering.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / SCALE as u64;
        let fraction = abs % SCALE as u64;
        write!(f, "{sign}{units}.{fraction:02}")
    }
}

/// Sum of many amounts.
///
/// Wide enough that adding any realistic number of `Amount`s cannot
/// overflow, so a subtree sum always has a value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Total(i128);

impl Total {
    pub const ZERO: Total = Total(0);

    #[must_use]
    pub const fn hundredths(self) -> i128 {
        self.0
    }

    /// Lossy conversion for JSON rendering.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }
}

impl From<Amount> for Total {
    fn from(value: Amount) -> Self {
        Self(i128::from(value.0))
    }
}

impl Add<Amount> for Total {
    type Output = Total;

    fn add(self, rhs: Amount) -> Total {
        Total(self.0.saturating_add(i128::from(rhs.0)))
    }
}

impl Sum<Amount> for Total {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Total::ZERO, |total, amount| total + amount)
    }
}

impl PartialEq<Amount> for Total {
    fn eq(&self, other: &Amount) -> bool {
        self.0 == i128::from(other.0)
    }
}

impl fmt::Display for Total {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / SCALE as u128;
        let fraction = abs % SCALE as u128;
        write!(f, "{sign}{units}.{fraction:02}")
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}
