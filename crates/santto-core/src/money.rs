//! # Money Module
//!
//! Provides the `Money` type for every price in the ordering flow.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing add-on prices as floats:                                       │
//! │    1.10 + 2.20 = 3.3000000000000003  ❌ WRONG!                          │
//! │                                                                         │
//! │  A burger with 7 add-ons drifts a fraction of a cent per add,           │
//! │  and the WhatsApp total no longer matches what the screen showed.       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    110 + 220 = 330 cents → "R$3.30", every time                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use santto_core::money::Money;
//!
//! let burger = Money::from_cents(1700); // R$17.00
//! let bacon = Money::from_cents(350);   // R$3.50
//!
//! let item = burger + bacon;
//! assert_eq!(item.cents(), 2050);
//! assert_eq!(item.to_string(), "R$20.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::settings::CurrencyFormat;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (the smallest unit of the Brazilian real).
///
/// ## Where Money Flows
/// ```text
/// CatalogEntry.price ──► Selection ──► CompositionState total ──┐
///                                                              ▼
/// CatalogEntry.price ──► simple CartLine ──────────────► CartLine.unit_price
///                                                              │
///                                    Cart.total ◄── × quantity ┘
///                                        │
///                                        ▼
///                              "*Total:* R$29.00"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use santto_core::money::Money;
    ///
    /// let price = Money::from_cents(600); // R$6.00
    /// assert_eq!(price.cents(), 600);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses a decimal amount such as `"17.00"`, `"3.5"` or `"8"`.
    ///
    /// Catalog files written by hand carry prices as decimals. Anything past
    /// the second decimal place is rounded half-up (away from zero).
    ///
    /// ```rust
    /// use santto_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("17.00").unwrap().cents(), 1700);
    /// assert_eq!(Money::parse_decimal("3.5").unwrap().cents(), 350);
    /// assert_eq!(Money::parse_decimal("2.345").unwrap().cents(), 235);
    /// assert!(Money::parse_decimal("abc").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("'{}' is not a decimal amount", input),
        };

        let text = input.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        let mut frac_digits = frac.bytes().map(|b| i64::from(b - b'0'));
        let tenths = frac_digits.next().unwrap_or(0);
        let hundredths = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().is_some_and(|digit| digit >= 5);

        let mut cents = whole_value
            .checked_mul(100)
            .and_then(|c| c.checked_add(tenths * 10 + hundredths))
            .ok_or_else(invalid)?;
        if round_up {
            cents += 1;
        }

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole reais portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Renders the amount with the given currency convention.
    ///
    /// Always exactly two decimal places.
    ///
    /// ```rust
    /// use santto_core::money::Money;
    /// use santto_core::settings::CurrencyFormat;
    ///
    /// let brl = CurrencyFormat::default();
    /// assert_eq!(Money::from_cents(2900).format_with(&brl), "R$29.00");
    ///
    /// let comma = CurrencyFormat { symbol: "R$ ".to_string(), decimal_separator: ",".to_string() };
    /// assert_eq!(Money::from_cents(2900).format_with(&comma), "R$ 29,00");
    /// ```
    pub fn format_with(&self, currency: &CurrencyFormat) -> String {
        format!(
            "{}{}{}{}{:02}",
            if self.0 < 0 { "-" } else { "" },
            currency.symbol,
            self.major().abs(),
            currency.decimal_separator,
            self.minor()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rendering with the default real convention.
///
/// Order text goes through [`Money::format_with`] so the configured
/// currency convention applies.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(&CurrencyFormat::default()))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a line quantity.
///
/// ```rust
/// use santto_core::money::Money;
///
/// let coke = Money::from_cents(600);
/// assert_eq!((coke * 3).cents(), 1800);
/// ```
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
