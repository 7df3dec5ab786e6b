//! Monetary values.
//!
//! Unit prices are exact decimals and cart totals are summed exactly before
//! being rounded to minor units (cents) once. The persisted cart stores
//! prices as plain JSON numbers in major units, which `Price` converts at
//! the serde boundary.

use std::fmt;
use std::str::FromStr;

use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CartError;

/// Minor units per major unit. Every supported currency uses two decimals.
const MINOR_PER_MAJOR: i64 = 100;

/// Decimal places of a minor unit.
const MINOR_DIGITS: u32 = 2;

/// Most decimal places a price may carry.
const MAX_PRICE_SCALE: u32 = 18;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    BRL,
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// Get the currency symbol (e.g., "R$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BRL => "R$",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
        }
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in minor units (e.g., cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Whole major units, truncated toward zero.
    pub fn major(&self) -> i64 {
        self.amount_cents / MINOR_PER_MAJOR
    }

    /// Remaining minor units, always non-negative.
    pub fn minor(&self) -> i64 {
        (self.amount_cents % MINOR_PER_MAJOR).abs()
    }
}

/// A non-negative unit price, kept as the exact decimal it was given in.
///
/// Carries no currency: a cart is priced in the single currency it is
/// configured with. Prices finer than a cent keep their full precision so
/// a persisted record is written back exactly as it was read; rounding to
/// cents happens only in [`Price::to_money`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Price {
    /// Value is `units / 10^scale`, with `scale` as small as possible.
    units: u128,
    scale: u32,
}

impl Price {
    /// Create a price from minor units.
    pub fn from_cents(cents: u64) -> Self {
        Self::normalized(u128::from(cents), MINOR_DIGITS)
    }

    /// Create a price from a decimal major-unit amount.
    ///
    /// The amount is taken at its shortest decimal representation, so
    /// `12.345` stays `12.345`.
    ///
    /// ```
    /// use market_cart::money::Price;
    /// let price = Price::from_decimal(49.99).unwrap();
    /// assert_eq!(price, Price::from_cents(4999));
    /// ```
    pub fn from_decimal(amount: f64) -> Result<Self, CartError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(CartError::InvalidPrice(amount.to_string()));
        }
        if amount == 0.0 {
            return Ok(Self::default());
        }
        amount.to_string().parse()
    }

    fn normalized(mut units: u128, mut scale: u32) -> Self {
        while scale > 0 && units % 10 == 0 {
            units /= 10;
            scale -= 1;
        }
        Self { units, scale }
    }

    /// Exact price of `quantity` units. `None` on overflow.
    pub fn checked_mul(&self, quantity: u32) -> Option<Price> {
        self.units
            .checked_mul(u128::from(quantity))
            .map(|units| Self::normalized(units, self.scale))
    }

    /// Exact sum of two prices. `None` on overflow.
    pub fn checked_add(&self, other: &Price) -> Option<Price> {
        let scale = self.scale.max(other.scale);
        let lhs = self.units.checked_mul(10u128.pow(scale - self.scale))?;
        let rhs = other.units.checked_mul(10u128.pow(scale - other.scale))?;
        lhs.checked_add(rhs).map(|units| Self::normalized(units, scale))
    }

    /// Price this amount in `currency`, rounding half up to whole minor
    /// units.
    pub fn to_money(&self, currency: Currency) -> Result<Money, CartError> {
        let cents = if self.scale <= MINOR_DIGITS {
            self.units.checked_mul(10u128.pow(MINOR_DIGITS - self.scale))
        } else {
            let divisor = 10u128.pow(self.scale - MINOR_DIGITS);
            let round_up = self.units % divisor >= divisor / 2;
            Some(self.units / divisor + u128::from(round_up))
        };
        let cents = cents
            .and_then(|cents| i64::try_from(cents).ok())
            .ok_or(CartError::Overflow)?;
        Ok(Money::new(cents, currency))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let divisor = 10u128.pow(self.scale);
        let whole = self.units / divisor;
        if self.scale == 0 {
            return write!(f, "{whole}");
        }
        let fraction = self.units % divisor;
        write!(f, "{whole}.{fraction:0width$}", width = self.scale as usize)
    }
}

impl FromStr for Price {
    type Err = CartError;

    /// Parse a plain decimal such as `10`, `10.5` or `12.345`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || CartError::InvalidPrice(text.to_string());
        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));

        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !is_digits(whole) || !is_digits(fraction) {
            return Err(invalid());
        }

        let scale = u32::try_from(fraction.len())
            .ok()
            .filter(|scale| *scale <= MAX_PRICE_SCALE)
            .ok_or_else(invalid)?;
        let units = format!("{whole}{fraction}")
            .parse::<u128>()
            .map_err(|_| invalid())?;
        Ok(Self::normalized(units, scale))
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.scale == 0 {
            if let Ok(whole) = u64::try_from(self.units) {
                return serializer.serialize_u64(whole);
            }
        }
        // The decimal text parses back to the number the price was read from.
        let amount: f64 = self.to_string().parse().map_err(ser::Error::custom)?;
        serializer.serialize_f64(amount)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Price::from_decimal(amount).map_err(de::Error::custom)
    }
}
