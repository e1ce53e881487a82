//! Core types for the paper-broker service.
//!
//! This crate provides the shared data types used across the service,
//! including fixed-point monetary values, quotes, and persisted accounts.

use derive_more::{Add, AddAssign, From, Into, Neg, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::Mul;

// =============================================================================
// Constants
// =============================================================================

/// Fixed-point scale for Price and Cash types.
/// 10,000 = $1.00, 15,000 = $1.50, 100 = $0.01
pub const PRICE_SCALE: i64 = 10_000;

// =============================================================================
// Symbol Type
// =============================================================================

/// Stock ticker symbol (e.g., "AAPL", "GOOGL").
pub type Symbol = String;

// =============================================================================
// Quantity Type (Newtype for shares)
// =============================================================================

/// Number of shares (newtype for type safety).
///
/// Serializes transparently as the inner integer, so holdings render
/// as `{"AAPL": 3}` in JSON payloads and store documents.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Sum,
    From,
    Into,
)]
pub struct Quantity(pub u64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    /// Get raw value.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Check if zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Saturating subtraction.
    #[inline]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Quantity(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Qty({})", self.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Allow `quantity == 50` comparisons
impl PartialEq<u64> for Quantity {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

// =============================================================================
// Fixed-Point Monetary Types
// =============================================================================

/// Fixed-point price with 4 decimal places.
///
/// # Examples
/// - `Price(10000)` = $1.00
/// - `Price(15000)` = $1.50
/// - `Price(100)` = $0.01
/// - `Price(1)` = $0.0001
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    Sub,
    Neg,
    AddAssign,
    SubAssign,
    From,
    Into,
)]
pub struct Price(pub i64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Create a Price from a floating-point value.
    #[inline]
    pub fn from_float(v: f64) -> Self {
        Self((v * PRICE_SCALE as f64).round() as i64)
    }

    /// Convert to floating-point for display/wire payloads.
    #[inline]
    pub fn to_float(self) -> f64 {
        self.0 as f64 / PRICE_SCALE as f64
    }

    /// Raw internal value.
    #[inline]
    pub fn raw(self) -> i64 {
        self.0
    }

    /// Check if price is positive.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Debug for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price(${:.4})", self.to_float())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.4}", self.to_float())
    }
}

/// Fixed-point cash/money with 4 decimal places.
///
/// Semantically identical to Price but represents account balances.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    Sub,
    Neg,
    AddAssign,
    SubAssign,
    From,
    Into,
)]
pub struct Cash(pub i64);

impl Cash {
    pub const ZERO: Cash = Cash(0);

    /// Create Cash from a floating-point value.
    #[inline]
    pub fn from_float(v: f64) -> Self {
        Self((v * PRICE_SCALE as f64).round() as i64)
    }

    /// Convert to floating-point for display/wire payloads.
    #[inline]
    pub fn to_float(self) -> f64 {
        self.0 as f64 / PRICE_SCALE as f64
    }

    /// Raw internal value.
    #[inline]
    pub fn raw(self) -> i64 {
        self.0
    }

    /// Check if cash is positive.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Check if cash is negative.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Debug for Cash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cash(${:.4})", self.to_float())
    }
}

impl fmt::Display for Cash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.4}", self.to_float())
    }
}

// =============================================================================
// Price-Quantity Operations
// =============================================================================

impl Mul<Quantity> for Price {
    type Output = Cash;

    /// Multiply price by quantity to get total cash value.
    ///
    /// Plain `i64` arithmetic; callers handling untrusted quantities must
    /// use [`Price::checked_mul`] instead.
    fn mul(self, qty: Quantity) -> Cash {
        Cash(self.0 * qty.0 as i64)
    }
}

impl Price {
    /// Total cash for `qty` shares, or `None` when the product does not
    /// fit in the scaled `i64` range.
    ///
    /// Quantities come off the wire as arbitrary `u64`s, so the trade path
    /// settles through this rather than the `*` operator.
    pub fn checked_mul(self, qty: Quantity) -> Option<Cash> {
        let qty = i64::try_from(qty.0).ok()?;
        self.0.checked_mul(qty).map(Cash)
    }
}

// =============================================================================
// Quote Types
// =============================================================================

/// The current quoted price for a symbol, as held on the quote board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol being quoted.
    pub symbol: Symbol,
    /// Last published price.
    pub price: Price,
}

impl Quote {
    /// Create a new quote.
    pub fn new(symbol: impl Into<Symbol>, price: Price) -> Self {
        Self {
            symbol: symbol.into(),
            price,
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.symbol, self.price)
    }
}

// =============================================================================
// Account Types
// =============================================================================

/// Shares held per symbol.
///
/// Entries are kept once created, even at zero shares, so a client that
/// bought and sold back to flat still sees `{"AAPL": 0}`.
pub type Holdings = HashMap<Symbol, Quantity>;

/// A persisted trading account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique login name.
    pub username: String,
    /// Salted password digest (hex). Empty for the anonymous account.
    pub password_hash: String,
    /// Per-account salt (hex).
    pub salt: String,
    /// Available cash.
    pub balance: Cash,
    /// Shares held per symbol.
    pub holdings: Holdings,
}

impl Account {
    /// Create a fresh account with no credentials and no positions.
    pub fn new(username: impl Into<String>, starting_balance: Cash) -> Self {
        Self {
            username: username.into(),
            password_hash: String::new(),
            salt: String::new(),
            balance: starting_balance,
            holdings: Holdings::new(),
        }
    }

    /// Attach login credentials.
    pub fn with_credentials(mut self, password_hash: impl Into<String>, salt: impl Into<String>) -> Self {
        self.password_hash = password_hash.into();
        self.salt = salt.into();
        self
    }

    /// Shares held for a symbol (zero when the symbol was never traded).
    pub fn holding(&self, symbol: &str) -> Quantity {
        self.holdings.get(symbol).copied().unwrap_or(Quantity::ZERO)
    }
}

// =============================================================================
// Tests
// =============================================================================
