//! Expiry urgency.
//!
//! Everything here is relative to a caller-supplied `today`, so the same
//! product list renders identically in tests and in production.

use chrono::NaiveDate;

use crate::types::Product;

/// Whole days from `today` until `expiry`; negative once expired.
#[must_use]
pub fn days_until(expiry: NaiveDate, today: NaiveDate) -> i64 {
    (expiry - today).num_days()
}

/// How a product's expiry is described to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    Expired,
    ExpiresToday,
    ExpiresTomorrow,
    /// Expires in this many days (always >= 2).
    InDays(i64),
}

impl ExpiryStatus {
    #[must_use]
    pub const fn from_days(days: i64) -> Self {
        match days {
            d if d < 0 => Self::Expired,
            0 => Self::ExpiresToday,
            1 => Self::ExpiresTomorrow,
            d => Self::InDays(d),
        }
    }

    /// Label shown on the product card.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Expired => "Scaduto".to_string(),
            Self::ExpiresToday => "Scade oggi".to_string(),
            Self::ExpiresTomorrow => "Scade domani".to_string(),
            Self::InDays(days) => format!("{days} giorni"),
        }
    }
}

/// Colour band of the expiry badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    Expired,
    /// Three days or fewer.
    Critical,
    /// A week or fewer.
    Warning,
    Fresh,
}

impl Urgency {
    #[must_use]
    pub const fn from_days(days: i64) -> Self {
        match days {
            d if d < 0 => Self::Expired,
            d if d <= 3 => Self::Critical,
            d if d <= 7 => Self::Warning,
            _ => Self::Fresh,
        }
    }
}

/// Sort products by ascending days until expiry, expired first.
///
/// The sort is stable: products expiring on the same day keep their
/// relative order.
pub fn sort_by_expiry(products: &mut [Product], today: NaiveDate) {
    products.sort_by_key(|p| p.days_until_expiry(today));
}
