//! Credit packages and price quotes
//!
//! Prices are computed in wei (10^-18 MON) so discounts never round through
//! floating point.

use serde::Serialize;

/// Price of one credit: 0.001 MON
pub const CREDIT_PRICE_WEI: u128 = 1_000_000_000_000_000;
pub const WEI_PER_MON: u128 = 1_000_000_000_000_000_000;

/// Bounds for a custom purchase amount
pub const MIN_CUSTOM_CREDITS: u64 = 1;
pub const MAX_CUSTOM_CREDITS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditPackage {
    pub credits: u64,
    /// Whole-percent discount off the list price
    pub discount_percent: u8,
    pub popular: bool,
}

pub const PACKAGES: [CreditPackage; 4] = [
    CreditPackage {
        credits: 10,
        discount_percent: 0,
        popular: false,
    },
    CreditPackage {
        credits: 50,
        discount_percent: 5,
        popular: true,
    },
    CreditPackage {
        credits: 100,
        discount_percent: 10,
        popular: false,
    },
    CreditPackage {
        credits: 500,
        discount_percent: 15,
        popular: false,
    },
];

impl CreditPackage {
    /// A user-entered amount, undiscounted
    pub fn custom(credits: u64) -> Option<Self> {
        if !(MIN_CUSTOM_CREDITS..=MAX_CUSTOM_CREDITS).contains(&credits) {
            return None;
        }
        Some(Self {
            credits,
            discount_percent: 0,
            popular: false,
        })
    }

    /// Listed package for this amount, or a custom one
    pub fn for_amount(credits: u64) -> Option<Self> {
        PACKAGES
            .iter()
            .copied()
            .find(|p| p.credits == credits)
            .or_else(|| Self::custom(credits))
    }

    pub fn quote(&self) -> Quote {
        let list = self.credits as u128 * CREDIT_PRICE_WEI;
        let discount = u128::from(self.discount_percent.min(100));
        Quote {
            credits: self.credits,
            discount_percent: self.discount_percent,
            list_price_wei: list,
            price_wei: list * (100 - discount) / 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub credits: u64,
    pub discount_percent: u8,
    #[serde(serialize_with = "as_decimal_string")]
    pub list_price_wei: u128,
    #[serde(serialize_with = "as_decimal_string")]
    pub price_wei: u128,
}

impl Quote {
    /// Display price in MON
    pub fn price_mon(&self) -> f64 {
        self.price_wei as f64 / WEI_PER_MON as f64
    }

    pub fn savings_wei(&self) -> u128 {
        self.list_price_wei - self.price_wei
    }
}

// u128 does not survive a JSON number round trip in most clients
fn as_decimal_string<S: serde::Serializer>(value: &u128, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&value.to_string())
}
