//! Seller Fixtures

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    deliverables::DeliverableKind,
    discounts::{PackageDiscounts, PackageTier, VolumeDiscount},
    fixtures::FixtureError,
    sellers::SellerPricing,
};

/// Wrapper for sellers in YAML
#[derive(Debug, Deserialize)]
pub struct SellersFixture {
    /// Sellers, in quote order
    pub sellers: Vec<SellerFixture>,
}

/// Seller Fixture
#[derive(Debug, Deserialize)]
pub struct SellerFixture {
    /// Seller name
    pub name: String,

    /// ISO currency code every amount must use (e.g., "USD")
    pub currency: String,

    /// Deliverable kind -> price string (e.g., "500.00 USD")
    #[serde(default)]
    pub unit_prices: FxHashMap<DeliverableKind, String>,

    /// Post count tier (3, 5 or 10) -> percentage string (e.g., "10%")
    #[serde(default)]
    pub package_discounts: Option<FxHashMap<u32, String>>,

    /// Spend threshold discount
    #[serde(default)]
    pub volume_discount: Option<VolumeDiscountFixture>,

    /// Minimum booking value (e.g., "1000.00 USD")
    #[serde(default)]
    pub minimum_value: Option<String>,
}

/// Volume discount fixture
#[derive(Debug, Deserialize)]
pub struct VolumeDiscountFixture {
    /// Spend threshold (e.g., "5000.00 USD")
    pub threshold: String,

    /// Discount percentage (e.g., "10%")
    pub percent: String,
}

impl TryFrom<SellerFixture> for SellerPricing<'static> {
    type Error = FixtureError;

    fn try_from(fixture: SellerFixture) -> Result<Self, Self::Error> {
        let currency = parse_currency(&fixture.currency)?;
        let money = |s: &str| parse_money(s, currency);

        let mut seller = SellerPricing::new(fixture.name, currency);

        for (kind, price) in &fixture.unit_prices {
            seller = seller.with_unit_price(*kind, money(price)?);
        }

        if let Some(tiers) = &fixture.package_discounts {
            let mut discounts = PackageDiscounts::new();

            for (threshold, percent) in tiers {
                let tier = PackageTier::try_from(*threshold)
                    .map_err(|_err| FixtureError::InvalidPackageTier(*threshold))?;

                discounts = discounts.with_tier(tier, parse_percentage(percent)?);
            }

            seller = seller.with_package_discounts(discounts);
        }

        if let Some(volume) = &fixture.volume_discount {
            seller = seller.with_volume_discount(VolumeDiscount::new(
                money(&volume.threshold)?,
                parse_percentage(&volume.percent)?,
            ));
        }

        if let Some(minimum) = &fixture.minimum_value {
            seller = seller.with_minimum_value(money(minimum)?);
        }

        Ok(seller)
    }
}

/// Parse a price string in the expected currency.
fn parse_money(s: &str, expected: &'static Currency) -> Result<Money<'static, Currency>, FixtureError> {
    let (minor_units, currency) = parse_price(s)?;

    if currency != expected {
        return Err(FixtureError::CurrencyMismatch(
            expected.iso_alpha_code.to_string(),
            currency.iso_alpha_code.to_string(),
        ));
    }

    Ok(Money::from_minor(minor_units, currency))
}

/// Resolve an ISO currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for codes other than GBP, USD and EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let minor_units = amount
        .parse::<Decimal>()
        .ok()
        .and_then(|value| value.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, parse_currency(code)?))
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a decimal.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let value = if let Some(points) = trimmed.strip_suffix('%') {
        points
            .trim()
            .parse::<Decimal>()
            .ok()
            .and_then(|points| points.checked_div(Decimal::ONE_HUNDRED))
    } else {
        trimmed.parse::<Decimal>().ok()
    };

    value
        .map(Percentage::from)
        .ok_or_else(|| FixtureError::InvalidPercentage(s.to_string()))
}
