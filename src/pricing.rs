//! Pricing
//!
//! The pricing engine. For every seller it totals the requested deliverables against the
//! seller's rate card, applies the package discount, then the volume discount on what remains,
//! and finally clamps the result to the seller's minimum booking value.

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

use crate::{
    deliverables::{DeliverableKind, DeliverableRequest, post_units},
    discounts::{DiscountError, PackageTier, discount_on},
    sellers::SellerPricing,
};

/// Errors that can occur while pricing a bundle.
#[derive(Debug, Error)]
pub enum PricingError {
    /// A seller's rate card holds a value the engine refuses to price with.
    #[error("invalid pricing for seller {seller}: {reason}")]
    InvalidInput {
        /// Seller name
        seller: String,
        /// What was wrong
        reason: String,
    },

    /// A rate card amount is not in the seller's currency.
    #[error("seller {seller} prices in {expected}, but found an amount in {found}")]
    CurrencyMismatch {
        /// Seller name
        seller: String,
        /// The seller's currency
        expected: &'static str,
        /// The offending amount's currency
        found: &'static str,
    },

    /// Minor unit arithmetic overflowed.
    #[error("cost for seller {0} overflowed")]
    Overflow(String),

    /// Errors bubbled up from discount calculation.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Discount toggles for a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingOptions {
    /// Apply package (post-count tier) discounts.
    pub apply_package_discounts: bool,

    /// Apply volume (spend threshold) discounts.
    pub apply_volume_discounts: bool,
}

impl PricingOptions {
    /// Options with both discount policies disabled.
    pub const fn without_discounts() -> Self {
        Self {
            apply_package_discounts: false,
            apply_volume_discounts: false,
        }
    }

    /// Toggle package discounts.
    #[must_use]
    pub const fn with_package_discounts(mut self, enabled: bool) -> Self {
        self.apply_package_discounts = enabled;
        self
    }

    /// Toggle volume discounts.
    #[must_use]
    pub const fn with_volume_discounts(mut self, enabled: bool) -> Self {
        self.apply_volume_discounts = enabled;
        self
    }
}

impl Default for PricingOptions {
    fn default() -> Self {
        Self {
            apply_package_discounts: true,
            apply_volume_discounts: true,
        }
    }
}

/// One priced request in a seller's breakdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineItem<'a> {
    /// Deliverable kind
    pub kind: DeliverableKind,

    /// Requested quantity
    pub quantity: u32,

    /// Price per unit from the rate card
    pub unit_price: Money<'a, Currency>,

    /// `unit_price` multiplied by `quantity`
    pub line_total: Money<'a, Currency>,
}

/// The priced outcome for one seller.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult<'a> {
    seller_idx: usize,
    lines: SmallVec<[LineItem<'a>; 7]>,
    base_cost: Money<'a, Currency>,
    package_tier: Option<PackageTier>,
    package_discount: Money<'a, Currency>,
    volume_discount: Money<'a, Currency>,
    final_cost: Money<'a, Currency>,
    floored: bool,
}

impl<'a> CalculationResult<'a> {
    /// Index of the seller in the slice passed to [`PricingEngine::calculate`].
    pub fn seller_idx(&self) -> usize {
        self.seller_idx
    }

    /// Line items, one per bundle request, in bundle order.
    pub fn lines(&self) -> &[LineItem<'a>] {
        &self.lines
    }

    /// Sum of all line totals.
    pub fn base_cost(&self) -> Money<'a, Currency> {
        self.base_cost
    }

    /// The package tier that was applied, if any.
    pub fn package_tier(&self) -> Option<PackageTier> {
        self.package_tier
    }

    /// Package discount as computed, before the minimum floor.
    pub fn package_discount(&self) -> Money<'a, Currency> {
        self.package_discount
    }

    /// Volume discount as computed, before the minimum floor.
    pub fn volume_discount(&self) -> Money<'a, Currency> {
        self.volume_discount
    }

    /// Amount payable.
    pub fn final_cost(&self) -> Money<'a, Currency> {
        self.final_cost
    }

    /// Whether the seller's minimum value replaced the discounted cost.
    pub fn is_floored(&self) -> bool {
        self.floored
    }

    /// What the buyer actually saves against the base cost, never below zero.
    ///
    /// Unlike the reported discount amounts this accounts for the minimum floor.
    pub fn savings(&self) -> Money<'a, Currency> {
        let saved = self.base_cost.to_minor_units() - self.final_cost.to_minor_units();

        Money::from_minor(saved.max(0), self.final_cost.currency())
    }

    /// Currency of every amount in the result.
    pub fn currency(&self) -> &'a Currency {
        self.final_cost.currency()
    }
}

/// Stateless calculator for seller costs against a shared bundle.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingEngine;

impl PricingEngine {
    /// Price `bundle` for every seller.
    ///
    /// Results are returned in seller order. No sellers produce no results, and an empty bundle
    /// prices every seller at their minimum value.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a seller's rate card fails [`SellerPricing::validate`] or
    /// the arithmetic overflows.
    #[tracing::instrument(
        name = "pricing.calculate",
        skip_all,
        fields(sellers = sellers.len(), requests = bundle.len())
    )]
    pub fn calculate<'a>(
        sellers: &[SellerPricing<'a>],
        bundle: &[DeliverableRequest],
        options: PricingOptions,
    ) -> Result<Vec<CalculationResult<'a>>, PricingError> {
        sellers
            .iter()
            .enumerate()
            .map(|(seller_idx, seller)| Self::calculate_seller(seller_idx, seller, bundle, options))
            .collect()
    }

    /// Price `bundle` for a single seller.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the seller's rate card fails validation or the arithmetic
    /// overflows.
    pub fn calculate_seller<'a>(
        seller_idx: usize,
        seller: &SellerPricing<'a>,
        bundle: &[DeliverableRequest],
        options: PricingOptions,
    ) -> Result<CalculationResult<'a>, PricingError> {
        seller.validate()?;

        let currency = seller.currency();
        let overflow = || PricingError::Overflow(seller.name().to_string());

        let mut lines: SmallVec<[LineItem<'a>; 7]> = SmallVec::with_capacity(bundle.len());
        let mut base_minor: i64 = 0;

        for request in bundle {
            let unit_price = seller.unit_price(request.kind());
            let line_minor = unit_price
                .to_minor_units()
                .checked_mul(i64::from(request.quantity()))
                .ok_or_else(overflow)?;

            base_minor = base_minor.checked_add(line_minor).ok_or_else(overflow)?;

            lines.push(LineItem {
                kind: request.kind(),
                quantity: request.quantity(),
                unit_price,
                line_total: Money::from_minor(line_minor, currency),
            });
        }

        let base_cost = Money::from_minor(base_minor, currency);
        let zero = Money::from_minor(0, currency);

        let package = if options.apply_package_discounts {
            seller
                .package_discounts()
                .and_then(|discounts| discounts.select(post_units(bundle)))
        } else {
            None
        };

        let package_discount = match package {
            Some((_, percent)) => discount_on(&base_cost, percent)?,
            None => zero,
        };

        let after_package = base_cost.sub(package_discount)?;

        let volume_discount = match seller.volume_discount() {
            Some(discount) if options.apply_volume_discounts && discount.qualifies(&base_cost) => {
                discount_on(&after_package, discount.percent())?
            }
            _ => zero,
        };

        let discounted = after_package.sub(volume_discount)?;
        let minimum = seller.minimum_value();
        let floored = discounted.to_minor_units() < minimum.to_minor_units();
        let final_cost = if floored { minimum } else { discounted };

        debug!(
            seller = seller.name(),
            base = base_minor,
            package_tier = ?package.map(|(tier, _)| tier),
            package_discount = package_discount.to_minor_units(),
            volume_discount = volume_discount.to_minor_units(),
            final_cost = final_cost.to_minor_units(),
            floored,
            "priced seller"
        );

        Ok(CalculationResult {
            seller_idx,
            lines,
            base_cost,
            package_tier: package.map(|(tier, _)| tier),
            package_discount,
            volume_discount,
            final_cost,
            floored,
        })
    }
}
