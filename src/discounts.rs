//! Discounts
//!
//! Package tier and volume discount configuration for a seller's rate card, together with the
//! percentage arithmetic both of them share. Percentages are applied to whole minor units and
//! rounded half away from zero.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A package tier threshold other than 3, 5 or 10 was requested.
    #[error("package tier must be 3, 5 or 10 posts, got {0}")]
    UnknownPackageTier(u32),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Post-count tiers for package discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PackageTier {
    /// Three or more post-like deliverables.
    Three,

    /// Five or more post-like deliverables.
    Five,

    /// Ten or more post-like deliverables.
    Ten,
}

impl PackageTier {
    /// All tiers, highest threshold first.
    pub const DESCENDING: [Self; 3] = [Self::Ten, Self::Five, Self::Three];

    /// Minimum number of post-like units needed to reach this tier.
    pub const fn min_post_units(self) -> u64 {
        match self {
            Self::Three => 3,
            Self::Five => 5,
            Self::Ten => 10,
        }
    }
}

impl TryFrom<u32> for PackageTier {
    type Error = DiscountError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(Self::Three),
            5 => Ok(Self::Five),
            10 => Ok(Self::Ten),
            other => Err(DiscountError::UnknownPackageTier(other)),
        }
    }
}

impl fmt::Display for PackageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+ posts", self.min_post_units())
    }
}

/// A seller's package discount table.
///
/// Tiers are kept ordered from the highest threshold to the lowest so that selection is a
/// single scan for the first satisfied tier. Tiers never stack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageDiscounts {
    tiers: SmallVec<[(PackageTier, Percentage); 3]>,
}

impl PackageDiscounts {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the percentage for a tier, replacing any previous value.
    #[must_use]
    pub fn with_tier(mut self, tier: PackageTier, percent: Percentage) -> Self {
        self.tiers.retain(|(existing, _)| *existing != tier);
        self.tiers.push((tier, percent));
        self.tiers.sort_by(|(a, _), (b, _)| b.cmp(a));

        self
    }

    /// The percentage configured for `tier`, if any.
    pub fn percent_for(&self, tier: PackageTier) -> Option<Percentage> {
        self.tiers
            .iter()
            .find(|(existing, _)| *existing == tier)
            .map(|(_, percent)| *percent)
    }

    /// Configured tiers, highest threshold first.
    pub fn tiers(&self) -> impl Iterator<Item = (PackageTier, Percentage)> + '_ {
        self.tiers.iter().copied()
    }

    /// Check if no tier is configured.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Pick the highest configured tier reached by `post_units`.
    pub fn select(&self, post_units: u64) -> Option<(PackageTier, Percentage)> {
        self.tiers()
            .find(|(tier, _)| post_units >= tier.min_post_units())
    }
}

/// Threshold discount on the total spend with a seller.
#[derive(Debug, Clone, Copy)]
pub struct VolumeDiscount<'a> {
    threshold: Money<'a, Currency>,
    percent: Percentage,
}

impl<'a> VolumeDiscount<'a> {
    /// Create a new volume discount.
    pub fn new(threshold: Money<'a, Currency>, percent: Percentage) -> Self {
        Self { threshold, percent }
    }

    /// Spend needed before the discount applies.
    pub fn threshold(&self) -> &Money<'a, Currency> {
        &self.threshold
    }

    /// Discount percentage.
    pub fn percent(&self) -> Percentage {
        self.percent
    }

    /// Whether a raw (pre-discount) base cost reaches the threshold.
    pub fn qualifies(&self, base_cost: &Money<'_, Currency>) -> bool {
        base_cost.to_minor_units() >= self.threshold.to_minor_units()
    }
}

/// The fraction a percentage represents, `0.15` for 15%.
pub fn fraction(percent: Percentage) -> Decimal {
    percent * Decimal::ONE // decimal_percentage doesn't expose the underlying Decimal
}

/// Whether a percentage lies within `0%..=100%`.
pub fn is_valid_percent(percent: Percentage) -> bool {
    let value = fraction(percent);

    value >= Decimal::ZERO && value <= Decimal::ONE
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn percent_of_minor(percent: Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    fraction(percent)
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Calculate the discount amount for a percentage of `amount`, in the same currency.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn discount_on<'a>(
    amount: &Money<'a, Currency>,
    percent: Percentage,
) -> Result<Money<'a, Currency>, DiscountError> {
    let discount_minor = percent_of_minor(percent, amount.to_minor_units())?;

    Ok(Money::from_minor(discount_minor, amount.currency()))
}
