//! Sellers

use decimal_percentage::Percentage;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    deliverables::{DeliverableKind, DeliverableRequest},
    discounts::{PackageDiscounts, VolumeDiscount, is_valid_percent},
    pricing::PricingError,
};

/// A seller's rate card and discount policy.
#[derive(Debug, Clone)]
pub struct SellerPricing<'a> {
    name: String,
    currency: &'static Currency,
    unit_prices: FxHashMap<DeliverableKind, Money<'a, Currency>>,
    package_discounts: Option<PackageDiscounts>,
    volume_discount: Option<VolumeDiscount<'a>>,
    minimum_value: Option<Money<'a, Currency>>,
}

impl<'a> SellerPricing<'a> {
    /// Create a rate card with no prices, no discounts and no minimum.
    pub fn new(name: impl Into<String>, currency: &'static Currency) -> Self {
        Self {
            name: name.into(),
            currency,
            unit_prices: FxHashMap::default(),
            package_discounts: None,
            volume_discount: None,
            minimum_value: None,
        }
    }

    /// Set the unit price for a deliverable kind.
    #[must_use]
    pub fn with_unit_price(mut self, kind: DeliverableKind, price: Money<'a, Currency>) -> Self {
        self.unit_prices.insert(kind, price);
        self
    }

    /// Set the package discount table.
    #[must_use]
    pub fn with_package_discounts(mut self, discounts: PackageDiscounts) -> Self {
        self.package_discounts = Some(discounts);
        self
    }

    /// Set the volume discount.
    #[must_use]
    pub fn with_volume_discount(mut self, discount: VolumeDiscount<'a>) -> Self {
        self.volume_discount = Some(discount);
        self
    }

    /// Set the minimum booking value.
    #[must_use]
    pub fn with_minimum_value(mut self, minimum: Money<'a, Currency>) -> Self {
        self.minimum_value = Some(minimum);
        self
    }

    /// Seller display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Currency of every amount on the rate card.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Unit price for `kind`. Kinds missing from the rate card cost nothing.
    pub fn unit_price(&self, kind: DeliverableKind) -> Money<'a, Currency> {
        self.unit_prices
            .get(&kind)
            .copied()
            .unwrap_or_else(|| Money::from_minor(0, self.currency))
    }

    /// Whether the rate card lists a price for `kind`.
    pub fn prices(&self, kind: DeliverableKind) -> bool {
        self.unit_prices.contains_key(&kind)
    }

    /// Package discount table, if configured.
    pub fn package_discounts(&self) -> Option<&PackageDiscounts> {
        self.package_discounts.as_ref()
    }

    /// Volume discount, if configured.
    pub fn volume_discount(&self) -> Option<&VolumeDiscount<'a>> {
        self.volume_discount.as_ref()
    }

    /// Minimum booking value. Zero when none is configured.
    pub fn minimum_value(&self) -> Money<'a, Currency> {
        self.minimum_value
            .unwrap_or_else(|| Money::from_minor(0, self.currency))
    }

    /// Kinds requested in `bundle` that this rate card has no price for.
    ///
    /// The engine prices these at zero; callers that want to refuse such quotes can check here first.
    pub fn unpriced_kinds(&self, bundle: &[DeliverableRequest]) -> SmallVec<[DeliverableKind; 7]> {
        let mut missing: SmallVec<[DeliverableKind; 7]> = SmallVec::new();

        for request in bundle {
            let kind = request.kind();

            if !self.prices(kind) && !missing.contains(&kind) {
                missing.push(kind);
            }
        }

        missing
    }

    /// Check that every amount is non-negative and in the seller's currency, and every
    /// percentage lies within `0%..=100%`.
    ///
    /// # Errors
    ///
    /// - [`PricingError::CurrencyMismatch`]: an amount is in another currency.
    /// - [`PricingError::InvalidInput`]: a negative amount or out of range percentage.
    pub fn validate(&self) -> Result<(), PricingError> {
        let mut kinds: SmallVec<[DeliverableKind; 7]> = self.unit_prices.keys().copied().collect();
        kinds.sort_unstable();

        for kind in kinds {
            let price = self.unit_price(kind);

            self.check_amount(&price, || format!("unit price for {kind}"))?;
        }

        if let Some(discounts) = &self.package_discounts {
            for (tier, percent) in discounts.tiers() {
                self.check_percent(percent, || format!("package discount for {tier}"))?;
            }
        }

        if let Some(discount) = &self.volume_discount {
            self.check_amount(discount.threshold(), || {
                "volume discount threshold".to_string()
            })?;
            self.check_percent(discount.percent(), || "volume discount".to_string())?;
        }

        if let Some(minimum) = &self.minimum_value {
            self.check_amount(minimum, || "minimum value".to_string())?;
        }

        Ok(())
    }

    fn check_amount(
        &self,
        amount: &Money<'_, Currency>,
        field: impl FnOnce() -> String,
    ) -> Result<(), PricingError> {
        if amount.currency() != self.currency {
            return Err(PricingError::CurrencyMismatch {
                seller: self.name.clone(),
                expected: self.currency.iso_alpha_code,
                found: amount.currency().iso_alpha_code,
            });
        }

        if amount.to_minor_units() < 0 {
            return Err(PricingError::InvalidInput {
                seller: self.name.clone(),
                reason: format!("{} is negative ({amount})", field()),
            });
        }

        Ok(())
    }

    fn check_percent(
        &self,
        percent: Percentage,
        field: impl FnOnce() -> String,
    ) -> Result<(), PricingError> {
        if is_valid_percent(percent) {
            return Ok(());
        }

        Err(PricingError::InvalidInput {
            seller: self.name.clone(),
            reason: format!("{} must be between 0% and 100%", field()),
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, USD};
    use testresult::TestResult;

    use crate::discounts::PackageTier;

    use super::*;

    fn seller() -> SellerPricing<'static> {
        SellerPricing::new("Ava", USD)
            .with_unit_price(DeliverableKind::Post, Money::from_minor(50_000, USD))
            .with_unit_price(DeliverableKind::Reel, Money::from_minor(75_000, USD))
    }

    #[test]
    fn unlisted_kind_is_priced_at_zero() {
        let seller = seller();

        assert_eq!(
            seller.unit_price(DeliverableKind::Igtv),
            Money::from_minor(0, USD)
        );
        assert!(!seller.prices(DeliverableKind::Igtv));
    }

    #[test]
    fn missing_minimum_is_zero() {
        assert_eq!(seller().minimum_value(), Money::from_minor(0, USD));
    }

    #[test]
    fn unpriced_kinds_lists_each_missing_kind_once() {
        let bundle = [
            DeliverableRequest::new(DeliverableKind::Post, 1),
            DeliverableRequest::new(DeliverableKind::Story, 1),
            DeliverableRequest::new(DeliverableKind::Story, 2),
            DeliverableRequest::new(DeliverableKind::Igtv, 1),
        ];

        assert_eq!(
            seller().unpriced_kinds(&bundle).as_slice(),
            [DeliverableKind::Story, DeliverableKind::Igtv]
        );
    }

    #[test]
    fn valid_rate_card_passes() -> TestResult {
        let seller = seller()
            .with_package_discounts(
                PackageDiscounts::new().with_tier(PackageTier::Three, Percentage::from(0.05)),
            )
            .with_volume_discount(VolumeDiscount::new(
                Money::from_minor(100_000, USD),
                Percentage::from(0.1),
            ))
            .with_minimum_value(Money::from_minor(10_000, USD));

        seller.validate()?;

        Ok(())
    }

    #[test]
    fn negative_price_is_rejected() {
        let seller = seller().with_unit_price(DeliverableKind::Story, Money::from_minor(-1, USD));

        assert!(matches!(
            seller.validate(),
            Err(PricingError::InvalidInput { .. })
        ));
    }

    #[test]
    fn out_of_range_percentage_is_rejected() {
        let seller = seller().with_package_discounts(
            PackageDiscounts::new().with_tier(PackageTier::Five, Percentage::from(1.2)),
        );

        assert!(matches!(
            seller.validate(),
            Err(PricingError::InvalidInput { .. })
        ));
    }

    #[test]
    fn foreign_currency_is_rejected() {
        let seller = seller().with_minimum_value(Money::from_minor(100, EUR));

        assert!(matches!(
            seller.validate(),
            Err(PricingError::CurrencyMismatch {
                expected: "USD",
                found: "EUR",
                ..
            })
        ));
    }
}
