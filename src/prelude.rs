//! Campaign pricing prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bundle::Bundle,
    deliverables::{DeliverableError, DeliverableKind, DeliverableRequest},
    discounts::{DiscountError, PackageDiscounts, PackageTier, VolumeDiscount},
    fixtures::{Fixture, FixtureError},
    pricing::{CalculationResult, LineItem, PricingEngine, PricingError, PricingOptions},
    quote::{Quote, QuoteError},
    sellers::SellerPricing,
};
