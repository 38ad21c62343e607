//! Campaign Pricing
//!
//! Prices a bundle of influencer deliverables against each seller's rate card, applying tiered
//! package discounts and threshold volume discounts, and clamping every seller's cost to their
//! minimum booking value.

pub mod bundle;
pub mod config;
pub mod deliverables;
pub mod discounts;
pub mod fixtures;
pub mod observability;
pub mod prelude;
pub mod pricing;
pub mod quote;
pub mod sellers;
