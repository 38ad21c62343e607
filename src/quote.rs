//! Quote
//!
//! Totals across every seller in a calculation, and the plain-text quote table printed by the
//! command line tool.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{pricing::CalculationResult, sellers::SellerPricing};

/// Errors that can occur when building or writing a quote.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// A result's currency differs from the quote currency (result index, result currency, quote currency).
    #[error("Result {0} has currency {1}, but quote has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// A result refers to a seller that was not supplied.
    #[error("Missing seller {0}")]
    MissingSeller(usize),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Priced results for every seller in a campaign, in a single currency.
#[derive(Debug, Clone)]
pub struct Quote<'a> {
    results: Vec<CalculationResult<'a>>,
    currency: &'a Currency,
}

impl<'a> Quote<'a> {
    /// Build a quote from calculation results.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::CurrencyMismatch`] if any result is in another currency.
    pub fn new(
        results: Vec<CalculationResult<'a>>,
        currency: &'a Currency,
    ) -> Result<Self, QuoteError> {
        results.iter().enumerate().try_for_each(|(i, result)| {
            let result_currency = result.currency();

            if result_currency == currency {
                Ok(())
            } else {
                Err(QuoteError::CurrencyMismatch(
                    i,
                    result_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        Ok(Self { results, currency })
    }

    /// Per-seller results.
    pub fn results(&self) -> &[CalculationResult<'a>] {
        &self.results
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Total base cost before discounts.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the addition fails.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.sum(CalculationResult::base_cost)
    }

    /// Total of the package and volume discounts as computed.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the addition fails.
    pub fn total_discounts(&self) -> Result<Money<'a, Currency>, MoneyError> {
        let package = self.sum(CalculationResult::package_discount)?;

        package.add(self.sum(CalculationResult::volume_discount)?)
    }

    /// Total payable across all sellers.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the addition fails.
    pub fn total(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.sum(CalculationResult::final_cost)
    }

    /// Savings against the subtotal after minimum floors.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the addition fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.sum(CalculationResult::savings)
    }

    /// Savings as a fraction of the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the addition fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let subtotal_minor = self.subtotal()?.to_minor_units();

        if subtotal_minor == 0 {
            return Ok(Percentage::from(Decimal::ZERO));
        }

        let savings = Decimal::from(self.savings()?.to_minor_units());

        Ok(Percentage::from(savings / Decimal::from(subtotal_minor)))
    }

    fn sum(
        &self,
        amount: impl Fn(&CalculationResult<'a>) -> Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, MoneyError> {
        self.results
            .iter()
            .try_fold(Money::from_minor(0, self.currency), |acc, result| {
                acc.add(amount(result))
            })
    }

    /// Write the quote as a table followed by a totals summary.
    ///
    /// # Errors
    ///
    /// Returns a [`QuoteError`] if a result refers to a seller not in `sellers`, or writing fails.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        sellers: &[SellerPricing<'_>],
    ) -> Result<(), QuoteError> {
        let mut builder = Builder::default();

        builder.push_record([
            "Seller",
            "Deliverables",
            "Base",
            "Package",
            "Volume",
            "Final",
        ]);

        for result in &self.results {
            let seller = sellers
                .get(result.seller_idx())
                .ok_or(QuoteError::MissingSeller(result.seller_idx()))?;

            builder.push_record(result_row(seller, result));
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..6), Alignment::right());

        writeln!(out, "{table}")?;

        write_summary(&mut out, self)?;

        Ok(())
    }
}

fn result_row(seller: &SellerPricing<'_>, result: &CalculationResult<'_>) -> [String; 6] {
    let deliverables = result
        .lines()
        .iter()
        .map(|line| format!("{} x {} @ {}", line.quantity, line.kind, line.unit_price))
        .collect::<Vec<_>>()
        .join("\n");

    let package = match result.package_tier() {
        Some(tier) => format!("-{} ({tier})", result.package_discount()),
        None => String::new(),
    };

    let volume = if result.volume_discount().is_zero() {
        String::new()
    } else {
        format!("-{}", result.volume_discount())
    };

    let final_cost = if result.is_floored() {
        format!("{} (minimum)", result.final_cost())
    } else {
        result.final_cost().to_string()
    };

    [
        seller.name().to_string(),
        deliverables,
        result.base_cost().to_string(),
        package,
        volume,
        final_cost,
    ]
}

fn write_summary(out: &mut impl io::Write, quote: &Quote<'_>) -> Result<(), QuoteError> {
    let savings_points = (quote.savings_percent()? * Decimal::ONE_HUNDRED).round_dp(2);

    let rows = [
        ("Subtotal:", quote.subtotal()?.to_string()),
        ("Discounts:", format!("-{}", quote.total_discounts()?)),
        ("Total:", quote.total()?.to_string()),
        (
            "Savings:",
            format!("({savings_points}%) {}", quote.savings()?),
        ),
    ];

    let value_width = rows
        .iter()
        .map(|(_, value)| value.chars().count())
        .max()
        .unwrap_or(0);

    for (label, value) in rows {
        writeln!(out, "{label:>11}  {value:>value_width$}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, USD};
    use testresult::TestResult;

    use crate::{
        deliverables::{DeliverableKind, DeliverableRequest},
        pricing::{PricingEngine, PricingOptions},
    };

    use super::*;

    fn sellers() -> [SellerPricing<'static>; 2] {
        [
            SellerPricing::new("Ava", USD)
                .with_unit_price(DeliverableKind::Post, Money::from_minor(50_000, USD)),
            SellerPricing::new("Ben", USD)
                .with_unit_price(DeliverableKind::Post, Money::from_minor(20_000, USD))
                .with_minimum_value(Money::from_minor(100_000, USD)),
        ]
    }

    fn bundle() -> [DeliverableRequest; 1] {
        [DeliverableRequest::new(DeliverableKind::Post, 2)]
    }

    #[test]
    fn totals_sum_every_seller() -> TestResult {
        let sellers = sellers();
        let results = PricingEngine::calculate(&sellers, &bundle(), PricingOptions::default())?;
        let quote = Quote::new(results, USD)?;

        assert_eq!(quote.subtotal()?, Money::from_minor(140_000, USD));
        assert_eq!(quote.total()?, Money::from_minor(200_000, USD));
        assert_eq!(quote.total_discounts()?, Money::from_minor(0, USD));
        assert_eq!(quote.savings()?, Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn empty_quote_has_zero_totals() -> TestResult {
        let quote = Quote::new(Vec::new(), USD)?;

        assert_eq!(quote.total()?, Money::from_minor(0, USD));
        assert_eq!(quote.savings_percent()?, Percentage::from(Decimal::ZERO));

        Ok(())
    }

    #[test]
    fn mixed_currencies_are_rejected() -> TestResult {
        let sellers = [SellerPricing::new("Cleo", EUR)
            .with_unit_price(DeliverableKind::Post, Money::from_minor(100, EUR))];
        let results = PricingEngine::calculate(&sellers, &bundle(), PricingOptions::default())?;

        let result = Quote::new(results, USD);

        assert!(matches!(
            result,
            Err(QuoteError::CurrencyMismatch(0, "EUR", "USD"))
        ));

        Ok(())
    }

    #[test]
    fn write_to_lists_sellers_and_totals() -> TestResult {
        let sellers = sellers();
        let results = PricingEngine::calculate(&sellers, &bundle(), PricingOptions::default())?;
        let quote = Quote::new(results, USD)?;

        let mut out = Vec::new();
        quote.write_to(&mut out, &sellers)?;

        let text = String::from_utf8(out)?;

        assert!(text.contains("Ava"), "missing seller row: {text}");
        assert!(text.contains("Ben"), "missing seller row: {text}");
        assert!(text.contains("(minimum)"), "floored seller not marked: {text}");
        assert!(text.contains("Total:"), "missing summary: {text}");

        Ok(())
    }

    #[test]
    fn write_to_requires_every_seller() -> TestResult {
        let sellers = sellers();
        let results = PricingEngine::calculate(&sellers, &bundle(), PricingOptions::default())?;
        let quote = Quote::new(results, USD)?;

        let result = quote.write_to(Vec::new(), sellers.get(..1).unwrap_or(&[]));

        assert!(matches!(result, Err(QuoteError::MissingSeller(1))));

        Ok(())
    }
}
