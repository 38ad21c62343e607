//! Fixtures
//!
//! Rate cards and bundles loaded from YAML. A fixture set named `campaign` is read from
//! `<base>/sellers/campaign.yml` and `<base>/bundles/campaign.yml`.

use std::{fs, path::PathBuf};

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    bundle::Bundle,
    fixtures::{bundles::BundleFixture, sellers::SellersFixture},
    sellers::SellerPricing,
};

pub mod bundles;
pub mod sellers;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Package tier other than 3, 5 or 10
    #[error("Invalid package tier: {0}")]
    InvalidPackageTier(u32),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between amounts or sellers
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Seller not found
    #[error("Seller not found: {0}")]
    SellerNotFound(String),

    /// No sellers loaded yet
    #[error("No sellers loaded yet; currency unknown")]
    NoSellers,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded sellers, in file order
    sellers: Vec<SellerPricing<'static>>,

    /// Loaded bundle
    bundle: Bundle,

    /// Currency shared by every loaded seller
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            sellers: Vec::new(),
            bundle: Bundle::new(),
            currency: None,
        }
    }

    /// Load sellers from a YAML fixture file, appending to any already loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if sellers use different currencies.
    pub fn load_sellers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("sellers").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: SellersFixture = serde_norway::from_str(&contents)?;

        for seller_fixture in fixture.sellers {
            let seller = SellerPricing::try_from(seller_fixture)?;
            let currency = seller.currency();

            match self.currency {
                Some(existing) if existing != currency => {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => self.currency = Some(currency),
            }

            self.sellers.push(seller);
        }

        debug!(
            path = %file_path.display(),
            sellers = self.sellers.len(),
            "loaded seller fixtures"
        );

        Ok(self)
    }

    /// Load a bundle from a YAML fixture file, replacing any bundle already loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_bundle(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("bundles").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: BundleFixture = serde_norway::from_str(&contents)?;

        self.bundle = Bundle::from(fixture);

        debug!(
            path = %file_path.display(),
            requests = self.bundle.len(),
            "loaded bundle fixture"
        );

        Ok(self)
    }

    /// Load a complete fixture set (sellers and bundle with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture.load_sellers(name)?.load_bundle(name)?;

        Ok(fixture)
    }

    /// Get a seller by name
    ///
    /// # Errors
    ///
    /// Returns an error if no seller has that name.
    pub fn seller(&self, name: &str) -> Result<&SellerPricing<'static>, FixtureError> {
        self.sellers
            .iter()
            .find(|seller| seller.name() == name)
            .ok_or_else(|| FixtureError::SellerNotFound(name.to_string()))
    }

    /// Get all sellers
    pub fn sellers(&self) -> &[SellerPricing<'static>] {
        &self.sellers
    }

    /// Get the bundle
    pub fn bundle(&self) -> &Bundle {
        &self.bundle
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no sellers have been loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoSellers)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use rusty_money::iso::USD;
    use tempfile::TempDir;
    use testresult::TestResult;

    use crate::deliverables::DeliverableKind;

    use super::*;

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    #[test]
    fn fixture_from_set_loads_sellers_and_bundle() -> TestResult {
        let fixture = Fixture::from_set("campaign")?;

        assert_eq!(fixture.sellers().len(), 3);
        assert_eq!(fixture.bundle().len(), 4);
        assert_eq!(fixture.currency()?, USD);

        Ok(())
    }

    #[test]
    fn fixture_seller_lookup_by_name() -> TestResult {
        let fixture = Fixture::from_set("campaign")?;
        let seller = fixture.seller("Marco Ruiz")?;

        assert!(seller.package_discounts().is_some());
        assert!(seller.volume_discount().is_none());

        assert!(matches!(
            fixture.seller("Nobody"),
            Err(FixtureError::SellerNotFound(_))
        ));

        Ok(())
    }

    #[test]
    fn fixture_no_sellers_has_no_currency() {
        let fixture = Fixture::new();

        assert!(matches!(fixture.currency(), Err(FixtureError::NoSellers)));
    }

    #[test]
    fn fixture_missing_file_is_io_error() -> TestResult {
        let dir = TempDir::new()?;
        let mut fixture = Fixture::with_base_path(dir.path());

        assert!(matches!(
            fixture.load_sellers("missing"),
            Err(FixtureError::Io(_))
        ));

        Ok(())
    }

    #[test]
    fn fixture_rejects_sellers_in_different_currencies() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(
            dir.path(),
            "sellers",
            "mixed",
            r#"
sellers:
  - name: Ava
    currency: USD
    unit_prices:
      post: "500.00 USD"
  - name: Cleo
    currency: EUR
    unit_prices:
      post: "450.00 EUR"
"#,
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        assert!(matches!(
            fixture.load_sellers("mixed"),
            Err(FixtureError::CurrencyMismatch(expected, found)) if expected == "USD" && found == "EUR"
        ));

        Ok(())
    }

    #[test]
    fn fixture_bundle_replaces_previous_bundle() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(
            dir.path(),
            "bundles",
            "first",
            "deliverables:\n  - type: post\n    quantity: 2\n",
        )?;
        write_fixture(
            dir.path(),
            "bundles",
            "second",
            "deliverables:\n  - type: igtv\n    quantity: 1\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_bundle("first")?.load_bundle("second")?;

        assert_eq!(fixture.bundle().len(), 1);
        assert_eq!(
            fixture.bundle().first().map(|request| request.kind()),
            Some(DeliverableKind::Igtv)
        );

        Ok(())
    }
}
