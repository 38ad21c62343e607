//! Command Line & Logging Config

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};

use crate::pricing::PricingOptions;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Arguments for pricing a fixture set from the command line.
#[derive(Debug, Parser)]
#[command(
    name = "campaign-pricing",
    about = "Price a deliverable bundle against seller rate cards"
)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "independent boolean toggles from the command line"
)]
pub struct QuoteArgs {
    /// Fixture set to load sellers and bundle from
    #[arg(short, long, default_value = "campaign")]
    pub fixture: String,

    /// Directory holding the `sellers/` and `bundles/` fixture folders
    #[arg(long, default_value = "./fixtures")]
    pub fixtures_dir: PathBuf,

    /// Do not apply package (post count) discounts
    #[arg(long)]
    pub no_package_discounts: bool,

    /// Do not apply volume (spend threshold) discounts
    #[arg(long)]
    pub no_volume_discounts: bool,

    /// Merge duplicate deliverable types before pricing
    #[arg(long)]
    pub merge: bool,

    /// Fail instead of pricing deliverables a seller has no rate for at zero
    #[arg(long)]
    pub strict: bool,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl QuoteArgs {
    /// Discount toggles selected on the command line.
    pub fn pricing_options(&self) -> PricingOptions {
        PricingOptions::default()
            .with_package_discounts(!self.no_package_discounts)
            .with_volume_discounts(!self.no_volume_discounts)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_price_campaign_set_with_all_discounts() -> TestResult {
        let args = QuoteArgs::try_parse_from(["campaign-pricing"])?;

        assert_eq!(args.fixture, "campaign");
        assert_eq!(args.fixtures_dir, PathBuf::from("./fixtures"));
        assert_eq!(args.pricing_options(), PricingOptions::default());
        assert!(!args.merge);
        assert!(!args.strict);

        Ok(())
    }

    #[test]
    fn discount_flags_disable_toggles() -> TestResult {
        let args = QuoteArgs::try_parse_from([
            "campaign-pricing",
            "--no-package-discounts",
            "-f",
            "spring",
            "--log-format",
            "json",
        ])?;

        let options = args.pricing_options();

        assert_eq!(args.fixture, "spring");
        assert!(!options.apply_package_discounts);
        assert!(options.apply_volume_discounts);
        assert_eq!(args.logging.log_format, LogFormat::Json);

        Ok(())
    }
}
