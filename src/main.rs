//! Campaign pricing command line tool
//!
//! Loads a fixture set, prices its bundle for every seller and prints the quote.

use std::io;

use anyhow::{Result, bail};
use clap::Parser;
use tracing::{info, warn};

use campaign_pricing::{
    config::QuoteArgs, fixtures::Fixture, observability::init_subscriber,
    pricing::PricingEngine, quote::Quote,
};

fn main() -> Result<()> {
    let args = QuoteArgs::parse();

    init_subscriber(&args.logging)?;

    let fixture = Fixture::from_set_in(args.fixtures_dir.as_path(), &args.fixture)?;

    let bundle = if args.merge {
        fixture.bundle().merged()
    } else {
        fixture.bundle().clone()
    };

    for seller in fixture.sellers() {
        let unpriced = seller.unpriced_kinds(&bundle);

        if unpriced.is_empty() {
            continue;
        }

        let kinds = unpriced
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        if args.strict {
            bail!("{} has no rate for: {kinds}", seller.name());
        }

        warn!(seller = seller.name(), kinds = %kinds, "pricing unrated deliverables at zero");
    }

    let results = PricingEngine::calculate(fixture.sellers(), &bundle, args.pricing_options())?;
    let quote = Quote::new(results, fixture.currency()?)?;

    info!(
        fixture = %args.fixture,
        sellers = quote.results().len(),
        "quote calculated"
    );

    quote.write_to(io::stdout().lock(), fixture.sellers())?;

    Ok(())
}
