//! xrate command line
//!
//! Prints the current base currency rate table and, given an amount and a
//! currency, the conversion of that amount into every known currency.

use clap::Parser;
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xrate_core::currency::{ConversionResult, convert_all, parse_amount};
use xrate_feed::RateService;
use xrate_shared::{AppConfig, AppResult};

/// xrate CLI
#[derive(Parser, Debug)]
#[command(name = "xrate-cli")]
#[command(about = "Convert an amount using live central bank exchange rates")]
#[command(version)]
struct Args {
    /// Amount to convert
    #[arg(default_value = "0", value_parser = parse_amount_arg, allow_negative_numbers = true)]
    amount: Decimal,

    /// Currency the amount is expressed in
    currency: Option<String>,
}

impl Args {
    /// Currency to convert from, when a conversion was asked for.
    fn conversion(&self) -> Option<&str> {
        self.currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !self.amount.is_zero())
    }
}

fn parse_amount_arg(text: &str) -> Result<Decimal, String> {
    parse_amount(text).map_err(|e| e.to_string())
}

fn render(result: &ConversionResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Everything one run prints, computed over a single rate table.
#[derive(Debug)]
struct Report {
    base_currency: String,
    base_rates: ConversionResult,
    conversion: Option<(String, ConversionResult)>,
}

/// Crawls the sources once and runs both calculations on that table.
async fn build_report(service: &RateService, args: &Args) -> AppResult<Report> {
    let table = service.load_table().await?;
    let base_currency = table.base_currency().to_string();
    let base_rates = convert_all(Decimal::ONE, &base_currency, &table)?;

    let conversion = match args.conversion() {
        Some(currency) => {
            let currency = currency.to_uppercase();
            let result = convert_all(args.amount, &currency, &table)?;
            Some((currency, result))
        }
        None => None,
    };

    Ok(Report {
        base_currency,
        base_rates,
        conversion,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xrate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = AppConfig::load()?;
    let service = RateService::from_config(&config.feed)?;

    info!(sources = service.sources().len(), "Fetching rates");
    let report = build_report(&service, &args).await?;
    println!(
        "Current {} exchange rate is:\n{}\n",
        report.base_currency,
        render(&report.base_rates)?
    );

    if let Some((currency, result)) = &report.conversion {
        println!("Exchanging {} {} --->", args.amount, currency);
        println!("{}", render(result)?);
    }

    Ok(())
}
