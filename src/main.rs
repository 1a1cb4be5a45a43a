use cashdesk::application::engine::Engine;
use cashdesk::domain::account::Currency;
use cashdesk::domain::rate::CurrencyPair;
use cashdesk::domain::transaction::TransactionRequest;
use cashdesk::interfaces::log::LogObserver;
use cashdesk::interfaces::report::ReportWriter;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rust_decimal_macros::dec;
use std::io;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of concurrent workers draining the queue
    #[arg(long, default_value_t = 2)]
    workers: usize,

    /// How long the engine keeps running before shutdown, in milliseconds
    #[arg(long, default_value_t = 3000)]
    run_ms: u64,

    /// Exchange-rate update period, in milliseconds
    #[arg(long, default_value_t = 1000)]
    rate_interval_ms: u64,

    /// How long shutdown waits for workers before cancelling them, in milliseconds
    #[arg(long, default_value_t = 2000)]
    shutdown_wait_ms: u64,

    /// Emit the final account state as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let engine = Engine::new();
    engine.subscribe(Arc::new(LogObserver));

    engine
        .create_account(1, dec!(200), Currency::from("USD"))
        .into_diagnostic()?;
    engine
        .create_account(2, dec!(100), Currency::from("USD"))
        .into_diagnostic()?;

    for (pair, rate) in [
        (CurrencyPair::new("USD", "EUR"), dec!(0.92)),
        (CurrencyPair::new("EUR", "USD"), dec!(1.09)),
        (CurrencyPair::new("USD", "RUB"), dec!(95.0)),
        (CurrencyPair::new("RUB", "USD"), dec!(0.0105)),
    ] {
        engine.set_rate(pair, rate).into_diagnostic()?;
    }

    engine
        .start(cli.workers, Duration::from_millis(cli.rate_interval_ms))
        .into_diagnostic()?;

    let requests = [
        TransactionRequest::Deposit {
            account: 1,
            amount: dec!(50),
        },
        TransactionRequest::Withdraw {
            account: 2,
            amount: dec!(20),
        },
        TransactionRequest::Transfer {
            from: 1,
            to: 2,
            amount: dec!(40),
        },
        TransactionRequest::Exchange {
            account: 1,
            amount: dec!(30),
            from_currency: Currency::from("USD"),
            to_currency: Currency::from("EUR"),
        },
    ];
    for request in requests {
        engine.submit(request).into_diagnostic()?;
    }

    tokio::time::sleep(Duration::from_millis(cli.run_ms)).await;

    let report = engine
        .shutdown(Duration::from_millis(cli.shutdown_wait_ms))
        .await
        .into_diagnostic()?;
    if !report.is_clean() {
        tracing::warn!("workers cancelled at shutdown: {:?}", report.forced);
    }

    let accounts = engine.snapshot();
    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    if cli.json {
        writer.write_json(&accounts).into_diagnostic()?;
    } else {
        writer.write_text(&accounts).into_diagnostic()?;
    }

    Ok(())
}
