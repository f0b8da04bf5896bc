//! Vendor onboarding prompt
//!
//! Asks for each registration field on stdin and posts the result to the
//! vendor directory.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trip_chat::backend::HttpBackend;
use trip_chat::config::Config;
use trip_chat::onboarding::{self, DraftField, VendorDraft, VendorType};

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trip_chat=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    let backend = HttpBackend::new(&config.backend)?;
    tracing::info!(base_url = %backend.base_url(), "Vendor onboarding started");

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut draft = VendorDraft::new();

    println!("Create Vendor");
    let types: Vec<_> = VendorType::ALL.iter().map(|t| t.as_str()).collect();
    println!("Vendor types: {}", types.join(", "));

    for field in DraftField::REQUIRED {
        loop {
            let Some(value) = prompt(&mut input, field.label()).await? else {
                return Ok(());
            };
            match draft.set(field, &value) {
                Ok(()) => break,
                Err(e) => println!("{e}"),
            }
        }
    }

    if let Some(url) = prompt(&mut input, "Portfolio URL (optional)").await? {
        draft.portfolio_url = url;
    }
    if let Some(languages) = prompt(&mut input, "Languages, comma-separated (optional)").await? {
        draft.languages = languages;
    }

    println!("{}", onboarding::submit(&backend, &mut draft).await);
    Ok(())
}

/// Print a label and read one line; `None` at end of input
async fn prompt(input: &mut Input, label: &str) -> std::io::Result<Option<String>> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    input.next_line().await
}
