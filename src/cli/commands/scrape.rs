//! One-shot scrape command.

use console::style;

use super::helpers::build_scraper;
use crate::config::Config;
use crate::scrapers::FetchRequest;

/// Scrape `url` once and print the result as JSON.
pub async fn cmd_scrape(config: &Config, url: &str, retries: Option<u32>) -> anyhow::Result<()> {
    let request = FetchRequest::parse(url)?;

    let mut scraper = build_scraper(config)?;
    if let Some(retries) = retries {
        scraper = scraper.with_max_retries(retries);
    }

    eprintln!("{} Scraping {}", style("→").cyan(), request);

    match scraper.scrape(&request).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("  {} {}", style("✗").red(), e);
            Err(e.into())
        }
    }
}
