//! Smoke-test a running server.

use console::style;

/// URLs probed when none are given: a plain page, a heavy page, an invalid
/// URL and an endpoint slower than the navigation deadline.
pub const DEFAULT_PROBE_URLS: &[&str] = &[
    "https://example.com",
    "https://github.com",
    "invalid-url",
    "https://httpbin.org/delay/25",
];

/// Scrape endpoint URL for `target` on `server`.
fn scrape_endpoint(server: &str, target: &str) -> String {
    format!(
        "{}/api/scrape?url={}",
        server.trim_end_matches('/'),
        urlencoding::encode(target)
    )
}

/// Request each URL from the server in turn and print the responses.
pub async fn cmd_probe(server: &str, urls: Vec<String>) -> anyhow::Result<()> {
    let urls = if urls.is_empty() {
        DEFAULT_PROBE_URLS.iter().map(|u| u.to_string()).collect()
    } else {
        urls
    };

    let client = reqwest::Client::new();

    for url in &urls {
        println!("\n{} Testing: {}", style("→").cyan(), url);

        let response = match client.get(scrape_endpoint(server, url)).send().await {
            Ok(response) => response,
            Err(e) => {
                println!("  {} Request failed: {}", style("✗").red(), e);
                continue;
            }
        };

        let status = response.status();
        let body: serde_json::Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                println!("  {} {} (unreadable body: {})", style("✗").red(), status, e);
                continue;
            }
        };

        if status.is_success() {
            println!("  {} Success: {}", style("✓").green(), body);
        } else {
            println!("  {} Error: {} {}", style("✗").red(), status.as_u16(), body);
        }
    }

    Ok(())
}
