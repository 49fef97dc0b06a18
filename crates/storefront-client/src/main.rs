//! Storefront command-line client
//!
//! Run with:
//! ```bash
//! API_BASE_URL=http://localhost:8000/api cargo run -p storefront-client
//! ```
//!
//! Set `STOREFRONT_EMAIL` and `STOREFRONT_PASSWORD` to sign in first, and
//! `STOREFRONT_PAGE` to pick the catalogue page.

use std::env;

use anyhow::Context;
use storefront_client::StorefrontClient;
use storefront_common::{try_init_tracing_with_config, ClientConfig, TracingConfig};
use storefront_core::pagination::ELLIPSIS;
use storefront_core::{LoginRequest, PageItem, PageRange, Product, ProductQuery};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing
    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(config).await {
        error!(error = ?e, "Storefront client failed");
        std::process::exit(1);
    }
}

async fn run(config: ClientConfig) -> anyhow::Result<()> {
    info!(env = ?config.app.env, base_url = %config.api.base_url, "Configuration loaded");

    let client = StorefrontClient::connect(&config).context("Failed to build storefront client")?;
    let keeper = client.keep_alive();

    if let (Ok(email), Ok(password)) = (env::var("STOREFRONT_EMAIL"), env::var("STOREFRONT_PASSWORD")) {
        let user = client.login(&LoginRequest::new(email, password)).await?;
        info!(username = %user.username, "Signed in");
    } else if let Some(user) = client.session().user_info() {
        info!(username = %user.username, "Resumed session");
    }

    let page = env::var("STOREFRONT_PAGE")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(1);

    let products = client
        .products(&ProductQuery::new().page(page))
        .await
        .with_context(|| format!("Failed to load catalogue page {page}"))?;
    for product in &products.results {
        println!("{}", product_line(product));
    }

    let range = client.page_range(&products, page);
    if range.should_render() {
        println!("\n{}", render_range(&range));
    }

    keeper.shutdown().await;
    Ok(())
}

fn product_line(product: &Product) -> String {
    format!(
        "{:>6}  {:<40} {:>7}.{:02}{}",
        product.id,
        product.name,
        product.price_cents / 100,
        product.price_cents % 100,
        if product.in_stock { "" } else { "  (sold out)" }
    )
}

/// `< 1 ... 4 [5] 6 ... 10 >`
fn render_range(range: &PageRange) -> String {
    let mut parts = Vec::with_capacity(range.len() + 2);
    if range.has_previous() {
        parts.push("<".to_string());
    }
    for item in range.items() {
        parts.push(match item {
            PageItem::Page(page) if *page == range.current_page() => format!("[{page}]"),
            PageItem::Page(page) => page.to_string(),
            PageItem::Ellipsis => ELLIPSIS.to_string(),
        });
    }
    if range.has_next() {
        parts.push(">".to_string());
    }
    parts.join(" ")
}
