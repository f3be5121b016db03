mod extract;
mod models;
mod page;
mod pagination;
mod prompt;
mod session;
mod variants;
mod writer;

use std::path::Path;

use anyhow::Result;

use crate::pagination::SessionPager;
use crate::prompt::{ConsolePrompt, Prompt};
use crate::session::Session;

const BASE_URL: &str = "https://global.oliveyoung.com";
const DEFAULT_MAX_PAGES: usize = 5;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    println!("🔍 Olive Young product archiver");

    let session = Session::start(BASE_URL).await?;

    let outcome = tokio::select! {
        result = run(&session) => result,
        _ = tokio::signal::ctrl_c() => {
            println!("\n⚠ Scrape interrupted by user");
            Ok(())
        }
    };

    // Teardown runs on success, failure, and interrupt alike.
    println!("\n🔒 Closing browser...");
    session.close().await;
    if outcome.is_ok() {
        println!("✅ Done!");
    }
    outcome
}

async fn run(session: &Session) -> Result<()> {
    session.open_catalog().await?;
    print_navigation_banner();

    let mut prompt = ConsolePrompt::new();
    prompt
        .wait_for_ready(
            "Press ENTER when you've navigated to the product listing and are ready to scrape...",
        )
        .await?;

    let mut pager = SessionPager::new(session);
    let products = pagination::scrape_catalog(&mut pager, &mut prompt, max_pages()).await?;

    if products.is_empty() {
        println!("❌ No products were found");
        return Ok(());
    }

    let variant_total: usize = products.iter().map(|p| p.variants.len()).sum();
    let path = output_path();
    let saved = writer::save_to_csv(&products, Path::new(&path))?;
    println!("\n✓ Saved {saved} products ({variant_total} shade variants) to {path}");
    Ok(())
}

fn print_navigation_banner() {
    println!("\n{}", "=".repeat(60));
    println!("MANUAL NAVIGATION REQUIRED:");
    println!("1. Handle any popups (region selection, etc.)");
    println!("2. Navigate to the product category you want to archive");
    println!("3. Apply any filters you want (brand, price range, etc.)");
    println!("4. Make sure the product listing is visible");
    println!("{}\n", "=".repeat(60));
}

fn max_pages() -> usize {
    std::env::var("OLIVEYOUNG_MAX_PAGES")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_MAX_PAGES)
}

fn output_path() -> String {
    std::env::var("OLIVEYOUNG_OUTPUT").unwrap_or_else(|_| {
        format!(
            "olive_young_products_{}.csv",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        )
    })
}
