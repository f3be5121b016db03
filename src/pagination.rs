use std::time::Duration;

use anyhow::Result;
use log::{error, warn};

use crate::models::ProductRecord;
use crate::page;
use crate::prompt::{Directive, Prompt};
use crate::session::Session;

// Role/label/text heuristics for the next-page control, tried in order.
// The last two cover the localized storefront ("다음" = next).
const NEXT_BUTTON_SELECTORS: &[&str] = &[
    "a[class*='next']",
    "button[class*='next']",
    "[aria-label*='next']",
    "[title*='next']",
    "a[class*='다음']",
    "button[class*='다음']",
];
const NEXT_PAGE_SETTLE_DELAY: Duration = Duration::from_secs(3);

/// Page-traversal side of the scrape loop. The live implementation wraps
/// the browser session; tests script it.
pub trait CatalogPager {
    /// Scrapes whatever page the renderer currently shows.
    async fn scrape_page(&mut self) -> Result<Vec<ProductRecord>>;

    /// Tries the known next-page controls. `Ok(false)` means none matched
    /// or none were enabled.
    async fn click_next(&mut self) -> Result<bool>;
}

/// Walks up to `max_pages` listing pages, accumulating records in
/// page-visit order. An empty page is treated as a structural signal and
/// ends the traversal; a legitimate listing page always has at least one
/// product. Records from earlier pages are never discarded.
pub async fn scrape_catalog(
    pager: &mut impl CatalogPager,
    prompt: &mut impl Prompt,
    max_pages: usize,
) -> Result<Vec<ProductRecord>> {
    let mut all_products = Vec::new();

    for page_num in 0..max_pages {
        println!("\n{}", "=".repeat(50));
        println!("SCRAPING PAGE {}", page_num + 1);
        println!("{}", "=".repeat(50));

        let products = match pager.scrape_page().await {
            Ok(products) => products,
            Err(err) => {
                error!("failed to scrape page {}: {err:#}", page_num + 1);
                Vec::new()
            }
        };

        if products.is_empty() {
            println!("No products found on this page");
            break;
        }

        println!(
            "✓ Extracted {} products from page {}",
            products.len(),
            page_num + 1
        );
        all_products.extend(products);
        println!("Total so far: {} products", all_products.len());

        if page_num + 1 == max_pages {
            break;
        }

        match prompt.next_page_directive().await? {
            Directive::Stop => break,
            Directive::Manual => {
                prompt
                    .wait_for_ready("Navigate to the next page manually, then press ENTER...")
                    .await?;
            }
            Directive::Advance => {
                let advanced = pager.click_next().await.unwrap_or_else(|err| {
                    warn!("automatic next-page navigation failed: {err:#}");
                    false
                });
                if !advanced {
                    println!("Couldn't find the next page button automatically.");
                    prompt
                        .wait_for_ready(
                            "Please navigate to the next page manually and press ENTER...",
                        )
                        .await?;
                }
            }
        }
    }

    Ok(all_products)
}

/// Live pager backed by the browser session.
pub struct SessionPager<'a> {
    session: &'a Session,
}

impl<'a> SessionPager<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }
}

impl CatalogPager for SessionPager<'_> {
    async fn scrape_page(&mut self) -> Result<Vec<ProductRecord>> {
        page::scrape_current_page(self.session).await
    }

    async fn click_next(&mut self) -> Result<bool> {
        for css in NEXT_BUTTON_SELECTORS {
            let Some(button) = self.session.find(css).await else {
                continue;
            };
            if !button.is_enabled().await.unwrap_or(false) {
                continue;
            }
            if button.click().await.is_err() {
                continue;
            }
            tokio::time::sleep(NEXT_PAGE_SETTLE_DELAY).await;
            return Ok(true);
        }
        Ok(false)
    }
}
