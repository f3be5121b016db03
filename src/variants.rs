use std::time::Duration;

use anyhow::Result;
use log::{info, warn};
use scraper::{Html, Selector};

use crate::models::VariantRecord;
use crate::session::Session;

const VARIANT_CONTAINER: &str = "li.has-price";
const SHADE_NAME: &str = "p.list-thumb-info.line-ellipsis2";

const VARIANT_WAIT: Duration = Duration::from_secs(10);
// Extra pause after the list appears so deferred shade images populate.
const IMAGE_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Navigates to a product's detail page and collects its shade variants.
/// Never fails: a timeout, navigation error, or variant-free page all come
/// back as an empty list, because "no shade options" is a valid product
/// state and one broken detail page must not sink the listing scrape.
pub async fn scrape_variants(session: &Session, product_url: &str) -> Vec<VariantRecord> {
    match fetch_variants(session, product_url).await {
        Ok(variants) => {
            if variants.is_empty() {
                info!("no shade variants found for {product_url}");
            } else {
                info!("found {} shade variants for {product_url}", variants.len());
            }
            variants
        }
        Err(error) => {
            warn!("variant scrape failed for {product_url}: {error:#}");
            Vec::new()
        }
    }
}

async fn fetch_variants(session: &Session, product_url: &str) -> Result<Vec<VariantRecord>> {
    session.goto(product_url).await?;
    // Shade lists render client-side; the first priced list item is the
    // signal that they have arrived.
    session.wait_for_element(VARIANT_CONTAINER, VARIANT_WAIT).await?;
    tokio::time::sleep(IMAGE_SETTLE_DELAY).await;

    let html = session.page_source().await?;
    Ok(parse_variants(&html))
}

/// Pulls shade variants out of a detail-page snapshot, in markup order.
/// Containers without a shade name are skipped.
pub fn parse_variants(html: &str) -> Vec<VariantRecord> {
    let document = Html::parse_document(html);
    let container = Selector::parse(VARIANT_CONTAINER).unwrap();
    let shade_name = Selector::parse(SHADE_NAME).unwrap();
    let image = Selector::parse("img").unwrap();

    let mut variants = Vec::new();
    for element in document.select(&container) {
        let Some(name_element) = element.select(&shade_name).next() else {
            continue;
        };
        let name = name_element.text().collect::<String>().trim().to_string();
        if name.is_empty() {
            continue;
        }
        let shade_image = element
            .select(&image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string);
        variants.push(VariantRecord {
            shade_name: name,
            shade_image,
        });
    }
    variants
}
