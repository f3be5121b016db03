use anyhow::Result;
use log::{info, warn};
use scraper::{Html, Selector};

use crate::extract::extract_product;
use crate::models::ProductRecord;
use crate::session::Session;
use crate::variants::scrape_variants;

/// Hard cap on fragments processed per page, in case a page renders a
/// runaway number of containers.
pub const PAGE_PRODUCT_CAP: usize = 50;

// The fully-qualified listing selector first, looser container classes as
// fallbacks for markup drift.
const CONTAINER_SELECTORS: &[&str] = &[
    "ul.categoryProductList.unit-list li.prdt-unit",
    ".prdt-unit",
    ".product-unit-wrap",
];

/// Parses every named product out of a listing-page snapshot. An empty
/// result after the whole selector cascade is the "page structure
/// unrecognized" signal the pagination loop stops on.
pub fn parse_listing(html: &str, base_url: &str) -> Vec<ProductRecord> {
    let document = Html::parse_document(html);

    for css in CONTAINER_SELECTORS {
        let selector = Selector::parse(css).unwrap();
        let containers: Vec<_> = document.select(&selector).collect();
        if containers.is_empty() {
            continue;
        }
        info!("found {} product containers via `{}`", containers.len(), css);
        return containers
            .into_iter()
            .take(PAGE_PRODUCT_CAP)
            .filter_map(|container| extract_product(container, base_url))
            .collect();
    }

    warn!("no product containers matched any known selector");
    Vec::new()
}

/// Scrapes the renderer's current document, then walks each product's detail
/// page for shade variants. The listing is snapshotted up front so the
/// detail-page navigation cannot disturb extraction.
pub async fn scrape_current_page(session: &Session) -> Result<Vec<ProductRecord>> {
    let html = session.page_source().await?;
    let mut products = parse_listing(&html, session.base_url());

    for product in &mut products {
        if let Some(url) = product.url.clone() {
            product.variants = scrape_variants(session, &url).await;
        }
    }

    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://x.test";

    fn unit(name: &str) -> String {
        format!(
            r#"<li class="prdt-unit"><div class="unit-desc"><a class="unit-btn">{name}</a></div></li>"#
        )
    }

    fn listing(units: &str) -> String {
        format!(r#"<html><body><ul class="categoryProductList unit-list">{units}</ul></body></html>"#)
    }

    #[test]
    fn parses_products_from_the_primary_selector() {
        let html = listing(&format!("{}{}", unit("One"), unit("Two")));
        let products = parse_listing(&html, BASE);
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "One");
        assert_eq!(products[1].name, "Two");
    }

    #[test]
    fn falls_back_to_loose_container_selectors() {
        // No categoryProductList wrapper, bare .prdt-unit containers only.
        let html = format!("<html><body>{}{}</body></html>", unit("Solo"), unit("Duo"));
        let products = parse_listing(&html, BASE);
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn unrecognized_structure_yields_empty_list() {
        let products = parse_listing(r#"<html><body><div class="hero"></div></body></html>"#, BASE);
        assert!(products.is_empty());
    }

    #[test]
    fn caps_processing_at_fifty_containers() {
        let units: String = (0..200).map(|i| unit(&format!("Item {i}"))).collect();
        let products = parse_listing(&listing(&units), BASE);
        assert_eq!(products.len(), PAGE_PRODUCT_CAP);
        assert_eq!(products.last().unwrap().name, "Item 49");
    }

    #[test]
    fn nameless_containers_are_dropped() {
        let html = listing(&format!(
            "{}{}{}",
            unit("Named"),
            r#"<li class="prdt-unit"><span class="unit-price">$9</span></li>"#,
            unit("Also Named"),
        ));
        let products = parse_listing(&html, BASE);
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Named");
        assert_eq!(products[1].name, "Also Named");
    }
}
