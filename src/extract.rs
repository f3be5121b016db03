use scraper::{ElementRef, Selector};

use crate::models::ProductRecord;

// Fallback chains, most specific selector first. A precise container class
// must win over an incidental substring match.
const NAME_SELECTORS: &[&str] = &[
    ".unit-desc .unit-btn",
    ".unit-desc a",
    r#"[class*="name"]"#,
    ".unit-desc",
];
const BRAND_SELECTORS: &[&str] = &[r#"[class*="brand"]"#];
const PRICE_SELECTORS: &[&str] = &[r#"[class*="price"]"#, ".unit-price", r#"[class*="cost"]"#];
const ORIGINAL_PRICE_SELECTORS: &[&str] = &[
    r#"[class*="original"]"#,
    r#"[class*="regular"]"#,
    r#"[class*="before"]"#,
];
const RATING_SELECTORS: &[&str] = &[
    r#"[class*="rating"]"#,
    r#"[class*="star"]"#,
    r#"[class*="score"]"#,
];
const REVIEW_SELECTORS: &[&str] = &[r#"[class*="review"]"#];
const LINK_SELECTORS: &[&str] = &[".unit-thumb a", ".unit-desc a", r#"a[href*="product"]"#];
const IMAGE_SELECTORS: &[&str] = &[".unit-thumb img", "img"];
const DISCOUNT_SELECTORS: &[&str] = &[r#"[class*="discount"], [class*="sale"]"#];
const STOCK_SELECTORS: &[&str] = &[r#"[class*="stock"], [class*="available"]"#];
const PRODUCT_ID_SELECTOR: &str = r#"input[name="prdtNo"]"#;

// Lazy-loading markup defers the real image URL to a data attribute until
// scroll, so the plain `src` is tried first and the placeholders after.
const IMAGE_SOURCE_ATTRS: &[&str] = &["src", "data-src", "data-lazy-src"];

/// Extracts one product from its listing-page fragment. Returns `None` when
/// no selector resolves a name; a nameless record is useless downstream.
pub fn extract_product(fragment: ElementRef<'_>, base_url: &str) -> Option<ProductRecord> {
    let name = select_text(fragment, NAME_SELECTORS)?;

    let mut product = ProductRecord::new(name);
    product.brand = select_text(fragment, BRAND_SELECTORS);
    product.price = select_text(fragment, PRICE_SELECTORS);
    product.original_price = select_text(fragment, ORIGINAL_PRICE_SELECTORS);
    product.rating = select_text(fragment, RATING_SELECTORS);
    product.review_count = select_text(fragment, REVIEW_SELECTORS);
    product.url = select_element(fragment, LINK_SELECTORS)
        .and_then(|link| link.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(|href| resolve_url(base_url, href));
    product.image_url = resolve_image_url(fragment);
    product.discount = select_text(fragment, DISCOUNT_SELECTORS);
    if let Some(stock) = select_text(fragment, STOCK_SELECTORS) {
        product.stock_status = stock;
    }
    product.product_id = select_element(fragment, &[PRODUCT_ID_SELECTOR])
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string);

    Some(product)
}

/// Product links come in three shapes: already absolute, rooted at the site
/// origin, or a bare relative path.
pub fn resolve_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{base_url}{href}")
    } else {
        format!("{base_url}/{href}")
    }
}

fn resolve_image_url(fragment: ElementRef<'_>) -> Option<String> {
    let image = select_element(fragment, IMAGE_SELECTORS)?;
    IMAGE_SOURCE_ATTRS.iter().find_map(|attr| {
        image
            .value()
            .attr(attr)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}

/// First non-empty text content across the fallback chain.
fn select_text(fragment: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|css| {
        let selector = Selector::parse(css).unwrap();
        fragment
            .select(&selector)
            .map(collapse_text)
            .find(|text| !text.is_empty())
    })
}

/// First element the fallback chain matches, regardless of content.
fn select_element<'a>(fragment: ElementRef<'a>, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|css| {
        let selector = Selector::parse(css).unwrap();
        fragment.select(&selector).next()
    })
}

fn collapse_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
