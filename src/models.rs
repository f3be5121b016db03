use serde::{Serialize, Deserialize};

/// One shade option scraped from a product detail page. Kept in markup
/// order; duplicates are preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantRecord {
    pub shade_name: String,
    pub shade_image: Option<String>,
}

/// One product from a catalog listing page. Only `name` is required; every
/// other attribute is best-effort and may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub brand: Option<String>,
    pub price: Option<String>,
    pub original_price: Option<String>,
    pub rating: Option<String>,
    pub review_count: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub discount: Option<String>,
    pub stock_status: String,
    pub product_id: Option<String>,
    pub variants: Vec<VariantRecord>,
}

impl ProductRecord {
    /// Listing markup rarely carries an explicit stock indicator, so stock
    /// status starts out as "Available" and is only overwritten when the
    /// page says otherwise.
    pub fn new(name: String) -> Self {
        Self {
            name,
            brand: None,
            price: None,
            original_price: None,
            rating: None,
            review_count: None,
            url: None,
            image_url: None,
            discount: None,
            stock_status: "Available".to_string(),
            product_id: None,
            variants: Vec::new(),
        }
    }
}
