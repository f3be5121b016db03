use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::models::ProductRecord;

/// Column order of the output artifact.
pub const FIELD_NAMES: [&str; 12] = [
    "name",
    "brand",
    "price",
    "original_price",
    "rating",
    "review_count",
    "url",
    "image_url",
    "discount",
    "stock_status",
    "product_id",
    "variants",
];

/// Writes one row per product and returns the row count. The file opens
/// with a UTF-8 byte-order marker so spreadsheet tools pick the right
/// encoding.
pub fn save_to_csv(products: &[ProductRecord], path: &Path) -> Result<usize> {
    let mut file = File::create(path)?;
    file.write_all("\u{feff}".as_bytes())?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(FIELD_NAMES)?;
    for product in products {
        writer.write_record(record_row(product)?)?;
    }
    writer.flush()?;

    Ok(products.len())
}

// Variant lists are flattened into the row as a compact JSON array so the
// tabular format can still carry the nested data.
fn record_row(product: &ProductRecord) -> Result<Vec<String>> {
    let variants = serde_json::to_string(&product.variants)?;
    Ok(vec![
        product.name.clone(),
        field(&product.brand),
        field(&product.price),
        field(&product.original_price),
        field(&product.rating),
        field(&product.review_count),
        field(&product.url),
        field(&product.image_url),
        field(&product.discount),
        product.stock_status.clone(),
        field(&product.product_id),
        variants,
    ])
}

fn field(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VariantRecord;

    fn sample() -> ProductRecord {
        let mut product = ProductRecord::new("Velvet Lip Tint".to_string());
        product.brand = Some("Rom&nd".to_string());
        product.price = Some("$12.00".to_string());
        product.url = Some("https://x.test/p/1".to_string());
        product.variants = vec![
            VariantRecord {
                shade_name: "01 Dusty Rose".to_string(),
                shade_image: Some("https://cdn.x.test/01.jpg".to_string()),
            },
            VariantRecord {
                shade_name: "02 Fig Brick".to_string(),
                shade_image: None,
            },
        ];
        product
    }

    #[test]
    fn output_starts_with_bom_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");

        let count = save_to_csv(&[sample()], &path).unwrap();
        assert_eq!(count, 1);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with('\u{feff}'));
        let header = contents.trim_start_matches('\u{feff}').lines().next().unwrap();
        assert_eq!(header, FIELD_NAMES.join(","));
    }

    #[test]
    fn variants_are_embedded_as_json() {
        let row = record_row(&sample()).unwrap();
        assert_eq!(row.len(), FIELD_NAMES.len());

        let variants: Vec<VariantRecord> = serde_json::from_str(row.last().unwrap()).unwrap();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].shade_name, "01 Dusty Rose");
        assert!(variants[1].shade_image.is_none());
    }

    #[test]
    fn missing_fields_become_empty_cells() {
        let row = record_row(&ProductRecord::new("Bare".to_string())).unwrap();
        assert_eq!(row[0], "Bare");
        assert_eq!(row[1], ""); // brand
        assert_eq!(row[9], "Available"); // stock_status policy default
        assert_eq!(row[11], "[]"); // no variants
    }

    #[test]
    fn row_count_matches_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("many.csv");
        let products = vec![sample(), sample(), sample()];

        assert_eq!(save_to_csv(&products, &path).unwrap(), 3);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 4); // header + 3 rows
    }
}
