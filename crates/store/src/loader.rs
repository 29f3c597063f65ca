//! CSV snapshot loading.
//!
//! The five snapshot files keep the column headers of the upstream export.
//! Any unreadable or malformed file is fatal at load time; the engine never
//! starts on a corrupt catalog.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crossell_core::catalog::CatalogSnapshot;
use crossell_core::domain::{
    CatalogueItem, Customer, Product, SalesRecord, StoreRecord,
};

pub const CUSTOMER_FILE: &str = "customer.csv";
pub const CATALOGUE_FILE: &str = "customer_catalogue_enhanced.csv";
pub const PRODUCTS_FILE: &str = "products.csv";
pub const SALES_FILE: &str = "sales_enhanced.csv";
pub const STORES_FILE: &str = "stores.csv";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not open snapshot file `{path}`: {source}")]
    Open { path: PathBuf, source: csv::Error },
    #[error("could not parse row {row} of `{path}`: {source}")]
    Parse { path: PathBuf, row: usize, source: csv::Error },
}

#[derive(Debug, Deserialize)]
struct CustomerRow {
    #[serde(rename = "CustomerID")]
    customer_id: String,
    #[serde(rename = "CustomerName")]
    customer_name: String,
    #[serde(rename = "CustomerType", default)]
    customer_type: String,
    #[serde(rename = "Country", default)]
    country: String,
    #[serde(rename = "Region", default)]
    region: String,
}

#[derive(Debug, Deserialize)]
struct ProductRow {
    #[serde(rename = "ProductID")]
    product_id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Category", default)]
    category: String,
    #[serde(rename = "Price", default)]
    price: f64,
}

#[derive(Debug, Deserialize)]
struct CatalogueRow {
    #[serde(rename = "CustomerCatalogueItemID")]
    item_id: String,
    #[serde(rename = "CustomerID")]
    customer_id: String,
    #[serde(rename = "ProductName", default)]
    product_name: String,
    #[serde(rename = "QuantityRequired", default)]
    quantity_required: i64,
    #[serde(rename = "Product Category", default)]
    category: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Ingredients", default)]
    ingredients: String,
}

#[derive(Debug, Deserialize)]
struct SalesRow {
    #[serde(rename = "CustomerID")]
    customer_id: String,
    #[serde(rename = "ProductID")]
    product_id: String,
    #[serde(rename = "Quantity", default)]
    quantity: i64,
}

#[derive(Debug, Deserialize)]
struct StoreRow {
    #[serde(rename = "CustomerID")]
    customer_id: String,
    #[serde(rename = "StoreID", default)]
    store_id: String,
}

fn read_rows<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|source| StoreError::Open { path: path.to_path_buf(), source })?;

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<T>().enumerate() {
        let row = record.map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            // +2: one for the header line, one for 1-based numbering.
            row: index + 2,
            source,
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Split the raw `Ingredients` column into its semicolon-separated entries.
/// Comma-level tokenization belongs to the matcher, not the loader.
fn split_ingredient_entries(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Load the full catalog snapshot from a directory of CSV files.
pub fn load_snapshot(data_dir: &Path) -> Result<CatalogSnapshot, StoreError> {
    let customers = read_rows::<CustomerRow>(&data_dir.join(CUSTOMER_FILE))?
        .into_iter()
        .map(|row| Customer {
            id: row.customer_id.as_str().into(),
            name: row.customer_name,
            customer_type: row.customer_type,
            country: row.country,
            region: row.region,
        })
        .collect::<Vec<_>>();

    let products = read_rows::<ProductRow>(&data_dir.join(PRODUCTS_FILE))?
        .into_iter()
        .map(|row| Product {
            id: row.product_id.as_str().into(),
            name: row.name,
            category: row.category,
            price: row.price,
        })
        .collect::<Vec<_>>();

    let catalogue = read_rows::<CatalogueRow>(&data_dir.join(CATALOGUE_FILE))?
        .into_iter()
        .map(|row| CatalogueItem {
            id: row.item_id.as_str().into(),
            customer_id: row.customer_id.as_str().into(),
            product_name: row.product_name,
            quantity_required: row.quantity_required,
            category: row.category,
            description: row.description,
            ingredients: split_ingredient_entries(&row.ingredients),
        })
        .collect::<Vec<_>>();

    let sales = read_rows::<SalesRow>(&data_dir.join(SALES_FILE))?
        .into_iter()
        .map(|row| SalesRecord {
            customer_id: row.customer_id.as_str().into(),
            product_id: row.product_id.as_str().into(),
            quantity: row.quantity,
        })
        .collect::<Vec<_>>();

    let stores = read_rows::<StoreRow>(&data_dir.join(STORES_FILE))?
        .into_iter()
        .map(|row| StoreRecord {
            customer_id: row.customer_id.as_str().into(),
            store_id: row.store_id,
        })
        .collect::<Vec<_>>();

    tracing::info!(
        event_name = "store.snapshot.loaded",
        customers = customers.len(),
        products = products.len(),
        catalogue_items = catalogue.len(),
        sales_records = sales.len(),
        store_records = stores.len(),
        "catalog snapshot loaded"
    );

    Ok(CatalogSnapshot::new(customers, products, catalogue, sales, stores))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::fixtures;

    #[test]
    fn loads_a_full_snapshot_from_csv_files() {
        let dir = TempDir::new().expect("tempdir");
        fixtures::write_demo_csvs(dir.path()).expect("write fixtures");

        let snapshot = load_snapshot(dir.path()).expect("load");

        assert_eq!(snapshot.customers().len(), 3);
        assert!(!snapshot.products().is_empty());

        let items = snapshot.catalogue_for(&"C001".into());
        assert!(!items.is_empty());
        // Semicolon entries are split; comma tokenization is left intact.
        assert!(items[0].ingredients.iter().any(|entry| entry.contains(',')));
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = TempDir::new().expect("tempdir");
        let error = load_snapshot(dir.path()).expect_err("must fail");
        assert!(matches!(error, StoreError::Open { .. }));
        assert!(error.to_string().contains(CUSTOMER_FILE));
    }

    #[test]
    fn malformed_row_is_fatal_with_row_number() {
        let dir = TempDir::new().expect("tempdir");
        fixtures::write_demo_csvs(dir.path()).expect("write fixtures");
        fs::write(
            dir.path().join(SALES_FILE),
            "CustomerID,ProductID,Quantity\nC001,P001,not-a-number\n",
        )
        .expect("write corrupt sales");

        let error = load_snapshot(dir.path()).expect_err("must fail");
        assert!(matches!(error, StoreError::Parse { row: 2, .. }));
    }

    #[test]
    fn ingredient_entries_are_trimmed_and_non_empty() {
        let entries = split_ingredient_entries(" Rye Flour, Yeast ;  Caraway ; ");
        assert_eq!(entries, vec!["Rye Flour, Yeast".to_string(), "Caraway".to_string()]);
    }
}
