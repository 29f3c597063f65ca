//! Deterministic demo dataset.
//!
//! One customer per tier so classification, matching, and dedup paths are
//! all exercised: C001 clears the large-scale quantity rule, C002 the
//! medium-scale store rule, C003 neither.

use std::fs;
use std::path::Path;

use crossell_core::catalog::CatalogSnapshot;
use crossell_core::domain::{
    CatalogueItem, Customer, Product, SalesRecord, StoreRecord,
};

struct CustomerSeed {
    id: &'static str,
    name: &'static str,
    customer_type: &'static str,
    country: &'static str,
    region: &'static str,
    store_count: usize,
}

const CUSTOMER_SEEDS: &[CustomerSeed] = &[
    CustomerSeed {
        id: "C001",
        name: "Nordic Bakehouse",
        customer_type: "CHG Own Sales Customer",
        country: "Sweden",
        region: "Nordics",
        store_count: 10,
    },
    CustomerSeed {
        id: "C002",
        name: "Helios Distribution",
        customer_type: "Distributor Customer",
        country: "Greece",
        region: "Southern Europe",
        store_count: 30,
    },
    CustomerSeed {
        id: "C003",
        name: "Corner Deli",
        customer_type: "Small Customer",
        country: "Ireland",
        region: "Western Europe",
        store_count: 2,
    },
];

struct ProductSeed {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    price: f64,
}

const PRODUCT_SEEDS: &[ProductSeed] = &[
    ProductSeed { id: "P001", name: "Wheat Flour", category: "Baking", price: 12.5 },
    ProductSeed { id: "P002", name: "Rye Flour", category: "Baking", price: 14.0 },
    ProductSeed { id: "P003", name: "Olive Oil", category: "Oils", price: 30.0 },
    ProductSeed { id: "P004", name: "Sunflower Oil", category: "Oils", price: 18.0 },
    ProductSeed { id: "P005", name: "Cocoa Powder", category: "Confectionery", price: 22.0 },
    ProductSeed { id: "P006", name: "Honey", category: "Sweeteners", price: 25.0 },
];

struct CatalogueSeed {
    id: &'static str,
    customer_id: &'static str,
    product_name: &'static str,
    quantity_required: i64,
    category: &'static str,
    description: &'static str,
    ingredients: &'static str,
}

const CATALOGUE_SEEDS: &[CatalogueSeed] = &[
    CatalogueSeed {
        id: "CCI-001",
        customer_id: "C001",
        product_name: "Rustic Rye Bread",
        quantity_required: 500,
        category: "Bakery",
        description: "Stone-baked sourdough rye loaf",
        ingredients: "Rye Flour, Water, Salt; Yeast; Caraway Seeds",
    },
    CatalogueSeed {
        id: "CCI-002",
        customer_id: "C001",
        product_name: "Chocolate Babka",
        quantity_required: 220,
        category: "Bakery",
        description: "Braided brioche with chocolate filling",
        ingredients: "Wheat Flour, Sugar; Cocoa Powder; Butter",
    },
    CatalogueSeed {
        id: "CCI-003",
        customer_id: "C002",
        product_name: "House Granola",
        quantity_required: 800,
        category: "Breakfast",
        description: "Oven-toasted oat clusters",
        ingredients: "Oats, Honey; Sunflower Oil",
    },
    CatalogueSeed {
        id: "CCI-004",
        customer_id: "C003",
        product_name: "Simple Flatbread",
        quantity_required: 90,
        category: "Bakery",
        description: "Thin griddled flatbread",
        ingredients: "Wheat Flour, Water, Salt",
    },
];

struct SalesSeed {
    customer_id: &'static str,
    product_id: &'static str,
    quantity: i64,
}

const SALES_SEEDS: &[SalesSeed] = &[
    SalesSeed { customer_id: "C001", product_id: "P001", quantity: 150_000 },
    SalesSeed { customer_id: "C001", product_id: "P005", quantity: 100_000 },
    SalesSeed { customer_id: "C002", product_id: "P004", quantity: 60_000 },
    SalesSeed { customer_id: "C003", product_id: "P001", quantity: 9_000 },
];

/// Build the demo snapshot directly in memory.
pub fn demo_snapshot() -> CatalogSnapshot {
    let customers = CUSTOMER_SEEDS
        .iter()
        .map(|seed| Customer {
            id: seed.id.into(),
            name: seed.name.to_string(),
            customer_type: seed.customer_type.to_string(),
            country: seed.country.to_string(),
            region: seed.region.to_string(),
        })
        .collect();

    let products = PRODUCT_SEEDS
        .iter()
        .map(|seed| Product {
            id: seed.id.into(),
            name: seed.name.to_string(),
            category: seed.category.to_string(),
            price: seed.price,
        })
        .collect();

    let catalogue = CATALOGUE_SEEDS
        .iter()
        .map(|seed| CatalogueItem {
            id: seed.id.into(),
            customer_id: seed.customer_id.into(),
            product_name: seed.product_name.to_string(),
            quantity_required: seed.quantity_required,
            category: seed.category.to_string(),
            description: seed.description.to_string(),
            ingredients: seed
                .ingredients
                .split(';')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_owned)
                .collect(),
        })
        .collect();

    let sales = SALES_SEEDS
        .iter()
        .map(|seed| SalesRecord {
            customer_id: seed.customer_id.into(),
            product_id: seed.product_id.into(),
            quantity: seed.quantity,
        })
        .collect();

    let stores = store_records();

    CatalogSnapshot::new(customers, products, catalogue, sales, stores)
}

fn store_records() -> Vec<StoreRecord> {
    let mut stores = Vec::new();
    for seed in CUSTOMER_SEEDS {
        for index in 1..=seed.store_count {
            stores.push(StoreRecord {
                customer_id: seed.id.into(),
                store_id: format!("{}-S{index:02}", seed.id),
            });
        }
    }
    stores
}

/// Write the demo dataset as the five snapshot CSV files, matching the
/// upstream export headers exactly.
pub fn write_demo_csvs(dir: &Path) -> std::io::Result<()> {
    let mut customers = String::from("CustomerID,CustomerName,CustomerType,Country,Region\n");
    for seed in CUSTOMER_SEEDS {
        customers.push_str(&format!(
            "{},{},{},{},{}\n",
            seed.id, seed.name, seed.customer_type, seed.country, seed.region
        ));
    }
    fs::write(dir.join(super::loader::CUSTOMER_FILE), customers)?;

    let mut products = String::from("ProductID,Name,Category,Price\n");
    for seed in PRODUCT_SEEDS {
        products.push_str(&format!("{},{},{},{}\n", seed.id, seed.name, seed.category, seed.price));
    }
    fs::write(dir.join(super::loader::PRODUCTS_FILE), products)?;

    let mut catalogue = String::from(
        "CustomerCatalogueItemID,CustomerID,ProductName,QuantityRequired,Product Category,Description,Ingredients\n",
    );
    for seed in CATALOGUE_SEEDS {
        catalogue.push_str(&format!(
            "{},{},{},{},{},{},\"{}\"\n",
            seed.id,
            seed.customer_id,
            seed.product_name,
            seed.quantity_required,
            seed.category,
            seed.description,
            seed.ingredients
        ));
    }
    fs::write(dir.join(super::loader::CATALOGUE_FILE), catalogue)?;

    let mut sales = String::from("CustomerID,ProductID,Quantity\n");
    for seed in SALES_SEEDS {
        sales.push_str(&format!("{},{},{}\n", seed.customer_id, seed.product_id, seed.quantity));
    }
    fs::write(dir.join(super::loader::SALES_FILE), sales)?;

    let mut stores = String::from("CustomerID,StoreID\n");
    for record in store_records() {
        stores.push_str(&format!("{},{}\n", record.customer_id, record.store_id));
    }
    fs::write(dir.join(super::loader::STORES_FILE), stores)?;

    Ok(())
}
