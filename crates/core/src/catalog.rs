//! Read-only catalog snapshot shared by the classifier and the matcher.

use std::collections::HashSet;

use crate::domain::{
    CatalogueItem, Customer, CustomerId, Product, ProductId, SalesRecord, StoreRecord,
};

/// The tabular snapshot loaded once at startup. The engine treats it as
/// immutable for its whole lifetime; products keep their load order because
/// the matcher scans embeddings in catalog insertion order.
#[derive(Clone, Debug, Default)]
pub struct CatalogSnapshot {
    customers: Vec<Customer>,
    products: Vec<Product>,
    catalogue: Vec<CatalogueItem>,
    sales: Vec<SalesRecord>,
    stores: Vec<StoreRecord>,
}

impl CatalogSnapshot {
    pub fn new(
        customers: Vec<Customer>,
        products: Vec<Product>,
        catalogue: Vec<CatalogueItem>,
        sales: Vec<SalesRecord>,
        stores: Vec<StoreRecord>,
    ) -> Self {
        Self { customers, products, catalogue, sales, stores }
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn catalogue(&self) -> &[CatalogueItem] {
        &self.catalogue
    }

    pub fn customer(&self, id: &CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|customer| &customer.id == id)
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Catalogue items belonging to one customer, in load order.
    pub fn catalogue_for(&self, customer_id: &CustomerId) -> Vec<&CatalogueItem> {
        self.catalogue.iter().filter(|item| &item.customer_id == customer_id).collect()
    }

    /// Sum of all sales quantities booked for a customer.
    pub fn total_sales_quantity(&self, customer_id: &CustomerId) -> i64 {
        self.sales
            .iter()
            .filter(|record| &record.customer_id == customer_id)
            .map(|record| record.quantity)
            .sum()
    }

    pub fn store_count(&self, customer_id: &CustomerId) -> usize {
        self.stores.iter().filter(|record| &record.customer_id == customer_id).count()
    }

    /// Distinct product ids the customer has already purchased. Sales rows
    /// referencing products absent from the catalog still count here; they
    /// are only ever used for set membership.
    pub fn purchased_product_ids(&self, customer_id: &CustomerId) -> HashSet<ProductId> {
        self.sales
            .iter()
            .filter(|record| &record.customer_id == customer_id)
            .map(|record| record.product_id.clone())
            .collect()
    }

    /// Products the customer does not currently buy, i.e. the cross-sell pool.
    pub fn unsold_products(&self, customer_id: &CustomerId) -> Vec<&Product> {
        let purchased = self.purchased_product_ids(customer_id);
        self.products.iter().filter(|product| !purchased.contains(&product.id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> CatalogSnapshot {
        CatalogSnapshot::new(
            vec![Customer {
                id: "C001".into(),
                name: "Nordic Foods".to_string(),
                customer_type: "Distributor Customer".to_string(),
                country: "Sweden".to_string(),
                region: "Nordics".to_string(),
            }],
            vec![
                Product {
                    id: "P001".into(),
                    name: "Wheat Flour".to_string(),
                    category: "Baking".to_string(),
                    price: 12.5,
                },
                Product {
                    id: "P002".into(),
                    name: "Rye Flour".to_string(),
                    category: "Baking".to_string(),
                    price: 14.0,
                },
            ],
            vec![],
            vec![
                SalesRecord { customer_id: "C001".into(), product_id: "P001".into(), quantity: 40 },
                SalesRecord { customer_id: "C001".into(), product_id: "P001".into(), quantity: 60 },
                SalesRecord { customer_id: "C002".into(), product_id: "P002".into(), quantity: 9 },
            ],
            vec![
                StoreRecord { customer_id: "C001".into(), store_id: "S1".to_string() },
                StoreRecord { customer_id: "C001".into(), store_id: "S2".to_string() },
            ],
        )
    }

    #[test]
    fn sales_quantity_sums_only_the_requested_customer() {
        assert_eq!(snapshot().total_sales_quantity(&"C001".into()), 100);
        assert_eq!(snapshot().total_sales_quantity(&"C404".into()), 0);
    }

    #[test]
    fn purchased_ids_deduplicate_repeat_purchases() {
        let purchased = snapshot().purchased_product_ids(&"C001".into());
        assert_eq!(purchased.len(), 1);
        assert!(purchased.contains(&"P001".into()));
    }

    #[test]
    fn unsold_products_exclude_purchase_history() {
        let snapshot = snapshot();
        let unsold = snapshot.unsold_products(&"C001".into());
        assert_eq!(unsold.len(), 1);
        assert_eq!(unsold[0].id, "P002".into());
    }

    #[test]
    fn store_count_is_per_customer() {
        assert_eq!(snapshot().store_count(&"C001".into()), 2);
        assert_eq!(snapshot().store_count(&"C404".into()), 0);
    }
}
