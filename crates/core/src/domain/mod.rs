pub mod catalogue;
pub mod customer;
pub mod product;
pub mod sales;

pub use catalogue::{CatalogueItem, CatalogueItemId};
pub use customer::{Customer, CustomerId};
pub use product::{Product, ProductId};
pub use sales::{SalesRecord, StoreRecord};
