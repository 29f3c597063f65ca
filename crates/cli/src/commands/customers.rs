use serde::Serialize;

use crossell_core::domain::CustomerId;

use crate::commands::{load_config, load_snapshot_for, CommandResult, DataOptions};

#[derive(Debug, Serialize)]
struct CustomerListing {
    #[serde(rename = "CustomerID")]
    customer_id: CustomerId,
    #[serde(rename = "CustomerName")]
    customer_name: String,
    #[serde(rename = "CustomerType")]
    customer_type: String,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Region")]
    region: String,
}

/// Print every customer in the snapshot as a JSON array.
pub fn run(options: &DataOptions) -> CommandResult {
    let config = match load_config(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("customers", "config_validation", error.to_string(), 2)
        }
    };

    let snapshot = match load_snapshot_for("customers", &config) {
        Ok(snapshot) => snapshot,
        Err(failure) => return failure,
    };

    let listings: Vec<CustomerListing> = snapshot
        .customers()
        .iter()
        .map(|customer| CustomerListing {
            customer_id: customer.id.clone(),
            customer_name: customer.name.clone(),
            customer_type: customer.customer_type.clone(),
            country: customer.country.clone(),
            region: customer.region.clone(),
        })
        .collect();

    CommandResult::artifact("customers", &listings)
}
