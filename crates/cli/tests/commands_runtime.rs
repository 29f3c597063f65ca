use std::env;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use crossell_cli::commands::{classify, customers, recommend, DataOptions};
use crossell_store::fixtures;
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn recommend_emits_a_full_report_for_a_known_customer() {
    with_env(&[], |data_dir| {
        let result = recommend::run("C001", &options(data_dir));
        assert_eq!(result.exit_code, 0, "expected successful recommend run");

        let report = parse_payload(&result.output);
        assert_eq!(report["CustomerInfo"]["CustomerID"], "C001");
        assert_eq!(report["CustomerInfo"]["CustomerName"], "Nordic Bakehouse");
        assert_eq!(
            report["CustomerClassification"]["CustomerType"],
            "CHG Own Sales Customer"
        );
        assert_eq!(report["Summary"]["TotalUpSell"], 0);
        assert_eq!(
            report["Summary"]["TotalRecommendations"],
            report["Summary"]["TotalCrossSell"]
        );
        assert!(report["AcceptedRecommendations"].is_array());
        assert!(report["RejectedRecommendations"].is_array());
        assert!(report["AlreadyPurchasedRecommendations"].is_array());
    });
}

#[test]
fn recommend_returns_empty_report_for_unknown_customer() {
    with_env(&[], |data_dir| {
        let result = recommend::run("C404", &options(data_dir));
        assert_eq!(result.exit_code, 0, "unknown customer is not an error");

        let report = parse_payload(&result.output);
        assert_eq!(report["CustomerInfo"]["CustomerID"], "C404");
        assert_eq!(report["CustomerInfo"]["CustomerName"], "Unknown");
        assert!(report["CustomerClassification"].is_null());
        assert_eq!(report["Summary"]["TotalCrossSell"], 0);
        assert_eq!(report["AcceptedRecommendations"].as_array().map(Vec::len), Some(0));
    });
}

#[test]
fn recommend_fails_with_config_error_class_on_invalid_env() {
    with_env(&[("CROSSELL_ORACLE_TIMEOUT_SECS", "0")], |data_dir| {
        let result = recommend::run("C001", &options(data_dir));
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn recommend_fails_on_missing_snapshot_directory() {
    with_env(&[], |_data_dir| {
        let empty = TempDir::new().expect("tempdir");
        let result = recommend::run(
            "C001",
            &DataOptions { data_dir: Some(empty.path().to_path_buf()), fail_policy: None },
        );
        assert_eq!(result.exit_code, 3, "expected snapshot load failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "snapshot_load");
    });
}

#[test]
fn classify_reports_tier_with_criteria_flags() {
    with_env(&[], |data_dir| {
        let result = classify::run("C002", &options(data_dir));
        assert_eq!(result.exit_code, 0, "expected successful classify run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["CustomerType"], "Distributor Customer");
        assert_eq!(payload["NumberOfStores"], 30);
        assert_eq!(payload["ClassificationCriteria"]["StoresBetween25And50"], true);
    });
}

#[test]
fn classify_unknown_customer_is_an_error() {
    with_env(&[], |data_dir| {
        let result = classify::run("C404", &options(data_dir));
        assert_eq!(result.exit_code, 6, "expected unknown customer failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "classify");
        assert_eq!(payload["error_class"], "unknown_customer");
    });
}

#[test]
fn customers_lists_every_snapshot_customer() {
    with_env(&[], |data_dir| {
        let result = customers::run(&options(data_dir));
        assert_eq!(result.exit_code, 0, "expected successful customer listing");

        let payload = parse_payload(&result.output);
        let listings = payload.as_array().expect("array output");
        assert_eq!(listings.len(), 3);
        assert_eq!(listings[0]["CustomerID"], "C001");
        assert_eq!(listings[2]["CustomerName"], "Corner Deli");
    });
}

fn options(data_dir: &Path) -> DataOptions {
    DataOptions { data_dir: Some(data_dir.to_path_buf()), fail_policy: None }
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce(&Path)) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "CROSSELL_DATA_DIR",
        "CROSSELL_ORACLE_API_KEY",
        "CROSSELL_ORACLE_BASE_URL",
        "CROSSELL_ORACLE_MODEL",
        "CROSSELL_ORACLE_TIMEOUT_SECS",
        "CROSSELL_ORACLE_FAIL_POLICY",
        "CROSSELL_SERVER_BIND_ADDRESS",
        "CROSSELL_SERVER_PORT",
        "CROSSELL_LOG_LEVEL",
        "CROSSELL_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    let data_dir = TempDir::new().expect("tempdir");
    fixtures::write_demo_csvs(data_dir.path()).expect("write fixtures");

    test_fn(data_dir.path());

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
