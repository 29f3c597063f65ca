use serde::Serialize;

use crossell_core::config::{AppConfig, LoadOptions};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_snapshot(&config));
            checks.push(check_oracle_credential(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "snapshot_readability",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "oracle_credential",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let any_fail = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let overall_status = if any_fail { CheckStatus::Fail } else { CheckStatus::Pass };
    let summary = if any_fail {
        "doctor: one or more readiness checks failed".to_string()
    } else {
        "doctor: all readiness checks passed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_snapshot(config: &AppConfig) -> DoctorCheck {
    match crossell_store::load_snapshot(&config.data.dir) {
        Ok(snapshot) => DoctorCheck {
            name: "snapshot_readability",
            status: CheckStatus::Pass,
            details: format!(
                "loaded {} customers, {} products, {} catalogue items from `{}`",
                snapshot.customers().len(),
                snapshot.products().len(),
                snapshot.catalogue().len(),
                config.data.dir.display()
            ),
        },
        Err(error) => DoctorCheck {
            name: "snapshot_readability",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_oracle_credential(config: &AppConfig) -> DoctorCheck {
    if config.oracle.api_key.is_some() {
        DoctorCheck {
            name: "oracle_credential",
            status: CheckStatus::Pass,
            details: format!(
                "credential present for `{}` (model `{}`)",
                config.oracle.base_url, config.oracle.model
            ),
        }
    } else {
        // Not a failure: the adapter runs unconfigured and candidates take
        // the fail policy path.
        DoctorCheck {
            name: "oracle_credential",
            status: CheckStatus::Skipped,
            details: format!(
                "no credential configured; confirmations will follow the {:?} policy",
                config.oracle.fail_policy
            ),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
