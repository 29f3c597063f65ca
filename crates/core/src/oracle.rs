//! Confirmation oracle contract.
//!
//! The oracle is an external semantic-reasoning service that vets whether a
//! statistically similar match is a plausible real-world ingredient
//! substitution. It is the single point of non-determinism and network
//! latency in the pipeline, so the contract is deliberately narrow: one
//! candidate in, one outcome out, and infrastructure failures are folded
//! into outcomes by the adapter instead of surfacing as errors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Everything the oracle needs to judge one candidate: the ingredient, the
/// suggested product, and the originating catalogue item's descriptive
/// fields for context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub ingredient: String,
    pub candidate_product: String,
    pub catalogue_item_name: String,
    pub category: String,
    pub description: String,
    pub ingredient_text: String,
}

/// The oracle's judgement. Never cached: repeated pairs are re-queried on
/// every invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmationOutcome {
    pub confirmed: bool,
    pub reasoning: String,
}

#[async_trait]
pub trait ConfirmationOracle: Send + Sync {
    /// Judge one candidate. Implementations must not fail: credential or
    /// transport problems are mapped through a [`FailPolicy`].
    async fn confirm(&self, request: &ConfirmationRequest) -> ConfirmationOutcome;
}

/// What to do when the oracle cannot be reached (missing credential,
/// non-success response, timeout, transport error).
///
/// Fail-open prioritizes recall: every high-similarity candidate passes.
/// Fail-closed prioritizes precision: unreachable oracle rejects everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailPolicy {
    #[default]
    FailOpen,
    FailClosed,
}

impl FailPolicy {
    /// The outcome substituted when the oracle is unavailable. `detail`
    /// names the failure path so downstream reasoning text is diagnosable.
    pub fn fallback_outcome(&self, detail: &str) -> ConfirmationOutcome {
        match self {
            Self::FailOpen => ConfirmationOutcome {
                confirmed: true,
                reasoning: format!("oracle unavailable, accepted by fail-open policy: {detail}"),
            },
            Self::FailClosed => ConfirmationOutcome {
                confirmed: false,
                reasoning: format!("oracle unavailable, rejected by fail-closed policy: {detail}"),
            },
        }
    }
}

impl std::str::FromStr for FailPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail_open" | "fail-open" | "open" => Ok(Self::FailOpen),
            "fail_closed" | "fail-closed" | "closed" => Ok(Self::FailClosed),
            other => Err(format!("unsupported fail policy `{other}` (expected fail_open|fail_closed)")),
        }
    }
}

/// Interpret the oracle's natural-language reply.
///
/// A reply starting with "YES" (case-insensitive) confirms, "NO" rejects,
/// and anything else is treated as a rejection with the raw reply preserved
/// as reasoning.
pub fn parse_reply(reply: &str) -> ConfirmationOutcome {
    let trimmed = reply.trim();
    let upper = trimmed.to_uppercase();

    if upper.starts_with("YES") {
        ConfirmationOutcome { confirmed: true, reasoning: trimmed.to_owned() }
    } else {
        // "NO" and unclear replies both reject; the reply text carries the
        // distinction for auditing.
        ConfirmationOutcome { confirmed: false, reasoning: trimmed.to_owned() }
    }
}
