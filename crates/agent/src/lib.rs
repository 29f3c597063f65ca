//! Confirmation oracle adapter.
//!
//! Bridges the engine's [`ConfirmationOracle`] seam to the remote
//! Perplexity-style chat completion API. The remote service is strictly a
//! judge: it answers YES or NO for one ingredient/product pair at a time and
//! never influences which candidates are generated.
//!
//! Every failure mode (missing credential, non-success status, timeout,
//! transport error, empty completion) is folded into an outcome through the
//! configured [`FailPolicy`]; nothing in this crate returns an error to the
//! engine.
//!
//! [`ConfirmationOracle`]: crossell_core::ConfirmationOracle
//! [`FailPolicy`]: crossell_core::FailPolicy

pub mod perplexity;
pub mod prompt;

pub use perplexity::PerplexityOracle;
