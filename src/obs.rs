//! Optional observability helpers for token operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit structured spans named `erp_identity.token` with the `op`
//!   and `stage` (call site) fields, and `debug` events describing why a token was rejected.
//! - Enable `metrics` to increment the `erp_identity_token_total` counter for every
//!   attempt/success/rejection, labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Token service operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenOp {
	/// Signing a fresh token.
	Issue,
	/// Re-signing an existing token with a new expiry window.
	Refresh,
	/// Validity checks.
	Validate,
	/// Claim accessors.
	Inspect,
}
impl TokenOp {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenOp::Issue => "issue",
			TokenOp::Refresh => "refresh",
			TokenOp::Validate => "validate",
			TokenOp::Inspect => "inspect",
		}
	}
}
impl Display for TokenOp {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenOutcome {
	/// Entry to a token service operation.
	Attempt,
	/// Successful completion.
	Success,
	/// The token was rejected or could not be produced; callers saw an absent/false result.
	Rejected,
}
impl TokenOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenOutcome::Attempt => "attempt",
			TokenOutcome::Success => "success",
			TokenOutcome::Rejected => "rejected",
		}
	}
}
impl Display for TokenOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_are_stable() {
		assert_eq!(TokenOp::Refresh.to_string(), "refresh");
		assert_eq!(TokenOp::Inspect.as_str(), "inspect");
		assert_eq!(TokenOutcome::Rejected.to_string(), "rejected");
	}
}
