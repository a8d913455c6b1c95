// self
use crate::obs::{TokenOp, TokenOutcome};

/// Records a token operation outcome via the global metrics recorder (when enabled).
pub fn record_token_outcome(op: TokenOp, outcome: TokenOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"erp_identity_token_total",
			"op" => op.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (op, outcome);
	}
}
