// self
use crate::{_prelude::*, obs::TokenOp, token::TokenError};

/// A span builder used by token service operations.
#[derive(Clone, Debug)]
pub struct TokenSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl TokenSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(op: TokenOp, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::debug_span!("erp_identity.token", op = op.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (op, stage);

			Self {}
		}
	}

	/// Enters the span for the duration of a synchronous operation.
	pub fn entered(self) -> TokenSpanGuard {
		#[cfg(feature = "tracing")]
		{
			TokenSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			TokenSpanGuard {}
		}
	}
}

/// RAII guard returned by [`TokenSpan::entered`].
pub struct TokenSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for TokenSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("TokenSpanGuard(..)")
	}
}

/// Emits a `debug` event describing why an operation collapsed to an absent/false result.
///
/// Only the error kind and message are logged; token strings and claims never are.
pub fn log_rejection(op: TokenOp, error: &TokenError) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(op = op.as_str(), kind = error.kind(), %error, "token rejected");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (op, error);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_span_noop_without_subscriber() {
		let _guard = TokenSpan::new(TokenOp::Issue, "test").entered();

		log_rejection(TokenOp::Issue, &TokenError::Expired);
	}
}
