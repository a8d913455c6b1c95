//! HS256 JWT issuance, refresh, validation, and claim inspection.
//!
//! [`TokenService`] keeps no state besides its keys: validity is re-derived from the token and
//! the shared secret on every call, and there is no revocation list. The public accessors
//! collapse every failure into an absent or `false` result; [`TokenService::decode`] exposes
//! the typed [`TokenError`] for callers that need to tell causes apart.

pub mod claims;
pub mod service;

pub use claims::*;
pub use service::*;

// crates.io
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
// self
use crate::_prelude::*;

/// Reasons a token could not be issued or was rejected.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum TokenError {
	/// The token is not a well-formed JWS or its payload does not decode into claims.
	#[error("Token is malformed: {reason}.")]
	Malformed {
		/// Decoder-supplied reason string.
		reason: String,
	},
	/// The signature does not match the configured secret.
	#[error("Token signature does not match.")]
	InvalidSignature,
	/// The expiration instant is not in the future.
	#[error("Token has expired.")]
	Expired,
	/// A claim required by the operation is absent.
	#[error("Token is missing the `{claim}` claim.")]
	MissingClaim {
		/// Wire name of the missing claim.
		claim: String,
	},
	/// The token is valid but belongs to a different account.
	#[error("Token does not belong to the provided account.")]
	AccountMismatch,
	/// The encoder failed to sign the claim set.
	#[error("Token could not be signed: {reason}.")]
	Encode {
		/// Encoder-supplied reason string.
		reason: String,
	},
}
impl TokenError {
	/// Builds a [`TokenError::MissingClaim`] for the provided claim name.
	pub fn missing_claim(claim: impl Into<String>) -> Self {
		Self::MissingClaim { claim: claim.into() }
	}

	/// Returns a stable label suitable for log fields.
	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Malformed { .. } => "malformed",
			Self::InvalidSignature => "invalid_signature",
			Self::Expired => "expired",
			Self::MissingClaim { .. } => "missing_claim",
			Self::AccountMismatch => "account_mismatch",
			Self::Encode { .. } => "encode",
		}
	}
}
impl From<JwtError> for TokenError {
	fn from(e: JwtError) -> Self {
		match e.kind() {
			JwtErrorKind::InvalidSignature => Self::InvalidSignature,
			JwtErrorKind::ExpiredSignature => Self::Expired,
			JwtErrorKind::MissingRequiredClaim(claim) => Self::missing_claim(claim.as_str()),
			_ => Self::Malformed { reason: e.to_string() },
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn decoder_errors_map_onto_token_errors() {
		assert_eq!(
			TokenError::from(JwtError::from(JwtErrorKind::InvalidSignature)),
			TokenError::InvalidSignature
		);
		assert_eq!(
			TokenError::from(JwtError::from(JwtErrorKind::ExpiredSignature)),
			TokenError::Expired
		);
		assert_eq!(
			TokenError::from(JwtError::from(JwtErrorKind::MissingRequiredClaim("exp".into()))),
			TokenError::missing_claim("exp")
		);
		assert_eq!(
			TokenError::from(JwtError::from(JwtErrorKind::InvalidToken)).kind(),
			"malformed"
		);
	}
}
