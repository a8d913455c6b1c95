//! Crate-level error types shared across the repository, configuration, and token layers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Persistence-layer failure, propagated unmodified from the repository.
	#[error("{0}")]
	Repository(
		#[from]
		#[source]
		crate::repo::RepositoryError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token could not be issued or verified.
	#[error(transparent)]
	Token(#[from] crate::token::TokenError),
}

/// Configuration and validation failures raised while building a [`TokenConfig`].
///
/// [`TokenConfig`]: crate::config::TokenConfig
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// The signing secret was missing or empty.
	#[error("Signing secret must not be empty.")]
	EmptySecret,
	/// No expiration window was configured.
	#[error("Token expiration must be configured.")]
	MissingExpiration,
	/// The expiration window was zero or negative.
	#[error("Token expiration must be positive, got {seconds} seconds.")]
	NonPositiveExpiration {
		/// Offending value in seconds.
		seconds: i64,
	},
	/// The password claim policy was not chosen explicitly.
	#[error("Password claim policy must be set explicitly (embed or omit).")]
	MissingPasswordClaim,
	/// Configuration document could not be parsed.
	#[error("Configuration document is malformed at `{path}`.")]
	Parse {
		/// Path of the field that failed to parse.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},
}
impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = e.path().to_string();

		Self::Parse { path, source: e.into_inner() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{repo::RepositoryError, token::TokenError};

	#[test]
	fn repository_error_converts_with_source() {
		let repository_error = RepositoryError::Backend { message: "database unreachable".into() };
		let error: Error = repository_error.clone().into();

		assert!(matches!(error, Error::Repository(_)));
		assert!(error.to_string().contains("database unreachable"));

		let source = StdError::source(&error)
			.expect("Crate error should expose the original repository error as its source.");

		assert_eq!(source.to_string(), repository_error.to_string());
	}

	#[test]
	fn token_and_config_errors_are_transparent() {
		let error: Error = TokenError::Expired.into();

		assert_eq!(error.to_string(), TokenError::Expired.to_string());

		let error: Error = ConfigError::NonPositiveExpiration { seconds: -5 }.into();

		assert!(error.to_string().contains("-5"));
	}
}
