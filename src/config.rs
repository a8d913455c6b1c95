//! Token service configuration: signing secret, expiration window, and password claim policy.

// self
use crate::{_prelude::*, account::Secret, error::ConfigError};

/// Whether the login account password travels inside issued tokens.
///
/// Token payloads are only signed, not encrypted, so anything embedded is readable by the
/// bearer. There is no default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordClaim {
	/// Copy the password digest into the `password` claim.
	Embed,
	/// Leave the `password` claim out of issued tokens.
	Omit,
}

/// Validated, read-only settings consumed by [`TokenService`](crate::token::TokenService).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTokenConfig")]
pub struct TokenConfig {
	/// HMAC signing secret.
	pub secret: Secret,
	/// Lifetime of every issued or refreshed token.
	#[serde(serialize_with = "serialize_expiration")]
	pub expiration: Duration,
	/// Password claim policy.
	pub password_claim: PasswordClaim,
}
impl TokenConfig {
	/// Returns a builder with no fields set.
	pub fn builder() -> TokenConfigBuilder {
		TokenConfigBuilder::default()
	}

	/// Parses and validates a JSON document such as
	/// `{"secret":"...","expiration":3600,"password_claim":"omit"}`.
	pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_slice(bytes);

		Ok(serde_path_to_error::deserialize(de)?)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.secret.is_empty() {
			return Err(ConfigError::EmptySecret);
		}
		if !self.expiration.is_positive() {
			return Err(ConfigError::NonPositiveExpiration {
				seconds: self.expiration.whole_seconds(),
			});
		}

		Ok(())
	}
}

/// Builder for [`TokenConfig`].
#[derive(Clone, Debug, Default)]
pub struct TokenConfigBuilder {
	secret: Option<Secret>,
	expiration: Option<Duration>,
	password_claim: Option<PasswordClaim>,
}
impl TokenConfigBuilder {
	/// Sets the signing secret.
	pub fn secret(mut self, secret: impl Into<Secret>) -> Self {
		self.secret = Some(secret.into());

		self
	}

	/// Sets the token lifetime.
	pub fn expiration(mut self, expiration: Duration) -> Self {
		self.expiration = Some(expiration);

		self
	}

	/// Sets the token lifetime in whole seconds.
	pub fn expiration_seconds(self, seconds: i64) -> Self {
		self.expiration(Duration::seconds(seconds))
	}

	/// Chooses whether the password claim is embedded.
	pub fn password_claim(mut self, policy: PasswordClaim) -> Self {
		self.password_claim = Some(policy);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<TokenConfig, ConfigError> {
		let config = TokenConfig {
			secret: self.secret.ok_or(ConfigError::EmptySecret)?,
			expiration: self.expiration.ok_or(ConfigError::MissingExpiration)?,
			password_claim: self.password_claim.ok_or(ConfigError::MissingPasswordClaim)?,
		};

		config.validate()?;

		Ok(config)
	}
}

#[derive(Deserialize)]
struct RawTokenConfig {
	secret: Secret,
	expiration: i64,
	password_claim: PasswordClaim,
}
impl TryFrom<RawTokenConfig> for TokenConfig {
	type Error = ConfigError;

	fn try_from(raw: RawTokenConfig) -> Result<Self, Self::Error> {
		TokenConfig::builder()
			.secret(raw.secret)
			.expiration_seconds(raw.expiration)
			.password_claim(raw.password_claim)
			.build()
	}
}

fn serialize_expiration<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
	S: serde::Serializer,
{
	serializer.serialize_i64(value.whole_seconds())
}
