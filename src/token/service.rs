//! Stateless token service built on `jsonwebtoken`.

// crates.io
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
// self
use crate::{
	_prelude::*,
	account::LoginAccount,
	config::{PasswordClaim, TokenConfig},
	obs::{self, TokenOp, TokenOutcome, TokenSpan},
	token::{TokenClaims, TokenError},
};

/// Fixed symmetric signing algorithm.
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Issues and verifies HS256 bearer tokens.
///
/// The service is immutable after construction and safe to share across threads. Every
/// `*_at` variant takes the instant to treat as "now"; the plain variants use the UTC clock.
#[derive(Clone)]
pub struct TokenService {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	validation: Validation,
	expiration: Duration,
	password_claim: PasswordClaim,
}
impl TokenService {
	/// Builds a service from validated configuration.
	pub fn new(config: &TokenConfig) -> Self {
		let secret = config.secret.expose().as_bytes();
		let mut validation = Validation::new(ALGORITHM);

		// Expiry is compared against the caller-supplied instant instead.
		validation.validate_exp = false;
		validation.validate_aud = false;
		validation.leeway = 0;

		Self {
			encoding_key: EncodingKey::from_secret(secret),
			decoding_key: DecodingKey::from_secret(secret),
			validation,
			expiration: config.expiration,
			password_claim: config.password_claim,
		}
	}

	/// Lifetime applied to every issued token.
	pub fn expiration(&self) -> Duration {
		self.expiration
	}

	/// Password claim policy in effect.
	pub fn password_claim(&self) -> PasswordClaim {
		self.password_claim
	}

	/// Signs the claim set with a fresh expiry window.
	pub fn issue(&self, claims: TokenClaims) -> Result<String, TokenError> {
		self.issue_at(claims, OffsetDateTime::now_utc())
	}

	/// Signs the claim set with `exp = instant + expiration`.
	pub fn issue_at(
		&self,
		claims: TokenClaims,
		instant: OffsetDateTime,
	) -> Result<String, TokenError> {
		self.observe(TokenOp::Issue, "issue", || self.sign(claims, instant))
	}

	/// Signs the fixed login account claim set.
	pub fn issue_for_account(&self, account: &LoginAccount) -> Result<String, TokenError> {
		self.issue_for_account_at(account, OffsetDateTime::now_utc())
	}

	/// Signs the fixed login account claim set relative to `instant`.
	pub fn issue_for_account_at(
		&self,
		account: &LoginAccount,
		instant: OffsetDateTime,
	) -> Result<String, TokenError> {
		let claims = TokenClaims::for_account(account, self.password_claim);

		self.observe(TokenOp::Issue, "issue_for_account", || self.sign(claims, instant))
	}

	/// Re-signs a valid token with `created = now` and a fresh expiry window.
	///
	/// Expired, forged, or malformed tokens yield `None`.
	pub fn refresh(&self, token: &str) -> Option<String> {
		self.refresh_at(token, OffsetDateTime::now_utc())
	}

	/// Re-signs a token relative to `instant`.
	pub fn refresh_at(&self, token: &str, instant: OffsetDateTime) -> Option<String> {
		self.observe(TokenOp::Refresh, "refresh", || {
			let mut claims = self.decode_at(token, instant)?;

			claims.stamp_created(instant);

			self.sign(claims, instant)
		})
		.ok()
	}

	/// Returns `true` iff the token verifies and has not expired.
	pub fn validate(&self, token: &str) -> bool {
		self.validate_at(token, OffsetDateTime::now_utc())
	}

	/// Returns `true` iff the token verifies and expires after `instant`.
	pub fn validate_at(&self, token: &str, instant: OffsetDateTime) -> bool {
		self.observe(TokenOp::Validate, "validate", || self.decode_at(token, instant)).is_ok()
	}

	/// Returns `true` iff the token is valid and its `accountId` and `username` claims equal the
	/// account's.
	pub fn validate_for_account(&self, token: &str, account: &LoginAccount) -> bool {
		self.validate_for_account_at(token, account, OffsetDateTime::now_utc())
	}

	/// Account-bound validation relative to `instant`.
	pub fn validate_for_account_at(
		&self,
		token: &str,
		account: &LoginAccount,
		instant: OffsetDateTime,
	) -> bool {
		self.observe(TokenOp::Validate, "validate_for_account", || {
			let claims = self.decode_at(token, instant)?;
			let same_id = claims.account_id.as_deref() == Some(account.account_id.as_str());
			let same_username = claims.username.as_deref() == Some(account.username.as_str());

			if same_id && same_username { Ok(()) } else { Err(TokenError::AccountMismatch) }
		})
		.is_ok()
	}

	/// Returns the subject (`sub`) of a valid token.
	pub fn account_from_token(&self, token: &str) -> Option<String> {
		self.inspect(token, "account_from_token", |claims| {
			claims.subject.ok_or_else(|| TokenError::missing_claim("sub"))
		})
	}

	/// Rebuilds the login account carried by a valid token.
	pub fn login_account_from_token(&self, token: &str) -> Option<LoginAccount> {
		self.inspect(token, "login_account_from_token", |claims| {
			claims.login_account(self.password_claim)
		})
	}

	/// Looks up any claim of a valid token by wire name.
	pub fn value_from_token(&self, token: &str, key: &str) -> Option<JsonValue> {
		self.inspect(token, "value_from_token", |claims| {
			claims.value(key).ok_or_else(|| TokenError::missing_claim(key))
		})
	}

	/// Returns the `created` stamp of a valid token.
	pub fn created_at_from_token(&self, token: &str) -> Option<OffsetDateTime> {
		self.inspect(token, "created_at_from_token", |claims| {
			claims.created_at().ok_or_else(|| TokenError::missing_claim("created"))
		})
	}

	/// Returns the expiration of a valid token.
	pub fn expires_at_from_token(&self, token: &str) -> Option<OffsetDateTime> {
		self.inspect(token, "expires_at_from_token", |claims| {
			claims.expires_at().ok_or_else(|| TokenError::missing_claim("exp"))
		})
	}

	/// Verifies the signature and expiry, reporting the typed failure cause.
	pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
		self.decode_at(token, OffsetDateTime::now_utc())
	}

	/// Verifies the signature and checks `exp` against `instant`.
	pub fn decode_at(
		&self,
		token: &str,
		instant: OffsetDateTime,
	) -> Result<TokenClaims, TokenError> {
		let claims = self.verify(token)?;
		let expiration = claims.expiration.ok_or_else(|| TokenError::missing_claim("exp"))?;

		if expiration <= instant.unix_timestamp() {
			return Err(TokenError::Expired);
		}

		Ok(claims)
	}

	fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
		let data =
			jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;

		Ok(data.claims)
	}

	fn sign(&self, mut claims: TokenClaims, instant: OffsetDateTime) -> Result<String, TokenError> {
		let expires_at = instant.checked_add(self.expiration).ok_or_else(|| TokenError::Encode {
			reason: "expiration falls outside the supported date range".into(),
		})?;

		claims.strip_reserved_extras();
		claims.expiration = Some(expires_at.unix_timestamp());

		jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
			.map_err(|e| TokenError::Encode { reason: e.to_string() })
	}

	fn inspect<T>(
		&self,
		token: &str,
		stage: &'static str,
		extract: impl FnOnce(TokenClaims) -> Result<T, TokenError>,
	) -> Option<T> {
		self.observe(TokenOp::Inspect, stage, || extract(self.decode(token)?)).ok()
	}

	fn observe<T>(
		&self,
		op: TokenOp,
		stage: &'static str,
		f: impl FnOnce() -> Result<T, TokenError>,
	) -> Result<T, TokenError> {
		let _span = TokenSpan::new(op, stage).entered();

		obs::record_token_outcome(op, TokenOutcome::Attempt);

		let result = f();

		match &result {
			Ok(_) => obs::record_token_outcome(op, TokenOutcome::Success),
			Err(e) => {
				obs::record_token_outcome(op, TokenOutcome::Rejected);
				obs::log_rejection(op, e);
			},
		}

		result
	}
}
impl Debug for TokenService {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenService")
			.field("algorithm", &ALGORITHM)
			.field("keys", &"<redacted>")
			.field("expiration", &self.expiration)
			.field("password_claim", &self.password_claim)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	use time::macros;
	// self
	use super::*;

	const NOW: OffsetDateTime = macros::datetime!(2025-03-01 08:00 UTC);

	fn service(password_claim: PasswordClaim) -> TokenService {
		let config = TokenConfig::builder()
			.secret("unit-secret")
			.expiration(Duration::hours(1))
			.password_claim(password_claim)
			.build()
			.expect("Token configuration fixture should be valid.");

		TokenService::new(&config)
	}

	fn account() -> LoginAccount {
		LoginAccount::new("42", "hq", "ivan", "digest")
			.with_other_name("Ivan")
			.with_permissions(["x"])
	}

	#[test]
	fn issued_tokens_are_three_segment_hs256() {
		let token = service(PasswordClaim::Omit)
			.issue_at(TokenClaims::new().with_subject("alice"), NOW)
			.expect("Issuing should succeed.");
		let header = jsonwebtoken::decode_header(&token).expect("Header should decode.");

		assert_eq!(token.split('.').count(), 3);
		assert_eq!(header.alg, Algorithm::HS256);
	}

	#[test]
	fn expiry_is_checked_against_the_supplied_instant() {
		let service = service(PasswordClaim::Omit);
		let token = service.issue_at(TokenClaims::new(), NOW).expect("Issuing should succeed.");

		assert!(service.validate_at(&token, NOW));
		assert!(service.validate_at(&token, NOW + Duration::minutes(59)));
		assert!(!service.validate_at(&token, NOW + Duration::hours(1)));
		assert_eq!(service.decode_at(&token, NOW + Duration::hours(2)), Err(TokenError::Expired));
	}

	#[test]
	fn refresh_stamps_created_within_the_validity_window() {
		let service = service(PasswordClaim::Omit);
		let token = service
			.issue_at(TokenClaims::new().with_subject("judy"), NOW)
			.expect("Issuing should succeed.");
		let later = NOW + Duration::minutes(45);
		let refreshed = service.refresh_at(&token, later).expect("Refresh should succeed.");
		let claims =
			service.decode_at(&refreshed, later).expect("Refreshed token should be valid.");

		assert_eq!(claims.subject.as_deref(), Some("judy"));
		assert_eq!(claims.created_at(), Some(later));
		assert_eq!(claims.expires_at(), Some(later + Duration::hours(1)));
	}

	#[test]
	fn refresh_rejects_expired_tokens() {
		let service = service(PasswordClaim::Omit);
		let token = service
			.issue_at(TokenClaims::new().with_subject("judy"), NOW)
			.expect("Issuing should succeed.");

		assert!(service.refresh_at(&token, NOW + Duration::hours(1)).is_none());
		assert!(service.refresh_at(&token, NOW + Duration::days(3650)).is_none());
	}

	#[test]
	fn foreign_signatures_are_rejected() {
		let ours = service(PasswordClaim::Omit);
		let theirs = TokenService::new(
			&TokenConfig::builder()
				.secret("other-secret")
				.expiration_seconds(3600)
				.password_claim(PasswordClaim::Omit)
				.build()
				.expect("Foreign configuration fixture should be valid."),
		);
		let token = theirs.issue_at(TokenClaims::new(), NOW).expect("Issuing should succeed.");

		assert_eq!(ours.decode_at(&token, NOW), Err(TokenError::InvalidSignature));
		assert!(ours.refresh_at(&token, NOW).is_none());
		assert!(!ours.validate_at(&token, NOW));
	}

	#[test]
	fn account_binding_requires_matching_id_and_username() {
		let service = service(PasswordClaim::Embed);
		let token = service.issue_for_account_at(&account(), NOW).expect("Issuing should succeed.");

		assert!(service.validate_for_account_at(&token, &account(), NOW));

		let mut other_id = account();

		other_id.account_id = "43".into();

		assert!(!service.validate_for_account_at(&token, &other_id, NOW));

		let mut other_username = account();

		other_username.username = "mallory".into();

		assert!(!service.validate_for_account_at(&token, &other_username, NOW));
		assert!(!service.validate_for_account_at(&token, &account(), NOW + Duration::hours(2)));
	}

	#[test]
	fn reserved_extra_claims_cannot_override_expiry() {
		let service = service(PasswordClaim::Omit);
		let token = service
			.issue_at(TokenClaims::new().with_claim("exp", i64::MAX).with_claim("dept", 7), NOW)
			.expect("Issuing should succeed.");
		let claims = service.decode_at(&token, NOW).expect("Token should be valid.");

		assert_eq!(claims.expires_at(), Some(NOW + Duration::hours(1)));
		assert_eq!(claims.value("dept"), Some(json!(7)));
	}

	#[test]
	fn embedded_login_account_survives_refresh() {
		let service = crate::_preludet::build_test_token_service(Duration::minutes(15));
		let account = crate::_preludet::test_login_account();
		let token = service.issue_for_account_at(&account, NOW).expect("Issuing should succeed.");
		let refreshed = service
			.refresh_at(&token, NOW + Duration::minutes(10))
			.expect("Refresh should succeed.");
		let claims = service
			.decode_at(&refreshed, NOW + Duration::minutes(10))
			.expect("Refreshed token should be valid.");

		assert_eq!(claims.login_account(PasswordClaim::Embed), Ok(account));
		assert_eq!(claims.expires_at(), Some(NOW + Duration::minutes(25)));
	}

	#[test]
	fn debug_output_hides_keys() {
		let rendered = format!("{:?}", service(PasswordClaim::Omit));

		assert!(!rendered.contains("unit-secret"));
		assert!(rendered.contains("HS256"));
	}
}
