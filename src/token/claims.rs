//! Structured claim set carried by issued tokens.

// self
use crate::{
	_prelude::*,
	account::{LoginAccount, Secret},
	config::PasswordClaim,
	token::TokenError,
};

/// Wire names of the claims modeled as typed fields.
pub const RESERVED_CLAIMS: [&str; 9] = [
	"sub",
	"exp",
	"created",
	"accountId",
	"accountName",
	"username",
	"password",
	"otherName",
	"permissions",
];

/// Claim set embedded in a token.
///
/// Registered and identity claims are typed fields; anything else a caller adds lives in
/// [`extra`](Self::extra). `exp` is unix seconds and `created` is unix milliseconds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
	/// Subject (`sub`), the account the token was issued to.
	#[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
	pub subject: Option<String>,
	/// Expiration (`exp`) in unix seconds; overwritten on every issue.
	#[serde(rename = "exp", default, skip_serializing_if = "Option::is_none")]
	pub expiration: Option<i64>,
	/// Refresh stamp (`created`) in unix milliseconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created: Option<i64>,
	/// Account identifier (`accountId`).
	#[serde(rename = "accountId", default, skip_serializing_if = "Option::is_none")]
	pub account_id: Option<String>,
	/// Account name (`accountName`).
	#[serde(rename = "accountName", default, skip_serializing_if = "Option::is_none")]
	pub account_name: Option<String>,
	/// Login name (`username`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	/// Password digest (`password`); only present under [`PasswordClaim::Embed`].
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub password: Option<Secret>,
	/// Display alias (`otherName`).
	#[serde(rename = "otherName", default, skip_serializing_if = "Option::is_none")]
	pub other_name: Option<String>,
	/// Ordered permission list (`permissions`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub permissions: Option<Vec<String>>,
	/// Additional caller-defined claims.
	#[serde(flatten)]
	pub extra: BTreeMap<String, JsonValue>,
}
impl TokenClaims {
	/// Creates an empty claim set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds the fixed login account claim set; `sub` carries the username.
	pub fn for_account(account: &LoginAccount, password_claim: PasswordClaim) -> Self {
		Self {
			subject: Some(account.username.clone()),
			account_id: Some(account.account_id.clone()),
			account_name: Some(account.account_name.clone()),
			username: Some(account.username.clone()),
			password: match password_claim {
				PasswordClaim::Embed => Some(account.password.clone()),
				PasswordClaim::Omit => None,
			},
			other_name: Some(account.other_name.clone()),
			permissions: Some(account.permissions.clone()),
			..Self::default()
		}
	}

	/// Sets the subject.
	pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
		self.subject = Some(subject.into());

		self
	}

	/// Adds a caller-defined claim. Reserved names are dropped when the token is issued; use the
	/// typed fields for those.
	pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
		self.extra.insert(key.into(), value.into());

		self
	}

	/// Expiration as an instant.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		OffsetDateTime::from_unix_timestamp(self.expiration?).ok()
	}

	/// Refresh stamp as an instant.
	pub fn created_at(&self) -> Option<OffsetDateTime> {
		let nanos = i128::from(self.created?) * 1_000_000;

		OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
	}

	/// Stamps `created` with the provided instant (millisecond precision).
	pub fn stamp_created(&mut self, instant: OffsetDateTime) {
		let millis = instant.unix_timestamp_nanos() / 1_000_000;

		self.created = i64::try_from(millis).ok();
	}

	/// Generic lookup by wire name across typed and extra claims.
	pub fn value(&self, key: &str) -> Option<JsonValue> {
		if let Some(value) = self.extra.get(key) {
			return Some(value.clone());
		}

		match serde_json::to_value(self).ok()? {
			JsonValue::Object(mut map) => map.remove(key),
			_ => None,
		}
	}

	/// Rebuilds a login account, requiring every account claim.
	///
	/// Under [`PasswordClaim::Omit`] the password is not expected and comes back empty.
	pub fn login_account(
		&self,
		password_claim: PasswordClaim,
	) -> Result<LoginAccount, TokenError> {
		fn require<T: Clone>(value: &Option<T>, claim: &str) -> Result<T, TokenError> {
			value.clone().ok_or_else(|| TokenError::missing_claim(claim))
		}

		let password = match password_claim {
			PasswordClaim::Embed => require(&self.password, "password")?,
			PasswordClaim::Omit => self.password.clone().unwrap_or_default(),
		};

		Ok(LoginAccount {
			account_id: require(&self.account_id, "accountId")?,
			account_name: require(&self.account_name, "accountName")?,
			username: require(&self.username, "username")?,
			password,
			other_name: require(&self.other_name, "otherName")?,
			permissions: require(&self.permissions, "permissions")?,
		})
	}

	/// Drops extra claims that shadow typed fields.
	pub(crate) fn strip_reserved_extras(&mut self) {
		self.extra.retain(|key, _| !RESERVED_CLAIMS.contains(&key.as_str()));
	}
}
