//! Persisted user entity and its surrogate key.

// self
use crate::_prelude::*;

/// Numeric surrogate key (`sysno`) identifying a persisted [`User`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserKey(i64);
impl UserKey {
	/// Wraps a raw key value.
	pub const fn new(value: i64) -> Self {
		Self(value)
	}

	/// Returns the raw key value.
	pub const fn get(self) -> i64 {
		self.0
	}

	/// Returns the key following this one, or `None` at the end of the key space.
	pub const fn next(self) -> Option<Self> {
		match self.0.checked_add(1) {
			Some(value) => Some(Self(value)),
			None => None,
		}
	}
}
impl From<i64> for UserKey {
	fn from(value: i64) -> Self {
		Self(value)
	}
}
impl From<UserKey> for i64 {
	fn from(value: UserKey) -> Self {
		value.0
	}
}
impl Display for UserKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		Display::fmt(&self.0, f)
	}
}
impl FromStr for UserKey {
	type Err = std::num::ParseIntError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		s.parse().map(Self)
	}
}

/// User record managed through [`UserRepository`](crate::repo::UserRepository).
///
/// Field names in the serialized form double as filter keys for
/// [`UserFilter`](crate::repo::UserFilter).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Surrogate key; `None` until the repository assigns one.
	pub sysno: Option<UserKey>,
	/// Unique login name.
	pub username: String,
	/// Human-readable name.
	pub display_name: Option<String>,
	/// Contact email.
	pub email: Option<String>,
	/// Contact phone number.
	pub mobile: Option<String>,
	/// Engine-defined status code (for example `1` active, `0` disabled).
	pub status: i32,
	/// Creation instant.
	#[serde(with = "time::serde::timestamp")]
	pub created_at: OffsetDateTime,
	/// Last modification instant.
	#[serde(with = "time::serde::timestamp::option")]
	pub updated_at: Option<OffsetDateTime>,
}
impl User {
	/// Creates an unsaved, active user stamped with the current clock.
	pub fn new(username: impl Into<String>) -> Self {
		Self {
			sysno: None,
			username: username.into(),
			display_name: None,
			email: None,
			mobile: None,
			status: 1,
			created_at: OffsetDateTime::now_utc(),
			updated_at: None,
		}
	}

	/// Assigns the surrogate key.
	pub fn with_sysno(mut self, sysno: impl Into<UserKey>) -> Self {
		self.sysno = Some(sysno.into());

		self
	}

	/// Sets the display name.
	pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
		self.display_name = Some(display_name.into());

		self
	}

	/// Sets the email address.
	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());

		self
	}

	/// Sets the phone number.
	pub fn with_mobile(mut self, mobile: impl Into<String>) -> Self {
		self.mobile = Some(mobile.into());

		self
	}

	/// Sets the status code.
	pub fn with_status(mut self, status: i32) -> Self {
		self.status = status;

		self
	}

	/// Overrides the creation instant.
	pub fn with_created_at(mut self, instant: OffsetDateTime) -> Self {
		self.created_at = instant;

		self
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn user_key_parses_and_orders() {
		let key: UserKey = "42".parse().expect("Numeric key should parse.");

		assert_eq!(key.get(), 42);
		assert_eq!(key.next(), Some(UserKey::new(43)));
		assert_eq!(UserKey::new(i64::MAX).next(), None);
		assert!(UserKey::new(1) < UserKey::new(2));
		assert!("abc".parse::<UserKey>().is_err());
	}

	#[test]
	fn user_serializes_timestamps_as_unix_seconds() {
		let user = User::new("carol")
			.with_sysno(7)
			.with_created_at(macros::datetime!(2025-01-01 00:00 UTC));
		let value = serde_json::to_value(&user).expect("User should serialize to JSON.");

		assert_eq!(value["sysno"], 7);
		assert_eq!(value["created_at"], 1_735_689_600);
		assert!(value["updated_at"].is_null());
	}
}
