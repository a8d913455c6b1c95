//! Login account snapshot carried inside issued tokens.

// self
use crate::{_prelude::*, account::Secret};

/// Identity record assembled by an authentication endpoint and embedded into tokens.
///
/// The service never owns a login account beyond a single call; callers construct one per
/// request. The password is expected to be pre-hashed upstream and is wrapped in [`Secret`] so
/// it cannot leak through formatting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginAccount {
	/// Account identifier.
	pub account_id: String,
	/// Owning account (tenant or organization) name.
	pub account_name: String,
	/// Login name.
	pub username: String,
	/// Password digest supplied by the caller.
	pub password: Secret,
	/// Display alias.
	pub other_name: String,
	/// Ordered permission strings granted to the account.
	pub permissions: Vec<String>,
}
impl LoginAccount {
	/// Creates an account with no alias and no permissions.
	pub fn new(
		account_id: impl Into<String>,
		account_name: impl Into<String>,
		username: impl Into<String>,
		password: impl Into<Secret>,
	) -> Self {
		Self {
			account_id: account_id.into(),
			account_name: account_name.into(),
			username: username.into(),
			password: password.into(),
			other_name: String::new(),
			permissions: Vec::new(),
		}
	}

	/// Sets the display alias.
	pub fn with_other_name(mut self, other_name: impl Into<String>) -> Self {
		self.other_name = other_name.into();

		self
	}

	/// Replaces the permission list, preserving the provided order.
	pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.permissions = permissions.into_iter().map(Into::into).collect();

		self
	}

	/// Returns `true` if the account was granted the provided permission.
	pub fn has_permission(&self, permission: &str) -> bool {
		self.permissions.iter().any(|p| p == permission)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn builder_keeps_permission_order() {
		let account = LoginAccount::new("1", "hq", "bob", "digest")
			.with_other_name("Bob")
			.with_permissions(["b", "a", "c"]);

		assert_eq!(account.permissions, vec!["b", "a", "c"]);
		assert!(account.has_permission("a"));
		assert!(!account.has_permission("d"));
		assert_eq!(account.other_name, "Bob");
	}

	#[test]
	fn debug_output_redacts_password() {
		let account = LoginAccount::new("1", "hq", "bob", "plain-digest");
		let rendered = format!("{account:?}");

		assert!(!rendered.contains("plain-digest"));
		assert!(rendered.contains("<redacted>"));
	}
}
