//! ERP identity building blocks: a swappable user repository contract and an HS256 JWT token
//! service that issues, refreshes, validates, and inspects bearer tokens carrying login account
//! claims.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod account;
pub mod config;
pub mod error;
pub mod obs;
pub mod repo;
pub mod token;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		account::{LoginAccount, User},
		config::{PasswordClaim, TokenConfig},
		repo::{MemoryUserRepository, UserRepository},
		token::TokenService,
	};

	/// Signing secret shared by test fixtures.
	pub const TEST_SECRET: &str = "erp-identity-test-secret";

	/// Builds a [`TokenService`] that embeds the password claim and uses the provided expiry.
	pub fn build_test_token_service(expiration: Duration) -> TokenService {
		let config = TokenConfig::builder()
			.secret(TEST_SECRET)
			.expiration(expiration)
			.password_claim(PasswordClaim::Embed)
			.build()
			.expect("Test token configuration should be valid.");

		TokenService::new(&config)
	}

	/// Returns a login account fixture with two permissions.
	pub fn test_login_account() -> LoginAccount {
		LoginAccount::new("10001", "Headquarters", "alice", "5f4dcc3b5aa765d61d8327deb882cf99")
			.with_other_name("Alice Liu")
			.with_permissions(["erp:user:read", "erp:user:write"])
	}

	/// Constructs an in-memory repository seeded with the provided users.
	pub async fn build_seeded_repository(
		users: impl IntoIterator<Item = User>,
	) -> (Arc<dyn UserRepository>, Arc<MemoryUserRepository>) {
		let backend = Arc::new(MemoryUserRepository::default());
		let repository: Arc<dyn UserRepository> = backend.clone();

		for user in users {
			repository.insert(user).await.expect("Seeding the memory repository should succeed.");
		}

		(repository, backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

pub use jsonwebtoken;
