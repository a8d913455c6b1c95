//! User repository contract and its in-memory reference implementation.
//!
//! [`UserRepository`] is the whole persistence surface: insert, delete, update, point lookup,
//! and filtered selection. SQL mapping, schemas, and connection handling belong to whichever
//! engine implements the trait; callers only hold `Arc<dyn UserRepository>` so engines can be
//! swapped without touching them. Failures propagate unmodified as [`RepositoryError`].

pub mod filter;
pub mod memory;

pub use filter::*;
pub use memory::MemoryUserRepository;

// self
use crate::{
	_prelude::*,
	account::{User, UserKey},
};

/// Boxed future returned by every [`UserRepository`] operation.
pub type RepositoryFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, RepositoryError>> + 'a + Send>>;

/// Storage backend contract for [`User`] records.
pub trait UserRepository
where
	Self: Send + Sync,
{
	/// Persists a new record and returns its key.
	///
	/// Records without a `sysno` receive a key above every key issued so far, so deleted keys are
	/// never reused. Inserting an existing key is a [`RepositoryError::Conflict`].
	fn insert(&self, user: User) -> RepositoryFuture<'_, UserKey>;

	/// Removes the record with the provided key and returns the affected-row count (`0` when
	/// absent).
	fn delete(&self, key: UserKey) -> RepositoryFuture<'_, u64>;

	/// Replaces the record identified by `user.sysno` and returns the affected-row count (`0`
	/// when the key is unset or unknown).
	fn update(&self, user: User) -> RepositoryFuture<'_, u64>;

	/// Fetches the record with the provided key, if present.
	fn get(&self, key: UserKey) -> RepositoryFuture<'_, Option<User>>;

	/// Returns every record matching the filter, ordered by ascending key.
	fn select<'a>(&'a self, filter: &'a UserFilter) -> RepositoryFuture<'a, Vec<User>>;
}

/// Error type produced by [`UserRepository`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum RepositoryError {
	/// A record with the same key already exists.
	#[error("User {sysno} already exists.")]
	Conflict {
		/// Conflicting key.
		sysno: UserKey,
	},
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine (connectivity, I/O, constraints).
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Keyed rows plus the highest key ever handed out, so deleted keys are never reissued.
#[derive(Clone, Debug, Default)]
pub(crate) struct UserTable {
	rows: BTreeMap<UserKey, User>,
	high_water: Option<UserKey>,
}
impl UserTable {
	pub(crate) fn len(&self) -> usize {
		self.rows.len()
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub(crate) fn get(&self, key: UserKey) -> Option<User> {
		self.rows.get(&key).cloned()
	}

	/// Inserts a row, allocating a key above the high-water mark when the record has none.
	pub(crate) fn insert(&mut self, mut user: User) -> Result<UserKey, RepositoryError> {
		let key = match user.sysno {
			Some(key) if self.rows.contains_key(&key) =>
				return Err(RepositoryError::Conflict { sysno: key }),
			Some(key) => key,
			None => match self.high_water {
				Some(last) => last.next().ok_or_else(|| RepositoryError::Backend {
					message: "User key space is exhausted".into(),
				})?,
				None => UserKey::new(1),
			},
		};

		user.sysno = Some(key);
		self.rows.insert(key, user);
		self.high_water = self.high_water.max(Some(key));

		Ok(key)
	}

	/// Removes a row, returning the affected-row count.
	pub(crate) fn remove(&mut self, key: UserKey) -> u64 {
		self.rows.remove(&key).map_or(0, |_| 1)
	}

	/// Replaces an existing row and stamps `updated_at`, returning the affected-row count.
	pub(crate) fn update(&mut self, mut user: User) -> u64 {
		let Some(key) = user.sysno else {
			return 0;
		};

		match self.rows.get_mut(&key) {
			Some(row) => {
				user.updated_at = Some(OffsetDateTime::now_utc());
				*row = user;

				1
			},
			None => 0,
		}
	}

	/// Evaluates a filter over the rows in key order.
	pub(crate) fn select(&self, filter: &UserFilter) -> Result<Vec<User>, RepositoryError> {
		if filter.is_empty() {
			return Ok(self.rows.values().cloned().collect());
		}

		let mut matched = Vec::new();

		for user in self.rows.values() {
			let record = serde_json::to_value(user).map_err(|e| RepositoryError::Serialization {
				message: format!("Failed to project user {:?} for filtering: {e}", user.sysno),
			})?;

			if filter.matches(&record) {
				matched.push(user.clone());
			}
		}

		Ok(matched)
	}
}
