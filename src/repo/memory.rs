//! Thread-safe in-memory [`UserRepository`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	account::{User, UserKey},
	repo::{RepositoryError, RepositoryFuture, UserFilter, UserRepository, UserTable},
};

type TableHandle = Arc<RwLock<UserTable>>;

/// Thread-safe repository that keeps records in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryUserRepository(TableHandle);
impl MemoryUserRepository {
	/// Number of stored records.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no records are stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn insert_now(table: TableHandle, user: User) -> Result<UserKey, RepositoryError> {
		table.write().insert(user)
	}

	fn delete_now(table: TableHandle, key: UserKey) -> u64 {
		table.write().remove(key)
	}

	fn update_now(table: TableHandle, user: User) -> u64 {
		table.write().update(user)
	}

	fn get_now(table: TableHandle, key: UserKey) -> Option<User> {
		table.read().get(key)
	}
}
impl UserRepository for MemoryUserRepository {
	fn insert(&self, user: User) -> RepositoryFuture<'_, UserKey> {
		let table = self.0.clone();

		Box::pin(async move { Self::insert_now(table, user) })
	}

	fn delete(&self, key: UserKey) -> RepositoryFuture<'_, u64> {
		let table = self.0.clone();

		Box::pin(async move { Ok(Self::delete_now(table, key)) })
	}

	fn update(&self, user: User) -> RepositoryFuture<'_, u64> {
		let table = self.0.clone();

		Box::pin(async move { Ok(Self::update_now(table, user)) })
	}

	fn get(&self, key: UserKey) -> RepositoryFuture<'_, Option<User>> {
		let table = self.0.clone();

		Box::pin(async move { Ok(Self::get_now(table, key)) })
	}

	fn select<'a>(&'a self, filter: &'a UserFilter) -> RepositoryFuture<'a, Vec<User>> {
		Box::pin(async move { self.0.read().select(filter) })
	}
}
