//! Thread-safe in-memory [`HashStore`] for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{HashEntry, HashStore, StoreFuture},
};

/// Hash store that keeps entries in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryHashStore(Arc<RwLock<Vec<HashEntry>>>);
impl MemoryHashStore {
	/// Seeds a store with existing digests.
	pub fn with_digests<I, S>(digests: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(Arc::new(RwLock::new(digests.into_iter().map(HashEntry::new).collect())))
	}

	/// Returns a snapshot of every entry in insertion order.
	pub fn entries(&self) -> Vec<HashEntry> {
		self.0.read().clone()
	}
}
impl HashStore for MemoryHashStore {
	fn contains<'a>(&'a self, digest: &'a str) -> StoreFuture<'a, bool> {
		let found = self.0.read().iter().any(|entry| entry.hash == digest);

		Box::pin(async move { Ok(found) })
	}

	fn append(&self, entry: HashEntry) -> StoreFuture<'_, ()> {
		self.0.write().push(entry);

		Box::pin(async { Ok(()) })
	}
}
