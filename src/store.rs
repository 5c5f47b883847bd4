//! Credential hash storage: the persisted set of digests request credentials are checked against.

pub mod file;
pub mod memory;

pub use file::FileHashStore;
pub use memory::MemoryHashStore;

// self
use crate::_prelude::*;

/// Boxed future returned by [`HashStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Lookup and append capability over credential digests.
///
/// A failed read is a [`StoreError`], never `Ok(false)`: callers must be able to tell
/// "store unavailable" from "credential unknown".
pub trait HashStore
where
	Self: Send + Sync,
{
	/// Returns whether `digest` (lowercase hex SHA-256) is present.
	fn contains<'a>(&'a self, digest: &'a str) -> StoreFuture<'a, bool>;

	/// Appends an entry; duplicates are allowed.
	fn append(&self, entry: HashEntry) -> StoreFuture<'_, ()>;
}

/// Persisted digest of a valid credential.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashEntry {
	/// Lowercase hex SHA-256 digest.
	pub hash: String,
}
impl HashEntry {
	/// Wraps an already computed digest.
	pub fn new(hash: impl Into<String>) -> Self {
		Self { hash: hash.into() }
	}
}

/// Error type produced by [`HashStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum StoreError {
	/// Stored data could not be encoded or decoded.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure, e.g. an unreadable file.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn hash_entry_uses_hash_field_on_the_wire() {
		let payload = serde_json::to_string(&[HashEntry::new("ab12")])
			.expect("Hash entries should serialize to JSON.");

		assert_eq!(payload, r#"[{"hash":"ab12"}]"#);
	}

	#[test]
	fn store_error_messages_name_the_failure() {
		let err = StoreError::Backend { message: "keysHash.json is missing".into() };

		assert_eq!(err.to_string(), "Backend failure: keysHash.json is missing.");
	}
}
