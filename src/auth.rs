//! Credential checks against the hash store, plus out-of-band credential issuance.

pub mod gate;
pub mod issue;

pub use gate::*;
pub use issue::*;

// crates.io
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest of `credential`, the form persisted in the hash store.
pub fn credential_digest(credential: &str) -> String {
	let mut hasher = Sha256::new();

	hasher.update(credential.as_bytes());

	format!("{:x}", hasher.finalize())
}
