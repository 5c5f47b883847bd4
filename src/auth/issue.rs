//! Out-of-band credential issuance.

// crates.io
use rand::RngCore;
// self
use crate::{
	_prelude::*,
	auth::credential_digest,
	secret::Secret,
	store::{HashEntry, HashStore, StoreError},
};

const KEY_BYTES: usize = 16;

/// Generates a random credential, appends its digest to `store`, and returns the plaintext.
///
/// The plaintext is not persisted anywhere; this is the only time it is available.
pub async fn issue_credential(store: &dyn HashStore) -> Result<Secret, StoreError> {
	let key = generate_key();

	store.append(HashEntry::new(credential_digest(&key))).await?;

	Ok(Secret::new(key))
}

fn generate_key() -> String {
	let mut bytes = [0_u8; KEY_BYTES];

	rand::rng().fill_bytes(&mut bytes);

	bytes.iter().map(|b| format!("{b:02x}")).collect()
}
