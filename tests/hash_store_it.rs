// std
use std::{
	env, fs,
	path::{Path, PathBuf},
	process,
	sync::Arc,
};
// self
use address_autocomplete::{
	auth::{AuthDecision, AuthGate, credential_digest, issue_credential},
	obs::MemorySink,
	store::{FileHashStore, HashEntry, HashStore, StoreError},
};

fn temp_path(tag: &str) -> PathBuf {
	env::temp_dir().join(format!(
		"address_autocomplete_it_{tag}_{}_{}.json",
		process::id(),
		rand::random::<u64>()
	))
}

fn remove(path: &Path) {
	fs::remove_file(path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary hash store {}: {e}", path.display())
	});
}

#[tokio::test]
async fn issued_credentials_pass_the_gate() {
	let path = temp_path("issue");

	fs::write(&path, "[]").expect("Seed store should be writable.");

	let store = Arc::new(FileHashStore::new(&path));
	let key = issue_credential(store.as_ref()).await.expect("Issuance should succeed.");
	let gate = AuthGate::new(store, Arc::new(MemorySink::default()));

	assert_eq!(key.expose().len(), 32);
	assert_eq!(gate.verify(Some(key.expose())).await, Ok(true));
	assert_eq!(gate.check(Some("not-issued"), None).await, AuthDecision::Rejected);

	let persisted: Vec<HashEntry> = serde_json::from_str(
		&fs::read_to_string(&path).expect("Store file should be readable."),
	)
	.expect("Store file should hold hash entries.");

	assert_eq!(persisted, [HashEntry::new(credential_digest(key.expose()))]);

	remove(&path);
}

#[tokio::test]
async fn lookups_see_appends_from_other_writers() {
	let path = temp_path("reread");

	fs::write(&path, "[]").expect("Seed store should be writable.");

	let reader = FileHashStore::new(&path);
	let writer = FileHashStore::new(&path);
	let digest = credential_digest("late-key");

	assert!(!reader.contains(&digest).await.expect("Lookup should succeed."));

	writer.append(HashEntry::new(digest.clone())).await.expect("Append should succeed.");

	assert!(reader.contains(&digest).await.expect("Lookup should succeed."));

	remove(&path);
}

#[tokio::test]
async fn unreadable_store_is_a_fault_not_a_rejection() {
	let path = temp_path("missing");
	let gate = AuthGate::new(Arc::new(FileHashStore::new(&path)), Arc::new(MemorySink::default()));

	assert!(matches!(gate.verify(Some("any-key")).await, Err(StoreError::Backend { .. })));
	assert_eq!(gate.verify(None).await, Ok(false));

	fs::write(&path, r#"{"hash": "not-an-array"}"#).expect("Fixture file should be writable.");

	assert!(matches!(
		gate.check(Some("any-key"), None).await,
		AuthDecision::Unavailable(StoreError::Serialization { .. })
	));

	remove(&path);
}
