//! JSON-file [`HashStore`] that re-reads the file on every lookup.

// std
use std::{
	fs::{self, File},
	io::{self, Write},
	path::{Path, PathBuf},
};
// crates.io
use serde_json::ser::PrettyFormatter;
// self
use crate::{
	_prelude::*,
	store::{HashEntry, HashStore, StoreError, StoreFuture},
};

/// Default file name, resolved against the working directory by callers.
pub const DEFAULT_FILE_NAME: &str = "keysHash.json";

/// Hash store persisted as a JSON array of `{"hash": ...}` records.
///
/// Lookups never cache: every [`contains`](HashStore::contains) reads the file, so appends made
/// by another process are visible on the next request. A missing or malformed file is a
/// [`StoreError`]. Appends create the file when absent and replace it atomically.
#[derive(Clone, Debug)]
pub struct FileHashStore {
	path: PathBuf,
	write_lock: Arc<Mutex<()>>,
}
impl FileHashStore {
	/// Creates a store over `path`; nothing is read until the first lookup.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into(), write_lock: Default::default() }
	}

	/// Returns the backing file path.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load(&self) -> Result<Vec<HashEntry>, StoreError> {
		let bytes = fs::read(&self.path).map_err(io_failure("read", &self.path))?;

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", self.path.display()),
		})
	}

	fn load_or_empty(&self) -> Result<Vec<HashEntry>, StoreError> {
		if self.path.exists() { self.load() } else { Ok(Vec::new()) }
	}

	fn write_atomically(&self, bytes: &[u8]) -> Result<(), StoreError> {
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(io_failure("create directory", parent))?;
		}

		let tmp_path = self.path.with_extension("tmp");
		let mut file = File::create(&tmp_path).map_err(io_failure("create", &tmp_path))?;

		file.write_all(bytes).map_err(io_failure("write", &tmp_path))?;
		file.sync_all().map_err(io_failure("sync", &tmp_path))?;
		drop(file);

		fs::rename(&tmp_path, &self.path).map_err(io_failure("replace", &self.path))
	}
}
impl HashStore for FileHashStore {
	fn contains<'a>(&'a self, digest: &'a str) -> StoreFuture<'a, bool> {
		Box::pin(async move { Ok(self.load()?.iter().any(|entry| entry.hash == digest)) })
	}

	fn append(&self, entry: HashEntry) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let _guard = self.write_lock.lock();
			let mut entries = self.load_or_empty()?;

			entries.push(entry);

			self.write_atomically(&to_pretty_json(&entries)?)
		})
	}
}

fn io_failure<'a>(action: &'a str, path: &'a Path) -> impl FnOnce(io::Error) -> StoreError + 'a {
	move |e| StoreError::Backend { message: format!("Failed to {action} {}: {e}", path.display()) }
}

fn to_pretty_json(entries: &[HashEntry]) -> Result<Vec<u8>, StoreError> {
	let mut buf = Vec::new();
	let mut serializer =
		serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));

	entries.serialize(&mut serializer).map_err(|e| StoreError::Serialization {
		message: format!("Failed to serialize hash entries: {e}"),
	})?;

	Ok(buf)
}
