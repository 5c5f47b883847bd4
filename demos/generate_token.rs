//! Issues a new API key, appending its digest to `keysHash.json` in the working directory.

// std
use std::env;
// crates.io
use color_eyre::Result;
// self
use address_autocomplete::{
	auth::issue_credential,
	store::{FileHashStore, file::DEFAULT_FILE_NAME},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let store = FileHashStore::new(env::current_dir()?.join(DEFAULT_FILE_NAME));
	let key = issue_credential(&store).await?;

	println!("=========================");
	println!("YOUR API KEY - {}", key.expose());
	println!("=========================");

	Ok(())
}
