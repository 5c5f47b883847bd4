//! Shared HTTP plumbing for provider adapters.
//!
//! Every provider shares one [`ReqwestClient`] (a connection pool, no per-request state).
//! Payloads are decoded through `serde_path_to_error` so a malformed response names the
//! JSON path that failed instead of only the serde message.

// crates.io
use reqwest::StatusCode;
use serde::{Deserializer, de::DeserializeOwned};
// self
use crate::{_prelude::*, error::ConfigError};

/// Builds the default reqwest client used by the provider registry.
pub fn build_client() -> Result<ReqwestClient, ConfigError> {
	ReqwestClient::builder()
		.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
		.build()
		.map_err(ConfigError::http_client_build)
}

pub(crate) type DecodeError = serde_path_to_error::Error<serde_json::Error>;

pub(crate) fn decode_json<T>(bytes: &[u8]) -> Result<T, DecodeError>
where
	T: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut de)
}

/// Canonical reason phrase for `status`, used as the failure message of HTTP errors.
pub(crate) fn status_text(status: StatusCode) -> String {
	status.canonical_reason().unwrap_or("Unknown Status").to_owned()
}

/// Deserializes a string field that providers sometimes send as `null`.
pub(crate) fn nullable_string<'de, D>(de: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Option::<String>::deserialize(de).map(Option::unwrap_or_default)
}
