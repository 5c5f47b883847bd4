//! Normalized address autocomplete over country-specific providers: bounded, order-preserving
//! fan-out resolution, a two-kind provider error taxonomy, and hash-gated request credentials.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod address;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod obs;
pub mod provider;
pub mod secret;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::AuthGate,
		config::{IdealPostcodesConfig, ProviderConfig, SmartyConfig},
		gateway::Gateway,
		obs::MemorySink,
		provider::ProviderRegistry,
		store::HashStore,
	};

	/// Builds a reqwest client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_client() -> ReqwestClient {
		ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.")
	}

	/// Provider configuration pointing both providers at mock base URLs.
	pub fn test_provider_config(ideal_postcodes_url: &str, smarty_url: &str) -> ProviderConfig {
		let ideal_postcodes = IdealPostcodesConfig::new(
			Url::parse(ideal_postcodes_url).expect("Mock Ideal Postcodes URL should parse."),
			"ak_test",
		)
		.expect("Mock Ideal Postcodes config should validate.");
		let smarty = SmartyConfig::new(
			Url::parse(smarty_url).expect("Mock Smarty URL should parse."),
			"auth-id",
			"auth-token",
		)
		.expect("Mock Smarty config should validate.");

		ProviderConfig::new(ideal_postcodes, smarty)
	}

	/// Constructs a [`Gateway`] over `config` and `store`, sharing one in-memory event sink
	/// between the gate, the providers, and the gateway.
	pub fn build_test_gateway(
		config: ProviderConfig,
		store: Arc<dyn HashStore>,
	) -> (Gateway, Arc<MemorySink>) {
		let events = Arc::new(MemorySink::default());
		let registry =
			ProviderRegistry::new(Arc::new(config), test_reqwest_client(), events.clone());
		let gate = AuthGate::new(store, events.clone());

		(Gateway::new(gate, registry, events.clone()), events)
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
