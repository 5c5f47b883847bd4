#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
// self
use address_autocomplete::{
	config::{IdealPostcodesConfig, SmartyConfig},
	obs::MemorySink,
	provider::{GbProvider, UsProvider, us::ReqwestSmartyClient},
	reqwest::Client,
	url::Url,
};

pub const IDEAL_POSTCODES_KEY: &str = "ak_test";

/// Reqwest client shared by the mock-backed providers.
pub fn test_client() -> Client {
	Client::builder()
		.danger_accept_invalid_certs(true)
		.build()
		.expect("Failed to build Reqwest client for tests.")
}

/// GB provider pointed at `{server}/v1`, with its own event sink.
pub fn gb_provider(server: &MockServer, fanout_limit: usize) -> (GbProvider, Arc<MemorySink>) {
	let config = IdealPostcodesConfig::new(
		Url::parse(&server.url("/v1")).expect("Mock base URL should parse."),
		IDEAL_POSTCODES_KEY,
	)
	.expect("Mock Ideal Postcodes config should validate.");
	let events = Arc::new(MemorySink::default());

	(GbProvider::new(test_client(), config, fanout_limit, events.clone()), events)
}

/// US provider pointed at `{server}/smarty` through the reqwest client.
pub fn us_provider(server: &MockServer) -> (UsProvider, Arc<MemorySink>) {
	let config = SmartyConfig::new(
		Url::parse(&server.url("/smarty")).expect("Mock base URL should parse."),
		"auth-id",
		"auth-token",
	)
	.expect("Mock Smarty config should validate.");
	let events = Arc::new(MemorySink::default());
	let client = Arc::new(ReqwestSmartyClient::new(test_client(), &config));

	(UsProvider::new(client, events.clone()), events)
}

/// Ideal Postcodes success envelope around `result`.
pub fn envelope(result: Value) -> Value {
	json!({ "code": 2000, "message": "Success", "result": result })
}

/// Phase-1 payload listing `(id, label)` suggestions in order.
pub fn hits(suggestions: &[(&str, &str)]) -> Value {
	let hits: Vec<Value> = suggestions
		.iter()
		.map(|(id, label)| json!({ "id": id, "suggestion": label }))
		.collect();

	envelope(json!({ "hits": hits }))
}

/// Phase-2 payload for a detail lookup.
pub fn detail(id: &str, line_1: &str, postcode: &str) -> Value {
	envelope(json!({
		"id": id,
		"line_1": line_1,
		"line_2": "",
		"line_3": "",
		"post_town": "London",
		"postcode": postcode,
		"county": "Greater London",
		"country_iso_2": "GB",
		"udprn": 23747771
	}))
}
