//! Demonstrates the full request path: a freshly issued credential, the GB provider's
//! suggest-then-resolve flow against a mock Ideal Postcodes server, and the gateway's response.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use address_autocomplete::{
	auth::{AuthGate, issue_credential},
	config::{IdealPostcodesConfig, ProviderConfig, SmartyConfig},
	gateway::{AutocompleteRequest, Gateway},
	http,
	obs::MemorySink,
	provider::ProviderRegistry,
	store::MemoryHashStore,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/autocomplete/addresses")
				.query_param("query", "10 Downing");
			then.status(200).json_body(json!({
				"code": 2000,
				"message": "Success",
				"result": {"hits": [
					{"id": "paf_23747771", "suggestion": "10 Downing Street, London, SW1A"},
					{"id": "paf_8387729", "suggestion": "10 Downing Road, Dagenham, RM10"}
				]}
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/autocomplete/addresses/paf_23747771/gbr");
			then.status(200).json_body(json!({
				"code": 2000,
				"message": "Success",
				"result": {
					"id": "paf_23747771",
					"line_1": "Prime Minister & First Lord Of The Treasury",
					"line_2": "10 Downing Street",
					"line_3": "",
					"post_town": "London",
					"postcode": "SW1A 2AA",
					"county": "London",
					"country_iso_2": "GB"
				}
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/autocomplete/addresses/paf_8387729/gbr");
			then.status(500);
		})
		.await;

	let config = ProviderConfig::new(
		IdealPostcodesConfig::new(Url::parse(&server.url("/v1"))?, "ak_demo")?,
		SmartyConfig::new(Url::parse(&server.url("/smarty"))?, "demo-id", "demo-token")?,
	)
	.with_fanout_limit(4);
	let events = Arc::new(MemorySink::default());
	let store = Arc::new(MemoryHashStore::default());
	let key = issue_credential(store.as_ref()).await?;
	let registry = ProviderRegistry::new(Arc::new(config), http::build_client()?, events.clone());
	let gateway = Gateway::new(AuthGate::new(store, events.clone()), registry, events.clone());
	let request =
		AutocompleteRequest::new("GB").with_query("10 Downing").with_api_key(key.expose());
	let response = gateway.handle(&request).await;

	println!("{} {}", response.status, response.body_text()?);

	for event in events.events() {
		println!(
			"[{}] {} provider={:?} code={:?} context={:?}",
			event.level, event.message, event.provider, event.code, event.context
		);
	}

	Ok(())
}
