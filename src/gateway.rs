//! Framework-agnostic handler for `GET /api/{country}?q={query}`.
//!
//! The gateway owns the response policy: it authenticates, resolves the provider, and turns
//! the search outcome into a status and body. HTTP servers only translate their request type
//! into [`AutocompleteRequest`] and write the returned [`GatewayResponse`].

// std
use std::net::IpAddr;
// crates.io
use reqwest::StatusCode;
// self
use crate::{
	_prelude::*,
	address::AddressRecord,
	auth::{AuthDecision, AuthGate},
	obs::{LogEvent, SharedSink},
	provider::ProviderRegistry,
};

const ROUTE: &str = "countries";
const UNAUTHORIZED: &str = "Unauthorized";
const BAD_REQUEST: &str = "Bad request";

/// Inputs of one autocomplete request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AutocompleteRequest {
	/// `{country}` path segment.
	pub country: String,
	/// `q` query parameter.
	pub query: Option<String>,
	/// `api_key` query parameter.
	pub api_key: Option<String>,
	/// `apiKey` header.
	pub api_key_header: Option<String>,
	/// Peer address, used in rejection logs.
	pub client_ip: Option<IpAddr>,
}
impl AutocompleteRequest {
	/// Creates a request for `country` with no query or credential.
	pub fn new(country: impl Into<String>) -> Self {
		Self { country: country.into(), ..Default::default() }
	}

	/// Sets the `q` parameter.
	pub fn with_query(mut self, query: impl Into<String>) -> Self {
		self.query = Some(query.into());

		self
	}

	/// Sets the `api_key` query parameter.
	pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
		self.api_key = Some(api_key.into());

		self
	}

	/// Sets the `apiKey` header.
	pub fn with_api_key_header(mut self, api_key: impl Into<String>) -> Self {
		self.api_key_header = Some(api_key.into());

		self
	}

	/// Sets the peer address.
	pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
		self.client_ip = Some(ip);

		self
	}

	/// Credential to check: the query parameter when non-empty, else the header.
	pub fn credential(&self) -> Option<&str> {
		self.api_key
			.as_deref()
			.filter(|key| !key.is_empty())
			.or(self.api_key_header.as_deref())
	}

	fn search_query(&self) -> &str {
		self.query.as_deref().unwrap_or_default()
	}
}

/// JSON body of a successful response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressList {
	/// Normalized records in provider order.
	pub result: Vec<AddressRecord>,
}

/// Body of a [`GatewayResponse`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResponseBody {
	/// `application/json` address list.
	Addresses(AddressList),
	/// Plain-text status message.
	Text(&'static str),
	/// No body.
	Empty,
}

/// Status and body produced for a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayResponse {
	/// HTTP status.
	pub status: StatusCode,
	/// Response body.
	pub body: ResponseBody,
}
impl GatewayResponse {
	/// 200 with the given records.
	pub fn addresses(result: Vec<AddressRecord>) -> Self {
		Self { status: StatusCode::OK, body: ResponseBody::Addresses(AddressList { result }) }
	}

	/// 200 with an empty list.
	pub fn no_addresses() -> Self {
		Self::addresses(Vec::new())
	}

	fn text(status: StatusCode, text: &'static str) -> Self {
		Self { status, body: ResponseBody::Text(text) }
	}

	fn empty(status: StatusCode) -> Self {
		Self { status, body: ResponseBody::Empty }
	}

	/// Returns the records when the body is an address list.
	pub fn records(&self) -> Option<&[AddressRecord]> {
		match &self.body {
			ResponseBody::Addresses(list) => Some(&list.result),
			_ => None,
		}
	}

	/// Renders the body as it would be written on the wire.
	pub fn body_text(&self) -> Result<String, serde_json::Error> {
		match &self.body {
			ResponseBody::Addresses(list) => serde_json::to_string(list),
			ResponseBody::Text(text) => Ok((*text).to_owned()),
			ResponseBody::Empty => Ok(String::new()),
		}
	}
}

/// Request handler composing the auth gate, the provider registry, and the response policy.
#[derive(Clone)]
pub struct Gateway {
	auth: AuthGate,
	registry: ProviderRegistry,
	events: SharedSink,
}
impl Gateway {
	/// Creates a gateway.
	pub fn new(auth: AuthGate, registry: ProviderRegistry, events: SharedSink) -> Self {
		Self { auth, registry, events }
	}

	/// Handles one request end to end.
	pub async fn handle(&self, request: &AutocompleteRequest) -> GatewayResponse {
		match self.auth.check(request.credential(), request.client_ip).await {
			AuthDecision::Allowed => {},
			AuthDecision::Rejected =>
				return GatewayResponse::text(StatusCode::UNAUTHORIZED, UNAUTHORIZED),
			AuthDecision::Unavailable(_) =>
				return GatewayResponse::empty(StatusCode::INTERNAL_SERVER_ERROR),
		}

		let Some(provider) = self.registry.resolve(&request.country) else {
			self.events.emit(
				LogEvent::info(format!("country {} is not found", request.country))
					.with("route", ROUTE),
			);

			return GatewayResponse::text(StatusCode::BAD_REQUEST, BAD_REQUEST);
		};
		let query = request.search_query();

		if query.is_empty() {
			return GatewayResponse::no_addresses();
		}

		match provider.search(query).await {
			Ok(records) => GatewayResponse::addresses(records),
			Err(Error::External(external)) if external.code == 400 =>
				GatewayResponse::text(StatusCode::BAD_REQUEST, BAD_REQUEST),
			Err(Error::External(_)) => GatewayResponse::no_addresses(),
			Err(Error::Internal { message }) => {
				self.events.emit(
					LogEvent::error(message)
						.service(provider.service_name())
						.force_stack()
						.with("route", ROUTE),
				);

				GatewayResponse::empty(StatusCode::INTERNAL_SERVER_ERROR)
			},
		}
	}
}
impl Debug for Gateway {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway").field("registry", &self.registry).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use httpmock::prelude::*;
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		_preludet::*,
		auth::credential_digest,
		obs::{EventLevel, MemorySink},
		provider::ProviderId,
		store::{FileHashStore, MemoryHashStore},
	};

	const KEY: &str = "0123456789abcdef0123456789abcdef";

	fn build(server: &MockServer) -> (Gateway, Arc<MemorySink>) {
		let config = test_provider_config(&server.url("/v1"), &server.url("/smarty"));
		let store = MemoryHashStore::with_digests([credential_digest(KEY)]);

		build_test_gateway(config, Arc::new(store))
	}

	fn gb(query: &str) -> AutocompleteRequest {
		AutocompleteRequest::new("gb").with_query(query).with_api_key(KEY)
	}

	fn detail(id: &str, line_1: &str) -> serde_json::Value {
		json!({
			"code": 2000,
			"message": "Success",
			"result": {
				"id": id,
				"line_1": line_1,
				"line_2": "",
				"line_3": "",
				"post_town": "London",
				"postcode": "SW1A 2AA",
				"county": "London",
				"country_iso_2": "GB"
			}
		})
	}

	#[test]
	fn credential_prefers_non_empty_query_parameter() {
		let both =
			AutocompleteRequest::new("gb").with_api_key("q-key").with_api_key_header("h-key");
		let empty_query =
			AutocompleteRequest::new("gb").with_api_key("").with_api_key_header("h-key");
		let header_only = AutocompleteRequest::new("gb").with_api_key_header("h-key");

		assert_eq!(both.credential(), Some("q-key"));
		assert_eq!(empty_query.credential(), Some("h-key"));
		assert_eq!(header_only.credential(), Some("h-key"));
		assert_eq!(AutocompleteRequest::new("gb").credential(), None);
	}

	#[test]
	fn body_text_matches_wire_format() {
		let ok = GatewayResponse::addresses(vec![AddressRecord {
			country: "US".into(),
			..Default::default()
		}]);

		assert_eq!(
			ok.body_text().expect("Address list should serialize."),
			r#"{"result":[{"id":"","name":"","line1":"","line2":"","line3":"","city":"","zip":"","state":"","country":"US"}]}"#
		);
		assert_eq!(
			GatewayResponse::no_addresses().body_text().ok().as_deref(),
			Some(r#"{"result":[]}"#)
		);

		let unauthorized = GatewayResponse::text(StatusCode::UNAUTHORIZED, UNAUTHORIZED);

		assert_eq!(unauthorized.body_text().ok().as_deref(), Some("Unauthorized"));
	}

	#[tokio::test]
	async fn unknown_credentials_are_unauthorized() {
		let server = MockServer::start_async().await;
		let (gateway, _) = build(&server);
		let suggest = server
			.mock_async(|when, then| {
				when.method(GET).path("/v1/autocomplete/addresses");
				then.status(200).json_body(json!({"code": 2000, "result": {"hits": []}}));
			})
			.await;

		for request in [
			AutocompleteRequest::new("gb").with_query("10 Downing"),
			AutocompleteRequest::new("gb").with_query("10 Downing").with_api_key("wrong"),
			AutocompleteRequest::new("gb").with_query("10 Downing").with_api_key_header("wrong"),
		] {
			let response = gateway.handle(&request).await;

			assert_eq!(response.status, StatusCode::UNAUTHORIZED);
			assert_eq!(response.body, ResponseBody::Text("Unauthorized"));
		}

		let header =
			AutocompleteRequest::new("gb").with_query("10 Downing").with_api_key_header(KEY);

		assert_eq!(gateway.handle(&header).await.status, StatusCode::OK);

		suggest.assert_calls_async(1).await;
	}

	#[tokio::test]
	async fn store_fault_is_a_server_error() {
		let server = MockServer::start_async().await;
		let config = test_provider_config(&server.url("/v1"), &server.url("/smarty"));
		let missing = std::env::temp_dir()
			.join(format!("address_autocomplete_missing_{}.json", rand::random::<u64>()));
		let (gateway, events) = build_test_gateway(config, Arc::new(FileHashStore::new(missing)));
		let response = gateway.handle(&gb("10 Downing")).await;

		assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(response.body, ResponseBody::Empty);
		assert_eq!(events.errors().len(), 1);
		assert_eq!(events.errors()[0].context("middleware"), Some("authByToken"));
	}

	#[tokio::test]
	async fn unknown_country_is_a_bad_request() {
		let server = MockServer::start_async().await;
		let (gateway, events) = build(&server);
		let request = AutocompleteRequest::new("fr").with_query("Rue").with_api_key(KEY);
		let response = gateway.handle(&request).await;

		assert_eq!(response.status, StatusCode::BAD_REQUEST);
		assert_eq!(response.body, ResponseBody::Text("Bad request"));

		let logged = events.events();

		assert_eq!(logged.len(), 1);
		assert_eq!(logged[0].level, EventLevel::Info);
		assert_eq!(logged[0].message, "country fr is not found");
		assert_eq!(logged[0].context("route"), Some("countries"));
	}

	#[tokio::test]
	async fn empty_query_skips_the_provider() {
		let server = MockServer::start_async().await;
		let (gateway, _) = build(&server);
		let suggest = server
			.mock_async(|when, then| {
				when.method(GET).path("/v1/autocomplete/addresses");
				then.status(200).json_body(json!({"code": 2000, "result": {"hits": []}}));
			})
			.await;

		for request in [
			AutocompleteRequest::new("GB").with_api_key(KEY),
			AutocompleteRequest::new("GB").with_query("").with_api_key(KEY),
		] {
			let response = gateway.handle(&request).await;

			assert_eq!(response.status, StatusCode::OK);
			assert_eq!(response.records(), Some(&[][..]));
		}

		suggest.assert_calls_async(0).await;
	}

	#[tokio::test]
	async fn one_failed_resolution_still_returns_the_rest() {
		let server = MockServer::start_async().await;
		let (gateway, events) = build(&server);
		let suggest = server
			.mock_async(|when, then| {
				when.method(GET)
					.path("/v1/autocomplete/addresses")
					.query_param("query", "10 Downing")
					.query_param("api_key", "ak_test");
				then.status(200).json_body(json!({
					"code": 2000,
					"message": "Success",
					"result": {"hits": [
						{"id": "paf_1", "suggestion": "10 Downing Street, London, SW1A"},
						{"id": "paf_2", "suggestion": "10 Downing Road, Dagenham, RM10"}
					]}
				}));
			})
			.await;
		let first = server
			.mock_async(|when, then| {
				when.method(GET).path("/v1/autocomplete/addresses/paf_1/gbr");
				then.status(200).json_body(detail("paf_1", "10 Downing Street"));
			})
			.await;
		let second = server
			.mock_async(|when, then| {
				when.method(GET).path("/v1/autocomplete/addresses/paf_2/gbr");
				then.status(500);
			})
			.await;
		let response = gateway.handle(&gb("10 Downing")).await;

		assert_eq!(response.status, StatusCode::OK);

		let records = response.records().expect("Success response should carry records.");

		assert_eq!(records.len(), 1);
		assert_eq!(records[0].id, "paf_1");
		assert_eq!(records[0].name, "10 Downing Street, London, SW1A");

		let errors = events.errors();

		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].service, Some("GbProvider"));
		assert_eq!(errors[0].provider, Some(ProviderId::IdealPostcodes));
		assert_eq!(errors[0].code, Some(500));
		assert_eq!(errors[0].context("addressId"), Some("paf_2"));
		assert_eq!(errors[0].context("address"), Some("10 Downing Road, Dagenham, RM10"));

		suggest.assert_calls_async(1).await;
		first.assert_calls_async(1).await;
		second.assert_calls_async(1).await;
	}

	#[tokio::test]
	async fn provider_bad_request_maps_to_400() {
		let server = MockServer::start_async().await;
		let (gateway, events) = build(&server);

		server
			.mock_async(|when, then| {
				when.method(GET).path("/v1/autocomplete/addresses");
				then.status(400);
			})
			.await;

		let response = gateway.handle(&gb("10 Downing")).await;

		assert_eq!(response.status, StatusCode::BAD_REQUEST);
		assert_eq!(response.body, ResponseBody::Text("Bad request"));
		assert_eq!(events.errors().len(), 1);
		assert_eq!(events.errors()[0].code, Some(400));
	}

	#[tokio::test]
	async fn other_provider_failures_soft_degrade() {
		let server = MockServer::start_async().await;
		let (gateway, events) = build(&server);

		server
			.mock_async(|when, then| {
				when.method(GET).path("/smarty/lookup").query_param("search", "4770 Lincoln");
				then.status(503);
			})
			.await;
		server
			.mock_async(|when, then| {
				when.method(GET).path("/v1/autocomplete/addresses");
				then.status(200).json_body(json!({"code": 4010, "message": "Invalid key"}));
			})
			.await;

		let us = AutocompleteRequest::new("us").with_query("4770 Lincoln").with_api_key(KEY);
		let response = gateway.handle(&us).await;

		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(response.records(), Some(&[][..]));

		let response = gateway.handle(&gb("10 Downing")).await;

		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(response.records(), Some(&[][..]));

		let errors = events.errors();

		assert_eq!(errors.len(), 2);
		assert_eq!((errors[0].provider, errors[0].code), (Some(ProviderId::Smarty), Some(503)));
		assert_eq!(
			(errors[1].provider, errors[1].code),
			(Some(ProviderId::IdealPostcodes), Some(4010))
		);
	}

	#[tokio::test]
	async fn internal_failures_are_server_errors() {
		let server = MockServer::start_async().await;
		let (gateway, events) = build(&server);

		server
			.mock_async(|when, then| {
				when.method(GET).path("/v1/autocomplete/addresses");
				then.status(200).body("<html>not json</html>");
			})
			.await;

		let response = gateway.handle(&gb("10 Downing")).await;

		assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(response.body, ResponseBody::Empty);

		let errors = events.errors();

		assert_eq!(errors.len(), 2);
		assert_eq!(errors[0].service, Some("GbProvider"));
		assert_eq!(errors[0].provider, None);
		assert_eq!(errors[1].context("route"), Some("countries"));
		assert_eq!(errors[1].message, errors[0].message);
		assert_eq!(errors[1].service, Some("GbProvider"));
		assert!(errors[1].stack.as_deref().is_some_and(|stack| !stack.is_empty()));
	}
}
