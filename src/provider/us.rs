//! US addresses via Smarty US Autocomplete Pro: one call, no second phase.

// crates.io
use reqwest::header::ACCEPT;
// self
use crate::{
	_prelude::*,
	address::AddressRecord,
	config::SmartyConfig,
	error::{ExternalError, FetchError},
	http,
	obs::{EventSink, SharedSink},
	provider::{AddressProvider, FetchFuture, ProviderId},
};

const PROVIDER: ProviderId = ProviderId::Smarty;
const FALLBACK_STATUS: u16 = 500;
const FALLBACK_MESSAGE: &str = "smarty call error";

/// Boxed future returned by [`AutocompleteClient::send`].
pub type ClientFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ClientError>> + 'a + Send>>;

/// Transport that answers a single autocomplete [`Lookup`].
pub trait AutocompleteClient
where
	Self: Send + Sync,
{
	/// Sends the lookup and returns the suggestions in provider order.
	fn send<'a>(&'a self, lookup: &'a Lookup) -> ClientFuture<'a, Vec<UsSuggestion>>;
}

/// Failure raised by an [`AutocompleteClient`]; both fields are optional because transports
/// do not always know them.
#[derive(Clone, Debug, Default, PartialEq, Eq, ThisError)]
#[error("{}", .message.as_deref().unwrap_or(FALLBACK_MESSAGE))]
pub struct ClientError {
	/// Error text supplied by the transport.
	pub message: Option<String>,
	/// HTTP status, when the failure came from a response.
	pub status: Option<u16>,
}
impl ClientError {
	/// Failure carrying an HTTP status and its text.
	pub fn status(status: u16, message: impl Into<String>) -> Self {
		Self { message: Some(message.into()), status: Some(status) }
	}

	/// Failure with a message but no status.
	pub fn message(message: impl Into<String>) -> Self {
		Self { message: Some(message.into()), status: None }
	}
}
impl From<ClientError> for ExternalError {
	fn from(e: ClientError) -> Self {
		ExternalError::http(
			PROVIDER,
			e.status.unwrap_or(FALLBACK_STATUS),
			e.message.unwrap_or_else(|| FALLBACK_MESSAGE.to_owned()),
		)
	}
}

/// Autocomplete request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lookup {
	/// Free-text prefix typed by the user.
	pub search: String,
}
impl Lookup {
	/// Creates a lookup for `search`.
	pub fn new(search: impl Into<String>) -> Self {
		Self { search: search.into() }
	}
}

/// One suggestion as returned by Smarty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UsSuggestion {
	/// Street number and name.
	#[serde(default, deserialize_with = "http::nullable_string")]
	pub street_line: String,
	/// Unit designator, e.g. `Apt 2`.
	#[serde(default, deserialize_with = "http::nullable_string")]
	pub secondary: String,
	/// City.
	#[serde(default, deserialize_with = "http::nullable_string")]
	pub city: String,
	/// Two-letter state.
	#[serde(default, deserialize_with = "http::nullable_string")]
	pub state: String,
	/// ZIP code.
	#[serde(default, deserialize_with = "http::nullable_string")]
	pub zipcode: String,
	/// Number of units sharing the address.
	#[serde(default)]
	pub entries: u32,
}
impl UsSuggestion {
	/// Human-readable one-line label.
	pub fn display_name(&self) -> String {
		let mut name = self.street_line.clone();

		if !self.secondary.is_empty() {
			name.push(' ');
			name.push_str(&self.secondary);

			if self.entries > 1 {
				name.push_str(&format!(" ({} entries)", self.entries));
			}
		}

		name.push_str(&format!(" {}, {} {}", self.city, self.state, self.zipcode));

		name
	}
}

/// [`AutocompleteClient`] that calls the Smarty HTTP API with `reqwest`.
#[derive(Clone)]
pub struct ReqwestSmartyClient {
	http: ReqwestClient,
	config: SmartyConfig,
}
impl ReqwestSmartyClient {
	/// Creates a client sharing `http`'s connection pool.
	pub fn new(http: ReqwestClient, config: &SmartyConfig) -> Self {
		Self { http, config: config.clone() }
	}

	fn lookup_url(&self, lookup: &Lookup) -> Result<Url, ClientError> {
		let mut url = self.config.base_url.clone();

		url.path_segments_mut()
			.map_err(|()| {
				ClientError::message(format!(
					"Base URL cannot carry path segments: {}.",
					self.config.base_url
				))
			})?
			.pop_if_empty()
			.push("lookup");
		url.query_pairs_mut()
			.append_pair("auth-id", self.config.auth_id.expose())
			.append_pair("auth-token", self.config.auth_token.expose())
			.append_pair("search", &lookup.search);

		Ok(url)
	}
}
impl AutocompleteClient for ReqwestSmartyClient {
	fn send<'a>(&'a self, lookup: &'a Lookup) -> ClientFuture<'a, Vec<UsSuggestion>> {
		Box::pin(async move {
			let url = self.lookup_url(lookup)?;
			let response = self
				.http
				.get(url)
				.header(ACCEPT, "application/json")
				.send()
				.await
				.map_err(transport_error)?;
			let status = response.status();

			if !status.is_success() {
				return Err(ClientError::status(status.as_u16(), http::status_text(status)));
			}

			let bytes = response.bytes().await.map_err(transport_error)?;
			let payload: SuggestionsPayload =
				http::decode_json(&bytes).map_err(|e| ClientError::message(e.to_string()))?;

			Ok(payload.suggestions.unwrap_or_default())
		})
	}
}
impl Debug for ReqwestSmartyClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ReqwestSmartyClient")
			.field("base_url", &self.config.base_url.as_str())
			.finish()
	}
}

/// Smarty-backed provider for US addresses.
#[derive(Clone)]
pub struct UsProvider {
	client: Arc<dyn AutocompleteClient>,
	events: SharedSink,
}
impl UsProvider {
	const SERVICE: &'static str = "UsProvider";

	/// Creates a provider over any autocomplete transport.
	pub fn new(client: Arc<dyn AutocompleteClient>, events: SharedSink) -> Self {
		Self { client, events }
	}
}
impl AddressProvider for UsProvider {
	type Raw = Vec<UsSuggestion>;

	fn service_name(&self) -> &'static str {
		Self::SERVICE
	}

	fn events(&self) -> &dyn EventSink {
		self.events.as_ref()
	}

	fn fetch_raw<'a>(&'a self, query: &'a str) -> FetchFuture<'a, Self::Raw> {
		Box::pin(async move {
			let lookup = Lookup::new(query);

			self.client
				.send(&lookup)
				.await
				.map_err(|e| FetchError::External(ExternalError::from(e)))
		})
	}

	fn parse(&self, raw: Self::Raw) -> Vec<AddressRecord> {
		raw.into_iter()
			.map(|suggestion| AddressRecord {
				id: String::new(),
				name: suggestion.display_name(),
				line1: suggestion.street_line,
				line2: suggestion.secondary,
				line3: String::new(),
				city: suggestion.city,
				zip: suggestion.zipcode,
				state: suggestion.state,
				country: "US".into(),
			})
			.collect()
	}
}
impl Debug for UsProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UsProvider").finish_non_exhaustive()
	}
}

#[derive(Debug, Deserialize)]
struct SuggestionsPayload {
	#[serde(default)]
	suggestions: Option<Vec<UsSuggestion>>,
}

fn transport_error(e: ReqwestError) -> ClientError {
	ClientError { message: Some(e.to_string()), status: e.status().map(|s| s.as_u16()) }
}
