//! GB addresses via Ideal Postcodes: suggest, then resolve every suggestion.
//!
//! Phase 1 is a single autocomplete call; any failure there aborts the search. Phase 2
//! resolves each suggestion with its own detail call, at most `fanout_limit` at a time.
//! A failed resolution is logged with the suggestion it belonged to and dropped, so the
//! result is the in-order subsequence of suggestions that resolved.

// crates.io
use futures::{StreamExt, future, stream};
use reqwest::header::ACCEPT;
// self
use crate::{
	_prelude::*,
	address::{AddressRecord, Suggestion},
	config::IdealPostcodesConfig,
	error::{ExternalError, FetchError},
	http,
	obs::{self, EventSink, LogEvent, SharedSink},
	provider::{AddressProvider, FetchFuture, ProviderId},
};

const PROVIDER: ProviderId = ProviderId::IdealPostcodes;
const SUCCESS_CODE: u32 = 2000;

/// Ideal Postcodes-backed provider for GB addresses.
#[derive(Clone)]
pub struct GbProvider {
	http: ReqwestClient,
	config: IdealPostcodesConfig,
	fanout_limit: usize,
	events: SharedSink,
}
impl GbProvider {
	const SERVICE: &'static str = "GbProvider";

	/// Creates a provider; `fanout_limit` is raised to at least 1.
	pub fn new(
		http: ReqwestClient,
		config: IdealPostcodesConfig,
		fanout_limit: usize,
		events: SharedSink,
	) -> Self {
		Self { http, config, fanout_limit: fanout_limit.max(1), events }
	}

	async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, FetchError> {
		let mut url = self.endpoint(&["autocomplete", "addresses"])?;

		url.query_pairs_mut().append_pair("query", query);

		let hits: SuggestionHits = self.call(url).await?;

		Ok(hits.hits.into_iter().map(|hit| Suggestion::new(hit.id, hit.suggestion)).collect())
	}

	async fn resolve_all(&self, suggestions: Vec<Suggestion>) -> Vec<ResolvedAddress> {
		stream::iter(suggestions)
			.map(|suggestion| self.resolve(suggestion))
			.buffered(self.fanout_limit)
			.filter_map(future::ready)
			.collect()
			.await
	}

	async fn resolve(&self, suggestion: Suggestion) -> Option<ResolvedAddress> {
		match self.detail(&suggestion.id).await {
			Ok(detail) => Some(ResolvedAddress { label: suggestion.label, detail }),
			Err(err) => {
				let mut event = LogEvent::error(err.to_string())
					.service(Self::SERVICE)
					.with("address", suggestion.label)
					.with("addressId", suggestion.id);

				if let FetchError::External(external) = &err {
					event = event.external(external);
				}

				self.events.emit(event);
				obs::record_dropped_resolution(Self::SERVICE);

				None
			},
		}
	}

	async fn detail(&self, address_id: &str) -> Result<GbAddressDetail, FetchError> {
		let url = self.endpoint(&["autocomplete", "addresses", address_id, "gbr"])?;

		self.call(url).await
	}

	async fn call<T>(&self, url: Url) -> Result<T, FetchError>
	where
		T: for<'de> Deserialize<'de>,
	{
		let response = self.http.get(url).header(ACCEPT, "application/json").send().await?;
		let status = response.status();

		if !status.is_success() {
			return Err(ExternalError::http(PROVIDER, status.as_u16(), http::status_text(status))
				.into());
		}

		let bytes = response.bytes().await?;
		let envelope: Envelope<T> = http::decode_json(&bytes)?;

		if envelope.code != SUCCESS_CODE {
			return Err(ExternalError::business(PROVIDER, envelope.code, envelope.message).into());
		}

		envelope.result.ok_or_else(|| FetchError::unclassified(MissingResult))
	}

	fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
		let mut url = self.config.base_url.clone();

		url.path_segments_mut()
			.map_err(|()| {
				FetchError::unclassified(OpaqueBaseUrl(self.config.base_url.to_string()))
			})?
			.pop_if_empty()
			.extend(segments);
		url.query_pairs_mut().append_pair("api_key", self.config.api_key.expose());

		Ok(url)
	}
}
impl AddressProvider for GbProvider {
	type Raw = Vec<ResolvedAddress>;

	fn service_name(&self) -> &'static str {
		Self::SERVICE
	}

	fn events(&self) -> &dyn EventSink {
		self.events.as_ref()
	}

	fn fetch_raw<'a>(&'a self, query: &'a str) -> FetchFuture<'a, Self::Raw> {
		Box::pin(async move {
			let suggestions = self.suggest(query).await?;

			Ok(self.resolve_all(suggestions).await)
		})
	}

	fn parse(&self, raw: Self::Raw) -> Vec<AddressRecord> {
		raw.into_iter()
			.map(|ResolvedAddress { label, detail }| AddressRecord {
				id: detail.id,
				name: label,
				line1: detail.line_1,
				line2: detail.line_2,
				line3: detail.line_3,
				city: detail.post_town,
				zip: detail.postcode,
				state: detail.county,
				country: detail.country_iso_2,
			})
			.collect()
	}
}
impl Debug for GbProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GbProvider")
			.field("base_url", &self.config.base_url.as_str())
			.field("fanout_limit", &self.fanout_limit)
			.finish()
	}
}

/// Suggestion paired with its resolved detail record.
#[derive(Clone, Debug)]
pub struct ResolvedAddress {
	/// Phase-1 label; becomes the record name.
	pub label: String,
	/// Phase-2 detail payload.
	pub detail: GbAddressDetail,
}

/// Subset of the Ideal Postcodes address payload the crate maps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct GbAddressDetail {
	/// Provider address identifier, e.g. `paf_10148014`.
	#[serde(default, deserialize_with = "http::nullable_string")]
	pub id: String,
	/// First address line.
	#[serde(default, deserialize_with = "http::nullable_string")]
	pub line_1: String,
	/// Second address line.
	#[serde(default, deserialize_with = "http::nullable_string")]
	pub line_2: String,
	/// Third address line.
	#[serde(default, deserialize_with = "http::nullable_string")]
	pub line_3: String,
	/// Post town.
	#[serde(default, deserialize_with = "http::nullable_string")]
	pub post_town: String,
	/// Full postcode.
	#[serde(default, deserialize_with = "http::nullable_string")]
	pub postcode: String,
	/// County.
	#[serde(default, deserialize_with = "http::nullable_string")]
	pub county: String,
	/// ISO 3166-1 alpha-2 country code.
	#[serde(default, deserialize_with = "http::nullable_string")]
	pub country_iso_2: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
	code: u32,
	#[serde(default)]
	message: String,
	result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct SuggestionHits {
	#[serde(default)]
	hits: Vec<SuggestionHit>,
}

#[derive(Debug, Deserialize)]
struct SuggestionHit {
	id: String,
	suggestion: String,
}

#[derive(Debug, ThisError)]
#[error("Ideal Postcodes reported success without a result payload.")]
struct MissingResult;

#[derive(Debug, ThisError)]
#[error("Base URL cannot carry path segments: {0}.")]
struct OpaqueBaseUrl(String);
