//! Two-step search contract shared by every provider.
//!
//! A provider only knows how to fetch its raw payload and how to turn that payload into
//! [`AddressRecord`]s. [`search`] composes the two steps and owns the single failure
//! boundary: external failures are logged with their provider and code and returned as-is,
//! everything else is logged and returned as [`Error::Internal`]. Nothing below this
//! boundary logs a terminal failure, and nothing above it re-classifies one.

// self
use crate::{
	_prelude::*,
	address::AddressRecord,
	error::FetchError,
	obs::{self, EventSink, LogEvent, SearchOutcome, SearchSpan},
};

/// Boxed future returned by [`AddressProvider::fetch_raw`].
pub type FetchFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + 'a + Send>>;
/// Boxed future returned by [`AddressSearch::search`].
pub type SearchFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<AddressRecord>>> + 'a + Send>>;

/// Provider-specific half of the search protocol.
///
/// Implementors are required to be `Send + Sync`; they hold only read-only configuration
/// and shared handles, so a single instance may serve concurrent searches.
pub trait AddressProvider
where
	Self: Send + Sync,
{
	/// Raw payload produced by [`fetch_raw`](Self::fetch_raw).
	type Raw: Send;

	/// Implementation name recorded as the `service` log field.
	fn service_name(&self) -> &'static str;

	/// Sink used for the failure boundary (and any provider-local recovery logs).
	fn events(&self) -> &dyn EventSink;

	/// Calls the backing service. Failures are returned, never logged.
	fn fetch_raw<'a>(&'a self, query: &'a str) -> FetchFuture<'a, Self::Raw>;

	/// Maps the raw payload into normalized records.
	fn parse(&self, raw: Self::Raw) -> Vec<AddressRecord>;
}

/// Object-safe search entry point returned by the registry.
pub trait AddressSearch
where
	Self: Send + Sync,
{
	/// Implementation name, as used in logs.
	fn service_name(&self) -> &'static str;

	/// Runs the full fetch → parse protocol for `query`.
	fn search<'a>(&'a self, query: &'a str) -> SearchFuture<'a>;
}
impl<P> AddressSearch for P
where
	P: AddressProvider,
{
	fn service_name(&self) -> &'static str {
		AddressProvider::service_name(self)
	}

	fn search<'a>(&'a self, query: &'a str) -> SearchFuture<'a> {
		Box::pin(search(self, query))
	}
}

/// Runs `provider`'s two-step protocol inside the shared failure boundary.
pub async fn search<P>(provider: &P, query: &str) -> Result<Vec<AddressRecord>>
where
	P: ?Sized + AddressProvider,
{
	let service = AddressProvider::service_name(provider);
	let span = SearchSpan::new(service, "search");

	obs::record_search_outcome(service, SearchOutcome::Attempt);

	let result = span
		.instrument(async {
			match provider.fetch_raw(query).await {
				Ok(raw) => Ok(provider.parse(raw)),
				Err(err) => Err(report_failure(provider, err)),
			}
		})
		.await;

	let (outcome, records) = match &result {
		Ok(records) => (SearchOutcome::Success, Some(records.len())),
		Err(_) => (SearchOutcome::Failure, None),
	};

	span.finish(outcome, records);
	obs::record_search_outcome(service, outcome);

	result
}

fn report_failure<P>(provider: &P, err: FetchError) -> Error
where
	P: ?Sized + AddressProvider,
{
	let error = err.classify();
	let event = match &error {
		Error::External(external) => LogEvent::error(external.message.clone()).external(external),
		Error::Internal { message } => LogEvent::error(message.clone()),
	};

	provider.events().emit(event.service(AddressProvider::service_name(provider)));

	error
}
