//! Cross-provider error taxonomy shared by providers, the registry, and the gateway.
//!
//! Only two kinds exist. [`Error::External`] carries the backing provider and its failure
//! code so the gateway can pick a response; [`Error::Internal`] covers everything else.
//! Adapters never build [`Error`] directly: they return [`FetchError`] and the provider
//! contract classifies it exactly once.

// self
use crate::{_prelude::*, provider::ProviderId};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error surfaced by [`crate::provider::AddressSearch::search`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum Error {
	/// Logic fault or unclassified failure.
	#[error("{message}")]
	Internal {
		/// Message of the failure that was wrapped.
		message: String,
	},
	/// Backing provider failure.
	#[error(transparent)]
	External(#[from] ExternalError),
}
impl Error {
	/// Builds an [`Error::Internal`] from any message.
	pub fn internal(message: impl Into<String>) -> Self {
		Self::Internal { message: message.into() }
	}

	/// Returns the provider failure when the error is [`Error::External`].
	pub fn as_external(&self) -> Option<&ExternalError> {
		match self {
			Self::External(external) => Some(external),
			Self::Internal { .. } => None,
		}
	}
}

/// Failure reported by a backing provider.
///
/// `code` is an HTTP status when `is_http_error` is set and a provider business code
/// otherwise.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{message}")]
pub struct ExternalError {
	/// Provider- or transport-supplied message.
	pub message: String,
	/// Backing service that failed.
	pub provider: ProviderId,
	/// HTTP status or business code.
	pub code: u32,
	/// Whether `code` is an HTTP status.
	pub is_http_error: bool,
}
impl ExternalError {
	/// Failure signalled by a non-success HTTP status.
	pub fn http(provider: ProviderId, status: u16, message: impl Into<String>) -> Self {
		Self { message: message.into(), provider, code: u32::from(status), is_http_error: true }
	}

	/// Failure signalled by a provider business code inside a successful transport response.
	pub fn business(provider: ProviderId, code: u32, message: impl Into<String>) -> Self {
		Self { message: message.into(), provider, code, is_http_error: false }
	}
}

/// Error returned by a provider's raw fetch step, before classification.
#[derive(Debug, ThisError)]
pub enum FetchError {
	/// Already classified provider failure; passes through the contract unchanged.
	#[error(transparent)]
	External(#[from] ExternalError),
	/// Anything else (transport, decoding, URL building); becomes [`Error::Internal`].
	#[error(transparent)]
	Unclassified(BoxError),
}
impl FetchError {
	/// Wraps any unclassified failure.
	pub fn unclassified(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Unclassified(Box::new(src))
	}

	/// Classifies the failure, wrapping everything that is not external as internal.
	pub fn classify(self) -> Error {
		match self {
			Self::External(external) => Error::External(external),
			Self::Unclassified(source) => Error::internal(source.to_string()),
		}
	}
}
impl From<ReqwestError> for FetchError {
	fn from(e: ReqwestError) -> Self {
		Self::unclassified(e)
	}
}
impl From<serde_path_to_error::Error<serde_json::Error>> for FetchError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		Self::unclassified(e)
	}
}
impl From<url::ParseError> for FetchError {
	fn from(e: url::ParseError) -> Self {
		Self::unclassified(e)
	}
}

/// Configuration and validation failures raised while wiring providers.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A required setting is absent or blank.
	#[error("Missing required setting `{name}`.")]
	MissingSetting {
		/// Setting name.
		name: &'static str,
	},
	/// A provider URL cannot be parsed.
	#[error("Setting `{name}` is not a valid URL.")]
	InvalidUrl {
		/// Setting name.
		name: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A provider URL uses something other than HTTP(S).
	#[error("Setting `{name}` must use http or https: {url}.")]
	UnsupportedScheme {
		/// Setting name.
		name: &'static str,
		/// URL that failed validation.
		url: String,
	},
	/// The fan-out limit is not a positive integer.
	#[error("Fan-out limit must be a positive integer, got `{value}`.")]
	InvalidFanoutLimit {
		/// Raw value supplied.
		value: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
