//! Request gate that admits only credentials whose digest is in the [`HashStore`].

// std
use std::net::IpAddr;
// self
use crate::{
	_prelude::*,
	auth::credential_digest,
	obs::{LogEvent, SharedSink},
	store::{HashStore, StoreError},
};

const MIDDLEWARE: &str = "authByToken";
const REJECTED: &str = "request with invalid apiKey";

/// Outcome of checking a request credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthDecision {
	/// Digest found; the request may proceed.
	Allowed,
	/// Credential missing or unknown.
	Rejected,
	/// The store could not be read.
	Unavailable(StoreError),
}

/// Verifies request credentials. Holds no cache; every check consults the store.
#[derive(Clone)]
pub struct AuthGate {
	store: Arc<dyn HashStore>,
	events: SharedSink,
}
impl AuthGate {
	/// Creates a gate over `store`, logging to `events`.
	pub fn new(store: Arc<dyn HashStore>, events: SharedSink) -> Self {
		Self { store, events }
	}

	/// Returns whether `credential` is known. A missing or empty credential is rejected
	/// without hashing; a store failure is returned as `Err`.
	pub async fn verify(&self, credential: Option<&str>) -> Result<bool, StoreError> {
		match credential.filter(|c| !c.is_empty()) {
			Some(credential) => self.store.contains(&credential_digest(credential)).await,
			None => Ok(false),
		}
	}

	/// Runs [`verify`](Self::verify) for a request and logs rejections and store faults.
	pub async fn check(&self, credential: Option<&str>, client_ip: Option<IpAddr>) -> AuthDecision {
		match self.verify(credential).await {
			Ok(true) => AuthDecision::Allowed,
			Ok(false) => {
				let ip = client_ip.map(|ip| ip.to_string()).unwrap_or_default();

				self.events
					.emit(LogEvent::info(REJECTED).with("middleware", MIDDLEWARE).with("ip", ip));

				AuthDecision::Rejected
			},
			Err(err) => {
				self.events
					.emit(LogEvent::error(err.to_string()).with("middleware", MIDDLEWARE));

				AuthDecision::Unavailable(err)
			},
		}
	}
}
impl Debug for AuthGate {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthGate").finish_non_exhaustive()
	}
}
