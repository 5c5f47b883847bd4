//! Observability helpers: the injected event sink plus optional spans and metrics.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `address_autocomplete.search` with the
//!   `service` (provider implementation) and `stage` fields, and to let [`TracingSink`] forward
//!   [`LogEvent`]s as `tracing` events.
//! - Enable `metrics` to increment the `address_autocomplete_search_total` counter for every
//!   attempt/success/failure, labeled by `service` + `outcome`.

mod events;
mod metrics;
mod tracing;

pub use events::*;
pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchOutcome {
	/// Entry to a provider search.
	Attempt,
	/// Search returned records (possibly none).
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl SearchOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SearchOutcome::Attempt => "attempt",
			SearchOutcome::Success => "success",
			SearchOutcome::Failure => "failure",
		}
	}
}
impl Display for SearchOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
