// self
use crate::obs::SearchOutcome;

/// Counter incremented for every search attempt, success, and failure.
pub const SEARCH_TOTAL: &str = "address_autocomplete_search_total";
/// Counter incremented for every detail resolution dropped from a result set.
pub const RESOLUTION_DROPPED_TOTAL: &str = "address_autocomplete_resolution_dropped_total";

/// Records a search outcome via the global metrics recorder (when enabled).
pub fn record_search_outcome(service: &'static str, outcome: SearchOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(SEARCH_TOTAL, "service" => service, "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (service, outcome);
	}
}

/// Records a suggestion whose detail lookup failed and was left out of the results.
pub fn record_dropped_resolution(service: &'static str) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(RESOLUTION_DROPPED_TOTAL, "service" => service).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = service;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_are_noops_without_a_global_recorder() {
		record_search_outcome("UsProvider", SearchOutcome::Failure);
		record_dropped_resolution("GbProvider");
	}
}
