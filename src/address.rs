//! Normalized address shapes shared by every provider.

// self
use crate::_prelude::*;

/// Normalized address returned by every provider's parse step.
///
/// Every field may be empty; `id` stays empty when the provider has no stable identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
	/// Provider identifier for the address, if any.
	pub id: String,
	/// Human-readable single-line label.
	pub name: String,
	/// First address line.
	pub line1: String,
	/// Second address line.
	pub line2: String,
	/// Third address line.
	pub line3: String,
	/// Post town or city.
	pub city: String,
	/// Postal code.
	pub zip: String,
	/// County or state.
	pub state: String,
	/// ISO 3166-1 alpha-2 country code.
	pub country: String,
}

/// Lightweight candidate produced by a first-phase lookup; resolved before it leaves a provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
	/// Provider identifier used to resolve the candidate.
	pub id: String,
	/// Display label of the candidate.
	pub label: String,
}
impl Suggestion {
	/// Creates a new suggestion.
	pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
		Self { id: id.into(), label: label.into() }
	}
}
