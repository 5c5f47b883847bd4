//! Country-specific address providers behind one search contract.
//!
//! `contract` defines [`AddressProvider`] (fetch raw → parse) and the single orchestrating
//! [`search`] that classifies and logs failures. `gb` and `us` implement it against Ideal
//! Postcodes and Smarty; `registry` maps country codes to fresh provider instances.

pub mod contract;
pub mod gb;
pub mod registry;
pub mod us;

pub use contract::*;
pub use gb::GbProvider;
pub use registry::*;
pub use us::UsProvider;

// self
use crate::_prelude::*;

/// Backing services the crate knows how to call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
	/// Ideal Postcodes, used for GB.
	IdealPostcodes,
	/// Smarty US Autocomplete Pro, used for US.
	Smarty,
}
impl ProviderId {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProviderId::IdealPostcodes => "ideal_postcodes",
			ProviderId::Smarty => "smarty",
		}
	}
}
impl Display for ProviderId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
