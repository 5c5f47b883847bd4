//! Country code → provider resolution.

// self
use crate::{
	_prelude::*,
	config::ProviderConfig,
	obs::SharedSink,
	provider::{AddressSearch, GbProvider, UsProvider, us::ReqwestSmartyClient},
};

/// Countries with a backing provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Country {
	/// United Kingdom, served by Ideal Postcodes.
	Gb,
	/// United States, served by Smarty.
	Us,
}
impl Country {
	/// Matches an ISO alpha-2 code case-insensitively; unknown codes yield `None`.
	pub fn from_code(code: &str) -> Option<Self> {
		if code.eq_ignore_ascii_case("gb") {
			Some(Self::Gb)
		} else if code.eq_ignore_ascii_case("us") {
			Some(Self::Us)
		} else {
			None
		}
	}

	/// Lowercase ISO alpha-2 code.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Gb => "gb",
			Self::Us => "us",
		}
	}
}
impl Display for Country {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Builds a fresh provider for every resolution from shared read-only configuration.
#[derive(Clone)]
pub struct ProviderRegistry {
	config: Arc<ProviderConfig>,
	http: ReqwestClient,
	events: SharedSink,
}
impl ProviderRegistry {
	/// Creates a registry; `http` is shared by every provider it builds.
	pub fn new(config: Arc<ProviderConfig>, http: ReqwestClient, events: SharedSink) -> Self {
		Self { config, http, events }
	}

	/// Resolves `code` to a provider, or `None` when the country is unsupported.
	pub fn resolve(&self, code: &str) -> Option<Box<dyn AddressSearch>> {
		Country::from_code(code).map(|country| self.provider_for(country))
	}

	/// Builds the provider for a known country.
	pub fn provider_for(&self, country: Country) -> Box<dyn AddressSearch> {
		match country {
			Country::Gb => Box::new(GbProvider::new(
				self.http.clone(),
				self.config.ideal_postcodes.clone(),
				self.config.fanout_limit,
				self.events.clone(),
			)),
			Country::Us => Box::new(UsProvider::new(
				Arc::new(ReqwestSmartyClient::new(self.http.clone(), &self.config.smarty)),
				self.events.clone(),
			)),
		}
	}
}
impl Debug for ProviderRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderRegistry").field("config", &self.config).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		config::{IdealPostcodesConfig, SmartyConfig},
		obs::MemorySink,
	};

	fn registry() -> ProviderRegistry {
		let ideal = IdealPostcodesConfig::new(
			Url::parse("https://api.ideal-postcodes.co.uk/v1").expect("Fixture URL should parse."),
			"ak_test",
		)
		.expect("Fixture config should validate.");
		let smarty = SmartyConfig::new(
			Url::parse("https://us-autocomplete-pro.api.smarty.com").expect("Fixture URL should parse."),
			"id",
			"token",
		)
		.expect("Fixture config should validate.");

		ProviderRegistry::new(
			Arc::new(ProviderConfig::new(ideal, smarty)),
			ReqwestClient::new(),
			Arc::new(MemorySink::default()),
		)
	}

	#[test]
	fn country_codes_match_case_insensitively() {
		for code in ["gb", "GB", "Gb", "gB"] {
			assert_eq!(Country::from_code(code), Some(Country::Gb));
		}
		for code in ["us", "US", "Us"] {
			assert_eq!(Country::from_code(code), Some(Country::Us));
		}
		for code in ["", "fr", "gbr", "u s"] {
			assert_eq!(Country::from_code(code), None);
		}
	}

	#[test]
	fn resolve_picks_provider_per_country() {
		let registry = registry();

		assert_eq!(registry.resolve("GB").map(|p| p.service_name()), Some("GbProvider"));
		assert_eq!(registry.resolve("us").map(|p| p.service_name()), Some("UsProvider"));
		assert!(registry.resolve("de").is_none());
	}
}
