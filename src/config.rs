//! Process-wide, read-only provider configuration.
//!
//! Loaded once at startup (typically via [`ProviderConfig::from_env`]) and shared behind an
//! [`Arc`]. Providers copy the pieces they need when the registry constructs them.

// self
use crate::{_prelude::*, error::ConfigError, secret::Secret};

/// Default Smarty US Autocomplete Pro endpoint.
pub const DEFAULT_SMARTY_URL: &str = "https://us-autocomplete-pro.api.smarty.com";
/// Default number of concurrent detail lookups per GB search.
pub const DEFAULT_FANOUT_LIMIT: usize = 8;

/// Ideal Postcodes (GB) connection settings.
#[derive(Clone, Debug)]
pub struct IdealPostcodesConfig {
	/// Base URL that API paths are appended to, e.g. `https://api.ideal-postcodes.co.uk/v1`.
	pub base_url: Url,
	/// API key sent as the `api_key` query parameter.
	pub api_key: Secret,
}
impl IdealPostcodesConfig {
	/// Validates and builds the settings.
	pub fn new(base_url: Url, api_key: impl Into<String>) -> Result<Self, ConfigError> {
		validate_base_url("IDEAL_POSTCODES_URL", &base_url)?;

		Ok(Self { base_url, api_key: Secret::new(api_key) })
	}
}

/// Smarty (US) connection settings.
#[derive(Clone, Debug)]
pub struct SmartyConfig {
	/// Base URL of the autocomplete service.
	pub base_url: Url,
	/// `auth-id` credential.
	pub auth_id: Secret,
	/// `auth-token` credential.
	pub auth_token: Secret,
}
impl SmartyConfig {
	/// Validates and builds the settings.
	pub fn new(
		base_url: Url,
		auth_id: impl Into<String>,
		auth_token: impl Into<String>,
	) -> Result<Self, ConfigError> {
		validate_base_url("SMARTY_URL", &base_url)?;

		Ok(Self { base_url, auth_id: Secret::new(auth_id), auth_token: Secret::new(auth_token) })
	}
}

/// Settings for every backing provider.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
	/// GB provider settings.
	pub ideal_postcodes: IdealPostcodesConfig,
	/// US provider settings.
	pub smarty: SmartyConfig,
	/// Upper bound on concurrent detail lookups per GB search (at least 1).
	pub fanout_limit: usize,
}
impl ProviderConfig {
	/// Creates a configuration with the default fan-out limit.
	pub fn new(ideal_postcodes: IdealPostcodesConfig, smarty: SmartyConfig) -> Self {
		Self { ideal_postcodes, smarty, fanout_limit: DEFAULT_FANOUT_LIMIT }
	}

	/// Overrides the fan-out limit; values below 1 are raised to 1.
	pub fn with_fanout_limit(mut self, limit: usize) -> Self {
		self.fanout_limit = limit.max(1);

		self
	}

	/// Loads the configuration from process environment variables.
	///
	/// Reads `IDEAL_POSTCODES_URL`, `IDEAL_POSTCODES_API_KEY`, `SMARTY_AUTH_ID`,
	/// `SMARTY_AUTH_TOKEN`, and optionally `SMARTY_URL` and `ADDRESS_FANOUT_LIMIT`.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Loads the configuration from any name → value source.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let setting = |name: &'static str| lookup(name).filter(|value| !value.trim().is_empty());
		let required =
			|name: &'static str| setting(name).ok_or(ConfigError::MissingSetting { name });
		let ideal_postcodes = IdealPostcodesConfig::new(
			parse_url("IDEAL_POSTCODES_URL", &required("IDEAL_POSTCODES_URL")?)?,
			required("IDEAL_POSTCODES_API_KEY")?,
		)?;
		let smarty_url = setting("SMARTY_URL").unwrap_or_else(|| DEFAULT_SMARTY_URL.to_owned());
		let smarty = SmartyConfig::new(
			parse_url("SMARTY_URL", &smarty_url)?,
			required("SMARTY_AUTH_ID")?,
			required("SMARTY_AUTH_TOKEN")?,
		)?;
		let fanout_limit = match setting("ADDRESS_FANOUT_LIMIT") {
			Some(raw) => parse_fanout_limit(&raw)?,
			None => DEFAULT_FANOUT_LIMIT,
		};

		Ok(Self { ideal_postcodes, smarty, fanout_limit })
	}
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { name, source })
}

fn validate_base_url(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(ConfigError::UnsupportedScheme { name, url: url.to_string() }),
	}
}

fn parse_fanout_limit(raw: &str) -> Result<usize, ConfigError> {
	match raw.trim().parse::<usize>() {
		Ok(limit) if limit > 0 => Ok(limit),
		_ => Err(ConfigError::InvalidFanoutLimit { value: raw.to_owned() }),
	}
}
