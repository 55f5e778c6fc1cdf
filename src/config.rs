use std::{
	env,
	net::{IpAddr, Ipv4Addr},
	time::Duration,
};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://blog.db";
pub const DEFAULT_PORT: u16 = 3000;
/// 30 days.
pub const DEFAULT_SESSION_MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{name} must be {expected}, got {value:?}")]
	Invalid {
		name: &'static str,
		expected: &'static str,
		value: String,
	},
}

/// Runtime configuration, read from the environment.
///
/// A `.env` file is loaded first if one exists, so every value can also live there.
#[derive(Debug, Clone)]
pub struct Config {
	/// SQLite connection string. The file is created if it does not exist.
	pub database_url: String,
	pub host: IpAddr,
	pub port: u16,
	/// Marks the session cookie `Secure`. Enable when served over HTTPS.
	pub secure_cookies: bool,
	/// Sessions older than this are rejected and purged on the next login.
	pub session_max_age: Duration,
	/// When set, traces and metrics are exported over OTLP to this endpoint.
	pub otlp_endpoint: Option<String>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			database_url: DEFAULT_DATABASE_URL.into(),
			host: IpAddr::V4(Ipv4Addr::LOCALHOST),
			port: DEFAULT_PORT,
			secure_cookies: false,
			session_max_age: DEFAULT_SESSION_MAX_AGE,
			otlp_endpoint: None,
		}
	}
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let defaults = Self::default();

		Ok(Self {
			database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
			host: parse(&lookup, "HOST", "an ip address")?.unwrap_or(defaults.host),
			port: parse(&lookup, "PORT", "a port number")?.unwrap_or(defaults.port),
			secure_cookies: parse(&lookup, "COOKIE_SECURE", "true or false")?
				.unwrap_or(defaults.secure_cookies),
			session_max_age: parse(&lookup, "SESSION_MAX_AGE", "a number of seconds")?
				.map_or(defaults.session_max_age, Duration::from_secs),
			otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|url| !url.is_empty()),
		})
	}
}

fn parse<T: std::str::FromStr>(
	lookup: &impl Fn(&str) -> Option<String>,
	name: &'static str,
	expected: &'static str,
) -> Result<Option<T>, Error> {
	lookup(name)
		.map(|value| {
			value.parse().map_err(|_| Error::Invalid {
				name,
				expected,
				value,
			})
		})
		.transpose()
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;

	use super::*;

	fn config(vars: &[(&str, &str)]) -> Result<Config, Error> {
		let vars = vars
			.iter()
			.map(|(k, v)| ((*k).to_string(), (*v).to_string()))
			.collect::<HashMap<_, _>>();

		Config::from_lookup(|name| vars.get(name).cloned())
	}

	#[test]
	fn test_defaults() {
		let config = config(&[]).unwrap();

		assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
		assert_eq!(config.port, DEFAULT_PORT);
		assert!(config.host.is_loopback());
		assert!(!config.secure_cookies);
		assert_eq!(config.session_max_age, DEFAULT_SESSION_MAX_AGE);
		assert!(config.otlp_endpoint.is_none());
	}

	#[test]
	fn test_overrides() {
		let config = config(&[
			("DATABASE_URL", "sqlite::memory:"),
			("HOST", "0.0.0.0"),
			("PORT", "8080"),
			("COOKIE_SECURE", "true"),
			("SESSION_MAX_AGE", "3600"),
			("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
		])
		.unwrap();

		assert_eq!(config.database_url, "sqlite::memory:");
		assert!(config.host.is_unspecified());
		assert_eq!(config.port, 8080);
		assert!(config.secure_cookies);
		assert_eq!(config.session_max_age, Duration::from_secs(3600));
		assert_eq!(config.otlp_endpoint.as_deref(), Some("http://localhost:4317"));
	}

	#[test]
	fn test_invalid_port() {
		let error = config(&[("PORT", "http")]).unwrap_err();

		assert_eq!(error.to_string(), r#"PORT must be a port number, got "http""#);
	}
}
