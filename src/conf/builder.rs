// std
use std::{net::IpAddr, time::Duration as StdDuration};
// self
use crate::{
	_prelude::*,
	auth::Secret,
	conf::{Configuration, HttpClientConfig},
	media::MediaProvider,
};

const DEFAULT_REST_BASE_URL: &str = "https://api.twitter.com/";
const DEFAULT_UPLOAD_BASE_URL: &str = "https://upload.twitter.com/";
const DEFAULT_VERIFY_CREDENTIALS_JSON_URL: &str =
	"https://api.twitter.com/1/account/verify_credentials.json";

/// Errors raised while constructing or validating configurations.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ConfigurationError {
	/// Endpoint could not be parsed.
	#[error("The {endpoint} endpoint is not a valid URL: {url}.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Raw value that failed to parse.
		url: String,
	},
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Base URLs must be able to carry relative paths.
	#[error("The {endpoint} endpoint cannot be used as a base URL: {url}.")]
	NotABaseUrl {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// User agent must not be blank.
	#[error("User agent must not be empty.")]
	EmptyUserAgent,
	/// Timeouts must be positive.
	#[error("The {timeout} timeout must be greater than zero.")]
	ZeroTimeout {
		/// Which timeout failed validation.
		timeout: &'static str,
	},
	/// Media provider parameter names must not be blank.
	#[error("Media provider parameter names must not be empty.")]
	EmptyParameterName,
}

/// Builder for [`Configuration`] values.
///
/// Also the deserialization shape of [`Configuration`]: every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigurationBuilder {
	/// REST base URL override.
	pub rest_base_url: Option<Url>,
	/// Upload base URL override.
	pub upload_base_url: Option<Url>,
	/// JSON verify-credentials URL override.
	pub verify_credentials_json_url: Option<Url>,
	/// Transport settings.
	pub http: HttpClientConfig,
	/// Media host selection.
	pub media_provider: MediaProvider,
	/// Media host API key.
	pub media_provider_api_key: Option<Secret>,
	/// Media host upload URL override.
	pub media_provider_upload_url: Option<Url>,
	/// Ordered extra upload fields.
	pub media_provider_parameters: Vec<(String, String)>,
	/// Whether `include_entities` is requested; `None` means the default (`true`).
	pub include_entities: Option<bool>,
}
impl ConfigurationBuilder {
	/// Creates an empty builder; unset endpoints fall back to the public service.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the REST base URL.
	pub fn rest_base_url(mut self, url: Url) -> Self {
		self.rest_base_url = Some(url);

		self
	}

	/// Sets the upload base URL.
	pub fn upload_base_url(mut self, url: Url) -> Self {
		self.upload_base_url = Some(url);

		self
	}

	/// Sets the JSON verify-credentials URL.
	pub fn verify_credentials_json_url(mut self, url: Url) -> Self {
		self.verify_credentials_json_url = Some(url);

		self
	}

	/// Replaces the transport settings.
	pub fn http(mut self, http: HttpClientConfig) -> Self {
		self.http = http;

		self
	}

	/// Overrides the user agent.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.http.user_agent = user_agent.into();

		self
	}

	/// Overrides the connect and read timeouts.
	pub fn timeouts(mut self, connect: StdDuration, read: StdDuration) -> Self {
		self.http.connect_timeout = connect;
		self.http.read_timeout = read;

		self
	}

	/// Selects the media host.
	pub fn media_provider(mut self, provider: MediaProvider) -> Self {
		self.media_provider = provider;

		self
	}

	/// Sets the media host API key.
	pub fn media_provider_api_key(mut self, key: impl Into<String>) -> Self {
		self.media_provider_api_key = Some(Secret::new(key));

		self
	}

	/// Overrides the media host upload URL.
	pub fn media_provider_upload_url(mut self, url: Url) -> Self {
		self.media_provider_upload_url = Some(url);

		self
	}

	/// Appends one extra upload field.
	pub fn media_provider_parameter(
		mut self,
		name: impl Into<String>,
		value: impl Into<String>,
	) -> Self {
		self.media_provider_parameters.push((name.into(), value.into()));

		self
	}

	/// Toggles `include_entities`.
	pub fn include_entities(mut self, include: bool) -> Self {
		self.include_entities = Some(include);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<Configuration, ConfigurationError> {
		let rest_base_url = base_url(
			"rest",
			resolve("rest", self.rest_base_url, DEFAULT_REST_BASE_URL)?,
		)?;
		let upload_base_url = base_url(
			"upload",
			resolve("upload", self.upload_base_url, DEFAULT_UPLOAD_BASE_URL)?,
		)?;
		let verify_credentials_json_url = resolve(
			"verify_credentials_json",
			self.verify_credentials_json_url,
			DEFAULT_VERIFY_CREDENTIALS_JSON_URL,
		)?;
		let conf = Configuration {
			rest_base_url,
			upload_base_url,
			verify_credentials_json_url,
			http: self.http,
			media_provider: self.media_provider,
			media_provider_api_key: self.media_provider_api_key,
			media_provider_upload_url: self.media_provider_upload_url,
			media_provider_parameters: self.media_provider_parameters,
			include_entities: self.include_entities.unwrap_or(true),
		};

		conf.validate()?;

		Ok(conf)
	}
}

impl TryFrom<ConfigurationBuilder> for Configuration {
	type Error = ConfigurationError;

	fn try_from(builder: ConfigurationBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}

impl Configuration {
	/// Validates invariants for the configuration (also useful after mutating fields).
	pub fn validate(&self) -> Result<(), ConfigurationError> {
		validate_base_url("rest", &self.rest_base_url)?;
		validate_base_url("upload", &self.upload_base_url)?;
		validate_endpoint("rest", &self.rest_base_url)?;
		validate_endpoint("upload", &self.upload_base_url)?;
		validate_endpoint("verify_credentials_json", &self.verify_credentials_json_url)?;

		if let Some(url) = self.media_provider_upload_url.as_ref() {
			validate_endpoint("media_provider_upload", url)?;
		}
		if self.http.user_agent.trim().is_empty() {
			return Err(ConfigurationError::EmptyUserAgent);
		}
		if self.http.connect_timeout.is_zero() {
			return Err(ConfigurationError::ZeroTimeout { timeout: "connect" });
		}
		if self.http.read_timeout.is_zero() {
			return Err(ConfigurationError::ZeroTimeout { timeout: "read" });
		}
		if self.media_provider_parameters.iter().any(|(name, _)| name.trim().is_empty()) {
			return Err(ConfigurationError::EmptyParameterName);
		}

		Ok(())
	}
}

fn resolve(
	endpoint: &'static str,
	configured: Option<Url>,
	default: &str,
) -> Result<Url, ConfigurationError> {
	match configured {
		Some(url) => Ok(url),
		None => Url::parse(default)
			.map_err(|_| ConfigurationError::InvalidEndpoint { endpoint, url: default.into() }),
	}
}

/// Ensures relative joins keep the configured path prefix.
fn base_url(endpoint: &'static str, mut url: Url) -> Result<Url, ConfigurationError> {
	if url.cannot_be_a_base() {
		return Err(ConfigurationError::NotABaseUrl { endpoint, url: url.to_string() });
	}
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	Ok(url)
}

fn validate_base_url(endpoint: &'static str, url: &Url) -> Result<(), ConfigurationError> {
	if url.cannot_be_a_base() || !url.path().ends_with('/') {
		return Err(ConfigurationError::NotABaseUrl { endpoint, url: url.to_string() });
	}

	Ok(())
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigurationError> {
	if url.scheme() == "https" || (url.scheme() == "http" && is_loopback(url)) {
		Ok(())
	} else {
		Err(ConfigurationError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host_str() {
		Some("localhost") => true,
		Some(host) => host
			.trim_start_matches('[')
			.trim_end_matches(']')
			.parse::<IpAddr>()
			.is_ok_and(|ip| ip.is_loopback()),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse test URL.")
	}

	#[test]
	fn defaults_point_at_public_service() {
		let conf = Configuration::builder().build().expect("Defaults should validate.");

		assert_eq!(conf.rest_base_url.as_str(), "https://api.twitter.com/");
		assert_eq!(conf.upload_base_url.as_str(), "https://upload.twitter.com/");
		assert_eq!(
			conf.verify_credentials_json_url.as_str(),
			"https://api.twitter.com/1/account/verify_credentials.json"
		);
		assert!(conf.include_entities);
		assert_eq!(conf.media_provider, MediaProvider::Twitter);
		assert!(conf.media_provider_parameters.is_empty());
	}

	#[test]
	fn rejects_plain_http_except_loopback() {
		let err = Configuration::builder()
			.rest_base_url(url("http://api.example.com/"))
			.build()
			.expect_err("Plain HTTP should be rejected for remote hosts.");

		assert!(matches!(err, ConfigurationError::InsecureEndpoint { endpoint: "rest", .. }));

		for local in ["http://127.0.0.1:9000/", "http://localhost/", "http://[::1]:8080/"] {
			assert!(Configuration::builder().rest_base_url(url(local)).build().is_ok());
		}
	}

	#[test]
	fn base_urls_gain_trailing_slash() {
		let conf = Configuration::builder()
			.rest_base_url(url("https://proxy.example.com/twitter"))
			.build()
			.expect("Base URL without trailing slash should be normalized.");

		assert_eq!(
			conf.rest_base_url.join("1.1/users/show.json").map(|u| u.to_string()).ok(),
			Some("https://proxy.example.com/twitter/1.1/users/show.json".into())
		);
	}

	#[test]
	fn validate_rejects_base_urls_that_would_drop_their_prefix() {
		let mut conf = Configuration::builder().build().expect("Defaults should validate.");

		conf.rest_base_url = url("https://proxy.example.com/twitter");

		assert_eq!(
			conf.validate(),
			Err(ConfigurationError::NotABaseUrl {
				endpoint: "rest",
				url: "https://proxy.example.com/twitter".into(),
			})
		);
	}

	#[test]
	fn deserialized_base_urls_keep_their_prefix() {
		let conf = serde_json::from_str::<Configuration>(
			r#"{"rest_base_url":"https://proxy.example.com/twitter"}"#,
		)
		.expect("Configuration should deserialize.");

		assert_eq!(conf.rest_base_url.as_str(), "https://proxy.example.com/twitter/");
		assert_eq!(
			conf.rest_base_url.join("1.1/users/show.json").map(|u| u.to_string()).ok(),
			Some("https://proxy.example.com/twitter/1.1/users/show.json".into())
		);
		assert_eq!(conf.validate(), Ok(()));
	}

	#[test]
	fn partial_documents_fall_back_to_defaults() {
		let conf = serde_json::from_str::<Configuration>(r#"{"media_provider":"imgly"}"#)
			.expect("Partial configuration should deserialize.");

		let defaults = Configuration::builder().build().expect("Defaults should validate.");

		assert_eq!(conf, Configuration { media_provider: MediaProvider::Imgly, ..defaults });
	}

	#[test]
	fn serialized_configurations_deserialize_unchanged() {
		let conf = Configuration::builder()
			.media_provider(MediaProvider::Twitpic)
			.media_provider_api_key("key")
			.media_provider_parameter("source", "demo")
			.include_entities(false)
			.build()
			.expect("Configuration should validate.");
		let json = serde_json::to_string(&conf).expect("Configuration should serialize.");

		assert_eq!(serde_json::from_str::<Configuration>(&json).ok(), Some(conf));
	}

	#[test]
	fn deserialization_rejects_insecure_endpoints() {
		let err = serde_json::from_str::<Configuration>(
			r#"{"upload_base_url":"http://upload.example.com/"}"#,
		)
		.expect_err("Plain HTTP should be rejected for remote hosts.");

		assert!(err.to_string().contains("must use HTTPS"));
	}

	#[test]
	fn rejects_blank_user_agent_timeouts_and_parameter_names() {
		assert_eq!(
			Configuration::builder().user_agent("  ").build(),
			Err(ConfigurationError::EmptyUserAgent)
		);
		assert_eq!(
			Configuration::builder().timeouts(StdDuration::ZERO, StdDuration::from_secs(1)).build(),
			Err(ConfigurationError::ZeroTimeout { timeout: "connect" })
		);
		assert_eq!(
			Configuration::builder().media_provider_parameter(" ", "x").build(),
			Err(ConfigurationError::EmptyParameterName)
		);
	}

	#[test]
	fn media_provider_parameters_keep_insertion_order() {
		let conf = Configuration::builder()
			.media_provider_parameter("z", "1")
			.media_provider_parameter("a", "2")
			.build()
			.expect("Configuration should validate.");

		assert_eq!(
			conf.media_provider_parameters,
			vec![("z".to_owned(), "1".to_owned()), ("a".to_owned(), "2".to_owned())]
		);
	}
}
