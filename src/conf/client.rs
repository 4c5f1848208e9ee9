// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, auth::Secret};

/// Transport settings consumed by [`HttpClientFactory`](crate::http::HttpClientFactory).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
	/// `User-Agent` header sent with every request.
	pub user_agent: String,
	/// TCP/TLS connect timeout.
	pub connect_timeout: StdDuration,
	/// Whole-request timeout.
	pub read_timeout: StdDuration,
	/// Accepts gzip-compressed responses.
	pub gzip: bool,
	/// Optional HTTP proxy.
	pub proxy: Option<ProxyConfig>,
}
impl Default for HttpClientConfig {
	fn default() -> Self {
		Self {
			user_agent: concat!("twitter-rest/", env!("CARGO_PKG_VERSION")).into(),
			connect_timeout: StdDuration::from_secs(20),
			read_timeout: StdDuration::from_secs(120),
			gzip: true,
			proxy: None,
		}
	}
}

/// HTTP proxy endpoint plus optional basic credentials.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
	/// Proxy host name.
	pub host: String,
	/// Proxy port.
	pub port: u16,
	/// Proxy user.
	pub user: Option<String>,
	/// Proxy password.
	pub password: Option<Secret>,
}
