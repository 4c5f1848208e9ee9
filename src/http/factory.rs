//! Builds the default reqwest transport from [`HttpClientConfig`].

// crates.io
#[cfg(feature = "reqwest")] use reqwest::{Proxy, redirect::Policy};
// self
#[cfg(feature = "reqwest")]
use crate::{_prelude::*, conf::HttpClientConfig, error::ConfigError, http::ReqwestHttpClient};

/// Factory returning the concrete HTTP client wrapper used by the bindings.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpClientFactory;
#[cfg(feature = "reqwest")]
impl HttpClientFactory {
	/// Builds a transport honoring timeouts, user agent, proxy, and compression settings.
	///
	/// Redirects are never followed so redirect-based endpoints can read `Location`.
	pub fn instance(conf: &HttpClientConfig) -> Result<ReqwestHttpClient> {
		let mut builder = ReqwestClient::builder()
			.user_agent(conf.user_agent.as_str())
			.connect_timeout(conf.connect_timeout)
			.timeout(conf.read_timeout)
			.gzip(conf.gzip)
			.redirect(Policy::none());

		if let Some(proxy) = &conf.proxy {
			let mut upstream = Proxy::all(format!("http://{}:{}", proxy.host, proxy.port))
				.map_err(ConfigError::from)?;

			if let Some(user) = &proxy.user {
				upstream = upstream.basic_auth(
					user,
					proxy.password.as_ref().map(|password| password.expose()).unwrap_or_default(),
				);
			}

			builder = builder.proxy(upstream);
		}

		let client = builder.build().map_err(ConfigError::from)?;

		Ok(ReqwestHttpClient::with_client(client))
	}
}
