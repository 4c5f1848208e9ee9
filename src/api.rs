//! Endpoint bindings and the [`Twitter`] client that carries them.

pub mod model;
pub mod users;

pub use model::*;
pub use users::*;

// self
use crate::{
	_prelude::*,
	auth::{OAuthAuthorization, percent_encode},
	conf::Configuration,
	error::ConfigError,
	http::{ApiHttpClient, ApiRequest, ApiResponse, HttpParameter},
	media::ImageUploadFactory,
	obs::{self, Operation},
};
#[cfg(feature = "reqwest")]
use crate::{
	auth::OAuthCredentials,
	http::{HttpClientFactory, ReqwestHttpClient},
};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestTwitter = Twitter<ReqwestHttpClient>;

/// REST API generations served under the same base URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiVersion {
	/// Legacy `1/` endpoints.
	V1,
	/// Current `1.1/` endpoints.
	V1_1,
}
impl ApiVersion {
	/// Path prefix joined onto the REST base URL.
	pub const fn prefix(self) -> &'static str {
		match self {
			ApiVersion::V1 => "1/",
			ApiVersion::V1_1 => "1.1/",
		}
	}
}

/// Signed REST client.
///
/// The client owns the configuration, signer, and transport so individual bindings only
/// describe their endpoint path and parameters. Every call is OAuth-signed with whatever
/// credentials the signer carries.
pub struct Twitter<C>
where
	C: ?Sized + ApiHttpClient,
{
	conf: Arc<Configuration>,
	auth: Arc<OAuthAuthorization>,
	http_client: Arc<C>,
}
impl<C> Twitter<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		conf: Configuration,
		auth: OAuthAuthorization,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self { conf: Arc::new(conf), auth: Arc::new(auth), http_client: http_client.into() }
	}

	/// Active configuration.
	pub fn configuration(&self) -> &Configuration {
		&self.conf
	}

	/// Signer used for every call.
	pub fn authorization(&self) -> &OAuthAuthorization {
		&self.auth
	}

	/// Shared transport.
	pub fn http_client(&self) -> &Arc<C> {
		&self.http_client
	}

	/// Factory for media uploaders sharing this client's configuration, signer, and transport.
	pub fn image_upload_factory(&self) -> ImageUploadFactory<C> {
		ImageUploadFactory::new(
			Arc::clone(&self.conf),
			Arc::clone(&self.auth),
			Arc::clone(&self.http_client),
		)
	}

	pub(crate) fn endpoint(&self, version: ApiVersion, path: &str) -> Result<Url> {
		let relative = format!("{}{path}", version.prefix());

		self.conf
			.rest_base_url
			.join(&relative)
			.map_err(|source| ConfigError::InvalidUrl { url: relative, source }.into())
	}

	/// Path segment encoded for safe interpolation into endpoint paths.
	pub(crate) fn segment(value: &str) -> String {
		percent_encode(value)
	}

	pub(crate) fn entities_parameter(&self) -> Option<HttpParameter> {
		self.conf.include_entities.then(|| HttpParameter::text("include_entities", "true"))
	}

	/// Signs, sends, and status-checks one request inside an observed span.
	pub(crate) async fn call(
		&self,
		operation: Operation,
		request: ApiRequest,
	) -> Result<ApiResponse> {
		obs::observe(operation, "request", async move {
			let request = request.signed(&self.auth)?;
			let response = self.http_client.execute(request).await?;

			if let Some(limit) = response.rate_limit() {
				obs::observe_rate_limit(operation, &limit);
			}

			response.error_for_status()
		})
		.await
	}
}
#[cfg(feature = "reqwest")]
impl Twitter<ReqwestHttpClient> {
	/// Creates a client with a transport built from the configuration's HTTP settings.
	pub fn new(conf: Configuration, credentials: OAuthCredentials) -> Result<Self> {
		let http_client = HttpClientFactory::instance(&conf.http)?;

		Ok(Self::with_http_client(conf, OAuthAuthorization::new(credentials), http_client))
	}
}
impl<C> Clone for Twitter<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			conf: Arc::clone(&self.conf),
			auth: Arc::clone(&self.auth),
			http_client: Arc::clone(&self.http_client),
		}
	}
}
impl<C> Debug for Twitter<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Twitter")
			.field("rest_base_url", &self.conf.rest_base_url.as_str())
			.field("auth", &self.auth)
			.finish()
	}
}
