//! Media uploads, either straight to the platform or through OAuth Echo media hosts.
//!
//! [`ImageUploader`] owns the shared upload routine and delegates the host-specific parts to an
//! [`UploadProvider`]: `pre_upload` fills in the target URL, form fields, and headers, and
//! `post_upload` extracts the media URL from the host's answer. Use
//! [`ImageUploadFactory`] to pick the provider from [`Configuration`].

pub mod factory;
pub mod provider;

pub use factory::*;
pub use provider::*;

// self
use crate::{
	_prelude::*,
	auth::{OAuthAuthorization, Secret},
	conf::Configuration,
	error::ConfigError,
	http::{
		ApiFuture, ApiHttpClient, ApiRequest, ApiResponse, HttpMethod, HttpParameter,
		append_parameters,
	},
	obs::{self, Operation},
};

/// Realm announced in OAuth Echo authorization headers.
pub const ECHO_REALM: &str = "http://api.twitter.com/";

/// Media hosts selectable through [`Configuration::media_provider`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaProvider {
	/// The platform's own `update_with_media` endpoint.
	#[default]
	Twitter,
	/// Twitpic (OAuth Echo, API key required).
	Twitpic,
	/// img.ly (OAuth Echo).
	Imgly,
}
impl MediaProvider {
	/// Stable provider label used in errors and logs.
	pub const fn as_str(self) -> &'static str {
		match self {
			MediaProvider::Twitter => "twitter",
			MediaProvider::Twitpic => "twitpic",
			MediaProvider::Imgly => "imgly",
		}
	}

	/// Returns `true` when the host refuses uploads without an API key.
	pub const fn requires_api_key(self) -> bool {
		matches!(self, MediaProvider::Twitpic)
	}
}
impl Display for MediaProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Image payload handed to [`ImageUpload::upload`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaSource {
	/// File read from disk when the upload is sent.
	File(PathBuf),
	/// In-memory image announced under `file_name`.
	Stream {
		/// File name sent in the multipart part; its extension picks the content type.
		file_name: String,
		/// Raw image bytes.
		bytes: Arc<[u8]>,
	},
}
impl MediaSource {
	/// Creates an in-memory source.
	pub fn stream(file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
		Self::Stream { file_name: file_name.into(), bytes: bytes.into() }
	}

	/// Multipart field carrying the image under the `media` name.
	pub fn into_parameter(self) -> HttpParameter {
		match self {
			MediaSource::File(path) => HttpParameter::file("media", path),
			MediaSource::Stream { file_name, bytes } =>
				HttpParameter::stream("media", file_name, bytes),
		}
	}
}
impl From<PathBuf> for MediaSource {
	fn from(path: PathBuf) -> Self {
		Self::File(path)
	}
}
impl From<&Path> for MediaSource {
	fn from(path: &Path) -> Self {
		Self::File(path.to_path_buf())
	}
}

/// Uploads an image and returns the URL the host published it under.
pub trait ImageUpload
where
	Self: Send + Sync,
{
	/// Uploads `image`, attaching `message` when given.
	fn upload<'a>(&'a self, image: MediaSource, message: Option<&'a str>) -> ApiFuture<'a, String>;
}

/// Per-call upload state assembled by the uploader and its provider.
///
/// A fresh value is created for every [`ImageUpload::upload`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadRequest {
	/// Image field (`media`).
	pub image: HttpParameter,
	/// Message field (`message`), when the caller supplied one.
	pub message: Option<HttpParameter>,
	/// Target URL; must be set by [`UploadProvider::pre_upload`].
	pub upload_url: Option<Url>,
	/// Form fields sent with the upload; must be set by [`UploadProvider::pre_upload`].
	pub post_parameters: Option<Vec<HttpParameter>>,
	/// Configured extra fields appended after `post_parameters`.
	pub append_parameters: Vec<HttpParameter>,
	/// Extra headers sent with the upload.
	pub headers: BTreeMap<String, String>,
}
impl UploadRequest {
	/// Creates upload state for one image and optional message.
	pub fn new(image: MediaSource, message: Option<&str>) -> Self {
		Self {
			image: image.into_parameter(),
			message: message.map(|message| HttpParameter::text("message", message)),
			upload_url: None,
			post_parameters: None,
			append_parameters: Vec::new(),
			headers: BTreeMap::new(),
		}
	}

	/// Message text, or an empty string.
	pub fn message_text(&self) -> &str {
		self.message.as_ref().and_then(HttpParameter::value).unwrap_or_default()
	}
}

/// Shared read-only inputs handed to providers.
#[derive(Clone, Debug)]
pub struct UploadContext {
	conf: Arc<Configuration>,
	auth: Arc<OAuthAuthorization>,
	api_key: Option<Secret>,
}
impl UploadContext {
	/// Bundles the configuration, signer, and optional host API key.
	pub fn new(
		conf: Arc<Configuration>,
		auth: Arc<OAuthAuthorization>,
		api_key: Option<Secret>,
	) -> Self {
		Self { conf, auth, api_key }
	}

	/// Active configuration.
	pub fn configuration(&self) -> &Configuration {
		&self.conf
	}

	/// Signer for direct and OAuth Echo uploads.
	pub fn authorization(&self) -> &OAuthAuthorization {
		&self.auth
	}

	/// Host API key, if configured.
	pub fn api_key(&self) -> Option<&Secret> {
		self.api_key.as_ref()
	}

	/// Host API key, or [`ConfigError::MissingApiKey`].
	pub fn require_api_key(&self, provider: &'static str) -> Result<&Secret> {
		self.api_key.as_ref().ok_or_else(|| ConfigError::MissingApiKey { provider }.into())
	}

	/// Fails with [`ConfigError::MissingAccessToken`] unless the signer carries an access token.
	pub fn require_access_token(&self) -> Result<()> {
		if self.auth.credentials().has_access_token() {
			Ok(())
		} else {
			Err(ConfigError::MissingAccessToken.into())
		}
	}

	/// OAuth Echo header: `OAuth realm="http://api.twitter.com/",` followed by the quoted,
	/// comma-joined signature parameters of a `GET` on `url`.
	pub fn verify_credentials_authorization_header(&self, url: &Url) -> Result<String> {
		let params = self.auth.generate_signature_params(HttpMethod::Get, url, &[])?;

		Ok(format!(
			"OAuth realm=\"{ECHO_REALM}\",{}",
			OAuthAuthorization::encode_parameters(&params, ",", true)
		))
	}

	/// OAuth Echo URL: `url?` followed by the `&`-joined signature parameters of a `GET` on
	/// `url`.
	pub fn verify_credentials_authorization_url(&self, url: &Url) -> Result<String> {
		let params = self.auth.generate_signature_params(HttpMethod::Get, url, &[])?;

		Ok(format!("{url}?{}", OAuthAuthorization::encode_parameters(&params, "&", false)))
	}
}

/// Host-specific hooks run by [`ImageUploader`].
pub trait UploadProvider
where
	Self: 'static + Send + Sync,
{
	/// Label used in logs and errors.
	fn name(&self) -> &'static str;

	/// Sets `upload_url` and `post_parameters`, and may add headers.
	fn pre_upload(&self, ctx: &UploadContext, request: &mut UploadRequest) -> Result<()>;

	/// Extracts the published media URL from a successful response.
	fn post_upload(&self, response: &ApiResponse) -> Result<String>;
}

/// Shared upload routine parameterized by its host hooks.
pub struct ImageUploader<P, C>
where
	P: UploadProvider,
	C: ?Sized + ApiHttpClient,
{
	provider: P,
	ctx: UploadContext,
	http_client: Arc<C>,
}
impl<P, C> ImageUploader<P, C>
where
	P: UploadProvider,
	C: ?Sized + ApiHttpClient,
{
	/// Creates an uploader for one provider.
	pub fn new(provider: P, ctx: UploadContext, http_client: Arc<C>) -> Self {
		Self { provider, ctx, http_client }
	}

	/// Host hooks.
	pub fn provider(&self) -> &P {
		&self.provider
	}

	/// Inputs shared with the host hooks.
	pub fn context(&self) -> &UploadContext {
		&self.ctx
	}

	/// Runs `pre_upload`, checks the provider filled in the request, and merges configured
	/// fields. Returns the request ready to send.
	pub fn prepare(&self, image: MediaSource, message: Option<&str>) -> Result<ApiRequest> {
		let mut request = UploadRequest::new(image, message);

		request.append_parameters = self
			.ctx
			.configuration()
			.media_provider_parameters
			.iter()
			.map(|(name, value)| HttpParameter::text(name.as_str(), value.as_str()))
			.collect();

		self.provider.pre_upload(&self.ctx, &mut request)?;

		let Some(mut post_parameters) = request.post_parameters.take() else {
			return Err(ConfigError::IncompleteUpload { field: "post_parameters" }.into());
		};
		let Some(upload_url) = request.upload_url.take() else {
			return Err(ConfigError::IncompleteUpload { field: "upload_url" }.into());
		};

		if !request.append_parameters.is_empty() {
			post_parameters = append_parameters(&post_parameters, &request.append_parameters);
		}

		Ok(ApiRequest::post(upload_url)
			.with_parameters(post_parameters)
			.with_headers(request.headers))
	}

	async fn upload_once(&self, image: MediaSource, message: Option<&str>) -> Result<String> {
		let request = self.prepare(image, message)?;
		let response = self.http_client.execute(request).await?.error_for_status()?;
		let media_url = self.provider.post_upload(&response)?;

		obs::log_uploaded_url(self.provider.name(), &media_url);

		Ok(media_url)
	}
}
impl<P, C> ImageUpload for ImageUploader<P, C>
where
	P: UploadProvider,
	C: ?Sized + ApiHttpClient,
{
	fn upload<'a>(&'a self, image: MediaSource, message: Option<&'a str>) -> ApiFuture<'a, String> {
		Box::pin(obs::observe(Operation::MediaUpload, self.provider.name(), async move {
			self.upload_once(image, message).await
		}))
	}
}
impl<P, C> Debug for ImageUploader<P, C>
where
	P: UploadProvider + Debug,
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ImageUploader")
			.field("provider", &self.provider)
			.field("ctx", &self.ctx)
			.finish()
	}
}
