//! Provider selection from [`Configuration`].

// self
use crate::{
	_prelude::*,
	auth::OAuthAuthorization,
	conf::Configuration,
	error::ConfigError,
	http::ApiHttpClient,
	media::{
		ImageUpload, ImageUploader, ImglyProvider, MediaProvider, TwitpicProvider,
		TwitterMediaProvider, UploadContext,
	},
};

/// Builds [`ImageUpload`] implementations sharing one configuration, signer, and transport.
pub struct ImageUploadFactory<C>
where
	C: ?Sized + ApiHttpClient,
{
	conf: Arc<Configuration>,
	auth: Arc<OAuthAuthorization>,
	http_client: Arc<C>,
}
impl<C> ImageUploadFactory<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a factory over shared client state.
	pub fn new(conf: Arc<Configuration>, auth: Arc<OAuthAuthorization>, http_client: Arc<C>) -> Self {
		Self { conf, auth, http_client }
	}

	/// Uploader for the configured [`Configuration::media_provider`].
	pub fn uploader(&self) -> Result<Box<dyn ImageUpload>> {
		self.uploader_for(self.conf.media_provider)
	}

	/// Uploader for an explicit provider.
	///
	/// [`Configuration::media_provider_upload_url`] replaces the provider's default target.
	pub fn uploader_for(&self, provider: MediaProvider) -> Result<Box<dyn ImageUpload>> {
		let api_key = self.conf.media_provider_api_key.clone();

		if provider.requires_api_key() && api_key.is_none() {
			return Err(ConfigError::MissingApiKey { provider: provider.as_str() }.into());
		}

		let ctx = UploadContext::new(Arc::clone(&self.conf), Arc::clone(&self.auth), api_key);
		let upload_url = self.conf.media_provider_upload_url.clone();
		let http_client = Arc::clone(&self.http_client);
		let uploader: Box<dyn ImageUpload> = match provider {
			MediaProvider::Twitter => {
				let mut hooks = TwitterMediaProvider::new();

				if let Some(url) = upload_url {
					hooks = hooks.with_upload_url(url);
				}

				Box::new(ImageUploader::new(hooks, ctx, http_client))
			},
			MediaProvider::Twitpic => {
				let mut hooks = TwitpicProvider::new()?;

				if let Some(url) = upload_url {
					hooks = hooks.with_upload_url(url);
				}

				Box::new(ImageUploader::new(hooks, ctx, http_client))
			},
			MediaProvider::Imgly => {
				let mut hooks = ImglyProvider::new()?;

				if let Some(url) = upload_url {
					hooks = hooks.with_upload_url(url);
				}

				Box::new(ImageUploader::new(hooks, ctx, http_client))
			},
		};

		Ok(uploader)
	}
}
impl<C> Clone for ImageUploadFactory<C>
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
impl<C> Debug for ImageUploadFactory<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ImageUploadFactory")
			.field("media_provider", &self.conf.media_provider)
			.finish()
	}
}
