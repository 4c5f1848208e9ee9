//! Built-in upload hosts.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, ParseError},
	http::{ApiResponse, HttpMethod, HttpParameter},
	media::{MediaProvider, UploadContext, UploadProvider, UploadRequest},
};

const TWITTER_UPLOAD_PATH: &str = "1.1/statuses/update_with_media.json";
const TWITPIC_UPLOAD_URL: &str = "https://twitpic.com/api/2/upload.json";
const IMGLY_UPLOAD_URL: &str = "https://img.ly/api/2/upload.json";

/// Header naming the verify-credentials URL the media host must call.
pub const AUTH_SERVICE_PROVIDER_HEADER: &str = "X-Auth-Service-Provider";
/// Header carrying the OAuth Echo authorization.
pub const VERIFY_CREDENTIALS_AUTHORIZATION_HEADER: &str = "X-Verify-Credentials-Authorization";

/// Uploads through the platform's `update_with_media` endpoint, signed directly.
///
/// The message becomes the status text and the image is sent as `media[]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TwitterMediaProvider {
	upload_url: Option<Url>,
}
impl TwitterMediaProvider {
	/// Creates the provider; the target defaults to the configured upload base URL.
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides the upload URL.
	pub fn with_upload_url(mut self, url: Url) -> Self {
		self.upload_url = Some(url);

		self
	}
}
impl UploadProvider for TwitterMediaProvider {
	fn name(&self) -> &'static str {
		MediaProvider::Twitter.as_str()
	}

	fn pre_upload(&self, ctx: &UploadContext, request: &mut UploadRequest) -> Result<()> {
		ctx.require_access_token()?;

		let url = match &self.upload_url {
			Some(url) => url.clone(),
			None => ctx.configuration().upload_base_url.join(TWITTER_UPLOAD_PATH).map_err(
				|source| ConfigError::InvalidUrl { url: TWITTER_UPLOAD_PATH.into(), source },
			)?,
		};
		// Multipart fields stay out of the signature.
		let authorization = ctx.authorization().authorization_header(HttpMethod::Post, &url, &[])?;

		request.headers.insert("Authorization".into(), authorization);
		request.post_parameters = Some(vec![
			HttpParameter::text("status", request.message_text()),
			request.image.clone().renamed("media[]"),
		]);
		request.upload_url = Some(url);

		Ok(())
	}

	fn post_upload(&self, response: &ApiResponse) -> Result<String> {
		let status = response.json::<Value>()?;
		let media = status
			.pointer("/entities/media/0")
			.ok_or(ParseError::MissingField { field: "entities.media" })?;

		media
			.get("media_url_https")
			.or_else(|| media.get("expanded_url"))
			.and_then(Value::as_str)
			.map(ToOwned::to_owned)
			.ok_or_else(|| ParseError::MissingField { field: "media_url_https" }.into())
	}
}

/// Twitpic host (OAuth Echo, API key required).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TwitpicProvider {
	upload_url: Url,
}
impl TwitpicProvider {
	/// Creates the provider pointed at the public Twitpic endpoint.
	pub fn new() -> Result<Self> {
		Ok(Self { upload_url: parse_upload_url(TWITPIC_UPLOAD_URL)? })
	}

	/// Overrides the upload URL.
	pub fn with_upload_url(mut self, url: Url) -> Self {
		self.upload_url = url;

		self
	}
}
impl UploadProvider for TwitpicProvider {
	fn name(&self) -> &'static str {
		MediaProvider::Twitpic.as_str()
	}

	fn pre_upload(&self, ctx: &UploadContext, request: &mut UploadRequest) -> Result<()> {
		let key = ctx.require_api_key(self.name())?.expose().to_owned();
		let mut post_parameters = vec![HttpParameter::text("key", key)];

		post_parameters.extend(request.message.clone());
		post_parameters.push(request.image.clone());

		apply_echo_headers(ctx, request)?;
		request.post_parameters = Some(post_parameters);
		request.upload_url = Some(self.upload_url.clone());

		Ok(())
	}

	fn post_upload(&self, response: &ApiResponse) -> Result<String> {
		url_field(response)
	}
}

/// img.ly host (OAuth Echo).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImglyProvider {
	upload_url: Url,
}
impl ImglyProvider {
	/// Creates the provider pointed at the public img.ly endpoint.
	pub fn new() -> Result<Self> {
		Ok(Self { upload_url: parse_upload_url(IMGLY_UPLOAD_URL)? })
	}

	/// Overrides the upload URL.
	pub fn with_upload_url(mut self, url: Url) -> Self {
		self.upload_url = url;

		self
	}
}
impl UploadProvider for ImglyProvider {
	fn name(&self) -> &'static str {
		MediaProvider::Imgly.as_str()
	}

	fn pre_upload(&self, ctx: &UploadContext, request: &mut UploadRequest) -> Result<()> {
		let mut post_parameters = Vec::with_capacity(2);

		post_parameters.extend(request.message.clone());
		post_parameters.push(request.image.clone());

		apply_echo_headers(ctx, request)?;
		request.post_parameters = Some(post_parameters);
		request.upload_url = Some(self.upload_url.clone());

		Ok(())
	}

	fn post_upload(&self, response: &ApiResponse) -> Result<String> {
		url_field(response)
	}
}

fn apply_echo_headers(ctx: &UploadContext, request: &mut UploadRequest) -> Result<()> {
	ctx.require_access_token()?;

	let verify_url = &ctx.configuration().verify_credentials_json_url;
	let authorization = ctx.verify_credentials_authorization_header(verify_url)?;

	request.headers.insert(AUTH_SERVICE_PROVIDER_HEADER.into(), verify_url.to_string());
	request.headers.insert(VERIFY_CREDENTIALS_AUTHORIZATION_HEADER.into(), authorization);

	Ok(())
}

fn url_field(response: &ApiResponse) -> Result<String> {
	response
		.json::<Value>()?
		.get("url")
		.and_then(Value::as_str)
		.map(ToOwned::to_owned)
		.ok_or_else(|| ParseError::MissingField { field: "url" }.into())
}

fn parse_upload_url(raw: &str) -> Result<Url> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { url: raw.into(), source }.into())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::{OAuthAuthorization, OAuthCredentials, Secret},
		conf::Configuration,
	};

	fn context(credentials: OAuthCredentials, api_key: Option<&str>) -> UploadContext {
		let conf = Configuration::builder().build().expect("Defaults should validate.");
		let auth = OAuthAuthorization::new(credentials)
			.with_clock(|| OffsetDateTime::UNIX_EPOCH)
			.with_nonce(|| "nonce".into());

		UploadContext::new(Arc::new(conf), Arc::new(auth), api_key.map(Secret::new))
	}

	fn user_context(api_key: Option<&str>) -> UploadContext {
		context(
			OAuthCredentials::new("consumer-key", "consumer-secret")
				.with_access_token("access-token", "access-token-secret"),
			api_key,
		)
	}

	fn request(message: Option<&str>) -> UploadRequest {
		UploadRequest::new(crate::media::MediaSource::stream("cat.png", vec![0_u8; 4]), message)
	}

	fn names(request: &UploadRequest) -> Vec<&str> {
		request.post_parameters.iter().flatten().map(HttpParameter::name).collect()
	}

	#[test]
	fn twitter_signs_and_renames_media() {
		let mut upload = request(Some("hello"));

		TwitterMediaProvider::new()
			.pre_upload(&user_context(None), &mut upload)
			.expect("Twitter pre_upload should succeed.");

		assert_eq!(names(&upload), ["status", "media[]"]);
		assert_eq!(
			upload.upload_url.as_ref().map(Url::as_str),
			Some("https://upload.twitter.com/1.1/statuses/update_with_media.json")
		);
		assert!(
			upload.headers.get("Authorization").is_some_and(|value| value.starts_with("OAuth "))
		);
	}

	#[test]
	fn twitter_reads_media_url_with_fallback() {
		let https = ApiResponse::new(
			200,
			r#"{"entities":{"media":[{"media_url_https":"https://pbs.example.com/a.png","expanded_url":"https://x.example.com/a"}]}}"#,
		);
		let expanded =
			ApiResponse::new(200, r#"{"entities":{"media":[{"expanded_url":"https://x.example.com/b"}]}}"#);
		let provider = TwitterMediaProvider::new();

		assert_eq!(provider.post_upload(&https).ok().as_deref(), Some("https://pbs.example.com/a.png"));
		assert_eq!(provider.post_upload(&expanded).ok().as_deref(), Some("https://x.example.com/b"));
		assert!(matches!(
			provider.post_upload(&ApiResponse::new(200, "{}")),
			Err(Error::Parse(ParseError::MissingField { field: "entities.media" }))
		));
	}

	#[test]
	fn twitpic_requires_api_key() {
		let provider = TwitpicProvider::new().expect("Twitpic URL should parse.");
		let err = provider
			.pre_upload(&user_context(None), &mut request(None))
			.expect_err("Twitpic without an API key should fail.");

		assert!(matches!(err, Error::Config(ConfigError::MissingApiKey { provider: "twitpic" })));
	}

	#[test]
	fn twitpic_sets_echo_headers_and_fields() {
		let mut upload = request(Some("caption"));

		TwitpicProvider::new()
			.expect("Twitpic URL should parse.")
			.pre_upload(&user_context(Some("api-key")), &mut upload)
			.expect("Twitpic pre_upload should succeed.");

		assert_eq!(names(&upload), ["key", "message", "media"]);
		assert_eq!(
			upload.headers.get(AUTH_SERVICE_PROVIDER_HEADER).map(String::as_str),
			Some("https://api.twitter.com/1/account/verify_credentials.json")
		);
		assert!(upload.headers.get(VERIFY_CREDENTIALS_AUTHORIZATION_HEADER).is_some_and(
			|value| value.starts_with("OAuth realm=\"http://api.twitter.com/\",oauth_consumer_key=")
		));
		assert!(!upload.headers.contains_key("Authorization"));
	}

	#[test]
	fn imgly_omits_missing_message() {
		let mut upload = request(None);

		ImglyProvider::new()
			.expect("img.ly URL should parse.")
			.pre_upload(&user_context(None), &mut upload)
			.expect("img.ly pre_upload should succeed.");

		assert_eq!(names(&upload), ["media"]);
		assert_eq!(
			upload.upload_url.as_ref().map(Url::as_str),
			Some("https://img.ly/api/2/upload.json")
		);
	}

	#[test]
	fn echo_needs_an_access_token() {
		let err = ImglyProvider::new()
			.expect("img.ly URL should parse.")
			.pre_upload(
				&context(OAuthCredentials::new("consumer-key", "consumer-secret"), None),
				&mut request(None),
			)
			.expect_err("Echo uploads need user credentials.");

		assert!(matches!(err, Error::Config(ConfigError::MissingAccessToken)));
	}

	#[test]
	fn echo_hosts_return_the_url_field() {
		let ok = ApiResponse::new(200, r#"{"id":"abc","url":"https://img.example.com/abc"}"#);

		assert_eq!(url_field(&ok).ok().as_deref(), Some("https://img.example.com/abc"));
		assert!(matches!(
			url_field(&ApiResponse::new(200, r#"{"id":"abc"}"#)),
			Err(Error::Parse(ParseError::MissingField { field: "url" }))
		));
	}
}
