//! Transport primitives for signed REST calls.
//!
//! The module exposes [`ApiHttpClient`] alongside [`ApiRequest`] and [`ApiResponse`] so
//! downstream crates can integrate custom HTTP clients without losing the binding's request
//! encoding rules. Implementations return every HTTP response they receive; callers classify
//! failures with [`ApiResponse::error_for_status`].

pub mod factory;
pub mod parameter;
pub mod response;

pub use factory::*;
pub use parameter::*;
pub use response::*;

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	RequestBuilder,
	header::CONTENT_TYPE,
	multipart::{Form, Part},
};
// self
use crate::{_prelude::*, auth::OAuthAuthorization};
#[cfg(feature = "reqwest")] use crate::error::{ConfigError, TransportError};

/// Boxed future returned by transports and endpoint bindings.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// HTTP verbs used by the bindings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
}
impl HttpMethod {
	/// Upper-case verb, as used on the wire and in signature base strings.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Transport-agnostic request description.
///
/// A request carrying any file field is sent as `multipart/form-data`. Otherwise `POST`
/// fields travel as an `application/x-www-form-urlencoded` body and `GET` fields are
/// appended to the query string, both encoded with the same RFC 3986 rules used for signing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: HttpMethod,
	/// Target URL without the field-derived query string.
	pub url: Url,
	/// Ordered form, query, or multipart fields.
	pub parameters: Vec<HttpParameter>,
	/// Extra headers (for example `Authorization`).
	pub headers: BTreeMap<String, String>,
}
impl ApiRequest {
	/// Creates a request with no fields or headers.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		Self { method, url, parameters: Vec::new(), headers: BTreeMap::new() }
	}

	/// Shorthand for a `GET` request.
	pub fn get(url: Url) -> Self {
		Self::new(HttpMethod::Get, url)
	}

	/// Shorthand for a `POST` request.
	pub fn post(url: Url) -> Self {
		Self::new(HttpMethod::Post, url)
	}

	/// Appends one field.
	pub fn with_parameter(mut self, parameter: HttpParameter) -> Self {
		self.parameters.push(parameter);

		self
	}

	/// Appends several fields, keeping their order.
	pub fn with_parameters<I>(mut self, parameters: I) -> Self
	where
		I: IntoIterator<Item = HttpParameter>,
	{
		self.parameters.extend(parameters);

		self
	}

	/// Adds (or replaces) a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Adds (or replaces) several headers.
	pub fn with_headers<I>(mut self, headers: I) -> Self
	where
		I: IntoIterator<Item = (String, String)>,
	{
		self.headers.extend(headers);

		self
	}

	/// Returns `true` when the body must be `multipart/form-data`.
	pub fn is_multipart(&self) -> bool {
		contains_file(&self.parameters)
	}

	/// URL with text fields appended to the query string for `GET` requests.
	pub fn query_url(&self) -> Url {
		let mut url = self.url.clone();

		if self.method == HttpMethod::Post || self.parameters.is_empty() {
			return url;
		}

		let encoded = OAuthAuthorization::encode_parameters(&self.parameters, "&", false);
		let query = match url.query().filter(|existing| !existing.is_empty()) {
			Some(existing) => format!("{existing}&{encoded}"),
			None => encoded,
		};

		url.set_query(Some(&query));

		url
	}

	/// `application/x-www-form-urlencoded` body for non-multipart `POST` requests.
	pub fn form_body(&self) -> String {
		OAuthAuthorization::encode_parameters(&self.parameters, "&", false)
	}

	/// Adds an OAuth `Authorization` header. Multipart fields never take part in the signature.
	pub fn signed(self, auth: &OAuthAuthorization) -> Result<Self> {
		let signed_params: &[HttpParameter] =
			if self.is_multipart() { &[] } else { &self.parameters };
		let header = auth.authorization_header(self.method, &self.url, signed_params)?;

		Ok(self.with_header("Authorization", header))
	}
}

/// Abstraction over HTTP transports capable of executing [`ApiRequest`]s.
///
/// The trait is the crate's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so a single transport can be shared (behind `Arc`) by the REST
/// client and every media uploader, and the returned futures must be `Send`.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends one request and returns the raw response, whatever its status.
	fn execute(&self, request: ApiRequest) -> ApiFuture<'_, ApiResponse>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Profile-image lookups answer with a redirect that the binding must observe, so configure
/// any custom [`ReqwestClient`] to disable redirect following. [`HttpClientFactory`] does
/// this for you.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	async fn build_request(&self, request: ApiRequest) -> Result<RequestBuilder> {
		let multipart = request.is_multipart();
		let mut builder = match request.method {
			HttpMethod::Get => self.0.get(request.query_url()),
			HttpMethod::Post => self.0.post(request.url.clone()),
		};

		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		if request.method == HttpMethod::Post {
			if multipart {
				builder = builder.multipart(multipart_form(request.parameters).await?);
			} else if !request.parameters.is_empty() {
				builder = builder
					.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
					.body(request.form_body());
			}
		}

		Ok(builder)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> ApiFuture<'_, ApiResponse> {
		Box::pin(async move {
			let builder = self.build_request(request).await?;
			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|value| (name.as_str().to_owned(), value.to_owned()))
				})
				.collect::<Vec<_>>();
			let body = response.bytes().await.map_err(TransportError::from)?;

			Ok(headers
				.into_iter()
				.fold(ApiResponse::new(status, body.to_vec()), |acc, (name, value)| {
					acc.with_header(name, value)
				}))
		})
	}
}

/// File fields are read on tokio's blocking pool.
#[cfg(feature = "reqwest")]
async fn multipart_form(parameters: Vec<HttpParameter>) -> Result<Form> {
	let mut form = Form::new();

	for parameter in parameters {
		let content_type = parameter.content_type();
		let file_name = parameter.file_name().map(ToOwned::to_owned);

		form = match parameter {
			HttpParameter::Text { name, value } => form.text(name, value),
			HttpParameter::File { name, path } => {
				let bytes = tokio::fs::read(&path).await?;

				form.part(name, file_part(bytes, file_name, content_type)?)
			},
			HttpParameter::Stream { name, bytes, .. } =>
				form.part(name, file_part(bytes.to_vec(), file_name, content_type)?),
		};
	}

	Ok(form)
}

#[cfg(feature = "reqwest")]
fn file_part(bytes: Vec<u8>, file_name: Option<String>, content_type: &str) -> Result<Part> {
	let part = Part::bytes(bytes)
		.mime_str(content_type)
		.map_err(|e| ConfigError::invalid_argument(format!("content type {content_type}: {e}")))?;

	Ok(match file_name {
		Some(file_name) => part.file_name(file_name),
		None => part,
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::OAuthCredentials;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse test URL.")
	}

	#[test]
	fn get_fields_land_in_the_query_string() {
		let request = ApiRequest::get(url("https://api.twitter.com/1.1/users/search.json"))
			.with_parameter(HttpParameter::text("q", "rust lang+"))
			.with_parameter(HttpParameter::text("page", "2"));

		assert_eq!(
			request.query_url().as_str(),
			"https://api.twitter.com/1.1/users/search.json?q=rust%20lang%2B&page=2"
		);
		assert!(!request.is_multipart());
	}

	#[test]
	fn existing_query_is_preserved() {
		let request = ApiRequest::get(url("https://api.twitter.com/x.json?a=1"))
			.with_parameter(HttpParameter::text("b", "2"));

		assert_eq!(request.query_url().as_str(), "https://api.twitter.com/x.json?a=1&b=2");
	}

	#[test]
	fn post_fields_become_a_form_body() {
		let request = ApiRequest::post(url("https://api.twitter.com/1.1/statuses/update.json"))
			.with_parameter(HttpParameter::text("status", "a&b=c"));

		assert_eq!(request.form_body(), "status=a%26b%3Dc");
		assert_eq!(request.query_url(), request.url);
	}

	#[test]
	fn signing_skips_multipart_fields() {
		let auth = crate::auth::OAuthAuthorization::new(OAuthCredentials::new("key", "secret"))
			.with_nonce(|| "fixed".into())
			.with_clock(|| OffsetDateTime::UNIX_EPOCH);
		let target = url("https://upload.twitter.com/1/statuses/update_with_media.json");
		let multipart = ApiRequest::post(target.clone())
			.with_parameter(HttpParameter::text("status", "hello"))
			.with_parameter(HttpParameter::stream("media[]", "a.png", vec![1_u8]))
			.signed(&auth)
			.expect("Signing should succeed.");
		let bare = ApiRequest::post(target).signed(&auth).expect("Signing should succeed.");

		assert!(multipart.is_multipart());
		assert_eq!(multipart.headers.get("Authorization"), bare.headers.get("Authorization"));
		assert!(
			multipart
				.headers
				.get("Authorization")
				.is_some_and(|header| header.starts_with("OAuth oauth_consumer_key=\"key\""))
		);
	}

	#[cfg(feature = "reqwest")]
	#[tokio::test]
	async fn multipart_files_are_read_without_blocking_the_runtime() {
		let path = std::env::temp_dir()
			.join(format!("twitter-rest-multipart-{}.png", std::process::id()));

		tokio::fs::write(&path, b"png").await.expect("Temporary image should be written.");

		let form = multipart_form(vec![
			HttpParameter::text("status", "hello"),
			HttpParameter::file("media", path.clone()),
		])
		.await;
		let _ = tokio::fs::remove_file(&path).await;

		assert!(form.is_ok());

		let missing = multipart_form(vec![HttpParameter::file("media", "/definitely/not/here.png")])
			.await
			.err()
			.expect("A missing file should fail.");

		assert!(matches!(
			missing,
			Error::Transport(TransportError::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound
		));
	}
}
