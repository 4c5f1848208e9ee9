//! OAuth 1.0a (HMAC-SHA1) request signing.
//!
//! [`OAuthAuthorization`] produces the `oauth_*` protocol parameters for a request, either
//! rendered as an `Authorization` header or as raw parameters for OAuth Echo flows. The clock
//! and nonce sources are injectable so signatures can be reproduced in tests.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::{Rng, distr::Alphanumeric};
use sha1::Sha1;
// self
use crate::{
	_prelude::*,
	auth::OAuthCredentials,
	error::ConfigError,
	http::{HttpMethod, HttpParameter},
};

type HmacSha1 = Hmac<Sha1>;
type Clock = Arc<dyn Fn() -> OffsetDateTime + Send + Sync>;
type NonceSource = Arc<dyn Fn() -> String + Send + Sync>;

/// RFC 3986 unreserved characters (`A-Z a-z 0-9 - . _ ~`) stay literal; everything else is
/// percent-encoded.
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');
const NONCE_LEN: usize = 32;
const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Percent-encodes a string with the RFC 3986 unreserved set and upper-case hex digits.
pub fn percent_encode(value: &str) -> String {
	utf8_percent_encode(value, RFC3986).to_string()
}

/// Signs requests on behalf of a consumer (and optionally a user access token).
#[derive(Clone)]
pub struct OAuthAuthorization {
	credentials: OAuthCredentials,
	clock: Clock,
	nonce: NonceSource,
}
impl OAuthAuthorization {
	/// Creates a signer using the system clock and a random alphanumeric nonce.
	pub fn new(credentials: OAuthCredentials) -> Self {
		Self {
			credentials,
			clock: Arc::new(OffsetDateTime::now_utc),
			nonce: Arc::new(|| {
				rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
			}),
		}
	}

	/// Overrides the clock used for `oauth_timestamp`.
	pub fn with_clock<F>(mut self, clock: F) -> Self
	where
		F: 'static + Send + Sync + Fn() -> OffsetDateTime,
	{
		self.clock = Arc::new(clock);

		self
	}

	/// Overrides the nonce source used for `oauth_nonce`.
	pub fn with_nonce<F>(mut self, nonce: F) -> Self
	where
		F: 'static + Send + Sync + Fn() -> String,
	{
		self.nonce = Arc::new(nonce);

		self
	}

	/// Credentials backing this signer.
	pub fn credentials(&self) -> &OAuthCredentials {
		&self.credentials
	}

	/// Builds the `oauth_*` protocol parameters, `oauth_signature` last.
	///
	/// `params` are the request's form or query fields; file fields never take part in the
	/// signature. Query parameters already present on `url` are folded in as well.
	pub fn generate_signature_params(
		&self,
		method: HttpMethod,
		url: &Url,
		params: &[HttpParameter],
	) -> Result<Vec<HttpParameter>> {
		let timestamp = (self.clock)().unix_timestamp();
		let mut oauth_params = vec![
			HttpParameter::text("oauth_consumer_key", self.credentials.consumer_key.as_str()),
			HttpParameter::text("oauth_nonce", (self.nonce)()),
			HttpParameter::text("oauth_signature_method", SIGNATURE_METHOD),
			HttpParameter::text("oauth_timestamp", timestamp.to_string()),
		];

		if let Some(access) = &self.credentials.access_token {
			oauth_params.push(HttpParameter::text("oauth_token", access.token.as_str()));
		}

		oauth_params.push(HttpParameter::text("oauth_version", OAUTH_VERSION));

		let mut signed = oauth_params.clone();

		signed.extend(params.iter().filter(|param| !param.is_file()).cloned());

		let base_string = Self::signature_base_string(method, url, &signed);
		let signature = self.sign(&base_string)?;

		oauth_params.push(HttpParameter::text("oauth_signature", signature));

		Ok(oauth_params)
	}

	/// Renders the `Authorization` header value for a request.
	pub fn authorization_header(
		&self,
		method: HttpMethod,
		url: &Url,
		params: &[HttpParameter],
	) -> Result<String> {
		let oauth_params = self.generate_signature_params(method, url, params)?;

		Ok(format!("OAuth {}", Self::encode_parameters(&oauth_params, ",", true)))
	}

	/// `METHOD&enc(normalized url)&enc(sorted encoded params)`.
	pub fn signature_base_string(method: HttpMethod, url: &Url, params: &[HttpParameter]) -> String {
		let mut pairs: Vec<(String, String)> = params
			.iter()
			.filter_map(|param| {
				param.value().map(|value| (percent_encode(param.name()), percent_encode(value)))
			})
			.chain(url.query_pairs().map(|(k, v)| (percent_encode(&k), percent_encode(&v))))
			.collect();

		pairs.sort();

		let normalized = pairs
			.iter()
			.map(|(name, value)| format!("{name}={value}"))
			.collect::<Vec<_>>()
			.join("&");

		format!(
			"{}&{}&{}",
			method.as_str(),
			percent_encode(&normalize_url(url)),
			percent_encode(&normalized)
		)
	}

	/// Joins text fields as `name=value` (or `name="value"` when `quoted`) with `separator`,
	/// keeping their order. File fields are skipped.
	pub fn encode_parameters(params: &[HttpParameter], separator: &str, quoted: bool) -> String {
		params
			.iter()
			.filter_map(|param| {
				let value = percent_encode(param.value()?);
				let name = percent_encode(param.name());

				Some(if quoted { format!("{name}=\"{value}\"") } else { format!("{name}={value}") })
			})
			.collect::<Vec<_>>()
			.join(separator)
	}

	fn sign(&self, base_string: &str) -> Result<String> {
		let token_secret =
			self.credentials.access_token.as_ref().map(|access| access.secret.expose()).unwrap_or("");
		let key = format!(
			"{}&{}",
			percent_encode(self.credentials.consumer_secret.expose()),
			percent_encode(token_secret)
		);
		let mut mac = HmacSha1::new_from_slice(key.as_bytes())
			.map_err(|e| ConfigError::invalid_argument(format!("signing key rejected: {e}")))?;

		mac.update(base_string.as_bytes());

		Ok(STANDARD.encode(mac.finalize().into_bytes()))
	}
}
impl Debug for OAuthAuthorization {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthAuthorization").field("credentials", &self.credentials).finish()
	}
}

/// Scheme and host lower-cased, default port dropped, query and fragment removed.
fn normalize_url(url: &Url) -> String {
	let scheme = url.scheme().to_ascii_lowercase();
	let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
	let port = url.port().map(|port| format!(":{port}")).unwrap_or_default();

	format!("{scheme}://{host}{port}{}", url.path())
}
