//! Consumer and access-token credentials with redacted secret wrappers.

// self
use crate::_prelude::*;

/// Redacted secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Secret(String);
impl Secret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for Secret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Secret").field(&"<redacted>").finish()
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Access token issued to a user of the application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
	/// Public token value (`oauth_token`).
	pub token: String,
	/// Token secret used as the second half of the signing key.
	pub secret: Secret,
}

/// Application (consumer) credentials plus an optional user access token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthCredentials {
	/// Consumer key (`oauth_consumer_key`).
	pub consumer_key: String,
	/// Consumer secret used as the first half of the signing key.
	pub consumer_secret: Secret,
	/// User access token, when the client acts on behalf of a user.
	pub access_token: Option<AccessToken>,
}
impl OAuthCredentials {
	/// Creates application-only credentials.
	pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
		Self {
			consumer_key: consumer_key.into(),
			consumer_secret: Secret::new(consumer_secret),
			access_token: None,
		}
	}

	/// Attaches a user access token.
	pub fn with_access_token(mut self, token: impl Into<String>, secret: impl Into<String>) -> Self {
		self.access_token = Some(AccessToken { token: token.into(), secret: Secret::new(secret) });

		self
	}

	/// Returns `true` when a user access token is present.
	pub fn has_access_token(&self) -> bool {
		self.access_token.is_some()
	}
}
