//! Client-level error types shared across endpoint bindings, media uploads, and transports.

// self
use crate::{_prelude::*, conf::ConfigurationError, http::RateLimitStatus};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or argument problem; nothing was sent.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, file IO).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded into the expected shape.
	#[error(transparent)]
	Parse(#[from] ParseError),

	/// Remote service answered with an error status.
	#[error("Remote service returned HTTP {status}: {message}.")]
	Api {
		/// HTTP status code.
		status: u16,
		/// Service-specific error code, when the body carried one.
		code: Option<i64>,
		/// Service- or client-supplied message.
		message: String,
		/// Rate limit window reported alongside the failure.
		rate_limit: Option<RateLimitStatus>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
}
impl Error {
	/// Returns the HTTP status for remote failures.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api { status, .. } => Some(*status),
			Self::Parse(ParseError::Json { status, .. }) => *status,
			_ => None,
		}
	}

	/// Returns `true` when the service rejected the call because a rate limit was exhausted.
	pub fn is_rate_limited(&self) -> bool {
		match self {
			Self::Api { status: 429, .. } => true,
			Self::Api { status: 400 | 420, rate_limit: Some(limit), .. } => limit.remaining == 0,
			_ => false,
		}
	}

	/// Returns the rate limit window attached to a remote failure.
	pub fn rate_limit(&self) -> Option<&RateLimitStatus> {
		match self {
			Self::Api { rate_limit, .. } => rate_limit.as_ref(),
			_ => None,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(e: std::io::Error) -> Self {
		TransportError::Io(e).into()
	}
}

/// Configuration and argument validation failures raised before any request is sent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Configuration failed validation.
	#[error(transparent)]
	InvalidConfiguration(#[from] ConfigurationError),
	/// A request URL could not be assembled.
	#[error("URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending URL (or relative path).
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Caller supplied an argument the endpoint cannot accept.
	#[error("Invalid argument: {reason}.")]
	InvalidArgument {
		/// Human-readable reason string.
		reason: String,
	},
	/// Upload provider did not populate a required field during `pre_upload`.
	#[error("Incomplete upload provider: {field} is not set.")]
	IncompleteUpload {
		/// Missing upload field.
		field: &'static str,
	},
	/// Media provider requires an API key but none was configured.
	#[error("Media provider `{provider}` requires an API key.")]
	MissingApiKey {
		/// Provider label.
		provider: &'static str,
	},
	/// Operation needs access-token credentials but only consumer credentials were supplied.
	#[error("Access token credentials are required for this call.")]
	MissingAccessToken,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Builds an [`ConfigError::InvalidArgument`] from any displayable reason.
	pub fn invalid_argument(reason: impl Display) -> Self {
		Self::InvalidArgument { reason: reason.to_string() }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the remote service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure (for example while reading an upload file).
	#[error("I/O error occurred while preparing or sending the request.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Response decoding failures.
#[derive(Debug, ThisError)]
pub enum ParseError {
	/// Response body was not the JSON shape the binding expects.
	#[error("Response body could not be decoded at `{}`.", .source.path())]
	Json {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Response decoded but lacked a field the binding needs.
	#[error("Response is missing the `{field}` field.")]
	MissingField {
		/// Missing field name.
		field: &'static str,
	},
	/// Response lacked a header the binding needs.
	#[error("Response is missing the `{header}` header.")]
	MissingHeader {
		/// Missing header name.
		header: &'static str,
	},
	/// Response header carried a value the binding cannot use.
	#[error("Response header `{header}` holds an invalid URL `{value}`.")]
	InvalidHeader {
		/// Header name.
		header: &'static str,
		/// Raw header value.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
