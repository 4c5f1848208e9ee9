//! Transport-agnostic response view plus header and error-body helpers.

// crates.io
use serde::de::DeserializeOwned;
use serde_json::Value;
use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::ParseError};

const BODY_PREVIEW_LIMIT: usize = 256;

/// Rate limit window reported through `x-rate-limit-*` headers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitStatus {
	/// Calls allowed per window.
	pub limit: u32,
	/// Calls left in the current window.
	pub remaining: u32,
	/// Instant the window resets, when reported.
	pub reset_at: Option<OffsetDateTime>,
}

/// Response returned by an [`ApiHttpClient`](crate::http::ApiHttpClient).
///
/// Header names are stored lower-cased so lookups stay case-insensitive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiResponse {
	status: u16,
	headers: BTreeMap<String, String>,
	body: Vec<u8>,
}
impl ApiResponse {
	/// Creates a response with the provided status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: BTreeMap::new(), body: body.into() }
	}

	/// Adds (or replaces) a header.
	pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
		self.headers.insert(name.as_ref().to_ascii_lowercase(), value.into());

		self
	}

	/// HTTP status code.
	pub fn status(&self) -> u16 {
		self.status
	}

	/// Header value by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
	}

	/// Raw body bytes.
	pub fn body(&self) -> &[u8] {
		&self.body
	}

	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decodes the body as JSON, keeping the failing path on error.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ParseError::Json { source, status: Some(self.status) }.into())
	}

	/// Target of a redirect response; must be an absolute URL.
	pub fn location(&self) -> Result<Url> {
		let raw = self.header("location").ok_or(ParseError::MissingHeader { header: "location" })?;

		Url::parse(raw).map_err(|source| {
			ParseError::InvalidHeader { header: "location", value: raw.to_owned(), source }.into()
		})
	}

	/// Rate limit window, when all `x-rate-limit-*` counters are present.
	pub fn rate_limit(&self) -> Option<RateLimitStatus> {
		let limit = self.header("x-rate-limit-limit")?.trim().parse().ok()?;
		let remaining = self.header("x-rate-limit-remaining")?.trim().parse().ok()?;
		let reset_at = self
			.header("x-rate-limit-reset")
			.and_then(|raw| raw.trim().parse::<i64>().ok())
			.and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok());

		Some(RateLimitStatus { limit, remaining, reset_at })
	}

	/// Retry-After hint expressed as a relative duration.
	pub fn retry_after(&self) -> Option<Duration> {
		let raw = self.header("retry-after")?.trim();

		if let Ok(secs) = raw.parse::<u64>() {
			return i64::try_from(secs).ok().map(Duration::seconds);
		}
		if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
			let delta = moment - OffsetDateTime::now_utc();

			if delta.is_positive() {
				return Some(delta);
			}
		}

		None
	}

	/// Passes success and redirect responses through and maps everything else to
	/// [`Error::Api`].
	pub fn error_for_status(self) -> Result<Self> {
		if self.status < 400 {
			return Ok(self);
		}

		let (code, message) = remote_error_details(&self.body);
		let message = message.unwrap_or_else(|| self.body_preview());

		Err(Error::Api {
			status: self.status,
			code,
			message,
			rate_limit: self.rate_limit(),
			retry_after: self.retry_after(),
		})
	}

	fn body_preview(&self) -> String {
		if self.body.is_empty() {
			return format!("empty body with status {}", self.status);
		}

		self.text().chars().take(BODY_PREVIEW_LIMIT).collect()
	}
}

fn remote_error_details(body: &[u8]) -> (Option<i64>, Option<String>) {
	let Ok(value) = serde_json::from_slice::<Value>(body) else {
		return (None, None);
	};

	match value.get("errors") {
		Some(Value::Array(errors)) => {
			let Some(first) = errors.first() else {
				return (None, None);
			};

			(
				first.get("code").and_then(Value::as_i64),
				first.get("message").and_then(Value::as_str).map(ToOwned::to_owned),
			)
		},
		Some(Value::String(message)) => (None, Some(message.to_owned())),
		_ => (None, value.get("error").and_then(Value::as_str).map(ToOwned::to_owned)),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn error_for_status_reads_errors_array() {
		let response = ApiResponse::new(
			404,
			r#"{"errors":[{"code":50,"message":"User not found."}]}"#.as_bytes().to_vec(),
		)
		.with_header("X-Rate-Limit-Limit", "180")
		.with_header("X-Rate-Limit-Remaining", "179")
		.with_header("X-Rate-Limit-Reset", "1318622958");
		let err = response.error_for_status().expect_err("HTTP 404 should map to an API error.");

		match err {
			Error::Api { status, code, message, rate_limit, .. } => {
				assert_eq!(status, 404);
				assert_eq!(code, Some(50));
				assert_eq!(message, "User not found.");

				let rate_limit = rate_limit.expect("Rate limit headers should be parsed.");

				assert_eq!(rate_limit.limit, 180);
				assert_eq!(rate_limit.remaining, 179);
				assert_eq!(
					rate_limit.reset_at.map(|at| at.unix_timestamp()),
					Some(1_318_622_958)
				);
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn error_for_status_falls_back_to_error_field_and_preview() {
		let legacy = ApiResponse::new(401, br#"{"error":"Not authorized."}"#.to_vec())
			.error_for_status()
			.expect_err("HTTP 401 should map to an API error.");

		assert!(matches!(legacy, Error::Api { code: None, ref message, .. } if message == "Not authorized."));

		let plain = ApiResponse::new(503, b"Over capacity".to_vec())
			.with_header("Retry-After", "7")
			.error_for_status()
			.expect_err("HTTP 503 should map to an API error.");

		match plain {
			Error::Api { message, retry_after, .. } => {
				assert_eq!(message, "Over capacity");
				assert_eq!(retry_after, Some(Duration::seconds(7)));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn redirects_pass_through_and_expose_location() {
		let response = ApiResponse::new(302, Vec::new())
			.with_header("Location", "https://si0.twimg.com/profile_images/1/a_bigger.png")
			.error_for_status()
			.expect("Redirects should not be treated as failures.");

		assert_eq!(
			response.location().expect("Location header should parse.").as_str(),
			"https://si0.twimg.com/profile_images/1/a_bigger.png"
		);
		assert!(matches!(
			ApiResponse::new(302, Vec::new()).location(),
			Err(Error::Parse(ParseError::MissingHeader { header: "location" }))
		));
	}

	#[test]
	fn relative_locations_are_reported_as_bad_responses() {
		let err = ApiResponse::new(302, Vec::new())
			.with_header("Location", "/profile_images/1/a_bigger.png")
			.location()
			.expect_err("Relative redirect targets should be rejected.");

		assert!(matches!(
			err,
			Error::Parse(ParseError::InvalidHeader { header: "location", ref value, .. })
				if value == "/profile_images/1/a_bigger.png"
		));
	}

	#[test]
	fn oversized_retry_after_is_ignored() {
		let response =
			ApiResponse::new(503, Vec::new()).with_header("Retry-After", u64::MAX.to_string());

		assert_eq!(response.retry_after(), None);
		assert_eq!(
			ApiResponse::new(503, Vec::new()).with_header("Retry-After", " 30 ").retry_after(),
			Some(Duration::seconds(30))
		);
	}

	#[test]
	fn json_errors_keep_the_failing_path() {
		#[derive(Debug, Deserialize)]
		struct Payload {
			#[allow(dead_code)]
			users: Vec<u64>,
		}

		let err = ApiResponse::new(200, br#"{"users":[1,"two"]}"#.to_vec())
			.json::<Payload>()
			.expect_err("Mismatched element types should fail to decode.");

		match err {
			Error::Parse(ParseError::Json { source, status }) => {
				assert_eq!(source.path().to_string(), "users[1]");
				assert_eq!(status, Some(200));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
