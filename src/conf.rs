//! Client configuration: endpoints, transport settings, and media provider selection.
//!
//! [`Configuration`] values are assembled through [`ConfigurationBuilder`], which fills in the
//! public service endpoints and validates that every endpoint uses HTTPS (loopback hosts are
//! exempt so mock servers work in tests). Deserialized configurations take the same path, so
//! partial documents fall back to the defaults and base URLs are normalized.

/// Builder API and validation for [`Configuration`].
pub mod builder;
/// HTTP transport settings.
pub mod client;

pub use builder::*;
pub use client::*;

// self
use crate::{_prelude::*, auth::Secret, media::MediaProvider};

/// Validated client configuration shared by endpoint bindings and media uploads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConfigurationBuilder")]
pub struct Configuration {
	/// Base URL for REST calls; versioned paths (`1/`, `1.1/`) are joined onto it.
	///
	/// Must end in `/` so joins keep the path prefix.
	pub rest_base_url: Url,
	/// Base URL for the platform's own media endpoint.
	pub upload_base_url: Url,
	/// JSON verify-credentials endpoint signed for OAuth Echo uploads.
	pub verify_credentials_json_url: Url,
	/// Transport settings.
	pub http: HttpClientConfig,
	/// Media host used by [`ImageUploadFactory`](crate::media::ImageUploadFactory).
	pub media_provider: MediaProvider,
	/// API key for media hosts that require one.
	pub media_provider_api_key: Option<Secret>,
	/// Overrides the media host's upload URL.
	pub media_provider_upload_url: Option<Url>,
	/// Extra fields appended, in order, to every media upload.
	pub media_provider_parameters: Vec<(String, String)>,
	/// Sends `include_entities=true` on user endpoints.
	pub include_entities: bool,
}
impl Configuration {
	/// Creates a builder seeded with the public service endpoints.
	pub fn builder() -> ConfigurationBuilder {
		ConfigurationBuilder::new()
	}
}
