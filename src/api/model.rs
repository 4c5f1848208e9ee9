//! Records returned by the user endpoints.

// std
use std::{ops::Deref, vec::IntoIter};
// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, http::HttpParameter, http::RateLimitStatus};

/// Remote user record.
///
/// The common attributes are typed; the service owns the schema, so everything else is kept
/// verbatim in [`User::extra`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
	/// Numeric user identifier.
	pub id: u64,
	/// Screen name (handle) without the leading `@`.
	pub screen_name: String,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Free-form profile description.
	#[serde(default)]
	pub description: Option<String>,
	/// Self-reported location.
	#[serde(default)]
	pub location: Option<String>,
	/// Profile URL.
	#[serde(default)]
	pub url: Option<String>,
	/// Whether the account's statuses are protected.
	#[serde(default)]
	pub protected: bool,
	/// Whether the account is verified.
	#[serde(default)]
	pub verified: bool,
	/// Follower count.
	#[serde(default)]
	pub followers_count: u64,
	/// Following count.
	#[serde(default)]
	pub friends_count: u64,
	/// Status count.
	#[serde(default)]
	pub statuses_count: u64,
	/// HTTPS avatar URL.
	#[serde(default)]
	pub profile_image_url_https: Option<String>,
	/// Account creation timestamp, as rendered by the service.
	#[serde(default)]
	pub created_at: Option<String>,
	/// Remaining attributes, untouched.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}

/// Suggested-user category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
	/// Human-readable category name.
	pub name: String,
	/// Slug accepted by the per-category suggestion endpoints.
	pub slug: String,
	/// Number of users in the category.
	#[serde(default)]
	pub size: u32,
}

/// Resolved profile image location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileImage {
	/// Image URL taken from the redirect.
	pub url: Url,
	/// Rate limit window reported with the lookup.
	pub rate_limit: Option<RateLimitStatus>,
}

/// Profile image sizes offered by the service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSize {
	/// 73px by 73px.
	Bigger,
	#[default]
	/// 48px by 48px.
	Normal,
	/// 24px by 24px.
	Mini,
	/// Uploaded original.
	Original,
}
impl ImageSize {
	/// Value of the `size` query parameter.
	pub const fn as_str(self) -> &'static str {
		match self {
			ImageSize::Bigger => "bigger",
			ImageSize::Normal => "normal",
			ImageSize::Mini => "mini",
			ImageSize::Original => "original",
		}
	}
}
impl Display for ImageSize {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Identifies a user either by numeric id or screen name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum UserRef {
	/// Numeric user identifier.
	Id(u64),
	/// Screen name (handle).
	ScreenName(String),
}
impl UserRef {
	pub(crate) fn to_parameter(&self) -> HttpParameter {
		match self {
			UserRef::Id(id) => HttpParameter::text("user_id", id.to_string()),
			UserRef::ScreenName(name) => HttpParameter::text("screen_name", name.as_str()),
		}
	}
}
impl From<u64> for UserRef {
	fn from(id: u64) -> Self {
		Self::Id(id)
	}
}
impl From<&str> for UserRef {
	fn from(screen_name: &str) -> Self {
		Self::ScreenName(screen_name.trim_start_matches('@').to_owned())
	}
}
impl From<String> for UserRef {
	fn from(screen_name: String) -> Self {
		Self::from(screen_name.as_str())
	}
}

/// List payload plus the rate limit window it was served under.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseList<T> {
	/// Records in response order.
	pub items: Vec<T>,
	/// Rate limit window, when the response carried one.
	pub rate_limit: Option<RateLimitStatus>,
}
impl<T> ResponseList<T> {
	pub(crate) fn new(items: Vec<T>, rate_limit: Option<RateLimitStatus>) -> Self {
		Self { items, rate_limit }
	}

	/// Consumes the list, returning the records.
	pub fn into_inner(self) -> Vec<T> {
		self.items
	}
}
impl<T> Deref for ResponseList<T> {
	type Target = [T];

	fn deref(&self) -> &Self::Target {
		&self.items
	}
}
impl<T> IntoIterator for ResponseList<T> {
	type IntoIter = IntoIter<T>;
	type Item = T;

	fn into_iter(self) -> Self::IntoIter {
		self.items.into_iter()
	}
}
