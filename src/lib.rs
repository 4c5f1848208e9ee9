//! Typed Twitter REST bindings: OAuth 1.0a request signing, user lookups, and OAuth Echo media
//! uploads over a pluggable HTTP transport.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod conf;
pub mod error;
pub mod http;
pub mod media;
pub mod obs;

pub use api::{Twitter, UserMethods};
pub use error::{Error, Result};

#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		api::Twitter,
		auth::{OAuthAuthorization, OAuthCredentials},
		conf::Configuration,
		http::ReqwestHttpClient,
	};

	/// Fixed nonce used so signatures are reproducible across test runs.
	pub const TEST_NONCE: &str = "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg";
	/// Fixed signing instant (unix seconds) paired with [`TEST_NONCE`].
	pub const TEST_TIMESTAMP: i64 = 1_318_622_958;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Credentials carrying both consumer and access-token halves.
	pub fn test_credentials() -> OAuthCredentials {
		OAuthCredentials::new("consumer-key", "consumer-secret")
			.with_access_token("access-token", "access-token-secret")
	}

	/// Signer with a pinned clock + nonce.
	pub fn test_authorization(credentials: OAuthCredentials) -> OAuthAuthorization {
		let instant = OffsetDateTime::from_unix_timestamp(TEST_TIMESTAMP)
			.expect("Test timestamp should be representable.");

		OAuthAuthorization::new(credentials)
			.with_clock(move || instant)
			.with_nonce(|| TEST_NONCE.to_owned())
	}

	/// Configuration whose REST, upload, and verify endpoints all point at `base`.
	pub fn test_configuration(base: &str) -> Configuration {
		let base = Url::parse(base).expect("Mock server base URL should parse.");

		Configuration::builder()
			.rest_base_url(base.clone())
			.upload_base_url(base.clone())
			.verify_credentials_json_url(
				base.join("1/account/verify_credentials.json")
					.expect("Verify credentials JSON URL should join."),
			)
			.build()
			.expect("Test configuration should validate.")
	}

	/// Constructs a [`Twitter`] client wired to the mock server at `base`.
	pub fn build_test_twitter(base: &str) -> Twitter<ReqwestHttpClient> {
		Twitter::with_http_client(
			test_configuration(base),
			test_authorization(test_credentials()),
			test_reqwest_http_client(),
		)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::{Path, PathBuf},
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
