//! Optional observability helpers for endpoint calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `twitter_rest.call` with the `operation`
//!   (endpoint) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `twitter_rest_call_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`, and to publish the
//!   `twitter_rest_rate_limit_remaining` gauge per `operation`.
//!
//! Rate limit windows reported by the service are logged too: exhausted windows at `warn`,
//! the rest at `trace`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, http::RateLimitStatus};

/// Remote operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// `users/show` (current API version).
	ShowUser,
	/// `users/show` (legacy v1 API).
	ShowUserV1,
	/// `users/lookup`.
	LookupUsers,
	/// `users/search`.
	SearchUsers,
	/// `users/suggestions`.
	SuggestedUserCategories,
	/// `users/suggestions/:slug`.
	UserSuggestions,
	/// `users/suggestions/:slug/members`.
	MemberSuggestions,
	/// `users/profile_image/:screen_name`.
	ProfileImage,
	/// `users/contributors`.
	Contributors,
	/// `users/contributees`.
	Contributees,
	/// Media upload through a media provider.
	MediaUpload,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::ShowUser => "users.show",
			Operation::ShowUserV1 => "users.show_v1",
			Operation::LookupUsers => "users.lookup",
			Operation::SearchUsers => "users.search",
			Operation::SuggestedUserCategories => "users.suggestions",
			Operation::UserSuggestions => "users.suggestions.slug",
			Operation::MemberSuggestions => "users.suggestions.members",
			Operation::ProfileImage => "users.profile_image",
			Operation::Contributors => "users.contributors",
			Operation::Contributees => "users.contributees",
			Operation::MediaUpload => "media.upload",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a binding.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Feeds a response's rate limit window to the metrics gauge and the log.
pub(crate) fn observe_rate_limit(operation: Operation, limit: &RateLimitStatus) {
	record_rate_limit(operation, limit);
	log_rate_limit(operation, limit);
}

/// Runs `fut` inside a call span and records attempt + outcome counters around it.
pub(crate) async fn observe<T, Fut>(operation: Operation, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = CallSpan::new(operation, stage);

	record_call_outcome(operation, CallOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_call_outcome(operation, CallOutcome::Success),
		Err(_) => record_call_outcome(operation, CallOutcome::Failure),
	}

	result
}
