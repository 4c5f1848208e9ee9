// self
use crate::{_prelude::*, http::RateLimitStatus, obs::Operation};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by endpoint bindings and uploads.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(operation: Operation, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("twitter_rest.call", operation = operation.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (operation, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event once a media host returns the uploaded URL.
pub fn log_uploaded_url(provider: &'static str, url: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(provider, "uploaded url [{url}]");
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (provider, url);
	}
}

/// Warns once a window is exhausted; otherwise traces the remaining budget.
pub fn log_rate_limit(operation: Operation, limit: &RateLimitStatus) {
	#[cfg(feature = "tracing")]
	{
		let operation = operation.as_str();

		if limit.remaining == 0 {
			tracing::warn!(
				operation,
				limit = limit.limit,
				reset_at = ?limit.reset_at,
				"rate limit exhausted"
			);
		} else {
			tracing::trace!(
				operation,
				limit = limit.limit,
				remaining = limit.remaining,
				"rate limit window"
			);
		}
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (operation, limit);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn call_span_noop_without_tracing() {
		let span = CallSpan::new(Operation::MediaUpload, "test");

		log_uploaded_url("twitter", "https://pic.example.com/1");
		log_rate_limit(
			Operation::SearchUsers,
			&RateLimitStatus { limit: 180, remaining: 0, reset_at: None },
		);

		let _ = span;
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = CallSpan::new(Operation::SearchUsers, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
