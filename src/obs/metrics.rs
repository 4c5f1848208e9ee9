// self
use crate::{
	http::RateLimitStatus,
	obs::{CallOutcome, Operation},
};

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(operation: Operation, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"twitter_rest_call_total",
			"operation" => operation.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (operation, outcome);
	}
}

/// Publishes the calls left in an endpoint's rate limit window as a gauge (when enabled).
pub fn record_rate_limit(operation: Operation, limit: &RateLimitStatus) {
	#[cfg(feature = "metrics")]
	{
		metrics::gauge!("twitter_rest_rate_limit_remaining", "operation" => operation.as_str())
			.set(f64::from(limit.remaining));
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (operation, limit);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_call_outcome_noop_without_metrics() {
		record_call_outcome(Operation::ShowUser, CallOutcome::Failure);
		record_rate_limit(
			Operation::LookupUsers,
			&RateLimitStatus { limit: 180, remaining: 0, reset_at: None },
		);
	}
}
