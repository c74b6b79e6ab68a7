//! Property-based tests for the retry schedule and result normalization
//!
//! Uses proptest to verify:
//! - Linear backoff: the wait before attempt `k` is `k * unit`
//! - The retry budget allows exactly `max_retries + 1` attempts
//! - Only retryable errors reset the session
//! - Query results always carry exactly one outcome

use graphrag_mcp_client::{
    CallFailure, ClientError, QueryResult, QueryStatus, RetryPolicy, ToolPayload, resets_session,
};
use proptest::prelude::*;
use serde_json::json;
use std::time::Duration;

// =============================================================================
// RETRY POLICY PROPERTY TESTS
// =============================================================================

/// Strategy for generating linear retry policies
fn linear_policy_strategy() -> impl Strategy<Value = (Duration, u32)> {
    (1u64..=5_000, 0u32..=10).prop_map(|(unit_ms, max_retries)| {
        (Duration::from_millis(unit_ms), max_retries)
    })
}

fn client_error_strategy() -> impl Strategy<Value = ClientError> {
    prop_oneof![
        ".{0,40}".prop_map(ClientError::Protocol),
        (100u16..600, ".{0,40}")
            .prop_map(|(status, body)| ClientError::from(CallFailure::Status { status, body })),
        ".{0,40}".prop_map(|snippet| ClientError::from(CallFailure::Unparseable { snippet })),
        ".{0,40}".prop_map(|message| ClientError::from(CallFailure::Reported { message })),
        ".{0,40}".prop_map(ClientError::Transport),
        ".{0,40}".prop_map(ClientError::Serialization),
        ".{0,40}".prop_map(ClientError::Configuration),
        (0u64..300).prop_map(|secs| ClientError::Timeout {
            operation: "tools/call".to_string(),
            timeout: Duration::from_secs(secs),
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: backoff before attempt k (1-indexed after the first) is k * unit
    #[test]
    fn prop_backoff_is_linear((unit, max_retries) in linear_policy_strategy()) {
        let policy = RetryPolicy::linear(unit, max_retries);

        for attempt in 0..max_retries {
            prop_assert_eq!(policy.delay(attempt), Some(unit * (attempt + 1)));
        }
    }

    /// Property: exactly max_retries + 1 attempts before exhaustion
    #[test]
    fn prop_attempt_budget((unit, max_retries) in linear_policy_strategy()) {
        let policy = RetryPolicy::linear(unit, max_retries);

        let retries = (0..max_retries + 5)
            .take_while(|attempt| policy.delay(*attempt).is_some())
            .count() as u32;

        prop_assert_eq!(retries, max_retries);
        prop_assert_eq!(policy.max_attempts(), max_retries + 1);
        prop_assert_eq!(policy.delay(max_retries), None);
    }

    /// Property: overriding the retry count keeps the unit
    #[test]
    fn prop_with_max_retries_keeps_unit(
        (unit, max_retries) in linear_policy_strategy(),
        override_retries in 1u32..=10
    ) {
        let policy = RetryPolicy::linear(unit, max_retries).with_max_retries(override_retries);
        prop_assert_eq!(policy.delay(0), Some(unit));
        prop_assert_eq!(policy.max_retries(), override_retries);
    }

    /// Property: the session is reset exactly when the error is retried
    #[test]
    fn prop_reset_matches_retryability(error in client_error_strategy()) {
        prop_assert_eq!(resets_session(&error), error.is_retryable());
        prop_assert!(!(error.is_timeout() && error.is_retryable()));
    }

    /// Property: a result built from any payload has exactly one outcome
    #[test]
    fn prop_payload_result_has_single_outcome(
        text in ".{0,80}",
        failed in prop::bool::ANY,
        latency_ms in 0u64..200_000
    ) {
        let mut payload = ToolPayload::from_text(&text).into_inner();
        payload.insert("success".to_string(), json!(!failed));
        let result = QueryResult::from_payload(payload.into(), Duration::from_millis(latency_ms));

        prop_assert!(result.latency_ms >= 0.0);
        match result.status() {
            QueryStatus::Success => {
                prop_assert!(!failed);
                prop_assert!(result.answer().is_some());
                prop_assert!(result.error_reason().is_none());
            }
            QueryStatus::Error => {
                prop_assert!(failed);
                prop_assert!(result.answer().is_none());
                prop_assert!(result.error_reason().is_some());
            }
            QueryStatus::Timeout => prop_assert!(false, "payloads never time out"),
        }
    }
}
