mod common;

use common::*;
use deprovisioner_core::models::EvaluationCategory;
use deprovisioner_core::orchestration::{RetryDecision, RetryPolicy, Step};
use proptest::prelude::*;
use std::time::Duration;

proptest! {
    /// Property: once an evaluation is recorded as deleted it stays deleted,
    /// whatever the AVS does on later invocations
    #[test]
    fn deletion_flags_never_revert(failures in prop::collection::vec((any::<bool>(), any::<bool>()), 1..30)) {
        tokio_test::block_on(async {
            let fixture = RemovalFixture::new();
            let mut operation = fixture.insert(pending_lifecycle()).await;
            let mut seen_internal = false;
            let mut seen_external = false;

            for (internal_fails, external_fails) in failures {
                for (evaluation_id, fails) in [
                    (INTERNAL_EVALUATION_ID, internal_fails),
                    (EXTERNAL_EVALUATION_ID, external_fails),
                ] {
                    if fails {
                        fixture.avs.fail_evaluation(evaluation_id, unavailable());
                    } else {
                        fixture.avs.recover_evaluation(evaluation_id);
                    }
                }

                let outcome = fixture.step.run(operation).await;
                operation = outcome.into_operation();

                let internal = operation.avs.is_deleted(EvaluationCategory::Internal);
                let external = operation.avs.is_deleted(EvaluationCategory::External);
                prop_assert!(!seen_internal || internal);
                prop_assert!(!seen_external || external);
                // External is never removed while internal is still pending
                prop_assert!(!external || internal);
                seen_internal = internal;
                seen_external = external;
            }
            Ok(())
        })?;
    }

    /// Property: a failure is terminal exactly when the charged time reaches the window
    #[test]
    fn retry_decision_matches_window_arithmetic(
        interval_secs in 1u64..120,
        extra_window_secs in 0u64..3600,
        elapsed_secs in 0u64..4000,
    ) {
        let window_secs = interval_secs + extra_window_secs;
        let policy = RetryPolicy::new(
            Duration::from_secs(interval_secs),
            Duration::from_secs(window_secs),
        )
        .unwrap();
        let decision = policy.decide(Duration::from_secs(elapsed_secs));

        if elapsed_secs + interval_secs >= window_secs {
            prop_assert_eq!(decision, RetryDecision::Abandon);
        } else {
            prop_assert_eq!(decision, RetryDecision::RetryAfter(Duration::from_secs(interval_secs)));
        }
    }

    /// Property: every policy that can be built eventually gives up
    #[test]
    fn constructible_policies_always_exhaust(
        interval_secs in 0u64..120,
        window_secs in 0u64..3600,
    ) {
        match RetryPolicy::new(Duration::from_secs(interval_secs), Duration::from_secs(window_secs)) {
            Ok(policy) => {
                let mut elapsed = Duration::ZERO;
                let mut failures = 0u64;
                while let RetryDecision::RetryAfter(wait) = policy.decide(elapsed) {
                    prop_assert!(wait > Duration::ZERO);
                    elapsed = policy.charge(elapsed);
                    failures += 1;
                }
                prop_assert!(failures <= window_secs / interval_secs);
            }
            Err(_) => prop_assert!(interval_secs == 0 || window_secs < interval_secs),
        }
    }
}
