//! RetryExecutor - バックエンド操作を有限回リトライ付きで実行する
//!
//! # 判定
//! - 成功: 結果をそのまま返す
//! - TransientBackend かつ予算内: 即座に再実行（遅延なし）
//! - TransientBackend かつ予算切れ: RetryExhausted（原因をそのまま返す）
//! - それ以外: Operation エラー（リトライしない）

use crate::domain::{Classify, FailureKind};
use crate::error::{ExecuteError, ExecuteResult};

use super::RetryPolicy;

/// Runs backend operations with a bounded number of immediate retries.
///
/// The executor holds only its policy. Every `execute` call keeps its own
/// attempt counter, so one executor can be shared freely between threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Execute `operation`, retrying transient backend failures.
    ///
    /// `op_name` and `key_name` are used for diagnostics only.
    ///
    /// # Errors
    /// - [`ExecuteError::RetryExhausted`] after `retry_count + 1` transient failures.
    /// - [`ExecuteError::Operation`] on the first non-transient failure.
    pub fn execute<R, E, F>(
        &self,
        op_name: &str,
        key_name: &str,
        mut operation: F,
    ) -> ExecuteResult<R, E::Cause>
    where
        F: FnMut() -> Result<R, E>,
        E: Classify,
        E::Cause: std::error::Error + 'static,
    {
        let mut retry_num: u32 = 0;

        loop {
            let err = match operation() {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            match err.failure_kind() {
                FailureKind::TransientBackend if retry_num < self.policy.retry_count => {
                    retry_num += 1;
                    tracing::debug!(
                        op_name,
                        key_name,
                        attempt = retry_num + 1,
                        max_attempts = self.policy.max_attempts(),
                        "transient backend failure, retrying",
                    );
                }
                FailureKind::TransientBackend => {
                    let attempts = retry_num + 1;
                    tracing::debug!(op_name, key_name, attempts, "retry budget exhausted");
                    return Err(ExecuteError::RetryExhausted {
                        op_name: op_name.to_string(),
                        key_name: key_name.to_string(),
                        attempts,
                        cause: err.into_cause(),
                    });
                }
                FailureKind::Other => {
                    return Err(ExecuteError::Operation {
                        op_name: op_name.to_string(),
                        key_name: key_name.to_string(),
                        source: err.into_cause(),
                    });
                }
            }
        }
    }
}

/// Execute with the default policy (two retries).
pub fn execute<R, E, F>(op_name: &str, key_name: &str, operation: F) -> ExecuteResult<R, E::Cause>
where
    F: FnMut() -> Result<R, E>,
    E: Classify,
    E::Cause: std::error::Error + 'static,
{
    RetryExecutor::default().execute(op_name, key_name, operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BackendError, Failure};
    use rstest::rstest;
    use std::fmt;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Collects `(message, attempt)` of every event emitted while installed.
    #[derive(Clone, Default)]
    struct EventLog(Arc<Mutex<Vec<(String, Option<u64>)>>>);

    impl EventLog {
        fn events(&self) -> Vec<(String, Option<u64>)> {
            self.0.lock().unwrap().clone()
        }
    }

    #[derive(Default)]
    struct EventFields {
        message: String,
        attempt: Option<u64>,
    }

    impl Visit for EventFields {
        fn record_u64(&mut self, field: &Field, value: u64) {
            if field.name() == "attempt" || field.name() == "attempts" {
                self.attempt = Some(value);
            }
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.message = format!("{value:?}");
            }
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for EventLog {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = EventFields::default();
            event.record(&mut fields);
            self.0.lock().unwrap().push((fields.message, fields.attempt));
        }
    }

    fn with_event_log<T>(f: impl FnOnce() -> T) -> (T, Vec<(String, Option<u64>)>) {
        let log = EventLog::default();
        let subscriber = tracing_subscriber::registry().with(log.clone());
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, log.events())
    }

    /// Fails transiently `failures` times, then returns `value`.
    fn flaky(
        failures: u32,
        value: &'static str,
    ) -> impl FnMut() -> Result<&'static str, BackendError> {
        let mut left = failures;
        move || {
            if left > 0 {
                left -= 1;
                Err(BackendError::timeout(format!("left={left}")))
            } else {
                Ok(value)
            }
        }
    }

    #[test]
    fn success_on_first_attempt() {
        let mut calls = 0;
        let r = execute("get", "queue:orders", || {
            calls += 1;
            Ok::<_, BackendError>(7)
        });
        assert_eq!(r.unwrap(), 7);
        assert_eq!(calls, 1);
    }

    #[rstest]
    #[case::one_failure(1)]
    #[case::two_failures(2)]
    fn recovers_within_budget(#[case] failures: u32) {
        let mut calls = 0;
        let mut op = flaky(failures, "msg-123");
        let r = execute("dequeue", "queue:orders", || {
            calls += 1;
            op()
        });
        assert_eq!(r.unwrap(), "msg-123");
        assert_eq!(calls, failures + 1);
    }

    #[rstest]
    #[case::no_retry(0)]
    #[case::default_budget(2)]
    #[case::larger_budget(5)]
    fn exhausts_after_retry_count_plus_one(#[case] retry_count: u32) {
        let executor = RetryExecutor::new(RetryPolicy::new(retry_count));
        let mut calls = 0;
        let r: ExecuteResult<(), _> = executor.execute("ack", "queue:orders", || {
            calls += 1;
            Err(BackendError::unavailable("node down"))
        });

        let err = r.unwrap_err();
        assert_eq!(calls, retry_count + 1);
        match err {
            ExecuteError::RetryExhausted {
                attempts, cause, ..
            } => {
                assert_eq!(attempts, retry_count + 1);
                assert_eq!(cause, BackendError::unavailable("node down"));
            }
            other => panic!("expected RetryExhausted, got {other:?}"),
        }
    }

    #[test]
    fn non_transient_failure_is_not_retried() {
        let mut calls = 0;
        let r: ExecuteResult<(), _> = execute("push", "queue:orders", || {
            calls += 1;
            Err(BackendError::validation("empty payload"))
        });

        let err = r.unwrap_err();
        assert_eq!(calls, 1);
        assert!(!err.is_retry_exhausted());
        assert_eq!(
            err.to_string(),
            "Operation: ( push ) failed on key: [queue:orders ]."
        );
        assert_eq!(err.into_cause(), BackendError::validation("empty payload"));
    }

    #[test]
    fn non_transient_after_transient_stops_immediately() {
        let mut calls = 0;
        let r: ExecuteResult<(), _> = execute("remove", "queue:orders", || {
            calls += 1;
            if calls == 1 {
                Err(BackendError::timeout("t"))
            } else {
                Err(BackendError::NotFound("msg-1".to_string()))
            }
        });

        assert_eq!(calls, 2);
        assert!(matches!(r, Err(ExecuteError::Operation { .. })));
    }

    #[test]
    fn tagged_failures_unwrap_to_their_cause() {
        let mut calls = 0;
        let r: ExecuteResult<(), std::io::Error> = execute("ack", "queue:orders", || {
            calls += 1;
            Err(Failure::transient(std::io::Error::other("reset")))
        });

        assert_eq!(calls, 3);
        let err = r.unwrap_err();
        assert!(err.is_retry_exhausted());
        assert_eq!(err.cause().to_string(), "reset");
    }

    #[test]
    fn each_call_has_its_own_budget() {
        let executor = RetryExecutor::default();
        for _ in 0..3 {
            let mut op = flaky(2, "ok");
            assert_eq!(executor.execute("peek", "queue:orders", &mut op).unwrap(), "ok");
        }
    }

    #[test]
    fn emits_a_debug_event_per_retry() {
        let mut op = flaky(2, "msg-123");
        let (r, events) = with_event_log(|| execute("dequeue", "queue:orders", &mut op));

        assert_eq!(r.unwrap(), "msg-123");
        assert_eq!(
            events,
            vec![
                ("transient backend failure, retrying".to_string(), Some(2)),
                ("transient backend failure, retrying".to_string(), Some(3)),
            ]
        );
    }

    #[test]
    fn emits_an_event_when_budget_is_exhausted() {
        let executor = RetryExecutor::new(RetryPolicy::new(1));
        let (r, events) = with_event_log(|| {
            executor.execute("ack", "queue:orders", || {
                Err::<(), _>(BackendError::timeout("read"))
            })
        });

        assert!(r.unwrap_err().is_retry_exhausted());
        assert_eq!(
            events,
            vec![
                ("transient backend failure, retrying".to_string(), Some(2)),
                ("retry budget exhausted".to_string(), Some(2)),
            ]
        );
    }

    #[test]
    fn non_transient_failure_emits_nothing() {
        let (r, events) = with_event_log(|| {
            execute("push", "queue:orders", || {
                Err::<(), _>(BackendError::validation("empty payload"))
            })
        });

        assert!(r.is_err());
        assert!(events.is_empty());
    }
}
