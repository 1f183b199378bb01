//! Readiness polling for the page-side runtime.
//!
//! After a navigation the page needs a moment before its UI-update runtime
//! exists. The probe polls a marker expression at a fixed short interval
//! until it holds or the caller-supplied deadline passes. This is the only
//! retry-shaped construct in the controller.

use std::time::Duration;

use canvas_commands::{a2ui, CanvasSurface};

/// Configuration for a readiness probe.
#[derive(Debug, Clone)]
pub struct ReadyProbe {
    /// Expression that evaluates to `true` once the page is ready.
    pub marker: String,
    /// Fixed polling interval.
    pub interval: Duration,
    /// Deadline for the whole poll.
    pub timeout: Duration,
}

impl ReadyProbe {
    /// Default polling interval.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

    /// Probe for the A2UI runtime with the given timeout.
    #[must_use]
    pub fn a2ui(timeout: Duration) -> Self {
        Self {
            marker: a2ui::READY_MARKER.to_string(),
            interval: Self::DEFAULT_INTERVAL,
            timeout,
        }
    }
}

/// Poll the surface until the probe's marker expression is `true`.
///
/// Returns `true` as soon as the marker holds, `false` once the deadline
/// passes, and never polls past the configured timeout. An evaluation error
/// counts as "not ready" and is retried on the next tick.
pub async fn wait_ready(surface: &dyn CanvasSurface, probe: &ReadyProbe) -> bool {
    let deadline = tokio::time::Instant::now() + probe.timeout;

    loop {
        match surface.eval(probe.marker.clone()).await {
            Ok(result) if result == "true" => return true,
            Ok(_) => {}
            Err(e) => tracing::debug!("Readiness probe evaluation failed: {e}"),
        }

        if tokio::time::Instant::now() + probe.interval > deadline {
            return false;
        }
        tokio::time::sleep(probe.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Instant;

    use async_trait::async_trait;
    use canvas_commands::{ControllerError, ControllerResult, Snapshot};
    use serde_json::Value;

    /// Surface whose eval pops scripted results, then reports "false".
    struct ScriptedSurface {
        results: Mutex<Vec<ControllerResult<String>>>,
    }

    impl ScriptedSurface {
        fn new(results: Vec<ControllerResult<String>>) -> Self {
            Self {
                results: Mutex::new(results),
            }
        }
    }

    #[async_trait]
    impl CanvasSurface for ScriptedSurface {
        async fn show(&self) -> ControllerResult<()> {
            Ok(())
        }
        async fn hide(&self) -> ControllerResult<()> {
            Ok(())
        }
        async fn navigate(&self, _url: Option<String>) -> ControllerResult<String> {
            Ok(String::new())
        }
        async fn eval(&self, _script: String) -> ControllerResult<String> {
            let mut results = self.results.lock().expect("lock");
            if results.is_empty() {
                Ok("false".to_string())
            } else {
                results.remove(0)
            }
        }
        async fn snapshot(&self, _max_width: Option<u32>) -> ControllerResult<Snapshot> {
            Err(ControllerError::Snapshot("not scripted".into()))
        }
        async fn a2ui_push(&self, _message: Value) -> ControllerResult<()> {
            Ok(())
        }
        async fn a2ui_reset(&self) -> ControllerResult<()> {
            Ok(())
        }
    }

    fn fast_probe(timeout_ms: u64) -> ReadyProbe {
        ReadyProbe {
            marker: "typeof window.__probe === 'function'".to_string(),
            interval: Duration::from_millis(5),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    #[tokio::test]
    async fn test_ready_on_first_poll() {
        let surface = ScriptedSurface::new(vec![Ok("true".to_string())]);
        assert!(wait_ready(&surface, &fast_probe(100)).await);
    }

    #[tokio::test]
    async fn test_ready_after_a_few_polls() {
        let surface = ScriptedSurface::new(vec![
            Ok("false".to_string()),
            Ok("false".to_string()),
            Ok("true".to_string()),
        ]);
        assert!(wait_ready(&surface, &fast_probe(200)).await);
    }

    #[tokio::test]
    async fn test_gives_up_false_at_deadline() {
        let surface = ScriptedSurface::new(vec![]);
        let started = Instant::now();
        assert!(!wait_ready(&surface, &fast_probe(50)).await);
        // Never exceeds the configured timeout by more than one interval.
        assert!(started.elapsed() < Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_evaluation_errors_count_as_not_ready() {
        let surface = ScriptedSurface::new(vec![
            Err(ControllerError::Evaluation("page reloading".into())),
            Ok("true".to_string()),
        ]);
        assert!(wait_ready(&surface, &fast_probe(200)).await);
    }

    #[tokio::test]
    async fn test_non_boolean_result_is_not_ready() {
        let surface = ScriptedSurface::new(vec![Ok("1".to_string())]);
        assert!(!wait_ready(&surface, &fast_probe(20)).await);
    }
}
