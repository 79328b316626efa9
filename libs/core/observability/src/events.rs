//! Event operation metrics.

use metrics::{counter, histogram};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOperation {
    Create,
    Get,
    List,
    Update,
    Delete,
    Restore,
}

impl EventOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Get => "get",
            Self::List => "list",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Restore => "restore",
        }
    }
}

pub struct EventMetrics;

impl EventMetrics {
    /// Counts a successful operation in `events_operations_total`.
    pub fn record_operation(operation: EventOperation) {
        counter!("events_operations_total", "operation" => operation.as_str()).increment(1);
    }

    /// `reason` should be a short fixed label such as `not_found` or `invalid`.
    pub fn record_failure(operation: EventOperation, reason: &'static str) {
        counter!(
            "events_operation_failures_total",
            "operation" => operation.as_str(),
            "reason" => reason
        )
        .increment(1);

        tracing::debug!(operation = operation.as_str(), reason, "Event operation failed");
    }
}

/// Records `events_operation_duration_seconds` when stopped or dropped.
pub struct EventTimer {
    start: Instant,
    operation: EventOperation,
    stopped: bool,
}

impl EventTimer {
    pub fn start(operation: EventOperation) -> Self {
        Self {
            start: Instant::now(),
            operation,
            stopped: false,
        }
    }

    /// Returns the elapsed milliseconds, or 0 if already stopped.
    pub fn stop(&mut self) -> u64 {
        if self.stopped {
            return 0;
        }
        self.stopped = true;

        let elapsed = self.start.elapsed();
        histogram!(
            "events_operation_duration_seconds",
            "operation" => self.operation.as_str()
        )
        .record(elapsed.as_secs_f64());

        elapsed.as_millis() as u64
    }
}

impl Drop for EventTimer {
    fn drop(&mut self) {
        if !self.stopped {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn test_operation_counter_is_labelled() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            EventMetrics::record_operation(EventOperation::Create);
            EventMetrics::record_operation(EventOperation::Create);
            EventMetrics::record_failure(EventOperation::Get, "not_found");
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"events_operations_total{operation="create"} 2"#));
        assert!(rendered.contains(r#"operation="get""#));
        assert!(rendered.contains(r#"reason="not_found""#));
    }

    #[test]
    fn test_timer_records_once() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            let mut timer = EventTimer::start(EventOperation::List);
            timer.stop();
            assert_eq!(timer.stop(), 0);
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"events_operation_duration_seconds_count{operation="list"} 1"#));
    }

    #[test]
    fn test_operation_labels() {
        assert_eq!(EventOperation::Restore.as_str(), "restore");
        assert_eq!(EventOperation::Delete.as_str(), "delete");
    }
}
