//! Audit/telemetry sink for reconciliation events.

use std::collections::HashMap;

/// Fire-and-forget audit event sink.
///
/// Emission must never affect the reconciliation outcome: implementations
/// swallow their own failures (logging them at most).
pub trait AuditSink: Send + Sync {
    /// Emit one event with string attributes.
    fn emit(&self, event: &str, attributes: HashMap<String, String>);
}

/// Sink that writes audit events to the `audit` tracing target.
#[derive(Debug, Clone, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, event: &str, attributes: HashMap<String, String>) {
        tracing::info!(target: "audit", event = %event, attributes = ?attributes, "audit event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_sink_emit_does_not_panic() {
        let sink = TracingAuditSink;
        sink.emit(
            "role.sync.applied",
            HashMap::from([("roleCode".to_string(), "AUDIT".to_string())]),
        );
    }
}
