use std::time::Instant;

use tracing::{error, info};

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Uniform failure raised by pipeline operations.
///
/// The trace scope wraps every public stage and orchestrator operation;
/// whatever goes wrong underneath surfaces as this one kind, tagged with the
/// owning agent and the operation that was in flight. The original cause is
/// preserved as the error source.
#[derive(Debug, thiserror::Error)]
#[error("{agent} failed during {operation}")]
pub struct CrewError {
    agent: &'static str,
    operation: &'static str,
    #[source]
    source: BoxError,
}

impl CrewError {
    pub fn agent(&self) -> &'static str {
        self.agent
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

/// Structured event scope held by each stage and by the orchestrator.
///
/// Emits `operation_start` and `operation_end` events with the elapsed
/// duration, and maps a failing closure into [`CrewError`] after logging
/// `operation_failed` with the cause.
#[derive(Debug, Clone, Copy)]
pub struct StageTracer {
    agent: &'static str,
}

impl StageTracer {
    pub(crate) const fn new(agent: &'static str) -> Self {
        Self { agent }
    }

    pub(crate) fn scope<T, F>(&self, operation: &'static str, body: F) -> Result<T, CrewError>
    where
        F: FnOnce() -> Result<T, BoxError>,
    {
        info!(agent = self.agent, operation, event = "operation_start");
        let started = Instant::now();

        match body() {
            Ok(value) => {
                let duration_ms = started.elapsed().as_millis() as u64;
                info!(
                    agent = self.agent,
                    operation,
                    duration_ms,
                    event = "operation_end"
                );
                Ok(value)
            }
            Err(source) => {
                let duration_ms = started.elapsed().as_millis() as u64;
                error!(
                    agent = self.agent,
                    operation,
                    duration_ms,
                    cause = %source,
                    event = "operation_failed"
                );
                Err(CrewError {
                    agent: self.agent,
                    operation,
                    source,
                })
            }
        }
    }
}
