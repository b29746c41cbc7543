//! Generation Orchestrator
//!
//! Owns the output state, the error slot and the single in-flight request. Each operation
//! runs `Idle -> Loading -> Idle`: build the request, call the service, validate the reply,
//! then merge on success or report on failure. A call made while another is loading is
//! rejected, not queued.

use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::output::{FieldPatch, OutputState, OutputStore};
use crate::provider::{GenerationService, ServiceFactory};
use crate::reporter::ErrorReporter;
use crate::request::RequestBuilder;
use crate::response::{RequestOutcome, ResponseValidator};
use crate::types::{ErrorKind, Field, RequestMode};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How an operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "kind", rename_all = "snake_case")]
pub enum OperationStatus {
    /// The reply was merged into the output state.
    Applied,
    /// The attempt failed; the error slot holds the message.
    Failed(ErrorKind),
    /// Input was empty after trimming; nothing happened.
    SkippedEmptyInput,
    /// Another request was in flight; nothing happened.
    RejectedBusy,
}

/// Immutable view of orchestrator state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub outputs: OutputState,
    pub error: Option<String>,
    pub loading: bool,
    pub taken_at: DateTime<Utc>,
}

/// Result of one orchestrator operation.
#[derive(Debug, Clone, Serialize)]
pub struct OperationReport {
    pub mode: RequestMode,
    pub status: OperationStatus,
    pub snapshot: Snapshot,
}

/// Scoped hold on the in-flight flag; released on drop, whatever the exit path.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct GenerationOrchestrator {
    service: Arc<dyn GenerationService>,
    builder: RequestBuilder,
    loading: AtomicBool,
    store: Mutex<OutputStore>,
    reporter: Mutex<ErrorReporter>,
}

impl GenerationOrchestrator {
    pub fn new(service: Arc<dyn GenerationService>, builder: RequestBuilder) -> Self {
        Self {
            service,
            builder,
            loading: AtomicBool::new(false),
            store: Mutex::new(OutputStore::new()),
            reporter: Mutex::new(ErrorReporter::new()),
        }
    }

    /// Create an orchestrator backed by the configured service.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ApiError> {
        let service: Arc<dyn GenerationService> = Arc::from(ServiceFactory::create(config)?);
        Ok(Self::new(
            service,
            RequestBuilder::new(config.system_instruction),
        ))
    }

    /// Generate all three fields from `text`.
    pub async fn generate_all(&self, text: &str) -> OperationReport {
        self.run(text, RequestMode::Full).await
    }

    /// Regenerate `field` from `text`; other fields are never touched.
    pub async fn regenerate_field(&self, text: &str, field: Field) -> OperationReport {
        self.run(text, RequestMode::Targeted(field)).await
    }

    /// Overwrite one field by hand. Rejected while a request is loading.
    pub fn edit_field(&self, field: Field, text: &str) -> OperationReport {
        let mode = RequestMode::Targeted(field);
        let Some(guard) = InFlightGuard::acquire(&self.loading) else {
            debug!(%field, "Edit rejected: request in flight");
            return self.report(mode, OperationStatus::RejectedBusy);
        };

        let patch = FieldPatch::from([(field, text.to_string())]);
        self.store.lock().apply(&patch, mode);
        drop(guard);

        debug!(%field, "Field edited");
        self.report(mode, OperationStatus::Applied)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            outputs: self.store.lock().snapshot(),
            error: self.reporter.lock().message().map(str::to_string),
            loading: self.is_loading(),
            taken_at: Utc::now(),
        }
    }

    pub fn service(&self) -> &dyn GenerationService {
        self.service.as_ref()
    }

    async fn run(&self, text: &str, mode: RequestMode) -> OperationReport {
        let payload = match self.builder.build(text, mode) {
            Ok(payload) => payload,
            Err(err) => {
                debug!(%mode, error = %err, "Skipping request");
                return self.report(mode, OperationStatus::SkippedEmptyInput);
            }
        };

        let Some(guard) = InFlightGuard::acquire(&self.loading) else {
            debug!(%mode, "Request rejected: another request is in flight");
            return self.report(mode, OperationStatus::RejectedBusy);
        };

        self.reporter.lock().clear();
        debug!(
            %mode,
            service = self.service.service_name(),
            messages = payload.messages.len(),
            "Dispatching generation request"
        );

        let outcome = match self.service.send(&payload).await {
            Ok(raw) => ResponseValidator::validate(&raw, mode),
            Err(err) => RequestOutcome::from(err),
        };

        let status = match outcome {
            RequestOutcome::Success(patch) => {
                self.store.lock().apply(&patch, mode);
                self.reporter.lock().clear();
                info!(%mode, fields = patch.len(), "Generation applied");
                OperationStatus::Applied
            }
            RequestOutcome::Failure { kind, detail } => {
                warn!(%mode, %kind, detail = %detail, "Generation failed");
                self.reporter.lock().report(kind, &detail);
                OperationStatus::Failed(kind)
            }
        };

        drop(guard);
        self.report(mode, status)
    }

    fn report(&self, mode: RequestMode, status: OperationStatus) -> OperationReport {
        OperationReport {
            mode,
            status,
            snapshot: self.snapshot(),
        }
    }
}
