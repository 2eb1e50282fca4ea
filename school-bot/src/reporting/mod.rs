//! Error reporting: per-update [`ReportScope`] and the [`ErrorReporter`] sink that receives
//! failures caught by the handler chain.

mod sentry;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info};

use crate::config::BotConfig;
use crate::core::BotError;

pub use sentry::{Dsn, DsnError, SentryReporter};

/// Metadata attached to an error report. One scope per update; never shared between updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportScope {
    pub extras: BTreeMap<String, serde_json::Value>,
    pub tags: BTreeMap<String, String>,
    pub user_id: Option<i64>,
}

impl ReportScope {
    pub fn set_extra(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.extras.insert(key.into(), value);
    }

    pub fn set_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    pub fn set_user(&mut self, user_id: i64) {
        self.user_id = Some(user_id);
    }
}

/// Receives errors that crossed the outermost handler. Implementations must not fail outward:
/// delivery problems are logged and dropped.
#[async_trait]
pub trait ErrorReporter: Send + Sync {
    async fn capture(&self, error: &BotError, scope: &ReportScope);
}

/// Reporter used when no DSN is configured: the error and its scope go to the log.
pub struct TracingReporter;

#[async_trait]
impl ErrorReporter for TracingReporter {
    async fn capture(&self, err: &BotError, scope: &ReportScope) {
        let extras = serde_json::to_string(&scope.extras).unwrap_or_default();
        error!(
            error = %err,
            kind = err.kind(),
            user_id = ?scope.user_id,
            tags = ?scope.tags,
            extras = %extras,
            "Unhandled update error"
        );
    }
}

/// Chooses the Sentry reporter when `sentry_dsn` is set, otherwise [`TracingReporter`].
pub fn build_reporter(config: &BotConfig) -> Result<Arc<dyn ErrorReporter>, DsnError> {
    match config.general.sentry_dsn.as_deref() {
        Some(raw) => {
            let dsn = Dsn::parse(raw)?;
            info!(host = %dsn.host(), project = %dsn.project_id(), "Error reporting to Sentry");
            Ok(Arc::new(SentryReporter::new(dsn, config.env.app_env.clone())))
        }
        None => {
            info!("No sentry_dsn configured, errors are only logged");
            Ok(Arc::new(TracingReporter))
        }
    }
}
