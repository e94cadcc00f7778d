//! Supervised task definitions.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Boxed error carried by a failed task.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a supervised task that did not finish cleanly.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Wind-down solely attributable to cancellation. Never counts as a
    /// failure in the aggregate outcome.
    #[error("task canceled")]
    Canceled,

    /// A real failure; the supervisor cancels all siblings and surfaces it.
    #[error(transparent)]
    Failed(BoxError),
}

impl TaskError {
    /// Wrap any error as a fatal task failure.
    pub fn failed(err: impl Into<BoxError>) -> Self {
        TaskError::Failed(err.into())
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }
}

type TaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send>>;
type TaskFn = Box<dyn FnOnce(CancellationToken) -> TaskFuture + Send>;

/// A named, long-running unit of work owned by the supervisor.
///
/// The closure receives a [`CancellationToken`] derived from the supervisor's
/// scope and is expected to wind down promptly once it fires.
pub struct SupervisedTask {
    name: String,
    run: TaskFn,
}

impl SupervisedTask {
    pub fn new<F, Fut>(name: impl Into<String>, run: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            run: Box::new(move |cancel| Box::pin(run(cancel))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn into_parts(self) -> (String, TaskFn) {
        (self.name, self.run)
    }
}

impl std::fmt::Debug for SupervisedTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupervisedTask")
            .field("name", &self.name)
            .finish()
    }
}
