//! Fail-fast supervision of concurrent long-running tasks.
//!
//! # Data Flow
//! ```text
//! shutdown: CancellationToken (from OS signals)
//!     └─► scope = shutdown.child_token()
//!           ├─► task[0](scope.child_token())  ─┐
//!           ├─► task[1](scope.child_token())  ─┤ JoinSet
//!           └─► task[N](scope.child_token())  ─┘
//!
//! First Failed outcome ──► scope.cancel() ──► siblings wind down
//! Join all ──► first Failed error, or Ok when outcomes are Ok/Canceled
//! ```
//!
//! # Design Decisions
//! - No restarts: a failed task stays failed
//! - Canceled outcomes are success; only real failures surface
//! - Under simultaneous failures, whichever error joins first wins
//!   (nondeterministic, accepted)

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::lifecycle::task::{SupervisedTask, TaskError};

/// Run all `tasks` concurrently until they finish or `shutdown` fires.
///
/// Returns the first non-cancellation error, canceling every sibling as soon
/// as it occurs. With zero tasks, waits for `shutdown` and returns `Ok(())`.
pub async fn run(
    shutdown: CancellationToken,
    tasks: Vec<SupervisedTask>,
) -> Result<(), TaskError> {
    let scope = shutdown.child_token();

    if tasks.is_empty() {
        scope.cancelled().await;
        return Ok(());
    }

    let mut set: JoinSet<(String, Result<(), TaskError>)> = JoinSet::new();
    for task in tasks {
        let token = scope.child_token();
        let (name, run) = task.into_parts();
        set.spawn(async move {
            let result = run(token).await;
            (name, result)
        });
    }

    let mut first_error: Option<TaskError> = None;
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((name, Ok(()))) => {
                tracing::debug!(task = %name, "task finished");
            }
            Ok((name, Err(err))) if err.is_canceled() => {
                tracing::debug!(task = %name, "task canceled");
            }
            Ok((name, Err(err))) => {
                tracing::error!(task = %name, error = %err, "task failed");
                if first_error.is_none() {
                    first_error = Some(err);
                }
                scope.cancel();
            }
            Err(join_err) => {
                tracing::error!(error = %join_err, "task aborted abnormally");
                if first_error.is_none() {
                    first_error = Some(TaskError::failed(join_err));
                }
                scope.cancel();
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
