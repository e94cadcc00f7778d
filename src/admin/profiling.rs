//! Profiling endpoints under `/debug/pprof/`.
//!
//! CPU profiles come from an in-process sampling profiler and are rendered
//! as flamegraph SVGs. Heap profiling needs an instrumented allocator and is
//! not exposed. The task snapshot is the runtime's view of live async tasks,
//! the closest thing to a thread/coroutine dump the scheduler offers.

use std::time::Duration;

use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::Deserialize;

/// Sampling frequency in Hz. 99 avoids lockstep with 100Hz timers.
const SAMPLE_FREQUENCY: i32 = 99;

const MAX_PROFILE_SECONDS: u64 = 120;

pub async fn profiling_index() -> Html<&'static str> {
    Html(
        r#"<html>
<title>Profiling</title>
<body>
<h2>Profiling</h2>
<ul>
  <li><a href="/debug/pprof/profile?seconds=30">/debug/pprof/profile?seconds=30</a> CPU flamegraph</li>
  <li><a href="/debug/pprof/tasks">/debug/pprof/tasks</a> Runtime task snapshot</li>
</ul>
</body>
</html>
"#,
    )
}

#[derive(Debug, Deserialize)]
pub struct ProfileParams {
    #[serde(default = "default_seconds")]
    pub seconds: u64,
}

fn default_seconds() -> u64 {
    30
}

/// Sample the process CPU for `seconds` and respond with a flamegraph SVG.
pub async fn cpu_profile(Query(params): Query<ProfileParams>) -> Response {
    let seconds = params.seconds.clamp(1, MAX_PROFILE_SECONDS);

    let guard = match pprof::ProfilerGuardBuilder::default()
        .frequency(SAMPLE_FREQUENCY)
        .blocklist(&["libc", "libgcc", "pthread", "vdso"])
        .build()
    {
        Ok(guard) => guard,
        Err(err) => return profiler_error(err),
    };

    tokio::time::sleep(Duration::from_secs(seconds)).await;

    let report = match guard.report().build() {
        Ok(report) => report,
        Err(err) => return profiler_error(err),
    };

    let mut svg = Vec::new();
    if let Err(err) = report.flamegraph(&mut svg) {
        return profiler_error(err);
    }
    ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response()
}

fn profiler_error(err: pprof::Error) -> Response {
    tracing::error!(error = %err, "cpu profile failed");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

/// Snapshot of the async runtime: worker threads and live tasks.
pub async fn tasks_snapshot() -> Json<serde_json::Value> {
    let metrics = tokio::runtime::Handle::current().metrics();
    Json(serde_json::json!({
        "workers": metrics.num_workers(),
        "alive_tasks": metrics.num_alive_tasks(),
    }))
}
