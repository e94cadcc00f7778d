//! End-to-end tests for the admin/debug server and supervision.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use chat_service::admin::{AdminError, DebugServer, DebugServerOptions};
use chat_service::buildinfo::BuildInfo;
use chat_service::lifecycle::{supervisor, SupervisedTask, TaskError};
use chat_service::observability::{LogLevel, RuntimeLogLevel};

type ServerHandle = tokio::task::JoinHandle<Result<(), AdminError>>;

/// Start a debug server on `addr` and give it time to bind.
async fn start_server(
    addr: &str,
    initial: LogLevel,
) -> (RuntimeLogLevel, CancellationToken, ServerHandle) {
    let level = RuntimeLogLevel::new(initial);
    let server = DebugServer::new(DebugServerOptions {
        addr: addr.to_string(),
        level: level.clone(),
        build: BuildInfo::collect(),
    })
    .expect("valid server options");

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(server.run(cancel.clone()));
    tokio::time::sleep(Duration::from_millis(200)).await;
    (level, cancel, handle)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn log_level_end_to_end() {
    // Unique port per test to avoid cross-test interference
    let addr = "127.0.0.1:28281";
    let (_level, cancel, _handle) = start_server(addr, LogLevel::Info).await;
    let client = client();
    let url = format!("http://{addr}/log/level");

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "INFO");

    let res = client
        .put(&url)
        .form(&[("level", "ERROR")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "ERROR");

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "ERROR");

    let res = client
        .put(&url)
        .form(&[("level", "verbose")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), "");

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "ERROR");

    cancel.cancel();
}

#[tokio::test]
async fn set_is_case_insensitive_and_visible_to_the_cell() {
    let addr = "127.0.0.1:28282";
    let (level, cancel, _handle) = start_server(addr, LogLevel::Info).await;
    let client = client();

    let res = client
        .put(format!("http://{addr}/log/level"))
        .form(&[("level", "warn")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "WARN");
    assert_eq!(level.get(), LogLevel::Warn);

    cancel.cancel();
}

#[tokio::test]
async fn version_reports_build_metadata() {
    let addr = "127.0.0.1:28283";
    let (_level, cancel, _handle) = start_server(addr, LogLevel::Info).await;

    let res = client()
        .get(format!("http://{addr}/version"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let body: serde_json::Value = res.json().await.unwrap();
    let expected = BuildInfo::collect();
    assert_eq!(body["name"], expected.name);
    assert_eq!(body["version"], expected.version);
    assert_eq!(body["commit"], expected.commit);
    assert_eq!(body["os"], expected.os);
    assert_eq!(body["arch"], expected.arch);

    cancel.cancel();
}

#[tokio::test]
async fn index_lists_registered_paths() {
    let addr = "127.0.0.1:28284";
    let (_level, cancel, _handle) = start_server(addr, LogLevel::Info).await;
    let client = client();

    let res = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let page = res.text().await.unwrap();
    assert!(page.contains("/version"));
    assert!(page.contains("/debug/pprof/"));
    assert!(page.contains("log-level-select"));

    let res = client
        .get(format!("http://{addr}/debug/pprof/tasks"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let snapshot: serde_json::Value = res.json().await.unwrap();
    assert!(snapshot["workers"].as_u64().unwrap() >= 1);

    cancel.cancel();
}

#[tokio::test]
async fn cancellation_shuts_down_within_budget() {
    let addr = "127.0.0.1:28285";
    let (_level, cancel, handle) = start_server(addr, LogLevel::Info).await;
    let client = client();

    let res = client
        .get(format!("http://{addr}/log/level"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    cancel.cancel();
    // 3s drain budget plus an epsilon
    let result = tokio::time::timeout(Duration::from_secs(4), handle)
        .await
        .expect("server must stop within the shutdown budget")
        .unwrap();
    assert!(result.is_ok());

    let refused = client.get(format!("http://{addr}/log/level")).send().await;
    assert!(refused.is_err());
}

#[tokio::test]
async fn stuck_requests_force_close_after_the_drain_budget() {
    let addr = "127.0.0.1:28288";
    let (_level, cancel, handle) = start_server(addr, LogLevel::Info).await;

    // Park a request in-flight well past the 3s drain budget.
    let url = format!("http://{addr}/debug/pprof/profile?seconds=10");
    let parked = tokio::spawn(async move { client().get(url).send().await });
    tokio::time::sleep(Duration::from_millis(300)).await;

    let started = std::time::Instant::now();
    cancel.cancel();
    let result = tokio::time::timeout(Duration::from_secs(4), handle)
        .await
        .expect("server must give up once the drain budget elapses")
        .unwrap();
    assert!(matches!(result, Err(AdminError::ShutdownTimeout { .. })));
    assert!(started.elapsed() >= Duration::from_millis(2_500));

    parked.abort();
}

#[tokio::test]
async fn slow_header_clients_are_disconnected() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let addr = "127.0.0.1:28289";
    let (_level, cancel, _handle) = start_server(addr, LogLevel::Info).await;

    // Send a partial request line, then stall without finishing the headers.
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"GET /log/level HTT").await.unwrap();

    let started = std::time::Instant::now();
    let closed = tokio::time::timeout(Duration::from_secs(3), async {
        let mut buf = [0u8; 256];
        loop {
            // A timeout response before the close is fine; EOF is the point.
            match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => continue,
            }
        }
    })
    .await;
    assert!(
        closed.is_ok(),
        "server must drop the connection after the header-read timeout"
    );
    assert!(started.elapsed() >= Duration::from_millis(900));

    cancel.cancel();
}

#[tokio::test]
async fn bind_conflict_is_a_listen_error() {
    let addr = "127.0.0.1:28286";
    let (_level, cancel, _handle) = start_server(addr, LogLevel::Info).await;

    let second = DebugServer::new(DebugServerOptions {
        addr: addr.to_string(),
        level: RuntimeLogLevel::new(LogLevel::Info),
        build: BuildInfo::collect(),
    })
    .unwrap();

    let err = second.run(CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, AdminError::Listen { .. }));

    cancel.cancel();
}

#[tokio::test]
async fn supervisor_stops_the_server_when_a_sibling_fails() {
    let addr = "127.0.0.1:28287";
    let level = RuntimeLogLevel::new(LogLevel::Info);
    let server = DebugServer::new(DebugServerOptions {
        addr: addr.to_string(),
        level,
        build: BuildInfo::collect(),
    })
    .unwrap();

    let shutdown = CancellationToken::new();
    let tasks = vec![
        SupervisedTask::new("server-debug", move |cancel| async move {
            server.run(cancel).await.map_err(TaskError::failed)
        }),
        SupervisedTask::new("flaky", |_cancel| async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Err(TaskError::failed(std::io::Error::other("flaky died")))
        }),
    ];

    let result = tokio::time::timeout(Duration::from_secs(5), supervisor::run(shutdown, tasks))
        .await
        .expect("supervisor must wind down after the failure");
    let err = result.unwrap_err();
    assert!(err.to_string().contains("flaky died"));

    let refused = client().get(format!("http://{addr}/log/level")).send().await;
    assert!(refused.is_err());
}
