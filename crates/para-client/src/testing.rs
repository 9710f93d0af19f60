//! Test utilities for para-client
//!
//! Runs a stand-in control service on a local port and hands out a client
//! configured against it.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use url::Url;

use crate::{McpClient, McpConfig, Result, HEALTH_TIMEOUT, SET_TIMEOUT};

/// Token the test client sends
pub const TEST_TOKEN: &str = "test-token";

/// Stand-in control service; stops serving when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    /// Client configured against `addr` with [`TEST_TOKEN`]
    pub client: McpClient,
    task: JoinHandle<()>,
    stop: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Serve `router` with the production client timeouts
    ///
    /// ```ignore
    /// let router = Router::new().route("/health", get(|| async { Json(json!({"status": "ok"})) }));
    /// let mut server = TestServer::start(router).await?;
    /// assert!(server.client.check_health().await);
    /// ```
    pub async fn start(router: Router) -> Result<Self> {
        Self::start_with_timeout(router, HEALTH_TIMEOUT, SET_TIMEOUT).await
    }

    pub async fn start_with_timeout(
        router: Router,
        health_timeout: Duration,
        set_timeout: Duration,
    ) -> Result<Self> {
        // Bound before spawning, so requests queue until the task polls
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;

        let (stop, stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, router).with_graceful_shutdown(async {
                stopped.await.ok();
            });
            if let Err(e) = serve.await {
                tracing::warn!(error = %e, "Stand-in control service failed");
            }
        });

        let mut client = McpClient::with_timeouts(health_timeout, set_timeout)?;
        client.configure_with(McpConfig {
            base_url: Url::parse(&format!("http://{}", addr))?,
            token: TEST_TOKEN.to_string(),
        });

        Ok(Self {
            addr,
            client,
            task,
            stop: Some(stop),
        })
    }

    /// Stop accepting and wait for in-flight requests to finish
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            stop.send(()).ok();
        }
        (&mut self.task).await.ok();
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Event-stream reply carrying `result` as the tool's text content
pub fn tool_reply(result: &Value) -> String {
    let envelope = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": {
            "content": [ { "type": "text", "text": result.to_string() } ]
        }
    });
    format!("event: message\ndata: {}\n\n", envelope)
}
