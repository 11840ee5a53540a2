//! Shared harness for router-level tests.
//!
//! Builds the full application wiring against in-memory repositories so
//! the async task lifecycle can be driven end to end without Postgres.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use tower::ServiceExt;

use shiftwise_api::{AppState, build_router};
use shiftwise_core::config::AppConfig;
use shiftwise_core::config::database::DatabaseConfig;
use shiftwise_core::config::logging::LoggingConfig;
use shiftwise_core::config::server::ServerConfig;
use shiftwise_core::config::task::TaskConfig;
use shiftwise_core::config::worker::{PoolConfig, WorkerConfig};
use shiftwise_database::repositories::memory::{MemoryStoreRepository, MemoryTaskLedger};
use shiftwise_database::{StoreRepository, TaskLedger};
use shiftwise_service::{StoreService, TaskService};
use shiftwise_worker::{TaskRunner, WorkerPool};

pub struct TestApp {
    pub router: Router,
    pub pool: Arc<WorkerPool>,
}

/// Build the router over in-memory storage and a small worker pool.
pub fn spawn_app() -> TestApp {
    let config = AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        },
        worker: WorkerConfig::default(),
        task: TaskConfig::default(),
        logging: LoggingConfig::default(),
    };

    let ledger: Arc<dyn TaskLedger> = Arc::new(MemoryTaskLedger::new());
    let store_repo: Arc<dyn StoreRepository> = Arc::new(MemoryStoreRepository::new());
    let tasks = Arc::new(TaskService::new(Arc::clone(&ledger), &config.task));
    let stores = Arc::new(StoreService::new(store_repo));

    let pool = Arc::new(WorkerPool::new(
        "test-db",
        &PoolConfig {
            core_workers: 2,
            max_workers: 3,
            queue_capacity: 16,
        },
        Duration::from_secs(5),
    ));
    let runner = Arc::new(TaskRunner::new(Arc::clone(&tasks), Arc::clone(&pool)));

    let state = AppState {
        config: Arc::new(config),
        tasks,
        stores,
        runner,
    };

    TestApp {
        router: build_router(state),
        pool,
    }
}

impl TestApp {
    /// Issue a GET and return status plus parsed JSON body.
    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        self.send(request).await
    }

    /// Issue a JSON POST, optionally with an `x-requester-id` header.
    pub async fn post_json(
        &self,
        uri: &str,
        requester: Option<&str>,
        body: &serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(id) = requester {
            builder = builder.header("x-requester-id", id);
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }
}

/// Poll the status endpoint until the task leaves IN_PROGRESS.
///
/// Returns the `data` object of the final status response.
pub async fn poll_until_terminal(app: &TestApp, task_id: &str) -> serde_json::Value {
    for _ in 0..500 {
        let (status, body) = app.get(&format!("/api/tasks/{task_id}")).await;
        assert_eq!(status, StatusCode::OK);
        if body["data"]["status"] != "IN_PROGRESS" {
            return body["data"].clone();
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("task {task_id} never reached a terminal status");
}
