// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the full gateway stack over a temp SQLite
//! database with fast scheduler cadences and seeded tokens. Requests are
//! driven in-process through `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use trident_auth::{hash_password, Authorizer};
use trident_config::model::{StorageConfig, TridentConfig};
use trident_core::{ContentProvider, CredentialStore, JobLedger, Service, TridentError};
use trident_gateway::{build_router, GatewayState};
use trident_scheduler::JobScheduler;
use trident_storage::SqliteStorage;

use crate::fixed_content::FixedContent;

/// Token seeded by every harness unless the builder says otherwise.
pub const DEFAULT_TOKEN: &str = "tk_test_default";
/// Workspace owning [`DEFAULT_TOKEN`].
pub const DEFAULT_WORKSPACE: i64 = 1;

const MULTIPART_BOUNDARY: &str = "trident-test-boundary";
const POLL_INTERVAL: Duration = Duration::from_millis(10);

struct SeedToken {
    token: String,
    workspace_id: i64,
    service: Option<Service>,
    revoked: bool,
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: TridentConfig,
    tokens: Vec<SeedToken>,
    users: Vec<(String, String)>,
    content: Option<Arc<dyn ContentProvider>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        let mut config = TridentConfig::default();
        config.chat.steps = 4;
        config.chat.step_interval_ms = 20;
        config.image.step = 25;
        config.image.tick_interval_ms = 20;
        config.vision.analysis_delay_ms = 10;
        config.scheduler.shutdown_grace_ms = 2000;

        Self {
            config,
            tokens: vec![SeedToken {
                token: DEFAULT_TOKEN.to_string(),
                workspace_id: DEFAULT_WORKSPACE,
                service: None,
                revoked: false,
            }],
            users: Vec::new(),
            content: None,
        }
    }

    /// Chat reply cadence.
    pub fn with_chat(mut self, steps: u32, step_interval_ms: u64) -> Self {
        self.config.chat.steps = steps;
        self.config.chat.step_interval_ms = step_interval_ms;
        self
    }

    /// Image job cadence.
    pub fn with_image(mut self, step: u8, tick_interval_ms: u64) -> Self {
        self.config.image.step = step;
        self.config.image.tick_interval_ms = tick_interval_ms;
        self
    }

    pub fn with_failure_probability(mut self, probability: f64) -> Self {
        self.config.image.failure_probability = probability;
        self
    }

    pub fn with_max_in_flight(mut self, limit: usize) -> Self {
        self.config.scheduler.max_in_flight = limit;
        self
    }

    pub fn with_analysis_delay_ms(mut self, delay_ms: u64) -> Self {
        self.config.vision.analysis_delay_ms = delay_ms;
        self
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.config.vision.max_upload_bytes = limit;
        self
    }

    pub fn with_faults(mut self, enabled: bool) -> Self {
        self.config.faults.enabled = enabled;
        self
    }

    /// Seed an additional active token.
    pub fn with_token(mut self, token: &str, workspace_id: i64, service: Option<Service>) -> Self {
        self.tokens.push(SeedToken {
            token: token.to_string(),
            workspace_id,
            service,
            revoked: false,
        });
        self
    }

    /// Seed a token and revoke it before the harness is handed out.
    pub fn with_revoked_token(mut self, token: &str, workspace_id: i64) -> Self {
        self.tokens.push(SeedToken {
            token: token.to_string(),
            workspace_id,
            service: None,
            revoked: true,
        });
        self
    }

    /// Seed an operator account with a plaintext password (hashed on build).
    pub fn with_user(mut self, username: &str, password: &str) -> Self {
        self.users.push((username.to_string(), password.to_string()));
        self
    }

    /// Replace the deterministic [`FixedContent`] provider.
    pub fn with_content(mut self, content: Arc<dyn ContentProvider>) -> Self {
        self.content = Some(content);
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, TridentError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| TridentError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db").to_string_lossy().to_string();

        let mut config = self.config;
        config.storage = StorageConfig {
            database_path: db_path,
            wal_mode: true,
        };

        let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
        storage.initialize().await?;

        for (i, seed) in self.tokens.iter().enumerate() {
            storage
                .issue_token(&format!("seed-{i}"), &seed.token, seed.workspace_id, seed.service)
                .await?;
            if seed.revoked {
                storage.revoke_token(&seed.token).await?;
            }
        }
        for (username, password) in &self.users {
            storage.add_user(username, &hash_password(password)?).await?;
        }

        let content = self
            .content
            .unwrap_or_else(|| Arc::new(FixedContent::new()));
        let ledger: Arc<dyn JobLedger> = storage.clone();
        let credentials: Arc<dyn CredentialStore> = storage.clone();

        let shutdown = CancellationToken::new();
        let scheduler = JobScheduler::new(
            Arc::clone(&ledger),
            Arc::clone(&content),
            config.chat.clone(),
            config.image.clone(),
            &config.scheduler,
            shutdown.clone(),
        );
        let authorizer = Authorizer::new(credentials, config.faults.clone());
        let state = GatewayState::new(
            Arc::clone(&ledger),
            authorizer,
            scheduler.clone(),
            content,
            &config.chat,
            config.vision.clone(),
        );
        let router = build_router(state);

        Ok(TestHarness {
            storage,
            ledger,
            scheduler,
            router,
            config,
            shutdown,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete gateway over temp storage.
pub struct TestHarness {
    /// SQLite storage (temp DB, cleaned up on drop).
    pub storage: Arc<SqliteStorage>,
    /// The same storage seen through the ledger trait.
    pub ledger: Arc<dyn JobLedger>,
    pub scheduler: JobScheduler,
    pub router: Router,
    pub config: TridentConfig,
    /// Process-wide shutdown token the scheduler derives job tokens from.
    pub shutdown: CancellationToken,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Send one request through the router and decode the JSON body (`Null` if empty).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    /// POST a multipart body with a single file part named `field`.
    pub async fn post_multipart(
        &self,
        uri: &str,
        token: Option<&str>,
        field: &str,
        bytes: &[u8],
    ) -> (StatusCode, Value) {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{field}\"; filename=\"frame.png\"\r\n\
                 Content-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

        let mut builder = Request::builder().method(Method::POST).uri(uri).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = builder.body(Body::from(body)).expect("valid request");
        self.send(request).await
    }

    /// Poll `uri` until `done` accepts the body, returning every body observed.
    ///
    /// Panics if `timeout` elapses first.
    pub async fn poll_until<F>(
        &self,
        uri: &str,
        token: Option<&str>,
        timeout: Duration,
        done: F,
    ) -> Vec<Value>
    where
        F: Fn(&Value) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;
        let mut observed = Vec::new();
        loop {
            let (status, body) = self.get(uri, token).await;
            assert_eq!(status, StatusCode::OK, "poll of {uri} failed: {body}");
            let finished = done(&body);
            observed.push(body);
            if finished {
                return observed;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "timed out polling {uri}; last body: {}",
                observed.last().cloned().unwrap_or(Value::Null)
            );
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Cancel every running job and wait for the scheduler to drain.
    pub async fn shutdown(&self) -> Result<(), TridentError> {
        self.scheduler
            .shutdown(Duration::from_millis(self.config.scheduler.shutdown_grace_ms))
            .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }
}
