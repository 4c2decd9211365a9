#![allow(dead_code)]

use axum::extract::ConnectInfo;
use axum_test::TestServer;
use category_shortener::application::services::{AuthService, ShortenerService};
use category_shortener::domain::entities::NewEntry;
use category_shortener::domain::repositories::EntryRepository;
use category_shortener::infrastructure::persistence::MemoryEntryRepository;
use category_shortener::routes;
use category_shortener::state::AppState;
use category_shortener::utils::code_generator::CodeGenerator;
use chrono::{DateTime, Utc};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

pub const TEST_API_KEY: &str = "test-api-key";

/// Inserts the peer address the rate limiter keys on.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Options for a memory-backed test state.
pub struct TestOptions {
    pub alphabet: Vec<char>,
    pub length: usize,
    pub enforce_expiry: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            alphabet: "abcdefghijklmnopqrstuvwxyz0123456789".chars().collect(),
            length: 6,
            enforce_expiry: false,
        }
    }
}

pub fn create_test_state_with(options: TestOptions) -> (AppState, Arc<MemoryEntryRepository>) {
    let repo = Arc::new(MemoryEntryRepository::new());
    let generator = CodeGenerator::new(&options.alphabet, options.length).unwrap();

    let store: Arc<dyn EntryRepository> = repo.clone();
    let shortener = ShortenerService::new(store, generator)
        .with_expiry_enforced(options.enforce_expiry);

    let state = AppState::new(Arc::new(shortener), Arc::new(AuthService::new(TEST_API_KEY)));

    (state, repo)
}

pub fn create_test_state() -> (AppState, Arc<MemoryEntryRepository>) {
    create_test_state_with(TestOptions::default())
}

/// Full application router behind a fake peer address.
pub fn create_test_server(state: AppState) -> TestServer {
    let app = routes::router(state).layer(MockConnectInfoLayer);
    TestServer::new(app).unwrap()
}

pub fn bearer() -> String {
    format!("Bearer {TEST_API_KEY}")
}

pub async fn create_test_entry(
    repo: &MemoryEntryRepository,
    url_type: &str,
    code: &str,
    url: &str,
    expiry_date: Option<DateTime<Utc>>,
) {
    let inserted = repo
        .insert_if_absent(&NewEntry {
            short_code: code.to_string(),
            url_type: url_type.to_string(),
            url: url.to_string(),
            name: None,
            expiry_date,
        })
        .await
        .unwrap();
    assert!(inserted);
}
