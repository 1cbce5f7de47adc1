use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use sales_dashboard::{
    Server,
    database::entities::transactions,
    test_utils::{TestServerBuilder, insert_sales},
};
use serde_json::Value;
use tower::ServiceExt;

/// Router plus the server it was built from, over in-memory SQLite
pub struct TestHarness {
    #[allow(dead_code)]
    pub server: Server,
    pub app: Router,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::from_server(TestServerBuilder::new().build().await)
    }

    pub fn from_server(server: Server) -> Self {
        let app = server.create_app();
        Self { server, app }
    }

    /// Harness whose store already holds `records`, inserted in order
    #[allow(dead_code)]
    pub async fn with_records(records: Vec<transactions::ActiveModel>) -> Self {
        let harness = Self::new().await;
        insert_sales(&harness.server, records).await;
        harness
    }

    pub async fn get(&self, uri: &str) -> axum::response::Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// GET `uri` and decode the JSON body
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let response = self.get(uri).await;
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }
}
