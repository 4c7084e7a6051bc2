use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use pkgstatus_server::store::memory::MemoryStore;
use pkgstatus_server::{router, AppState, PkgstatusConfig};
use tower::ServiceExt;

pub const FIXTURES: &str = r#"{
    "builds": [
        {"_id": "b-old", "type": "bulk", "setname": "", "ptname": "default",
         "jailname": "140amd64", "buildname": "2024-01-01_00h00m00s",
         "server": "alpha", "started": 1700000000, "latest": false,
         "status": "done", "jobs": [{"id": 1}], "snap": {"now": 1700003600, "elapsed": 3600}},
        {"_id": "b-new", "type": "bulk", "setname": "", "ptname": "default",
         "jailname": "140amd64", "buildname": "2024-01-02_00h00m00s",
         "server": "alpha", "started": 1700086400, "latest": true,
         "status": "parallel_build", "jobs": [{"id": 1}], "snap": {"now": 1700090000, "elapsed": 3661}},
        {"_id": "b-desktop", "type": "testport", "setname": "desktop", "ptname": "default",
         "jailname": "140amd64", "buildname": "2024-01-02_00h00m00s",
         "server": "beta", "started": 1700086400, "latest": true, "status": "done"}
    ],
    "ports": [
        {"_id": "b-new",
         "pkgnames": {"lang/python3%11": "python311-3.11.9", "devel/gmake": "gmake-4.4"},
         "built": {"devel/gmake": {"elapsed": 20}},
         "failed": {"lang/python3%11": {"phase": "build", "errortype": "compiler_error"}},
         "ignored": {"misc/orphan%1": {"reason": "not in INDEX"}}}
    ],
    "servers": [
        {"_id": "alpha", "host": "10.0.0.5", "masternames": ["140amd64-default"]}
    ]
}"#;

pub fn app(proxy_server: Option<&str>) -> Router {
    let store = MemoryStore::from_json(FIXTURES).unwrap();
    let config = PkgstatusConfig {
        proxy_server: proxy_server.map(str::to_string),
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public/static"),
        ..Default::default()
    };
    router(AppState::new(Arc::new(store), config))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
