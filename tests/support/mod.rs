#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use todo_board::config::{ListCatalog, StatesConfig};
use todo_board::registry::Registry;
use todo_board::storage::Storage;
use tower::ServiceExt;

/// A data directory with two configured lists: `todos` (default) and `arbeit`
pub struct TestBoard {
    dir: TempDir,
    registry: Arc<Registry>,
}

impl TestBoard {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let catalog = ListCatalog::parse("lists:\n  todos: Privat\n  arbeit: Arbeit\n")
            .expect("catalog");
        let registry = Registry::new(
            catalog,
            Storage::new(dir.path().join("data"), "todos"),
            StatesConfig::default(),
        );
        Self {
            dir,
            registry: Arc::new(registry),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    pub fn router(&self) -> Router {
        todo_board::web::router(self.registry()).expect("router")
    }

    pub fn list_file(&self, list_id: &str) -> PathBuf {
        self.dir.path().join("data").join(format!("{list_id}.json"))
    }

    pub fn write_list_file(&self, list_id: &str, contents: &str) -> PathBuf {
        let path = self.list_file(list_id);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, contents).expect("write list file");
        path
    }

    /// Replace the data directory with a plain file so every list write fails
    pub fn block_writes(&self) {
        let data = self.dir.path().join("data");
        if data.is_dir() {
            fs::remove_dir_all(&data).expect("remove data dir");
        }
        fs::write(&data, "").expect("write blocker");
    }

    pub fn read_list_file(&self, list_id: &str) -> Value {
        let raw = fs::read_to_string(self.list_file(list_id)).expect("read list file");
        serde_json::from_str(&raw).expect("list file is JSON")
    }
}

/// A buffered response
pub struct Reply {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("response body is JSON")
    }
}

pub async fn send(router: Router, request: Request<Body>) -> Reply {
    let response = router.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    Reply {
        status,
        location,
        body: String::from_utf8(bytes.to_vec()).expect("utf-8 body"),
    }
}

pub async fn get(router: Router, uri: &str) -> Reply {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    send(router, request).await
}

pub async fn post_form(router: Router, uri: &str, form: &str) -> Reply {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("request");
    send(router, request).await
}

pub async fn send_json(router: Router, method: Method, uri: &str, body: Value) -> Reply {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    send(router, request).await
}

pub async fn delete(router: Router, uri: &str) -> Reply {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    send(router, request).await
}
