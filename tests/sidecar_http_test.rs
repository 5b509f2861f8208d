/*!
 * Sidecar HTTP Tests
 * End-to-end coverage of the file endpoints over a live listener
 */

use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;

use sidecar_gateway::{sidecar_app, RootCandidate, RootRegistry};

fn candidate(id: &str, path: std::path::PathBuf) -> RootCandidate {
    RootCandidate {
        id: id.to_string(),
        name: id.to_string(),
        path,
    }
}

/// Temp root with notes/a.txt containing "hello"
fn data_fixture() -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("notes")).unwrap();
    std::fs::write(temp.path().join("notes/a.txt"), b"hello").unwrap();
    temp
}

async fn spawn_sidecar(registry: RootRegistry, allow_hidden: bool) -> String {
    let app = sidecar_app(registry, allow_hidden);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_roots_endpoint_shape() {
    let temp = data_fixture();
    let registry = RootRegistry::from_candidates(&[candidate("data", temp.path().to_path_buf())]);
    let base = spawn_sidecar(registry, false).await;

    let body: Value = reqwest::get(format!("{base}/files/roots"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let roots = body["roots"].as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["id"], "data");
    assert_eq!(roots[0]["name"], "data");
    assert_eq!(roots[0]["readOnly"], true);
    assert!(roots[0]["path"].is_string());
}

#[tokio::test]
async fn test_read_small_text_file() {
    let temp = data_fixture();
    let registry = RootRegistry::from_candidates(&[candidate("data", temp.path().to_path_buf())]);
    let base = spawn_sidecar(registry, false).await;

    let response = reqwest::Client::new()
        .get(format!("{base}/files/read"))
        .query(&[("root", "data"), ("path", "notes/a.txt"), ("maxBytes", "1024")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["size"], 5);
    assert_eq!(body["binary"], false);
    assert_eq!(body["truncated"], false);
    assert_eq!(body["content"], "hello");
    assert_eq!(body["root"]["id"], "data");
    assert_eq!(body["relativePath"], "notes/a.txt");
}

#[tokio::test]
async fn test_read_escape_rejected() {
    let temp = data_fixture();
    let registry = RootRegistry::from_candidates(&[candidate("data", temp.path().to_path_buf())]);
    let base = spawn_sidecar(registry, false).await;

    let response = reqwest::Client::new()
        .get(format!("{base}/files/read"))
        .query(&[("root", "data"), ("path", "../../etc/passwd")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("escape"), "error should mention the escape: {message}");
    assert!(body.get("content").is_none());
}

#[tokio::test]
async fn test_hidden_path_denied() {
    let temp = data_fixture();
    std::fs::write(temp.path().join(".env"), b"secret").unwrap();
    let registry = RootRegistry::from_candidates(&[candidate("data", temp.path().to_path_buf())]);
    let base = spawn_sidecar(registry, false).await;

    let response = reqwest::Client::new()
        .get(format!("{base}/files/read"))
        .query(&[("root", "data"), ("path", ".env")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn test_unknown_root_and_missing_file() {
    let temp = data_fixture();
    let registry = RootRegistry::from_candidates(&[candidate("data", temp.path().to_path_buf())]);
    let base = spawn_sidecar(registry, false).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{base}/files/read"))
        .query(&[("root", "nope"), ("path", "notes/a.txt")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let response = client
        .get(format!("{base}/files/read"))
        .query(&[("root", "data"), ("path", "notes/missing.txt")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_no_roots_configured() {
    let registry = RootRegistry::from_candidates(&[]);
    let base = spawn_sidecar(registry, false).await;

    let response = reqwest::get(format!("{base}/files/list")).await.unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("No file roots"));

    // The roots listing itself still answers, with an empty set
    let body: Value = reqwest::get(format!("{base}/files/roots"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["roots"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_defaults_to_first_root() {
    let temp = data_fixture();
    std::fs::write(temp.path().join("b.txt"), b"b").unwrap();
    let registry = RootRegistry::from_candidates(&[candidate("data", temp.path().to_path_buf())]);
    let base = spawn_sidecar(registry, false).await;

    let body: Value = reqwest::get(format!("{base}/files/list"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["root"]["id"], "data");
    assert_eq!(body["currentPath"], ".");
    assert_eq!(body["parentPath"], Value::Null);

    // notes/ is a directory and sorts before the file
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries[0]["name"], "notes");
    assert_eq!(entries[0]["kind"], "directory");
    assert_eq!(entries[1]["name"], "b.txt");
    assert_eq!(entries[1]["kind"], "file");
    assert_eq!(entries[1]["relativePath"], "b.txt");
}

#[tokio::test]
async fn test_list_of_file_is_bad_request() {
    let temp = data_fixture();
    let registry = RootRegistry::from_candidates(&[candidate("data", temp.path().to_path_buf())]);
    let base = spawn_sidecar(registry, false).await;

    let response = reqwest::Client::new()
        .get(format!("{base}/files/list"))
        .query(&[("root", "data"), ("path", "notes/a.txt")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_download_streams_full_file() {
    let temp = data_fixture();
    let registry = RootRegistry::from_candidates(&[candidate("data", temp.path().to_path_buf())]);
    let base = spawn_sidecar(registry, false).await;

    let response = reqwest::Client::new()
        .get(format!("{base}/files/download"))
        .query(&[("root", "data"), ("path", "notes/a.txt")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap(),
        "attachment; filename=\"a.txt\""
    );
    assert_eq!(
        response.headers().get("content-length").unwrap().to_str().unwrap(),
        "5"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"hello");
}

#[tokio::test]
async fn test_download_ignores_preview_cap() {
    let temp = data_fixture();
    // Larger than the 2 MiB preview cap
    let body = vec![b'x'; 2_200_000];
    std::fs::write(temp.path().join("big.bin"), &body).unwrap();
    let registry = RootRegistry::from_candidates(&[candidate("data", temp.path().to_path_buf())]);
    let base = spawn_sidecar(registry, false).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{base}/files/download"))
        .query(&[("root", "data"), ("path", "big.bin")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.bytes().await.unwrap().len(), 2_200_000);

    // The preview of the same file clamps to the cap and flags truncation
    let preview: Value = client
        .get(format!("{base}/files/read"))
        .query(&[("root", "data"), ("path", "big.bin"), ("maxBytes", "100000000")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(preview["truncated"], true);
    assert_eq!(preview["size"], 2_200_000);
    assert_eq!(preview["content"].as_str().unwrap().len(), 2_097_152);
}

#[tokio::test]
async fn test_health_endpoint() {
    let temp = data_fixture();
    let registry = RootRegistry::from_candidates(&[candidate("data", temp.path().to_path_buf())]);
    let base = spawn_sidecar(registry, false).await;

    let body: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["roots"], 1);
}
