//! End-to-end mirror tests against a mock browse endpoint.
//!
//! These tests verify the full fetch→filter→skip-or-download cycle with a
//! mock HTTP server standing in for the FlexGate listing interface.

use std::path::Path;

use flexmirror_core::{MirrorEngine, MirrorError, Settings, Source};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Renders a minimal directory-listing page for the given hrefs.
fn listing_page(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<li><a href="{href}">{href}</a></li>"#))
        .collect();
    format!("<html><body><h1>Directory listing</h1><ul>{anchors}</ul></body></html>")
}

fn settings_for(server_uri: &str, root: &Path, sources: Vec<Source>) -> Settings {
    Settings {
        flexgate_browse_url: format!("{server_uri}/cgi-bin/browse.php"),
        base_download_folder: root.to_path_buf(),
        sources,
        downloadable_extensions: vec![".csv".to_string()],
    }
}

fn folder_source(serial: &str, folders: &[&str]) -> Source {
    Source {
        serial: serial.to_string(),
        logger_name: None,
        folders: folders.iter().map(ToString::to_string).collect(),
        files: vec![],
    }
}

/// Mounts the folder listing for `../data/<serial>/<folder>`.
async fn mount_folder_listing(server: &MockServer, serial: &str, folder: &str, hrefs: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/cgi-bin/browse.php"))
        .and(query_param("dir", format!("../data/{serial}/{folder}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(hrefs)))
        .mount(server)
        .await;
}

/// Mounts one downloadable file, expecting exactly `expected_calls` fetches.
async fn mount_file(server: &MockServer, file_path: &str, content: &[u8], expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(file_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_folder_mirror_downloads_only_matching_extensions() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    mount_folder_listing(
        &mock_server,
        "S1",
        "raw",
        &[
            "../data/S1/raw/data1.csv",
            "../data/S1/raw/data2.csv",
            "../data/S1/raw/notes.txt",
        ],
    )
    .await;
    mount_file(&mock_server, "/data/S1/raw/data1.csv", b"1,2\n", 1).await;
    mount_file(&mock_server, "/data/S1/raw/data2.csv", b"3,4\n", 1).await;
    mount_file(&mock_server, "/data/S1/raw/notes.txt", b"nope", 0).await;

    let settings = settings_for(
        &mock_server.uri(),
        temp_dir.path(),
        vec![folder_source("S1", &["raw"])],
    );
    let engine = MirrorEngine::new(&settings, false).unwrap();
    let stats = engine.run().await.unwrap();

    assert_eq!(stats.downloaded, 2);
    assert_eq!(stats.skipped, 0);

    let raw = temp_dir.path().join("S1/raw");
    assert_eq!(std::fs::read(raw.join("data1.csv")).unwrap(), b"1,2\n");
    assert_eq!(std::fs::read(raw.join("data2.csv")).unwrap(), b"3,4\n");
    assert!(!raw.join("notes.txt").exists());
}

#[tokio::test]
async fn test_existing_file_skipped_without_network_call() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    mount_folder_listing(
        &mock_server,
        "S1",
        "raw",
        &["../data/S1/raw/data1.csv", "../data/S1/raw/data2.csv"],
    )
    .await;
    // data1.csv is already present locally: the server must never see a
    // request for it.
    mount_file(&mock_server, "/data/S1/raw/data1.csv", b"remote", 0).await;
    mount_file(&mock_server, "/data/S1/raw/data2.csv", b"3,4\n", 1).await;

    let raw = temp_dir.path().join("S1/raw");
    std::fs::create_dir_all(&raw).unwrap();
    std::fs::write(raw.join("data1.csv"), b"local copy").unwrap();

    let settings = settings_for(
        &mock_server.uri(),
        temp_dir.path(),
        vec![folder_source("S1", &["raw"])],
    );
    let engine = MirrorEngine::new(&settings, false).unwrap();
    let stats = engine.run().await.unwrap();

    assert_eq!(stats.downloaded, 1);
    assert_eq!(stats.skipped, 1);
    // The pre-existing file is untouched.
    assert_eq!(std::fs::read(raw.join("data1.csv")).unwrap(), b"local copy");
    assert_eq!(std::fs::read(raw.join("data2.csv")).unwrap(), b"3,4\n");
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    mount_folder_listing(&mock_server, "S1", "raw", &["../data/S1/raw/data1.csv"]).await;
    // Two runs, exactly one download.
    mount_file(&mock_server, "/data/S1/raw/data1.csv", b"1,2\n", 1).await;

    let settings = settings_for(
        &mock_server.uri(),
        temp_dir.path(),
        vec![folder_source("S1", &["raw"])],
    );

    let engine = MirrorEngine::new(&settings, false).unwrap();
    let first = engine.run().await.unwrap();
    assert_eq!(first.downloaded, 1);
    assert_eq!(first.skipped, 0);

    let second = engine.run().await.unwrap();
    assert_eq!(second.downloaded, 0);
    assert_eq!(second.skipped, 1);

    let data = temp_dir.path().join("S1/raw/data1.csv");
    assert_eq!(std::fs::read(&data).unwrap(), b"1,2\n");
}

#[tokio::test]
async fn test_specific_files_only_wanted_downloaded() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    // Top-level serial listing, queried with dir=../data/S1.
    Mock::given(method("GET"))
        .and(path("/cgi-bin/browse.php"))
        .and(query_param("dir", "../data/S1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[
            "../data/S1/a.txt",
            "../data/S1/c.txt",
            "../data/S1/b.log",
        ])))
        .mount(&mock_server)
        .await;
    mount_file(&mock_server, "/data/S1/a.txt", b"A", 1).await;
    mount_file(&mock_server, "/data/S1/b.log", b"B", 1).await;
    mount_file(&mock_server, "/data/S1/c.txt", b"C", 0).await;

    let source = Source {
        serial: "S1".to_string(),
        logger_name: None,
        folders: vec![],
        files: vec!["a.txt".to_string(), "b.log".to_string()],
    };
    let settings = settings_for(&mock_server.uri(), temp_dir.path(), vec![source]);
    let engine = MirrorEngine::new(&settings, false).unwrap();
    let stats = engine.run().await.unwrap();

    assert_eq!(stats.downloaded, 2);
    // Specific files land directly under the serial's output folder.
    let root = temp_dir.path().join("S1");
    assert_eq!(std::fs::read(root.join("a.txt")).unwrap(), b"A");
    assert_eq!(std::fs::read(root.join("b.log")).unwrap(), b"B");
    assert!(!root.join("c.txt").exists());
}

#[tokio::test]
async fn test_logger_name_suffixes_output_folder() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    mount_folder_listing(&mock_server, "S1", "raw", &["../data/S1/raw/data1.csv"]).await;
    mount_file(&mock_server, "/data/S1/raw/data1.csv", b"1,2\n", 1).await;

    let source = Source {
        serial: "S1".to_string(),
        logger_name: Some("greenhouse".to_string()),
        folders: vec!["raw".to_string()],
        files: vec![],
    };
    let settings = settings_for(&mock_server.uri(), temp_dir.path(), vec![source]);
    let engine = MirrorEngine::new(&settings, false).unwrap();
    engine.run().await.unwrap();

    assert!(
        temp_dir
            .path()
            .join("S1_greenhouse/raw/data1.csv")
            .exists()
    );
}

#[tokio::test]
async fn test_default_mode_aborts_on_first_failing_source() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    // First source's listing fails; the second source must never be queried.
    Mock::given(method("GET"))
        .and(path("/cgi-bin/browse.php"))
        .and(query_param("dir", "../data/BAD/raw"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/browse.php"))
        .and(query_param("dir", "../data/GOOD/raw"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let settings = settings_for(
        &mock_server.uri(),
        temp_dir.path(),
        vec![folder_source("BAD", &["raw"]), folder_source("GOOD", &["raw"])],
    );
    let engine = MirrorEngine::new(&settings, false).unwrap();

    let result = engine.run().await;
    match result {
        Err(MirrorError::HttpStatus { status: 500, .. }) => {}
        other => panic!("Expected HttpStatus 500, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_keep_going_continues_after_source_failure() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/cgi-bin/browse.php"))
        .and(query_param("dir", "../data/BAD/raw"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_folder_listing(&mock_server, "GOOD", "raw", &["../data/GOOD/raw/data1.csv"]).await;
    mount_file(&mock_server, "/data/GOOD/raw/data1.csv", b"1,2\n", 1).await;

    let settings = settings_for(
        &mock_server.uri(),
        temp_dir.path(),
        vec![folder_source("BAD", &["raw"]), folder_source("GOOD", &["raw"])],
    );
    let engine = MirrorEngine::new(&settings, true).unwrap();
    let stats = engine.run().await.unwrap();

    assert_eq!(stats.failed_sources, 1);
    assert_eq!(stats.downloaded, 1);
    assert!(temp_dir.path().join("GOOD/raw/data1.csv").exists());
}

#[tokio::test]
async fn test_failed_file_download_aborts_run() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    mount_folder_listing(&mock_server, "S1", "raw", &["../data/S1/raw/data1.csv"]).await;
    Mock::given(method("GET"))
        .and(path("/data/S1/raw/data1.csv"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let settings = settings_for(
        &mock_server.uri(),
        temp_dir.path(),
        vec![folder_source("S1", &["raw"])],
    );
    let engine = MirrorEngine::new(&settings, false).unwrap();

    let result = engine.run().await;
    match result {
        Err(MirrorError::HttpStatus { status: 404, .. }) => {}
        other => panic!("Expected HttpStatus 404, got: {other:?}"),
    }
    assert!(!temp_dir.path().join("S1/raw/data1.csv").exists());
}

#[tokio::test]
async fn test_files_and_folders_both_mirrored_for_one_source() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/cgi-bin/browse.php"))
        .and(query_param("dir", "../data/S1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(&["../data/S1/config.txt"])),
        )
        .mount(&mock_server)
        .await;
    mount_folder_listing(&mock_server, "S1", "raw", &["../data/S1/raw/data1.csv"]).await;
    mount_file(&mock_server, "/data/S1/config.txt", b"cfg", 1).await;
    mount_file(&mock_server, "/data/S1/raw/data1.csv", b"1,2\n", 1).await;

    let source = Source {
        serial: "S1".to_string(),
        logger_name: None,
        folders: vec!["raw".to_string()],
        files: vec!["config.txt".to_string()],
    };
    let settings = settings_for(&mock_server.uri(), temp_dir.path(), vec![source]);
    let engine = MirrorEngine::new(&settings, false).unwrap();
    let stats = engine.run().await.unwrap();

    assert_eq!(stats.downloaded, 2);
    assert!(temp_dir.path().join("S1/config.txt").exists());
    assert!(temp_dir.path().join("S1/raw/data1.csv").exists());
}
