//! Integration tests for HostFile
//!
//! These tests cover the read/parse lifecycle on real files, file creation,
//! and handing connections to a consumer over a channel.

use hssh::models::Connection;
use hssh::services::host_file::{HostFile, HostFileState};
use hssh::services::validation_service::{PortRule, ValidationPolicy};
use hssh::utils::error::HsshError;
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;
use tokio::sync::mpsc;

fn host_block(name: &str) -> String {
    format!("Host {name}\n  HostName {name}.example.com\n  User deploy\n\n")
}

fn create_host_file(dir: &TempDir, file_name: &str, hosts: &[&str]) -> HostFile {
    let content: String = hosts.iter().map(|h| host_block(h)).collect();
    let path = dir.path().join(file_name);
    fs::write(&path, content).expect("Failed to write host file");

    let mut host_file = HostFile::new(path);
    host_file.read_file().expect("Failed to read host file");
    host_file.parse();
    host_file
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_full_lifecycle() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("hosts").join("team-a");

    let host_file = HostFile::new(&path);
    host_file
        .create(host_block("web").as_bytes())
        .expect("Failed to create host file");

    let mut host_file = HostFile::new(&path);
    assert_eq!(host_file.state(), HostFileState::Unread);

    host_file.read_file().unwrap();
    assert_eq!(host_file.state(), HostFileState::Read);
    assert!(host_file.content().starts_with("Host web"));

    let connections = host_file.parse();
    assert_eq!(connections, [Connection::new("web", "web.example.com", "deploy")]);
    assert_eq!(host_file.state(), HostFileState::Parsed);
    assert_eq!(host_file.connections_count(), 1);
    assert_eq!(host_file.path(), path.as_path());
}

#[test]
fn test_missing_file_is_best_effort() {
    let temp = TempDir::new().unwrap();
    let mut host_file = HostFile::new(temp.path().join("absent"));

    let err = host_file.read_file().unwrap_err();
    assert!(matches!(err, HsshError::ReadFailed { .. }));
    assert!(err.user_message().contains("absent"));

    assert!(host_file.content().is_empty());
    assert!(host_file.parse().is_empty());
}

#[test]
fn test_custom_policy() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("hosts");
    fs::write(
        &path,
        "Host good\n  HostName g.example.com\n  User u\n  Port 22\nHost bad\n  HostName b.example.com\n  User u\n  Port ssh\n",
    )
    .unwrap();

    let mut host_file = HostFile::new(&path);
    host_file.read_file().unwrap();

    assert_eq!(host_file.parse().len(), 2);

    let strict = ValidationPolicy::default().with_rule(PortRule);
    let connections = host_file.parse_with(&strict);
    assert_eq!(connections.len(), 1);
    assert_eq!(connections[0].name, "good");
}

#[test]
fn test_create_overwrites_existing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("hosts");
    fs::write(&path, "old content").unwrap();

    HostFile::new(&path).create(b"Host new\n").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "Host new\n");
}

// =============================================================================
// Channel hand-off
// =============================================================================

#[tokio::test]
async fn test_fan_in_from_many_host_files() {
    let temp = TempDir::new().unwrap();
    let files = vec![
        create_host_file(&temp, "a", &["a1", "a2", "a3"]),
        create_host_file(&temp, "b", &["b1"]),
        create_host_file(&temp, "c", &[]),
        create_host_file(&temp, "d", &["d1", "d2"]),
    ];

    // Smaller than the total, so producers have to wait for the consumer
    let (tx, mut rx) = mpsc::channel(2);
    let handles: Vec<_> = files
        .iter()
        .filter_map(|f| f.provide_via_channel(Some(&tx)))
        .collect();
    drop(tx);

    let mut names = HashSet::new();
    while let Some(connection) = rx.recv().await {
        assert!(names.insert(connection.name));
    }

    let mut delivered = 0;
    for handle in handles {
        delivered += handle.await.unwrap();
    }

    assert_eq!(delivered, 6);
    assert_eq!(names.len(), 6);
    for name in ["a1", "a2", "a3", "b1", "d1", "d2"] {
        assert!(names.contains(name), "missing {}", name);
    }
}

#[tokio::test]
async fn test_single_file_keeps_order_on_channel() {
    let temp = TempDir::new().unwrap();
    let host_file = create_host_file(&temp, "hosts", &["one", "two", "three", "four"]);

    let (tx, mut rx) = mpsc::channel(1);
    let handle = host_file.provide_via_channel(Some(&tx)).unwrap();

    let mut names = Vec::new();
    for _ in 0..4 {
        names.push(rx.recv().await.unwrap().name);
    }

    assert_eq!(handle.await.unwrap(), 4);
    assert_eq!(names, ["one", "two", "three", "four"]);
}

#[tokio::test]
async fn test_channel_stays_open_after_provide() {
    let temp = TempDir::new().unwrap();
    let host_file = create_host_file(&temp, "hosts", &["web"]);

    let (tx, mut rx) = mpsc::channel(4);
    host_file
        .provide_via_channel(Some(&tx))
        .unwrap()
        .await
        .unwrap();

    // The caller can still use its sender
    tx.send(Connection::new("extra", "x.example.com", "me")).await.unwrap();
    assert_eq!(rx.recv().await.unwrap().name, "web");
    assert_eq!(rx.recv().await.unwrap().name, "extra");
}

#[tokio::test]
async fn test_no_channel_is_noop() {
    let temp = TempDir::new().unwrap();
    let host_file = create_host_file(&temp, "hosts", &["web"]);

    assert!(host_file.provide_via_channel(None).is_none());
}

#[tokio::test]
async fn test_send_all_awaits_each_send() {
    let temp = TempDir::new().unwrap();
    let host_file = create_host_file(&temp, "hosts", &["x", "y"]);

    let (tx, mut rx) = mpsc::channel(2);
    assert_eq!(host_file.send_all(&tx).await.unwrap(), 2);

    assert_eq!(rx.recv().await.unwrap().name, "x");
    assert_eq!(rx.recv().await.unwrap().name, "y");
}
