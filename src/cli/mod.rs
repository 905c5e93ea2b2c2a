pub mod commands;

pub use commands::{Cli, Commands};

use hssh::models::Connection;
use hssh::services::config_service::AppSettings;
use hssh::services::host_file::HostFile;
use hssh::services::validation_service::{ValidationPolicy, ValidationService};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Read and parse one file; unreadable files are logged and yield nothing
fn load_host_file(path: &Path, policy: &ValidationPolicy) -> HostFile {
    let mut host_file = HostFile::new(path);
    if let Err(e) = host_file.read_file() {
        tracing::warn!("{}", e);
    }
    host_file.parse_with(policy);
    host_file
}

/// Every regular file in `folder`, sorted; a missing folder is logged and empty
fn host_file_paths(folder: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = match fs::read_dir(folder) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect(),
        Err(e) => {
            tracing::warn!("Cannot read host folder {:?}: {}", folder, e);
            Vec::new()
        }
    };
    paths.sort();
    paths
}

fn print_connections(connections: &[Connection], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(connections)?);
    } else if connections.is_empty() {
        println!("No connections found");
    } else {
        for conn in connections {
            println!("{} - {}", conn.name, conn.display_name());
        }
    }
    Ok(())
}

pub fn show(files: &[PathBuf], json: bool, settings: &AppSettings) -> anyhow::Result<()> {
    let service = ValidationService::from_settings(settings);
    let connections: Vec<Connection> = files
        .iter()
        .flat_map(|path| load_host_file(path, service.policy()).connections().to_vec())
        .collect();

    print_connections(&connections, json)
}

pub fn render(file: &Path, settings: &AppSettings) -> anyhow::Result<()> {
    let service = ValidationService::from_settings(settings);
    let host_file = load_host_file(file, service.policy());

    let blocks: Vec<String> = host_file
        .connections()
        .iter()
        .map(Connection::to_config_block)
        .collect();
    print!("{}", blocks.join("\n"));
    Ok(())
}

/// Fan in the connections of every file in the host folder through one
/// bounded channel. Arrival order across files is not fixed.
async fn collect_connections(settings: &AppSettings) -> anyhow::Result<Vec<Connection>> {
    let folder = settings.host_folder_path()?;
    let service = ValidationService::from_settings(settings);

    // Directory scan and file reads stay off the runtime's worker threads
    let host_files = tokio::task::spawn_blocking(move || {
        host_file_paths(&folder)
            .iter()
            .map(|path| load_host_file(path, service.policy()))
            .collect::<Vec<_>>()
    })
    .await?;

    let (tx, mut rx) = mpsc::channel(settings.channel_capacity);
    let producers: Vec<_> = host_files
        .iter()
        .filter_map(|host_file| host_file.provide_via_channel(Some(&tx)))
        .collect();
    // Only the producers' clones remain, so the receiver ends when they finish
    drop(tx);

    let mut connections = Vec::new();
    while let Some(connection) = rx.recv().await {
        connections.push(connection);
    }

    for producer in producers {
        producer.await?;
    }

    tracing::info!(
        "Collected {} connections from {} host files",
        connections.len(),
        host_files.len()
    );
    Ok(connections)
}

pub async fn list(json: bool, settings: &AppSettings) -> anyhow::Result<()> {
    let connections = collect_connections(settings).await?;
    print_connections(&connections, json)
}
