use crate::models::Connection;
use crate::services::validation_service::ValidationPolicy;
use crate::utils::error::{HsshError, Result};
use crate::utils::ssh_config_parser::SshConfigParser;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Where a host file is in its read/parse lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostFileState {
    Unread,
    Read,
    Parsed,
}

/// One SSH config fragment on disk and the connections found in it.
///
/// A host file is read once; to pick up changes on disk, build a new one.
#[derive(Debug)]
pub struct HostFile {
    path: PathBuf,
    content: String,
    connections: Vec<Connection>,
    state: HostFileState,
}

impl HostFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            content: String::new(),
            connections: Vec::new(),
            state: HostFileState::Unread,
        }
    }

    /// Load the file content.
    ///
    /// On failure the content stays empty and the file stays `Unread`, so a
    /// caller that ignores the error still gets an empty parse.
    pub fn read_file(&mut self) -> Result<()> {
        if self.state != HostFileState::Unread {
            return Err(HsshError::InvalidState(format!(
                "{} has already been read",
                self.path.display()
            )));
        }

        let bytes = fs::read(&self.path).map_err(|source| HsshError::ReadFailed {
            path: self.path.clone(),
            source,
        })?;

        // Invalid UTF-8 is replaced, not rejected
        tracing::debug!("Read {} bytes from {:?}", bytes.len(), self.path);
        self.content = String::from_utf8_lossy(&bytes).into_owned();
        self.state = HostFileState::Read;
        Ok(())
    }

    /// Parse the content with the default validation policy
    pub fn parse(&mut self) -> &[Connection] {
        self.parse_with(&ValidationPolicy::default())
    }

    /// Parse the content, keeping the connections accepted by `policy`.
    ///
    /// Each call replaces the previous result.
    pub fn parse_with(&mut self, policy: &ValidationPolicy) -> &[Connection] {
        self.connections = SshConfigParser::parse(&self.content, policy);

        if self.state == HostFileState::Read {
            self.state = HostFileState::Parsed;
        }

        tracing::info!("Found {} connections in {:?}", self.connections.len(), self.path);
        &self.connections
    }

    /// Write `content` to the path, creating parent directories first
    pub fn create(&self, content: &[u8]) -> Result<()> {
        let create_failed = |source| HsshError::CreateFailed {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(create_failed)?;
        }

        let mut file = File::create(&self.path).map_err(create_failed)?;
        file.write_all(content).map_err(create_failed)?;
        file.sync_all().map_err(create_failed)?;

        tracing::info!("Created host file {:?}", self.path);
        Ok(())
    }

    /// Hand the connections to `channel` from a single background task.
    ///
    /// Sends go out in source order and wait on the channel's capacity. The
    /// returned handle resolves to the number of connections delivered; it
    /// can be awaited or dropped. The caller keeps ownership of the channel.
    /// Must be called from within a Tokio runtime.
    pub fn provide_via_channel(
        &self,
        channel: Option<&mpsc::Sender<Connection>>,
    ) -> Option<JoinHandle<usize>> {
        let tx = channel?.clone();
        let connections = self.connections.clone();
        let path = self.path.clone();

        Some(tokio::spawn(async move {
            let total = connections.len();
            let mut sent = 0;

            for connection in connections {
                if tx.send(connection).await.is_err() {
                    tracing::warn!(
                        "Receiver dropped after {}/{} connections from {:?}",
                        sent,
                        total,
                        path
                    );
                    break;
                }
                sent += 1;
            }

            sent
        }))
    }

    /// Send every connection to `channel`, waiting for each send
    pub async fn send_all(&self, channel: &mpsc::Sender<Connection>) -> Result<usize> {
        for connection in &self.connections {
            channel
                .send(connection.clone())
                .await
                .map_err(|_| HsshError::ChannelClosed)?;
        }
        Ok(self.connections.len())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connections_count(&self) -> usize {
        self.connections.len()
    }

    pub fn state(&self) -> HostFileState {
        self.state
    }
}
