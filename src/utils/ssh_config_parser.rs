use crate::models::Connection;
use crate::services::validation_service::ValidationPolicy;

/// Directives recognised inside a `Host` block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Host,
    HostName,
    User,
    Port,
    IdentityFile,
}

impl Directive {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_lowercase().as_str() {
            "host" => Some(Self::Host),
            "hostname" => Some(Self::HostName),
            "user" => Some(Self::User),
            "port" => Some(Self::Port),
            "identityfile" => Some(Self::IdentityFile),
            _ => None,
        }
    }
}

/// Parses the SSH config subset used by host files.
///
/// Only `Host`, `HostName`, `User`, `Port` and `IdentityFile` are read;
/// `Match`, `Include` and every other option are skipped. Directive names
/// match case-insensitively while values keep their source casing.
pub struct SshConfigParser;

impl SshConfigParser {
    /// Parse text and keep only the connections accepted by `policy`
    pub fn parse(content: &str, policy: &ValidationPolicy) -> Vec<Connection> {
        Self::parse_blocks(content)
            .into_iter()
            .filter(|connection| match policy.validate(connection) {
                Ok(()) => true,
                Err(e) => {
                    tracing::debug!("Skipping host block: {}", e);
                    false
                }
            })
            .collect()
    }

    /// Parse every `Host` block without validating it
    pub fn parse_blocks(content: &str) -> Vec<Connection> {
        Self::split_blocks(content)
            .iter()
            .map(|block| Self::parse_block(block.as_slice()))
            .collect()
    }

    /// Build a connection from the lines of one block.
    ///
    /// Later assignments of the same directive overwrite earlier ones.
    pub fn parse_block<S: AsRef<str>>(lines: &[S]) -> Connection {
        let mut connection = Connection::default();

        for line in lines {
            let Some((directive, value)) = Self::parse_line(line.as_ref()) else {
                continue;
            };

            match directive {
                Directive::Host => connection.name = value.to_string(),
                Directive::HostName => connection.hostname = value.to_string(),
                Directive::User => connection.user = value.to_string(),
                Directive::Port => connection.port = Some(value.to_string()),
                Directive::IdentityFile => connection.identity_file = Some(value.to_string()),
            }
        }

        connection
    }

    /// Group meaningful lines into blocks, one per `Host` line.
    ///
    /// Lines ahead of the first `Host` line have no owner and are dropped.
    fn split_blocks(content: &str) -> Vec<Vec<&str>> {
        let mut blocks: Vec<Vec<&str>> = Vec::new();

        for line in content.trim().lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Block starts are case-sensitive; `host x` inside a block is a directive
            if Self::split_keyword(line).is_some_and(|(keyword, _)| keyword == "Host") {
                blocks.push(vec![line]);
            } else if let Some(current) = blocks.last_mut() {
                current.push(line);
            }
        }

        blocks
    }

    /// Split a trimmed line into keyword and value; a bare keyword yields `None`
    fn split_keyword(line: &str) -> Option<(&str, &str)> {
        let idx = line.find(char::is_whitespace)?;
        Some((&line[..idx], line[idx..].trim()))
    }

    /// Split a line into its directive and value
    fn parse_line(line: &str) -> Option<(Directive, &str)> {
        let (keyword, value) = Self::split_keyword(line.trim())?;
        Directive::from_keyword(keyword).map(|d| (d, value))
    }
}
