use serde::{Deserialize, Serialize};

/// One SSH destination read from a `Host` block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Alias from the `Host` directive
    pub name: String,

    /// Address from the `HostName` directive
    pub hostname: String,

    /// Login from the `User` directive
    #[serde(default)]
    pub user: String,

    /// Raw `Port` value, not converted to a number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    /// Private key path from `IdentityFile`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_file: Option<String>,
}

impl Connection {
    pub fn new(name: impl Into<String>, hostname: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hostname: hostname.into(),
            user: user.into(),
            port: None,
            identity_file: None,
        }
    }

    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    pub fn with_identity_file(mut self, path: impl Into<String>) -> Self {
        self.identity_file = Some(path.into());
        self
    }

    /// Get a display string for the connection
    pub fn display_name(&self) -> String {
        let mut out = String::new();
        if !self.user.is_empty() {
            out.push_str(&self.user);
            out.push('@');
        }
        out.push_str(&self.hostname);
        if let Some(port) = &self.port {
            out.push(':');
            out.push_str(port);
        }
        out
    }

    /// Render the connection as an SSH client config block.
    ///
    /// Unset optional fields are omitted. The output ends with a newline so
    /// blocks can be concatenated directly into `~/.ssh/config`.
    pub fn to_config_block(&self) -> String {
        let mut lines = vec![
            format!("Host {}", self.name),
            format!("    HostName {}", self.hostname),
        ];
        if !self.user.is_empty() {
            lines.push(format!("    User {}", self.user));
        }
        if let Some(port) = &self.port {
            lines.push(format!("    Port {}", port));
        }
        if let Some(identity_file) = &self.identity_file {
            lines.push(format!("    IdentityFile {}", identity_file));
        }

        let mut block = lines.join("\n");
        block.push('\n');
        block
    }
}
