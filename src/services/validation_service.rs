use crate::models::Connection;
use crate::services::config_service::AppSettings;
use crate::utils::error::{HsshError, Result};

/// A single check a parsed connection must pass before it is kept
pub trait ValidationRule: Send + Sync {
    /// Short identifier used in log output
    fn name(&self) -> &'static str;

    fn check(&self, connection: &Connection) -> Result<()>;
}

/// Rejects aliases that would be unsafe to merge into `~/.ssh/config`
#[derive(Debug, Clone, Default)]
pub struct AllowedRule {
    denied: Vec<String>,
}

impl AllowedRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deny list taken from `denied_hosts`
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new().with_denied(settings.denied_hosts.iter().cloned())
    }

    pub fn with_denied<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.denied
            .extend(names.into_iter().map(|n| n.into().to_lowercase()));
        self
    }
}

impl ValidationRule for AllowedRule {
    fn name(&self) -> &'static str {
        "allowed"
    }

    fn check(&self, connection: &Connection) -> Result<()> {
        let name = connection.name.as_str();

        if name.is_empty() {
            return Err(HsshError::invalid_connection(name, "empty Host name"));
        }

        // Patterns belong to the user's own config, not to synced hosts
        if name.contains(['*', '?', '!']) {
            return Err(HsshError::invalid_connection(name, "Host name is a pattern"));
        }

        if name.contains(char::is_whitespace) {
            return Err(HsshError::invalid_connection(name, "Host name lists several aliases"));
        }

        let lowered = name.to_lowercase();
        if self.denied.iter().any(|d| *d == lowered) {
            return Err(HsshError::invalid_connection(name, "Host name is denied"));
        }

        Ok(())
    }
}

/// Requires the mandatory field set: name, hostname and user
#[derive(Debug, Clone, Copy, Default)]
pub struct WellConfiguredRule;

impl ValidationRule for WellConfiguredRule {
    fn name(&self) -> &'static str {
        "well-configured"
    }

    fn check(&self, connection: &Connection) -> Result<()> {
        let missing = [
            ("Host", &connection.name),
            ("HostName", &connection.hostname),
            ("User", &connection.user),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty());

        match missing {
            Some((directive, _)) => Err(HsshError::invalid_connection(
                &connection.name,
                format!("missing {}", directive),
            )),
            None => Ok(()),
        }
    }
}

/// Rejects a `Port` value that is present but not a usable port number
#[derive(Debug, Clone, Copy, Default)]
pub struct PortRule;

impl ValidationRule for PortRule {
    fn name(&self) -> &'static str {
        "port"
    }

    fn check(&self, connection: &Connection) -> Result<()> {
        let Some(port) = connection.port.as_deref() else {
            return Ok(());
        };

        match port.parse::<u16>() {
            Ok(0) | Err(_) => Err(HsshError::InvalidPort(port.to_string())),
            Ok(_) => Ok(()),
        }
    }
}

/// Ordered set of rules; the first failing rule decides the rejection
pub struct ValidationPolicy {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationPolicy {
    /// A policy with no rules accepts every connection
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        ValidationService::from_settings(settings).into_policy()
    }

    pub fn validate(&self, connection: &Connection) -> Result<()> {
        for rule in &self.rules {
            if let Err(e) = rule.check(connection) {
                tracing::debug!("Rule '{}' rejected host '{}': {}", rule.name(), connection.name, e);
                return Err(e);
            }
        }
        Ok(())
    }

    pub fn is_valid(&self, connection: &Connection) -> bool {
        self.validate(connection).is_ok()
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::empty()
            .with_rule(AllowedRule::new())
            .with_rule(WellConfiguredRule)
    }
}

impl std::fmt::Debug for ValidationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationPolicy")
            .field("rules", &self.rule_names())
            .finish()
    }
}

/// Service for validating connections read from host files.
///
/// The policy always starts with the service's own `AllowedRule`, so
/// `is_allowed` and `validate_connection` agree on the deny list.
#[derive(Debug)]
pub struct ValidationService {
    allowed: AllowedRule,
    policy: ValidationPolicy,
}

impl ValidationService {
    pub fn new() -> Self {
        Self::with_allowed(AllowedRule::new())
    }

    pub fn with_allowed(allowed: AllowedRule) -> Self {
        let policy = ValidationPolicy::empty()
            .with_rule(allowed.clone())
            .with_rule(WellConfiguredRule);
        Self { allowed, policy }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        let service = Self::with_allowed(AllowedRule::from_settings(settings));

        if settings.strict_ports {
            service.with_rule(PortRule)
        } else {
            service
        }
    }

    /// Append a rule after the built-in ones
    pub fn with_rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.policy = self.policy.with_rule(rule);
        self
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    pub fn into_policy(self) -> ValidationPolicy {
        self.policy
    }

    /// `IsAllowed`: the alias is not a pattern and not denied
    pub fn is_allowed(&self, connection: &Connection) -> bool {
        self.allowed.check(connection).is_ok()
    }

    /// `IsWellConfigured`: every mandatory field is present
    pub fn is_well_configured(&self, connection: &Connection) -> bool {
        WellConfiguredRule.check(connection).is_ok()
    }

    /// Run the full policy
    pub fn validate_connection(&self, connection: &Connection) -> Result<()> {
        self.policy.validate(connection)
    }
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::new()
    }
}
