use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default bounded-mailbox depth for a session.
pub const DEFAULT_QUEUE_DEPTH: usize = 32;

/// Connection settings for one session.
///
/// Every option has a default, so `SessionConfig::default()` is a usable
/// starting point for a local development server:
/// ```rust
/// use pg_session::SessionConfig;
///
/// let cfg = SessionConfig::default()
///     .with_host("db.internal")
///     .with_dbname("orders");
/// assert_eq!(cfg.port, 5432);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Server address to connect to.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Authentication username.
    pub user: String,
    /// Authentication password.
    pub password: String,
    /// Target database name.
    pub dbname: String,
    /// Connect-phase timeout. Operations after connect have no
    /// caller-side timeout.
    pub connect_timeout: Duration,
    /// Capacity of the session's request queue; senders block once it
    /// fills up.
    pub queue_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            host: "localhost".to_string(),
            port: 5432,
            user: "user".to_string(),
            password: "pass".to_string(),
            dbname: "test".to_string(),
            connect_timeout: Duration::from_millis(5000),
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    #[must_use]
    pub fn with_dbname(mut self, dbname: impl Into<String>) -> Self {
        self.dbname = dbname.into();
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_queue_depth(mut self, depth: usize) -> Self {
        self.queue_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_table() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.host, "localhost");
        assert_eq!(cfg.port, 5432);
        assert_eq!(cfg.user, "user");
        assert_eq!(cfg.password, "pass");
        assert_eq!(cfg.dbname, "test");
        assert_eq!(cfg.connect_timeout, Duration::from_millis(5000));
        assert_eq!(cfg.queue_depth, DEFAULT_QUEUE_DEPTH);
    }

    #[test]
    fn builder_setters_replace_fields() {
        let cfg = SessionConfig::new()
            .with_host("10.0.0.7")
            .with_port(6432)
            .with_user("svc")
            .with_password("secret")
            .with_dbname("prod")
            .with_queue_depth(4);
        assert_eq!(cfg.host, "10.0.0.7");
        assert_eq!(cfg.port, 6432);
        assert_eq!(cfg.user, "svc");
        assert_eq!(cfg.dbname, "prod");
        assert_eq!(cfg.queue_depth, 4);
    }
}
