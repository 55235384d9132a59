use tokio_postgres::Config as PgConfig;

use crate::config::SessionConfig;
use crate::error::SessionError;

/// Translate a [`SessionConfig`] into the `tokio_postgres` connect
/// configuration, including the connect-phase timeout.
///
/// # Errors
/// Returns `SessionError::ConfigError` if a required field is empty.
pub(super) fn pg_config(config: &SessionConfig) -> Result<PgConfig, SessionError> {
    // Validate all required config fields are present
    if config.host.is_empty() {
        return Err(SessionError::ConfigError("host is required".to_string()));
    }
    if config.user.is_empty() {
        return Err(SessionError::ConfigError("user is required".to_string()));
    }
    if config.dbname.is_empty() {
        return Err(SessionError::ConfigError("dbname is required".to_string()));
    }

    let mut pg = PgConfig::new();
    pg.host(&config.host)
        .port(config.port)
        .user(&config.user)
        .password(&config.password)
        .dbname(&config.dbname)
        .connect_timeout(config.connect_timeout);
    Ok(pg)
}
