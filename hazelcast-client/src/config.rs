//! Connection configuration types and builders.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use hazelcast_protocol::protocol::{ReaderConfig, DEFAULT_MAX_FRAME_SIZE, FRAME_HEADER_SIZE};
use hazelcast_protocol::HazelcastError;

/// Default member port.
const DEFAULT_PORT: u16 = 5701;
/// Default connection timeout.
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);
/// Default size of the inbound read buffer.
const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;

/// Configuration error returned when validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for HazelcastError {
    fn from(err: ConfigError) -> Self {
        HazelcastError::Configuration(err.message)
    }
}

/// Settings of a single member connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    address: SocketAddr,
    connection_timeout: Duration,
    read_buffer_size: usize,
    max_frame_size: usize,
    tcp_nodelay: bool,
}

impl ConnectionConfig {
    /// Creates a new builder.
    pub fn builder() -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::new()
    }

    /// Returns the member address.
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Returns the connect timeout.
    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    /// Returns the initial capacity of the inbound buffer.
    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }

    /// Returns the largest inbound frame accepted.
    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    /// Returns whether Nagle's algorithm is disabled.
    pub fn tcp_nodelay(&self) -> bool {
        self.tcp_nodelay
    }

    /// Returns the reader limits derived from this configuration.
    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig {
            max_frame_size: self.max_frame_size,
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            tcp_nodelay: true,
        }
    }
}

/// Builder for [`ConnectionConfig`].
#[derive(Debug, Clone, Default)]
pub struct ConnectionConfigBuilder {
    address: Option<SocketAddr>,
    connection_timeout: Option<Duration>,
    read_buffer_size: Option<usize>,
    max_frame_size: Option<usize>,
    tcp_nodelay: Option<bool>,
}

impl ConnectionConfigBuilder {
    /// Creates a new connection configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the member address.
    pub fn address(mut self, address: SocketAddr) -> Self {
        self.address = Some(address);
        self
    }

    /// Sets the connect timeout.
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = Some(timeout);
        self
    }

    /// Sets the initial capacity of the inbound buffer.
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = Some(size);
        self
    }

    /// Sets the largest inbound frame accepted.
    pub fn max_frame_size(mut self, size: usize) -> Self {
        self.max_frame_size = Some(size);
        self
    }

    /// Enables or disables TCP_NODELAY.
    pub fn tcp_nodelay(mut self, enabled: bool) -> Self {
        self.tcp_nodelay = Some(enabled);
        self
    }

    /// Builds the connection configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `connection_timeout` is zero
    /// - `read_buffer_size` or `max_frame_size` is smaller than a frame header
    pub fn build(self) -> Result<ConnectionConfig, ConfigError> {
        let defaults = ConnectionConfig::default();
        let connection_timeout = self.connection_timeout.unwrap_or(defaults.connection_timeout);
        let read_buffer_size = self.read_buffer_size.unwrap_or(defaults.read_buffer_size);
        let max_frame_size = self.max_frame_size.unwrap_or(defaults.max_frame_size);

        if connection_timeout.is_zero() {
            return Err(ConfigError::new("connection_timeout must be greater than zero"));
        }
        if read_buffer_size < FRAME_HEADER_SIZE {
            return Err(ConfigError::new(format!(
                "read_buffer_size must be at least {} bytes",
                FRAME_HEADER_SIZE
            )));
        }
        if max_frame_size < FRAME_HEADER_SIZE {
            return Err(ConfigError::new(format!(
                "max_frame_size must be at least {} bytes",
                FRAME_HEADER_SIZE
            )));
        }

        Ok(ConnectionConfig {
            address: self.address.unwrap_or(defaults.address),
            connection_timeout,
            read_buffer_size,
            max_frame_size,
            tcp_nodelay: self.tcp_nodelay.unwrap_or(defaults.tcp_nodelay),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_connection_config() {
        let config = ConnectionConfig::default();
        assert_eq!(config.address(), "127.0.0.1:5701".parse::<SocketAddr>().unwrap());
        assert_eq!(config.connection_timeout(), Duration::from_secs(5));
        assert_eq!(config.read_buffer_size(), 8192);
        assert_eq!(config.max_frame_size(), DEFAULT_MAX_FRAME_SIZE);
        assert!(config.tcp_nodelay());
    }

    #[test]
    fn test_builder_without_settings_matches_default() {
        assert_eq!(ConnectionConfig::builder().build().unwrap(), ConnectionConfig::default());
    }

    #[test]
    fn test_builder_overrides() {
        let address: SocketAddr = "10.0.0.1:5702".parse().unwrap();
        let config = ConnectionConfig::builder()
            .address(address)
            .connection_timeout(Duration::from_millis(250))
            .read_buffer_size(1024)
            .max_frame_size(4096)
            .tcp_nodelay(false)
            .build()
            .unwrap();

        assert_eq!(config.address(), address);
        assert_eq!(config.connection_timeout(), Duration::from_millis(250));
        assert_eq!(config.read_buffer_size(), 1024);
        assert_eq!(config.reader_config().max_frame_size, 4096);
        assert!(!config.tcp_nodelay());
    }

    #[test]
    fn test_builder_zero_timeout_fails() {
        let result = ConnectionConfig::builder()
            .connection_timeout(Duration::ZERO)
            .build();
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("connection_timeout must be greater than zero"));
    }

    #[test]
    fn test_builder_tiny_sizes_fail() {
        assert!(ConnectionConfig::builder().read_buffer_size(5).build().is_err());
        assert!(ConnectionConfig::builder().max_frame_size(0).build().is_err());
        assert!(ConnectionConfig::builder().max_frame_size(6).build().is_ok());
    }

    #[test]
    fn test_config_error_converts_to_hazelcast_error() {
        let err: HazelcastError = ConfigError::new("bad").into();
        assert!(matches!(err, HazelcastError::Configuration(msg) if msg == "bad"));
    }
}
