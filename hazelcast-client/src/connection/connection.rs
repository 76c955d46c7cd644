//! Single connection to a Hazelcast cluster member.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use bytes::BytesMut;
use hazelcast_protocol::protocol::{
    encode_message, ClientMessage, ClientMessageDecoder, CLIENT_BINARY_PROTOCOL,
};
use hazelcast_protocol::{HazelcastError, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::ConnectionConfig;

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generates a new unique connection ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw ID value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[derive(Debug, Default)]
struct Counters {
    bytes_read: AtomicU64,
    bytes_written: AtomicU64,
    closed: AtomicBool,
}

/// A connection to a single cluster member.
///
/// Outbound messages share one write half behind an async mutex; a message
/// is written completely before the lock is released, so frames of two
/// messages never interleave. A background task reads inbound bytes,
/// reassembles fragmented messages and hands every complete message to the
/// callback given at construction.
pub struct Connection {
    id: ConnectionId,
    address: Option<SocketAddr>,
    writer: Mutex<BoxedWriter>,
    counters: Arc<Counters>,
    correlation_ids: AtomicI64,
    reader_task: JoinHandle<Result<()>>,
    created_at: Instant,
}

impl Connection {
    /// Connects to the configured member and starts reading.
    pub async fn connect<F>(config: &ConnectionConfig, on_message: F) -> Result<Self>
    where
        F: FnMut(ClientMessage) + Send + 'static,
    {
        let address = config.address();
        let connect = TcpStream::connect(address);
        let stream = tokio::time::timeout(config.connection_timeout(), connect)
            .await
            .map_err(|_| {
                HazelcastError::Connection(format!(
                    "timed out connecting to {} after {:?}",
                    address,
                    config.connection_timeout()
                ))
            })?
            .map_err(|e| {
                HazelcastError::Connection(format!("failed to connect to {}: {}", address, e))
            })?;

        stream
            .set_nodelay(config.tcp_nodelay())
            .map_err(|e| HazelcastError::Connection(format!("failed to set TCP_NODELAY: {}", e)))?;

        let mut connection = Self::from_stream(stream, config, on_message).await?;
        connection.address = Some(address);
        tracing::debug!(id = %connection.id, address = %address, "established connection");
        Ok(connection)
    }

    /// Wraps an established stream, writes the protocol preamble and starts
    /// reading.
    pub async fn from_stream<S, F>(
        stream: S,
        config: &ConnectionConfig,
        on_message: F,
    ) -> Result<Self>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
        F: FnMut(ClientMessage) + Send + 'static,
    {
        let (read_half, mut write_half) = tokio::io::split(stream);
        write_half.write_all(CLIENT_BINARY_PROTOCOL).await?;
        write_half.flush().await?;

        let id = ConnectionId::new();
        let counters = Arc::new(Counters {
            bytes_written: AtomicU64::new(CLIENT_BINARY_PROTOCOL.len() as u64),
            ..Counters::default()
        });
        let decoder = ClientMessageDecoder::with_config(config.reader_config(), on_message);
        let reader_task = tokio::spawn(read_loop(
            id,
            read_half,
            decoder,
            config.read_buffer_size(),
            Arc::clone(&counters),
        ));

        Ok(Self {
            id,
            address: None,
            writer: Mutex::new(Box::new(write_half)),
            counters,
            correlation_ids: AtomicI64::new(1),
            reader_task,
            created_at: Instant::now(),
        })
    }

    /// Returns the connection's unique identifier.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns the remote address, for TCP connections.
    pub fn address(&self) -> Option<SocketAddr> {
        self.address
    }

    /// Returns when this connection was created.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Returns the number of bytes received.
    pub fn bytes_read(&self) -> u64 {
        self.counters.bytes_read.load(Ordering::Relaxed)
    }

    /// Returns the number of bytes sent, preamble included.
    pub fn bytes_written(&self) -> u64 {
        self.counters.bytes_written.load(Ordering::Relaxed)
    }

    /// Returns true until the connection is closed by either side or fails.
    pub fn is_alive(&self) -> bool {
        !self.counters.closed.load(Ordering::Acquire)
    }

    /// Returns a correlation id not used before on this connection.
    pub fn next_correlation_id(&self) -> i64 {
        self.correlation_ids.fetch_add(1, Ordering::Relaxed)
    }

    /// Sends a message.
    ///
    /// The whole message is written under the writer lock.
    pub async fn send(&self, message: &ClientMessage) -> Result<()> {
        if !self.is_alive() {
            return Err(HazelcastError::Connection(format!("{} is closed", self.id)));
        }

        let bytes = encode_message(message);
        let mut writer = self.writer.lock().await;
        let written = async {
            writer.write_all(&bytes).await?;
            writer.flush().await
        }
        .await;

        if let Err(e) = written {
            self.counters.closed.store(true, Ordering::Release);
            tracing::debug!(id = %self.id, error = %e, "write failed");
            return Err(HazelcastError::Connection(format!(
                "failed to write to {}: {}",
                self.id, e
            )));
        }

        self.counters
            .bytes_written
            .fetch_add(bytes.len() as u64, Ordering::Relaxed);
        tracing::trace!(
            id = %self.id,
            operation = message.operation_name(),
            bytes = bytes.len(),
            "sent message"
        );
        Ok(())
    }

    /// Closes this connection.
    pub async fn close(&self) -> Result<()> {
        if self.counters.closed.swap(true, Ordering::AcqRel) && self.reader_task.is_finished() {
            return Ok(());
        }
        self.reader_task.abort();
        let mut writer = self.writer.lock().await;
        if let Err(e) = writer.shutdown().await {
            tracing::debug!(id = %self.id, error = %e, "shutdown failed");
        }
        tracing::debug!(id = %self.id, address = ?self.address, "connection closed");
        Ok(())
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.reader_task.abort();
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("address", &self.address)
            .field("bytes_read", &self.bytes_read())
            .field("bytes_written", &self.bytes_written())
            .field("alive", &self.is_alive())
            .finish_non_exhaustive()
    }
}

async fn read_loop<S, F>(
    id: ConnectionId,
    mut reader: ReadHalf<S>,
    mut decoder: ClientMessageDecoder<F>,
    buffer_size: usize,
    counters: Arc<Counters>,
) -> Result<()>
where
    S: AsyncRead,
    F: FnMut(ClientMessage),
{
    let mut buf = BytesMut::with_capacity(buffer_size);
    let result = loop {
        if buf.capacity() - buf.len() < buffer_size / 2 {
            buf.reserve(buffer_size);
        }
        let n = match reader.read_buf(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                break Err(HazelcastError::Connection(format!(
                    "failed to read from {}: {}",
                    id, e
                )))
            }
        };
        if n == 0 {
            break if buf.is_empty() {
                Ok(())
            } else {
                Err(HazelcastError::Connection(format!("{} closed in the middle of a frame", id)))
            };
        }
        counters.bytes_read.fetch_add(n as u64, Ordering::Relaxed);

        if let Err(e) = decoder.on_read(&mut buf) {
            break Err(e);
        }
    };

    counters.closed.store(true, Ordering::Release);
    match &result {
        Ok(()) => tracing::debug!(id = %id, "connection closed by peer"),
        Err(e) => tracing::warn!(id = %id, error = %e, "closing connection after read failure"),
    }
    result
}
