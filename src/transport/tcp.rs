use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::protocol::{decode_frame, encode_frame, Message};
use crate::transport::Transport;

/// Default timeout for a single frame write.
const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Length-prefixed bincode frames over TCP.
///
/// Reads go through an internal buffer so that `recv` can be dropped
/// mid-frame without losing bytes.
pub struct TcpTransport {
    stream: TcpStream,
    send_timeout: Duration,
    recv_buf: Vec<u8>,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self::with_timeout(stream, DEFAULT_SEND_TIMEOUT)
    }

    pub fn with_timeout(stream: TcpStream, send_timeout: Duration) -> Self {
        if let Err(e) = stream.set_nodelay(true) {
            log::debug!("[TcpTransport] Could not set TCP_NODELAY: {}", e);
        }
        Self {
            stream,
            send_timeout,
            recv_buf: Vec::with_capacity(1024),
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }
}

fn map_io_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof | std::io::ErrorKind::BrokenPipe => {
            anyhow::anyhow!("Connection closed by peer")
        }
        std::io::ErrorKind::ConnectionReset => anyhow::anyhow!("Connection reset by peer"),
        _ => anyhow::anyhow!("I/O error: {}", e),
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        let frame = encode_frame(&msg)?;
        timeout(self.send_timeout, self.stream.write_all(&frame))
            .await
            .map_err(|_| anyhow::anyhow!("Send timeout after {:?}", self.send_timeout))?
            .map_err(map_io_error)
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        loop {
            if let Some(msg) = decode_frame(&mut self.recv_buf)? {
                return Ok(msg);
            }
            let n = self
                .stream
                .read_buf(&mut self.recv_buf)
                .await
                .map_err(map_io_error)?;
            if n == 0 {
                return Err(anyhow::anyhow!("Connection closed by peer"));
            }
        }
    }
}
