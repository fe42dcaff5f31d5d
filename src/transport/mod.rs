//! Message transports between the two peers.
//!
//! A transport is created per session and owned by the node. Opening happens
//! on connect/accept; a `recv` error means the connection is closed.
//! Implementations must keep `recv` cancel safe: the node races it against
//! timers and user input.

use crate::protocol::Message;

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Message>;
}

pub mod heartbeat;
pub mod in_memory;
pub mod tcp;

pub use heartbeat::HeartbeatTransport;
pub use in_memory::InMemoryTransport;
pub use tcp::TcpTransport;
