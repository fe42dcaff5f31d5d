use tokio::sync::mpsc;

use crate::protocol::Message;
use crate::transport::Transport;

/// Channel-backed transport pair for tests and local simulations.
pub struct InMemoryTransport {
    tx: Option<mpsc::UnboundedSender<Message>>,
    rx: mpsc::UnboundedReceiver<Message>,
}

impl InMemoryTransport {
    pub fn pair() -> (Self, Self) {
        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        (
            Self {
                tx: Some(tx2),
                rx: rx1,
            },
            Self {
                tx: Some(tx1),
                rx: rx2,
            },
        )
    }

    /// Stop sending; the peer sees the channel close once it has drained it.
    pub fn shutdown(&mut self) {
        self.tx = None;
    }
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Transport is shut down"))?;
        tx.send(msg)
            .map_err(|_| anyhow::anyhow!("Channel closed by peer"))
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("Channel closed"))
    }
}
