use tokio::time::{sleep_until, Duration, Instant};

use crate::config::{HEARTBEAT_INTERVAL, IDLE_TIMEOUT};
use crate::protocol::{Message, PROTOCOL_VERSION};
use crate::transport::Transport;

/// Transport wrapper that keeps an idle connection alive and detects a dead one.
///
/// - Sends a heartbeat once nothing has gone out for `heartbeat_interval`,
///   checked while waiting in `recv`. The deadline survives a cancelled `recv`
/// - Fails `recv` once nothing has arrived for `idle_timeout`
/// - Swallows inbound heartbeats, they are never returned to the caller
///
/// A disabled wrapper delegates straight to the inner transport.
pub struct HeartbeatTransport<T: Transport> {
    inner: T,
    heartbeat_interval: Duration,
    idle_timeout: Duration,
    last_seen: Instant,
    next_heartbeat: Instant,
    enabled: bool,
}

impl<T: Transport> HeartbeatTransport<T> {
    pub fn new(inner: T, heartbeat_interval: Duration, idle_timeout: Duration) -> Self {
        Self {
            inner,
            heartbeat_interval,
            idle_timeout,
            last_seen: Instant::now(),
            next_heartbeat: Instant::now() + heartbeat_interval,
            enabled: true,
        }
    }

    /// Wrapper using the default interval and idle timeout.
    pub fn with_defaults(inner: T) -> Self {
        Self::new(inner, HEARTBEAT_INTERVAL, IDLE_TIMEOUT)
    }

    pub fn disabled(inner: T) -> Self {
        Self {
            enabled: false,
            ..Self::with_defaults(inner)
        }
    }

    fn is_idle_timeout(&self) -> bool {
        self.last_seen.elapsed() >= self.idle_timeout
    }

    fn mark_sent(&mut self) {
        self.next_heartbeat = Instant::now() + self.heartbeat_interval;
    }
}

#[async_trait::async_trait]
impl<T: Transport> Transport for HeartbeatTransport<T> {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        self.inner.send(msg).await?;
        self.mark_sent();
        Ok(())
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        if !self.enabled {
            return self.inner.recv().await;
        }

        loop {
            let wake_at = self.next_heartbeat.min(self.last_seen + self.idle_timeout);
            tokio::select! {
                msg = self.inner.recv() => {
                    let msg = msg?;
                    self.last_seen = Instant::now();
                    match msg {
                        Message::Heartbeat { version } if version != PROTOCOL_VERSION => {
                            log::error!(
                                "[HeartbeatTransport] Heartbeat version mismatch: expected {}, got {}",
                                PROTOCOL_VERSION, version
                            );
                            return Err(anyhow::anyhow!(
                                "Heartbeat version mismatch: expected {}, got {}",
                                PROTOCOL_VERSION, version
                            ));
                        }
                        Message::Heartbeat { .. } => continue,
                        other => return Ok(other),
                    }
                }
                _ = sleep_until(wake_at) => {
                    if self.is_idle_timeout() {
                        log::warn!("[HeartbeatTransport] Idle timeout exceeded ({:?})", self.idle_timeout);
                        return Err(anyhow::anyhow!(
                            "Connection idle timeout exceeded ({:?})",
                            self.idle_timeout
                        ));
                    }
                    if Instant::now() >= self.next_heartbeat {
                        self.inner
                            .send(Message::Heartbeat { version: PROTOCOL_VERSION })
                            .await?;
                        self.mark_sent();
                    }
                }
            }
        }
    }
}
