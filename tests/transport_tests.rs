use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::time::Duration;
use wordberry::protocol::{encode_frame, GameData, Message, PROTOCOL_VERSION};
use wordberry::transport::{HeartbeatTransport, InMemoryTransport, TcpTransport, Transport};

fn guess(word: &str) -> Message {
    Message::GameData(GameData::Guess { word: word.into() })
}

#[tokio::test]
async fn in_memory_delivers_in_order() -> anyhow::Result<()> {
    let (mut a, mut b) = InMemoryTransport::pair();
    a.send(guess("APPLE")).await?;
    a.send(guess("PEACH")).await?;
    assert_eq!(b.recv().await?, guess("APPLE"));
    assert_eq!(b.recv().await?, guess("PEACH"));

    b.send(Message::HandshakeAck {
        version: PROTOCOL_VERSION,
    })
    .await?;
    assert!(matches!(a.recv().await?, Message::HandshakeAck { .. }));
    Ok(())
}

#[tokio::test]
async fn in_memory_reports_closed_peer() {
    let (mut a, b) = InMemoryTransport::pair();
    drop(b);
    assert!(a.recv().await.is_err());
    assert!(a.send(guess("APPLE")).await.is_err());
}

#[tokio::test]
async fn in_memory_shutdown_drains_then_closes() -> anyhow::Result<()> {
    let (mut a, mut b) = InMemoryTransport::pair();
    a.send(guess("APPLE")).await?;
    a.shutdown();
    assert!(a.send(guess("PEACH")).await.is_err());
    assert_eq!(b.recv().await?, guess("APPLE"));
    assert!(b.recv().await.is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn tcp_roundtrip() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await?;
        let mut transport = TcpTransport::new(stream);
        let msg = transport.recv().await?;
        transport.send(msg).await?;
        Ok::<_, anyhow::Error>(())
    });

    let mut client = TcpTransport::connect(addr).await?;
    let hello = Message::Handshake {
        version: PROTOCOL_VERSION,
        name: "guest".into(),
    };
    client.send(hello.clone()).await?;
    assert_eq!(client.recv().await?, hello);
    server.await??;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn tcp_rejects_oversized_length_prefix() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await?;
        socket.write_all(&[0xFF, 0xFF, 0xFF, 0xFF]).await?;
        socket.flush().await?;
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok::<_, anyhow::Error>(())
    });

    let mut transport = TcpTransport::connect(addr).await?;
    let err = transport.recv().await.unwrap_err().to_string();
    assert!(err.contains("too large"), "{}", err);
    server.await??;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn tcp_rejects_zero_length_frame() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await?;
        socket.write_all(&[0, 0, 0, 0]).await?;
        socket.flush().await?;
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok::<_, anyhow::Error>(())
    });

    let mut transport = TcpTransport::connect(addr).await?;
    let err = transport.recv().await.unwrap_err().to_string();
    assert!(err.contains("length: 0"), "{}", err);
    server.await??;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn tcp_rejects_garbage_payload() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await?;
        socket.write_all(&[0, 0, 0, 4, 0xFF, 0xFF, 0xFF, 0xFF]).await?;
        socket.flush().await?;
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok::<_, anyhow::Error>(())
    });

    let mut transport = TcpTransport::connect(addr).await?;
    assert!(transport.recv().await.is_err());
    server.await??;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn tcp_reports_peer_close() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await?;
        drop(socket);
        Ok::<_, anyhow::Error>(())
    });

    let mut transport = TcpTransport::connect(addr).await?;
    server.await??;
    let err = transport.recv().await.unwrap_err().to_string();
    assert!(err.contains("closed") || err.contains("reset"), "{}", err);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn tcp_recv_survives_cancellation_mid_frame() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let frame = encode_frame(&guess("BANANA"))?;
    let (head, tail) = frame.split_at(3);
    let (head, tail) = (head.to_vec(), tail.to_vec());

    let (go_tx, go_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await?;
        socket.write_all(&head).await?;
        socket.flush().await?;
        let _ = go_rx.await;
        socket.write_all(&tail).await?;
        socket.flush().await?;
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok::<_, anyhow::Error>(())
    });

    let mut transport = TcpTransport::connect(addr).await?;
    let first = tokio::time::timeout(Duration::from_millis(100), transport.recv()).await;
    assert!(first.is_err(), "frame should be incomplete");
    let _ = go_tx.send(());
    assert_eq!(transport.recv().await?, guess("BANANA"));
    server.await??;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn heartbeats_are_sent_and_swallowed() -> anyhow::Result<()> {
    let (a, mut raw) = InMemoryTransport::pair();
    let mut wrapped =
        HeartbeatTransport::new(a, Duration::from_millis(100), Duration::from_secs(10));

    let reader = tokio::spawn(async move {
        let msg = wrapped.recv().await;
        (wrapped, msg)
    });

    // The wrapper pings while it waits.
    assert!(matches!(raw.recv().await?, Message::Heartbeat { .. }));

    raw.send(Message::Heartbeat {
        version: PROTOCOL_VERSION,
    })
    .await?;
    raw.send(guess("APPLE")).await?;

    let (_wrapped, msg) = reader.await?;
    assert_eq!(msg?, guess("APPLE"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn silent_peer_hits_idle_timeout() {
    let (a, _raw) = InMemoryTransport::pair();
    let mut wrapped =
        HeartbeatTransport::new(a, Duration::from_millis(100), Duration::from_millis(500));
    let err = wrapped.recv().await.unwrap_err().to_string();
    assert!(err.contains("idle timeout"), "{}", err);
}

#[tokio::test(start_paused = true)]
async fn heartbeats_keep_flowing_across_cancelled_recv() -> anyhow::Result<()> {
    let (a, mut raw) = InMemoryTransport::pair();
    let mut wrapped =
        HeartbeatTransport::new(a, Duration::from_millis(100), Duration::from_secs(10));

    // A front end that keeps abandoning recv, well inside the interval.
    for _ in 0..10 {
        let _ = tokio::time::timeout(Duration::from_millis(60), wrapped.recv()).await;
    }

    let mut beats = 0;
    while let Ok(Ok(msg)) = tokio::time::timeout(Duration::from_millis(1), raw.recv()).await {
        assert!(matches!(msg, Message::Heartbeat { .. }));
        beats += 1;
    }
    assert!(beats >= 4, "only {} heartbeats in 600ms", beats);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn outgoing_traffic_postpones_heartbeats() -> anyhow::Result<()> {
    let (a, mut raw) = InMemoryTransport::pair();
    let mut wrapped =
        HeartbeatTransport::new(a, Duration::from_millis(100), Duration::from_secs(10));

    tokio::time::sleep(Duration::from_millis(90)).await;
    wrapped.send(guess("APPLE")).await?;
    let _ = tokio::time::timeout(Duration::from_millis(60), wrapped.recv()).await;

    assert_eq!(raw.recv().await?, guess("APPLE"));
    let next = tokio::time::timeout(Duration::from_millis(1), raw.recv()).await;
    assert!(next.is_err(), "heartbeat sent too early: {:?}", next);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn heartbeat_version_mismatch_fails() -> anyhow::Result<()> {
    let (a, mut raw) = InMemoryTransport::pair();
    let mut wrapped = HeartbeatTransport::with_defaults(a);
    raw.send(Message::Heartbeat {
        version: PROTOCOL_VERSION + 1,
    })
    .await?;
    assert!(wrapped.recv().await.is_err());
    Ok(())
}

#[tokio::test]
async fn disabled_wrapper_passes_heartbeats_through() -> anyhow::Result<()> {
    let (a, mut raw) = InMemoryTransport::pair();
    let mut wrapped = HeartbeatTransport::disabled(a);
    raw.send(Message::Heartbeat {
        version: PROTOCOL_VERSION,
    })
    .await?;
    assert!(matches!(wrapped.recv().await?, Message::Heartbeat { .. }));
    Ok(())
}
