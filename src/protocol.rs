//! Wire messages exchanged between two peers.

use serde::{Deserialize, Serialize};

pub use crate::config::PROTOCOL_VERSION;

/// Largest frame accepted from the wire.
pub const MAX_FRAME_SIZE: u32 = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// Hello from the joining peer.
    Handshake { version: u8, name: String },
    /// Host's reply, completes pairing.
    HandshakeAck { version: u8 },
    GameData(GameData),
    /// Liveness probe, never surfaced to the game.
    Heartbeat { version: u8 },
}

/// In-game payloads. Only valid once the handshake has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameData {
    /// Length of the sender's secret word.
    SetSecretLength { length: u8 },
    /// The host's own rack.
    SetTiles { tiles: Vec<char> },
    /// The receiving guest's rack, dealt by the host.
    AssignTiles { tiles: Vec<char> },
    Guess { word: String },
    GuessScored {
        word: String,
        clue_count: u8,
        correct: bool,
    },
    BuyClue { clue_id: String },
    ClueResolved { clue_id: String, result: String },
    /// Sender's own secret, sent once the game is over.
    Reveal { word: String },
}

/// Serialize `msg` into a length-prefixed frame.
pub fn encode_frame(msg: &Message) -> anyhow::Result<Vec<u8>> {
    let data =
        bincode::serialize(msg).map_err(|e| anyhow::anyhow!("Serialization error: {}", e))?;
    if data.len() as u64 > MAX_FRAME_SIZE as u64 {
        return Err(anyhow::anyhow!(
            "Message too large: {} bytes (max: {})",
            data.len(),
            MAX_FRAME_SIZE
        ));
    }
    let mut frame = (data.len() as u32).to_be_bytes().to_vec();
    frame.extend_from_slice(&data);
    Ok(frame)
}

/// Pop one complete frame off the front of `buf`, if there is one.
pub fn decode_frame(buf: &mut Vec<u8>) -> anyhow::Result<Option<Message>> {
    if buf.len() < 4 {
        return Ok(None);
    }
    let len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
    if len == 0 {
        return Err(anyhow::anyhow!("Invalid message length: 0"));
    }
    if len > MAX_FRAME_SIZE {
        return Err(anyhow::anyhow!(
            "Message too large: {} bytes (max: {})",
            len,
            MAX_FRAME_SIZE
        ));
    }
    let end = 4 + len as usize;
    if buf.len() < end {
        return Ok(None);
    }
    let msg = bincode::deserialize(&buf[4..end])
        .map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))?;
    buf.drain(..end);
    Ok(Some(msg))
}
