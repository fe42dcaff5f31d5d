//! Translation between session events and wire messages.

use crate::game::{Action, PeerEvent};
use crate::protocol::{GameData, Message, PROTOCOL_VERSION};
use crate::common::Side;
use crate::tiles::TileRack;

/// What the node must do with an inbound message, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStep {
    Reply(Message),
    Apply(Action),
}

/// Handshake state and message mapping for one connection.
#[derive(Debug, Clone)]
pub struct NetworkSync {
    name: String,
    paired: bool,
    peer_name: Option<String>,
}

impl NetworkSync {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            paired: false,
            peer_name: None,
        }
    }

    pub fn is_paired(&self) -> bool {
        self.paired
    }

    /// Name the joining peer announced, known on the host side.
    pub fn peer_name(&self) -> Option<&str> {
        self.peer_name.as_deref()
    }

    /// Forget the current pairing.
    pub fn reset(&mut self) {
        self.paired = false;
        self.peer_name = None;
    }

    /// First message sent by the joining side.
    pub fn hello(&self) -> Message {
        Message::Handshake {
            version: PROTOCOL_VERSION,
            name: self.name.clone(),
        }
    }

    /// Interpret one inbound message.
    ///
    /// Protocol version mismatches are errors; sequencing anomalies such as
    /// game data before the handshake are logged and ignored.
    pub fn on_message(&mut self, msg: Message) -> anyhow::Result<Vec<SyncStep>> {
        match msg {
            Message::Handshake { version, name } => {
                check_version("Handshake", version)?;
                if self.paired {
                    log::warn!("[NetworkSync] Duplicate handshake from {} ignored", name);
                    return Ok(Vec::new());
                }
                log::info!("[NetworkSync] {} joined, taking the host role", name);
                self.paired = true;
                self.peer_name = Some(name);
                // Ack goes out before any host traffic so the guest is paired first.
                Ok(vec![
                    SyncStep::Reply(Message::HandshakeAck {
                        version: PROTOCOL_VERSION,
                    }),
                    SyncStep::Apply(Action::SetHost(true)),
                ])
            }
            Message::HandshakeAck { version } => {
                check_version("HandshakeAck", version)?;
                if self.paired {
                    log::warn!("[NetworkSync] Duplicate handshake ack ignored");
                    return Ok(Vec::new());
                }
                log::info!("[NetworkSync] Paired with host");
                self.paired = true;
                Ok(vec![SyncStep::Apply(Action::SetHost(false))])
            }
            Message::Heartbeat { .. } => Ok(Vec::new()),
            Message::GameData(data) if !self.paired => {
                log::warn!("[NetworkSync] Game data before handshake ignored: {:?}", data);
                Ok(Vec::new())
            }
            Message::GameData(data) => Ok(vec![SyncStep::Apply(to_action(data))]),
        }
    }

    /// Wire messages announcing `event` to the peer.
    pub fn encode(&self, event: PeerEvent) -> Vec<Message> {
        let data = match event {
            PeerEvent::TilesDealt { host, guest } => {
                return vec![
                    Message::GameData(GameData::SetTiles {
                        tiles: host.letters().to_vec(),
                    }),
                    Message::GameData(GameData::AssignTiles {
                        tiles: guest.letters().to_vec(),
                    }),
                ];
            }
            PeerEvent::SecretLength(length) => GameData::SetSecretLength {
                length: length as u8,
            },
            PeerEvent::Guess(word) => GameData::Guess { word },
            PeerEvent::GuessScored {
                word,
                clue_count,
                correct,
            } => GameData::GuessScored {
                word,
                clue_count: clue_count as u8,
                correct,
            },
            PeerEvent::ClueRequested(clue_id) => GameData::BuyClue {
                clue_id: clue_id.to_string(),
            },
            PeerEvent::ClueResolved { clue_id, result } => GameData::ClueResolved {
                clue_id: clue_id.to_string(),
                result,
            },
            PeerEvent::Reveal(word) => GameData::Reveal { word },
        };
        vec![Message::GameData(data)]
    }
}

fn check_version(what: &str, version: u8) -> anyhow::Result<()> {
    if version == PROTOCOL_VERSION {
        return Ok(());
    }
    log::error!(
        "[NetworkSync] Protocol version mismatch in {}: expected {}, got {}",
        what,
        PROTOCOL_VERSION,
        version
    );
    Err(anyhow::anyhow!(
        "Protocol version mismatch in {}: expected {}, got {}",
        what,
        PROTOCOL_VERSION,
        version
    ))
}

fn to_action(data: GameData) -> Action {
    match data {
        GameData::SetSecretLength { length } => Action::SetOpponentSecretLength(length as usize),
        GameData::SetTiles { tiles } => Action::SetOpponentTiles(TileRack::from(tiles)),
        GameData::AssignTiles { tiles } => Action::AssignTiles(TileRack::from(tiles)),
        GameData::Guess { word } => Action::MakeGuess {
            word,
            player: Side::Opponent,
        },
        GameData::GuessScored {
            word,
            clue_count,
            correct,
        } => Action::GuessScored {
            word,
            clue_count: clue_count as usize,
            correct,
        },
        GameData::BuyClue { clue_id } => Action::BuyClue {
            clue_id,
            player: Side::Opponent,
        },
        GameData::ClueResolved { clue_id, result } => Action::ClueResolved { clue_id, result },
        GameData::Reveal { word } => Action::RevealOpponentSecret(word),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_acks_before_taking_role() {
        let mut sync = NetworkSync::new("host");
        let steps = sync
            .on_message(Message::Handshake {
                version: PROTOCOL_VERSION,
                name: "guest".into(),
            })
            .unwrap();
        assert_eq!(
            steps,
            vec![
                SyncStep::Reply(Message::HandshakeAck {
                    version: PROTOCOL_VERSION
                }),
                SyncStep::Apply(Action::SetHost(true)),
            ]
        );
        assert_eq!(sync.peer_name(), Some("guest"));
    }

    #[test]
    fn ack_makes_guest() {
        let mut sync = NetworkSync::new("guest");
        let steps = sync
            .on_message(Message::HandshakeAck {
                version: PROTOCOL_VERSION,
            })
            .unwrap();
        assert_eq!(steps, vec![SyncStep::Apply(Action::SetHost(false))]);
        assert!(sync.is_paired());
    }

    #[test]
    fn version_mismatch_is_an_error() {
        let mut sync = NetworkSync::new("guest");
        assert!(sync
            .on_message(Message::HandshakeAck {
                version: PROTOCOL_VERSION + 1
            })
            .is_err());
        assert!(!sync.is_paired());
    }

    #[test]
    fn game_data_before_handshake_is_ignored() {
        let mut sync = NetworkSync::new("guest");
        let steps = sync
            .on_message(Message::GameData(GameData::SetSecretLength { length: 5 }))
            .unwrap();
        assert!(steps.is_empty());
    }

    #[test]
    fn secret_length_feeds_opponent_length() {
        let mut sync = NetworkSync::new("guest");
        sync.on_message(Message::HandshakeAck {
            version: PROTOCOL_VERSION,
        })
        .unwrap();
        let steps = sync
            .on_message(Message::GameData(GameData::SetSecretLength { length: 5 }))
            .unwrap();
        assert_eq!(
            steps,
            vec![SyncStep::Apply(Action::SetOpponentSecretLength(5))]
        );
    }

    #[test]
    fn dealt_tiles_become_two_messages() {
        let sync = NetworkSync::new("host");
        let host = TileRack::from(vec!['A', 'B']);
        let guest = TileRack::from(vec!['C', 'D']);
        let msgs = sync.encode(PeerEvent::TilesDealt { host, guest });
        assert_eq!(
            msgs,
            vec![
                Message::GameData(GameData::SetTiles {
                    tiles: vec!['A', 'B']
                }),
                Message::GameData(GameData::AssignTiles {
                    tiles: vec!['C', 'D']
                }),
            ]
        );
    }
}
