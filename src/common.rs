//! Common types: sides, session status and input rejections.

use crate::config::{MAX_WORD_LEN, MIN_WORD_LEN};

/// One of the two seats at the table, seen from this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Me,
    Opponent,
}

impl Side {
    /// The other seat.
    pub fn other(self) -> Side {
        match self {
            Side::Me => Side::Opponent,
            Side::Opponent => Side::Me,
        }
    }
}

/// Final result of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Me,
    Opponent,
    /// Part of the result vocabulary; no rule currently produces it.
    Draw,
}

impl From<Side> for Winner {
    fn from(side: Side) -> Self {
        match side {
            Side::Me => Winner::Me,
            Side::Opponent => Winner::Opponent,
        }
    }
}

/// Lifecycle of a session. `GameOver` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Lobby,
    Setup,
    Playing,
    GameOver,
}

/// Reasons an action is refused. A rejected action never changes the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("Word must be at least {} letters", MIN_WORD_LEN)]
    TooShort,
    #[error("Word must be at most {} letters", MAX_WORD_LEN)]
    TooLong,
    #[error("Word may only contain the letters A-Z")]
    InvalidCharacters,
    #[error("Not a valid word")]
    NotAWord,
    #[error("Tiles have not been dealt yet")]
    TilesNotDealt,
    #[error("Word cannot be formed from your tiles")]
    TilesInsufficient,
    #[error("Tiles have already been dealt")]
    TilesAlreadyDealt,
    #[error("Secret word is already locked in")]
    SecretAlreadySet,
    #[error("Secret length {0} is out of range")]
    InvalidSecretLength(usize),
    #[error("Not allowed while the game is in {0:?}")]
    WrongPhase(Status),
    #[error("It is not your turn")]
    NotYourTurn,
    #[error("Waiting for the opponent to answer")]
    AwaitingPeer,
    #[error("Only the host deals tiles")]
    NotHost,
    #[error("Unknown clue '{0}'")]
    UnknownClue(alloc::string::String),
    #[error("Clue already purchased")]
    ClueAlreadyOwned,
    #[error("Unexpected reply from opponent")]
    UnexpectedReply,
}
