//! Session state machine.
//!
//! Every mutation goes through [`Session::apply`]. The reducer never performs
//! side effects itself: it returns [`Effect`]s (peer messages, timers, tile
//! dealing requests, announcements) for the driver to execute. A rejected
//! action leaves the session untouched.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::berries::BerryLedger;
use crate::clue::{self, ClueCard};
use crate::common::{Rejection, Side, Status, Winner};
use crate::config::{MAX_WORD_LEN, MIN_WORD_LEN};
use crate::scoring::{can_form_word, normalize_word, score};
use crate::tiles::TileRack;

/// One line of the guess log. Never modified once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessEntry {
    pub word: String,
    pub clue_count: usize,
    pub player: Side,
    /// The guess matched the secret exactly.
    pub correct: bool,
}

/// A resolved clue purchase, attributed to the buyer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveClueRecord {
    pub clue_id: &'static str,
    pub result: String,
    pub player: Side,
}

/// Timers the driver arms on behalf of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    /// Scripted opponent picks its secret word.
    CpuSecret,
    /// Both secrets are known; start play.
    LockIn,
    /// Scripted opponent takes its turn.
    CpuTurn,
}

/// Something the remote side must learn about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEvent {
    TilesDealt { host: TileRack, guest: TileRack },
    SecretLength(usize),
    Guess(String),
    GuessScored {
        word: String,
        clue_count: usize,
        correct: bool,
    },
    ClueRequested(&'static str),
    ClueResolved {
        clue_id: &'static str,
        result: String,
    },
    Reveal(String),
}

/// Player-facing news produced by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Announcement {
    /// Exact match, but the guesser did not hold more berries.
    CorrectButShort { player: Side, word: String },
    GameOver(Winner),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Peer(PeerEvent),
    Schedule(Timer),
    Cancel(Timer),
    /// The host must generate both racks and apply [`Action::DealTiles`].
    DealTiles,
    Announce(Announcement),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    StartSinglePlayer,
    SetHost(bool),
    DealTiles { mine: TileRack, theirs: TileRack },
    /// Host's rack received from the peer.
    SetOpponentTiles(TileRack),
    /// Our own rack, dealt by the host.
    AssignTiles(TileRack),
    SetSecretWord(String),
    SetOpponentSecretLength(usize),
    /// Scripted opponent's secret; held but never exposed before game over.
    SetCpuSecret(String),
    BeginPlay,
    MakeGuess { word: String, player: Side },
    /// Peer's scoring of our pending guess.
    GuessScored {
        word: String,
        clue_count: usize,
        correct: bool,
    },
    BuyClue { clue_id: String, player: Side },
    /// Peer's answer to our pending clue purchase.
    ClueResolved { clue_id: String, result: String },
    RevealOpponentSecret(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    Guess(String),
    Clue(&'static ClueCard),
}

#[derive(Debug, Clone, Default)]
struct MySide {
    secret: Option<String>,
    tiles: Option<TileRack>,
}

#[derive(Clone, Default)]
struct OpponentSide {
    secret_len: Option<usize>,
    /// Known only against the scripted opponent or after reveal.
    secret: Option<String>,
    tiles: Option<TileRack>,
}

impl fmt::Debug for OpponentSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpponentSide")
            .field("secret_len", &self.secret_len)
            .field("secret", &self.secret.as_ref().map(|_| "<hidden>"))
            .field("tiles", &self.tiles)
            .finish()
    }
}

/// What a side can see when choosing a guess.
#[derive(Debug, Clone, Copy)]
pub struct VisibleHistory<'a> {
    pub player: Side,
    pub guesses: &'a [GuessEntry],
    pub clues: &'a [ActiveClueRecord],
    pub target_len: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Session {
    status: Status,
    is_host: bool,
    is_vs_cpu: bool,
    turn: Side,
    winner: Option<Winner>,
    tile_constrained: bool,
    me: MySide,
    opponent: OpponentSide,
    ledger: BerryLedger,
    guesses: Vec<GuessEntry>,
    clues: Vec<ActiveClueRecord>,
    pending: Option<Pending>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Session {
    /// A fresh session in the lobby.
    pub fn new(tile_constrained: bool) -> Self {
        Self {
            status: Status::Lobby,
            is_host: false,
            is_vs_cpu: false,
            turn: Side::Me,
            winner: None,
            tile_constrained,
            me: MySide::default(),
            opponent: OpponentSide::default(),
            ledger: BerryLedger::new(),
            guesses: Vec::new(),
            clues: Vec::new(),
            pending: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_host(&self) -> bool {
        self.is_host
    }

    pub fn is_vs_cpu(&self) -> bool {
        self.is_vs_cpu
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn my_secret(&self) -> Option<&str> {
        self.me.secret.as_deref()
    }

    pub fn my_tiles(&self) -> Option<&TileRack> {
        self.me.tiles.as_ref()
    }

    pub fn opponent_tiles(&self) -> Option<&TileRack> {
        self.opponent.tiles.as_ref()
    }

    pub fn opponent_secret_len(&self) -> Option<usize> {
        self.opponent.secret_len
    }

    /// The opponent's secret, available only once the game is over.
    pub fn revealed_opponent_secret(&self) -> Option<&str> {
        match self.status {
            Status::GameOver => self.opponent.secret.as_deref(),
            _ => None,
        }
    }

    pub fn berries(&self, side: Side) -> u32 {
        self.ledger.balance(side)
    }

    pub fn guesses(&self) -> &[GuessEntry] {
        &self.guesses
    }

    pub fn clues(&self) -> &[ActiveClueRecord] {
        &self.clues
    }

    pub fn owns_clue(&self, side: Side, clue_id: &str) -> bool {
        self.clues
            .iter()
            .any(|c| c.player == side && c.clue_id == clue_id)
    }

    /// Catalog cards `side` has not bought yet.
    pub fn available_clues(&self, side: Side) -> impl Iterator<Item = &'static ClueCard> + '_ {
        clue::CATALOG
            .iter()
            .filter(move |card| !self.owns_clue(side, card.id))
    }

    /// A guess or clue purchase of ours waits for the peer's answer.
    pub fn awaiting_peer(&self) -> bool {
        self.pending.is_some()
    }

    pub fn history_for(&self, player: Side) -> VisibleHistory<'_> {
        let target_len = match player {
            Side::Me => self.opponent.secret_len,
            Side::Opponent => self.me.secret.as_ref().map(|s| s.len()),
        };
        VisibleHistory {
            player,
            guesses: &self.guesses,
            clues: &self.clues,
            target_len,
        }
    }

    /// Apply one action to completion.
    pub fn apply(&mut self, action: Action) -> Result<Vec<Effect>, Rejection> {
        match action {
            Action::StartSinglePlayer => self.start_single_player(),
            Action::SetHost(host) => self.set_host(host),
            Action::DealTiles { mine, theirs } => self.deal_tiles(mine, theirs),
            Action::SetOpponentTiles(rack) => self.set_opponent_tiles(rack),
            Action::AssignTiles(rack) => self.assign_tiles(rack),
            Action::SetSecretWord(word) => self.set_secret_word(&word),
            Action::SetOpponentSecretLength(len) => self.set_opponent_secret_length(len),
            Action::SetCpuSecret(word) => self.set_cpu_secret(&word),
            Action::BeginPlay => self.begin_play(),
            Action::MakeGuess { word, player } => self.make_guess(&word, player),
            Action::GuessScored {
                word,
                clue_count,
                correct,
            } => self.guess_scored(word, clue_count, correct),
            Action::BuyClue { clue_id, player } => self.buy_clue(&clue_id, player),
            Action::ClueResolved { clue_id, result } => self.clue_resolved(&clue_id, result),
            Action::RevealOpponentSecret(word) => self.reveal_opponent_secret(word),
        }
    }

    fn expect(&self, status: Status) -> Result<(), Rejection> {
        if self.status == status {
            Ok(())
        } else {
            Err(Rejection::WrongPhase(self.status))
        }
    }

    fn expect_turn(&self, player: Side) -> Result<(), Rejection> {
        if !self.peer_overtakes_lock_in(player) {
            self.expect(Status::Playing)?;
        }
        if self.turn != player {
            return Err(Rejection::NotYourTurn);
        }
        if self.pending.is_some() {
            return Err(Rejection::AwaitingPeer);
        }
        Ok(())
    }

    fn start_single_player(&mut self) -> Result<Vec<Effect>, Rejection> {
        self.expect(Status::Lobby)?;
        self.status = Status::Setup;
        self.is_vs_cpu = true;
        self.is_host = true;
        self.turn = Side::Me;
        Ok(vec![Effect::DealTiles, Effect::Schedule(Timer::CpuSecret)])
    }

    fn set_host(&mut self, host: bool) -> Result<Vec<Effect>, Rejection> {
        self.expect(Status::Lobby)?;
        self.status = Status::Setup;
        self.is_host = host;
        self.turn = if host { Side::Me } else { Side::Opponent };
        if host {
            Ok(vec![Effect::DealTiles])
        } else {
            Ok(Vec::new())
        }
    }

    fn deal_tiles(&mut self, mine: TileRack, theirs: TileRack) -> Result<Vec<Effect>, Rejection> {
        self.expect(Status::Setup)?;
        if !self.is_host {
            return Err(Rejection::NotHost);
        }
        if self.me.tiles.is_some() || self.opponent.tiles.is_some() {
            return Err(Rejection::TilesAlreadyDealt);
        }
        let mut effects = Vec::new();
        if !self.is_vs_cpu {
            effects.push(Effect::Peer(PeerEvent::TilesDealt {
                host: mine.clone(),
                guest: theirs.clone(),
            }));
        }
        self.me.tiles = Some(mine);
        self.opponent.tiles = Some(theirs);
        Ok(effects)
    }

    fn set_opponent_tiles(&mut self, rack: TileRack) -> Result<Vec<Effect>, Rejection> {
        self.expect(Status::Setup)?;
        if self.is_host {
            return Err(Rejection::NotHost);
        }
        if self.opponent.tiles.is_some() {
            return Err(Rejection::TilesAlreadyDealt);
        }
        self.opponent.tiles = Some(rack);
        Ok(Vec::new())
    }

    fn assign_tiles(&mut self, rack: TileRack) -> Result<Vec<Effect>, Rejection> {
        self.expect(Status::Setup)?;
        if self.is_host {
            return Err(Rejection::NotHost);
        }
        if self.me.tiles.is_some() {
            return Err(Rejection::TilesAlreadyDealt);
        }
        self.me.tiles = Some(rack);
        Ok(Vec::new())
    }

    fn set_secret_word(&mut self, word: &str) -> Result<Vec<Effect>, Rejection> {
        self.expect(Status::Setup)?;
        if self.me.secret.is_some() {
            return Err(Rejection::SecretAlreadySet);
        }
        let word = normalize_word(word)?;
        if self.tile_constrained {
            let tiles = self.me.tiles.as_ref().ok_or(Rejection::TilesNotDealt)?;
            if !can_form_word(&word, tiles.letters()) {
                return Err(Rejection::TilesInsufficient);
            }
        }
        let mut effects = Vec::new();
        if !self.is_vs_cpu {
            effects.push(Effect::Peer(PeerEvent::SecretLength(word.len())));
        }
        self.me.secret = Some(word);
        effects.extend(self.lock_in_if_ready());
        Ok(effects)
    }

    fn set_opponent_secret_length(&mut self, len: usize) -> Result<Vec<Effect>, Rejection> {
        self.expect(Status::Setup)?;
        if self.opponent.secret_len.is_some() {
            return Err(Rejection::SecretAlreadySet);
        }
        if !(MIN_WORD_LEN..=MAX_WORD_LEN).contains(&len) {
            return Err(Rejection::InvalidSecretLength(len));
        }
        self.opponent.secret_len = Some(len);
        Ok(self.lock_in_if_ready())
    }

    fn set_cpu_secret(&mut self, word: &str) -> Result<Vec<Effect>, Rejection> {
        self.expect(Status::Setup)?;
        if !self.is_vs_cpu {
            return Err(Rejection::UnexpectedReply);
        }
        if self.opponent.secret_len.is_some() {
            return Err(Rejection::SecretAlreadySet);
        }
        let word = normalize_word(word)?;
        self.opponent.secret_len = Some(word.len());
        self.opponent.secret = Some(word);
        Ok(self.lock_in_if_ready())
    }

    fn lock_in_if_ready(&self) -> Vec<Effect> {
        if self.me.secret.is_some() && self.opponent.secret_len.is_some() {
            vec![Effect::Schedule(Timer::LockIn)]
        } else {
            Vec::new()
        }
    }

    fn begin_play(&mut self) -> Result<Vec<Effect>, Rejection> {
        self.expect(Status::Setup)?;
        if self.me.secret.is_none() || self.opponent.secret_len.is_none() {
            return Err(Rejection::WrongPhase(self.status));
        }
        self.status = Status::Playing;
        Ok(self.cpu_turn_if_due())
    }

    /// The peer's first move can arrive before our own lock-in delay runs
    /// out. Once both secrets are known that move starts play.
    fn peer_overtakes_lock_in(&self, player: Side) -> bool {
        player == Side::Opponent
            && !self.is_vs_cpu
            && self.status == Status::Setup
            && self.me.secret.is_some()
            && self.opponent.secret_len.is_some()
    }

    /// Start play early for a peer move that passed validation.
    fn begin_for_peer_move(&mut self, player: Side) -> Vec<Effect> {
        if !self.peer_overtakes_lock_in(player) {
            return Vec::new();
        }
        log::debug!("Peer moved before lock-in, starting play");
        self.status = Status::Playing;
        vec![Effect::Cancel(Timer::LockIn)]
    }

    fn cpu_turn_if_due(&self) -> Vec<Effect> {
        if self.is_vs_cpu && self.status == Status::Playing && self.turn == Side::Opponent {
            vec![Effect::Schedule(Timer::CpuTurn)]
        } else {
            Vec::new()
        }
    }

    /// Secret that `player` is trying to find, if this process holds it.
    fn target_of(&self, player: Side) -> Option<&str> {
        match player {
            Side::Me => self.opponent.secret.as_deref(),
            Side::Opponent => self.me.secret.as_deref(),
        }
    }

    fn make_guess(&mut self, word: &str, player: Side) -> Result<Vec<Effect>, Rejection> {
        self.expect_turn(player)?;
        let word = normalize_word(word)?;
        match self.target_of(player).map(String::from) {
            Some(secret) => {
                let clue_count = score(&secret, &word);
                let correct = secret == word;
                let mut effects = self.begin_for_peer_move(player);
                if player == Side::Opponent && !self.is_vs_cpu {
                    effects.push(Effect::Peer(PeerEvent::GuessScored {
                        word: word.clone(),
                        clue_count,
                        correct,
                    }));
                }
                effects.extend(self.conclude_guess(player, word, clue_count, correct));
                Ok(effects)
            }
            None if player == Side::Me && !self.is_vs_cpu => {
                self.pending = Some(Pending::Guess(word.clone()));
                Ok(vec![Effect::Peer(PeerEvent::Guess(word))])
            }
            None => Err(Rejection::WrongPhase(self.status)),
        }
    }

    fn guess_scored(
        &mut self,
        word: String,
        clue_count: usize,
        correct: bool,
    ) -> Result<Vec<Effect>, Rejection> {
        self.expect(Status::Playing)?;
        match &self.pending {
            Some(Pending::Guess(pending)) if *pending == word => {}
            _ => return Err(Rejection::UnexpectedReply),
        }
        self.pending = None;
        Ok(self.conclude_guess(Side::Me, word, clue_count, correct))
    }

    fn conclude_guess(
        &mut self,
        player: Side,
        word: String,
        clue_count: usize,
        correct: bool,
    ) -> Vec<Effect> {
        self.guesses.push(GuessEntry {
            word: word.clone(),
            clue_count,
            player,
            correct,
        });

        if correct && self.ledger.can_win(player) {
            let winner = Winner::from(player);
            self.status = Status::GameOver;
            self.winner = Some(winner);
            log::info!("{:?} found the secret word and wins", player);
            let mut effects = vec![
                Effect::Cancel(Timer::CpuTurn),
                Effect::Announce(Announcement::GameOver(winner)),
            ];
            if !self.is_vs_cpu {
                if let Some(secret) = &self.me.secret {
                    effects.push(Effect::Peer(PeerEvent::Reveal(secret.clone())));
                }
            }
            return effects;
        }

        let mut effects = Vec::new();
        if correct {
            log::debug!("{:?} guessed correctly without enough berries", player);
            effects.push(Effect::Announce(Announcement::CorrectButShort { player, word }));
        }
        self.turn = player.other();
        effects.extend(self.cpu_turn_if_due());
        effects
    }

    fn buy_clue(&mut self, clue_id: &str, player: Side) -> Result<Vec<Effect>, Rejection> {
        self.expect_turn(player)?;
        let card = clue::find(clue_id).ok_or_else(|| Rejection::UnknownClue(clue_id.into()))?;
        if self.owns_clue(player, card.id) {
            return Err(Rejection::ClueAlreadyOwned);
        }
        match self.target_of(player).map(String::from) {
            Some(secret) => {
                let result = clue::resolve(card.kind, &secret);
                let mut effects = self.begin_for_peer_move(player);
                if player == Side::Opponent && !self.is_vs_cpu {
                    effects.push(Effect::Peer(PeerEvent::ClueResolved {
                        clue_id: card.id,
                        result: result.clone(),
                    }));
                }
                effects.extend(self.conclude_clue(player, card, result));
                Ok(effects)
            }
            None if player == Side::Me && !self.is_vs_cpu => {
                self.pending = Some(Pending::Clue(card));
                Ok(vec![Effect::Peer(PeerEvent::ClueRequested(card.id))])
            }
            None => Err(Rejection::WrongPhase(self.status)),
        }
    }

    fn clue_resolved(&mut self, clue_id: &str, result: String) -> Result<Vec<Effect>, Rejection> {
        self.expect(Status::Playing)?;
        let card = match self.pending {
            Some(Pending::Clue(card)) if card.id == clue_id => card,
            _ => return Err(Rejection::UnexpectedReply),
        };
        self.pending = None;
        Ok(self.conclude_clue(Side::Me, card, result))
    }

    fn conclude_clue(&mut self, player: Side, card: &'static ClueCard, result: String) -> Vec<Effect> {
        let credited = self.ledger.award_on_purchase(player, card);
        log::debug!(
            "{:?} bought {} for {} berries paid to {:?}",
            player,
            card.id,
            card.cost,
            credited
        );
        self.clues.push(ActiveClueRecord {
            clue_id: card.id,
            result,
            player,
        });
        self.turn = player.other();
        self.cpu_turn_if_due()
    }

    fn reveal_opponent_secret(&mut self, word: String) -> Result<Vec<Effect>, Rejection> {
        self.expect(Status::GameOver)?;
        if self.opponent.secret.is_none() {
            self.opponent.secret = Some(word.to_ascii_uppercase());
        }
        Ok(Vec::new())
    }
}
