#![cfg(feature = "std")]

//! Async driver for one seat.
//!
//! A [`PlayerNode`] owns the [`Session`] and is its only writer. User intents,
//! inbound peer messages and timer firings all become [`Action`]s applied in
//! arrival order; the resulting [`Effect`]s are executed here.

use std::collections::VecDeque;

use rand::rngs::SmallRng;

use crate::{
    common::{Rejection, Side, Status},
    config::GameConfig,
    dictionary::Dictionary,
    game::{Action, Announcement, Effect, PeerEvent, Session, Timer},
    player::CpuOpponent,
    protocol::Message,
    scheduler::Scheduler,
    scoring::normalize_word,
    sync::{NetworkSync, SyncStep},
    tiles::TileRack,
    transport::Transport,
};

/// Something the local user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    PlaySolo,
    SetSecret(String),
    Guess(String),
    BuyClue(String),
}

/// News for the front end, collected with [`PlayerNode::take_notices`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Paired { host: bool },
    Announcement(Announcement),
    /// The scripted opponent or the peer made a move.
    OpponentMoved,
    /// An inbound message was out of order for the current state.
    PeerRejected(Rejection),
    Disconnected(String),
}

#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("{0}")]
    Rejected(#[from] Rejection),
    #[error("transport error: {0}")]
    Transport(anyhow::Error),
}

impl From<anyhow::Error> for NodeError {
    fn from(e: anyhow::Error) -> Self {
        NodeError::Transport(e)
    }
}

/// Why [`PlayerNode::next_wake`] returned.
#[derive(Debug)]
pub enum Wake {
    Timer(Timer),
    Inbound(anyhow::Result<Message>),
}

pub struct PlayerNode {
    config: GameConfig,
    session: Session,
    sync: NetworkSync,
    transport: Option<Box<dyn Transport>>,
    cpu: CpuOpponent,
    dictionary: Box<dyn Dictionary>,
    rng: SmallRng,
    scheduler: Scheduler,
    notices: Vec<Notice>,
}

impl PlayerNode {
    pub fn new(config: GameConfig, dictionary: Box<dyn Dictionary>, rng: SmallRng) -> Self {
        Self {
            session: Session::new(config.tile_constrained),
            sync: NetworkSync::new(config.player_name.clone()),
            transport: None,
            cpu: CpuOpponent::default(),
            dictionary,
            rng,
            scheduler: Scheduler::new(),
            notices: Vec::new(),
            config,
        }
    }

    pub fn with_cpu(mut self, cpu: CpuOpponent) -> Self {
        self.cpu = cpu;
        self
    }

    /// Use `transport` for the peer connection.
    pub fn attach(&mut self, transport: Box<dyn Transport>) {
        self.sync.reset();
        self.transport = Some(transport);
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    pub fn peer_name(&self) -> Option<&str> {
        self.sync.peer_name()
    }

    /// Some delayed transition is still outstanding.
    pub fn has_pending_timers(&self) -> bool {
        self.scheduler.has_armed()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Open the handshake. Called by the joining side once connected.
    pub async fn hello(&mut self) -> Result<(), NodeError> {
        let msg = self.sync.hello();
        let transport = self
            .transport
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("Not connected"))?;
        transport.send(msg).await?;
        Ok(())
    }

    /// Validate and apply a local intent.
    pub async fn submit(&mut self, intent: Intent) -> Result<(), NodeError> {
        if self.lost_peer() && !matches!(intent, Intent::PlaySolo) {
            return Err(anyhow::anyhow!("Not connected").into());
        }
        let action = match intent {
            Intent::PlaySolo => {
                if self.transport.is_some() {
                    return Err(Rejection::WrongPhase(self.session.status()).into());
                }
                Action::StartSinglePlayer
            }
            Intent::SetSecret(word) => Action::SetSecretWord(self.checked_word(&word)?),
            Intent::Guess(word) => Action::MakeGuess {
                word: self.checked_word(&word)?,
                player: Side::Me,
            },
            Intent::BuyClue(clue_id) => Action::BuyClue {
                clue_id,
                player: Side::Me,
            },
        };
        self.dispatch(action).await
    }

    /// A networked game is under way but the connection is gone.
    fn lost_peer(&self) -> bool {
        self.transport.is_none()
            && !self.session.is_vs_cpu()
            && self.session.status() != Status::Lobby
    }

    fn checked_word(&self, word: &str) -> Result<String, Rejection> {
        let word = normalize_word(word)?;
        if !self.dictionary.is_valid_word(&word) {
            return Err(Rejection::NotAWord);
        }
        Ok(word)
    }

    /// Start over with a fresh session.
    ///
    /// Timers are cancelled and any peer connection is dropped; a networked
    /// rematch needs a new connection.
    pub fn rematch(&mut self) {
        self.scheduler.cancel_all();
        if self.transport.take().is_some() {
            log::info!("[PlayerNode] Connection dropped for rematch");
        }
        self.sync.reset();
        self.session = Session::new(self.config.tile_constrained);
    }

    /// Wait until a timer fires or a message arrives. Cancel safe.
    pub async fn next_wake(&mut self) -> Wake {
        let Self {
            transport,
            scheduler,
            ..
        } = self;
        match transport {
            Some(transport) => tokio::select! {
                timer = scheduler.next() => Wake::Timer(timer),
                msg = transport.recv() => Wake::Inbound(msg),
            },
            None => Wake::Timer(scheduler.next().await),
        }
    }

    pub async fn handle_wake(&mut self, wake: Wake) -> Result<(), NodeError> {
        match wake {
            Wake::Timer(timer) => self.on_timer(timer).await,
            Wake::Inbound(Ok(msg)) => self.on_message(msg).await,
            Wake::Inbound(Err(e)) => {
                self.disconnect(&e);
                Err(NodeError::Transport(e))
            }
        }
    }

    /// Wait for and handle one wake-up.
    pub async fn process_next(&mut self) -> Result<(), NodeError> {
        let wake = self.next_wake().await;
        self.handle_wake(wake).await
    }

    async fn on_timer(&mut self, timer: Timer) -> Result<(), NodeError> {
        log::debug!("[PlayerNode] Timer fired: {:?}", timer);
        let action = match timer {
            Timer::CpuSecret => {
                if !self.session.is_vs_cpu() || self.session.status() != Status::Setup {
                    return Ok(());
                }
                let word = self.cpu.choose_secret(&mut self.rng, self.dictionary.as_ref());
                Action::SetCpuSecret(word)
            }
            Timer::LockIn => Action::BeginPlay,
            Timer::CpuTurn => {
                if !CpuOpponent::should_act(&self.session) {
                    return Ok(());
                }
                let word = self
                    .cpu
                    .choose_guess(&mut self.rng, self.dictionary.as_ref(), &self.session);
                log::debug!("[PlayerNode] CPU guesses {}", word);
                self.notices.push(Notice::OpponentMoved);
                Action::MakeGuess {
                    word,
                    player: Side::Opponent,
                }
            }
        };
        match self.dispatch(action).await {
            Err(NodeError::Rejected(r)) => {
                log::warn!("[PlayerNode] {:?} transition rejected: {}", timer, r);
                Ok(())
            }
            other => other,
        }
    }

    async fn on_message(&mut self, msg: Message) -> Result<(), NodeError> {
        log::trace!("[PlayerNode] Received {:?}", msg);
        let steps = match self.sync.on_message(msg) {
            Ok(steps) => steps,
            Err(e) => {
                self.disconnect(&e);
                return Err(NodeError::Transport(e));
            }
        };
        for step in steps {
            match step {
                SyncStep::Reply(reply) => self.send_raw(reply).await?,
                SyncStep::Apply(action) => {
                    let paired = match action {
                        Action::SetHost(host) => Some(host),
                        _ => None,
                    };
                    let from_peer = matches!(
                        action,
                        Action::MakeGuess { .. } | Action::BuyClue { .. }
                    );
                    match self.dispatch(action).await {
                        Ok(()) => {
                            if let Some(host) = paired {
                                self.notices.push(Notice::Paired { host });
                            }
                            if from_peer {
                                self.notices.push(Notice::OpponentMoved);
                            }
                        }
                        Err(NodeError::Rejected(r)) => {
                            log::warn!("[PlayerNode] Ignoring peer message: {}", r);
                            self.notices.push(Notice::PeerRejected(r));
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }
        Ok(())
    }

    /// Apply `action` and run its effects, including follow-up actions.
    async fn dispatch(&mut self, action: Action) -> Result<(), NodeError> {
        let mut queue: VecDeque<Effect> = self.session.apply(action)?.into();
        let mut failure = None;
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Peer(event) => {
                    if let Err(e) = self.send_event(event).await {
                        failure.get_or_insert(e);
                    }
                }
                Effect::Schedule(timer) => {
                    let delay = self.delay_for(timer);
                    self.scheduler.arm(timer, delay);
                }
                Effect::Cancel(timer) => self.scheduler.cancel(timer),
                Effect::DealTiles => {
                    let mine = TileRack::generate(
                        &mut self.rng,
                        self.config.vowels,
                        self.config.consonants,
                    );
                    let theirs = TileRack::generate(
                        &mut self.rng,
                        self.config.vowels,
                        self.config.consonants,
                    );
                    log::debug!("[PlayerNode] Dealt {} / {}", mine, theirs);
                    match self.session.apply(Action::DealTiles { mine, theirs }) {
                        Ok(more) => queue.extend(more),
                        Err(r) => log::warn!("[PlayerNode] Dealing tiles rejected: {}", r),
                    }
                }
                Effect::Announce(announcement) => {
                    log::info!("[PlayerNode] {:?}", announcement);
                    self.notices.push(Notice::Announcement(announcement));
                }
            }
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn delay_for(&self, timer: Timer) -> std::time::Duration {
        match timer {
            Timer::CpuSecret => self.config.cpu_secret_delay,
            Timer::LockIn => self.config.setup_lock_delay,
            Timer::CpuTurn => self.config.cpu_think_delay,
        }
    }

    async fn send_event(&mut self, event: PeerEvent) -> Result<(), NodeError> {
        for msg in self.sync.encode(event) {
            self.send_raw(msg).await?;
        }
        Ok(())
    }

    async fn send_raw(&mut self, msg: Message) -> Result<(), NodeError> {
        let Some(transport) = self.transport.as_mut() else {
            log::warn!("[PlayerNode] Not connected, dropping {:?}", msg);
            return Err(anyhow::anyhow!("Not connected").into());
        };
        log::trace!("[PlayerNode] Sending {:?}", msg);
        if let Err(e) = transport.send(msg).await {
            self.disconnect(&e);
            return Err(NodeError::Transport(e));
        }
        Ok(())
    }

    fn disconnect(&mut self, reason: &anyhow::Error) {
        if self.transport.take().is_some() {
            log::warn!("[PlayerNode] Connection lost: {}", reason);
            self.notices.push(Notice::Disconnected(reason.to_string()));
        }
    }
}
