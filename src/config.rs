use alloc::string::String;
use core::time::Duration;

/// Vowels dealt into every tile rack.
pub const VOWEL_TILES: usize = 4;
/// Consonants dealt into every tile rack.
pub const CONSONANT_TILES: usize = 7;

/// Shortest secret word or guess accepted.
pub const MIN_WORD_LEN: usize = 3;
/// Longest secret word or guess accepted.
pub const MAX_WORD_LEN: usize = 12;

/// Wire protocol version checked during the handshake.
pub const PROTOCOL_VERSION: u8 = 1;

/// Delay before the scripted opponent locks in its secret word.
pub const CPU_SECRET_DELAY: Duration = Duration::from_millis(1500);
/// Pause between both secrets being set and play starting.
pub const SETUP_LOCK_DELAY: Duration = Duration::from_millis(800);
/// Delay before the scripted opponent makes its guess.
pub const CPU_THINK_DELAY: Duration = Duration::from_millis(1500);

/// How often a heartbeat is sent on an otherwise idle connection.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);
/// How long a connection may stay silent before it is considered dead.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(45);

/// Runtime settings for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Secret words must be formable from the owner's tile rack.
    pub tile_constrained: bool,
    pub vowels: usize,
    pub consonants: usize,
    pub cpu_secret_delay: Duration,
    pub setup_lock_delay: Duration,
    pub cpu_think_delay: Duration,
    /// Name announced in the handshake.
    pub player_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_constrained: false,
            vowels: VOWEL_TILES,
            consonants: CONSONANT_TILES,
            cpu_secret_delay: CPU_SECRET_DELAY,
            setup_lock_delay: SETUP_LOCK_DELAY,
            cpu_think_delay: CPU_THINK_DELAY,
            player_name: String::from("Player"),
        }
    }
}

impl GameConfig {
    /// Same as the default but with every delay set to zero.
    pub fn instant() -> Self {
        Self {
            cpu_secret_delay: Duration::ZERO,
            setup_lock_delay: Duration::ZERO,
            cpu_think_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn constrained(mut self, on: bool) -> Self {
        self.tile_constrained = on;
        self
    }
}
