#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod berries;
pub mod clue;
mod common;
mod config;
mod dictionary;
mod game;
pub mod player;
mod scoring;
mod tiles;
#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod player_node;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
mod scheduler;
#[cfg(feature = "std")]
pub mod sync;
#[cfg(feature = "std")]
pub mod transport;

pub use berries::*;
pub use clue::{ClueCard, ClueKind, CATALOG};
pub use common::*;
pub use config::*;
pub use dictionary::*;
pub use game::*;
pub use player::{CpuOpponent, GuessStrategy, RandomWordStrategy};
pub use scoring::*;
pub use tiles::*;
#[cfg(feature = "std")]
pub use logging::init_logging;
#[cfg(feature = "std")]
pub use player_node::*;
#[cfg(feature = "std")]
pub use scheduler::Scheduler;
#[cfg(feature = "std")]
pub use transport::{HeartbeatTransport, InMemoryTransport, TcpTransport, Transport};
