#![cfg(feature = "std")]

//! Line-oriented text front end.

use std::fmt::Write as _;
use std::io::{self, BufRead};

use tokio::sync::mpsc;

use crate::{
    clue::{ClueKind, CATALOG},
    common::{Side, Status, Winner},
    game::{Announcement, Session},
    player_node::{Intent, Notice, NodeError, PlayerNode},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Secret(String),
    Guess(String),
    Clue(String),
    Clues,
    Show,
    Rematch,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  secret WORD     lock in your secret word
  guess WORD      guess the opponent's word
  clue ID         buy a clue (c1|first, c2|last, c3|length)
  clues           list the clue cards
  show            print the game state
  rematch         start a new solo game
  help            this text
  quit            leave";

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().ok_or_else(|| String::from("Empty command"))?;
    let arg = parts.next();
    if parts.next().is_some() {
        return Err(format!("Too many arguments for '{}'", verb));
    }
    let needs_arg = |what: &str| {
        arg.map(str::to_string)
            .ok_or_else(|| format!("Usage: {} {}", verb, what))
    };
    match verb.to_ascii_lowercase().as_str() {
        "secret" | "s" => Ok(Command::Secret(needs_arg("WORD")?)),
        "guess" | "g" => Ok(Command::Guess(needs_arg("WORD")?)),
        "clue" | "c" => Ok(Command::Clue(clue_id(&needs_arg("ID")?))),
        "clues" => Ok(Command::Clues),
        "show" => Ok(Command::Show),
        "rematch" => Ok(Command::Rematch),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("Unknown command '{}', try 'help'", other)),
    }
}

/// Map a friendly alias to a catalog id; anything else passes through.
fn clue_id(arg: &str) -> String {
    let kind = match arg.to_ascii_lowercase().as_str() {
        "first" => Some(ClueKind::FirstLetter),
        "last" => Some(ClueKind::LastLetter),
        "length" | "len" => Some(ClueKind::WordLength),
        _ => None,
    };
    kind.and_then(|kind| CATALOG.iter().find(|card| card.kind == kind))
        .map(|card| card.id.to_string())
        .unwrap_or_else(|| arg.to_ascii_lowercase())
}

fn side_name(side: Side) -> &'static str {
    match side {
        Side::Me => "You",
        Side::Opponent => "Opponent",
    }
}

pub fn render_catalog(session: &Session) -> String {
    let mut out = String::new();
    for card in CATALOG.iter() {
        let owned = if session.owns_clue(Side::Me, card.id) {
            " (owned)"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "  {:<3} {:<13} {:>2} berries  {}{}",
            card.id, card.title, card.cost, card.description, owned
        );
    }
    out
}

/// Full text view of the session from the local seat.
pub fn render_session(session: &Session) -> String {
    let mut out = String::new();
    let role = if session.is_vs_cpu() {
        "solo vs CPU"
    } else if session.is_host() {
        "host"
    } else {
        "guest"
    };
    let _ = writeln!(out, "== {:?} ({}) ==", session.status(), role);
    if let Some(tiles) = session.my_tiles() {
        let _ = writeln!(out, "Your tiles:      {}", tiles);
    }
    if let Some(tiles) = session.opponent_tiles() {
        let _ = writeln!(out, "Opponent tiles:  {}", tiles);
    }
    match session.my_secret() {
        Some(secret) => {
            let _ = writeln!(out, "Your secret:     {}", secret);
        }
        None if session.status() == Status::Setup => {
            let _ = writeln!(out, "Your secret:     (not set, use 'secret WORD')");
        }
        None => {}
    }
    if let Some(len) = session.opponent_secret_len() {
        let _ = writeln!(out, "Opponent secret: {} letters", len);
    }
    let _ = writeln!(
        out,
        "Berries:         you {} / opponent {}",
        session.berries(Side::Me),
        session.berries(Side::Opponent)
    );

    if !session.guesses().is_empty() {
        let _ = writeln!(out, "Guesses:");
        for entry in session.guesses() {
            let mark = if entry.correct { "  exact!" } else { "" };
            let _ = writeln!(
                out,
                "  {:<8} {:<12} {} common{}",
                side_name(entry.player),
                entry.word,
                entry.clue_count,
                mark
            );
        }
    }
    if !session.clues().is_empty() {
        let _ = writeln!(out, "Clues:");
        for record in session.clues() {
            let _ = writeln!(
                out,
                "  {:<8} {:<3} {}",
                side_name(record.player),
                record.clue_id,
                record.result
            );
        }
    }

    match session.status() {
        Status::Playing if session.awaiting_peer() => {
            let _ = writeln!(out, "Waiting for the opponent's answer...");
        }
        Status::Playing => {
            let _ = writeln!(out, "Turn: {}", side_name(session.turn()));
        }
        Status::GameOver => {
            if let Some(winner) = session.winner() {
                let _ = writeln!(out, "{}", describe_winner(winner));
            }
            if let Some(secret) = session.revealed_opponent_secret() {
                let _ = writeln!(out, "The opponent's word was {}", secret);
            }
        }
        _ => {}
    }
    out
}

fn describe_winner(winner: Winner) -> &'static str {
    match winner {
        Winner::Me => "You win!",
        Winner::Opponent => "The opponent wins.",
        Winner::Draw => "It's a draw.",
    }
}

pub fn describe_notice(notice: &Notice) -> Option<String> {
    match notice {
        Notice::Paired { host: true } => Some("Opponent joined. You are the host.".into()),
        Notice::Paired { host: false } => Some("Connected. The host moves first.".into()),
        Notice::Announcement(Announcement::CorrectButShort { player, word }) => Some(format!(
            "{} guessed {} exactly, but needs more berries than the other side to win.",
            side_name(*player),
            word
        )),
        Notice::Announcement(Announcement::GameOver(winner)) => {
            Some(describe_winner(*winner).to_string())
        }
        Notice::OpponentMoved => None,
        Notice::PeerRejected(r) => Some(format!("Ignored a message from the opponent: {}", r)),
        Notice::Disconnected(reason) => Some(format!("Connection closed: {}", reason)),
    }
}

/// Forward stdin lines into a channel from a blocking thread.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Drive `node` from text commands until the user quits or input ends.
pub async fn run(mut node: PlayerNode, mut lines: mpsc::Receiver<String>) -> anyhow::Result<()> {
    println!("{}", HELP);
    print!("{}", render_session(node.session()));
    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(msg) => {
                        println!("{}", msg);
                        continue;
                    }
                };
                let intent = match command {
                    Command::Secret(word) => Intent::SetSecret(word),
                    Command::Guess(word) => Intent::Guess(word),
                    Command::Clue(id) => Intent::BuyClue(id),
                    Command::Clues => {
                        print!("{}", render_catalog(node.session()));
                        continue;
                    }
                    Command::Show => {
                        print!("{}", render_session(node.session()));
                        continue;
                    }
                    Command::Rematch => {
                        if !node.session().is_vs_cpu() {
                            println!("Rematch is only available in solo games.");
                            continue;
                        }
                        node.rematch();
                        Intent::PlaySolo
                    }
                    Command::Help => {
                        println!("{}", HELP);
                        continue;
                    }
                    Command::Quit => break,
                };
                match node.submit(intent).await {
                    Ok(()) => print!("{}", render_session(node.session())),
                    Err(NodeError::Rejected(r)) => println!("{}", r),
                    Err(e) => println!("{}", e),
                }
            }
            wake = node.next_wake() => {
                let before = node.session().guesses().len() + node.session().clues().len();
                let status = node.session().status();
                if let Err(e) = node.handle_wake(wake).await {
                    log::debug!("[cli] {}", e);
                }
                let after = node.session().guesses().len() + node.session().clues().len();
                if after != before || node.session().status() != status {
                    print!("{}", render_session(node.session()));
                }
            }
        }
        for notice in node.take_notices() {
            if let Some(text) = describe_notice(&notice) {
                println!("{}", text);
            }
        }
    }
    Ok(())
}
