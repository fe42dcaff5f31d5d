use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde_json::json;
use wordberry::{
    transport::InMemoryTransport, Dictionary, GameConfig, Intent, NodeError, PlayerNode, Side,
    Status, Winner, WordList,
};

/// Moves per side before the simulation gives up.
const MAX_MOVES: usize = 200;

struct Outcome {
    status: Status,
    winner: Option<Winner>,
    guesses: usize,
    clues: usize,
    berries: u32,
    secret: Option<String>,
    opponent_secret: Option<String>,
    disconnected: bool,
}

/// Plays one seat: picks a secret, then guesses unguessed words of the right
/// length and occasionally buys a clue.
async fn autopilot(mut node: PlayerNode, mut rng: SmallRng, joining: bool) -> anyhow::Result<Outcome> {
    let words = WordList::builtin();
    let mut clue_budget = rng.random_range(0..=3usize);
    let mut moves = 0;
    let mut disconnected = false;

    if joining {
        node.hello().await?;
    }

    loop {
        let session = node.session();
        if session.status() == Status::GameOver && session.revealed_opponent_secret().is_some() {
            break;
        }
        if moves >= MAX_MOVES {
            break;
        }

        let intent = if session.status() == Status::Setup
            && session.my_secret().is_none()
            && session.my_tiles().is_some()
        {
            Some(Intent::SetSecret(words.random_word(&mut rng)))
        } else if session.status() == Status::Playing
            && session.turn() == Side::Me
            && !session.awaiting_peer()
        {
            moves += 1;
            let clue = session.available_clues(Side::Me).next().map(|c| c.id);
            match clue {
                Some(id) if clue_budget > 0 && rng.random_bool(0.5) => {
                    clue_budget -= 1;
                    Some(Intent::BuyClue(id.to_string()))
                }
                _ => {
                    let target_len = session.opponent_secret_len();
                    let candidates: Vec<&str> = words
                        .words()
                        .filter(|w| target_len.map_or(true, |len| w.len() == len))
                        .filter(|w| {
                            !session
                                .guesses()
                                .iter()
                                .any(|g| g.player == Side::Me && g.word == *w)
                        })
                        .collect();
                    let word = if candidates.is_empty() {
                        words.random_word(&mut rng)
                    } else {
                        candidates[rng.random_range(0..candidates.len())].to_string()
                    };
                    Some(Intent::Guess(word))
                }
            }
        } else {
            None
        };

        let result = match intent {
            Some(intent) => node.submit(intent).await,
            None => node.process_next().await,
        };
        match result {
            Ok(()) => {}
            Err(NodeError::Rejected(r)) => log::debug!("[sim] rejected: {}", r),
            Err(NodeError::Transport(e)) => {
                log::debug!("[sim] connection ended: {}", e);
                disconnected = true;
                break;
            }
        }
    }

    let session = node.session();
    Ok(Outcome {
        status: session.status(),
        winner: session.winner(),
        guesses: session
            .guesses()
            .iter()
            .filter(|g| g.player == Side::Me)
            .count(),
        clues: session.clues().iter().filter(|c| c.player == Side::Me).count(),
        berries: session.berries(Side::Me),
        secret: session.my_secret().map(str::to_string),
        opponent_secret: session.revealed_opponent_secret().map(str::to_string),
        disconnected,
    })
}

fn summary(outcome: &Outcome) -> serde_json::Value {
    json!({
        "status": format!("{:?}", outcome.status),
        "guesses": outcome.guesses,
        "clues": outcome.clues,
        "berries": outcome.berries,
        "secret": outcome.secret,
        "opponent_secret": outcome.opponent_secret,
        "disconnected": outcome.disconnected,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    wordberry::init_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let (t1, t2) = InMemoryTransport::pair();

    let mut host = PlayerNode::new(
        GameConfig::instant(),
        Box::new(WordList::builtin()),
        SmallRng::seed_from_u64(seed1),
    );
    host.attach(Box::new(t1));
    let mut guest = PlayerNode::new(
        GameConfig::instant(),
        Box::new(WordList::builtin()),
        SmallRng::seed_from_u64(seed1.wrapping_add(1)),
    );
    guest.attach(Box::new(t2));

    let (res1, res2) = tokio::try_join!(
        autopilot(host, SmallRng::seed_from_u64(seed2), false),
        autopilot(guest, SmallRng::seed_from_u64(seed2.wrapping_add(1)), true),
    )?;

    let winner = match (res1.winner, res2.winner) {
        (Some(Winner::Me), Some(Winner::Opponent)) => Some("player1"),
        (Some(Winner::Opponent), Some(Winner::Me)) => Some("player2"),
        _ => None,
    };

    let result = json!({
        "player1": summary(&res1),
        "player2": summary(&res2),
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
