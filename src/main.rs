#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use wordberry::{
    cli, init_logging, GameConfig, HeartbeatTransport, Intent, PlayerNode, TcpTransport,
    WordList,
};

#[cfg(feature = "std")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
#[cfg(feature = "std")]
struct GameOpts {
    #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    #[arg(long, default_value = "Player")]
    name: String,
    #[arg(long, help = "Secret words must be spelled from your tiles")]
    constrained: bool,
    #[arg(long, help = "Only accept words from the word list")]
    strict_words: bool,
    #[arg(long, value_name = "FILE", help = "Newline-separated word list")]
    words: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Play against the computer on the local machine.
    Solo {
        #[command(flatten)]
        opts: GameOpts,
    },
    /// Host a networked game and wait for an opponent to connect.
    Host {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
        #[command(flatten)]
        opts: GameOpts,
    },
    /// Join a networked game.
    Join {
        #[arg(long, default_value = "127.0.0.1:8080")]
        connect: String,
        #[command(flatten)]
        opts: GameOpts,
    },
}

#[cfg(feature = "std")]
fn build_node(opts: &GameOpts) -> anyhow::Result<PlayerNode> {
    let rng = match opts.seed {
        Some(s) => {
            println!("Using fixed seed: {} (game will be reproducible)", s);
            SmallRng::seed_from_u64(s)
        }
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    };
    let words = match &opts.words {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path.display(), e))?;
            let list = WordList::from_words(text.lines());
            if list.is_empty() {
                return Err(anyhow::anyhow!("{} contains no usable words", path.display()));
            }
            log::info!("Loaded {} words from {}", list.len(), path.display());
            list
        }
        None => WordList::builtin(),
    }
    .lenient(!opts.strict_words);

    let mut config = GameConfig::default().constrained(opts.constrained);
    config.player_name = opts.name.clone();
    Ok(PlayerNode::new(config, Box::new(words), rng))
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solo { opts } => {
            let mut node = build_node(&opts)?;
            node.submit(Intent::PlaySolo).await?;
            println!("Solo game against the computer. Pick a secret word.");
            cli::run(node, cli::spawn_stdin_reader()).await?;
        }
        Commands::Host { bind, opts } => {
            let mut node = build_node(&opts)?;
            let listener = TcpListener::bind(&bind).await?;
            println!("Waiting for an opponent on {}...", bind);
            let (stream, addr) = listener.accept().await?;
            log::info!("Accepted connection from {}", addr);
            node.attach(Box::new(HeartbeatTransport::with_defaults(TcpTransport::new(
                stream,
            ))));
            cli::run(node, cli::spawn_stdin_reader()).await?;
        }
        Commands::Join { connect, opts } => {
            let mut node = build_node(&opts)?;
            println!("Connecting to {}...", connect);
            let transport = TcpTransport::connect(&connect).await?;
            node.attach(Box::new(HeartbeatTransport::with_defaults(transport)));
            node.hello().await?;
            cli::run(node, cli::spawn_stdin_reader()).await?;
        }
    }
    Ok(())
}
