use std::io::{BufRead, Write};
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use guess_number::{
    GameConfig, GameError, GameRecord, GameResult, GameSession, GameStore, Outcome, PlayerStats,
    RandomSecret, SessionState, SqliteStore,
};

#[derive(Parser)]
#[command(name = "guess-number")]
#[command(about = "Number-guessing game with persisted history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Database path
    #[arg(short, long, default_value = "games.db")]
    db: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new game (interactive guess prompt)
    New {
        /// Player name
        #[arg(short, long, default_value = "Player")]
        player: String,

        /// Upper bound of the guessing range
        #[arg(long, default_value = "100")]
        max_number: i64,

        /// Attempt budget
        #[arg(long, default_value = "10")]
        max_attempts: u32,
    },

    /// List all games
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List won games
    Win {
        #[arg(long)]
        json: bool,
    },

    /// List lost games
    Lose {
        #[arg(long)]
        json: bool,
    },

    /// Per-player statistics
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Replay a stored game by id
    Replay {
        /// Game id
        id: i64,

        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let store: Arc<dyn GameStore> = Arc::new(SqliteStore::new(&cli.db).await?);

    match command {
        Commands::New {
            player,
            max_number,
            max_attempts,
        } => {
            let config = GameConfig::new(player, max_number, max_attempts);
            play(config, store).await?;
        }

        Commands::List { json } => {
            show_games(&store.list_games().await?, "All games", json)?;
        }

        Commands::Win { json } => {
            show_games(&store.list_won().await?, "Won games", json)?;
        }

        Commands::Lose { json } => {
            show_games(&store.list_lost().await?, "Lost games", json)?;
        }

        Commands::Stats { json } => {
            show_stats(&store.player_stats().await?, json)?;
        }

        Commands::Replay { id, json } => {
            replay(&*store, id, json).await?;
        }
    }

    Ok(())
}

/// Interactive prompt loop for one session
async fn play(config: GameConfig, store: Arc<dyn GameStore>) -> anyhow::Result<()> {
    let mut session = GameSession::start(config.clone(), &RandomSecret::new(), store).await?;

    println!(
        "🎲 {}, guess the number between 1 and {}. You have {} attempts.",
        config.player_name, config.max_number, config.max_attempts
    );

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    while !session.state().is_terminal() {
        print!(
            "Attempt {} of {}. Your guess: ",
            session.attempts_count() + 1,
            config.max_attempts
        );
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!("\nInput closed, game left in progress (id {}).", session.game_id());
            return Ok(());
        };

        let guess: i64 = match line?.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                println!("⚠️  Please enter a whole number.");
                continue;
            }
        };

        match session.guess(guess).await {
            Ok(feedback) => match feedback.state {
                SessionState::Won => {
                    println!(
                        "🏆 Correct! You guessed {} in {} attempts.",
                        guess, feedback.attempt_number
                    );
                }
                SessionState::Lost => {
                    println!(
                        "💀 Out of attempts. The secret number was {}.",
                        feedback.secret.unwrap_or_default()
                    );
                }
                _ => match feedback.outcome {
                    Outcome::Higher => println!(
                        "➡️  The secret number is HIGHER. {} attempts left.",
                        feedback.remaining_attempts
                    ),
                    Outcome::Lower => println!(
                        "⬅️  The secret number is LOWER. {} attempts left.",
                        feedback.remaining_attempts
                    ),
                    Outcome::Exact => unreachable!("exact guess ends the session"),
                },
            },
            Err(GameError::InvalidGuess { max_number, .. }) => {
                println!("⚠️  Guess must be between 1 and {}.", max_number);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn result_label(record: &GameRecord) -> &'static str {
    match record.result {
        GameResult::InProgress => "in progress",
        GameResult::Won => "won",
        GameResult::Lost => "lost",
    }
}

fn show_games(games: &[GameRecord], title: &str, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(games)?);
        return Ok(());
    }

    println!("📋 {} ({})", title, games.len());
    for game in games {
        println!(
            "   #{:<4} {:<16} 1-{:<6} {:>2}/{} attempts  {:<11} {}",
            game.id,
            game.player_name,
            game.max_number,
            game.attempts_count,
            game.max_attempts,
            result_label(game),
            game.started_at.format("%Y-%m-%d %H:%M:%S"),
        );
    }

    Ok(())
}

fn show_stats(stats: &[PlayerStats], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    println!("📊 Player statistics ({})", stats.len());
    for row in stats {
        let fmt_opt_u32 = |v: Option<u32>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".into());
        let avg = row
            .avg_attempts_to_win
            .map(|a| format!("{:.2}", a))
            .unwrap_or_else(|| "-".into());

        println!(
            "   {:<16} games {:<4} won {:<4} lost {:<4} win rate {:>5.1}%  attempts to win avg {} min {} max {}",
            row.player_name,
            row.total_games,
            row.wins,
            row.losses,
            row.win_rate,
            avg,
            fmt_opt_u32(row.min_attempts_to_win),
            fmt_opt_u32(row.max_attempts_to_win),
        );
    }

    Ok(())
}

async fn replay(store: &dyn GameStore, id: i64, json: bool) -> anyhow::Result<()> {
    let Some(game) = store.get_game(id).await? else {
        println!("Game {} not found.", id);
        return Ok(());
    };
    let attempts = store.get_attempts(id).await?;

    if json {
        let replay = serde_json::json!({ "game": game, "attempts": attempts });
        println!("{}", serde_json::to_string_pretty(&replay)?);
        return Ok(());
    }

    println!(
        "🎬 Game #{}: {} guessing 1-{} with {} attempts — {}",
        game.id,
        game.player_name,
        game.max_number,
        game.max_attempts,
        result_label(&game),
    );
    println!("   Secret number: {}", game.secret_number);

    for attempt in &attempts {
        let hint = match attempt.outcome {
            Outcome::Higher => "secret is higher",
            Outcome::Lower => "secret is lower",
            Outcome::Exact => "correct!",
        };
        println!(
            "   Attempt {}: guessed {} — {}",
            attempt.attempt_number, attempt.guessed_value, hint
        );
    }

    Ok(())
}
