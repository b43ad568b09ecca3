//! Puzzle CLI
//!
//! Plays the puzzle game from a terminal against a progress directory, and
//! inspects generated levels.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use puzzle_core::progress::Progression;
use puzzle_core::shop::ShopItem;
use puzzle_core::{
    referral_code, FileStore, GameConfig, LevelGenerator, Locale, PlayerIdentity, ProgressEngine,
    PuzzleLevel,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "puzzle")]
#[command(about = "Play and inspect puzzle levels", long_about = None)]
struct Cli {
    /// Directory holding saved progress and the leaderboard cache
    #[arg(long, global = true, default_value = "puzzle-data")]
    data_dir: PathBuf,

    /// Game config JSON (overrides PUZZLE_CONFIG_PATH)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Display locale (en or ar)
    #[arg(long, global = true, default_value = "en")]
    locale: Locale,

    /// Debug logging (RUST_LOG still wins when set)
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current level
    Level,

    /// Answer the current level (English, numerals, or a displayed Arabic option)
    Answer {
        text: String,
    },

    /// Report that the rewarded ad finished, settling any pending reward
    AdComplete,

    /// Buy the hint for the current level
    Hint,

    /// Pay to skip the current level
    Skip,

    /// Erase all progress
    Reset {
        /// Confirm the reset
        #[arg(long, default_value = "false")]
        yes: bool,
    },

    /// Show progress statistics
    Stats,

    /// Show the locally cached leaderboard
    Leaderboard {
        /// Merge this player's balance into the cache
        #[arg(long, requires = "name")]
        player_id: Option<String>,

        /// Display name for --player-id
        #[arg(long)]
        name: Option<String>,
    },

    /// Print a generated level without touching progress
    Generate {
        #[arg(long)]
        level: u32,

        /// Print the full level as JSON (includes the answer)
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Redeem points (ooredoo, mobilis or usdt)
    Redeem {
        item: ShopItem,

        /// Phone number or Binance ID
        recipient: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let locale = cli.locale;
    tracing::debug!(max_level = config.max_level, data_dir = %cli.data_dir.display(), "config loaded");

    if let Commands::Generate { level, json } = cli.command {
        let generator = LevelGenerator::new(config)?;
        let puzzle = generator.generate(level)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&puzzle)?);
        } else {
            print_level(&puzzle, locale, None);
            println!("   Answer: {}", puzzle.canonical_answer);
        }
        return Ok(());
    }

    let store = FileStore::new(&cli.data_dir);
    let mut engine = ProgressEngine::new(config, store)
        .with_context(|| format!("Failed to open progress in {}", cli.data_dir.display()))?;

    match cli.command {
        Commands::Level => match engine.progression()? {
            Progression::Playing(level) => {
                let badge = engine.difficulty_badge(level.difficulty_tier, locale);
                print_level(&level, locale, Some(&badge));
            }
            Progression::Complete => {
                println!("{}", engine.message("feedback-game-complete", None).get(locale));
            }
        },

        Commands::Answer { text } => {
            let outcome = engine.submit_answer(&text)?;
            println!("{}", outcome.message.get(locale));
            if outcome.needs_ad {
                println!("   Pending reward: {:.3} (run `puzzle ad-complete`)", outcome.amount);
            }
            println!("   Attempts on this level: {}", outcome.attempts);
        }

        Commands::AdComplete => {
            let settlement = engine.complete_ad_and_advance()?;
            if settlement.settled {
                let amount = format!("{:.2}", settlement.amount);
                println!(
                    "{}",
                    engine.message("feedback-reward-settled", Some(("amount", amount))).get(locale)
                );
            } else {
                println!("Nothing to settle.");
            }
            println!("   Balance: {:.3}", settlement.balance);
            match settlement.next {
                Progression::Playing(level) => println!("   Next: level {}", level.level_number),
                Progression::Complete => {
                    println!("{}", engine.message("feedback-game-complete", None).get(locale))
                }
            }
        }

        Commands::Hint => {
            let reveal = engine.use_hint()?;
            println!("💡 {}", reveal.hint.get(locale));
            println!("   Cost: {:.3}  Balance: {:.3}", reveal.cost, reveal.balance);
        }

        Commands::Skip => {
            let outcome = engine.skip_level()?;
            let cost = format!("{:.2}", outcome.cost);
            println!("{}", engine.message("feedback-level-skipped", Some(("cost", cost))).get(locale));
            println!("   Balance: {:.3}", outcome.balance);
        }

        Commands::Reset { yes } => {
            if !yes {
                println!("⚠️  This erases all progress. Re-run with --yes to confirm.");
                return Ok(());
            }
            engine.reset_game()?;
            println!("🔄 Progress reset.");
        }

        Commands::Stats => {
            let stats = engine.stats();
            println!("📊 Progress");
            println!("   Level:          {} / {}", stats.current_level, stats.max_level);
            println!("   Completed:      {} ({}%)", stats.levels_completed_count, stats.progress_percentage);
            println!("   Balance:        {:.3}", stats.balance);
            println!("   Total earned:   {:.3}", stats.total_earned);
            println!("   Ads watched:    {}", stats.ads_watched_count);
            println!("   Avg attempts:   {:.1}", stats.average_attempts);
            if let Some(pending) = stats.pending_reward {
                println!("   Pending reward: {:.3}", pending);
            }
        }

        Commands::Leaderboard { player_id, name } => {
            let identity = player_id.zip(name).map(|(id, name)| PlayerIdentity::new(id, name));
            let entries = engine.leaderboard(identity.as_ref())?;
            println!("🏆 Leaderboard (this device only)");
            if entries.is_empty() {
                println!("   (empty)");
            }
            for (i, entry) in entries.iter().enumerate() {
                println!("   {:>2}. {:<20} {:.3}", i + 1, entry.display_name, entry.score);
            }
            if let Some(identity) = identity.as_ref() {
                println!("   Referral code: {}", referral_code(Some(identity)));
            }
        }

        Commands::Redeem { item, recipient } => {
            let order = engine.redeem(item, &recipient)?;
            println!("🛒 Order {} placed: {} for {}", order.id, order.item, order.recipient);
            println!("   Cost: {:.0}  Balance: {:.3}", order.points_cost, engine.state().balance);
        }

        Commands::Generate { .. } => {}
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stderr keeps stdout clean for --json output
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return GameConfig::from_env().context("Failed to load config from environment");
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = GameConfig::from_json(&content)?;
    config.validate()?;
    Ok(config)
}

fn print_level(level: &PuzzleLevel, locale: Locale, badge: Option<&str>) {
    println!("{} {} [{}]", level.family.icon(), level.title.get(locale), level.family);
    if let Some(badge) = badge {
        println!("   {}  Reward: {:.3}  ~{}s", badge, level.reward, level.estimated_time_seconds);
    }
    println!();
    println!("   {}", level.question.get(locale));
    println!();
    for (i, option) in level.options_for(locale).iter().enumerate() {
        println!("   {}) {}", i + 1, option);
    }
    if level.hint.is_some() {
        println!();
        println!("   (hint available: `puzzle hint`)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_redeem_and_locale() {
        let cli = Cli::try_parse_from(["puzzle", "--locale", "ar", "redeem", "usdt", "binance-1"])
            .unwrap();
        assert_eq!(cli.locale, Locale::Ar);
        assert!(matches!(
            cli.command,
            Commands::Redeem { item: ShopItem::UsdtExchange, .. }
        ));
    }

    #[test]
    fn test_config_file_overrides() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("game.json");
        std::fs::write(&path, r#"{"max_level": 40}"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.max_level, 40);
    }
}
