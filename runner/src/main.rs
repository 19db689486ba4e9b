mod broadcaster;
mod config;
mod input;
mod session;
mod text_frame;

use clap::Parser;
use snake_engine::{log, logger};
use tokio::sync::mpsc;

use broadcaster::ConsoleBroadcaster;
use config::{ConfigManager, RunnerConfig, Validate};
use session::{Session, SessionSettings};

#[derive(Parser)]
#[command(name = "snake_runner")]
struct Args {
    /// YAML config file; defaults are used when it does not exist
    #[arg(long, default_value = "snake_runner.yaml")]
    config: String,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    players: Option<u32>,

    /// Print the board to stdout after every tick
    #[arg(long)]
    render: bool,

    #[arg(long)]
    exit_on_game_over: bool,

    #[arg(long)]
    use_log_prefix: bool,

    /// Write the default config to `--config` and exit
    #[arg(long)]
    write_default_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Runner".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config_manager: ConfigManager<_, RunnerConfig> = ConfigManager::from_yaml_file(&args.config);

    if args.write_default_config {
        config_manager.set_config(&RunnerConfig::default())?;
        log!("Default config written to {}", args.config);
        return Ok(());
    }

    let mut config = config_manager.get_config()?;
    if let Some(players) = args.players {
        config.player_count = players;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    config.validate()?;

    let seed = config.seed.unwrap_or_else(rand::random::<u64>);
    config.seed = Some(seed);

    log!(
        "Starting {}x{} board for {} player(s), tick {} ms, seed {}",
        config.field_width,
        config.field_height,
        config.player_count,
        config.tick_interval_ms,
        seed
    );
    log!("Press any key to start. Type 'new' for a new game, 'quit' to exit");

    let settings = SessionSettings::from_config(&config, args.exit_on_game_over);
    let session = Session::new(settings, ConsoleBroadcaster::new(args.render))?;

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    input::spawn_stdin_reader(command_tx);

    let summaries = session.run(command_rx).await?;

    log!("Played {} game(s)", summaries.len());
    if let Some(best) = summaries.iter().map(|summary| summary.best_score).max() {
        log!("Best score: {}", best);
    }

    Ok(())
}
