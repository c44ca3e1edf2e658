use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use dugout::config::{Config, LogConfig};
use dugout::dispatch::Route;
use dugout::{Listing, Player, PlayerService, PlayerStore, Pools, SqliteStore};

#[derive(Parser, Debug)]
#[command(name = "dugout")]
#[command(about = "Query a player catalog through a cached, paginated core")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/dugout/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// SQLite database to use instead of the configured one
  #[arg(short, long)]
  database: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List players; pages when --page or --size is given, otherwise returns all
  List {
    #[arg(long, allow_negative_numbers = true)]
    page: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    size: Option<i64>,
    /// Field to sort by (e.g. playerId, lastName, debut)
    #[arg(long)]
    sort_by: Option<String>,
    /// asc or desc
    #[arg(long)]
    direction: Option<String>,
    /// Run on the worker pools instead of the calling thread
    #[arg(long = "async")]
    run_async: bool,
  },
  /// Look up a single player
  Get {
    player_id: String,
    #[arg(long = "async")]
    run_async: bool,
  },
  /// Insert or replace a player from a JSON file ("-" for stdin)
  Save {
    file: PathBuf,
    #[arg(long = "async")]
    run_async: bool,
  },
  /// Bulk load a JSON array of players
  Import { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = Config::load(args.config.as_deref())?;
  let _log_guard = init_tracing(&config.log)?;

  let db_path = match args.database {
    Some(path) => path,
    None => config.database_path()?,
  };
  let store = SqliteStore::open(&db_path)
    .map_err(|e| eyre!("Failed to open player store {}: {}", db_path.display(), e))?;
  let store = Arc::new(store);
  info!(database = %db_path.display(), "opened player store");

  let pools = Pools::new(&config.pools)?;
  let service = PlayerService::new(store, pools, config.cache.fetch_delay());

  match args.command {
    Command::List {
      page,
      size,
      sort_by,
      direction,
      run_async,
    } => {
      let sort_by = sort_by.as_deref();
      let direction = direction.as_deref();
      let listing = if run_async {
        match Route::from_params(page, size) {
          Route::All => Listing::All(service.list_all_async().await?),
          Route::Page { page, size } => {
            Listing::Page(service.get_page_async(page, size, sort_by, direction).await?)
          }
        }
      } else {
        service.listing(page, size, sort_by, direction)?
      };
      print_json(&listing)?;
    }
    Command::Get {
      player_id,
      run_async,
    } => {
      let player = if run_async {
        service.get_by_id_async(&player_id).await?
      } else {
        service.get_by_id(&player_id)
      };
      match player {
        Some(player) => print_json(&player)?,
        None => return Err(eyre!("Player {} not found", player_id)),
      }
    }
    Command::Save { file, run_async } => {
      let player: Player = read_json(&file)?;
      let saved = if run_async {
        service.save_async(player).await?
      } else {
        service.save(&player)?
      };
      print_json(&saved)?;
    }
    Command::Import { file } => import(&service, &file)?,
  }

  Ok(())
}

fn import<S: PlayerStore>(service: &PlayerService<S>, file: &Path) -> Result<()> {
  let players: Vec<Player> = read_json(file)?;
  for player in &players {
    service
      .save(player)
      .map_err(|e| eyre!("Failed to import player {}: {}", player.player_id, e))?;
  }
  info!(count = players.len(), "imported players");
  println!("Imported {} players", players.len());
  Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
  let contents = if path == Path::new("-") {
    let mut buf = String::new();
    std::io::stdin()
      .read_to_string(&mut buf)
      .map_err(|e| eyre!("Failed to read stdin: {}", e))?;
    buf
  } else {
    std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read {}: {}", path.display(), e))?
  };

  serde_json::from_str(&contents).map_err(|e| eyre!("Failed to parse {}: {}", path.display(), e))
}

fn print_json(value: &impl Serialize) -> Result<()> {
  let json = serde_json::to_string_pretty(value)?;
  println!("{}", json);
  Ok(())
}

/// Install the global subscriber. RUST_LOG wins over the configured filter.
///
/// The returned guard flushes the file writer on drop and must outlive `main`'s work.
fn init_tracing(log: &LogConfig) -> Result<Option<WorkerGuard>> {
  let env_filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));

  match &log.directory {
    Some(dir) => {
      std::fs::create_dir_all(dir)
        .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;
      let appender = tracing_appender::rolling::daily(dir, "dugout.log");
      let (writer, guard) = tracing_appender::non_blocking(appender);
      tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| eyre!("Failed to install logger: {}", e))?;
      Ok(Some(guard))
    }
    None => {
      tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| eyre!("Failed to install logger: {}", e))?;
      Ok(None)
    }
  }
}
