use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use medialist::anilist::AnilistApi;
use medialist::api::CachedClient;
use medialist::codec::Codec;
use medialist::config::{Config, LogConfig};
use medialist::models::{AnyId, Identifier, MediaKind, SiteType};

#[derive(Parser, Debug)]
#[command(name = "medialist")]
#[command(about = "Anime and manga list data from AniList, cached locally")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/medialist/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Catalog data of one anime or manga
  Media {
    /// anime or manga
    kind: MediaKind,
    id: u32,
    /// The id is a MyAnimeList id
    #[arg(long)]
    mal: bool,
    /// Ignore cached data
    #[arg(long)]
    fresh: bool,
  },
  /// One entry of a user's list
  Entry {
    /// anime or manga
    kind: MediaKind,
    id: u32,
    username: String,
    /// The id is a MyAnimeList id
    #[arg(long)]
    mal: bool,
    /// Ignore cached data
    #[arg(long)]
    fresh: bool,
  },
  /// A user's whole list
  List {
    /// anime or manga
    kind: MediaKind,
    username: String,
  },
}

fn any_id(id: u32, mal: bool) -> AnyId {
  if mal {
    Identifier::new(SiteType::MyAnimeList, id).into()
  } else {
    id.into()
  }
}

fn print<T: Codec>(value: Option<&T>) -> Result<()> {
  match value {
    Some(value) => println!("{}", value.to_json()?),
    None => eprintln!("Not found"),
  }
  Ok(())
}

/// Log to stderr, and to a daily file when a log directory is configured.
/// The returned guard flushes the file writer when dropped.
fn init_tracing(log: &LogConfig) -> Option<WorkerGuard> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("medialist=info"));

  let (file_layer, guard) = match &log.directory {
    Some(directory) => {
      let appender = tracing_appender::rolling::daily(directory, "medialist.log");
      let (writer, guard) = tracing_appender::non_blocking(appender);
      let layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false);
      (Some(layer), Some(guard))
    }
    None => (None, None),
  };

  tracing_subscriber::registry()
    .with(filter)
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .with(file_layer)
    .init();

  guard
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let config = Config::load(args.config.as_deref())?;
  let _guard = init_tracing(&config.log);

  let store = config.cache.open_store()?;
  let api = AnilistApi::from_config(&config.anilist)?;
  let client = CachedClient::new(api, store);

  match args.command {
    Command::Media { kind, id, mal, fresh } => {
      let media = client.get_media(kind, any_id(id, mal), fresh).await?;
      print(media.as_ref())?;
    }
    Command::Entry {
      kind,
      id,
      username,
      mal,
      fresh,
    } => {
      let entry = client.get_list_entry(kind, any_id(id, mal), &username, fresh).await?;
      print(entry.as_ref())?;
    }
    Command::List { kind, username } => {
      for entry in client.get_list(kind, &username).await? {
        if !entry.is_valid_entry() {
          warn!(title = entry.media().title().get(), "Inconsistent list entry");
        }
        println!("{}", entry.to_json()?);
      }
    }
  }

  client.store().write()?;
  Ok(())
}
