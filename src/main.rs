mod config;
mod http_server;
mod logging;
mod ports;
mod services;
mod tidal_rs;

#[cfg(test)]
mod test_utils;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use futures::StreamExt;

use crate::{
    config::Config,
    http_server::{app::HttpServerConfig, state::AppState},
    logging::setup_logging,
    ports::content_provider::{ContentProvider, ContentRef},
    services::{
        merge::{MergeEvent, MergeJob, MergeOptions, MergeRequest, MergeService, job::KEEPALIVE_INTERVAL},
        retry::RetryingProvider,
        tidal::client::TidalHttpAdapter,
    },
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "PLAYLIST_MERGER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Console log level (default: info)
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level (default: debug)
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "PLAYLIST_MERGER_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn is_directory(s: &str) -> Result<PathBuf, String> {
    let p: PathBuf = s.into();
    if p.is_dir() {
        Ok(p)
    } else {
        Err(format!("`{}` is not an existing directory", s))
    }
}

/// Parses `TYPE:ID`, e.g. `playlist:1f2e...` or `album:album_123`.
fn parse_content(s: &str) -> Result<ContentRef, String> {
    let (kind, id) = s
        .split_once(':')
        .ok_or_else(|| format!("`{}` is not in TYPE:ID form", s))?;
    if id.is_empty() {
        return Err(format!("`{}` has an empty id", s));
    }
    let kind = kind.parse().map_err(|e| format!("{}", e))?;
    Ok(ContentRef::new(id, kind))
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// The port to run the server on
        #[arg(short, long, default_value = "8000", env = "PORT")]
        port: u16,

        /// Directory of a built web client to serve alongside the API
        #[arg(long, value_parser = is_directory, env = "PLAYLIST_MERGER_STATIC_DIR")]
        static_dir: Option<PathBuf>,
    },
    /// Merge playlists, albums, mixes or favorites into a new playlist
    Merge {
        /// Content to merge as TYPE:ID, in priority order
        #[arg(short = 'i', long = "content", value_parser = parse_content, required = true, num_args = 1..)]
        content: Vec<ContentRef>,

        /// Name of the playlist to create
        #[arg(short, long)]
        name: String,

        /// Also drop repeats of a track within a single source
        #[arg(long)]
        keep_it_tidy: bool,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

fn build_provider(config: &Config) -> Result<Arc<dyn ContentProvider>> {
    let session = config
        .tidal_session()
        .wrap_err("Tidal is not configured")?;
    log::debug!(
        "Using Tidal API at {} (country {})",
        session.base_url,
        session.country_code
    );
    Ok(Arc::new(RetryingProvider::new(TidalHttpAdapter::new(
        session,
    ))))
}

async fn run_merge(
    config: &Config,
    content: Vec<ContentRef>,
    name: String,
    keep_it_tidy: bool,
) -> Result<()> {
    let request = MergeRequest {
        content_ids: content.iter().map(|c| c.id.clone()).collect(),
        content_types: content.iter().map(|c| c.kind.as_str().to_string()).collect(),
        name,
        keep_it_tidy,
    };
    let sources = request.validate(config.merge.max_playlists)?;

    let provider = build_provider(config)?;
    let service = Arc::new(MergeService::new(
        provider,
        MergeOptions::from(&config.merge),
    ));

    let mut events = std::pin::pin!(
        MergeJob::spawn(
            service,
            sources,
            request.playlist_name().to_string(),
            keep_it_tidy,
        )
        .into_stream(KEEPALIVE_INTERVAL)
    );

    while let Some(event) = events.next().await {
        match event {
            MergeEvent::Progress(update) => {
                println!("[{:>3.0}%] {}", update.progress, update.message);
            }
            MergeEvent::Ping { .. } => log::debug!("Merge still running"),
            MergeEvent::Complete { result, .. } => {
                let json = serde_json::to_string_pretty(&result)
                    .wrap_err("Failed to serialize merge result")?;
                println!("{}", json);
            }
            MergeEvent::Error { error } => return Err(eyre!(error)),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_logging(args.log_level, args.log_file.clone(), args.log_file_level)?;

    log::debug!("Playlist merger starting");

    match args.command {
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                log::info!("Default config at {}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
        Commands::Serve { port, static_dir } => {
            let config = Config::load(args.config.as_deref())
                .wrap_err("Failed to load playlist-merger config")?;
            let provider = build_provider(&config)?;
            let app_state = Arc::new(AppState::new(provider, config.merge.clone()));

            log::info!("Starting HTTP server on port: {}", port);
            http_server::app::start(HttpServerConfig { port, static_dir }, app_state).await?;
        }
        Commands::Merge {
            content,
            name,
            keep_it_tidy,
        } => {
            let config = Config::load(args.config.as_deref())
                .wrap_err("Failed to load playlist-merger config")?;
            run_merge(&config, content, name, keep_it_tidy).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::content_provider::ContentType;

    #[test]
    fn test_parse_content() {
        assert_eq!(
            parse_content("album:album_42").unwrap(),
            ContentRef::new("album_42", ContentType::Album)
        );
        assert_eq!(
            parse_content("Favorites:my-favorites").unwrap(),
            ContentRef::new("my-favorites", ContentType::Favorites)
        );
        assert!(parse_content("playlist").is_err());
        assert!(parse_content("playlist:").is_err());
        assert!(parse_content("artist:1").is_err());
    }

    #[test]
    fn test_cli_parses_merge_command() {
        let args = Args::try_parse_from([
            "playlist-merger",
            "merge",
            "-i",
            "playlist:p1",
            "mix:m1",
            "--name",
            "Weekend",
            "--keep-it-tidy",
        ])
        .unwrap();

        match args.command {
            Commands::Merge {
                content,
                name,
                keep_it_tidy,
            } => {
                assert_eq!(content.len(), 2);
                assert_eq!(content[1], ContentRef::new("m1", ContentType::Mix));
                assert_eq!(name, "Weekend");
                assert!(keep_it_tidy);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
