use clap::{ArgAction, Parser, Subcommand};
use fudidoflix_core::catalog::BrowseType;
use fudidoflix_core::sorte::GridSort;
use fudidoflix_models::{MediaId, MediaKind};

mod commands;
mod context;
mod logging;
mod output;
mod render;
mod ui;

use commands::{catalog, config, inbox, library, sorte, title};
use context::AppContext;

#[derive(Parser)]
#[command(name = "fudidoflix")]
#[command(about = "FudidoFlix - browse TMDB, keep your watch history and let luck pick tonight's title")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Home page: a featured title and the category rows
    Home {
        /// Titles shown per row
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Browse the movie, series or anime grid
    #[command(long_about = "Browse a discover grid. Use --category for a preset (genre, streaming service, studio, era) and --sort for the ordering; both accept the names shown by --list-filters.")]
    Browse {
        /// movie, tv or anime
        browse_type: BrowseType,

        #[arg(long)]
        sort: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Consecutive pages to load, starting at --page
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Print the available categories and orderings
        #[arg(long, action = ArgAction::SetTrue)]
        list_filters: bool,
    },
    /// Search movies and series
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show the details of a title
    Details { kind: MediaKind, id: MediaId },
    /// Play a movie or an episode
    #[command(long_about = "Start playback and print the embed URL. Playing records the title in the watch history and in continue watching, marks it watched and removes it from my list.")]
    Play {
        kind: MediaKind,
        id: MediaId,

        #[arg(long)]
        season: Option<u32>,

        #[arg(long)]
        episode: Option<u32>,
    },
    /// Play the episode after the last one played
    Next,
    /// Print the trailer of a title
    Trailer { kind: MediaKind, id: MediaId },
    /// List the episodes of a series season
    #[command(long_about = "List the episodes of a season with their watched marks. When the series is the one in the player, the list comes from the player's episode panel and --play switches to the chosen episode.")]
    Episodes {
        id: MediaId,

        #[arg(long)]
        season: Option<u32>,

        /// Play this episode of the season
        #[arg(long)]
        play: Option<u32>,
    },
    /// Watch history
    History {
        #[command(subcommand)]
        cmd: Option<HistoryCommands>,
    },
    /// Continue watching row
    Continue {
        #[command(subcommand)]
        cmd: Option<HistoryCommands>,
    },
    /// My list
    List {
        #[command(subcommand)]
        cmd: Option<ListCommands>,
    },
    /// Mark a movie or an episode as watched
    Watched {
        kind: MediaKind,
        id: MediaId,

        #[arg(long)]
        season: Option<u32>,

        #[arg(long)]
        episode: Option<u32>,
    },
    /// Notification inbox
    Inbox {
        #[command(subcommand)]
        cmd: Option<InboxCommands>,
    },
    /// Sorte: roulette, surprise pick and discovery
    Sorte {
        #[command(subcommand)]
        cmd: SorteCommands,
    },
    /// Configure the API key and settings
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List the entries, most recent first
    List,
    /// Remove one entry
    Remove { kind: MediaKind, id: MediaId },
    /// Remove every entry
    Clear,
}

#[derive(Subcommand)]
pub enum ListCommands {
    Show,
    Add { kind: MediaKind, id: MediaId },
    Remove { kind: MediaKind, id: MediaId },
    Toggle { kind: MediaKind, id: MediaId },
    Clear,
}

#[derive(Subcommand)]
pub enum InboxCommands {
    /// Show the notifications
    Show,
    /// Look for new episodes (at most once every check interval)
    Check,
    /// Remove one notification
    Dismiss { unique_id: String },
    /// Remove every notification
    Clear,
    /// Keep checking in the background, logging to a file
    #[command(long_about = "Run the inbox check in a loop, sleeping until the check interval has passed. Logs are written to a daily-rotated file in the log directory.")]
    Watch,
}

#[derive(Subcommand)]
pub enum SorteCommands {
    /// Pick a random popular title
    Surprise {
        /// Restrict to a genre id (see 'sorte genres')
        #[arg(long)]
        genre: Option<u32>,
    },
    /// Movie and series genres
    Genres,
    /// The roulette wheel
    Roulette {
        #[command(subcommand)]
        cmd: Option<RouletteCommands>,
    },
    /// Featured studios
    Studios,
    /// Most popular movies of a studio
    Studio {
        id: MediaId,

        #[arg(long, default_value = "popularity")]
        sort: GridSort,
    },
    /// Everything a person worked on
    Actor {
        id: MediaId,

        #[arg(long, default_value = "popularity")]
        sort: GridSort,
    },
    /// Popular people, or people and studios matching --query
    People {
        #[arg(long)]
        query: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum RouletteCommands {
    List,
    /// Find titles to put on the wheel
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    Add { kind: MediaKind, id: MediaId },
    Remove { id: MediaId },
    /// Spin the wheel
    Spin,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show,
    /// Write a configuration file with the defaults
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Store the TMDB API key
    SetApiKey {
        /// Key to store (if not provided, will prompt)
        #[arg(long)]
        key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let watching = matches!(cli.command, Commands::Inbox { cmd: Some(InboxCommands::Watch) });
    if watching {
        let paths = fudidoflix_config::PathManager::default();
        logging::init_file_logging(cli.verbose, cli.quiet, paths.log_dir(), paths.log_file_name())
            .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    } else {
        logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    }

    let output = output::Output::new(cli.output, cli.quiet);

    if let Commands::Config { cmd } = cli.command {
        return config::run_config(cmd.unwrap_or(ConfigCommands::Show), &output).await;
    }

    let ctx = AppContext::load()?;

    match cli.command {
        Commands::Home { limit } => catalog::run_home(&ctx, limit, &output).await,
        Commands::Browse {
            browse_type,
            sort,
            category,
            page,
            pages,
            list_filters,
        } => {
            if list_filters {
                catalog::list_filters(browse_type, &output);
                Ok(())
            } else {
                catalog::run_browse(&ctx, browse_type, sort, category, page, pages, &output).await
            }
        }
        Commands::Search { query } => catalog::run_search(&ctx, &query.join(" "), &output).await,
        Commands::Details { kind, id } => title::run_details(&ctx, kind, id, &output).await,
        Commands::Play {
            kind,
            id,
            season,
            episode,
        } => title::run_play(&ctx, kind, id, season, episode, &output).await,
        Commands::Next => title::run_next(&ctx, &output).await,
        Commands::Trailer { kind, id } => title::run_trailer(&ctx, kind, id, &output).await,
        Commands::Episodes { id, season, play } => title::run_episodes(&ctx, id, season, play, &output).await,
        Commands::History { cmd } => {
            library::run_history(&ctx, cmd.unwrap_or(HistoryCommands::List), &output)
        }
        Commands::Continue { cmd } => {
            library::run_continue(&ctx, cmd.unwrap_or(HistoryCommands::List), &output)
        }
        Commands::List { cmd } => library::run_list(&ctx, cmd.unwrap_or(ListCommands::Show), &output).await,
        Commands::Watched {
            kind,
            id,
            season,
            episode,
        } => library::run_watched(&ctx, kind, id, season, episode, &output),
        Commands::Inbox { cmd } => inbox::run_inbox(&ctx, cmd.unwrap_or(InboxCommands::Show), &output).await,
        Commands::Sorte { cmd } => sorte::run_sorte(&ctx, cmd, &output).await,
        Commands::Config { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_play_parses_episode_flags() {
        let cli = Cli::try_parse_from(["fudidoflix", "play", "tv", "1399", "--season", "2", "--episode", "3"]).unwrap();
        match cli.command {
            Commands::Play { kind, id, season, episode } => {
                assert_eq!(kind, MediaKind::Tv);
                assert_eq!(id, 1399);
                assert_eq!((season, episode), (Some(2), Some(3)));
            }
            _ => panic!("expected play"),
        }
    }

    #[test]
    fn test_episodes_play_flag() {
        let cli = Cli::try_parse_from(["fudidoflix", "episodes", "1399", "--season", "2", "--play", "5"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Episodes { id: 1399, season: Some(2), play: Some(5) }
        ));
        let cli = Cli::try_parse_from(["fudidoflix", "browse", "movie", "--pages", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Browse { page: 1, pages: 3, .. }));
    }

    #[test]
    fn test_rejects_unknown_browse_type() {
        assert!(Cli::try_parse_from(["fudidoflix", "browse", "podcast"]).is_err());
        assert!(Cli::try_parse_from(["fudidoflix", "browse", "anime", "--page", "2"]).is_ok());
    }

    #[test]
    fn test_global_output_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["fudidoflix", "sorte", "studio", "41077", "--sort", "rating", "--output", "json"])
            .unwrap();
        assert_eq!(cli.output, output::OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Commands::Sorte { cmd: SorteCommands::Studio { id: 41077, sort: GridSort::Rating } }
        ));
    }
}
