use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use spotauth::{cli, config, error, session::Session};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in with Spotify in the browser
    Auth,

    /// Remove the stored credential
    Logout,

    /// Show the state of the stored token
    Status(StatusOptions),

    /// Show the profile of the signed-in user
    Me,

    /// List saved albums
    Albums(AlbumsOptions),

    /// Show an album and its tracks
    Album(AlbumOptions),

    /// Search tracks, albums, artists and playlists
    Search(SearchOptions),

    /// List, inspect or create playlists
    Playlists(PlaylistsOptions),

    /// Show new album releases
    Releases,

    /// Show featured playlists
    Featured,

    /// List browse categories or the playlists of one
    Categories(CategoriesOptions),

    /// List genres usable as recommendation seeds
    Genres,

    /// Recommend tracks for up to five genres
    Recommend(RecommendOptions),

    /// Show the currently playing track
    NowPlaying,

    /// Start or resume playback
    Play(PlayOptions),

    /// Pause playback
    Pause,

    /// Skip to the next track
    Next,

    /// Go back to the previous track
    Previous,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct StatusOptions {
    /// Refresh the token first if it is stale
    #[clap(long)]
    refresh: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct AlbumsOptions {
    /// Save the album with this id instead of listing
    #[clap(long)]
    save: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AlbumOptions {
    /// Spotify id of the album
    id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Search terms; field filters like artist:name are passed through
    #[clap(required = true, num_args = 1..)]
    query: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CategoriesOptions {
    /// Show the playlists of this category
    id: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct RecommendOptions {
    /// Seed genres, see the genres command
    #[clap(required = true, num_args = 1..=5)]
    genres: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Show the tracks of one playlist
    #[clap(long, conflicts_with = "create")]
    id: Option<String>,

    /// Create a private playlist with this name
    #[clap(long)]
    create: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlayOptions {
    /// Track URIs to play; resumes the current playback when omitted
    uris: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }
    let settings = match config::Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Invalid configuration: {}", e),
    };
    let session = match Session::open(settings).await {
        Ok(session) => session,
        Err(e) => error!("Cannot open session: {}", e),
    };

    match cli.command {
        Command::Auth => cli::auth(&session).await,
        Command::Logout => cli::logout(&session).await,
        Command::Status(opt) => cli::status(&session, opt.refresh).await,
        Command::Me => cli::me(&session).await,
        Command::Albums(opt) => cli::albums(&session, opt.save).await,
        Command::Album(opt) => cli::album(&session, &opt.id).await,
        Command::Search(opt) => cli::search(&session, &opt.query.join(" ")).await,
        Command::Playlists(opt) => cli::playlists(&session, opt.id, opt.create).await,
        Command::Releases => cli::releases(&session).await,
        Command::Featured => cli::featured(&session).await,
        Command::Categories(opt) => cli::categories(&session, opt.id).await,
        Command::Genres => cli::genres(&session).await,
        Command::Recommend(opt) => cli::recommend(&session, opt.genres).await,
        Command::NowPlaying => cli::now_playing(&session).await,
        Command::Play(opt) => cli::play(&session, opt.uris).await,
        Command::Pause => cli::pause(&session).await,
        Command::Next => cli::next(&session).await,
        Command::Previous => cli::previous(&session).await,
        Command::Completions(_) => {}
    }
}
