use std::path::PathBuf;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use spotreq::{cli, config, error, utils};

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
    /// Send a request to the Spotify Web API
    Request(RequestOptions),

    /// Print the authorization URL for the configured scopes
    AuthorizeUrl(AuthorizeUrlOptions),

    /// Exchange an authorization code for a token
    Exchange(ExchangeOptions),

    /// Refresh the configured access token
    Refresh,

    /// Show configuration and token status
    Info,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method (GET, POST, PUT, DELETE)
    pub method: String,

    /// Absolute URL or path relative to the API base (e.g. /albums/{id})
    pub url: String,

    /// Query parameter as key=value; repeat a key to send a list
    #[clap(
        long = "param",
        value_parser = utils::parse_key_value,
        action = ArgAction::Append,
        num_args = 1
    )]
    pub params: Vec<(String, String)>,

    /// JSON request body
    #[clap(long, conflicts_with = "image")]
    pub body: Option<String>,

    /// JPEG file sent as the request body
    #[clap(long)]
    pub image: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct AuthorizeUrlOptions {
    /// Opaque state echoed back on the redirect
    #[clap(long)]
    pub state: Option<String>,

    /// Skip the consent dialog if the user already approved the scopes
    #[clap(long)]
    pub no_dialog: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ExchangeOptions {
    /// The `code` query parameter of the authorization redirect
    pub code: String,
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

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Request(opt) => {
            cli::request(opt.method, opt.url, opt.params, opt.body, opt.image).await
        }
        Command::AuthorizeUrl(opt) => cli::authorize_url(!opt.no_dialog, opt.state),
        Command::Exchange(opt) => cli::exchange(opt.code).await,
        Command::Refresh => cli::refresh().await,
        Command::Info => {
            cli::info();
            Ok(())
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{}", e);
    }
}
