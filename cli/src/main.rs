//! Terminal client for the NanoLink backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Drives the same `nanolink` session store, gateway and view controllers as
//! the browser SPA, over a `reqwest` transport. The bearer token lives in a
//! file so consecutive invocations share one session; every command that
//! needs it restores the session first.

mod output;
mod token_file;
mod transport;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use nanolink::analytics::{self, DetailsOutcome};
use nanolink::auth_flow::{self, LoginForm, RegisterForm, ResetForm};
use nanolink::bootstrap::{self, BootstrapOutcome};
use nanolink::links::{self, LinkForm, Pager};
use nanolink::social::{self, SocialOutcome};
use nanolink::{ApiClient, ApiError, ClientConfig, ConfigError, SessionStore};
use tracing_subscriber::EnvFilter;

use crate::output::print_lines;
use crate::token_file::FileStorage;
use crate::transport::ReqwestTransport;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("stored session is no longer valid; log in again")]
    SessionExpired,
    #[error("{0}")]
    Rejected(String),
}

#[derive(Parser, Debug)]
#[command(name = "nanolink-cli", about = "NanoLink URL shortener CLI")]
struct Cli {
    #[arg(long, env = "NANOLINK_BACKEND_URL", default_value = nanolink::config::DEFAULT_BACKEND_URL)]
    base_url: String,

    #[arg(long, env = "NANOLINK_TOKEN_FILE", default_value = ".nanolink-token")]
    token_file: PathBuf,

    #[arg(long, env = "NANOLINK_PAGE_SIZE")]
    page_size: Option<u32>,

    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Log requests and session transitions to stderr.
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "NANOLINK_PASSWORD")]
        password: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "NANOLINK_PASSWORD")]
        password: String,
    },
    Logout,
    /// Validate the stored token and show the signed-in user.
    Whoami,
    /// Print the URL that starts the Google sign-in flow.
    GoogleUrl,
    /// Finish a Google sign-in with the token from the callback URL.
    SocialAuth {
        /// Either the bare token or the callback query string.
        token_or_query: String,
    },
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    ResetPassword {
        reset_token: String,
        #[arg(long, env = "NANOLINK_PASSWORD")]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    Links(LinksCommand),
    /// Show analytics for one link.
    Stats {
        id: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(Args, Debug)]
struct LinksCommand {
    #[command(subcommand)]
    command: LinksSubcommand,
}

#[derive(Subcommand, Debug)]
enum LinksSubcommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Create {
        url: String,
        #[arg(long)]
        alias: Option<String>,
    },
    Delete {
        id: String,
        /// Dashboard page the link is listed on.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Rename {
        id: String,
        new_alias: String,
    },
    /// Print the public short URL for a code.
    Share {
        code: String,
    },
}

type Client = ApiClient<ReqwestTransport>;

struct CliContext {
    config: ClientConfig,
    client: Client,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = ClientConfig::from_backend_url(&cli.base_url)?;
    if let Some(page_size) = cli.page_size {
        config = config.with_page_size(page_size)?;
    }
    let transport = ReqwestTransport::new(Duration::from_secs(cli.timeout_secs))?;
    let session = SessionStore::new(FileStorage::new(&cli.token_file));
    let client = ApiClient::new(&config, transport, session);
    let ctx = CliContext { config, client };

    match cli.command {
        Command::Register { name, email, password } => run_register(&ctx, name, email, password).await,
        Command::Login { email, password } => run_login(&ctx, email, password).await,
        Command::Logout => {
            run_logout(&ctx);
            Ok(())
        }
        Command::Whoami => run_whoami(&ctx).await,
        Command::GoogleUrl => {
            println!("{}", ctx.client.google_auth_url());
            Ok(())
        }
        Command::SocialAuth { token_or_query } => run_social_auth(&ctx, &token_or_query).await,
        Command::ForgotPassword { email } => {
            let message = auth_flow::forgot_password(&ctx.client, &email).await?;
            println!("{message}");
            Ok(())
        }
        Command::ResetPassword { reset_token, password, confirm_password } => {
            let form = ResetForm { password, confirm_password };
            let message = auth_flow::reset_password(&ctx.client, &reset_token, &form).await?;
            println!("{message}");
            Ok(())
        }
        Command::Links(command) => run_links(&ctx, command).await,
        Command::Stats { id, page } => run_stats(&ctx, &id, page).await,
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "nanolink=debug,nanolink_cli=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with_writer(io::stderr)
        .init();
}

// =============================================================================
// AUTH
// =============================================================================

async fn run_register(ctx: &CliContext, name: String, email: String, password: String) -> Result<(), CliError> {
    let form = RegisterForm { name, email, password };
    let message = auth_flow::register(&ctx.client, &form).await?;
    println!("{message}");
    Ok(())
}

async fn run_login(ctx: &CliContext, email: String, password: String) -> Result<(), CliError> {
    let form = LoginForm { email, password };
    let user = match auth_flow::login(&ctx.client, &form).await? {
        Some(user) => user,
        // Login responses may omit the profile; fetch it with the new token.
        None => ctx.client.current_user().await?,
    };
    println!("Logged in as {}", output::user_line(&user));
    Ok(())
}

fn run_logout(ctx: &CliContext) {
    if auth_flow::logout(&ctx.client) {
        println!("Logged out");
    } else {
        println!("Not logged in");
    }
}

async fn run_whoami(ctx: &CliContext) -> Result<(), CliError> {
    match bootstrap::bootstrap(&ctx.client).await {
        BootstrapOutcome::Restored(user) => println!("{}", output::user_line(&user)),
        BootstrapOutcome::AlreadyLoaded => {
            if let Some(user) = ctx.client.session().user() {
                println!("{}", output::user_line(&user));
            }
        }
        BootstrapOutcome::Anonymous => println!("Not logged in"),
        BootstrapOutcome::Rejected => return Err(CliError::SessionExpired),
    }
    Ok(())
}

async fn run_social_auth(ctx: &CliContext, token_or_query: &str) -> Result<(), CliError> {
    let token = if token_or_query.contains("token=") {
        social::token_from_query(token_or_query.rsplit('?').next().unwrap_or(token_or_query))
    } else {
        Some(token_or_query.trim().to_owned()).filter(|t| !t.is_empty())
    };

    match social::complete_with_token(&ctx.client, token).await {
        SocialOutcome::SignedIn(user) => {
            println!("Logged in with Google as {}", output::user_line(&user));
            Ok(())
        }
        SocialOutcome::MissingToken => Err(CliError::Rejected("Google login failed: no token supplied".to_owned())),
        SocialOutcome::ProfileRejected(e) => Err(CliError::Rejected(e.user_message("Google login failed"))),
    }
}

/// Restore the file-backed session before a protected call.
async fn require_session(ctx: &CliContext) -> Result<(), CliError> {
    match bootstrap::bootstrap(&ctx.client).await {
        BootstrapOutcome::Restored(_) | BootstrapOutcome::AlreadyLoaded => Ok(()),
        BootstrapOutcome::Anonymous => Err(ApiError::NotAuthenticated.into()),
        BootstrapOutcome::Rejected => Err(CliError::SessionExpired),
    }
}

// =============================================================================
// LINKS
// =============================================================================

async fn run_links(ctx: &CliContext, command: LinksCommand) -> Result<(), CliError> {
    if let LinksSubcommand::Share { code } = &command.command {
        println!("{}", links::share_url(&ctx.config.backend_url, code));
        return Ok(());
    }
    require_session(ctx).await?;

    let public_base = ctx.config.backend_url.as_str();
    match command.command {
        LinksSubcommand::List { page } => {
            let mut pager = pager_at(ctx, page);
            let stats = links::load_page(&ctx.client, &mut pager).await?;
            print_lines(&output::dashboard_lines(public_base, &stats, &pager));
        }
        LinksSubcommand::Create { url, alias } => {
            let form = LinkForm { url, custom_alias: alias.unwrap_or_default() };
            let created = links::create(&ctx.client, &form).await?;
            println!("{}", links::LINK_CREATED);
            if let Some(short_url) = created.short_url {
                println!("{short_url}");
            }
        }
        LinksSubcommand::Delete { id, page } => {
            let mut pager = pager_at(ctx, page);
            let current = links::load_page(&ctx.client, &mut pager).await?;
            let stats = links::delete_and_refetch(&ctx.client, &mut pager, &id, current.links.len()).await?;
            println!("{}", links::LINK_DELETED);
            print_lines(&output::dashboard_lines(public_base, &stats, &pager));
        }
        LinksSubcommand::Rename { id, new_alias } => {
            let alias = links::rename(&ctx.client, &id, &new_alias).await?;
            println!("{}: {}", links::LINK_RENAMED, links::share_url(public_base, &alias));
        }
        LinksSubcommand::Share { .. } => {}
    }
    Ok(())
}

fn pager_at(ctx: &CliContext, page: u32) -> Pager {
    let mut pager = Pager::new(ctx.config.page_size);
    pager.page = page.max(1);
    pager
}

async fn run_stats(ctx: &CliContext, id: &str, page: u32) -> Result<(), CliError> {
    require_session(ctx).await?;
    match analytics::load(&ctx.client, id, page.max(1), ctx.config.page_size).await {
        DetailsOutcome::Loaded(data) => {
            print_lines(&output::analytics_lines(&ctx.config.backend_url, &data));
            Ok(())
        }
        DetailsOutcome::Leave { error, .. } => Err(error.into()),
    }
}
