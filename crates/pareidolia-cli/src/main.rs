//! `pareidolia`: log in, inspect the session, and browse events from a
//! terminal.
//!
//! The session is persisted to a JSON file, so `login` in one invocation
//! is picked up by `whoami` in the next.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pareidolia::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config and environment)
    #[arg(long)]
    api_url: Option<String>,

    /// Where the session is persisted
    #[arg(long, default_value = ".pareidolia-session.json")]
    session_file: PathBuf,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and persist the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Show who is logged in
    Whoami,
    /// End the session
    Logout,
    /// List published events
    Events {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    /// Show one event
    Event { id: i64 },
    /// Ask for a password reset mail
    ForgotPassword { email: String },
    /// Check whether the current session may enter a route
    Open { path: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), PareidoliaError> {
    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if config.storage_path.is_none() {
        config.storage_path = Some(cli.session_file);
    }

    let client = PareidoliaClient::builder().config(config).build()?;
    client.wait_until_ready().await;

    match cli.command {
        Command::Login { email, password } => {
            let identity = client.login(&email, &password).await?;
            println!("logged in as {} ({})", identity.display_name(), identity.role());
        }
        Command::Whoami => match client.current_identity() {
            Some(identity) => print_identity(&identity),
            None => println!("not logged in"),
        },
        Command::Logout => {
            client.logout().await?;
            println!("logged out");
        }
        Command::Events { page, size } => {
            let events = client
                .public()
                .events(Some(PageRequest::new(page, size)))
                .await?;
            for event in &events.content {
                print_event_line(event);
            }
            println!("{}", page_footer(&events));
        }
        Command::Event { id } => {
            let event = client.public().event(id).await?;
            print_event_line(&event);
            if !event.description.is_empty() {
                println!("\n{}", event.description);
            }
        }
        Command::ForgotPassword { email } => {
            client.access().forgot_password(&email).await?;
            println!("if {email} has an account, a reset mail is on its way");
        }
        Command::Open { path } => {
            let nav = client.navigate(&path).await?;
            if nav.was_redirected() {
                println!("{} -> {}", nav.requested, nav.redirects.join(" -> "));
            } else {
                println!("{} allowed", nav.path);
            }
        }
    }
    Ok(())
}

fn print_identity(identity: &Identity) {
    println!("{} <{}>", identity.display_name(), identity.email());
    println!("  id:   {}", identity.id());
    println!("  role: {}", identity.role());
    if let Some(presentation) = identity
        .as_promoter()
        .and_then(|p| p.presentation.as_deref())
    {
        println!("  bio:  {presentation}");
    }
}

fn page_footer<T>(page: &Page<T>) -> String {
    format!(
        "page {} of {} ({} events)",
        page.number.saturating_add(1),
        page.total_pages.max(1),
        page.total_elements
    )
}

fn print_event_line(event: &EventDto) {
    let id = event.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into());
    println!(
        "[{id:>4}] {} | {} {} @ {} ({})",
        event.title, event.date, event.time, event.place, event.state
    );
}
