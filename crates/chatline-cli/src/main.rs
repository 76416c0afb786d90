//! Chatline: terminal client for the chat backend.
//!
//! Without a subcommand, opens the interactive chat UI. `status`, `ask`
//! and `key` run once and exit.

mod config;
mod tui;
mod ui;

use std::fs::{self, File};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chatline_sdk::{ChatApiClient, ChatBackend};
use chatline_widget::{ChatWidget, SendReport};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::ClientArgs;
use crate::tui::EventHandler;
use crate::ui::chat::ChatApp;
use crate::ui::AppController;

/// Typing indicator animation rate.
const TICK_RATE_MS: u64 = 250;

#[derive(Parser, Debug)]
#[command(name = "chatline")]
#[command(author, version, about = "Terminal chat client", long_about = None)]
struct Cli {
    #[command(flatten)]
    client: ClientArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive chat (default)
    Tui,
    /// Print the backend status line once
    Status,
    /// Send one message and print the conversation
    Ask {
        /// Message text; several words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Manage the backend's API key (localhost backends only)
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Subcommand, Debug)]
enum KeyAction {
    /// Install an API key
    Set {
        /// The key
        api_key: String,
    },
    /// Remove the API key
    Clear,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui);
    let client = ChatApiClient::new(cli.client.base_url.clone());

    match command {
        Command::Tui => {
            init_file_logging(&cli.client)?;
            run_tui(&cli.client, client).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Status => {
            init_stderr_logging();
            let mut widget = ChatWidget::new(cli.client.widget_config());
            widget.load_status(&client).await;
            println!("{}", widget.status_label());
            Ok(if widget.status_mode().is_some() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Ask { message } => {
            init_stderr_logging();
            ask(&cli.client, &client, &message.join(" ")).await
        }
        Command::Key { action } => {
            init_stderr_logging();
            let status = match action {
                KeyAction::Set { api_key } => client
                    .set_api_key(&api_key)
                    .await
                    .context("failed to set API key")?,
                KeyAction::Clear => client
                    .clear_api_key()
                    .await
                    .context("failed to clear API key")?,
            };
            println!("{}: key set = {}", status.status, status.gemini_key_set);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn ask(args: &ClientArgs, backend: &ChatApiClient, message: &str) -> Result<ExitCode> {
    let mut widget = ChatWidget::new(args.widget_config());
    widget.input_mut().set_text(message);
    let report = widget.send(backend).await;

    for m in widget.log().messages() {
        println!("{} {}", m.role.avatar(), m.text);
    }

    Ok(match report {
        SendReport::Replied => ExitCode::SUCCESS,
        SendReport::Skipped(reason) => {
            eprintln!("nothing sent: {reason}");
            ExitCode::FAILURE
        }
        SendReport::Failed { .. } => ExitCode::FAILURE,
    })
}

async fn run_tui(args: &ClientArgs, client: ChatApiClient) -> Result<()> {
    info!(base_url = %client.base_url(), "starting interactive chat");

    let mut events = EventHandler::new(TICK_RATE_MS);
    let mut app = ChatApp::new(args.widget_config(), Arc::new(client), events.get_sender());
    app.load_status();

    let mut terminal = tui::init().context("failed to initialise terminal")?;
    let result = event_loop(&mut terminal, &mut events, &mut app).await;
    tui::restore().context("failed to restore terminal")?;
    result
}

async fn event_loop<B: ChatBackend + 'static>(
    terminal: &mut tui::Tui,
    events: &mut EventHandler,
    app: &mut ChatApp<B>,
) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        let Some(action) = events.next_async().await else {
            return Ok(());
        };
        app.update(action);
        if app.should_quit() {
            info!("quit requested");
            return Ok(());
        }
    }
}

fn env_filter(default: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default))
}

/// One-shot commands log to stderr so stdout stays clean for output.
fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .init();
}

/// The interactive UI owns the terminal, so logs go to a file instead.
fn init_file_logging(args: &ClientArgs) -> Result<()> {
    let Some(path) = args.log_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
