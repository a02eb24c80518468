mod api;
mod config;
mod models;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::api::CustomerApi;
use crate::ui::console::{
    handle_input as handle_console_input, render_console, Completion, ConsoleAction, ConsoleState,
    Outcome,
};

/// Terminal console for the customers service
#[derive(Parser)]
struct Args {
    /// Base URL of the customers service, overrides SERVICE_URL
    #[arg(long)]
    url: Option<String>,
}

// Main application state
struct AppState {
    api: CustomerApi,
    console: ConsoleState,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl AppState {
    fn new(api: CustomerApi) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            api,
            console: ConsoleState::new(),
            completions_tx,
            completions_rx,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = config::init()?;

    // Log to stderr so the alternate screen stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let base_url = args.url.unwrap_or_else(|| config.service_url().to_string());
    println!("Using customers service at {}", base_url);

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app_state = AppState::new(CustomerApi::new(base_url));

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = result {
        println!("Error: {}", err);
    }

    println!("Thanks for using Customer Console!");

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        // Apply any finished requests before drawing
        while let Ok(completion) = app_state.completions_rx.try_recv() {
            app_state.console.apply(completion);
        }

        terminal.draw(|f| render_console(f, &app_state.console))?;

        // Short poll so completions become visible without a keypress
        if event::poll(Duration::from_millis(50))? {
            if let Some(action) = handle_console_input(&mut app_state.console)? {
                let should_quit = handle_console_action(app_state, action);
                if should_quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Dispatch one trigger. Form state is read here, synchronously, so the
/// request carries the fields as they were at the keypress; the response
/// comes back through the completions channel.
fn handle_console_action(app_state: &mut AppState, action: ConsoleAction) -> bool {
    match action {
        ConsoleAction::Exit => {
            return true;
        }
        ConsoleAction::Clear => {
            tracing::debug!("clear form");
            app_state.console.clear_form();
        }
        ConsoleAction::Create => {
            let customer = app_state.console.form.to_customer();
            let seq = app_state.console.begin_request();
            let api = app_state.api.clone();
            let tx = app_state.completions_tx.clone();
            tokio::spawn(async move {
                let outcome = Outcome::Created(api.create(&customer).await);
                let _ = tx.send(Completion { seq, outcome });
            });
        }
        ConsoleAction::Update => {
            let id = app_state.console.form.customer_id.clone();
            let customer = app_state.console.form.to_customer();
            let seq = app_state.console.begin_request();
            let api = app_state.api.clone();
            let tx = app_state.completions_tx.clone();
            tokio::spawn(async move {
                let outcome = Outcome::Updated(api.update(&id, &customer).await);
                let _ = tx.send(Completion { seq, outcome });
            });
        }
        ConsoleAction::Retrieve => {
            let id = app_state.console.form.customer_id.clone();
            let seq = app_state.console.begin_request();
            let api = app_state.api.clone();
            let tx = app_state.completions_tx.clone();
            tokio::spawn(async move {
                let outcome = Outcome::Retrieved(api.get(&id).await);
                let _ = tx.send(Completion { seq, outcome });
            });
        }
        ConsoleAction::Delete => {
            let id = app_state.console.form.customer_id.clone();
            let seq = app_state.console.begin_request();
            let api = app_state.api.clone();
            let tx = app_state.completions_tx.clone();
            tokio::spawn(async move {
                let outcome = Outcome::Deleted(api.delete(&id).await);
                let _ = tx.send(Completion { seq, outcome });
            });
        }
        ConsoleAction::Activate => {
            let id = app_state.console.form.customer_id.clone();
            let seq = app_state.console.begin_request();
            let api = app_state.api.clone();
            let tx = app_state.completions_tx.clone();
            tokio::spawn(async move {
                let outcome = Outcome::Activated(api.activate(&id).await);
                let _ = tx.send(Completion { seq, outcome });
            });
        }
        ConsoleAction::Search => {
            let filters = app_state.console.form.search_filters();
            let seq = app_state.console.begin_request();
            let api = app_state.api.clone();
            let tx = app_state.completions_tx.clone();
            tokio::spawn(async move {
                let outcome = Outcome::Searched(api.search(&filters).await);
                let _ = tx.send(Completion { seq, outcome });
            });
        }
    }

    false
}
