mod api;
mod app;
mod config;
mod route;
mod session;
mod table;
mod toast;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::ApiClient;
use app::App;
use config::Config;
use session::{JsonFileStore, MemoryStore, SessionStore};

#[derive(Parser, Debug)]
#[command(name = "rfx-portal")]
#[command(about = "TUI procurement portal - buyer, supplier and admin dashboards")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "~/.config/rfx-portal/config.toml")]
    config: String,

    /// Override the backend base URL from the config
    #[arg(long)]
    api_url: Option<String>,

    /// Start signed out even if a session is stored
    #[arg(long)]
    fresh: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rfx_portal=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    // Load config, with CLI overrides on top
    let mut config = Config::load(&cli.config)?;
    if let Some(api_url) = cli.api_url {
        config.api.base_url = api_url;
    }
    if cli.fresh {
        config.behavior.remember_session = false;
    }
    tracing::info!("Using backend at {}", config.api.base_url);

    let client = ApiClient::new(
        config.api.base_url.clone(),
        Duration::from_secs(config.api.timeout_secs),
    )?;
    let store: Box<dyn SessionStore> = if config.behavior.remember_session {
        Box::new(JsonFileStore::new(JsonFileStore::default_path()))
    } else {
        Box::new(MemoryStore::default())
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(config, client, store);

    // Run main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.drain_events();
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.code == event::KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }
                app.handle_key(key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
