//! A terminal viewer for the dataframe list served by a local dataframe
//! service.
//!
//! Run the binary to launch the interactive list.
//! Run with `--print` to fetch the list once and write it to stdout as JSON.

use std::fs::File;
use std::io::{self, stderr};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use df_view::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{AppState, Deliveries},
};
use df_view::config::{config_path, AppConfig};
use df_view::core::transport::HttpTransport;
use df_view::ui::{
    columns_pane::ColumnsPane, layout::AppLayout, list_widget::ListWidget,
    spinner::FetchIndicator, theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Dataframe list viewer")]
struct Cli {
    /// Service root (defaults to the config file, then `http://localhost:5000`).
    #[arg(long)]
    url: Option<String>,

    /// Request timeout in milliseconds (0 = wait indefinitely).
    #[arg(long = "timeout-ms")]
    timeout_ms: Option<u64>,

    /// Show request failures instead of silently keeping the previous list.
    #[arg(long = "surface-errors")]
    surface_errors: bool,

    /// Fetch the list once, print it as JSON to stdout, and exit.
    #[arg(long)]
    print: bool,

    /// Write tracing output to this file instead of stderr.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Save the effective configuration to the config file and exit.
    #[arg(long = "write-config")]
    write_config: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(ref url) = self.url {
            config.base_url = url.clone();
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout_ms = ms;
        }
        if self.surface_errors {
            config.surface_errors = true;
        }
    }
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr) // never pollute stdout
                .init();
        }
    }
    Ok(())
}

// ───────────────────────────────────────── print mode ───────

/// Fetch once and write the resulting list to stdout.
async fn run_print(mut state: AppState, mut deliveries: Deliveries) -> Result<()> {
    state.list_view.initialize();
    if let Some(delivery) = deliveries.list_rx.recv().await {
        handler::handle_list_delivery(&mut state, delivery);
    }

    if let Some(err) = state.list_view.visible_error() {
        return Err(err.clone()).context("fetching the dataframe list");
    }

    println!("{}", serde_json::to_string_pretty(state.list_view.list())?);
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    let mut config = AppConfig::load();
    cli.apply_overrides(&mut config);

    if cli.write_config {
        config.save()?;
        eprintln!("wrote {}", config_path().display());
        return Ok(());
    }

    let transport = Arc::new(HttpTransport::new(config.timeout()));
    let (mut state, mut deliveries) =
        AppState::new(config, transport).context("cannot use the configured service url")?;

    if cli.print {
        return run_print(state, deliveries).await;
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader(Duration::from_millis(100));

    // The one activation of the list view.
    state.list_view.initialize();

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| {
            let layout = AppLayout::from_area(frame.area());

            let updated = state
                .list_view
                .updated_at()
                .map(|t| format!(" · {}", t.format("%H:%M:%S")))
                .unwrap_or_default();
            let list_block = Block::default()
                .title(format!(" {}{updated} ", state.list_view.url()))
                .title_style(Theme::title_style())
                .borders(Borders::ALL)
                .border_style(Theme::border_style());

            frame.render_stateful_widget(
                ListWidget::new(state.list_view.list())
                    .placeholder("no dataframes")
                    .block(list_block),
                layout.list_area,
                &mut state.list_state,
            );
            frame.render_widget(
                FetchIndicator::for_view(&state.list_view, state.tick),
                layout.list_area,
            );

            let columns_block = Block::default()
                .title(" Columns ")
                .title_style(Theme::title_style())
                .borders(Borders::ALL)
                .border_style(Theme::border_style());
            frame.render_widget(
                ColumnsPane {
                    promise: state.columns.promise(),
                    block: columns_block,
                },
                layout.columns_area,
            );

            let hint = state.config.status_bar_hint();
            let status_text = state.status_message.as_deref().unwrap_or(&hint);
            let status = Paragraph::new(status_text).style(Theme::status_bar_style());
            frame.render_widget(status, layout.status_area);
        })?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Resize(_, _) => {}
                    AppEvent::Tick => state.tick = state.tick.wrapping_add(1),
                }
            }

            Some(delivery) = deliveries.list_rx.recv() => {
                handler::handle_list_delivery(&mut state, delivery);
            }

            Some(delivery) = deliveries.columns_rx.recv() => {
                handler::handle_columns_delivery(&mut state, delivery);
            }

            else => break,
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    state.teardown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
