use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use artpick_core::fetch::MockPageSource;
use artpick_core::config_file::ConfigFile;
use artpick_core::{Config, HttpPageSource, PageSource, SelectionSession};

mod action;
mod app;
mod backend;
mod input;
mod model;
mod theme;
mod tui_event;
mod view;

use app::App;

/// artpick: browse a paged art catalog and pick records across pages.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Collection endpoint answering `?page=N&limit=M`
    #[arg(long)]
    api_url: Option<String>,

    /// Rows per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Fixed collection size (default: taken from the API's pagination block)
    #[arg(long)]
    total_records: Option<usize>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Browse a synthetic offline catalog instead of the API
    #[arg(long)]
    demo: bool,

    /// Write logs here instead of the cache directory
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// `ARTPICK_*` environment overrides, read once at startup.
#[derive(Debug, Default)]
struct EnvOverrides {
    api_url: Option<String>,
    page_size: Option<usize>,
    timeout_secs: Option<u64>,
    total_records: Option<usize>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse().ok());
        Self {
            api_url: lookup("ARTPICK_API_URL"),
            page_size: parse("ARTPICK_PAGE_SIZE"),
            timeout_secs: lookup("ARTPICK_TIMEOUT").and_then(|v| v.trim().parse().ok()),
            total_records: parse("ARTPICK_TOTAL_RECORDS"),
        }
    }
}

/// Resolve config from CLI flags > env vars > config files > defaults.
fn resolve_config(file: &ConfigFile, env: &EnvOverrides, args: &Args) -> Config {
    let mut config = Config::default();
    config.apply_file(file);

    if let Some(url) = &env.api_url {
        config.base_url = url.clone();
    }
    if let Some(size) = env.page_size {
        config.page_size = size;
    }
    if let Some(secs) = env.timeout_secs {
        config.timeout_secs = secs;
    }
    if env.total_records.is_some() {
        config.total_records = env.total_records;
    }

    if let Some(url) = &args.api_url {
        config.base_url = url.clone();
    }
    if let Some(size) = args.page_size {
        config.page_size = size;
    }
    if let Some(secs) = args.timeout {
        config.timeout_secs = secs;
    }
    if args.total_records.is_some() {
        config.total_records = args.total_records;
    }
    if let Some(theme) = &args.theme {
        config.theme = theme.clone();
    }

    config.normalize();
    config
}

/// Install the file logger. The returned guard flushes on drop and must live
/// until the terminal is restored.
fn init_logging(path: &Path) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("log path has no file name: {}", path.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("ARTPICK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
        .init();

    Ok(guard)
}

fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("artpick")
        .join("artpick.log")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_path = args.log_file.clone().unwrap_or_else(default_log_path);
    let _log_guard = init_logging(&log_path)?;

    let config = resolve_config(
        &artpick_core::config_file::load_config(),
        &EnvOverrides::from_env(),
        &args,
    );

    let (source, source_label): (Arc<dyn PageSource>, String) = if args.demo {
        let total = config
            .total_records
            .unwrap_or(artpick_core::DEFAULT_TOTAL_RECORDS);
        (
            Arc::new(MockPageSource::new(total)),
            format!("demo catalog ({total} records)"),
        )
    } else {
        let http = HttpPageSource::new(config.base_url.clone(), config.timeout())?;
        (Arc::new(http), config.base_url.clone())
    };

    let session = SelectionSession::new(config.page_size, config.total_records);
    let theme = theme::Theme::by_name(&config.theme);

    tracing::info!(
        source = source.name(),
        page_size = config.page_size,
        total_records = ?config.total_records,
        theme = theme.name,
        "starting artpick"
    );

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(session, theme, config.page_size_options.clone());
    app.source_label = source_label;
    let size = terminal.size()?;
    app.update(action::Action::Resize(size.width, size.height));

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<tui_event::BackendCommand>();
    let cancel = CancellationToken::new();

    app.backend_cmd_tx = Some(cmd_tx);
    tokio::spawn(backend::run(source, cmd_rx, event_tx, cancel.clone()));

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    app.start();

    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    let action = input::map_event(&evt, &app.input_mode);
                    app.update(action);
                }
            } => {}
            _ = cancel.cancelled() => app.should_quit = true,
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    tracing::info!(selected = app.session.selection().len(), "artpick exited");
    Ok(())
}
