use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use dbwatch::channel::latest_wins;
use dbwatch::feed::opener_for;
use dbwatch::ui::Theme;
use dbwatch::{events, logging, ui, App, Coalescer, FeedReader, Lifecycle, Overrides, Settings};

/// Upper bound on how long the render loop waits for input.
const INPUT_POLL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "dbwatch")]
#[command(about = "Terminal sound level meter for serial decibel feeds")]
struct Args {
    /// Serial port to read from ("-" reads standard input)
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Per-read timeout; also bounds shutdown latency (e.g. "1s", "500ms")
    #[arg(long)]
    read_timeout: Option<String>,

    /// Display refresh interval (e.g. "1s")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Delay before the first display refresh
    #[arg(long)]
    initial_delay: Option<String>,

    /// Pause after a failed read before retrying
    #[arg(long)]
    retry_pause: Option<String>,

    /// Unit shown after the reading
    #[arg(short, long)]
    unit: Option<String>,

    /// Readings above this are shown as loud
    #[arg(long)]
    loud_db: Option<f64>,

    /// Readings above this are shown as harmful
    #[arg(long)]
    harmful_db: Option<f64>,

    /// Config file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            config_file: self.config.clone(),
            port: self.port.clone(),
            baud: self.baud,
            read_timeout: self.read_timeout.clone(),
            refresh: self.refresh.clone(),
            initial_delay: self.initial_delay.clone(),
            retry_pause: self.retry_pause.clone(),
            unit: self.unit.clone(),
            loud_db: self.loud_db,
            harmful_db: self.harmful_db,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref path) = args.log_file {
        logging::init(path)?;
    }

    let settings = Settings::load(&args.overrides())?;
    info!(port = %settings.serial.port, baud = settings.serial.baud, "dbwatch starting");

    // The reader runs on the runtime's blocking pool
    let rt = tokio::runtime::Runtime::new()?;
    let enter = rt.enter();

    let (publisher, drain) = latest_wins();
    let mut lifecycle = Lifecycle::new();
    let reader = FeedReader::new(opener_for(settings.serial.clone()), publisher, lifecycle.token())
        .with_retry_pause(settings.retry_pause);
    lifecycle.start(reader)?;

    let coalescer = Coalescer::new(drain, settings.display.clone(), Instant::now());
    let app = App::new(coalescer, &settings.serial, Theme::auto_detect());

    let result = run_tui(app);
    lifecycle.shutdown()?;

    // Not joined: the reader exits within one read timeout, or is abandoned
    lifecycle.terminate()?;
    drop(enter);
    rt.shutdown_timeout(settings.serial.read_timeout);
    info!("dbwatch stopped");

    result
}

/// Run the TUI until the user quits.
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, &mut app);

    // No further display ticks, whether the loop ended normally or not
    app.quit();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut dirty = true;

    while app.running {
        if app.on_tick(Instant::now()) {
            dirty = true;
        }

        if dirty {
            terminal.draw(|frame| ui::draw(frame, app))?;
            dirty = false;
        }

        // Wait for input, but never past the next display tick
        let timeout = app
            .coalescer()
            .next_tick()
            .map(|due| due.saturating_duration_since(Instant::now()))
            .unwrap_or(INPUT_POLL)
            .min(INPUT_POLL);

        if let Some(event) = events::poll_event(timeout)? {
            match event {
                Event::Key(key) => {
                    events::handle_key_event(app, key);
                    dirty = true;
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
    }

    Ok(())
}
