use json_explorer::app::App;
use json_explorer::config::ExplorerConfig;
use json_explorer::explorer::Explorer;
use json_explorer::storage::FileStorage;
use json_explorer::terminal::{Terminal, TerminalEvent};
use std::error::Error;
use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = ExplorerConfig::discover()?;
    init_tracing(&config)?;

    let storage = FileStorage::new(&config.storage_path);
    let mut explorer = Explorer::new(&config, Box::new(storage));
    explorer.load();

    let mut terminal = Terminal::new()?;
    let mut app = App::new(explorer, config.max_visible_rows);
    app.resize(terminal.size());

    terminal.enter()?;
    let result = event_loop(&mut terminal, &mut app);
    terminal.exit()?;

    result?;
    Ok(())
}

/// Logs go to a file because the terminal is in raw mode.
fn init_tracing(config: &ExplorerConfig) -> Result<(), Box<dyn Error>> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::from_default_env().add_directive("json_explorer=info".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    tracing::info!(log_file = %path.display(), "logging started");
    Ok(())
}

fn event_loop(terminal: &mut Terminal, app: &mut App) -> io::Result<()> {
    let mut render_requested = true;

    loop {
        if render_requested {
            terminal.render(&app.frame())?;
            render_requested = false;
        }

        if app.should_exit() {
            break;
        }

        // Deferred turns run only after the previous frame is on screen.
        let timeout = if app.has_pending_work() {
            Duration::ZERO
        } else {
            Duration::from_millis(100)
        };

        match terminal.poll_event(timeout)? {
            TerminalEvent::Key(key) => {
                app.handle_key(key);
                render_requested = true;
            }
            TerminalEvent::Paste(text) => {
                app.handle_paste(&text);
                render_requested = true;
            }
            TerminalEvent::Resize(size) => {
                app.resize(size);
                render_requested = true;
            }
            TerminalEvent::Tick => {}
        }

        if app.tick() {
            render_requested = true;
        }
    }

    Ok(())
}
