use std::io;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::sync::atomic::AtomicBool;

use anyhow::Result;
use crossterm::{
    execute,
    event::{EnableMouseCapture, DisableMouseCapture},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use mouseinfo_core::{logger, settings::Settings};
use mouseinfo_core::logger::Record;
use mouseinfo_core::platform::{create_probe, hotkey};
use mouseinfo_core::session::Session;
use mouseinfo_core::sinks::{FsSink, SystemClipboard};

fn main() -> Result<()> {
    let force_stub = std::env::args().any(|a| a == "--stub");

    let work_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // Init logger
    if let Err(e) = logger::init(&work_dir.join("logs")) {
        eprintln!("warning: diagnostics log disabled: {}", e);
    }

    // The display must be usable before anything else is built.
    let probe = match create_probe(force_stub) {
        Ok(probe) => probe,
        Err(e) => {
            logger::error(&e.to_string());
            eprintln!("mouseinfo: {}", e);
            std::process::exit(1);
        }
    };

    let settings_path = work_dir.join("settings.json");
    let settings = Settings::load(&settings_path);
    let mut resolved = settings.clone();
    resolved.resolve_paths(&work_dir);

    let session = Session::new(probe, Box::new(SystemClipboard), Box::new(FsSink), &resolved);

    let (log_tx, log_rx) = mpsc::channel::<Record>();
    logger::set_tui_sender(log_tx);
    logger::info(&format!("mouseinfo {} started", env!("CARGO_PKG_VERSION")));

    // Start global hotkey listener
    let hotkey_flag = Arc::new(AtomicBool::new(false));
    hotkey::start_hotkey_listener(Arc::clone(&hotkey_flag));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = mouseinfo_tui::App::new(session, settings, settings_path, log_rx);

    // Run TUI event loop on main thread
    let result = mouseinfo_tui::event::run(&mut terminal, &mut app, hotkey_flag);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    logger::info("mouseinfo exited");
    result
}
