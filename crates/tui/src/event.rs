use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use mouseinfo_core::types::ActionKind;

use crate::App;
use crate::ui;

/// Longest wait for input; bounds how late a hotkey press is noticed.
const MAX_POLL: Duration = Duration::from_millis(50);

/// What a key press asks for, independent of the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Trigger(ActionKind),
    ResetOrigin,
    ToggleDelay,
    SaveLog,
    SaveScreenshot,
    EditOrigin,
    EditLogPath,
    EditScreenshotPath,
    ToggleDiagnostics,
    SelectNext,
    SelectPrev,
    FireSelected,
    ScrollUp(usize),
    ScrollDown(usize),
    Quit,
}

pub fn map_key(key: KeyEvent) -> Option<Intent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Intent::Quit),
            _ => None,
        };
    }
    let intent = match key.code {
        KeyCode::Char('x') => Intent::Trigger(ActionKind::CopyXY),
        KeyCode::Char('r') => Intent::Trigger(ActionKind::CopyRGB),
        KeyCode::Char('h') => Intent::Trigger(ActionKind::CopyRGBHex),
        KeyCode::Char('a') => Intent::Trigger(ActionKind::CopyAll),
        KeyCode::Char('X') => Intent::Trigger(ActionKind::LogXY),
        KeyCode::Char('R') => Intent::Trigger(ActionKind::LogRGB),
        KeyCode::Char('H') => Intent::Trigger(ActionKind::LogRGBHex),
        KeyCode::Char('A') => Intent::Trigger(ActionKind::LogAll),
        KeyCode::Char('o') => Intent::Trigger(ActionKind::SetOrigin),
        KeyCode::Char('O') => Intent::ResetOrigin,
        KeyCode::Char('t') | KeyCode::Char('T') => Intent::ToggleDelay,
        KeyCode::Char('s') => Intent::SaveLog,
        KeyCode::Char('S') => Intent::SaveScreenshot,
        KeyCode::Char('e') | KeyCode::Char('E') => Intent::EditOrigin,
        KeyCode::Char('p') => Intent::EditLogPath,
        KeyCode::Char('P') => Intent::EditScreenshotPath,
        KeyCode::Char('d') | KeyCode::Char('D') => Intent::ToggleDiagnostics,
        KeyCode::Down | KeyCode::Right | KeyCode::Tab => Intent::SelectNext,
        KeyCode::Up | KeyCode::Left | KeyCode::BackTab => Intent::SelectPrev,
        KeyCode::Enter | KeyCode::Char(' ') => Intent::FireSelected,
        KeyCode::PageUp => Intent::ScrollUp(10),
        KeyCode::PageDown => Intent::ScrollDown(10),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Intent::Quit,
        _ => return None,
    };
    Some(intent)
}

/// Wait until the next timer is due, but never longer than `MAX_POLL`.
pub fn poll_timeout(next_deadline: Option<Instant>, now: Instant) -> Duration {
    next_deadline
        .map(|d| d.saturating_duration_since(now))
        .unwrap_or(MAX_POLL)
        .min(MAX_POLL)
}

fn prompt_key(app: &mut App, key: KeyEvent) {
    let Some(prompt) = app.prompt.as_mut() else { return };
    match key.code {
        KeyCode::Enter => app.submit_prompt(),
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Backspace => prompt.backspace(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => prompt.clear(),
        KeyCode::Char(c) => prompt.push(c),
        _ => {}
    }
}

pub fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    hotkey_flag: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    app.session.start(Instant::now());
    loop {
        if app.should_quit {
            return Ok(());
        }

        // Timers and the hotkey run on this thread, before drawing.
        let now = Instant::now();
        app.session.pump(now);
        if hotkey_flag.swap(false, Ordering::AcqRel) {
            app.hotkey(now);
        }

        app.drain_logs();

        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = poll_timeout(app.session.next_deadline(), Instant::now());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if app.prompt.is_some() {
                        prompt_key(app, key);
                    } else if let Some(intent) = map_key(key) {
                        app.handle(intent, Instant::now());
                    }
                }
                Event::Mouse(mouse) => {
                    match mouse.kind {
                        MouseEventKind::ScrollUp => app.handle(Intent::ScrollUp(3), Instant::now()),
                        MouseEventKind::ScrollDown => app.handle(Intent::ScrollDown(3), Instant::now()),
                        _ => {}
                    }
                }
                _ => {}
            }
        }
    }
}
