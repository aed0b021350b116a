use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Instant;

use mouseinfo_core::logger::{self, Record};
use mouseinfo_core::session::Session;
use mouseinfo_core::settings::Settings;
use mouseinfo_core::types::ActionKind;

use crate::event::Intent;
use crate::prompt::{Prompt, PromptTarget};

/// Diagnostics kept for the panel; older records are dropped.
const DIAGNOSTICS_CAP: usize = 500;

/// One entry in the button panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Action(ActionKind),
    ResetOrigin,
}

pub const BUTTONS: [Button; 10] = [
    Button::Action(ActionKind::CopyXY),
    Button::Action(ActionKind::CopyRGB),
    Button::Action(ActionKind::CopyRGBHex),
    Button::Action(ActionKind::CopyAll),
    Button::Action(ActionKind::LogXY),
    Button::Action(ActionKind::LogRGB),
    Button::Action(ActionKind::LogRGBHex),
    Button::Action(ActionKind::LogAll),
    Button::Action(ActionKind::SetOrigin),
    Button::ResetOrigin,
];

pub struct App {
    pub session: Session,
    /// Settings as stored on disk; output paths may still be relative.
    pub settings: Settings,
    pub settings_path: PathBuf,
    base_dir: PathBuf,
    pub selected: usize,
    pub prompt: Option<Prompt>,
    pub diagnostics_visible: bool,
    pub diagnostics: Vec<Record>,
    pub log_scroll: usize, // scroll offset from bottom (0 = latest)
    pub log_rx: mpsc::Receiver<Record>,
    pub should_quit: bool,
}

impl App {
    /// `settings_path`'s directory anchors relative output paths.
    pub fn new(
        session: Session,
        settings: Settings,
        settings_path: PathBuf,
        log_rx: mpsc::Receiver<Record>,
    ) -> Self {
        let base_dir = settings_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            session,
            settings,
            settings_path,
            base_dir,
            selected: 0,
            prompt: None,
            diagnostics_visible: false,
            diagnostics: Vec::new(),
            log_scroll: 0,
            log_rx,
            should_quit: false,
        }
    }

    pub fn drain_logs(&mut self) {
        while let Ok(record) = self.log_rx.try_recv() {
            self.diagnostics.push(record);
        }
        if self.diagnostics.len() > DIAGNOSTICS_CAP {
            let excess = self.diagnostics.len() - DIAGNOSTICS_CAP;
            self.diagnostics.drain(..excess);
        }
    }

    pub fn handle(&mut self, intent: Intent, now: Instant) {
        match intent {
            Intent::Trigger(kind) => self.session.trigger(kind, now),
            Intent::ResetOrigin => self.session.reset_origin(),
            Intent::ToggleDelay => self.toggle_delay(),
            Intent::SaveLog => self.session.save_log(),
            Intent::SaveScreenshot => self.session.save_screenshot(),
            Intent::EditOrigin => self.open_prompt(PromptTarget::Origin),
            Intent::EditLogPath => self.open_prompt(PromptTarget::LogPath),
            Intent::EditScreenshotPath => self.open_prompt(PromptTarget::ScreenshotPath),
            Intent::ToggleDiagnostics => self.diagnostics_visible = !self.diagnostics_visible,
            Intent::SelectNext => self.selected = (self.selected + 1) % BUTTONS.len(),
            Intent::SelectPrev => self.selected = (self.selected + BUTTONS.len() - 1) % BUTTONS.len(),
            Intent::FireSelected => self.fire_selected(now),
            Intent::ScrollUp(n) => self.log_scroll = self.log_scroll.saturating_add(n),
            Intent::ScrollDown(n) => self.log_scroll = self.log_scroll.saturating_sub(n),
            Intent::Quit => self.quit(),
        }
    }

    fn fire_selected(&mut self, now: Instant) {
        match BUTTONS[self.selected] {
            Button::Action(kind) => self.session.trigger(kind, now),
            Button::ResetOrigin => self.session.reset_origin(),
        }
    }

    /// The global hotkey was pressed.
    pub fn hotkey(&mut self, now: Instant) {
        self.session.fire_now(self.settings.hotkey_action, now);
    }

    pub fn toggle_delay(&mut self) {
        let on = !self.session.delay_enabled();
        self.session.set_delay_enabled(on);
        self.settings.delay_enabled = on;
        self.save_settings();
    }

    pub fn open_prompt(&mut self, target: PromptTarget) {
        let initial = match target {
            PromptTarget::Origin => self.session.origin_text().to_string(),
            PromptTarget::LogPath => self.settings.log_path.display().to_string(),
            PromptTarget::ScreenshotPath => self.settings.screenshot_path.display().to_string(),
        };
        self.prompt = Some(Prompt::new(target, initial));
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else { return };
        let text = prompt.input.trim();
        match prompt.target {
            PromptTarget::Origin => self.session.set_origin_text(&prompt.input),
            // empty filenames keep the current one
            _ if text.is_empty() => {}
            PromptTarget::LogPath => {
                let resolved = self.resolve(Path::new(text));
                self.settings.log_path = PathBuf::from(text);
                self.session.set_log_path(resolved);
                self.save_settings();
            }
            PromptTarget::ScreenshotPath => {
                let resolved = self.resolve(Path::new(text));
                self.settings.screenshot_path = PathBuf::from(text);
                self.session.set_screenshot_path(resolved);
                self.save_settings();
            }
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            self.base_dir.join(path)
        } else {
            path.to_path_buf()
        }
    }

    fn save_settings(&self) {
        if let Err(e) = self.settings.save(&self.settings_path) {
            logger::warn(&format!("cannot save {}: {}", self.settings_path.display(), e));
        }
    }

    pub fn quit(&mut self) {
        self.session.close();
        self.should_quit = true;
    }
}
