use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// What a submitted prompt edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTarget {
    Origin,
    LogPath,
    ScreenshotPath,
}

impl PromptTarget {
    fn title(self) -> &'static str {
        match self {
            PromptTarget::Origin => " XY Origin (X, Y) ",
            PromptTarget::LogPath => " Log filename ",
            PromptTarget::ScreenshotPath => " Screenshot filename ",
        }
    }
}

/// Single-line text entry shown over the main view.
pub struct Prompt {
    pub target: PromptTarget,
    pub input: String,
}

impl Prompt {
    pub fn new(target: PromptTarget, initial: impl Into<String>) -> Self {
        Self { target, input: initial.into() }
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }

    pub fn render(&self, f: &mut Frame) {
        let width = (self.input.chars().count() as u16 + 6).clamp(40, f.area().width.max(40));
        let area = centered_rect(width, 6, f.area());

        f.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(self.target.title());

        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // input
                Constraint::Length(1),
                Constraint::Length(1), // hints
            ])
            .split(inner);

        let input = Paragraph::new(Line::from(vec![
            Span::styled(" ", Style::default()),
            Span::styled(&self.input, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            Span::styled("_", Style::default().fg(Color::Yellow).add_modifier(Modifier::SLOW_BLINK)),
        ]));
        f.render_widget(input, chunks[0]);

        let hints = Line::from(vec![
            Span::styled("enter", Style::default().fg(Color::Yellow)),
            Span::raw(" to apply, "),
            Span::styled("esc", Style::default().fg(Color::Yellow)),
            Span::raw(" to cancel"),
        ]);
        f.render_widget(Paragraph::new(hints).alignment(Alignment::Center), chunks[2]);
    }
}

/// Return a centered `Rect` of `width` columns and `height` rows inside `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
