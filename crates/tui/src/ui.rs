use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use mouseinfo_core::logger::{Level, Record};
use mouseinfo_core::platform::hotkey;
use mouseinfo_core::sample::Validity;
use mouseinfo_core::scheduler::ActionState;
use mouseinfo_core::types::ActionKind;

use crate::App;
use crate::app::{Button, BUTTONS};

const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    draw_banner(f, app, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(0)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(0)])
        .split(columns[0]);
    draw_info(f, app, left[0]);
    draw_buttons(f, app, left[1]);

    if app.diagnostics_visible {
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);
        draw_log(f, app, right[0]);
        draw_diagnostics(f, app, right[1]);
    } else {
        draw_log(f, app, columns[1]);
    }

    draw_status(f, app, rows[2]);

    if let Some(prompt) = &app.prompt {
        prompt.render(f);
    }
}

fn draw_banner(f: &mut Frame, app: &App, area: Rect) {
    let label = format!("MouseInfo {} ({})", env!("CARGO_PKG_VERSION"), app.session.probe_name());
    let width = area.width as usize;
    let pad_total = width.saturating_sub(label.len());
    let pad_left = pad_total / 2;
    let pad_right = pad_total - pad_left;
    let centered = format!("{}{}{}", " ".repeat(pad_left), label, " ".repeat(pad_right));
    let banner = Paragraph::new(Line::from(Span::styled(
        centered,
        Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    f.render_widget(banner, area);
}

fn draw_info(f: &mut Frame, app: &App, area: Rect) {
    let sample = app.session.sample();
    let (x, y) = sample.display_xy();
    let na_style = Style::default().fg(Color::DarkGray);
    let value_style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let (rgb_text, hex_text, swatch) = match (sample.rgb(), sample.rgb_hex()) {
        (Some((r, g, b)), Some(hex)) => (format!("{}, {}, {}", r, g, b), hex.to_string(), Color::Rgb(r, g, b)),
        _ => (sample.rgb_text(), sample.rgb_hex_text(), Color::Black),
    };
    let color_style = if sample.validity() == Validity::Valid { value_style } else { na_style };

    let checkbox = if app.session.delay_enabled() { "[x]" } else { "[ ]" };
    let lines = vec![
        Line::from(vec![Span::raw(" XY Position: "), Span::styled(format!("{}, {}", x, y), value_style)]),
        Line::from(vec![Span::raw(" RGB Color:   "), Span::styled(rgb_text, color_style)]),
        Line::from(vec![Span::raw(" RGB as Hex:  "), Span::styled(hex_text, color_style)]),
        Line::from(vec![Span::raw(" Color:       "), Span::styled("          ", Style::default().bg(swatch))]),
        Line::from(vec![Span::raw(" XY Origin:   "), Span::styled(app.session.origin_text().to_string(), value_style)]),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!(" {} ", checkbox), KEY_STYLE),
            Span::raw("3 Sec. Button Delay"),
        ]),
    ];

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Pointer ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(panel, area);
}

fn button_key(button: Button) -> &'static str {
    match button {
        Button::Action(ActionKind::CopyXY) => "x",
        Button::Action(ActionKind::CopyRGB) => "r",
        Button::Action(ActionKind::CopyRGBHex) => "h",
        Button::Action(ActionKind::CopyAll) => "a",
        Button::Action(ActionKind::LogXY) => "X",
        Button::Action(ActionKind::LogRGB) => "R",
        Button::Action(ActionKind::LogRGBHex) => "H",
        Button::Action(ActionKind::LogAll) => "A",
        Button::Action(ActionKind::SetOrigin) => "o",
        Button::ResetOrigin => "O",
    }
}

fn draw_buttons(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    for (i, button) in BUTTONS.iter().copied().enumerate() {
        let is_selected = i == app.selected;
        let prefix = if is_selected { "> " } else { "  " };

        let (label, counting) = match button {
            Button::Action(kind) => (
                app.session.label(kind),
                matches!(app.session.action_state(kind), ActionState::Counting(_)),
            ),
            Button::ResetOrigin => ("Reset XY Origin".to_string(), false),
        };
        let label_style = match (is_selected, counting) {
            (_, true) => Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD),
            (true, false) => Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::REVERSED),
            (false, false) => Style::default().fg(Color::White),
        };

        lines.push(Line::from(vec![
            Span::raw(prefix),
            Span::styled(format!("{:<2}", button_key(button)), KEY_STYLE),
            Span::styled(format!(" {:<14} ", label), label_style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" s", KEY_STYLE),
        Span::raw(" save log  "),
        Span::styled("S", KEY_STYLE),
        Span::raw(" save screenshot"),
    ]));
    lines.push(Line::from(vec![
        Span::styled(" e", KEY_STYLE),
        Span::raw(" origin  "),
        Span::styled("p", KEY_STYLE),
        Span::raw("/"),
        Span::styled("P", KEY_STYLE),
        Span::raw(" filenames  "),
        Span::styled("t", KEY_STYLE),
        Span::raw(" delay"),
    ]));
    let mut last = vec![
        Span::styled(" d", KEY_STYLE),
        Span::raw(" diagnostics  "),
        Span::styled("q", KEY_STYLE),
        Span::raw(" quit"),
    ];
    if let Some(chord) = hotkey::chord() {
        last.push(Span::raw("  "));
        last.push(Span::styled(chord, KEY_STYLE));
    }
    lines.push(Line::from(last));

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(panel, area);
}

/// Index range of `total` lines that fits `height` rows, `scroll` lines up
/// from the newest.
fn visible_range(total: usize, height: usize, scroll: usize) -> (usize, usize) {
    let max_scroll = total.saturating_sub(height);
    let scroll = scroll.min(max_scroll);
    let start = total.saturating_sub(height + scroll);
    let end = total.saturating_sub(scroll);
    (start, end)
}

fn draw_log(f: &mut Frame, app: &App, area: Rect) {
    let lines = app.session.log().lines();
    let (start, end) = visible_range(lines.len(), area.height.saturating_sub(2) as usize, app.log_scroll);
    let log_lines: Vec<Line> = lines[start..end].iter().map(|l| Line::from(l.as_str())).collect();

    let title = format!(" Log ({}) -> {} ", lines.len(), app.session.log_path().display());
    let panel = Paragraph::new(log_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(panel, area);
}

fn draw_diagnostics(f: &mut Frame, app: &App, area: Rect) {
    let (start, end) = visible_range(app.diagnostics.len(), area.height.saturating_sub(2) as usize, 0);
    let lines: Vec<Line> = app.diagnostics[start..end].iter().map(record_line).collect();

    let panel = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Diagnostics ")
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(panel, area);
}

/// Colored rendering of one diagnostic record.
fn record_line(record: &Record) -> Line<'_> {
    let prefix_color = match record.color {
        1 => Color::DarkGray,  // COLOR_GRAY
        2 => Color::LightBlue, // COLOR_BLUE
        _ => Color::White,
    };

    let mut spans = vec![
        Span::styled(record.timestamp.as_str(), Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
    ];

    match record.level {
        Level::Error => spans.push(Span::styled("error ", Style::default().fg(Color::Red))),
        Level::Warn => spans.push(Span::styled("warn ", Style::default().fg(Color::Yellow))),
        Level::Info => {}
    }

    if !record.prefix.is_empty() {
        spans.push(Span::styled(
            record.prefix.as_str(),
            Style::default().fg(prefix_color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(record.message.as_str(), Style::default().fg(prefix_color)));

    Line::from(spans)
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let status = app.session.status();
    let style = if status.starts_with("ERROR") || status.starts_with("Clipboard error") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };
    f.render_widget(Paragraph::new(Line::from(Span::styled(format!(" {}", status), style))), area);
}
