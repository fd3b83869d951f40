use std::io::{stdout, Stdout};

use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::domain::button::ButtonProps;

use super::{
    layout::{button_area, centered_rect, ui_layout},
    model::ButtonModel,
    presentation::{build_status_line, keys_line, parse_hex_color, spinner_frame},
};

pub struct TerminalUi {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalUi {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(out);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    pub fn draw(&mut self, props: &ButtonProps, model: &ButtonModel) -> Result<()> {
        self.terminal.draw(|frame| render(frame, props, model))?;
        Ok(())
    }

    pub fn terminal_area(&self) -> Result<Rect> {
        let size = self.terminal.size()?;
        Ok(Rect::new(0, 0, size.width, size.height))
    }
}

impl Drop for TerminalUi {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        );
    }
}

fn render(frame: &mut Frame<'_>, props: &ButtonProps, model: &ButtonModel) {
    let area = frame.area();
    let layout = ui_layout(area);

    let status = Paragraph::new(Line::from(build_status_line(model, Utc::now())))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, layout.status);

    render_button(frame, props, model, button_area(area));

    let keys = Paragraph::new(Line::from(keys_line(model.alert_visible())))
        .block(Block::default().borders(Borders::ALL).title("Keys"));
    frame.render_widget(keys, layout.keys);

    if let Some(message) = model.alert() {
        render_alert(frame, message, area);
    }
}

fn render_button(frame: &mut Frame<'_>, props: &ButtonProps, model: &ButtonModel, area: Rect) {
    let appearance = props.current();
    let mut label = Vec::new();
    if appearance.spinner {
        label.push(Span::raw(format!("{} ", spinner_frame(model.spinner_tick))));
    }
    label.push(Span::styled(
        appearance.label.clone(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));

    let button = Paragraph::new(vec![Line::default(), Line::from(label)])
        .alignment(Alignment::Center)
        .style(Style::default().bg(parse_hex_color(&appearance.color)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Black))
                .title(props.current_state.as_str()),
        );
    frame.render_widget(button, area);
}

fn render_alert(frame: &mut Frame<'_>, message: &str, area: Rect) {
    let popup = centered_rect(60, 7, area);
    frame.render_widget(Clear, popup);
    let alert = Paragraph::new(message.to_string())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Alert")
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(alert, popup);
}
