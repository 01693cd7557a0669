// src/tui/widgets/search_bar.rs
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::app::{App, InputMode};

pub struct SearchBarWidget;

impl SearchBarWidget {
    pub fn render(f: &mut Frame, app: &App, area: Rect) {
        let theme = &app.theme;
        let kb = &app.config.keybindings;

        let (title, text, text_style, border) = match app.input_mode {
            InputMode::Search => (
                "Search (Enter/Esc to finish, Ctrl+u to clear)".to_string(),
                format!("{}_", app.search_input),
                Style::default().fg(theme.search_bar_text_fg).bg(theme.search_bar_background),
                theme.border_focused,
            ),
            InputMode::Normal if app.search_input.is_empty() => (
                format!(
                    "Press '{}' to search, {}/{} to move focus, '{}' for help, '{}' to quit",
                    kb.search, kb.next_focus, kb.prev_focus, kb.help, kb.quit
                ),
                "Title, brand or description".to_string(),
                Style::default().fg(theme.tertiary_foreground).bg(theme.search_bar_background),
                theme.search_bar_border,
            ),
            InputMode::Normal => (
                format!("Search ('{}' to edit)", kb.search),
                app.search_input.clone(),
                Style::default().fg(theme.secondary_foreground).bg(theme.search_bar_background),
                theme.search_bar_border,
            ),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(Line::from(Span::styled(
                title,
                Style::default().fg(theme.primary_foreground).bg(theme.search_bar_background),
            )))
            .style(Style::default().bg(theme.search_bar_background));

        f.render_widget(Paragraph::new(text).style(text_style).block(block), area);
    }
}
