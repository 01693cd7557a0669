use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::App;

pub struct KeybindingsModalWidget;

impl KeybindingsModalWidget {
    pub fn render(f: &mut Frame, app: &App, area: Rect) {
        let theme = &app.theme;
        let popup_area = Rect {
            x: area.x + area.width / 4,
            y: area.y + area.height / 6,
            width: area.width / 2,
            height: (area.height * 2 / 3).max(3),
        };
        f.render_widget(Clear, popup_area);
        let block = Block::default()
            .title("Keybindings")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_focused))
            .style(Style::default().fg(theme.primary_foreground).bg(theme.popup_background))
            .title_alignment(Alignment::Center);
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let kb = &app.config.keybindings;
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let rows: [(&str, &str); 14] = [
            ("Quit", kb.quit.as_str()),
            ("Help", kb.help.as_str()),
            ("Next focus", kb.next_focus.as_str()),
            ("Previous focus", kb.prev_focus.as_str()),
            ("Search", kb.search.as_str()),
            ("Reset filters", kb.clear.as_str()),
            ("Reload catalog", kb.reload.as_str()),
            ("Toggle brand", kb.toggle.as_str()),
            ("Switch slider handle", kb.switch_handle.as_str()),
            ("Logs view", kb.logs.as_str()),
            ("Up", kb.up.as_str()),
            ("Down", kb.down.as_str()),
            ("Slider left", kb.left.as_str()),
            ("Slider right", kb.right.as_str()),
        ];
        let mut lines: Vec<Line> = rows
            .iter()
            .map(|(label, key)| {
                Line::from(vec![Span::styled(format!("{}: ", label), bold), Span::raw(key.to_string())])
            })
            .collect();
        lines.push(Line::from(vec![
            Span::styled("PageUp/PageDown: ", bold),
            Span::raw("move slider by ten steps"),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Press Esc to close", Style::default().fg(theme.help_text))));

        f.render_widget(Paragraph::new(lines).alignment(Alignment::Left), inner);
    }
}
