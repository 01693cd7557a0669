use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::{App, InputMode};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(f: &mut Frame, app: &App, area: Rect) {
        let theme = &app.theme;

        let status_bar_style = Style::default()
            .fg(theme.status_bar_foreground)
            .bg(theme.status_bar_background);

        let status_bar_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
            .split(area);

        let mode_bg = match app.input_mode {
            InputMode::Normal => theme.status_bar_mode_normal_bg,
            InputMode::Search => theme.status_bar_mode_search_bg,
        };

        let page = app.engine.context().page_title();

        let status_spans_left = Line::from(vec![
            Span::styled("Showroom | ", status_bar_style),
            Span::styled("Page: ", status_bar_style),
            Span::styled(
                page,
                Style::default().fg(theme.status_bar_view_name_fg).bg(theme.status_bar_background).bold(),
            ),
            Span::styled(format!(" | View: {:?} | ", app.active_view), status_bar_style),
            Span::styled(
                format!(" {:?} ", app.input_mode),
                Style::default().fg(theme.primary_foreground).bg(mode_bg).bold(),
            ),
            Span::styled(format!(" | Focus: {} ", app.focus.label()), status_bar_style),
        ]);
        f.render_widget(Paragraph::new(status_spans_left).style(status_bar_style), status_bar_layout[0]);

        let status_spans_right = vec![
            Span::styled(format!("{} shown | ", app.visible.len()), status_bar_style),
            Span::from(Local::now().format("%H:%M:%S").to_string()),
        ];
        f.render_widget(
            Paragraph::new(Line::from(status_spans_right))
                .style(status_bar_style)
                .alignment(Alignment::Right),
            status_bar_layout[1],
        );
    }
}
